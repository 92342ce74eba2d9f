//! Transaction memos.
//!
//! A memo is a discriminated union: a 4-byte memo type followed by the payload of that type
//! only. `None` carries no payload, so it encodes as 4 zero bytes. Text is a variable-length
//! string of at most 28 bytes, `Id` a big-endian u64, and `Hash` and `Return` are 32-byte
//! blocks. Text bytes are not required to be UTF-8.

use std::io::{Read, Write};

use lumens_core::ser::{
    read_fixed_opaque, read_u32, read_u64, read_var_opaque, var_opaque_length,
    write_fixed_opaque, write_u32, write_u64, write_var_opaque, ByteFormat, SerError, SerResult,
};
use thiserror::Error;

/// The maximum length of a text memo, in bytes.
pub const MEMO_TEXT_MAX: usize = 28;

/// Memo union discriminants.
#[repr(u32)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MemoType {
    /// No memo
    None = 0,
    /// A string of at most 28 bytes
    Text = 1,
    /// A 64-bit unsigned id
    Id = 2,
    /// A 32-byte hash
    Hash = 3,
    /// A 32-byte hash of the transaction being refunded
    Return = 4,
}

impl MemoType {
    fn from_discriminant(value: u32) -> SerResult<Self> {
        match value {
            0 => Ok(MemoType::None),
            1 => Ok(MemoType::Text),
            2 => Ok(MemoType::Id),
            3 => Ok(MemoType::Hash),
            4 => Ok(MemoType::Return),
            _ => Err(SerError::UnknownDiscriminant {
                kind: "MemoType",
                value,
            }),
        }
    }
}

/// Errors raised when a memo payload does not fit its memo type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoError {
    /// Text memos hold at most 28 bytes.
    #[error("Memo text is {0} bytes. The maximum is 28")]
    TextTooLong(usize),

    /// Id memo payloads are exactly 8 big-endian bytes.
    #[error("Memo id payload must be 8 bytes. Got {0}")]
    WrongIdLength(usize),

    /// Hash and return memo payloads are exactly 32 bytes.
    #[error("Memo hash payload must be 32 bytes. Got {0}")]
    WrongHashLength(usize),
}

/// The payload of a text memo: at most 28 bytes. Only constructible through `MemoText::new`,
/// so an oversized text memo cannot exist.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct MemoText(Vec<u8>);

impl MemoText {
    /// Wrap a text payload. Errors if it is longer than 28 bytes.
    pub fn new(text: impl Into<Vec<u8>>) -> Result<Self, MemoError> {
        let text = text.into();
        if text.len() > MEMO_TEXT_MAX {
            return Err(MemoError::TextTooLong(text.len()));
        }
        Ok(Self(text))
    }

    /// The raw payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The payload as a string, if it is UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// The payload length, in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for MemoText {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A transaction memo. Exactly one variant is active.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum Memo {
    /// No memo
    #[default]
    None,
    /// A short text memo
    Text(MemoText),
    /// A numeric memo
    Id(u64),
    /// A hash memo
    Hash([u8; 32]),
    /// A return-hash memo
    Return([u8; 32]),
}

fn hash_payload(payload: &[u8]) -> Result<[u8; 32], MemoError> {
    let mut hash = [0u8; 32];
    if payload.len() != hash.len() {
        return Err(MemoError::WrongHashLength(payload.len()));
    }
    hash.copy_from_slice(payload);
    Ok(hash)
}

impl Memo {
    /// Instantiate a text memo. Errors if `text` is longer than 28 bytes.
    pub fn text(text: impl Into<Vec<u8>>) -> Result<Self, MemoError> {
        MemoText::new(text).map(Memo::Text)
    }

    /// Instantiate an id memo.
    pub fn id(id: u64) -> Self {
        Memo::Id(id)
    }

    /// Instantiate a hash memo. Errors unless `hash` is exactly 32 bytes.
    pub fn hash(hash: &[u8]) -> Result<Self, MemoError> {
        hash_payload(hash).map(Memo::Hash)
    }

    /// Instantiate a return-hash memo. Errors unless `hash` is exactly 32 bytes.
    pub fn return_hash(hash: &[u8]) -> Result<Self, MemoError> {
        hash_payload(hash).map(Memo::Return)
    }

    /// Instantiate a memo of the given type from a raw payload. The `None` type ignores the
    /// payload. `Id` payloads are 8 big-endian bytes.
    pub fn new(kind: MemoType, payload: &[u8]) -> Result<Self, MemoError> {
        match kind {
            MemoType::None => Ok(Memo::None),
            MemoType::Text => Memo::text(payload),
            MemoType::Id => {
                let mut id = [0u8; 8];
                if payload.len() != id.len() {
                    return Err(MemoError::WrongIdLength(payload.len()));
                }
                id.copy_from_slice(payload);
                Ok(Memo::Id(u64::from_be_bytes(id)))
            }
            MemoType::Hash => Memo::hash(payload),
            MemoType::Return => Memo::return_hash(payload),
        }
    }

    /// The discriminant of the active variant.
    pub fn memo_type(&self) -> MemoType {
        match self {
            Memo::None => MemoType::None,
            Memo::Text(_) => MemoType::Text,
            Memo::Id(_) => MemoType::Id,
            Memo::Hash(_) => MemoType::Hash,
            Memo::Return(_) => MemoType::Return,
        }
    }

    /// True if this is the empty memo.
    pub fn is_none(&self) -> bool {
        matches!(self, Memo::None)
    }
}

impl ByteFormat for Memo {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        4 + match self {
            Memo::None => 0,
            Memo::Text(text) => var_opaque_length(text.len()),
            Memo::Id(_) => 8,
            Memo::Hash(_) | Memo::Return(_) => 32,
        }
    }

    fn read_from<R>(reader: &mut R) -> SerResult<Self>
    where
        R: Read,
    {
        let memo = match MemoType::from_discriminant(read_u32(reader)?)? {
            MemoType::None => Memo::None,
            MemoType::Text => Memo::Text(MemoText(read_var_opaque(reader, MEMO_TEXT_MAX)?)),
            MemoType::Id => Memo::Id(read_u64(reader)?),
            MemoType::Hash => Memo::Hash(read_fixed_opaque(reader)?),
            MemoType::Return => Memo::Return(read_fixed_opaque(reader)?),
        };
        Ok(memo)
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        let mut len = write_u32(writer, self.memo_type() as u32)?;
        len += match self {
            Memo::None => 0,
            Memo::Text(text) => write_var_opaque(writer, text.as_bytes(), MEMO_TEXT_MAX)?,
            Memo::Id(id) => write_u64(writer, *id)?,
            Memo::Hash(hash) | Memo::Return(hash) => write_fixed_opaque(writer, hash)?,
        };
        Ok(len)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_enforces_text_length() {
        let ok = "a".repeat(28);
        let too_long = "a".repeat(29);
        assert_eq!(
            Memo::text(ok.clone()).unwrap(),
            Memo::Text(MemoText::new(ok).unwrap())
        );
        assert_eq!(Memo::text(too_long), Err(MemoError::TextTooLong(29)));
        assert_eq!(
            Memo::new(MemoType::Text, &[0u8; 29]),
            Err(MemoError::TextTooLong(29))
        );
        assert_eq!(MemoText::new(vec![0u8; 29]), Err(MemoError::TextTooLong(29)));
    }

    #[test]
    fn it_keeps_non_utf8_text_bytes() {
        let memo = Memo::new(MemoType::Text, &[0xff; 28]).unwrap();
        match &memo {
            Memo::Text(text) => {
                assert_eq!(text.as_bytes(), &[0xff; 28][..]);
                assert_eq!(text.as_str(), None);
            }
            other => panic!("expected a text memo, got {:?}", other),
        }

        let bytes = memo.to_bytes().unwrap();
        assert_eq!(bytes.len(), 4 + 4 + 28);
        assert_eq!(Memo::from_bytes(&bytes).unwrap(), memo);

        let decoded = Memo::from_bytes(&[0, 0, 0, 1, 0, 0, 0, 2, 0xff, 0xfe, 0, 0]).unwrap();
        assert_eq!(decoded, Memo::text(vec![0xff, 0xfe]).unwrap());
    }

    #[test]
    fn it_enforces_hash_length() {
        assert!(Memo::hash(&[1u8; 32]).is_ok());
        assert!(Memo::return_hash(&[1u8; 32]).is_ok());
        for len in [0usize, 31, 33, 64].iter() {
            assert_eq!(
                Memo::new(MemoType::Hash, &vec![0u8; *len]),
                Err(MemoError::WrongHashLength(*len))
            );
            assert_eq!(
                Memo::new(MemoType::Return, &vec![0u8; *len]),
                Err(MemoError::WrongHashLength(*len))
            );
        }
    }

    #[test]
    fn it_builds_memos_from_raw_payloads() {
        assert_eq!(Memo::new(MemoType::None, b"ignored").unwrap(), Memo::None);
        assert_eq!(
            Memo::new(MemoType::Id, &[0, 0, 0, 0, 0, 0, 1, 0]).unwrap(),
            Memo::Id(256)
        );
        assert_eq!(
            Memo::new(MemoType::Id, &[1, 2, 3]),
            Err(MemoError::WrongIdLength(3))
        );
        assert_eq!(
            Memo::new(MemoType::Text, b"hello").unwrap().memo_type(),
            MemoType::Text
        );
    }

    #[test]
    fn it_encodes_each_variant() {
        assert_eq!(Memo::None.serialize_hex().unwrap(), "00000000");
        assert_eq!(
            Memo::text("hello").unwrap().serialize_hex().unwrap(),
            "000000010000000568656c6c6f000000"
        );
        assert_eq!(
            Memo::id(7).serialize_hex().unwrap(),
            "000000020000000000000007"
        );

        let hash = Memo::hash(&[0xab; 32]).unwrap();
        let bytes = hash.to_bytes().unwrap();
        assert_eq!(bytes.len(), 36);
        assert_eq!(hash.serialized_length(), 36);
        assert_eq!(&bytes[..4], &[0, 0, 0, 3]);
        assert_eq!(Memo::from_bytes(&bytes).unwrap(), hash);

        let ret = Memo::return_hash(&[0xab; 32]).unwrap();
        assert_eq!(&ret.to_bytes().unwrap()[..4], &[0, 0, 0, 4]);

        let full = Memo::text("a".repeat(28)).unwrap();
        assert_eq!(full.to_bytes().unwrap().len(), 36);
    }

    #[test]
    fn it_rejects_unknown_memo_types() {
        match Memo::from_bytes(&[0, 0, 0, 5]) {
            Err(SerError::UnknownDiscriminant { kind, value: 5 }) => assert_eq!(kind, "MemoType"),
            other => panic!("expected UnknownDiscriminant, got {:?}", other),
        }
    }
}
