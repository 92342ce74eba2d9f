//! Account identifiers.

use std::{
    fmt,
    io::{Read, Write},
    str::FromStr,
};

use lumens_core::{
    enc::{decode_strkey_32, encode_strkey, EncodingError, VersionByte},
    ser::{read_fixed_opaque, read_u32, write_fixed_opaque, write_u32, ByteFormat, SerError, SerResult},
};

/// The public key type discriminant for ed25519 keys. It is the only key type.
pub const PUBLIC_KEY_TYPE_ED25519: u32 = 0;

/// An account id: an ed25519 public key. Its text form is a `G...` strkey, its canonical form
/// is a 36-byte public key union (4-byte key type, then the 32 key bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// Wrap raw ed25519 public key bytes.
    pub fn from_ed25519(key: [u8; 32]) -> Self {
        Self(key)
    }

    /// Return a reference to the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a `G...` strkey.
    pub fn from_strkey(s: &str) -> Result<Self, EncodingError> {
        decode_strkey_32(VersionByte::AccountId, s).map(Self)
    }

    /// Encode as a `G...` strkey.
    pub fn to_strkey(&self) -> String {
        encode_strkey(VersionByte::AccountId, &self.0)
    }

    /// The signature hint for this key: its last 4 bytes.
    pub fn signature_hint(&self) -> [u8; 4] {
        let mut hint = [0u8; 4];
        hint.copy_from_slice(&self.0[28..]);
        hint
    }
}

impl FromStr for AccountId {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_strkey(s)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_strkey())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_strkey())
    }
}

impl ByteFormat for AccountId {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        36
    }

    fn read_from<R>(reader: &mut R) -> SerResult<Self>
    where
        R: Read,
    {
        match read_u32(reader)? {
            PUBLIC_KEY_TYPE_ED25519 => Ok(Self(read_fixed_opaque(reader)?)),
            value => Err(SerError::UnknownDiscriminant {
                kind: "PublicKeyType",
                value,
            }),
        }
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        let mut len = write_u32(writer, PUBLIC_KEY_TYPE_ED25519)?;
        len += write_fixed_opaque(writer, &self.0)?;
        Ok(len)
    }
}

impl serde::Serialize for AccountId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_strkey())
    }
}

impl<'de> serde::Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<AccountId, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s: String = serde::Deserialize::deserialize(deserializer)?;
        s.parse().map_err(|e: EncodingError| serde::de::Error::custom(e.to_string()))
    }
}
