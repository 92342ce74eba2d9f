//! Strkey encoding: the text form of account ids, secret seeds and signer keys.
//!
//! A strkey is the unpadded RFC 4648 base32 encoding of
//! `version byte || payload || crc16-xmodem(version byte || payload)`, with the checksum
//! appended little-endian.

use crc::{Crc, CRC_16_XMODEM};
use data_encoding::BASE32_NOPAD;
use thiserror::Error;

const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Strkey version bytes. The version byte determines the first character of the encoding.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VersionByte {
    /// An ed25519 public key. Encodes with a leading `G`.
    AccountId = 6 << 3,
    /// An ed25519 secret seed. Encodes with a leading `S`.
    Seed = 18 << 3,
    /// A pre-authorized transaction hash. Encodes with a leading `T`.
    PreAuthTx = 19 << 3,
    /// A sha256 hash signer. Encodes with a leading `X`.
    Sha256Hash = 23 << 3,
}

/// Errors related to strkey encoding and decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The string is not valid unpadded base32.
    #[error("Invalid base32: {0}")]
    InvalidBase32(String),

    /// The decoded data is too short to hold a version byte and checksum.
    #[error("Invalid strkey length: {0} bytes")]
    InvalidLength(usize),

    /// The version byte does not match the expected key type.
    #[error("Wrong version byte. Got {got:#04x}, expected {expected:#04x}. Hint: is this a different key type?")]
    WrongVersion {
        /// The version byte found in the string
        got: u8,
        /// The version byte the caller expected
        expected: u8,
    },

    /// The checksum does not match the payload.
    #[error("Strkey checksum mismatch")]
    BadChecksum,

    /// The string decodes, but is not the canonical encoding of its payload.
    #[error("Strkey is not canonical")]
    NonCanonical,
}

/// A simple result type alias
pub type EncodingResult<T> = Result<T, EncodingError>;

fn checksum(data: &[u8]) -> [u8; 2] {
    CRC16.checksum(data).to_le_bytes()
}

/// Encode a payload as a strkey with the given version byte.
pub fn encode_strkey(version: VersionByte, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + 3);
    data.push(version as u8);
    data.extend_from_slice(payload);
    let crc = checksum(&data);
    data.extend_from_slice(&crc);
    BASE32_NOPAD.encode(&data)
}

/// Decode a strkey, checking its version byte and checksum. Returns the payload.
pub fn decode_strkey(expected: VersionByte, s: &str) -> EncodingResult<Vec<u8>> {
    let data = BASE32_NOPAD
        .decode(s.as_bytes())
        .map_err(|e| EncodingError::InvalidBase32(e.to_string()))?;
    if data.len() < 3 {
        return Err(EncodingError::InvalidLength(data.len()));
    }

    let (body, crc) = data.split_at(data.len() - 2);
    if body[0] != expected as u8 {
        return Err(EncodingError::WrongVersion {
            got: body[0],
            expected: expected as u8,
        });
    }
    if checksum(body) != crc {
        return Err(EncodingError::BadChecksum);
    }
    if BASE32_NOPAD.encode(&data) != s {
        return Err(EncodingError::NonCanonical);
    }
    Ok(body[1..].to_vec())
}

/// Decode a strkey whose payload must be exactly 32 bytes, such as an ed25519 key.
pub fn decode_strkey_32(expected: VersionByte, s: &str) -> EncodingResult<[u8; 32]> {
    let payload = decode_strkey(expected, s)?;
    let mut key = [0u8; 32];
    if payload.len() != key.len() {
        return Err(EncodingError::InvalidLength(payload.len()));
    }
    key.copy_from_slice(&payload);
    Ok(key)
}
