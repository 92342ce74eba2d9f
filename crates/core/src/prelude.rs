//! Re-exports of common traits.
pub use crate::{
    enc::{decode_strkey, encode_strkey, EncodingError, VersionByte},
    hashes::{MarkedDigest, MarkedDigestWriter, Sha256Digest, Sha256Writer},
    ser::{ByteFormat, SerError, SerResult},
};
