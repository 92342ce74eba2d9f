//! Assets: the native currency, or a credit issued by an account.

use std::io::{Read, Write};

use lumens_core::ser::{
    read_fixed_opaque, read_u32, write_fixed_opaque, write_u32, ByteFormat, SerError, SerResult,
};
use thiserror::Error;

use crate::types::account::AccountId;

/// Asset union discriminants.
#[repr(u32)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AssetType {
    /// The native currency
    Native = 0,
    /// A credit with a 1 to 4 character code
    CreditAlphanum4 = 1,
    /// A credit with a 5 to 12 character code
    CreditAlphanum12 = 2,
}

/// Errors raised when constructing assets.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Codes are 1 to 12 ASCII alphanumerics.
    #[error("Invalid asset code: {0:?}")]
    InvalidCode(String),
}

/// An asset. Credit codes are stored right-padded with zero bytes.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Asset {
    /// The native currency
    Native,
    /// A short-code credit
    CreditAlphanum4 {
        /// The zero-padded code
        code: [u8; 4],
        /// The issuing account
        issuer: AccountId,
    },
    /// A long-code credit
    CreditAlphanum12 {
        /// The zero-padded code
        code: [u8; 12],
        /// The issuing account
        issuer: AccountId,
    },
}

impl Asset {
    /// The native asset.
    pub fn native() -> Self {
        Asset::Native
    }

    /// A credit asset. Codes of 1 to 4 characters make an alphanum4 asset, 5 to 12 an
    /// alphanum12 asset.
    pub fn credit(code: &str, issuer: AccountId) -> Result<Self, AssetError> {
        let valid = !code.is_empty()
            && code.len() <= 12
            && code.bytes().all(|b| b.is_ascii_alphanumeric());
        if !valid {
            return Err(AssetError::InvalidCode(code.to_owned()));
        }

        if code.len() <= 4 {
            let mut buf = [0u8; 4];
            buf[..code.len()].copy_from_slice(code.as_bytes());
            Ok(Asset::CreditAlphanum4 { code: buf, issuer })
        } else {
            let mut buf = [0u8; 12];
            buf[..code.len()].copy_from_slice(code.as_bytes());
            Ok(Asset::CreditAlphanum12 { code: buf, issuer })
        }
    }

    /// The asset type discriminant.
    pub fn asset_type(&self) -> AssetType {
        match self {
            Asset::Native => AssetType::Native,
            Asset::CreditAlphanum4 { .. } => AssetType::CreditAlphanum4,
            Asset::CreditAlphanum12 { .. } => AssetType::CreditAlphanum12,
        }
    }

    /// The asset code without padding. `None` for the native asset.
    pub fn code_str(&self) -> Option<String> {
        let code: &[u8] = match self {
            Asset::Native => return None,
            Asset::CreditAlphanum4 { code, .. } => code,
            Asset::CreditAlphanum12 { code, .. } => code,
        };
        let end = code.iter().position(|b| *b == 0).unwrap_or(code.len());
        Some(String::from_utf8_lossy(&code[..end]).into_owned())
    }

    /// The issuer. `None` for the native asset.
    pub fn issuer(&self) -> Option<&AccountId> {
        match self {
            Asset::Native => None,
            Asset::CreditAlphanum4 { issuer, .. } | Asset::CreditAlphanum12 { issuer, .. } => {
                Some(issuer)
            }
        }
    }
}

impl ByteFormat for Asset {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        match self {
            Asset::Native => 4,
            Asset::CreditAlphanum4 { .. } => 4 + 4 + 36,
            Asset::CreditAlphanum12 { .. } => 4 + 12 + 36,
        }
    }

    fn read_from<R>(reader: &mut R) -> SerResult<Self>
    where
        R: Read,
    {
        match read_u32(reader)? {
            0 => Ok(Asset::Native),
            1 => Ok(Asset::CreditAlphanum4 {
                code: read_fixed_opaque(reader)?,
                issuer: AccountId::read_from(reader)?,
            }),
            2 => Ok(Asset::CreditAlphanum12 {
                code: read_fixed_opaque(reader)?,
                issuer: AccountId::read_from(reader)?,
            }),
            value => Err(SerError::UnknownDiscriminant {
                kind: "AssetType",
                value,
            }),
        }
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        let mut len = write_u32(writer, self.asset_type() as u32)?;
        match self {
            Asset::Native => {}
            Asset::CreditAlphanum4 { code, issuer } => {
                len += write_fixed_opaque(writer, code)?;
                len += issuer.write_to(writer)?;
            }
            Asset::CreditAlphanum12 { code, issuer } => {
                len += write_fixed_opaque(writer, code)?;
                len += issuer.write_to(writer)?;
            }
        }
        Ok(len)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn issuer() -> AccountId {
        AccountId::from_ed25519([3u8; 32])
    }

    #[test]
    fn it_picks_the_code_width() {
        let usd = Asset::credit("USD", issuer()).unwrap();
        assert_eq!(usd.asset_type(), AssetType::CreditAlphanum4);
        assert_eq!(usd.code_str().unwrap(), "USD");
        assert_eq!(usd.issuer(), Some(&issuer()));

        let long = Asset::credit("LONGCODE", issuer()).unwrap();
        assert_eq!(long.asset_type(), AssetType::CreditAlphanum12);
        assert_eq!(long.code_str().unwrap(), "LONGCODE");

        assert_eq!(Asset::native().code_str(), None);
    }

    #[test]
    fn it_rejects_bad_codes() {
        for code in ["", "THIRTEENCHARS", "US D", "€"].iter() {
            assert_eq!(
                Asset::credit(code, issuer()),
                Err(AssetError::InvalidCode(code.to_string()))
            );
        }
    }

    #[test]
    fn it_encodes_assets() {
        assert_eq!(Asset::native().serialize_hex().unwrap(), "00000000");

        let usd = Asset::credit("USD", issuer()).unwrap();
        let bytes = usd.to_bytes().unwrap();
        assert_eq!(bytes.len(), usd.serialized_length());
        assert_eq!(&bytes[..8], &[0, 0, 0, 1, b'U', b'S', b'D', 0]);
        assert_eq!(Asset::from_bytes(&bytes).unwrap(), usd);

        let long = Asset::credit("LONGCODE", issuer()).unwrap();
        let bytes = long.to_bytes().unwrap();
        assert_eq!(bytes.len(), 52);
        assert_eq!(Asset::from_bytes(&bytes).unwrap(), long);
    }
}
