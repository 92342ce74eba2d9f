//! Operations: the ledger-mutating instructions a transaction carries.
//!
//! Each operation is an optional source account override followed by a body union. The body
//! is a 4-byte operation type and that type's fixed-shape payload.

use std::io::{Read, Write};

use lumens_core::ser::{
    read_flag, read_i64, read_string, read_u32, read_var_opaque, var_opaque_length, write_flag,
    write_i64, write_string, write_u32, write_var_opaque, ByteFormat, SerError, SerResult,
};

use crate::types::{account::AccountId, asset::Asset};

/// The number of stroops in one lumen. Amounts and fees are denominated in stroops.
pub const STROOPS_PER_LUMEN: i64 = 10_000_000;

/// The maximum length of a data entry name, in bytes.
pub const DATA_NAME_MAX: usize = 64;

/// The maximum length of a data entry value, in bytes.
pub const DATA_VALUE_MAX: usize = 64;

/// Operation body discriminants.
#[repr(u32)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum OperationType {
    /// Fund a new account
    CreateAccount = 0,
    /// Send an asset
    Payment = 1,
    /// Create, update or remove a trust line
    ChangeTrust = 6,
    /// Merge the source into another account
    AccountMerge = 8,
    /// Set or clear a data entry
    ManageData = 10,
    /// Bump the source account's sequence number
    BumpSequence = 11,
}

/// The payload of an operation.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum OperationBody {
    /// Fund a new account
    CreateAccount {
        /// The account to create
        destination: AccountId,
        /// Its initial balance, in stroops
        starting_balance: i64,
    },
    /// Send an asset
    Payment {
        /// The recipient
        destination: AccountId,
        /// The asset sent
        asset: Asset,
        /// The amount sent, in stroops
        amount: i64,
    },
    /// Create, update or remove a trust line. A limit of 0 removes it.
    ChangeTrust {
        /// The trusted asset
        line: Asset,
        /// The trust limit, in stroops
        limit: i64,
    },
    /// Merge the source into another account
    AccountMerge {
        /// The account that receives the remaining balance
        destination: AccountId,
    },
    /// Set a data entry, or clear it when `value` is `None`
    ManageData {
        /// The entry name
        name: String,
        /// The entry value
        value: Option<Vec<u8>>,
    },
    /// Bump the source account's sequence number
    BumpSequence {
        /// The new sequence number
        bump_to: i64,
    },
}

/// An operation, optionally overriding the transaction's source account.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Operation {
    /// The account this operation acts on. Defaults to the transaction source.
    pub source_account: Option<AccountId>,
    /// The operation payload
    pub body: OperationBody,
}

impl From<OperationBody> for Operation {
    fn from(body: OperationBody) -> Self {
        Self {
            source_account: None,
            body,
        }
    }
}

impl Operation {
    /// Fund a new account with `starting_balance` stroops.
    pub fn create_account(destination: AccountId, starting_balance: i64) -> Self {
        OperationBody::CreateAccount {
            destination,
            starting_balance,
        }
        .into()
    }

    /// Send `amount` stroops of `asset` to `destination`.
    pub fn payment(destination: AccountId, asset: Asset, amount: i64) -> Self {
        OperationBody::Payment {
            destination,
            asset,
            amount,
        }
        .into()
    }

    /// Trust `line` up to `limit` stroops.
    pub fn change_trust(line: Asset, limit: i64) -> Self {
        OperationBody::ChangeTrust { line, limit }.into()
    }

    /// Merge the source account into `destination`.
    pub fn account_merge(destination: AccountId) -> Self {
        OperationBody::AccountMerge { destination }.into()
    }

    /// Set (or with `None`, clear) the data entry `name`. Length limits are enforced when
    /// the operation is encoded.
    pub fn manage_data(name: impl Into<String>, value: Option<Vec<u8>>) -> Self {
        OperationBody::ManageData {
            name: name.into(),
            value,
        }
        .into()
    }

    /// Bump the source account's sequence number to `bump_to`.
    pub fn bump_sequence(bump_to: i64) -> Self {
        OperationBody::BumpSequence { bump_to }.into()
    }

    /// Set the source account override.
    pub fn with_source(mut self, source: AccountId) -> Self {
        self.source_account = Some(source);
        self
    }

    /// The body discriminant.
    pub fn operation_type(&self) -> OperationType {
        self.body.operation_type()
    }
}

impl OperationBody {
    /// The body discriminant.
    pub fn operation_type(&self) -> OperationType {
        match self {
            OperationBody::CreateAccount { .. } => OperationType::CreateAccount,
            OperationBody::Payment { .. } => OperationType::Payment,
            OperationBody::ChangeTrust { .. } => OperationType::ChangeTrust,
            OperationBody::AccountMerge { .. } => OperationType::AccountMerge,
            OperationBody::ManageData { .. } => OperationType::ManageData,
            OperationBody::BumpSequence { .. } => OperationType::BumpSequence,
        }
    }
}

impl ByteFormat for OperationBody {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        4 + match self {
            OperationBody::CreateAccount { .. } => 36 + 8,
            OperationBody::Payment { asset, .. } => 36 + asset.serialized_length() + 8,
            OperationBody::ChangeTrust { line, .. } => line.serialized_length() + 8,
            OperationBody::AccountMerge { .. } => 36,
            OperationBody::ManageData { name, value } => {
                var_opaque_length(name.len())
                    + 4
                    + value.as_ref().map_or(0, |v| var_opaque_length(v.len()))
            }
            OperationBody::BumpSequence { .. } => 8,
        }
    }

    fn read_from<R>(reader: &mut R) -> SerResult<Self>
    where
        R: Read,
    {
        let body = match read_u32(reader)? {
            0 => OperationBody::CreateAccount {
                destination: AccountId::read_from(reader)?,
                starting_balance: read_i64(reader)?,
            },
            1 => OperationBody::Payment {
                destination: AccountId::read_from(reader)?,
                asset: Asset::read_from(reader)?,
                amount: read_i64(reader)?,
            },
            6 => OperationBody::ChangeTrust {
                line: Asset::read_from(reader)?,
                limit: read_i64(reader)?,
            },
            8 => OperationBody::AccountMerge {
                destination: AccountId::read_from(reader)?,
            },
            10 => {
                let name = read_string(reader, DATA_NAME_MAX)?;
                let value = if read_flag(reader)? {
                    Some(read_var_opaque(reader, DATA_VALUE_MAX)?)
                } else {
                    None
                };
                OperationBody::ManageData { name, value }
            }
            11 => OperationBody::BumpSequence {
                bump_to: read_i64(reader)?,
            },
            value => {
                return Err(SerError::UnknownDiscriminant {
                    kind: "OperationType",
                    value,
                })
            }
        };
        Ok(body)
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        let mut len = write_u32(writer, self.operation_type() as u32)?;
        match self {
            OperationBody::CreateAccount {
                destination,
                starting_balance,
            } => {
                len += destination.write_to(writer)?;
                len += write_i64(writer, *starting_balance)?;
            }
            OperationBody::Payment {
                destination,
                asset,
                amount,
            } => {
                len += destination.write_to(writer)?;
                len += asset.write_to(writer)?;
                len += write_i64(writer, *amount)?;
            }
            OperationBody::ChangeTrust { line, limit } => {
                len += line.write_to(writer)?;
                len += write_i64(writer, *limit)?;
            }
            OperationBody::AccountMerge { destination } => {
                len += destination.write_to(writer)?;
            }
            OperationBody::ManageData { name, value } => {
                len += write_string(writer, name, DATA_NAME_MAX)?;
                len += write_flag(writer, value.is_some())?;
                if let Some(value) = value {
                    len += write_var_opaque(writer, value, DATA_VALUE_MAX)?;
                }
            }
            OperationBody::BumpSequence { bump_to } => {
                len += write_i64(writer, *bump_to)?;
            }
        }
        Ok(len)
    }
}

impl ByteFormat for Operation {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        self.source_account.serialized_length() + self.body.serialized_length()
    }

    fn read_from<R>(reader: &mut R) -> SerResult<Self>
    where
        R: Read,
    {
        Ok(Self {
            source_account: Option::<AccountId>::read_from(reader)?,
            body: OperationBody::read_from(reader)?,
        })
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        let mut len = self.source_account.write_to(writer)?;
        len += self.body.write_to(writer)?;
        Ok(len)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn account(byte: u8) -> AccountId {
        AccountId::from_ed25519([byte; 32])
    }

    #[test]
    fn it_encodes_create_account() {
        let op = Operation::create_account(account(2), 50 * STROOPS_PER_LUMEN);
        let bytes = op.to_bytes().unwrap();
        assert_eq!(bytes.len(), 52);
        assert_eq!(op.serialized_length(), 52);

        // no source override, then the CreateAccount discriminant
        assert_eq!(&bytes[..8], &[0u8; 8]);
        assert_eq!(&bytes[8..12], &[0u8; 4]);
        assert_eq!(&bytes[12..44], &[2u8; 32]);
        assert_eq!(&bytes[44..], &500_000_000i64.to_be_bytes());
    }

    #[test]
    fn it_encodes_source_overrides() {
        let op = Operation::bump_sequence(9).with_source(account(5));
        let bytes = op.to_bytes().unwrap();
        assert_eq!(bytes.len(), 4 + 36 + 4 + 8);
        assert_eq!(&bytes[..4], &[0, 0, 0, 1]);
        assert_eq!(&bytes[40..44], &[0, 0, 0, 11]);
        assert_eq!(Operation::from_bytes(&bytes).unwrap(), op);
    }

    #[test]
    fn it_round_trips_each_body() {
        let issuer = account(7);
        let ops = vec![
            Operation::create_account(account(1), 1),
            Operation::payment(account(1), Asset::native(), 10),
            Operation::payment(account(1), Asset::credit("USD", issuer).unwrap(), 10),
            Operation::change_trust(Asset::credit("LONGCODE", issuer).unwrap(), i64::MAX),
            Operation::account_merge(account(1)),
            Operation::manage_data("name", Some(b"value".to_vec())),
            Operation::manage_data("name", None),
            Operation::bump_sequence(100),
        ];
        for op in ops.iter() {
            let bytes = op.to_bytes().unwrap();
            assert_eq!(bytes.len(), op.serialized_length(), "{:?}", op);
            assert_eq!(bytes.len() % 4, 0);
            assert_eq!(&Operation::from_bytes(&bytes).unwrap(), op);
        }
    }

    #[test]
    fn it_enforces_data_limits() {
        let op = Operation::manage_data("n".repeat(65), None);
        match op.to_bytes() {
            Err(SerError::LengthExceeded { max: 64, got: 65 }) => {}
            other => panic!("expected LengthExceeded, got {:?}", other),
        }
        let op = Operation::manage_data("n", Some(vec![0u8; 65]));
        assert!(op.to_bytes().is_err());
    }

    #[test]
    fn it_rejects_unknown_operation_types() {
        match OperationBody::from_bytes(&[0, 0, 0, 99]) {
            Err(SerError::UnknownDiscriminant { value: 99, .. }) => {}
            other => panic!("expected UnknownDiscriminant, got {:?}", other),
        }
    }
}
