//! The finalized transaction document and its signature payload.

use std::io::{Error as IOError, Read, Write};

use lumens_core::{
    hashes::{MarkedDigestWriter, Sha256Writer},
    ser::{read_array, read_u32, read_u64, write_array, write_u32, write_u64, ByteFormat, SerError},
};
use thiserror::Error;

use crate::{
    hashes::TxHash,
    nets::Network,
    types::{account::AccountId, memo::Memo, operation::Operation, time_bounds::TimeBounds},
};

/// The maximum number of operations in one transaction.
pub const MAX_OPERATIONS: usize = 100;

/// The envelope type tag mixed into the signature payload of a transaction.
pub const ENVELOPE_TYPE_TX: u32 = 2;

/// Errors related to transaction encoding.
#[derive(Debug, Error)]
pub enum TxError {
    /// Serialization-related errors
    #[error(transparent)]
    SerError(#[from] SerError),

    /// IOError bubbled up from a `Write` passed to a `ByteFormat::write_to` implementation.
    #[error(transparent)]
    IOError(#[from] IOError),

    /// A transaction carries at most 100 operations.
    #[error("Transaction has {0} operations. The maximum is 100")]
    TooManyOperations(usize),
}

/// Type alias for result with TxError
pub type TxResult<T> = Result<T, TxError>;

/// The reserved extension slot. Only `V0` exists, and it carries no payload.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum TransactionExt {
    /// No extension
    #[default]
    V0,
}

impl ByteFormat for TransactionExt {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        4
    }

    fn read_from<R>(reader: &mut R) -> Result<Self, SerError>
    where
        R: Read,
    {
        match read_u32(reader)? {
            0 => Ok(TransactionExt::V0),
            value => Err(SerError::UnknownDiscriminant {
                kind: "TransactionExt",
                value,
            }),
        }
    }

    fn write_to<W>(&self, writer: &mut W) -> Result<usize, SerError>
    where
        W: Write,
    {
        match self {
            TransactionExt::V0 => write_u32(writer, 0),
        }
    }
}

/// A transaction with every field fixed, including fee and sequence number.
///
/// Encodes as source account, fee, sequence number, optional time bounds, memo, operations,
/// and the extension slot, in that order, with no total-length prefix.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    source_account: AccountId,
    fee: u32,
    seq_num: u64,
    time_bounds: Option<TimeBounds>,
    memo: Memo,
    operations: Vec<Operation>,
    ext: TransactionExt,
}

impl Transaction {
    /// Instantiate a transaction.
    pub fn new(
        source_account: AccountId,
        fee: u32,
        seq_num: u64,
        time_bounds: Option<TimeBounds>,
        memo: Memo,
        operations: Vec<Operation>,
    ) -> Self {
        Self {
            source_account,
            fee,
            seq_num,
            time_bounds,
            memo,
            operations,
            ext: TransactionExt::V0,
        }
    }

    /// The paying and sequencing account.
    pub fn source_account(&self) -> &AccountId {
        &self.source_account
    }

    /// The total fee, in stroops.
    pub fn fee(&self) -> u32 {
        self.fee
    }

    /// The sequence number.
    pub fn seq_num(&self) -> u64 {
        self.seq_num
    }

    /// The validity window, if any.
    pub fn time_bounds(&self) -> Option<&TimeBounds> {
        self.time_bounds.as_ref()
    }

    /// The memo.
    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    /// The operations, in execution order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// The extension slot.
    pub fn ext(&self) -> TransactionExt {
        self.ext
    }

    /// Write the signature payload: the network id, the envelope type, then the transaction.
    pub fn write_signature_base<W>(&self, network: &Network, writer: &mut W) -> TxResult<usize>
    where
        W: Write,
    {
        let mut len = network.write_id(writer)?;
        len += write_u32(writer, ENVELOPE_TYPE_TX)?;
        len += self.write_to(writer)?;
        Ok(len)
    }

    /// The signature payload as a byte vector.
    pub fn signature_base(&self, network: &Network) -> TxResult<Vec<u8>> {
        let mut payload: Vec<u8> = Vec::with_capacity(36 + self.serialized_length());
        self.write_signature_base(network, &mut payload)?;
        Ok(payload)
    }

    /// The transaction hash: the sha256 of the signature payload. This is the digest that
    /// signers sign, and the id the network reports.
    pub fn hash(&self, network: &Network) -> TxResult<TxHash> {
        let mut w = Sha256Writer::default();
        self.write_signature_base(network, &mut w)?;
        Ok(w.finish_marked())
    }
}

impl ByteFormat for Transaction {
    type Error = TxError;

    fn serialized_length(&self) -> usize {
        let mut len = self.source_account.serialized_length();
        len += 4 + 8;
        len += self.time_bounds.serialized_length();
        len += self.memo.serialized_length();
        len += self.operations.serialized_length();
        len += self.ext.serialized_length();
        len
    }

    fn read_from<R>(reader: &mut R) -> TxResult<Self>
    where
        R: Read,
    {
        let source_account = AccountId::read_from(reader)?;
        let fee = read_u32(reader)?;
        let seq_num = read_u64(reader)?;
        let time_bounds = Option::<TimeBounds>::read_from(reader)?;
        let memo = Memo::read_from(reader)?;
        let operations = read_array::<_, Operation>(reader, Some(MAX_OPERATIONS))?;
        let ext = TransactionExt::read_from(reader)?;
        Ok(Self {
            source_account,
            fee,
            seq_num,
            time_bounds,
            memo,
            operations,
            ext,
        })
    }

    fn write_to<W>(&self, writer: &mut W) -> TxResult<usize>
    where
        W: Write,
    {
        if self.operations.len() > MAX_OPERATIONS {
            return Err(TxError::TooManyOperations(self.operations.len()));
        }
        let mut len = self.source_account.write_to(writer)?;
        len += write_u32(writer, self.fee)?;
        len += write_u64(writer, self.seq_num)?;
        len += self.time_bounds.write_to(writer)?;
        len += self.memo.write_to(writer)?;
        len += write_array(writer, &self.operations, Some(MAX_OPERATIONS))?;
        len += self.ext.write_to(writer)?;
        Ok(len)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::operation::STROOPS_PER_LUMEN;

    fn simple_tx() -> Transaction {
        Transaction::new(
            AccountId::from_ed25519([1u8; 32]),
            100,
            42,
            None,
            Memo::None,
            vec![Operation::create_account(
                AccountId::from_ed25519([2u8; 32]),
                50 * STROOPS_PER_LUMEN,
            )],
        )
    }

    #[test]
    fn it_lays_out_fields_in_order() {
        let tx = simple_tx();
        let bytes = tx.to_bytes().unwrap();
        assert_eq!(bytes.len(), 36 + 4 + 8 + 4 + 4 + 4 + 52 + 4);
        assert_eq!(bytes.len(), tx.serialized_length());

        assert_eq!(&bytes[..4], &[0, 0, 0, 0]);
        assert_eq!(&bytes[4..36], &[1u8; 32]);
        assert_eq!(&bytes[36..40], &100u32.to_be_bytes());
        assert_eq!(&bytes[40..48], &42u64.to_be_bytes());
        assert_eq!(&bytes[48..52], &[0, 0, 0, 0]); // no time bounds
        assert_eq!(&bytes[52..56], &[0, 0, 0, 0]); // memo none
        assert_eq!(&bytes[56..60], &[0, 0, 0, 1]); // one operation
        assert_eq!(&bytes[112..], &[0, 0, 0, 0]); // ext v0

        assert_eq!(Transaction::from_bytes(&bytes).unwrap(), tx);
    }

    #[test]
    fn it_rejects_too_many_operations() {
        let ops = vec![Operation::bump_sequence(1); MAX_OPERATIONS + 1];
        let tx = Transaction::new(
            AccountId::from_ed25519([1u8; 32]),
            100,
            1,
            None,
            Memo::None,
            ops,
        );
        match tx.to_bytes() {
            Err(TxError::TooManyOperations(101)) => {}
            other => panic!("expected TooManyOperations, got {:?}", other),
        }
    }

    #[test]
    fn it_hashes_the_signature_base() {
        let tx = simple_tx();
        let network = Network::testnet();
        let base = tx.signature_base(&network).unwrap();
        assert_eq!(&base[..32], network.id().as_ref());
        assert_eq!(&base[32..36], &[0, 0, 0, 2]);
        assert_eq!(&base[36..], &tx.to_bytes().unwrap()[..]);

        let expected = lumens_core::hashes::sha256(&base);
        assert_eq!(tx.hash(&network).unwrap().0, expected);
        assert_ne!(tx.hash(&network).unwrap(), tx.hash(&Network::public()).unwrap());
    }
}
