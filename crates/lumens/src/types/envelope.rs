//! Signed transaction envelopes.

use std::io::{Read, Write};

use lumens_core::ser::{
    read_array, read_fixed_opaque, read_var_opaque, var_opaque_length, write_array,
    write_fixed_opaque, write_var_opaque, ByteFormat, SerError, SerResult,
};

use crate::{
    hashes::TxHash,
    nets::Network,
    types::transaction::{Transaction, TxError, TxResult},
};

/// The maximum number of signatures on one envelope.
pub const MAX_SIGNATURES: usize = 20;

/// The maximum length of one signature, in bytes.
pub const MAX_SIGNATURE_LEN: usize = 64;

/// A signature with a hint identifying the signing key: the key's last 4 bytes.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DecoratedSignature {
    /// The last 4 bytes of the signer's public key
    pub hint: [u8; 4],
    /// The signature bytes
    pub signature: Vec<u8>,
}

impl ByteFormat for DecoratedSignature {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        4 + var_opaque_length(self.signature.len())
    }

    fn read_from<R>(reader: &mut R) -> SerResult<Self>
    where
        R: Read,
    {
        Ok(Self {
            hint: read_fixed_opaque(reader)?,
            signature: read_var_opaque(reader, MAX_SIGNATURE_LEN)?,
        })
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        let mut len = write_fixed_opaque(writer, &self.hint)?;
        len += write_var_opaque(writer, &self.signature, MAX_SIGNATURE_LEN)?;
        Ok(len)
    }
}

/// A transaction and its signatures. This is the document submitted to the network.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransactionEnvelope {
    tx: Transaction,
    signatures: Vec<DecoratedSignature>,
}

impl TransactionEnvelope {
    /// Wrap a transaction with no signatures.
    pub fn new(tx: Transaction) -> Self {
        Self {
            tx,
            signatures: vec![],
        }
    }

    /// The enclosed transaction.
    pub fn tx(&self) -> &Transaction {
        &self.tx
    }

    /// The signatures, in the order they were added.
    pub fn signatures(&self) -> &[DecoratedSignature] {
        &self.signatures
    }

    /// Append a signature. The 20-signature limit is enforced on encoding.
    pub fn add_signature(&mut self, signature: DecoratedSignature) -> &mut Self {
        self.signatures.push(signature);
        self
    }

    /// The hash of the enclosed transaction.
    pub fn hash(&self, network: &Network) -> TxResult<TxHash> {
        self.tx.hash(network)
    }
}

impl ByteFormat for TransactionEnvelope {
    type Error = TxError;

    fn serialized_length(&self) -> usize {
        self.tx.serialized_length() + self.signatures.serialized_length()
    }

    fn read_from<R>(reader: &mut R) -> TxResult<Self>
    where
        R: Read,
    {
        Ok(Self {
            tx: Transaction::read_from(reader)?,
            signatures: read_array::<_, DecoratedSignature>(reader, Some(MAX_SIGNATURES))?,
        })
    }

    fn write_to<W>(&self, writer: &mut W) -> TxResult<usize>
    where
        W: Write,
    {
        let mut len = self.tx.write_to(writer)?;
        len += write_array(writer, &self.signatures, Some(MAX_SIGNATURES))?;
        Ok(len)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{account::AccountId, memo::Memo, operation::Operation};

    fn envelope() -> TransactionEnvelope {
        let tx = Transaction::new(
            AccountId::from_ed25519([1u8; 32]),
            200,
            7,
            None,
            Memo::id(3),
            vec![
                Operation::bump_sequence(10),
                Operation::account_merge(AccountId::from_ed25519([2u8; 32])),
            ],
        );
        TransactionEnvelope::new(tx)
    }

    #[test]
    fn it_appends_signatures_after_the_transaction() {
        let mut env = envelope();
        let unsigned = env.to_bytes().unwrap();
        assert_eq!(&unsigned[unsigned.len() - 4..], &[0, 0, 0, 0]);

        env.add_signature(DecoratedSignature {
            hint: [9, 9, 9, 9],
            signature: vec![7u8; 64],
        });
        let signed = env.to_bytes().unwrap();
        assert_eq!(signed.len(), unsigned.len() + 4 + 4 + 64);
        assert_eq!(signed.len(), env.serialized_length());
        assert_eq!(&signed[..unsigned.len() - 4], &unsigned[..unsigned.len() - 4]);

        let decoded = TransactionEnvelope::from_bytes(&signed).unwrap();
        assert_eq!(decoded, env);
        assert_eq!(decoded.to_bytes().unwrap(), signed);

        let b64 = env.serialize_base64().unwrap();
        assert_eq!(TransactionEnvelope::deserialize_base64(&b64).unwrap(), env);
    }

    #[test]
    fn it_bounds_signatures() {
        let mut env = envelope();
        for _ in 0..=MAX_SIGNATURES {
            env.add_signature(DecoratedSignature {
                hint: [0; 4],
                signature: vec![0u8; 64],
            });
        }
        match env.to_bytes() {
            Err(TxError::SerError(SerError::LengthExceeded { max: 20, got: 21 })) => {}
            other => panic!("expected LengthExceeded, got {:?}", other),
        }

        let too_long = DecoratedSignature {
            hint: [0; 4],
            signature: vec![0u8; 65],
        };
        assert!(too_long.to_bytes().is_err());
    }
}
