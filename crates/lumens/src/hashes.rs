//! This module holds `MarkedDigest` types used by transactions. Transaction hashes and network
//! ids are both sha256 digests, and are marked so they cannot be swapped for one another.

use lumens_core::mark_32_byte_hash;

mark_32_byte_hash!(
    /// A marked sha256 digest of a transaction's signature payload. This is the value signers
    /// sign, and the id the network reports for the transaction.
    TxHash
);

mark_32_byte_hash!(
    /// A marked sha256 digest of a network passphrase
    NetworkId
);

#[cfg(test)]
mod test {
    use super::*;
    use lumens_core::ser::ByteFormat;

    #[test]
    fn it_serializes_and_deserializes_tx_hashes() {
        let cases = [(
            TxHash::default(),
            "0000000000000000000000000000000000000000000000000000000000000000",
        )];
        for case in cases.iter() {
            let digest = TxHash::deserialize_hex(case.1).unwrap();
            assert_eq!(digest.serialized_length(), 32);
            assert_eq!(digest, case.0);
            assert_eq!(digest.serialize_hex().unwrap(), case.1);
            assert_eq!(case.0.to_hex(), case.1);
        }
    }

    #[test]
    fn it_passes_through_serde_as_hex() {
        let hash = TxHash::from([0xab; 32]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));
        assert_eq!(serde_json::from_str::<TxHash>(&json).unwrap(), hash);
    }
}
