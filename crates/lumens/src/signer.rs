//! Transaction signing.
//!
//! Signers sign the transaction hash, never the raw transaction bytes. `Keypair` is the
//! ed25519 signer used by ordinary accounts.

use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use lumens_core::enc::{decode_strkey_32, encode_strkey, EncodingError, VersionByte};

use crate::{
    hashes::TxHash,
    types::{account::AccountId, envelope::DecoratedSignature},
};

/// Something that can sign transaction hashes.
pub trait TxSigner {
    /// The public key that verifies this signer's signatures.
    fn public_key(&self) -> AccountId;

    /// Sign a transaction hash.
    fn sign_hash(&self, hash: &TxHash) -> [u8; 64];

    /// Sign a transaction hash and attach the key's signature hint.
    fn decorated_signature(&self, hash: &TxHash) -> DecoratedSignature {
        DecoratedSignature {
            hint: self.public_key().signature_hint(),
            signature: self.sign_hash(hash).to_vec(),
        }
    }
}

/// Check an ed25519 signature over a transaction hash against an account's key. Malformed keys
/// and signatures do not verify.
pub fn verify(account: &AccountId, hash: &TxHash, signature: &[u8]) -> bool {
    let key = match VerifyingKey::from_bytes(account.as_bytes()) {
        Ok(key) => key,
        Err(_) => return false,
    };
    match Signature::from_slice(signature) {
        Ok(signature) => key.verify(&hash.0, &signature).is_ok(),
        Err(_) => false,
    }
}

/// An ed25519 keypair.
#[derive(Clone)]
pub struct Keypair {
    key: SigningKey,
}

impl Keypair {
    /// Derive a keypair from a raw 32-byte seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(&seed),
        }
    }

    /// Parse an `S...` secret seed strkey.
    pub fn from_secret_seed(s: &str) -> Result<Self, EncodingError> {
        decode_strkey_32(VersionByte::Seed, s).map(Self::from_seed)
    }

    /// Generate a new keypair from the OS random number generator.
    pub fn random() -> Self {
        Self {
            key: SigningKey::generate(&mut rand::rngs::OsRng),
        }
    }

    /// The `S...` secret seed strkey.
    pub fn secret_seed(&self) -> String {
        encode_strkey(VersionByte::Seed, &self.key.to_bytes())
    }

    /// Check a signature made by this keypair.
    pub fn verify(&self, hash: &TxHash, signature: &[u8]) -> bool {
        verify(&self.public_key(), hash, signature)
    }
}

impl TxSigner for Keypair {
    fn public_key(&self) -> AccountId {
        AccountId::from_ed25519(self.key.verifying_key().to_bytes())
    }

    fn sign_hash(&self, hash: &TxHash) -> [u8; 64] {
        self.key.sign(&hash.0).to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}
