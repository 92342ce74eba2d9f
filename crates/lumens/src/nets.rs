//! Network identification. Every transaction hash commits to the network it is valid on, via
//! the sha256 of the network passphrase.

use std::io::Write;

use lumens_core::{
    hashes::{sha256, MarkedDigest},
    ser::{ByteFormat, SerResult},
};

use crate::hashes::NetworkId;

/// The passphrase of the public network
pub const PUBLIC_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// The passphrase of the test network
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// A network, identified by its passphrase.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Network {
    passphrase: String,
}

impl Default for Network {
    fn default() -> Self {
        Self::testnet()
    }
}

impl Network {
    /// A network with a custom passphrase, e.g. a standalone or private network.
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: passphrase.into(),
        }
    }

    /// The public network
    pub fn public() -> Self {
        Self::new(PUBLIC_PASSPHRASE)
    }

    /// The test network
    pub fn testnet() -> Self {
        Self::new(TESTNET_PASSPHRASE)
    }

    /// Return the passphrase
    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    /// Return the network id, the sha256 of the passphrase.
    pub fn id(&self) -> NetworkId {
        NetworkId::new(sha256(self.passphrase.as_bytes()))
    }

    /// Write the network id, the first component of every signature payload.
    pub fn write_id<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        self.id().write_to(writer)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_derives_network_ids() {
        assert_eq!(
            Network::public().id().to_hex(),
            "7ac33997544e3175d266bd022439b22cdb16508c01163f26e5cb2a3e1045a979"
        );
        assert_eq!(
            Network::testnet().id().to_hex(),
            "cee0302d59844d32bdca915c8203dd44b33fbb7edc19051ea37abedf28ecd472"
        );
        assert_eq!(Network::default(), Network::testnet());
        assert_eq!(
            Network::new("Standalone Network ; February 2017").passphrase(),
            "Standalone Network ; February 2017"
        );
    }
}
