//! Re-exports of common types and traits.
pub use crate::{
    builder::*,
    fee::*,
    hashes::{NetworkId, TxHash},
    nets::*,
    provider::*,
    signer::*,
    types::*,
};

pub use lumens_core::prelude::*;
