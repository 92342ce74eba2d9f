//! Holds utilites for working with cryptographic digests, and disambiguating digests via marker
//! traits.
//!
//! We want to wrap hashes in marked newtypes in order to prevent type-confusion between
//! transaction hashes, network ids, and other digests with the same length.

/// Marked hashes
pub mod marked;

/// Tooling for sha256
pub mod sha256;

pub use marked::*;
pub use sha256::*;
