//! Holds the documents that make up a transaction, and their canonical encodings.

pub mod account;
pub mod asset;
pub mod envelope;
pub mod memo;
pub mod operation;
pub mod time_bounds;
pub mod transaction;

pub use account::*;
pub use asset::*;
pub use envelope::*;
pub use memo::*;
pub use operation::*;
pub use time_bounds::*;
pub use transaction::*;
