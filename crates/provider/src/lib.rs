//! Network connections for `lumens`.
//!
//! The `horizon` feature (on by default) provides `HorizonProvider`, which implements both
//! the `AccountState` and `Submitter` collaborators over the Horizon HTTP API.
//!
//! ```no_run
//! # #[cfg(feature = "horizon")]
//! # async fn example() -> Result<(), lumens::builder::BuilderError> {
//! use std::sync::Arc;
//! use lumens::prelude::*;
//! use lumens_provider::HorizonProvider;
//!
//! let horizon = Arc::new(HorizonProvider::default());
//! let keypair = Keypair::random();
//!
//! let response = TransactionBuilder::from_account(keypair.public_key())
//!     .account_state(horizon.clone())
//!     .submitter(horizon)
//!     .operation(Operation::bump_sequence(0))
//!     .submit(&keypair)
//!     .await?;
//! println!("{}", response.hash);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

#[cfg(feature = "horizon")]
pub mod horizon;

#[cfg(feature = "horizon")]
pub use horizon::*;

pub use lumens::provider::{AccountState, ProviderError, SubmitResponse, Submitter};
