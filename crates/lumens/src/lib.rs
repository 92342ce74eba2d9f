//! Stellar-style transaction construction in Rust.
//!
//! The `TransactionBuilder` accumulates a source account, optional time bounds, a memo and an
//! ordered list of operations. When asked to encode, hash, sign or submit, it resolves the
//! current sequence number from an attached `AccountState` collaborator, derives the fee from
//! its `FeeStrategy`, and writes every field in canonical order.
//!
//! ```no_run
//! use lumens::prelude::*;
//!
//! # async fn example<P: AccountState + 'static>(provider: P) -> Result<(), BuilderError> {
//! let destination: AccountId = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF".parse()?;
//! let keypair = Keypair::random();
//!
//! let envelope = TransactionBuilder::from_account(keypair.public_key())
//!     .network(Network::testnet())
//!     .account_state(provider)
//!     .memo(Memo::text("hello")?)
//!     .operation(Operation::create_account(destination, 50 * STROOPS_PER_LUMEN))
//!     .sign(&keypair)
//!     .await?;
//!
//! println!("{}", envelope.serialize_base64()?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod builder;
pub mod fee;
pub mod hashes;
pub mod nets;
pub mod prelude;
pub mod provider;
pub mod signer;
pub mod types;
