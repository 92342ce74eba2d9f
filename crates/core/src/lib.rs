//! # Lumens Core
//!
//! `lumens-core` contains the encoding rules and utilities used by the `lumens`
//! and `lumens-provider` crates.
//!
//! ## Crate Layout
//!
//! ### Ser
//!
//! The `ByteFormat` trait is a simple serialization API using
//! `std::io::{Read, Write}`. Implementers define the canonical (XDR-style)
//! binary format of the type: big-endian fixed-width integers, length-prefixed
//! arrays, discriminant-prefixed unions and 4-byte aligned opaque data. The
//! module also exposes the primitive encoders as free functions, so composite
//! types can describe their layout field by field.
//!
//! `ByteFormat` has an associated `Error` type. Most basic types can simply
//! use the provided `SerError`. More complex types (e.g. transactions) define
//! a custom error type that is easily instantiated from a `SerError` or an
//! `std::io::Error`.
//!
//! ### Hashes
//!
//! The hashes module provides a sha256 `Write` sink and utilities for
//! newtyping hash outputs. E.g. a transaction hash is a marked sha256 digest
//! that cannot be confused with a memo hash of the same length.
//!
//! ### Enc
//!
//! Strkey encoding: the base32 + crc16 text form of account ids and seeds.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

#[macro_use]
pub mod macros;

pub mod enc;
pub mod hashes;
pub mod prelude;
pub mod ser;
