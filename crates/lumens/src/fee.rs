//! Fee strategies.
//!
//! The fee is never set directly on a builder. It is derived from the operation count by a
//! `FeeStrategy` at encode time, so congestion-aware pricing can be slotted in later.

/// The base fee per operation, in stroops.
pub const BASE_FEE: u32 = 100;

/// Derives a transaction fee from its operation count.
pub trait FeeStrategy: Send + Sync + std::fmt::Debug {
    /// The total fee, in stroops, for a transaction with `operation_count` operations.
    fn fee(&self, operation_count: usize) -> u32;
}

/// A constant price per operation. Saturates at `u32::MAX`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FixedFee {
    /// The price of one operation, in stroops
    pub per_operation: u32,
}

impl FixedFee {
    /// Instantiate a fixed per-operation fee.
    pub fn new(per_operation: u32) -> Self {
        Self { per_operation }
    }
}

impl Default for FixedFee {
    fn default() -> Self {
        Self::new(BASE_FEE)
    }
}

impl FeeStrategy for FixedFee {
    fn fee(&self, operation_count: usize) -> u32 {
        let count = u32::try_from(operation_count).unwrap_or(u32::MAX);
        count.saturating_mul(self.per_operation)
    }
}
