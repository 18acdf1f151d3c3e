//! SKR token amounts.

/// Raw units per whole SKR token (9 decimals, lamport-style).
pub const SKR_UNIT: u64 = 1_000_000_000;

/// An SKR amount in raw units.
pub type SkrAmount = u64;
