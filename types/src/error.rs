//! Low-level error types shared across crates.

use thiserror::Error;

/// Failure of a fixed-point or integer operation.
///
/// Every arithmetic path in the core fails with one of these instead of
/// wrapping or saturating silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("arithmetic underflow")]
    Underflow,

    #[error("division by zero")]
    DivisionByZero,
}

/// Malformed validator key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid pubkey length: expected {expected} bytes, got {actual}")]
    InvalidPubKeyLength { expected: usize, actual: usize },

    #[error("invalid signature length: expected {expected} bytes, got {actual}")]
    InvalidSignatureLength { expected: usize, actual: usize },

    #[error("invalid hex encoding: {0}")]
    InvalidHex(String),
}

/// Rejected protocol parameter values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("reward percentages sum to {total}, above 100% ({max})")]
    RewardPercentageTotalOverflow { total: u128, max: u128 },

    #[error("percentage {value} exceeds 100% ({max})")]
    PercentageTooLarge { value: u128, max: u128 },
}
