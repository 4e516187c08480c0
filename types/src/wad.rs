//! 18-decimal fixed-point ("WAD") arithmetic.
//!
//! Values are `u128` raw units where `WAD` (1e18) represents 1.0. Products are
//! formed in 256 bits before dividing, so `a × b / c` never loses precision to
//! an intermediate overflow; only a final quotient that does not fit `u128`
//! fails. Every operation multiplies first and divides last.

use crate::error::MathError;
use alloy_primitives::U256;

/// 1.0 in 18-decimal fixed point.
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// `a × b / denominator`, rounded down, with a 256-bit intermediate product.
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128, MathError> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }
    let product = U256::from(a) * U256::from(b);
    let quotient = product / U256::from(denominator);
    u128::try_from(quotient).map_err(|_| MathError::Overflow)
}

/// Fixed-point product: `a × b / 1e18`.
pub fn wad_mul(a: u128, b: u128) -> Result<u128, MathError> {
    mul_div(a, b, WAD)
}

/// Fixed-point quotient: `a × 1e18 / b`.
pub fn wad_div(a: u128, b: u128) -> Result<u128, MathError> {
    mul_div(a, WAD, b)
}

pub fn checked_add(a: u128, b: u128) -> Result<u128, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

pub fn checked_sub(a: u128, b: u128) -> Result<u128, MathError> {
    a.checked_sub(b).ok_or(MathError::Underflow)
}

/// Whether `|value − reference| ≤ reference × max_pct`.
///
/// The comparison is one-sided in its denominator: callers that need a
/// symmetric bound must check both orientations.
pub fn within_pct_of(value: u128, reference: u128, max_pct: u128) -> Result<bool, MathError> {
    let allowed = wad_mul(reference, max_pct)?;
    Ok(value.abs_diff(reference) <= allowed)
}
