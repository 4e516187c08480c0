//! ETH amount units.
//!
//! Amounts are raw wei held in `u128` (enough for ~3.4e20 ETH). Token
//! supplies use the same 18-decimal unit as ETH.

/// An amount of wei (or of redemption-token base units).
pub type Wei = u128;

/// 1 ETH in wei.
pub const ETH: Wei = 1_000_000_000_000_000_000;

/// Convert whole ETH to wei, `None` on overflow.
pub fn eth(whole: u128) -> Option<Wei> {
    whole.checked_mul(ETH)
}
