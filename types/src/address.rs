//! Account addresses.
//!
//! Operator controllers, reward recipients, the treasury and role holders
//! are all 20-byte ledger accounts.

pub use alloy_primitives::Address;

/// Deterministic address whose last byte is `n`, for fixtures and scenarios.
pub fn address_from_byte(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[19] = n;
    Address::from(bytes)
}
