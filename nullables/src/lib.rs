//! Nullable collaborators for deterministic testing.
//!
//! The accounting core never reads a clock or an external contract itself:
//! block context arrives as a [`lsd_types::BlockEnv`] and every outside
//! system sits behind a trait in [`lsd_types::collaborators`]. This crate
//! provides in-memory implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record the calls made into them
//!
//! Usage: swap real implementations for nullables in tests and scenario replay.

pub mod attestation;
pub mod clock;
pub mod pools;
pub mod token;

pub use attestation::NullReserveAttestation;
pub use clock::NullChain;
pub use pools::{NullDepositPool, NullExitQueue};
pub use token::NullToken;
