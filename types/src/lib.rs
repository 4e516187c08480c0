//! Fundamental types for the LSD accounting core.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! 18-decimal fixed-point math, amounts, validator key material, addresses,
//! block/time context, reprice snapshots, and protocol parameters.

pub mod address;
pub mod amount;
pub mod collaborators;
pub mod error;
pub mod keys;
pub mod params;
pub mod serde_u128;
pub mod snapshot;
pub mod time;
pub mod wad;

pub use address::{address_from_byte, Address};
pub use amount::{Wei, ETH};
pub use collaborators::{DepositPool, ExitQueue, ReserveAttestation, TokenLedger};
pub use error::{KeyError, MathError, ParamsError};
pub use keys::{NewValidatorDetails, PubKey, ValidatorDetails, ValidatorSignature};
pub use params::{check_pct, OracleParams, ONE_PERCENT, ProtocolParams, RepricingParams, ZeroActiveValidatorsPolicy};
pub use snapshot::{ReserveBalances, RepriceSnapshot, SnapshotMeta, SnapshotState, WithdrawState};
pub use time::{BlockEnv, Timestamp};
pub use wad::WAD;
