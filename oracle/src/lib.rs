//! Snapshot oracle.
//!
//! Off-chain reporters submit [`lsd_types::RepriceSnapshot`]s. The
//! [`SnapshotValidator`] checks each one against its predecessor, the live
//! exit queue and an optional proof-of-reserve feed, derives pre-reward
//! reserves and new rewards, and drives the repricing engine. Before the
//! reprice is committed its resulting rate is compared against a reference
//! rate recomputed from live state; a rate that went down trips the
//! protocol-wide halt.

pub mod accounting;
pub mod context;
pub mod error;
pub mod validator;

pub use accounting::{reference_rate, RewardEstimate};
pub use context::OracleContext;
pub use error::OracleError;
pub use validator::{SnapshotOutcome, SnapshotValidator};
