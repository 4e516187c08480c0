//! The staking ledger.
//!
//! [`StakingLedger`] owns the role registry, pause flags, operator registry,
//! repricing engine and snapshot validator. Every mutating entry point
//! resolves the caller's capability first, then checks the pause flag that
//! guards it, then delegates. Outside systems (token, deposit pool, exit
//! queue, reserve feed) are injected per call through [`Collaborators`].
//!
//! All calls run to completion under `&mut self`; [`SharedLedger`] serializes
//! them across threads behind a single mutex.

pub mod config;
pub mod error;
pub mod shared;
pub mod staking;

pub use config::{LedgerConfig, RoleAssignments};
pub use error::LedgerError;
pub use shared::SharedLedger;
pub use staking::{Collaborators, LedgerSummary, StakingLedger};
