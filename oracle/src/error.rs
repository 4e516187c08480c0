//! Oracle errors. A rejected snapshot changes nothing.

use lsd_access::AccessError;
use lsd_registry::RegistryError;
use lsd_repricing::RepricingError;
use lsd_types::{MathError, ParamsError, Timestamp};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("arithmetic error in snapshot accounting: {0}")]
    Math(#[from] MathError),

    #[error("invalid parameters: {0}")]
    Params(#[from] ParamsError),

    #[error("reprice rejected: {0}")]
    Repricing(#[from] RepricingError),

    #[error("validator deactivation rejected: {0}")]
    Registry(#[from] RegistryError),

    // ── Ordering ──
    #[error("snapshot builds on block {got}, last accepted snapshot is at block {expected}")]
    RepriceBlockOfLastSnapshotMismatch { expected: u64, got: u64 },

    #[error("snapshot block {block_number} is not after previous snapshot block {block_of_last_snapshot}")]
    SnapshotBlockNotAfterPrevious {
        block_number: u64,
        block_of_last_snapshot: u64,
    },

    #[error("snapshot slot {slot} is not after previous slot {last_slot}")]
    SnapshotSlotNotAfterPrevious { slot: u64, last_slot: u64 },

    #[error("snapshot timestamp {timestamp} is not after previous timestamp {last_timestamp}")]
    SnapshotTimestampNotAfterPrevious {
        timestamp: Timestamp,
        last_timestamp: Timestamp,
    },

    #[error("snapshot timestamp {timestamp} is not before current time {now}")]
    SnapshotTimestampNotInPast { timestamp: Timestamp, now: Timestamp },

    #[error("snapshot block {block_number} is not before current block {current}")]
    SnapshotBlockNotInPast { block_number: u64, current: u64 },

    #[error("snapshot is {age} blocks old, limit is {max}")]
    SnapshotTooStale { age: u64, max: u64 },

    // ── Consistency ──
    #[error("reported total exited {reported} does not match exit queue total {actual}")]
    TotalEthExitedMismatch { reported: u128, actual: u128 },

    #[error("exit queue exiting ETH {actual} is below reported {reported}")]
    ExitingEthDecreased { reported: u128, actual: u128 },

    #[error("reported total deposited {reported} is below last snapshot's {last}")]
    TotalEthDepositedDecreased { reported: u128, last: u128 },

    #[error("reported total exited {reported} is below last snapshot's {last}")]
    TotalEthExitedDecreased { reported: u128, last: u128 },

    #[error("snapshot deductions exceed reported balances")]
    SnapshotReservesUnderflow,

    // ── Reserve attestation ──
    #[error("reserve attestation is enabled but no feed is connected")]
    ReserveAttestationMissing,

    #[error("reserve attestation from {updated_at} is stale at {now}")]
    ExternalPoRStale { updated_at: Timestamp, now: Timestamp },

    #[error("reported consensus balance {reported} is too far from attested {attested}")]
    ReservesExternalPoRDiffTooHigh { reported: u128, attested: u128 },

    // ── Reference rate ──
    #[error("repriced rate {new_rate} diverges from reference rate {reference_rate}")]
    ReferencePriceDiffTooHigh { new_rate: u128, reference_rate: u128 },
}
