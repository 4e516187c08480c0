//! Nullable chain clock: deterministic block height and time.

use lsd_types::{BlockEnv, Timestamp};
use std::cell::Cell;

/// Seconds per block used by [`NullChain::advance_blocks`].
pub const SECONDS_PER_BLOCK: u64 = 12;

/// A deterministic chain head for testing.
///
/// Height and time only advance when you tell them to.
pub struct NullChain {
    number: Cell<u64>,
    timestamp: Cell<u64>,
}

impl NullChain {
    pub fn new(number: u64, timestamp_secs: u64) -> Self {
        Self {
            number: Cell::new(number),
            timestamp: Cell::new(timestamp_secs),
        }
    }

    /// The current block context.
    pub fn env(&self) -> BlockEnv {
        BlockEnv::new(self.number.get(), self.timestamp.get())
    }

    pub fn number(&self) -> u64 {
        self.number.get()
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.timestamp.get())
    }

    /// Mine `blocks` blocks, [`SECONDS_PER_BLOCK`] apart.
    pub fn advance_blocks(&self, blocks: u64) {
        self.number.set(self.number.get() + blocks);
        self.timestamp
            .set(self.timestamp.get() + blocks * SECONDS_PER_BLOCK);
    }

    /// Move time forward without producing blocks.
    pub fn advance_secs(&self, secs: u64) {
        self.timestamp.set(self.timestamp.get() + secs);
    }

    pub fn set(&self, number: u64, timestamp_secs: u64) {
        self.number.set(number);
        self.timestamp.set(timestamp_secs);
    }
}

impl Default for NullChain {
    fn default() -> Self {
        Self::new(1, 1_700_000_000)
    }
}
