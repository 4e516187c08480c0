//! Nullable proof-of-reserve feed.

use lsd_types::{ReserveAttestation, Timestamp};

#[derive(Clone, Copy, Debug, Default)]
pub struct NullReserveAttestation {
    value: u128,
    updated_at: Timestamp,
}

impl NullReserveAttestation {
    pub fn new(value: u128, updated_at: Timestamp) -> Self {
        Self { value, updated_at }
    }

    pub fn update(&mut self, value: u128, updated_at: Timestamp) {
        self.value = value;
        self.updated_at = updated_at;
    }
}

impl ReserveAttestation for NullReserveAttestation {
    fn latest_value(&self) -> (u128, Timestamp) {
        (self.value, self.updated_at)
    }
}
