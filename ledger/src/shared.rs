//! Thread-safe handle that serializes every ledger call.

use std::sync::{Arc, Mutex};

use crate::error::LedgerError;
use crate::staking::StakingLedger;

/// Cloneable handle to one [`StakingLedger`].
///
/// Each call holds the lock for its whole duration, so calls never
/// interleave.
#[derive(Clone, Debug)]
pub struct SharedLedger {
    inner: Arc<Mutex<StakingLedger>>,
}

impl SharedLedger {
    pub fn new(ledger: StakingLedger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Run `f` with exclusive access to the ledger.
    pub fn with<R>(&self, f: impl FnOnce(&mut StakingLedger) -> R) -> Result<R, LedgerError> {
        let mut guard = self.inner.lock().map_err(|_| LedgerError::Poisoned)?;
        Ok(f(&mut guard))
    }

    /// Like [`Self::with`] for calls that already return a ledger result.
    pub fn try_with<R>(
        &self,
        f: impl FnOnce(&mut StakingLedger) -> Result<R, LedgerError>,
    ) -> Result<R, LedgerError> {
        self.with(f)?
    }
}
