//! Nullable deposit pool and exit queue.

use lsd_types::{DepositPool, ExitQueue};

#[derive(Clone, Debug, Default)]
pub struct NullDepositPool {
    total_deposited: u128,
}

impl NullDepositPool {
    pub fn new(total_deposited: u128) -> Self {
        Self { total_deposited }
    }

    pub fn deposit(&mut self, amount: u128) {
        self.total_deposited += amount;
    }
}

impl DepositPool for NullDepositPool {
    fn total_eth_deposited(&self) -> u128 {
        self.total_deposited
    }
}

#[derive(Clone, Debug, Default)]
pub struct NullExitQueue {
    total_exited: u128,
    exiting: u128,
    processed: Vec<u64>,
}

impl NullExitQueue {
    pub fn new(total_exited: u128, exiting: u128) -> Self {
        Self {
            total_exited,
            exiting,
            processed: Vec::new(),
        }
    }

    /// Queue a redemption of `amount` ETH.
    pub fn request_exit(&mut self, amount: u128) {
        self.exiting += amount;
    }

    /// Pay out `amount` of the queued ETH.
    pub fn settle(&mut self, amount: u128) {
        let amount = amount.min(self.exiting);
        self.exiting -= amount;
        self.total_exited += amount;
    }

    /// Cutoffs passed to `process_withdrawals`, in call order.
    pub fn processed(&self) -> &[u64] {
        &self.processed
    }
}

impl ExitQueue for NullExitQueue {
    fn total_eth_exited(&self) -> u128 {
        self.total_exited
    }

    fn exiting_eth(&self) -> u128 {
        self.exiting
    }

    fn process_withdrawals(&mut self, upto_id: u64) {
        self.processed.push(upto_id);
    }
}
