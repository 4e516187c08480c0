//! Interfaces of the systems the accounting core talks to but does not own.
//!
//! Production wires these to the real token, deposit pool and exit queue;
//! tests use the implementations in `lsd-nullables`.

use crate::address::Address;
use crate::time::Timestamp;

/// The liquid staking token rewards are minted into.
pub trait TokenLedger {
    /// Current on-chain total supply.
    fn total_supply(&self) -> u128;

    fn mint(&mut self, to: &Address, amount: u128);
}

/// The deposit pool holding ETH staked by users.
pub trait DepositPool {
    /// Cumulative ETH ever deposited into validators.
    fn total_eth_deposited(&self) -> u128;
}

/// The withdrawal queue that pays out redeemed tokens.
pub trait ExitQueue {
    /// Cumulative ETH paid out to redeeming holders.
    fn total_eth_exited(&self) -> u128;

    /// ETH currently owed to holders waiting in the queue.
    fn exiting_eth(&self) -> u128;

    /// Settle queued withdrawals up to and including `upto_id`.
    fn process_withdrawals(&mut self, upto_id: u64);
}

/// An external proof-of-reserve feed.
pub trait ReserveAttestation {
    /// The attested consensus-layer balance and when it was last updated.
    fn latest_value(&self) -> (u128, Timestamp);
}
