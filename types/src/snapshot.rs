//! Reprice snapshots: self-contained reports of protocol-wide balances.
//!
//! A snapshot is produced off-chain at a specific block and submitted to the
//! oracle. Exactly one accepted snapshot is retained as the predecessor that
//! the next submission must reference.

use crate::error::MathError;
use crate::time::Timestamp;
use crate::wad::{checked_add, checked_sub};
use serde::{Deserialize, Serialize};

/// Where and when the snapshot was taken.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    /// Block the balances were read at.
    pub block_number: u64,
    /// Block number of the previously accepted snapshot this one builds on.
    pub block_of_last_snapshot: u64,
    /// Consensus-layer slot the balances were read at.
    pub slot: u64,
    /// Timestamp of `block_number`.
    pub timestamp: Timestamp,
}

/// ETH balances held across the execution and consensus layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveBalances {
    pub execution_layer: u128,
    pub consensus_v3: u128,
    pub consensus_v2: u128,
    /// ETH in flight between layers (deposits not yet visible on consensus).
    pub transitioning: u128,
}

impl ReserveBalances {
    pub fn total(&self) -> Result<u128, MathError> {
        let el_cl = checked_add(self.execution_layer, self.consensus_v3)?;
        let with_v2 = checked_add(el_cl, self.consensus_v2)?;
        checked_add(with_v2, self.transitioning)
    }
}

/// Protocol totals at the snapshot block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotState {
    /// Cumulative ETH ever deposited into the protocol.
    pub total_eth_deposited: u128,
    /// Redemption-token supply at the snapshot block.
    pub token_total_supply: u128,
    pub balances: ReserveBalances,
}

/// Exit-queue totals at the snapshot block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawState {
    /// Cumulative ETH paid out through the exit queue.
    pub total_eth_exited: u128,
    /// ETH owed to queued exits that have not been processed yet.
    pub exiting_eth: u128,
}

/// A complete reprice report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepriceSnapshot {
    pub meta: SnapshotMeta,
    pub state: SnapshotState,
    pub withdraw_state: WithdrawState,
    /// Balance included in `balances` that is owed to third parties as fees.
    pub rewards_payable_for_fees: u128,
}

impl RepriceSnapshot {
    /// ETH reserves that back the token supply.
    ///
    /// All reported balances, minus ETH owed to queued exits and fees owed to
    /// third parties. Fails if the deductions exceed the balances.
    pub fn total_reserves(&self) -> Result<u128, MathError> {
        let gross = self.state.balances.total()?;
        let net_of_exits = checked_sub(gross, self.withdraw_state.exiting_eth)?;
        checked_sub(net_of_exits, self.rewards_payable_for_fees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(el: u128, v3: u128, v2: u128, tr: u128, exiting: u128, fees: u128) -> RepriceSnapshot {
        RepriceSnapshot {
            state: SnapshotState {
                balances: ReserveBalances {
                    execution_layer: el,
                    consensus_v3: v3,
                    consensus_v2: v2,
                    transitioning: tr,
                },
                ..Default::default()
            },
            withdraw_state: WithdrawState {
                total_eth_exited: 0,
                exiting_eth: exiting,
            },
            rewards_payable_for_fees: fees,
            ..Default::default()
        }
    }

    #[test]
    fn total_reserves_nets_out_exits_and_fees() {
        let s = snapshot(10, 100, 20, 5, 15, 3);
        assert_eq!(s.total_reserves().unwrap(), 117);
    }

    #[test]
    fn total_reserves_rejects_underflow() {
        let s = snapshot(1, 1, 0, 0, 5, 0);
        assert_eq!(s.total_reserves(), Err(MathError::Underflow));
    }

    #[test]
    fn balances_total_rejects_overflow() {
        let s = snapshot(u128::MAX, 1, 0, 0, 0, 0);
        assert_eq!(s.total_reserves(), Err(MathError::Overflow));
    }
}
