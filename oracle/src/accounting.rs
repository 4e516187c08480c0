//! Reserve accounting between two consecutive snapshots.

use lsd_repricing::quote;
use lsd_types::wad::{checked_add, checked_sub};
use lsd_types::MathError;
use serde::{Deserialize, Serialize};

/// Rewards earned since the previous snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEstimate {
    pub total_reserves: u128,
    pub pre_reward_reserves: u128,
    pub new_rewards: u128,
}

impl RewardEstimate {
    /// Split `total_reserves` into what was there before and what was earned.
    ///
    /// Pre-reward reserves are the previous total plus deposits minus exits
    /// since then. A loss yields zero rewards with pre-reward reserves equal
    /// to the new total, so the reprice lowers the rate.
    pub fn between(
        last_total_reserves: u128,
        last_deposited: u128,
        last_exited: u128,
        deposited: u128,
        exited: u128,
        total_reserves: u128,
    ) -> Result<Self, MathError> {
        let deposited_since = checked_sub(deposited, last_deposited)?;
        let exited_since = checked_sub(exited, last_exited)?;
        let expected = checked_sub(checked_add(last_total_reserves, deposited_since)?, exited_since)?;
        if total_reserves >= expected {
            Ok(Self {
                total_reserves,
                pre_reward_reserves: expected,
                new_rewards: total_reserves - expected,
            })
        } else {
            Ok(Self {
                total_reserves,
                pre_reward_reserves: total_reserves,
                new_rewards: 0,
            })
        }
    }
}

/// Rate the reprice formula yields for `estimate` at `supply`.
pub fn reference_rate(estimate: &RewardEstimate, supply: u128, reward_share: u128) -> Result<u128, MathError> {
    Ok(quote(estimate.pre_reward_reserves, estimate.new_rewards, supply, reward_share)?.new_rate)
}
