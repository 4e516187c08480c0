use lsd_types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::distribution::Payout;

/// Record of an applied reprice, carrying pre- and post-state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepriceEvent {
    pub pre_reward_reserves: u128,
    pub new_rewards: u128,
    pub reported_supply: u128,
    pub actual_supply: u128,
    pub old_rate: u128,
    pub new_rate: u128,
    pub rewards_in_token: u128,
    pub operator_rewards: u128,
    pub treasury_rewards: u128,
    pub distributions: Vec<Payout>,
    pub at: Timestamp,
}
