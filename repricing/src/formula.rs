//! The reprice formula, free of state.
//!
//! ```text
//! total_reserves   = pre_reward_reserves + new_rewards
//! rewards_in_eth   = new_rewards × reward_share
//! rewards_in_token = supply × rewards_in_eth / (total_reserves − rewards_in_eth)
//! new_rate         = total_reserves / (supply + rewards_in_token)
//! ```
//!
//! The token denominator subtracts the fee slice so the minted tokens are
//! worth exactly `rewards_in_eth` at the new rate.

use lsd_types::wad::{checked_add, checked_sub, mul_div, wad_div, wad_mul};
use lsd_types::MathError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepriceQuote {
    pub total_reserves: u128,
    pub rewards_in_eth: u128,
    pub rewards_in_token: u128,
    pub new_rate: u128,
}

/// Evaluate the reprice formula. `supply` must be non-zero.
pub fn quote(
    pre_reward_reserves: u128,
    new_rewards: u128,
    supply: u128,
    reward_share: u128,
) -> Result<RepriceQuote, MathError> {
    let total_reserves = checked_add(pre_reward_reserves, new_rewards)?;
    let rewards_in_eth = wad_mul(new_rewards, reward_share)?;
    let rewards_in_token = if rewards_in_eth == 0 {
        0
    } else {
        mul_div(supply, rewards_in_eth, checked_sub(total_reserves, rewards_in_eth)?)?
    };
    let new_rate = wad_div(total_reserves, checked_add(supply, rewards_in_token)?)?;
    Ok(RepriceQuote {
        total_reserves,
        rewards_in_eth,
        rewards_in_token,
        new_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsd_types::{ONE_PERCENT, WAD};

    #[test]
    fn ten_percent_fee_on_ten_percent_yield() {
        let q = quote(100 * WAD, 10 * WAD, 100 * WAD, 10 * ONE_PERCENT).unwrap();
        assert_eq!(q.total_reserves, 110 * WAD);
        assert_eq!(q.rewards_in_eth, WAD);
        // 100 / 109 tokens
        assert_eq!(q.rewards_in_token, 917_431_192_660_550_458);
        assert_eq!(q.new_rate, 1_090_000_000_000_000_000);
    }

    #[test]
    fn minted_tokens_are_worth_the_fee() {
        let q = quote(100 * WAD, 10 * WAD, 100 * WAD, 10 * ONE_PERCENT).unwrap();
        let value = wad_mul(q.rewards_in_token, q.new_rate).unwrap();
        assert!(q.rewards_in_eth - value <= 1);
    }

    #[test]
    fn zero_share_keeps_supply() {
        let q = quote(300 * WAD, 3 * WAD, 200 * WAD, 0).unwrap();
        assert_eq!(q.rewards_in_token, 0);
        assert_eq!(q.new_rate, wad_div(303 * WAD, 200 * WAD).unwrap());
    }

    #[test]
    fn no_rewards_keeps_backing_ratio() {
        let q = quote(100 * WAD, 0, 80 * WAD, 10 * ONE_PERCENT).unwrap();
        assert_eq!(q.rewards_in_token, 0);
        assert_eq!(q.new_rate, 1_250_000_000_000_000_000);
    }

    #[test]
    fn overflowing_reserves_fail() {
        assert_eq!(quote(u128::MAX, 1, WAD, 0), Err(MathError::Overflow));
    }
}
