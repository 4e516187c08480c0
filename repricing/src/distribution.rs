//! Splitting minted reward tokens between operators and the treasury.

use lsd_registry::{NodeOperatorRegistry, OperatorId};
use lsd_types::wad::{checked_sub, mul_div};
use lsd_types::{Address, RepricingParams, ZeroActiveValidatorsPolicy};
use serde::{Deserialize, Serialize};

use crate::error::RepricingError;

/// Tokens minted to one operator's reward address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub operator_id: OperatorId,
    pub reward_address: Address,
    pub amount: u128,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    /// Sum of all operator payouts.
    pub operator_rewards: u128,
    /// Everything not paid to operators, rounding dust included.
    pub treasury_rewards: u128,
    pub payouts: Vec<Payout>,
}

/// Split `rewards_in_token` by the configured percentages.
///
/// The operator slice is `rewards_in_token × operator_pct / reward_share`,
/// paid pro rata to each operator's active validator count in ascending id
/// order. The treasury receives `rewards_in_token` minus what operators got,
/// so the split always sums to `rewards_in_token`.
pub fn distribute(
    rewards_in_token: u128,
    params: &RepricingParams,
    registry: &NodeOperatorRegistry,
) -> Result<Distribution, RepricingError> {
    let reward_share = params.reward_share();
    if rewards_in_token == 0 || reward_share == 0 {
        return Ok(Distribution {
            treasury_rewards: rewards_in_token,
            ..Distribution::default()
        });
    }

    let operator_slice = mul_div(rewards_in_token, params.operator_reward_pct, reward_share)?;
    let total_active = registry.total_active_validators();
    let mut payouts = Vec::new();
    let mut operator_rewards = 0u128;

    if operator_slice > 0 && total_active == 0 {
        match params.zero_active_validators {
            ZeroActiveValidatorsPolicy::Reject => return Err(RepricingError::NoActiveValidators),
            ZeroActiveValidatorsPolicy::RedirectToTreasury => {
                tracing::debug!(operator_slice, "no active validators, operator slice goes to treasury");
            }
        }
    } else if operator_slice > 0 {
        for operator in registry.operators() {
            if operator.active_validator_count == 0 {
                continue;
            }
            let amount = mul_div(
                operator_slice,
                u128::from(operator.active_validator_count),
                u128::from(total_active),
            )?;
            if amount == 0 {
                continue;
            }
            operator_rewards += amount;
            payouts.push(Payout {
                operator_id: operator.id,
                reward_address: operator.reward_address,
                amount,
            });
        }
    }

    Ok(Distribution {
        operator_rewards,
        treasury_rewards: checked_sub(rewards_in_token, operator_rewards)?,
        payouts,
    })
}
