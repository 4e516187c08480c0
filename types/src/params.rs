//! Protocol parameters: reward split, reprice clamps and oracle bounds.
//!
//! Every percentage is an 18-decimal fixed-point fraction (`WAD` = 100%).
//! Parameters are changed only through admin setters outside the reprice
//! path, and every setter re-validates the whole set.

use crate::address::Address;
use crate::error::ParamsError;
use crate::wad::WAD;
use serde::{Deserialize, Serialize};

/// 1% in WAD.
pub const ONE_PERCENT: u128 = WAD / 100;

/// What to do with the node-operator reward slice when no operator has an
/// active validator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroActiveValidatorsPolicy {
    /// Pay the whole reward to the treasury.
    #[default]
    RedirectToTreasury,
    /// Fail the reprice.
    Reject,
}

/// Parameters consumed by the repricing engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepricingParams {
    // ── Reward split ─────────────────────────────────────────────────────
    /// Share of new rewards minted to the treasury.
    #[serde(with = "crate::serde_u128")]
    pub treasury_reward_pct: u128,

    /// Share of new rewards minted to node operators.
    #[serde(with = "crate::serde_u128")]
    pub operator_reward_pct: u128,

    // ── Clamps ───────────────────────────────────────────────────────────
    /// Largest allowed move of the rate in one reprice, relative to the old rate.
    #[serde(with = "crate::serde_u128")]
    pub max_rate_diff_pct: u128,

    /// Largest allowed gap between reported and on-chain supply, relative to
    /// the on-chain supply.
    #[serde(with = "crate::serde_u128")]
    pub max_supply_diff_pct: u128,

    pub zero_active_validators: ZeroActiveValidatorsPolicy,
}

impl RepricingParams {
    pub fn reward_share(&self) -> u128 {
        self.treasury_reward_pct
            .saturating_add(self.operator_reward_pct)
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        let total = self
            .treasury_reward_pct
            .checked_add(self.operator_reward_pct)
            .ok_or(ParamsError::RewardPercentageTotalOverflow {
                total: u128::MAX,
                max: WAD,
            })?;
        if total > WAD {
            return Err(ParamsError::RewardPercentageTotalOverflow { total, max: WAD });
        }
        for value in [self.max_rate_diff_pct, self.max_supply_diff_pct] {
            check_pct(value)?;
        }
        Ok(())
    }
}

impl Default for RepricingParams {
    fn default() -> Self {
        Self {
            treasury_reward_pct: 5 * ONE_PERCENT,
            operator_reward_pct: 5 * ONE_PERCENT,
            max_rate_diff_pct: 2 * ONE_PERCENT,
            max_supply_diff_pct: ONE_PERCENT,
            zero_active_validators: ZeroActiveValidatorsPolicy::default(),
        }
    }
}

/// Parameters consumed by the snapshot validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleParams {
    /// Oldest snapshot block accepted, in blocks behind the current height.
    pub max_snapshot_staleness_blocks: u64,

    /// Largest allowed gap between the repriced rate and the independently
    /// recomputed reference rate.
    #[serde(with = "crate::serde_u128")]
    pub max_reference_diff_pct: u128,

    /// Whether the external reserve attestation is consulted.
    pub reserve_attestation_enabled: bool,

    /// Largest allowed gap between reported and attested consensus balance,
    /// relative to the attested value.
    #[serde(with = "crate::serde_u128")]
    pub max_por_diff_pct: u128,

    /// Oldest attestation accepted, in seconds.
    pub por_staleness_secs: u64,
}

impl OracleParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        check_pct(self.max_reference_diff_pct)?;
        check_pct(self.max_por_diff_pct)
    }
}

impl Default for OracleParams {
    fn default() -> Self {
        Self {
            max_snapshot_staleness_blocks: 600,
            max_reference_diff_pct: ONE_PERCENT,
            reserve_attestation_enabled: false,
            max_por_diff_pct: ONE_PERCENT,
            por_staleness_secs: 24 * 3600, // 1 day
        }
    }
}

/// All protocol parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolParams {
    /// Recipient of the treasury reward slice and of rounding remainders.
    pub treasury: Address,
    pub repricing: RepricingParams,
    pub oracle: OracleParams,
}

impl ProtocolParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        self.repricing.validate()?;
        self.oracle.validate()
    }
}

/// Fail unless `value` is at most 100%.
pub fn check_pct(value: u128) -> Result<(), ParamsError> {
    if value > WAD {
        return Err(ParamsError::PercentageTooLarge { value, max: WAD });
    }
    Ok(())
}
