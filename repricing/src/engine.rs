//! The repricing state machine.

use lsd_access::{Capability, Role};
use lsd_registry::NodeOperatorRegistry;
use lsd_types::wad::{mul_div, within_pct_of};
use lsd_types::{
    check_pct, Address, RepricingParams, Timestamp, TokenLedger, ZeroActiveValidatorsPolicy, WAD,
};
use serde::{Deserialize, Serialize};

use crate::distribution::{distribute, Distribution};
use crate::error::RepricingError;
use crate::event::RepriceEvent;
use crate::formula::{quote, RepriceQuote};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
enum RateState {
    /// No reprice yet; the rate reads as 1.0.
    #[default]
    Uninitialized,
    Primed { rate: u128 },
}

/// A fully checked reprice, ready to be committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepricePlan {
    pub pre_reward_reserves: u128,
    pub new_rewards: u128,
    pub reported_supply: u128,
    pub actual_supply: u128,
    pub old_rate: u128,
    pub quote: RepriceQuote,
    pub distribution: Distribution,
}

impl RepricePlan {
    pub fn new_rate(&self) -> u128 {
        self.quote.new_rate
    }
}

/// Holds the token/ETH rate and the parameters that bound how it may move.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RepricingEngine {
    params: RepricingParams,
    treasury: Address,
    state: RateState,
    last_reserves: u128,
    last_reprice_at: Timestamp,
}

impl RepricingEngine {
    pub fn new(params: RepricingParams, treasury: Address) -> Result<Self, RepricingError> {
        params.validate()?;
        Ok(Self {
            params,
            treasury,
            state: RateState::Uninitialized,
            last_reserves: 0,
            last_reprice_at: Timestamp::default(),
        })
    }

    // ── Reads ────────────────────────────────────────────────────────────

    /// Tokens-to-ETH rate in WAD; 1.0 until the first reprice.
    pub fn rate(&self) -> u128 {
        match self.state {
            RateState::Uninitialized => WAD,
            RateState::Primed { rate } => rate,
        }
    }

    pub fn is_primed(&self) -> bool {
        matches!(self.state, RateState::Primed { .. })
    }

    pub fn last_reserves(&self) -> u128 {
        self.last_reserves
    }

    pub fn last_reprice_at(&self) -> Timestamp {
        self.last_reprice_at
    }

    pub fn params(&self) -> &RepricingParams {
        &self.params
    }

    pub fn treasury(&self) -> Address {
        self.treasury
    }

    pub fn eth_to_token(&self, amount: u128) -> Result<u128, RepricingError> {
        Ok(mul_div(amount, WAD, self.rate())?)
    }

    pub fn token_to_eth(&self, amount: u128) -> Result<u128, RepricingError> {
        Ok(mul_div(amount, self.rate(), WAD)?)
    }

    // ── Reprice ──────────────────────────────────────────────────────────

    /// Check a reprice and compute its outcome without changing anything.
    pub fn plan<T: TokenLedger + ?Sized>(
        &self,
        registry: &NodeOperatorRegistry,
        token: &T,
        pre_reward_reserves: u128,
        new_rewards: u128,
        reported_supply: u128,
    ) -> Result<RepricePlan, RepricingError> {
        let actual_supply = token.total_supply();
        if reported_supply == 0 {
            return Err(RepricingError::ZeroReportedSupply);
        }
        if actual_supply == 0 {
            return Err(RepricingError::ZeroActualSupply);
        }
        if pre_reward_reserves == 0 {
            return Err(RepricingError::ZeroPreRewardReserves);
        }

        let quote = quote(
            pre_reward_reserves,
            new_rewards,
            reported_supply,
            self.params.reward_share(),
        )?;

        let old_rate = self.rate();
        if self.is_primed()
            && !within_pct_of(quote.new_rate, old_rate, self.params.max_rate_diff_pct)?
        {
            return Err(RepricingError::RepriceDifferenceTooLarge {
                old_rate,
                new_rate: quote.new_rate,
                max_pct: self.params.max_rate_diff_pct,
            });
        }
        if !within_pct_of(reported_supply, actual_supply, self.params.max_supply_diff_pct)? {
            return Err(RepricingError::RepriceSupplyDifferenceTooLarge {
                actual: actual_supply,
                reported: reported_supply,
                max_pct: self.params.max_supply_diff_pct,
            });
        }

        let distribution = distribute(quote.rewards_in_token, &self.params, registry)?;
        Ok(RepricePlan {
            pre_reward_reserves,
            new_rewards,
            reported_supply,
            actual_supply,
            old_rate,
            quote,
            distribution,
        })
    }

    /// Mint the planned rewards and store the new rate.
    pub fn commit<T: TokenLedger + ?Sized>(
        &mut self,
        plan: RepricePlan,
        token: &mut T,
        now: Timestamp,
    ) -> RepriceEvent {
        for payout in &plan.distribution.payouts {
            token.mint(&payout.reward_address, payout.amount);
        }
        if plan.distribution.treasury_rewards > 0 {
            token.mint(&self.treasury, plan.distribution.treasury_rewards);
        }

        self.state = RateState::Primed {
            rate: plan.quote.new_rate,
        };
        self.last_reserves = plan.quote.total_reserves;
        self.last_reprice_at = now;

        tracing::info!(
            old_rate = plan.old_rate,
            new_rate = plan.quote.new_rate,
            total_reserves = plan.quote.total_reserves,
            rewards_in_token = plan.quote.rewards_in_token,
            operators_paid = plan.distribution.payouts.len(),
            "repriced"
        );

        RepriceEvent {
            pre_reward_reserves: plan.pre_reward_reserves,
            new_rewards: plan.new_rewards,
            reported_supply: plan.reported_supply,
            actual_supply: plan.actual_supply,
            old_rate: plan.old_rate,
            new_rate: plan.quote.new_rate,
            rewards_in_token: plan.quote.rewards_in_token,
            operator_rewards: plan.distribution.operator_rewards,
            treasury_rewards: plan.distribution.treasury_rewards,
            distributions: plan.distribution.payouts,
            at: now,
        }
    }

    /// Plan and commit in one step. Requires a repricer capability.
    #[allow(clippy::too_many_arguments)]
    pub fn reprice<T: TokenLedger + ?Sized>(
        &mut self,
        cap: &Capability,
        registry: &NodeOperatorRegistry,
        token: &mut T,
        pre_reward_reserves: u128,
        new_rewards: u128,
        reported_supply: u128,
        now: Timestamp,
    ) -> Result<RepriceEvent, RepricingError> {
        cap.ensure(Role::Repricer)?;
        let plan = self.plan(registry, token, pre_reward_reserves, new_rewards, reported_supply)?;
        Ok(self.commit(plan, token, now))
    }

    // ── Admin setters ────────────────────────────────────────────────────

    pub fn set_reward_percentages(
        &mut self,
        cap: &Capability,
        treasury_pct: u128,
        operator_pct: u128,
    ) -> Result<(), RepricingError> {
        cap.ensure(Role::PlatformAdmin)?;
        let params = RepricingParams {
            treasury_reward_pct: treasury_pct,
            operator_reward_pct: operator_pct,
            ..self.params.clone()
        };
        params.validate()?;
        self.params = params;
        tracing::info!(treasury_pct, operator_pct, "reward percentages updated");
        Ok(())
    }

    pub fn set_max_rate_diff_pct(&mut self, cap: &Capability, pct: u128) -> Result<(), RepricingError> {
        cap.ensure(Role::PlatformAdmin)?;
        check_pct(pct)?;
        self.params.max_rate_diff_pct = pct;
        tracing::info!(pct, "max rate diff updated");
        Ok(())
    }

    pub fn set_max_supply_diff_pct(&mut self, cap: &Capability, pct: u128) -> Result<(), RepricingError> {
        cap.ensure(Role::PlatformAdmin)?;
        check_pct(pct)?;
        self.params.max_supply_diff_pct = pct;
        tracing::info!(pct, "max supply diff updated");
        Ok(())
    }

    pub fn set_treasury_address(&mut self, cap: &Capability, treasury: Address) -> Result<(), RepricingError> {
        cap.ensure(Role::PlatformAdmin)?;
        self.treasury = treasury;
        tracing::info!(%treasury, "treasury address updated");
        Ok(())
    }

    pub fn set_zero_active_validators_policy(
        &mut self,
        cap: &Capability,
        policy: ZeroActiveValidatorsPolicy,
    ) -> Result<(), RepricingError> {
        cap.ensure(Role::PlatformAdmin)?;
        self.params.zero_active_validators = policy;
        tracing::info!(?policy, "zero-active-validators policy updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsd_access::{AccessControl, RoleRegistry};
    use lsd_nullables::NullToken;
    use lsd_types::{address_from_byte, ParamsError, ONE_PERCENT};

    struct Setup {
        engine: RepricingEngine,
        registry: NodeOperatorRegistry,
        token: NullToken,
        admin: Capability,
        repricer: Capability,
    }

    fn setup(supply: u128) -> Setup {
        let admin = address_from_byte(1);
        let mut roles = RoleRegistry::with_admin(admin);
        let admin_cap = roles.authorize(Role::PlatformAdmin, &admin).unwrap();
        roles.grant(&admin_cap, Role::Repricer, address_from_byte(2)).unwrap();
        let params = RepricingParams {
            treasury_reward_pct: 10 * ONE_PERCENT,
            operator_reward_pct: 0,
            ..RepricingParams::default()
        };
        Setup {
            engine: RepricingEngine::new(params, address_from_byte(99)).unwrap(),
            registry: NodeOperatorRegistry::new(),
            token: NullToken::with_supply(supply),
            repricer: roles.authorize(Role::Repricer, &address_from_byte(2)).unwrap(),
            admin: admin_cap,
        }
    }

    fn reprice(s: &mut Setup, pre: u128, rewards: u128, supply: u128) -> Result<RepriceEvent, RepricingError> {
        s.engine
            .reprice(&s.repricer, &s.registry, &mut s.token, pre, rewards, supply, Timestamp::new(1_000))
    }

    #[test]
    fn uninitialized_rate_reads_one() {
        let s = setup(WAD);
        assert!(!s.engine.is_primed());
        assert_eq!(s.engine.rate(), WAD);
        assert_eq!(s.engine.eth_to_token(5 * WAD).unwrap(), 5 * WAD);
    }

    #[test]
    fn first_reprice_primes_and_mints_fee() {
        let mut s = setup(100 * WAD);
        let event = reprice(&mut s, 100 * WAD, 10 * WAD, 100 * WAD).unwrap();
        assert!(s.engine.is_primed());
        assert_eq!(s.engine.rate(), 1_090_000_000_000_000_000);
        assert_eq!(s.engine.last_reserves(), 110 * WAD);
        assert_eq!(s.engine.last_reprice_at(), Timestamp::new(1_000));
        assert_eq!(event.old_rate, WAD);
        assert_eq!(event.treasury_rewards, 917_431_192_660_550_458);
        assert_eq!(s.token.balance_of(&address_from_byte(99)), event.treasury_rewards);
        assert_eq!(s.token.total_supply(), 100 * WAD + event.rewards_in_token);
    }

    #[test]
    fn first_reprice_is_not_rate_clamped() {
        let mut s = setup(100 * WAD);
        // 50% jump from the implicit 1.0.
        reprice(&mut s, 150 * WAD, 0, 100 * WAD).unwrap();
        assert_eq!(s.engine.rate(), 1_500_000_000_000_000_000);
    }

    #[test]
    fn primed_rate_is_clamped_both_ways() {
        let mut s = setup(100 * WAD);
        reprice(&mut s, 100 * WAD, 0, 100 * WAD).unwrap();
        let err = reprice(&mut s, 103 * WAD, 0, 100 * WAD).unwrap_err();
        assert!(matches!(err, RepricingError::RepriceDifferenceTooLarge { .. }));
        let err = reprice(&mut s, 97 * WAD, 0, 100 * WAD).unwrap_err();
        assert!(matches!(err, RepricingError::RepriceDifferenceTooLarge { .. }));
        assert_eq!(s.engine.rate(), WAD);
        reprice(&mut s, 102 * WAD, 0, 100 * WAD).unwrap();
    }

    #[test]
    fn supply_gap_is_bounded_by_actual_supply() {
        let mut s = setup(100 * WAD);
        let err = reprice(&mut s, 100 * WAD, 0, 102 * WAD).unwrap_err();
        assert_eq!(
            err,
            RepricingError::RepriceSupplyDifferenceTooLarge {
                actual: 100 * WAD,
                reported: 102 * WAD,
                max_pct: ONE_PERCENT,
            }
        );
        assert!(!s.engine.is_primed());
    }

    #[test]
    fn zero_inputs_rejected() {
        let mut s = setup(100 * WAD);
        assert_eq!(reprice(&mut s, 100 * WAD, 0, 0), Err(RepricingError::ZeroReportedSupply));
        assert_eq!(reprice(&mut s, 0, 0, 100 * WAD), Err(RepricingError::ZeroPreRewardReserves));
        let mut empty = setup(0);
        assert_eq!(reprice(&mut empty, WAD, 0, WAD), Err(RepricingError::ZeroActualSupply));
    }

    #[test]
    fn reprice_requires_repricer() {
        let mut s = setup(100 * WAD);
        let err = s
            .engine
            .reprice(&s.admin, &s.registry, &mut s.token, WAD, 0, 100 * WAD, Timestamp::new(1))
            .unwrap_err();
        assert!(matches!(err, RepricingError::Access(_)));
    }

    #[test]
    fn plan_has_no_side_effects() {
        let s = setup(100 * WAD);
        let plan = s.engine.plan(&s.registry, &s.token, 100 * WAD, 10 * WAD, 100 * WAD).unwrap();
        assert_eq!(plan.new_rate(), 1_090_000_000_000_000_000);
        assert!(!s.engine.is_primed());
        assert_eq!(s.token.total_supply(), 100 * WAD);
    }

    #[test]
    fn conversions_follow_rate() {
        let mut s = setup(100 * WAD);
        reprice(&mut s, 200 * WAD, 0, 100 * WAD).unwrap();
        assert_eq!(s.engine.token_to_eth(3 * WAD).unwrap(), 6 * WAD);
        assert_eq!(s.engine.eth_to_token(3 * WAD).unwrap(), 3 * WAD / 2);
    }

    #[test]
    fn reward_percentages_cannot_exceed_one() {
        let mut s = setup(WAD);
        let err = s
            .engine
            .set_reward_percentages(&s.admin, 60 * ONE_PERCENT, 50 * ONE_PERCENT)
            .unwrap_err();
        assert!(matches!(
            err,
            RepricingError::Params(ParamsError::RewardPercentageTotalOverflow { .. })
        ));
        s.engine
            .set_reward_percentages(&s.admin, 60 * ONE_PERCENT, 40 * ONE_PERCENT)
            .unwrap();
        assert_eq!(s.engine.params().reward_share(), WAD);
    }

    #[test]
    fn setters_need_admin() {
        let mut s = setup(WAD);
        assert!(s.engine.set_max_rate_diff_pct(&s.repricer, ONE_PERCENT).is_err());
        assert!(s.engine.set_max_supply_diff_pct(&s.admin, WAD + 1).is_err());
        s.engine.set_treasury_address(&s.admin, address_from_byte(7)).unwrap();
        assert_eq!(s.engine.treasury(), address_from_byte(7));
    }
}
