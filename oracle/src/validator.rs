//! The snapshot validator.

use lsd_access::{Capability, PauseFlag, Role};
use lsd_repricing::RepriceEvent;
use lsd_types::wad::within_pct_of;
use lsd_types::{
    check_pct, BlockEnv, MathError, OracleParams, PubKey, ReserveAttestation, RepriceSnapshot,
};
use serde::{Deserialize, Serialize};

use crate::accounting::{reference_rate, RewardEstimate};
use crate::context::OracleContext;
use crate::error::OracleError;

/// Result of an accepted snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotOutcome {
    pub event: RepriceEvent,
    pub estimate: RewardEstimate,
    pub reference_rate: u128,
    /// Whether the reprice lowered the rate and halted the protocol.
    pub halted: bool,
}

/// Validates reprice snapshots and keeps the last accepted one.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SnapshotValidator {
    params: OracleParams,
    last_snapshot: RepriceSnapshot,
    last_total_reserves: u128,
}

impl SnapshotValidator {
    pub fn new(params: OracleParams) -> Result<Self, OracleError> {
        params.validate()?;
        Ok(Self {
            params,
            ..Self::default()
        })
    }

    pub fn params(&self) -> &OracleParams {
        &self.params
    }

    /// The snapshot the next submission must build on.
    pub fn last_snapshot(&self) -> &RepriceSnapshot {
        &self.last_snapshot
    }

    /// Reserves derived from the last accepted snapshot.
    pub fn last_total_reserves(&self) -> u128 {
        self.last_total_reserves
    }

    /// Validate `snapshot` and reprice from it.
    pub fn submit_snapshot(
        &mut self,
        cap: &Capability,
        env: BlockEnv,
        snapshot: &RepriceSnapshot,
        ctx: &mut OracleContext<'_>,
    ) -> Result<SnapshotOutcome, OracleError> {
        cap.ensure(Role::Bot)?;
        self.accept(env, snapshot, ctx)
    }

    /// [`Self::submit_snapshot`], then deactivate exited validators and
    /// settle the exit queue up to `withdrawals_upto`.
    ///
    /// The deactivations are validated before the snapshot and applied only
    /// once it is accepted, so either both land or nothing does. The reprice
    /// sees the active set as it was before the deactivations. Queue
    /// processing is skipped while withdrawals are paused.
    pub fn submit_snapshot_with_exits(
        &mut self,
        cap: &Capability,
        env: BlockEnv,
        snapshot: &RepriceSnapshot,
        pubkeys_to_deactivate: &[PubKey],
        withdrawals_upto: Option<u64>,
        ctx: &mut OracleContext<'_>,
    ) -> Result<SnapshotOutcome, OracleError> {
        cap.ensure(Role::Bot)?;

        let deactivate = !pubkeys_to_deactivate.is_empty();
        if deactivate {
            ctx.registry.validate_active_removals(cap, pubkeys_to_deactivate)?;
        }

        let outcome = self.accept(env, snapshot, ctx)?;

        if deactivate {
            ctx.registry.delete_active_validators(cap, pubkeys_to_deactivate)?;
            tracing::info!(count = pubkeys_to_deactivate.len(), "validators deactivated by snapshot");
        }
        if let Some(upto) = withdrawals_upto {
            if ctx.pause.is_paused(PauseFlag::Withdrawals) {
                tracing::debug!(upto, "withdrawals paused, queue processing skipped");
            } else {
                ctx.exits.process_withdrawals(upto);
            }
        }
        Ok(outcome)
    }

    fn accept(
        &mut self,
        env: BlockEnv,
        snapshot: &RepriceSnapshot,
        ctx: &mut OracleContext<'_>,
    ) -> Result<SnapshotOutcome, OracleError> {
        self.check_ordering(env, snapshot)?;
        self.check_exit_queue(snapshot, ctx)?;
        self.check_cumulative_totals(snapshot)?;
        self.check_attestation(env, snapshot, ctx.attestation)?;

        let total_reserves = snapshot.total_reserves().map_err(reserves_error)?;
        let last = &self.last_snapshot;
        let estimate = RewardEstimate::between(
            self.last_total_reserves,
            last.state.total_eth_deposited,
            last.withdraw_state.total_eth_exited,
            snapshot.state.total_eth_deposited,
            snapshot.withdraw_state.total_eth_exited,
            total_reserves,
        )?;

        let plan = ctx.engine.plan(
            &*ctx.registry,
            &*ctx.token,
            estimate.pre_reward_reserves,
            estimate.new_rewards,
            snapshot.state.token_total_supply,
        )?;

        let reference_rate = self.live_reference_rate(snapshot, ctx)?;
        let new_rate = plan.new_rate();
        let max_pct = self.params.max_reference_diff_pct;
        if !within_pct_of(new_rate, reference_rate, max_pct)?
            || !within_pct_of(reference_rate, new_rate, max_pct)?
        {
            return Err(OracleError::ReferencePriceDiffTooHigh {
                new_rate,
                reference_rate,
            });
        }

        let event = ctx.engine.commit(plan, &mut *ctx.token, env.timestamp);
        let halted = event.new_rate < event.old_rate;
        if halted {
            ctx.pause.halt("reprice lowered the rate");
        }

        self.last_snapshot = *snapshot;
        self.last_total_reserves = total_reserves;
        tracing::info!(
            block_number = snapshot.meta.block_number,
            slot = snapshot.meta.slot,
            total_reserves,
            new_rewards = estimate.new_rewards,
            new_rate = event.new_rate,
            reference_rate,
            halted,
            "snapshot accepted"
        );

        Ok(SnapshotOutcome {
            event,
            estimate,
            reference_rate,
            halted,
        })
    }

    fn check_ordering(&self, env: BlockEnv, snapshot: &RepriceSnapshot) -> Result<(), OracleError> {
        let meta = &snapshot.meta;
        let last = &self.last_snapshot.meta;

        if meta.block_of_last_snapshot != last.block_number {
            return Err(OracleError::RepriceBlockOfLastSnapshotMismatch {
                expected: last.block_number,
                got: meta.block_of_last_snapshot,
            });
        }
        if meta.block_number <= meta.block_of_last_snapshot {
            return Err(OracleError::SnapshotBlockNotAfterPrevious {
                block_number: meta.block_number,
                block_of_last_snapshot: meta.block_of_last_snapshot,
            });
        }
        if meta.slot <= last.slot {
            return Err(OracleError::SnapshotSlotNotAfterPrevious {
                slot: meta.slot,
                last_slot: last.slot,
            });
        }
        if meta.timestamp <= last.timestamp {
            return Err(OracleError::SnapshotTimestampNotAfterPrevious {
                timestamp: meta.timestamp,
                last_timestamp: last.timestamp,
            });
        }
        if meta.timestamp >= env.timestamp {
            return Err(OracleError::SnapshotTimestampNotInPast {
                timestamp: meta.timestamp,
                now: env.timestamp,
            });
        }
        if meta.block_number >= env.number {
            return Err(OracleError::SnapshotBlockNotInPast {
                block_number: meta.block_number,
                current: env.number,
            });
        }
        let age = env.number - meta.block_number;
        if age > self.params.max_snapshot_staleness_blocks {
            return Err(OracleError::SnapshotTooStale {
                age,
                max: self.params.max_snapshot_staleness_blocks,
            });
        }
        Ok(())
    }

    fn check_exit_queue(&self, snapshot: &RepriceSnapshot, ctx: &OracleContext<'_>) -> Result<(), OracleError> {
        let reported = &snapshot.withdraw_state;
        let total_exited = ctx.exits.total_eth_exited();
        if reported.total_eth_exited != total_exited {
            return Err(OracleError::TotalEthExitedMismatch {
                reported: reported.total_eth_exited,
                actual: total_exited,
            });
        }
        let exiting = ctx.exits.exiting_eth();
        if exiting < reported.exiting_eth {
            return Err(OracleError::ExitingEthDecreased {
                reported: reported.exiting_eth,
                actual: exiting,
            });
        }
        Ok(())
    }

    fn check_cumulative_totals(&self, snapshot: &RepriceSnapshot) -> Result<(), OracleError> {
        let last = &self.last_snapshot;
        if snapshot.state.total_eth_deposited < last.state.total_eth_deposited {
            return Err(OracleError::TotalEthDepositedDecreased {
                reported: snapshot.state.total_eth_deposited,
                last: last.state.total_eth_deposited,
            });
        }
        if snapshot.withdraw_state.total_eth_exited < last.withdraw_state.total_eth_exited {
            return Err(OracleError::TotalEthExitedDecreased {
                reported: snapshot.withdraw_state.total_eth_exited,
                last: last.withdraw_state.total_eth_exited,
            });
        }
        Ok(())
    }

    fn check_attestation(
        &self,
        env: BlockEnv,
        snapshot: &RepriceSnapshot,
        attestation: Option<&dyn ReserveAttestation>,
    ) -> Result<(), OracleError> {
        if !self.params.reserve_attestation_enabled {
            return Ok(());
        }
        let feed = attestation.ok_or(OracleError::ReserveAttestationMissing)?;
        let (attested, updated_at) = feed.latest_value();
        if updated_at.elapsed_since(env.timestamp) > self.params.por_staleness_secs {
            return Err(OracleError::ExternalPoRStale {
                updated_at,
                now: env.timestamp,
            });
        }
        let reported = snapshot.state.balances.consensus_v3;
        if !within_pct_of(reported, attested, self.params.max_por_diff_pct)? {
            return Err(OracleError::ReservesExternalPoRDiffTooHigh { reported, attested });
        }
        Ok(())
    }

    /// The rate the formula yields when the snapshot's balances are combined
    /// with live supply, deposit and exit totals instead of reported ones.
    fn live_reference_rate(&self, snapshot: &RepriceSnapshot, ctx: &OracleContext<'_>) -> Result<u128, OracleError> {
        let gross = snapshot.state.balances.total()?;
        let live_total = gross
            .checked_sub(ctx.exits.exiting_eth())
            .and_then(|net| net.checked_sub(snapshot.rewards_payable_for_fees))
            .ok_or(OracleError::SnapshotReservesUnderflow)?;
        let last = &self.last_snapshot;
        let estimate = RewardEstimate::between(
            self.last_total_reserves,
            last.state.total_eth_deposited,
            last.withdraw_state.total_eth_exited,
            ctx.deposits.total_eth_deposited(),
            ctx.exits.total_eth_exited(),
            live_total,
        )?;
        Ok(reference_rate(
            &estimate,
            ctx.token.total_supply(),
            ctx.engine.params().reward_share(),
        )?)
    }

    // ── Admin setters ────────────────────────────────────────────────────

    pub fn set_max_snapshot_staleness_blocks(&mut self, cap: &Capability, blocks: u64) -> Result<(), OracleError> {
        cap.ensure(Role::PlatformAdmin)?;
        self.params.max_snapshot_staleness_blocks = blocks;
        tracing::info!(blocks, "max snapshot staleness updated");
        Ok(())
    }

    pub fn set_max_reference_diff_pct(&mut self, cap: &Capability, pct: u128) -> Result<(), OracleError> {
        cap.ensure(Role::PlatformAdmin)?;
        check_pct(pct)?;
        self.params.max_reference_diff_pct = pct;
        tracing::info!(pct, "max reference diff updated");
        Ok(())
    }

    pub fn set_max_por_diff_pct(&mut self, cap: &Capability, pct: u128) -> Result<(), OracleError> {
        cap.ensure(Role::PlatformAdmin)?;
        check_pct(pct)?;
        self.params.max_por_diff_pct = pct;
        tracing::info!(pct, "max proof-of-reserve diff updated");
        Ok(())
    }

    pub fn set_por_staleness_secs(&mut self, cap: &Capability, secs: u64) -> Result<(), OracleError> {
        cap.ensure(Role::PlatformAdmin)?;
        self.params.por_staleness_secs = secs;
        tracing::info!(secs, "proof-of-reserve staleness updated");
        Ok(())
    }

    pub fn set_reserve_attestation_enabled(&mut self, cap: &Capability, enabled: bool) -> Result<(), OracleError> {
        cap.ensure(Role::PlatformAdmin)?;
        self.params.reserve_attestation_enabled = enabled;
        tracing::info!(enabled, "reserve attestation toggled");
        Ok(())
    }
}

fn reserves_error(err: MathError) -> OracleError {
    match err {
        MathError::Underflow => OracleError::SnapshotReservesUnderflow,
        other => OracleError::Math(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsd_access::{AccessControl, PauseState, RoleRegistry};
    use lsd_nullables::{NullChain, NullDepositPool, NullExitQueue, NullReserveAttestation, NullToken};
    use lsd_registry::{NodeOperatorRegistry, RegistryError};
    use lsd_repricing::RepricingEngine;
    use lsd_types::{
        address_from_byte, NewValidatorDetails, ProtocolParams, ReserveBalances, SnapshotMeta, SnapshotState,
        Timestamp, TokenLedger, WithdrawState, WAD,
    };

    struct Harness {
        validator: SnapshotValidator,
        engine: RepricingEngine,
        registry: NodeOperatorRegistry,
        pause: PauseState,
        token: NullToken,
        deposits: NullDepositPool,
        exits: NullExitQueue,
        attestation: Option<NullReserveAttestation>,
        chain: NullChain,
        admin: Capability,
        bot: Capability,
        deposit: Capability,
    }

    impl Harness {
        fn new() -> Self {
            let admin = address_from_byte(1);
            let mut roles = RoleRegistry::with_admin(admin);
            let admin_cap = roles.authorize(Role::PlatformAdmin, &admin).unwrap();
            roles.grant(&admin_cap, Role::Bot, address_from_byte(2)).unwrap();
            roles.grant(&admin_cap, Role::DepositManager, address_from_byte(3)).unwrap();
            let params = ProtocolParams::default();
            Self {
                validator: SnapshotValidator::new(params.oracle.clone()).unwrap(),
                engine: RepricingEngine::new(params.repricing.clone(), address_from_byte(99)).unwrap(),
                registry: NodeOperatorRegistry::new(),
                pause: PauseState::default(),
                token: NullToken::with_supply(100 * WAD),
                deposits: NullDepositPool::new(100 * WAD),
                exits: NullExitQueue::default(),
                attestation: None,
                chain: NullChain::new(20, 2_000),
                bot: roles.authorize(Role::Bot, &address_from_byte(2)).unwrap(),
                deposit: roles.authorize(Role::DepositManager, &address_from_byte(3)).unwrap(),
                admin: admin_cap,
            }
        }

        /// A harness that has accepted [`first`] and moved on to block 40.
        fn primed() -> Self {
            let mut h = Self::new();
            h.submit(&first()).unwrap();
            h.chain.set(40, 3_000);
            h
        }

        fn submit(&mut self, snapshot: &RepriceSnapshot) -> Result<SnapshotOutcome, OracleError> {
            self.submit_with_exits(snapshot, &[], None)
        }

        fn submit_with_exits(
            &mut self,
            snapshot: &RepriceSnapshot,
            pubkeys: &[PubKey],
            upto: Option<u64>,
        ) -> Result<SnapshotOutcome, OracleError> {
            let env = self.chain.env();
            let mut ctx = OracleContext {
                engine: &mut self.engine,
                registry: &mut self.registry,
                pause: &mut self.pause,
                token: &mut self.token,
                deposits: &self.deposits,
                exits: &mut self.exits,
                attestation: self.attestation.as_ref().map(|a| a as &dyn ReserveAttestation),
            };
            self.validator
                .submit_snapshot_with_exits(&self.bot, env, snapshot, pubkeys, upto, &mut ctx)
        }

        fn add_active_keys(&mut self, count: u8) -> Vec<PubKey> {
            self.registry
                .add_operator(&self.admin, "op", address_from_byte(10), address_from_byte(11))
                .unwrap();
            let batch: Vec<_> = (0..count)
                .map(|n| {
                    let mut pk = vec![9u8; 48];
                    pk[0] = n;
                    NewValidatorDetails::new(pk, vec![0u8; 96])
                })
                .collect();
            self.registry
                .add_new_validator_details(&address_from_byte(10), &batch)
                .unwrap();
            let keys: Vec<_> = batch
                .iter()
                .map(|d| PubKey::from_slice(&d.pub_key).unwrap())
                .collect();
            self.registry
                .use_pubkeys_for_validator_setup(&self.deposit, &keys)
                .unwrap();
            keys
        }
    }

    fn snapshot(block: u64, block_of_last: u64, slot: u64, ts: u64, consensus: u128) -> RepriceSnapshot {
        RepriceSnapshot {
            meta: SnapshotMeta {
                block_number: block,
                block_of_last_snapshot: block_of_last,
                slot,
                timestamp: Timestamp::new(ts),
            },
            state: SnapshotState {
                total_eth_deposited: 100 * WAD,
                token_total_supply: 100 * WAD,
                balances: ReserveBalances {
                    consensus_v3: consensus,
                    ..ReserveBalances::default()
                },
            },
            withdraw_state: WithdrawState::default(),
            rewards_payable_for_fees: 0,
        }
    }

    fn first() -> RepriceSnapshot {
        snapshot(10, 0, 1, 1_000, 100 * WAD)
    }

    fn second(consensus: u128) -> RepriceSnapshot {
        snapshot(30, 10, 2, 2_500, consensus)
    }

    #[test]
    fn first_snapshot_primes_at_backing_ratio() {
        let mut h = Harness::new();
        let outcome = h.submit(&first()).unwrap();
        assert_eq!(outcome.estimate.pre_reward_reserves, 100 * WAD);
        assert_eq!(outcome.estimate.new_rewards, 0);
        assert_eq!(outcome.event.new_rate, WAD);
        assert!(!outcome.halted);
        assert!(h.engine.is_primed());
        assert_eq!(h.validator.last_snapshot().meta.block_number, 10);
        assert_eq!(h.validator.last_total_reserves(), 100 * WAD);
    }

    #[test]
    fn rewards_raise_the_rate_and_mint_fees() {
        let mut h = Harness::primed();
        let outcome = h.submit(&second(101 * WAD)).unwrap();
        assert_eq!(outcome.estimate.new_rewards, WAD);
        assert!(outcome.event.new_rate > WAD);
        assert_eq!(outcome.reference_rate, outcome.event.new_rate);
        // No active validators: the whole fee goes to the treasury.
        assert_eq!(h.token.balance_of(&address_from_byte(99)), outcome.event.rewards_in_token);
        assert!(!h.pause.is_halted());
    }

    #[test]
    fn same_predecessor_is_accepted_once() {
        let mut h = Harness::primed();
        h.submit(&second(101 * WAD)).unwrap();
        let mut again = second(101 * WAD);
        again.meta.block_number = 35;
        again.meta.slot = 3;
        again.meta.timestamp = Timestamp::new(2_600);
        assert_eq!(
            h.submit(&again).unwrap_err(),
            OracleError::RepriceBlockOfLastSnapshotMismatch {
                expected: 30,
                got: 10
            }
        );
    }

    #[test]
    fn ordering_checks() {
        let mut h = Harness::primed();

        let mut s = second(101 * WAD);
        s.meta.block_number = 10;
        assert!(matches!(h.submit(&s), Err(OracleError::SnapshotBlockNotAfterPrevious { .. })));

        let mut s = second(101 * WAD);
        s.meta.slot = 1;
        assert!(matches!(h.submit(&s), Err(OracleError::SnapshotSlotNotAfterPrevious { .. })));

        let mut s = second(101 * WAD);
        s.meta.timestamp = Timestamp::new(1_000);
        assert!(matches!(h.submit(&s), Err(OracleError::SnapshotTimestampNotAfterPrevious { .. })));

        let mut s = second(101 * WAD);
        s.meta.timestamp = Timestamp::new(3_000);
        assert!(matches!(h.submit(&s), Err(OracleError::SnapshotTimestampNotInPast { .. })));

        let mut s = second(101 * WAD);
        s.meta.block_number = 40;
        assert!(matches!(h.submit(&s), Err(OracleError::SnapshotBlockNotInPast { .. })));

        h.chain.set(1_000, 3_000);
        assert_eq!(
            h.submit(&second(101 * WAD)).unwrap_err(),
            OracleError::SnapshotTooStale { age: 970, max: 600 }
        );
        assert_eq!(h.validator.last_snapshot().meta.block_number, 10);
    }

    #[test]
    fn exit_queue_must_agree() {
        let mut h = Harness::new();
        h.exits = NullExitQueue::new(5 * WAD, 0);
        assert_eq!(
            h.submit(&first()).unwrap_err(),
            OracleError::TotalEthExitedMismatch {
                reported: 0,
                actual: 5 * WAD
            }
        );

        let mut h = Harness::new();
        let mut s = first();
        s.withdraw_state.exiting_eth = 2 * WAD;
        s.state.balances.consensus_v3 = 102 * WAD;
        assert_eq!(
            h.submit(&s).unwrap_err(),
            OracleError::ExitingEthDecreased {
                reported: 2 * WAD,
                actual: 0
            }
        );
    }

    #[test]
    fn deductions_beyond_balances_rejected() {
        let mut h = Harness::new();
        let mut s = first();
        s.rewards_payable_for_fees = 101 * WAD;
        assert_eq!(h.submit(&s).unwrap_err(), OracleError::SnapshotReservesUnderflow);
    }

    #[test]
    fn reserve_attestation_checks() {
        let mut h = Harness::new();
        h.validator.set_reserve_attestation_enabled(&h.admin, true).unwrap();
        assert_eq!(h.submit(&first()).unwrap_err(), OracleError::ReserveAttestationMissing);

        h.attestation = Some(NullReserveAttestation::new(90 * WAD, Timestamp::new(1_900)));
        assert_eq!(
            h.submit(&first()).unwrap_err(),
            OracleError::ReservesExternalPoRDiffTooHigh {
                reported: 100 * WAD,
                attested: 90 * WAD
            }
        );

        h.attestation = Some(NullReserveAttestation::new(100 * WAD, Timestamp::new(1_500)));
        h.validator.set_por_staleness_secs(&h.admin, 100).unwrap();
        assert!(matches!(h.submit(&first()), Err(OracleError::ExternalPoRStale { .. })));

        h.validator.set_por_staleness_secs(&h.admin, 86_400).unwrap();
        h.submit(&first()).unwrap();
    }

    #[test]
    fn reference_divergence_rejects_without_side_effects() {
        let mut h = Harness::primed();
        // Live queue owes 3 ETH the report does not know about.
        h.exits.request_exit(3 * WAD);
        let err = h.submit(&second(101 * WAD)).unwrap_err();
        assert!(matches!(err, OracleError::ReferencePriceDiffTooHigh { .. }));
        assert_eq!(h.engine.rate(), WAD);
        assert_eq!(h.token.total_supply(), 100 * WAD);
        assert_eq!(h.validator.last_snapshot().meta.block_number, 10);
    }

    #[test]
    fn lower_rate_halts_the_protocol() {
        let mut h = Harness::primed();
        let outcome = h.submit(&second(99_500_000_000_000_000_000)).unwrap();
        assert!(outcome.halted);
        assert_eq!(outcome.event.new_rate, 995_000_000_000_000_000);
        assert!(h.pause.is_halted());
        assert_eq!(h.validator.last_snapshot().meta.block_number, 30);
    }

    #[test]
    fn deactivations_land_with_the_snapshot() {
        let mut h = Harness::new();
        let keys = h.add_active_keys(2);
        h.submit_with_exits(&first(), &keys[..1], Some(7)).unwrap();
        assert_eq!(h.registry.total_active_validators(), 1);
        assert_eq!(h.exits.processed(), &[7]);
        h.registry.check_invariants().unwrap();
    }

    #[test]
    fn bad_deactivation_rejects_everything() {
        let mut h = Harness::new();
        h.add_active_keys(1);
        let unknown = PubKey([0xAA; 48]);
        assert_eq!(
            h.submit_with_exits(&first(), &[unknown], Some(7)).unwrap_err(),
            OracleError::Registry(RegistryError::NoPubKeyFound(unknown))
        );
        assert!(!h.engine.is_primed());
        assert_eq!(h.registry.total_active_validators(), 1);
        assert!(h.exits.processed().is_empty());
    }

    #[test]
    fn valid_deactivations_wait_for_an_accepted_snapshot() {
        let mut h = Harness::primed();
        let keys = h.add_active_keys(2);
        // Replaying the first snapshot breaks the chain.
        let err = h.submit_with_exits(&first(), &keys, Some(3)).unwrap_err();
        assert!(matches!(err, OracleError::RepriceBlockOfLastSnapshotMismatch { .. }));
        assert_eq!(h.registry.total_active_validators(), 2);
        assert!(h.exits.processed().is_empty());
        h.registry.check_invariants().unwrap();
    }

    #[test]
    fn halted_snapshot_skips_withdrawal_processing() {
        let mut h = Harness::primed();
        let outcome = h
            .submit_with_exits(&second(99_500_000_000_000_000_000), &[], Some(9))
            .unwrap();
        assert!(outcome.halted);
        assert!(h.exits.processed().is_empty());
    }

    #[test]
    fn submission_requires_bot() {
        let mut h = Harness::new();
        let env = h.chain.env();
        let mut ctx = OracleContext {
            engine: &mut h.engine,
            registry: &mut h.registry,
            pause: &mut h.pause,
            token: &mut h.token,
            deposits: &h.deposits,
            exits: &mut h.exits,
            attestation: None,
        };
        let err = h
            .validator
            .submit_snapshot(&h.admin, env, &first(), &mut ctx)
            .unwrap_err();
        assert!(matches!(err, OracleError::Access(_)));
    }

    #[test]
    fn setters_validate_and_need_admin() {
        let mut h = Harness::new();
        assert!(h.validator.set_max_reference_diff_pct(&h.bot, WAD).is_err());
        assert!(matches!(
            h.validator.set_max_por_diff_pct(&h.admin, WAD + 1),
            Err(OracleError::Params(_))
        ));
        h.validator.set_max_snapshot_staleness_blocks(&h.admin, 5).unwrap();
        assert_eq!(h.validator.params().max_snapshot_staleness_blocks, 5);
    }
}
