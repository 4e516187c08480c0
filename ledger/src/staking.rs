//! The single-writer staking ledger.

use lsd_access::{AccessControl, Capability, PauseFlag, PauseState, Role, RoleRegistry};
use lsd_oracle::{OracleContext, SnapshotOutcome, SnapshotValidator};
use lsd_registry::{NodeOperatorRegistry, Operator, OperatorId};
use lsd_repricing::{RepriceEvent, RepricingEngine};
use lsd_types::{
    Address, BlockEnv, DepositPool, ExitQueue, NewValidatorDetails, ProtocolParams, PubKey,
    RepriceSnapshot, ReserveAttestation, TokenLedger, ValidatorDetails, ZeroActiveValidatorsPolicy,
};
use serde::{Deserialize, Serialize};

use crate::config::LedgerConfig;
use crate::error::LedgerError;

/// The outside systems a call may read or write.
pub struct Collaborators<'a> {
    pub token: &'a mut dyn TokenLedger,
    pub deposits: &'a dyn DepositPool,
    pub exits: &'a mut dyn ExitQueue,
    pub attestation: Option<&'a dyn ReserveAttestation>,
}

/// Point-in-time figures for dashboards and scenario output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub rate: u128,
    pub primed: bool,
    pub last_reserves: u128,
    pub last_snapshot_block: u64,
    pub operators: usize,
    pub pending_validators: u64,
    pub active_validators: u64,
    pub pause: PauseState,
}

/// Role registry, pause flags, operator registry, repricing engine and
/// snapshot validator behind one set of gated entry points.
#[derive(Clone, Debug)]
pub struct StakingLedger {
    roles: RoleRegistry,
    pause: PauseState,
    registry: NodeOperatorRegistry,
    engine: RepricingEngine,
    oracle: SnapshotValidator,
}

impl StakingLedger {
    /// Build a fresh ledger from `config`, granting its configured roles.
    pub fn new(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let mut ledger = Self::with_params(config.admin, config.params.clone())?;
        let admin = ledger.roles.authorize(Role::PlatformAdmin, &config.admin)?;
        let assignments = [
            (Role::Bot, &config.roles.bots),
            (Role::Repricer, &config.roles.repricers),
            (Role::DepositManager, &config.roles.deposit_managers),
            (Role::Pauser, &config.roles.pausers),
            (Role::Unpauser, &config.roles.unpausers),
        ];
        for (role, accounts) in assignments {
            for account in accounts {
                ledger.roles.grant(&admin, role, *account)?;
            }
        }
        Ok(ledger)
    }

    /// A ledger whose only role holder is `admin`.
    pub fn with_params(admin: Address, params: ProtocolParams) -> Result<Self, LedgerError> {
        params.validate()?;
        let engine = RepricingEngine::new(params.repricing, params.treasury)?;
        let oracle = SnapshotValidator::new(params.oracle)?;
        tracing::info!(%admin, treasury = %params.treasury, "staking ledger created");
        Ok(Self {
            roles: RoleRegistry::with_admin(admin),
            pause: PauseState::default(),
            registry: NodeOperatorRegistry::new(),
            engine,
            oracle,
        })
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    pub fn pause_state(&self) -> PauseState {
        self.pause
    }

    pub fn is_halted(&self) -> bool {
        self.pause.is_halted()
    }

    pub fn registry(&self) -> &NodeOperatorRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &RepricingEngine {
        &self.engine
    }

    pub fn oracle(&self) -> &SnapshotValidator {
        &self.oracle
    }

    pub fn rate(&self) -> u128 {
        self.engine.rate()
    }

    pub fn eth_to_token(&self, amount: u128) -> Result<u128, LedgerError> {
        Ok(self.engine.eth_to_token(amount)?)
    }

    pub fn token_to_eth(&self, amount: u128) -> Result<u128, LedgerError> {
        Ok(self.engine.token_to_eth(amount)?)
    }

    pub fn get_next_validator_details(&self, n: usize) -> Vec<ValidatorDetails> {
        self.registry.get_next_validator_details(n)
    }

    pub fn por_address_list(&self, start: usize, end: usize) -> Result<Vec<PubKey>, LedgerError> {
        Ok(self.registry.por_address_list(start, end)?)
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            rate: self.engine.rate(),
            primed: self.engine.is_primed(),
            last_reserves: self.engine.last_reserves(),
            last_snapshot_block: self.oracle.last_snapshot().meta.block_number,
            operators: self.registry.num_operators(),
            pending_validators: self.registry.num_pending_validators(),
            active_validators: self.registry.total_active_validators(),
            pause: self.pause,
        }
    }

    // ── Roles and pausing ────────────────────────────────────────────────

    pub fn grant_role(&mut self, caller: &Address, role: Role, account: Address) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self.roles.grant(&cap, role, account)?)
    }

    pub fn revoke_role(&mut self, caller: &Address, role: Role, account: &Address) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self.roles.revoke(&cap, role, account)?)
    }

    pub fn pause(&mut self, caller: &Address, flag: PauseFlag) -> Result<(), LedgerError> {
        let cap = self.roles.authorize(Role::Pauser, caller)?;
        Ok(self.pause.pause(&cap, flag)?)
    }

    pub fn unpause(&mut self, caller: &Address, flag: PauseFlag) -> Result<(), LedgerError> {
        let cap = self.roles.authorize(Role::Unpauser, caller)?;
        Ok(self.pause.unpause(&cap, flag)?)
    }

    pub fn pause_all(&mut self, caller: &Address) -> Result<(), LedgerError> {
        let cap = self.roles.authorize(Role::Pauser, caller)?;
        Ok(self.pause.pause_all(&cap)?)
    }

    /// Resume everything, including after a fail-safe halt.
    pub fn unpause_all(&mut self, caller: &Address) -> Result<(), LedgerError> {
        let cap = self.roles.authorize(Role::Unpauser, caller)?;
        Ok(self.pause.unpause_all(&cap)?)
    }

    // ── Operator registry ────────────────────────────────────────────────

    pub fn add_operator(
        &mut self,
        caller: &Address,
        name: impl Into<String>,
        controlling_address: Address,
        reward_address: Address,
    ) -> Result<OperatorId, LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self
            .registry
            .add_operator(&cap, name, controlling_address, reward_address)?)
    }

    pub fn operator(&self, id: OperatorId) -> Result<&Operator, LedgerError> {
        Ok(self.registry.operator(id)?)
    }

    pub fn enable_operator(&mut self, caller: &Address, id: OperatorId) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self.registry.enable_operator(&cap, id)?)
    }

    pub fn disable_operator(&mut self, caller: &Address, id: OperatorId) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self.registry.disable_operator(&cap, id)?)
    }

    pub fn update_operator_controlling_address(
        &mut self,
        caller: &Address,
        id: OperatorId,
        controlling_address: Address,
    ) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self
            .registry
            .update_operator_controlling_address(&cap, id, controlling_address)?)
    }

    pub fn update_operator_reward_address(
        &mut self,
        caller: &Address,
        id: OperatorId,
        reward_address: Address,
    ) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self.registry.update_operator_reward_address(&cap, id, reward_address)?)
    }

    pub fn update_operator_name(
        &mut self,
        caller: &Address,
        id: OperatorId,
        name: impl Into<String>,
    ) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self.registry.update_operator_name(&cap, id, name)?)
    }

    /// Append keys for the operator whose controlling address is `caller`.
    ///
    /// The caller is resolved to an operator before the pause flag or the
    /// batch is looked at.
    pub fn add_new_validator_details(
        &mut self,
        caller: &Address,
        batch: &[NewValidatorDetails],
    ) -> Result<(), LedgerError> {
        self.registry.require_controller(caller)?;
        self.pause.require_not_paused(PauseFlag::Operator)?;
        Ok(self.registry.add_new_validator_details(caller, batch)?)
    }

    pub fn delete_pending_validators(&mut self, caller: &Address, pub_keys: &[PubKey]) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self.registry.delete_pending_validators(&cap, pub_keys)?)
    }

    /// Deactivate keys outside a snapshot. Bots are held back by the bot
    /// pause flag; the platform admin is not.
    pub fn delete_active_validators(&mut self, caller: &Address, pub_keys: &[PubKey]) -> Result<(), LedgerError> {
        let cap = match self.roles.authorize(Role::Bot, caller) {
            Ok(cap) => {
                self.pause.require_not_paused(PauseFlag::Bot)?;
                cap
            }
            Err(_) => self.admin(caller)?,
        };
        Ok(self.registry.delete_active_validators(&cap, pub_keys)?)
    }

    /// Consume pending keys for new validator deposits.
    pub fn use_pubkeys_for_validator_setup(
        &mut self,
        caller: &Address,
        pub_keys: &[PubKey],
    ) -> Result<Vec<ValidatorDetails>, LedgerError> {
        let cap = self.roles.authorize(Role::DepositManager, caller)?;
        self.pause.require_not_paused(PauseFlag::Core)?;
        Ok(self.registry.use_pubkeys_for_validator_setup(&cap, pub_keys)?)
    }

    // ── Reprice and snapshots ────────────────────────────────────────────

    /// Direct reprice by a repricer account.
    pub fn reprice(
        &mut self,
        caller: &Address,
        env: BlockEnv,
        pre_reward_reserves: u128,
        new_rewards: u128,
        reported_supply: u128,
        collab: Collaborators<'_>,
    ) -> Result<RepriceEvent, LedgerError> {
        let cap = self.roles.authorize(Role::Repricer, caller)?;
        self.pause.require_not_paused(PauseFlag::Core)?;
        Ok(self.engine.reprice(
            &cap,
            &self.registry,
            collab.token,
            pre_reward_reserves,
            new_rewards,
            reported_supply,
            env.timestamp,
        )?)
    }

    pub fn submit_snapshot(
        &mut self,
        caller: &Address,
        env: BlockEnv,
        snapshot: &RepriceSnapshot,
        collab: Collaborators<'_>,
    ) -> Result<SnapshotOutcome, LedgerError> {
        self.submit_snapshot_with_exits(caller, env, snapshot, &[], None, collab)
    }

    /// Submit a snapshot, then deactivate `pubkeys_to_deactivate` and settle
    /// withdrawals up to `withdrawals_upto`.
    pub fn submit_snapshot_with_exits(
        &mut self,
        caller: &Address,
        env: BlockEnv,
        snapshot: &RepriceSnapshot,
        pubkeys_to_deactivate: &[PubKey],
        withdrawals_upto: Option<u64>,
        collab: Collaborators<'_>,
    ) -> Result<SnapshotOutcome, LedgerError> {
        let cap = self.roles.authorize(Role::Bot, caller)?;
        self.pause.require_not_paused(PauseFlag::Bot)?;
        let mut ctx = OracleContext {
            engine: &mut self.engine,
            registry: &mut self.registry,
            pause: &mut self.pause,
            token: collab.token,
            deposits: collab.deposits,
            exits: collab.exits,
            attestation: collab.attestation,
        };
        Ok(self.oracle.submit_snapshot_with_exits(
            &cap,
            env,
            snapshot,
            pubkeys_to_deactivate,
            withdrawals_upto,
            &mut ctx,
        )?)
    }

    // ── Admin setters ────────────────────────────────────────────────────
    // Not gated by pause flags, so bounds can be fixed while halted.

    pub fn set_reward_percentages(
        &mut self,
        caller: &Address,
        treasury_pct: u128,
        operator_pct: u128,
    ) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self.engine.set_reward_percentages(&cap, treasury_pct, operator_pct)?)
    }

    pub fn set_max_rate_diff_pct(&mut self, caller: &Address, pct: u128) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self.engine.set_max_rate_diff_pct(&cap, pct)?)
    }

    pub fn set_max_supply_diff_pct(&mut self, caller: &Address, pct: u128) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self.engine.set_max_supply_diff_pct(&cap, pct)?)
    }

    pub fn set_treasury_address(&mut self, caller: &Address, treasury: Address) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self.engine.set_treasury_address(&cap, treasury)?)
    }

    pub fn set_zero_active_validators_policy(
        &mut self,
        caller: &Address,
        policy: ZeroActiveValidatorsPolicy,
    ) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self.engine.set_zero_active_validators_policy(&cap, policy)?)
    }

    pub fn set_max_snapshot_staleness_blocks(&mut self, caller: &Address, blocks: u64) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self.oracle.set_max_snapshot_staleness_blocks(&cap, blocks)?)
    }

    pub fn set_max_reference_diff_pct(&mut self, caller: &Address, pct: u128) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self.oracle.set_max_reference_diff_pct(&cap, pct)?)
    }

    pub fn set_max_por_diff_pct(&mut self, caller: &Address, pct: u128) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self.oracle.set_max_por_diff_pct(&cap, pct)?)
    }

    pub fn set_por_staleness_secs(&mut self, caller: &Address, secs: u64) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self.oracle.set_por_staleness_secs(&cap, secs)?)
    }

    pub fn set_reserve_attestation_enabled(&mut self, caller: &Address, enabled: bool) -> Result<(), LedgerError> {
        let cap = self.admin(caller)?;
        Ok(self.oracle.set_reserve_attestation_enabled(&cap, enabled)?)
    }

    fn admin(&self, caller: &Address) -> Result<Capability, LedgerError> {
        Ok(self.roles.authorize(Role::PlatformAdmin, caller)?)
    }
}
