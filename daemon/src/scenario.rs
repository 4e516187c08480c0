//! JSON scenarios replayed against a fresh ledger.
//!
//! A scenario is a list of steps. Every step runs as the configured admin,
//! which the replay grants each operational role first. Outside systems are
//! nullables, and snapshots are built the way an honest reporter would:
//! chained to the last accepted one, one block behind the head, with live
//! deposit, supply and exit totals.

use lsd_access::{PauseFlag, Role};
use lsd_ledger::{Collaborators, LedgerConfig, LedgerError, LedgerSummary, StakingLedger};
use lsd_nullables::{NullChain, NullDepositPool, NullExitQueue, NullReserveAttestation, NullToken};
use lsd_repricing::RepriceEvent;
use lsd_types::{
    Address, DepositPool, ExitQueue, NewValidatorDetails, PubKey, RepriceSnapshot, ReserveAttestation,
    ReserveBalances, SnapshotMeta, SnapshotState, Timestamp, TokenLedger, WithdrawState,
};
use lsd_utils::{format_wad, parse_wad, FormatError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// An ETH amount written as a decimal string, e.g. `"32"` or `"0.5"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Wad(pub u128);

impl TryFrom<String> for Wad {
    type Error = FormatError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse_wad(&s).map(Wad)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct KeyHex {
    pub pub_key: String,
    pub signature: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    AddOperator {
        name: String,
        controller: Address,
        reward: Address,
    },
    EnableOperator {
        id: u32,
    },
    DisableOperator {
        id: u32,
    },
    /// Submit explicit hex-encoded keys for `controller`.
    AddKeys {
        controller: Address,
        keys: Vec<KeyHex>,
    },
    /// Submit `count` deterministic keys derived from `controller`.
    GenerateKeys {
        controller: Address,
        count: u64,
    },
    /// Consume the next `count` keys picked by least-loaded selection.
    ActivateNext {
        count: usize,
    },
    Deposit {
        amount: Wad,
    },
    RequestExit {
        amount: Wad,
    },
    SettleExit {
        amount: Wad,
    },
    AdvanceBlocks {
        blocks: u64,
    },
    /// Publish a proof-of-reserve value stamped with the current time.
    Attest {
        value: Wad,
    },
    Snapshot {
        consensus: Wad,
        #[serde(default)]
        execution_layer: Wad,
        #[serde(default)]
        fees: Wad,
        #[serde(default)]
        deactivate: Vec<String>,
        #[serde(default)]
        withdrawals_upto: Option<u64>,
    },
    Reprice {
        pre_reward_reserves: Wad,
        new_rewards: Wad,
        #[serde(default)]
        reported_supply: Option<Wad>,
    },
    Pause {
        flag: PauseFlag,
    },
    Unpause {
        flag: PauseFlag,
    },
    UnpauseAll,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::AddOperator { .. } => "add_operator",
            Step::EnableOperator { .. } => "enable_operator",
            Step::DisableOperator { .. } => "disable_operator",
            Step::AddKeys { .. } => "add_keys",
            Step::GenerateKeys { .. } => "generate_keys",
            Step::ActivateNext { .. } => "activate_next",
            Step::Deposit { .. } => "deposit",
            Step::RequestExit { .. } => "request_exit",
            Step::SettleExit { .. } => "settle_exit",
            Step::AdvanceBlocks { .. } => "advance_blocks",
            Step::Attest { .. } => "attest",
            Step::Snapshot { .. } => "snapshot",
            Step::Reprice { .. } => "reprice",
            Step::Pause { .. } => "pause",
            Step::Unpause { .. } => "unpause",
            Step::UnpauseAll => "unpause_all",
        }
    }
}

fn default_start_block() -> u64 {
    1
}

fn default_start_timestamp() -> u64 {
    1_700_000_000
}

#[derive(Clone, Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub initial_supply: Wad,
    #[serde(default)]
    pub initial_deposits: Wad,
    #[serde(default = "default_start_block")]
    pub start_block: u64,
    #[serde(default = "default_start_timestamp")]
    pub start_timestamp: u64,
    pub steps: Vec<Step>,
}

/// Outcome of one replayed step.
#[derive(Clone, Debug, Serialize)]
pub struct StepRecord {
    pub step: usize,
    pub op: &'static str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A ledger plus the nullable world around it.
pub struct Replay {
    ledger: StakingLedger,
    actor: Address,
    token: NullToken,
    deposits: NullDepositPool,
    exits: NullExitQueue,
    attestation: Option<NullReserveAttestation>,
    chain: NullChain,
}

impl Replay {
    pub fn new(config: &LedgerConfig, scenario: &Scenario) -> Result<Self, LedgerError> {
        let mut ledger = StakingLedger::new(config)?;
        let actor = config.admin;
        for role in [
            Role::Bot,
            Role::Repricer,
            Role::DepositManager,
            Role::Pauser,
            Role::Unpauser,
        ] {
            ledger.grant_role(&actor, role, actor)?;
        }
        Ok(Self {
            ledger,
            actor,
            token: NullToken::with_supply(scenario.initial_supply.0),
            deposits: NullDepositPool::new(scenario.initial_deposits.0),
            exits: NullExitQueue::default(),
            attestation: None,
            chain: NullChain::new(scenario.start_block, scenario.start_timestamp),
        })
    }

    pub fn summary(&self) -> LedgerSummary {
        self.ledger.summary()
    }

    pub fn apply(&mut self, step: &Step) -> Result<Value, LedgerError> {
        let actor = self.actor;
        match step {
            Step::AddOperator {
                name,
                controller,
                reward,
            } => {
                let id = self.ledger.add_operator(&actor, name.clone(), *controller, *reward)?;
                Ok(json!({ "operator_id": id }))
            }
            Step::EnableOperator { id } => {
                self.ledger.enable_operator(&actor, *id)?;
                Ok(Value::Null)
            }
            Step::DisableOperator { id } => {
                self.ledger.disable_operator(&actor, *id)?;
                Ok(Value::Null)
            }
            Step::AddKeys { controller, keys } => {
                let batch = keys
                    .iter()
                    .map(|k| Ok(NewValidatorDetails::new(decode(&k.pub_key)?, decode(&k.signature)?)))
                    .collect::<Result<Vec<_>, LedgerError>>()?;
                self.ledger.add_new_validator_details(controller, &batch)?;
                Ok(json!({ "added": batch.len() }))
            }
            Step::GenerateKeys { controller, count } => {
                let batch: Vec<_> = (0..*count).map(|n| generated_key(controller, n)).collect();
                self.ledger.add_new_validator_details(controller, &batch)?;
                Ok(json!({ "added": batch.len() }))
            }
            Step::ActivateNext { count } => {
                let keys: Vec<PubKey> = self
                    .ledger
                    .get_next_validator_details(*count)
                    .iter()
                    .map(|d| d.pub_key)
                    .collect();
                if keys.is_empty() {
                    return Ok(json!({ "activated": [] }));
                }
                self.ledger.use_pubkeys_for_validator_setup(&actor, &keys)?;
                Ok(json!({ "activated": keys.iter().map(|k| k.to_string()).collect::<Vec<_>>() }))
            }
            Step::Deposit { amount } => {
                self.deposits.deposit(amount.0);
                self.token.set_supply(self.token.total_supply() + self.ledger.eth_to_token(amount.0)?);
                Ok(json!({ "total_eth_deposited": format_wad(self.deposits.total_eth_deposited()) }))
            }
            Step::RequestExit { amount } => {
                self.exits.request_exit(amount.0);
                Ok(json!({ "exiting_eth": format_wad(self.exits.exiting_eth()) }))
            }
            Step::SettleExit { amount } => {
                self.exits.settle(amount.0);
                Ok(json!({ "total_eth_exited": format_wad(self.exits.total_eth_exited()) }))
            }
            Step::AdvanceBlocks { blocks } => {
                self.chain.advance_blocks(*blocks);
                Ok(json!({ "block": self.chain.number(), "timestamp": self.chain.now().as_secs() }))
            }
            Step::Attest { value } => {
                self.attestation = Some(NullReserveAttestation::new(value.0, self.chain.now()));
                Ok(Value::Null)
            }
            Step::Snapshot {
                consensus,
                execution_layer,
                fees,
                deactivate,
                withdrawals_upto,
            } => {
                let snapshot = self.next_snapshot(consensus.0, execution_layer.0, fees.0);
                let pubkeys = deactivate
                    .iter()
                    .map(|hex| PubKey::from_slice(&decode(hex)?).map_err(|e| LedgerError::Config(e.to_string())))
                    .collect::<Result<Vec<_>, _>>()?;
                let env = self.chain.env();
                let collab = Collaborators {
                    token: &mut self.token,
                    deposits: &self.deposits,
                    exits: &mut self.exits,
                    attestation: self.attestation.as_ref().map(|a| a as &dyn ReserveAttestation),
                };
                let outcome = self.ledger.submit_snapshot_with_exits(
                    &actor,
                    env,
                    &snapshot,
                    &pubkeys,
                    *withdrawals_upto,
                    collab,
                )?;
                tracing::info!(
                    block = snapshot.meta.block_number,
                    rate = %format_wad(outcome.event.new_rate),
                    halted = outcome.halted,
                    "scenario snapshot accepted"
                );
                Ok(json!({
                    "halted": outcome.halted,
                    "reference_rate": format_wad(outcome.reference_rate),
                    "total_reserves": format_wad(outcome.estimate.total_reserves),
                    "event": event_json(&outcome.event),
                }))
            }
            Step::Reprice {
                pre_reward_reserves,
                new_rewards,
                reported_supply,
            } => {
                let supply = reported_supply.map_or_else(|| self.token.total_supply(), |s| s.0);
                let env = self.chain.env();
                let collab = Collaborators {
                    token: &mut self.token,
                    deposits: &self.deposits,
                    exits: &mut self.exits,
                    attestation: None,
                };
                let event = self.ledger.reprice(
                    &actor,
                    env,
                    pre_reward_reserves.0,
                    new_rewards.0,
                    supply,
                    collab,
                )?;
                Ok(event_json(&event))
            }
            Step::Pause { flag } => {
                self.ledger.pause(&actor, *flag)?;
                Ok(Value::Null)
            }
            Step::Unpause { flag } => {
                self.ledger.unpause(&actor, *flag)?;
                Ok(Value::Null)
            }
            Step::UnpauseAll => {
                self.ledger.unpause_all(&actor)?;
                Ok(Value::Null)
            }
        }
    }

    fn next_snapshot(&self, consensus: u128, execution_layer: u128, fees: u128) -> RepriceSnapshot {
        let last = self.ledger.oracle().last_snapshot().meta;
        RepriceSnapshot {
            meta: SnapshotMeta {
                block_number: self.chain.number().saturating_sub(1),
                block_of_last_snapshot: last.block_number,
                slot: last.slot + 1,
                timestamp: Timestamp::new(self.chain.now().as_secs().saturating_sub(1)),
            },
            state: SnapshotState {
                total_eth_deposited: self.deposits.total_eth_deposited(),
                token_total_supply: self.token.total_supply(),
                balances: ReserveBalances {
                    execution_layer,
                    consensus_v3: consensus,
                    ..ReserveBalances::default()
                },
            },
            withdraw_state: WithdrawState {
                total_eth_exited: self.exits.total_eth_exited(),
                exiting_eth: self.exits.exiting_eth(),
            },
            rewards_payable_for_fees: fees,
        }
    }
}

/// Replay every step, recording failures instead of stopping unless
/// `fail_fast` is set.
pub fn run(
    config: &LedgerConfig,
    scenario: &Scenario,
    fail_fast: bool,
) -> Result<(Vec<StepRecord>, LedgerSummary), LedgerError> {
    let mut replay = Replay::new(config, scenario)?;
    let mut records = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let record = match replay.apply(step) {
            Ok(result) => StepRecord {
                step: index,
                op: step.name(),
                ok: true,
                result: (!result.is_null()).then_some(result),
                error: None,
            },
            Err(err) => {
                tracing::warn!(step = index, op = step.name(), error = %err, "scenario step failed");
                if fail_fast {
                    return Err(err);
                }
                StepRecord {
                    step: index,
                    op: step.name(),
                    ok: false,
                    result: None,
                    error: Some(err.to_string()),
                }
            }
        };
        records.push(record);
    }
    Ok((records, replay.summary()))
}

fn decode(hex_str: &str) -> Result<Vec<u8>, LedgerError> {
    hex::decode(hex_str.trim_start_matches("0x")).map_err(|e| LedgerError::Config(format!("{hex_str}: {e}")))
}

/// Amounts are rendered as decimal ETH strings; JSON numbers cannot hold them.
fn event_json(event: &RepriceEvent) -> Value {
    let payouts: Vec<Value> = event
        .distributions
        .iter()
        .map(|p| {
            json!({
                "operator_id": p.operator_id,
                "reward_address": p.reward_address.to_string(),
                "amount": format_wad(p.amount),
            })
        })
        .collect();
    json!({
        "old_rate": format_wad(event.old_rate),
        "new_rate": format_wad(event.new_rate),
        "pre_reward_reserves": format_wad(event.pre_reward_reserves),
        "new_rewards": format_wad(event.new_rewards),
        "rewards_in_token": format_wad(event.rewards_in_token),
        "operator_rewards": format_wad(event.operator_rewards),
        "treasury_rewards": format_wad(event.treasury_rewards),
        "payouts": payouts,
        "at": event.at.as_secs(),
    })
}

/// Key `n` of `controller`: the controller address, zero padding, then `n`.
fn generated_key(controller: &Address, n: u64) -> NewValidatorDetails {
    let mut pub_key = vec![0u8; 48];
    pub_key[..20].copy_from_slice(controller.as_slice());
    pub_key[40..].copy_from_slice(&n.to_be_bytes());
    NewValidatorDetails::new(pub_key, vec![0u8; 96])
}
