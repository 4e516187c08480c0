//! Operators and their partitioned key arrays.

use lsd_types::{Address, ValidatorDetails};
use serde::{Deserialize, Serialize};

/// 1-indexed operator identifier.
pub type OperatorId = u32;

/// Sentinel returned by lookups that found no operator.
pub const NO_OPERATOR: OperatorId = 0;

/// A node operator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: OperatorId,
    pub enabled: bool,
    /// Receives the operator's share of reprice rewards.
    pub reward_address: Address,
    /// The account that submits keys on the operator's behalf.
    pub controlling_address: Address,
    pub name: String,
    /// Number of keys at the front of the key array that are active.
    pub active_validator_count: u64,
}

/// An operator together with its key array.
///
/// `validators[..active]` are active, `validators[active..]` pending.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct OperatorEntry {
    pub(crate) operator: Operator,
    pub(crate) validators: Vec<ValidatorDetails>,
}

impl OperatorEntry {
    pub(crate) fn new(operator: Operator) -> Self {
        Self {
            operator,
            validators: Vec::new(),
        }
    }

    pub(crate) fn active_count(&self) -> usize {
        self.operator.active_validator_count as usize
    }

    pub(crate) fn stored_count(&self) -> usize {
        self.validators.len()
    }

    pub(crate) fn pending_count(&self) -> usize {
        self.stored_count() - self.active_count()
    }

    pub(crate) fn active(&self) -> &[ValidatorDetails] {
        &self.validators[..self.active_count()]
    }

    pub(crate) fn pending(&self) -> &[ValidatorDetails] {
        &self.validators[self.active_count()..]
    }
}
