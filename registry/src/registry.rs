//! The registry container: operator CRUD and read-only queries.
//!
//! Key mutations live in [`crate::validators`], key selection in
//! [`crate::selection`].

use indexmap::IndexSet;
use lsd_access::{Capability, Role};
use lsd_types::{Address, PubKey, ValidatorDetails};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::RegistryError;
use crate::operator::{Operator, OperatorEntry, OperatorId, NO_OPERATOR};

/// Position of a key inside its operator's key array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveKeyRef {
    pub operator_id: OperatorId,
    pub index: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct KeyLocation {
    pub(crate) operator_id: OperatorId,
    pub(crate) index: usize,
}

/// Registry of node operators and their validator keys.
#[derive(Clone, Debug, Default)]
pub struct NodeOperatorRegistry {
    /// Operators in id order; operator `id` lives at `id - 1`.
    pub(crate) operators: Vec<OperatorEntry>,
    pub(crate) operator_by_controller: HashMap<Address, OperatorId>,
    /// Reverse index: every stored key and where it lives.
    pub(crate) key_locations: HashMap<PubKey, KeyLocation>,
    /// `(operator, position)` of every active key.
    pub(crate) active_keys: IndexSet<ActiveKeyRef>,
    pub(crate) num_pending_validators: u64,
}

impl NodeOperatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Operator CRUD ────────────────────────────────────────────────────

    /// Register a new, enabled operator. Ids are assigned sequentially from 1.
    pub fn add_operator(
        &mut self,
        cap: &Capability,
        name: impl Into<String>,
        controlling_address: Address,
        reward_address: Address,
    ) -> Result<OperatorId, RegistryError> {
        cap.ensure(Role::PlatformAdmin)?;
        if self.operator_by_controller.contains_key(&controlling_address) {
            return Err(RegistryError::OperatorAlreadyExists(controlling_address));
        }
        let id = OperatorId::try_from(self.operators.len() + 1)
            .map_err(|_| RegistryError::TooManyOperators)?;
        let operator = Operator {
            id,
            enabled: true,
            reward_address,
            controlling_address,
            name: name.into(),
            active_validator_count: 0,
        };
        tracing::info!(operator_id = id, name = %operator.name, controller = %controlling_address, "operator added");
        self.operators.push(OperatorEntry::new(operator));
        self.operator_by_controller.insert(controlling_address, id);
        Ok(id)
    }

    pub fn enable_operator(&mut self, cap: &Capability, id: OperatorId) -> Result<(), RegistryError> {
        cap.ensure(Role::PlatformAdmin)?;
        let entry = self.entry_mut(id)?;
        if entry.operator.enabled {
            return Err(RegistryError::OperatorAlreadyEnabled(id));
        }
        entry.operator.enabled = true;
        tracing::info!(operator_id = id, "operator enabled");
        Ok(())
    }

    pub fn disable_operator(&mut self, cap: &Capability, id: OperatorId) -> Result<(), RegistryError> {
        cap.ensure(Role::PlatformAdmin)?;
        let entry = self.entry_mut(id)?;
        if !entry.operator.enabled {
            return Err(RegistryError::OperatorAlreadyDisabled(id));
        }
        entry.operator.enabled = false;
        tracing::info!(operator_id = id, "operator disabled");
        Ok(())
    }

    /// Rebind an operator to a new controlling address.
    pub fn update_operator_controlling_address(
        &mut self,
        cap: &Capability,
        id: OperatorId,
        new_controller: Address,
    ) -> Result<(), RegistryError> {
        cap.ensure(Role::PlatformAdmin)?;
        let old_controller = self.entry(id)?.operator.controlling_address;
        if old_controller == new_controller {
            return Err(RegistryError::UnchangedValue(id));
        }
        if self.operator_by_controller.contains_key(&new_controller) {
            return Err(RegistryError::OperatorAlreadyExists(new_controller));
        }
        self.entry_mut(id)?.operator.controlling_address = new_controller;
        self.operator_by_controller.remove(&old_controller);
        self.operator_by_controller.insert(new_controller, id);
        tracing::info!(operator_id = id, old = %old_controller, new = %new_controller, "operator controller updated");
        Ok(())
    }

    pub fn update_operator_reward_address(
        &mut self,
        cap: &Capability,
        id: OperatorId,
        new_reward_address: Address,
    ) -> Result<(), RegistryError> {
        cap.ensure(Role::PlatformAdmin)?;
        let entry = self.entry_mut(id)?;
        if entry.operator.reward_address == new_reward_address {
            return Err(RegistryError::UnchangedValue(id));
        }
        entry.operator.reward_address = new_reward_address;
        tracing::info!(operator_id = id, reward_address = %new_reward_address, "operator reward address updated");
        Ok(())
    }

    pub fn update_operator_name(
        &mut self,
        cap: &Capability,
        id: OperatorId,
        name: impl Into<String>,
    ) -> Result<(), RegistryError> {
        cap.ensure(Role::PlatformAdmin)?;
        let name = name.into();
        let entry = self.entry_mut(id)?;
        if entry.operator.name == name {
            return Err(RegistryError::UnchangedValue(id));
        }
        tracing::info!(operator_id = id, old = %entry.operator.name, new = %name, "operator name updated");
        entry.operator.name = name;
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn num_operators(&self) -> usize {
        self.operators.len()
    }

    pub fn operator(&self, id: OperatorId) -> Result<&Operator, RegistryError> {
        Ok(&self.entry(id)?.operator)
    }

    /// All operators in ascending id order.
    pub fn operators(&self) -> impl Iterator<Item = &Operator> {
        self.operators.iter().map(|e| &e.operator)
    }

    /// Operator id controlled by `controller`, or [`NO_OPERATOR`].
    pub fn operator_id_for_controller(&self, controller: &Address) -> OperatorId {
        self.operator_by_controller
            .get(controller)
            .copied()
            .unwrap_or(NO_OPERATOR)
    }

    /// Operator id controlled by `controller`, failing with `NoOperatorFound`.
    pub fn require_controller(&self, controller: &Address) -> Result<OperatorId, RegistryError> {
        self.operator_by_controller
            .get(controller)
            .copied()
            .ok_or(RegistryError::NoOperatorFound(*controller))
    }

    /// Operator id owning `pub_key`, or [`NO_OPERATOR`].
    pub fn operator_id_for_pubkey(&self, pub_key: &PubKey) -> OperatorId {
        self.key_locations
            .get(pub_key)
            .map(|loc| loc.operator_id)
            .unwrap_or(NO_OPERATOR)
    }

    pub fn num_pending_validators(&self) -> u64 {
        self.num_pending_validators
    }

    /// Active validators across all operators, enabled or not.
    pub fn total_active_validators(&self) -> u64 {
        self.active_keys.len() as u64
    }

    pub fn operator_pending_validator_details(
        &self,
        id: OperatorId,
    ) -> Result<Vec<ValidatorDetails>, RegistryError> {
        Ok(self.entry(id)?.pending().to_vec())
    }

    pub fn operator_active_validator_details(
        &self,
        id: OperatorId,
    ) -> Result<Vec<ValidatorDetails>, RegistryError> {
        Ok(self.entry(id)?.active().to_vec())
    }

    /// Number of entries in the proof-of-reserve listing.
    pub fn por_address_list_len(&self) -> usize {
        self.active_keys.len()
    }

    /// Active pubkeys in `[start, end)` of the proof-of-reserve listing.
    ///
    /// `end` is clamped to the listing length.
    pub fn por_address_list(&self, start: usize, end: usize) -> Result<Vec<PubKey>, RegistryError> {
        if start > end {
            return Err(RegistryError::InvalidPoRAddressListRange { start, end });
        }
        let end = end.min(self.active_keys.len());
        let start = start.min(end);
        let mut out = Vec::with_capacity(end - start);
        for key_ref in self.active_keys.iter().skip(start).take(end - start) {
            let entry = self.entry(key_ref.operator_id)?;
            let index = key_ref.index as usize;
            let details = (index < entry.active_count())
                .then(|| entry.validators.get(index))
                .flatten()
                .ok_or(RegistryError::ActiveKeyOutOfRange {
                    operator_id: key_ref.operator_id,
                    index: key_ref.index,
                })?;
            out.push(details.pub_key);
        }
        Ok(out)
    }

    // ── Internal ─────────────────────────────────────────────────────────

    pub(crate) fn entry(&self, id: OperatorId) -> Result<&OperatorEntry, RegistryError> {
        if id == NO_OPERATOR {
            return Err(RegistryError::OperatorIdNotFound(id));
        }
        self.operators
            .get(id as usize - 1)
            .ok_or(RegistryError::OperatorIdNotFound(id))
    }

    pub(crate) fn entry_mut(&mut self, id: OperatorId) -> Result<&mut OperatorEntry, RegistryError> {
        if id == NO_OPERATOR {
            return Err(RegistryError::OperatorIdNotFound(id));
        }
        self.operators
            .get_mut(id as usize - 1)
            .ok_or(RegistryError::OperatorIdNotFound(id))
    }

    /// Check the partition and index invariants. Used by tests.
    #[doc(hidden)]
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut expected_active = 0usize;
        let mut expected_pending = 0u64;
        for entry in &self.operators {
            let id = entry.operator.id;
            if entry.active_count() > entry.stored_count() {
                return Err(format!("operator {id}: active count beyond stored keys"));
            }
            expected_active += entry.active_count();
            expected_pending += entry.pending_count() as u64;
            for (index, details) in entry.validators.iter().enumerate() {
                let loc = self.key_locations.get(&details.pub_key);
                if loc != Some(&KeyLocation { operator_id: id, index }) {
                    return Err(format!("operator {id}: stale location for key at {index}"));
                }
                let active_ref = ActiveKeyRef {
                    operator_id: id,
                    index: index as u64,
                };
                if self.active_keys.contains(&active_ref) != (index < entry.active_count()) {
                    return Err(format!("operator {id}: active set disagrees at {index}"));
                }
            }
        }
        if expected_active != self.active_keys.len() {
            return Err("active set has entries outside any active region".into());
        }
        if expected_pending != self.num_pending_validators {
            return Err("pending counter out of sync".into());
        }
        let stored: usize = self.operators.iter().map(|e| e.stored_count()).sum();
        if stored != self.key_locations.len() {
            return Err("reverse index has keys no operator stores".into());
        }
        Ok(())
    }
}
