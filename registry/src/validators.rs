//! Validator key mutations: add, consume, remove pending, remove active.
//!
//! Every batch operation validates the whole batch before touching any
//! state, so a failure leaves the registry exactly as it was.

use lsd_access::{Capability, Role};
use lsd_types::{Address, NewValidatorDetails, PubKey, ValidatorDetails};
use std::collections::{HashMap, HashSet};

use crate::error::RegistryError;
use crate::operator::OperatorId;
use crate::registry::{ActiveKeyRef, KeyLocation, NodeOperatorRegistry};

impl NodeOperatorRegistry {
    /// Append keys to the pending region of the operator controlled by `controller`.
    pub fn add_new_validator_details(
        &mut self,
        controller: &Address,
        batch: &[NewValidatorDetails],
    ) -> Result<(), RegistryError> {
        let id = self.require_controller(controller)?;
        if batch.is_empty() {
            return Err(RegistryError::InvalidArrayLengthOfZero);
        }
        let entry = self.entry(id)?;
        if !entry.operator.enabled {
            return Err(RegistryError::CannotUseDisabledOperator(id));
        }

        let mut validated = Vec::with_capacity(batch.len());
        let mut seen = HashSet::with_capacity(batch.len());
        for raw in batch {
            let details = raw.validate()?;
            if self.key_locations.contains_key(&details.pub_key) {
                return Err(RegistryError::PubKeyAlreadyExists(details.pub_key));
            }
            if !seen.insert(details.pub_key) {
                return Err(RegistryError::DuplicatePubKeyInBatch(details.pub_key));
            }
            validated.push(details);
        }

        let added = validated.len();
        let entry = self.entry_mut(id)?;
        let base = entry.validators.len();
        entry.validators.extend_from_slice(&validated);
        for (offset, details) in validated.iter().enumerate() {
            self.key_locations.insert(
                details.pub_key,
                KeyLocation {
                    operator_id: id,
                    index: base + offset,
                },
            );
        }
        self.num_pending_validators += added as u64;
        tracing::info!(operator_id = id, added, "validator details added");
        Ok(())
    }

    /// Mark keys as used for new validator deposits.
    ///
    /// Each key must be the next pending key of an enabled operator, so an
    /// operator's keys are always consumed strictly in order. Returns the
    /// consumed records in input order.
    pub fn use_pubkeys_for_validator_setup(
        &mut self,
        cap: &Capability,
        pub_keys: &[PubKey],
    ) -> Result<Vec<ValidatorDetails>, RegistryError> {
        cap.ensure(Role::DepositManager)?;

        // Dry run against tentative active counts.
        let mut consumed_so_far: HashMap<OperatorId, usize> = HashMap::new();
        let mut plan = Vec::with_capacity(pub_keys.len());
        for pub_key in pub_keys {
            let loc = self
                .key_locations
                .get(pub_key)
                .copied()
                .ok_or(RegistryError::NoPubKeyFound(*pub_key))?;
            let entry = self.entry(loc.operator_id)?;
            if !entry.operator.enabled {
                return Err(RegistryError::CannotUseDisabledOperator(loc.operator_id));
            }
            let already = consumed_so_far.entry(loc.operator_id).or_default();
            if loc.index != entry.active_count() + *already {
                return Err(RegistryError::NextOperatorPubKeyMismatch {
                    operator_id: loc.operator_id,
                    got: *pub_key,
                });
            }
            *already += 1;
            plan.push(loc);
        }

        let mut used = Vec::with_capacity(plan.len());
        for loc in plan {
            let entry = self.entry_mut(loc.operator_id)?;
            used.push(entry.validators[loc.index]);
            entry.operator.active_validator_count += 1;
            self.active_keys.insert(ActiveKeyRef {
                operator_id: loc.operator_id,
                index: loc.index as u64,
            });
            self.num_pending_validators -= 1;
        }
        tracing::info!(count = used.len(), "pubkeys used for validator setup");
        Ok(used)
    }

    /// Remove keys that have not been used yet.
    pub fn delete_pending_validators(
        &mut self,
        cap: &Capability,
        pub_keys: &[PubKey],
    ) -> Result<(), RegistryError> {
        cap.ensure(Role::PlatformAdmin)?;
        if pub_keys.is_empty() {
            return Err(RegistryError::InvalidArrayLengthOfZero);
        }
        let mut seen = HashSet::with_capacity(pub_keys.len());
        for pub_key in pub_keys {
            let loc = self
                .key_locations
                .get(pub_key)
                .ok_or(RegistryError::NoPubKeyFound(*pub_key))?;
            if loc.index < self.entry(loc.operator_id)?.active_count() {
                return Err(RegistryError::MissingPendingValidatorDetails(*pub_key));
            }
            if !seen.insert(*pub_key) {
                return Err(RegistryError::DuplicatePubKeyInBatch(*pub_key));
            }
        }
        for pub_key in pub_keys {
            self.remove_pending(pub_key)?;
        }
        tracing::info!(count = pub_keys.len(), "pending validators deleted");
        Ok(())
    }

    /// Remove keys whose validators have exited.
    ///
    /// Accepts a platform-admin or bot capability; the bot path is how the
    /// oracle retroactively marks validators inactive.
    pub fn delete_active_validators(
        &mut self,
        cap: &Capability,
        pub_keys: &[PubKey],
    ) -> Result<(), RegistryError> {
        self.validate_active_removals(cap, pub_keys)?;
        // Active keys only move within the active region, so every key
        // validated above is still active when its turn comes.
        for pub_key in pub_keys {
            self.remove_active(pub_key)?;
        }
        tracing::info!(count = pub_keys.len(), "active validators deleted");
        Ok(())
    }

    /// Check that [`Self::delete_active_validators`] would accept this batch,
    /// without touching any state.
    pub fn validate_active_removals(
        &self,
        cap: &Capability,
        pub_keys: &[PubKey],
    ) -> Result<(), RegistryError> {
        if cap.ensure(Role::Bot).is_err() {
            cap.ensure(Role::PlatformAdmin)?;
        }
        if pub_keys.is_empty() {
            return Err(RegistryError::InvalidArrayLengthOfZero);
        }
        let mut seen = HashSet::with_capacity(pub_keys.len());
        for pub_key in pub_keys {
            let loc = self
                .key_locations
                .get(pub_key)
                .ok_or(RegistryError::NoPubKeyFound(*pub_key))?;
            if loc.index >= self.entry(loc.operator_id)?.active_count() {
                return Err(RegistryError::MissingActiveValidatorDetails(*pub_key));
            }
            if !seen.insert(*pub_key) {
                return Err(RegistryError::DuplicatePubKeyInBatch(*pub_key));
            }
        }
        Ok(())
    }

    /// Swap the key with the last pending key and truncate.
    fn remove_pending(&mut self, pub_key: &PubKey) -> Result<(), RegistryError> {
        let loc = self
            .key_locations
            .get(pub_key)
            .copied()
            .ok_or(RegistryError::NoPubKeyFound(*pub_key))?;
        let entry = self.entry_mut(loc.operator_id)?;
        if loc.index < entry.active_count() {
            return Err(RegistryError::MissingPendingValidatorDetails(*pub_key));
        }
        entry.validators.swap_remove(loc.index);
        let moved = entry.validators.get(loc.index).map(|v| v.pub_key);

        self.key_locations.remove(pub_key);
        if let Some(moved) = moved {
            self.key_locations.insert(moved, loc);
        }
        self.num_pending_validators -= 1;
        Ok(())
    }

    /// Remove an active key while keeping the partition intact.
    ///
    /// With `a` active keys and the target at `i < a`:
    /// 1. the last active key (`a - 1`) moves into `i`;
    /// 2. the last pending key, if any, moves into `a - 1`;
    /// 3. the array shrinks by one and the boundary moves to `a - 1`.
    ///
    /// A single swap with the overall last element would drag a pending key
    /// into the active region.
    fn remove_active(&mut self, pub_key: &PubKey) -> Result<(), RegistryError> {
        let loc = self
            .key_locations
            .get(pub_key)
            .copied()
            .ok_or(RegistryError::NoPubKeyFound(*pub_key))?;
        let operator_id = loc.operator_id;
        let entry = self.entry(operator_id)?;
        let active = entry.active_count();
        if loc.index >= active {
            return Err(RegistryError::MissingActiveValidatorDetails(*pub_key));
        }
        let last_active = active - 1;
        let boundary_ref = ActiveKeyRef {
            operator_id,
            index: last_active as u64,
        };
        if !self.active_keys.contains(&boundary_ref) {
            return Err(RegistryError::MissingActiveValidatorDetails(*pub_key));
        }

        let entry = self.entry_mut(operator_id)?;
        entry.validators.swap(loc.index, last_active);
        entry.validators.swap_remove(last_active);
        entry.operator.active_validator_count -= 1;
        let moved_active = (loc.index < last_active).then(|| entry.validators[loc.index].pub_key);
        let moved_pending = entry.validators.get(last_active).map(|v| v.pub_key);

        self.key_locations.remove(pub_key);
        if let Some(key) = moved_active {
            self.key_locations.insert(
                key,
                KeyLocation {
                    operator_id,
                    index: loc.index,
                },
            );
        }
        if let Some(key) = moved_pending {
            self.key_locations.insert(
                key,
                KeyLocation {
                    operator_id,
                    index: last_active,
                },
            );
        }
        self.active_keys.swap_remove(&boundary_ref);
        Ok(())
    }
}
