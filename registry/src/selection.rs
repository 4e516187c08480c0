//! Least-loaded key selection for new deposits.

use lsd_types::ValidatorDetails;

use crate::registry::NodeOperatorRegistry;

impl NodeOperatorRegistry {
    /// Pick up to `n` pending keys for the next deposits, without side effects.
    ///
    /// Every slot re-scans the operators in id order and takes the next
    /// unassigned pending key of the enabled operator with the lowest
    /// `active + assigned` count. Ties go to the lower id. An operator at
    /// zero is taken without finishing the scan. Selection stops early when
    /// no operator has an unassigned pending key, so the result may be
    /// shorter than `n`.
    pub fn get_next_validator_details(&self, n: usize) -> Vec<ValidatorDetails> {
        let mut assigned = vec![0usize; self.operators.len()];
        let mut selected = Vec::with_capacity(n.min(self.num_pending_validators as usize));

        for _ in 0..n {
            let mut best: Option<(usize, usize)> = None;
            for (slot, entry) in self.operators.iter().enumerate() {
                if !entry.operator.enabled || entry.pending_count() == assigned[slot] {
                    continue;
                }
                let load = entry.active_count() + assigned[slot];
                if load == 0 {
                    best = Some((slot, load));
                    break;
                }
                if best.map_or(true, |(_, best_load)| load < best_load) {
                    best = Some((slot, load));
                }
            }

            let Some((slot, _)) = best else {
                break;
            };
            let entry = &self.operators[slot];
            selected.push(entry.validators[entry.active_count() + assigned[slot]]);
            assigned[slot] += 1;
        }

        tracing::debug!(requested = n, selected = selected.len(), "next validator details");
        selected
    }
}
