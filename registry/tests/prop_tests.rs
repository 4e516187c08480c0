use proptest::prelude::*;
use std::collections::HashSet;

use lsd_access::{AccessControl, Capability, Role, RoleRegistry};
use lsd_registry::NodeOperatorRegistry;
use lsd_types::{address_from_byte, NewValidatorDetails, PubKey};

const OPERATORS: u8 = 4;

#[derive(Clone, Debug)]
enum Op {
    Add { operator: u8, count: u8 },
    Consume { n: usize },
    RemovePending { operator: u8, pick: usize },
    RemoveActive { operator: u8, pick: usize },
    Toggle { operator: u8 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1..=OPERATORS, 1u8..4).prop_map(|(operator, count)| Op::Add { operator, count }),
        (1usize..5).prop_map(|n| Op::Consume { n }),
        (1..=OPERATORS, 0usize..8).prop_map(|(operator, pick)| Op::RemovePending { operator, pick }),
        (1..=OPERATORS, 0usize..8).prop_map(|(operator, pick)| Op::RemoveActive { operator, pick }),
        (1..=OPERATORS).prop_map(|operator| Op::Toggle { operator }),
    ]
}

struct Harness {
    registry: NodeOperatorRegistry,
    admin: Capability,
    deposit: Capability,
    bot: Capability,
    next_key: u16,
}

impl Harness {
    fn new() -> Self {
        let admin = address_from_byte(200);
        let mut roles = RoleRegistry::with_admin(admin);
        let admin_cap = roles.authorize(Role::PlatformAdmin, &admin).unwrap();
        roles.grant(&admin_cap, Role::DepositManager, address_from_byte(201)).unwrap();
        roles.grant(&admin_cap, Role::Bot, address_from_byte(202)).unwrap();
        let mut registry = NodeOperatorRegistry::new();
        for op in 1..=OPERATORS {
            registry
                .add_operator(&admin_cap, format!("op{op}"), address_from_byte(op), address_from_byte(op + 100))
                .unwrap();
        }
        Self {
            registry,
            deposit: roles.authorize(Role::DepositManager, &address_from_byte(201)).unwrap(),
            bot: roles.authorize(Role::Bot, &address_from_byte(202)).unwrap(),
            admin: admin_cap,
            next_key: 0,
        }
    }

    fn fresh_key(&mut self) -> NewValidatorDetails {
        self.next_key += 1;
        let mut pub_key = vec![7u8; 48];
        pub_key[..2].copy_from_slice(&self.next_key.to_be_bytes());
        NewValidatorDetails::new(pub_key, vec![1u8; 96])
    }
}

proptest! {
    /// Any operation sequence keeps the partition and both indexes consistent,
    /// and every active key was handed out by `use_pubkeys_for_validator_setup`.
    #[test]
    fn registry_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut h = Harness::new();
        let mut consumed: HashSet<PubKey> = HashSet::new();

        for op in ops {
            match op {
                Op::Add { operator, count } => {
                    let batch: Vec<_> = (0..count).map(|_| h.fresh_key()).collect();
                    let _ = h.registry.add_new_validator_details(&address_from_byte(operator), &batch);
                }
                Op::Consume { n } => {
                    let picked: Vec<PubKey> = h
                        .registry
                        .get_next_validator_details(n)
                        .iter()
                        .map(|d| d.pub_key)
                        .collect();
                    if !picked.is_empty() {
                        let used = h.registry.use_pubkeys_for_validator_setup(&h.deposit, &picked).unwrap();
                        consumed.extend(used.iter().map(|d| d.pub_key));
                    }
                }
                Op::RemovePending { operator, pick } => {
                    let pending = h.registry.operator_pending_validator_details(operator.into()).unwrap();
                    if let Some(details) = pending.get(pick) {
                        h.registry.delete_pending_validators(&h.admin, &[details.pub_key]).unwrap();
                    }
                }
                Op::RemoveActive { operator, pick } => {
                    let active = h.registry.operator_active_validator_details(operator.into()).unwrap();
                    if let Some(details) = active.get(pick) {
                        h.registry.delete_active_validators(&h.bot, &[details.pub_key]).unwrap();
                    }
                }
                Op::Toggle { operator } => {
                    let id = operator.into();
                    if h.registry.operator(id).unwrap().enabled {
                        h.registry.disable_operator(&h.admin, id).unwrap();
                    } else {
                        h.registry.enable_operator(&h.admin, id).unwrap();
                    }
                }
            }
            prop_assert_eq!(h.registry.check_invariants(), Ok(()));
        }

        for op in 1..=OPERATORS {
            for details in h.registry.operator_active_validator_details(op.into()).unwrap() {
                prop_assert!(consumed.contains(&details.pub_key));
            }
        }
    }

    /// Selection never hands out keys of disabled operators and never exceeds `n`.
    #[test]
    fn selection_respects_disabled_operators(
        counts in prop::collection::vec(0u8..5, OPERATORS as usize),
        disabled in prop::collection::vec(any::<bool>(), OPERATORS as usize),
        n in 0usize..20,
    ) {
        let mut h = Harness::new();
        for (i, count) in counts.iter().enumerate() {
            if *count > 0 {
                let batch: Vec<_> = (0..*count).map(|_| h.fresh_key()).collect();
                h.registry.add_new_validator_details(&address_from_byte(i as u8 + 1), &batch).unwrap();
            }
        }
        for (i, off) in disabled.iter().enumerate() {
            if *off {
                h.registry.disable_operator(&h.admin, i as u32 + 1).unwrap();
            }
        }

        let picked = h.registry.get_next_validator_details(n);
        prop_assert!(picked.len() <= n);
        for details in &picked {
            let owner = h.registry.operator_id_for_pubkey(&details.pub_key);
            prop_assert!(h.registry.operator(owner).unwrap().enabled);
        }
        let eligible: usize = counts
            .iter()
            .zip(&disabled)
            .filter(|(_, off)| !**off)
            .map(|(c, _)| *c as usize)
            .sum();
        prop_assert_eq!(picked.len(), n.min(eligible));
    }
}
