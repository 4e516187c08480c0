use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use lsd_access::{AccessControl, Role, RoleRegistry};
use lsd_registry::NodeOperatorRegistry;
use lsd_types::{address_from_byte, Address, NewValidatorDetails};

fn make_registry(operators: u32, keys_per_operator: u32, active_per_operator: usize) -> NodeOperatorRegistry {
    let admin = address_from_byte(255);
    let mut roles = RoleRegistry::with_admin(admin);
    let cap = roles.authorize(Role::PlatformAdmin, &admin).unwrap();
    roles.grant(&cap, Role::DepositManager, address_from_byte(254)).unwrap();
    let deposit = roles.authorize(Role::DepositManager, &address_from_byte(254)).unwrap();
    let mut registry = NodeOperatorRegistry::new();
    for op in 0..operators {
        let controller = Address::left_padding_from(&op.to_be_bytes());
        registry
            .add_operator(&cap, format!("op{op}"), controller, controller)
            .unwrap();
        let batch: Vec<_> = (0..keys_per_operator)
            .map(|k| {
                let mut pub_key = vec![0u8; 48];
                pub_key[..4].copy_from_slice(&op.to_be_bytes());
                pub_key[4..8].copy_from_slice(&k.to_be_bytes());
                NewValidatorDetails::new(pub_key, vec![0u8; 96])
            })
            .collect();
        registry.add_new_validator_details(&controller, &batch).unwrap();
    }
    let picked: Vec<_> = registry
        .get_next_validator_details(active_per_operator * operators as usize)
        .iter()
        .map(|d| d.pub_key)
        .collect();
    if !picked.is_empty() {
        registry.use_pubkeys_for_validator_setup(&deposit, &picked).unwrap();
    }
    registry
}

fn bench_next_validator_details(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_validator_details");

    for operator_count in [1, 10, 100] {
        let registry = make_registry(operator_count, 50, 10);
        group.bench_with_input(
            BenchmarkId::new("select_32", operator_count),
            &operator_count,
            |b, _| {
                b.iter(|| black_box(registry.get_next_validator_details(black_box(32))));
            },
        );
    }

    group.finish();
}

fn bench_por_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("por_address_list");

    for operator_count in [10, 100] {
        let registry = make_registry(operator_count, 20, 20);
        group.bench_with_input(
            BenchmarkId::new("full_listing", operator_count),
            &operator_count,
            |b, _| {
                b.iter(|| black_box(registry.por_address_list(0, usize::MAX)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_next_validator_details, bench_por_listing);
criterion_main!(benches);
