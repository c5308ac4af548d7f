//! hwtally classification benchmarks
//!
//! - Single-threaded tally over mixed inventories
//! - Shard merge cost

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hwtally_common::HostFacts;
use hwtally_engine::{TallyRunner, UsageCalculation};

fn mixed_inventory(size: usize) -> Vec<HostFacts> {
    (0..size)
        .map(|i| match i % 5 {
            0 => HostFacts::hypervisor(16, 2),
            1 => HostFacts::guest(4, 1, false),
            2 => HostFacts::guest(4, 1, true),
            3 => HostFacts::physical(8, 2),
            _ => HostFacts::cloud("aws", 4, 1),
        })
        .collect()
}

fn bench_tally_product(c: &mut Criterion) {
    let mut group = c.benchmark_group("tally");
    let runner = TallyRunner::with_defaults();

    for size in [100usize, 1_000, 10_000].iter() {
        let hosts = mixed_inventory(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("rhel", size), &hosts, |b, hosts| {
            b.iter(|| runner.tally_product("RHEL", black_box(hosts)))
        });
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let runner = TallyRunner::with_defaults();
    let hosts = mixed_inventory(1_000);
    let shard = runner
        .tally_product("RHEL", &hosts)
        .expect("benchmark inventory is valid");

    c.bench_function("merge_shard", |b| {
        b.iter(|| {
            let mut merged = UsageCalculation::new("RHEL");
            merged.merge(black_box(shard.clone())).expect("same product");
            merged
        })
    });
}

criterion_group!(benches, bench_tally_product, bench_merge);
criterion_main!(benches);
