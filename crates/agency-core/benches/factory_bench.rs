//! Performance benchmarks for agent generation

use agency_core::{new_agent_at, SeededSource, ThreadRngSource};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn benchmark_agent_factory(c: &mut Criterion) {
    let mut group = c.benchmark_group("agency_agent_factory");

    group.bench_function("thread_rng", |b| {
        b.iter(|| black_box(new_agent_at("Shadow", "female", &ThreadRngSource, 0)));
    });

    let seeded = SeededSource::new(42);
    group.bench_function("seeded", |b| {
        b.iter(|| black_box(new_agent_at("Shadow", "female", &seeded, 0)));
    });

    group.finish();
}

criterion_group!(benches, benchmark_agent_factory);
criterion_main!(benches);
