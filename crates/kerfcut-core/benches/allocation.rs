use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kerfcut_core::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generate_demand(count: usize, min_size: u32, max_size: u32) -> Vec<Demand> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min_size..=max_size);
            let h = rng.gen_range(min_size..=max_size);
            Demand::new(format!("part_{}", i), w, h, rng.gen_range(1..=3))
        })
        .collect()
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");

    for count in [20, 80, 200] {
        let demand = generate_demand(count, 150, 1200);
        group.throughput(Throughput::Elements(count as u64));

        for (name, order) in [("caller_order", SortOrder::None), ("area_desc", SortOrder::AreaDesc)] {
            let cfg = PlanConfig::builder()
                .with_board(2070, 2800)
                .kerf(3)
                .sort_order(order)
                .build();
            group.bench_with_input(BenchmarkId::new(name, count), &demand, |b, demand| {
                b.iter(|| black_box(plan(demand, &cfg)))
            });
        }
    }

    group.finish();
}

fn bench_cut_length(c: &mut Criterion) {
    let cfg = PlanConfig::builder()
        .with_board(2070, 2800)
        .trim(Trim::uniform(10))
        .build();
    let Ok(out) = plan(&generate_demand(200, 100, 600), &cfg) else {
        return;
    };
    c.bench_function("cut_length_all_boards", |b| {
        b.iter(|| {
            for board in &out.boards {
                black_box(kerfcut_core::cut_length::estimate_for_spec(board, &cfg.board));
            }
        })
    });
}

criterion_group!(benches, bench_plan, bench_cut_length);
criterion_main!(benches);
