//! Criterion benchmarks for the marching engine.
//! Focus sizes: seed count per side n in {5, 10, 20}.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p moc

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use moc::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_points(m: usize, seed: u64) -> Vec<FluidPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let gas = Gas {
        gamma: 1.4,
        total_pressure: 1.0,
    };
    (0..m)
        .map(|_| {
            let pos = Vec2::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0));
            let inv = Invariants::from_angles(rng.gen_range(0.3..0.8), rng.gen_range(-0.2..0.2));
            FluidPoint::seed(pos, inv, gas, Boundary::None).unwrap()
        })
        .collect()
}

fn bench_intersect(c: &mut Criterion) {
    let pts = random_points(64, 42);
    let rays: Vec<Characteristic> = pts
        .iter()
        .enumerate()
        .flat_map(|(k, p)| {
            [Family::GammaPlus, Family::GammaMinus]
                .into_iter()
                .filter_map(move |f| Characteristic::shoot(PointId(k), p, f))
        })
        .collect();
    let cfg = MarchCfg::default();
    c.bench_function("intersect_all_pairs_128", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for a in &rays {
                for g in &rays {
                    if a.intersect(g, &pts, &cfg).is_some() {
                        hits += 1;
                    }
                }
            }
            hits
        })
    });
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("jet_run");
    for &n in &[5usize, 10, 20] {
        let cfg = JetConfig {
            fan_rays: n,
            inlet_points: n,
            ..JetConfig::default()
        };
        group.bench_with_input(BenchmarkId::new("run_50", n), &cfg, |b, cfg| {
            b.iter_batched(
                || GeometryCluster::new(seed_points(cfg).unwrap(), MarchCfg::default()),
                |mut gc| {
                    let _report = gc.run(50).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_intersect, bench_run);
criterion_main!(benches);
