//! Benchmarks for the per-tick cost of the simulation core.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use orrery_sim::SimWorld;

fn solar_system() -> SimWorld {
    match SimWorld::new_solar_system() {
        Ok(sim) => sim,
        Err(err) => panic!("failed to build solar system: {err}"),
    }
}

fn bench_step_once(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    group.bench_function("solar_system_tick", |b| {
        let mut sim = solar_system();
        b.iter(|| {
            sim.step_once();
            black_box(sim.current_tick())
        })
    });

    // Primaries scale quadratically; measure the force pass at a few sizes.
    for count in [8usize, 32, 128] {
        group.bench_with_input(BenchmarkId::new("primaries", count), &count, |b, &count| {
            let mut sim = SimWorld::new();
            sim.spawn_central("star", 1.98e30, 30.0, [1.0, 1.0, 1.0, 1.0])
                .unwrap();
            for i in 0..count {
                let r = 1.0e10 * (i + 1) as f64;
                sim.spawn_primary(
                    &format!("body{i}"),
                    -r,
                    0.0,
                    0.0,
                    -1.0e3,
                    1.0e24,
                    10.0,
                    [1.0, 1.0, 1.0, 1.0],
                )
                .unwrap();
            }
            b.iter(|| {
                sim.step_once();
                black_box(sim.current_tick())
            })
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    c.bench_function("snapshot_solar_system", |b| {
        let mut sim = solar_system();
        sim.step_n(100);
        b.iter(|| black_box(sim.snapshot()))
    });
}

criterion_group!(benches, bench_step_once, bench_snapshot);
criterion_main!(benches);
