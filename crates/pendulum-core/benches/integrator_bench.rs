// ─────────────────────────────────────────────────────────────────────
// Double Pendulum Core — Integrator Benchmark
// © 1998–2026 Miroslav Šotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

use criterion::{criterion_group, criterion_main, Criterion};
use pendulum_core::dynamics::derivatives;
use pendulum_core::energy::energy_series;
use pendulum_core::integrator::{IntegrationStrategy, Integrator};
use pendulum_types::state::{PendulumParameters, PendulumState};
use std::hint::black_box;

fn example() -> (PendulumParameters, PendulumState) {
    (
        PendulumParameters::new(2.0, 10.0, 1.0, 1.0, 9.81).expect("valid parameters"),
        PendulumState::from_degrees(20.0, 0.0, 1.0, 1.0),
    )
}

fn bench_derivatives(c: &mut Criterion) {
    let (params, state) = example();
    c.bench_function("derivatives", |b| {
        b.iter(|| black_box(derivatives(black_box(&params), black_box(&state))))
    });
}

fn bench_integrate(c: &mut Criterion) {
    let (params, state) = example();
    let mut group = c.benchmark_group("integrate_30s_2000_samples");

    for strategy in [
        IntegrationStrategy::FixedStepRk4,
        IntegrationStrategy::AdaptiveHighOrder,
    ] {
        let integrator = Integrator::new(strategy);
        group.bench_function(strategy.to_string(), |b| {
            b.iter(|| {
                let traj = integrator
                    .integrate(&params, state, (0.0, 30.0), 2000)
                    .expect("integration should succeed");
                black_box(traj.final_state());
            })
        });
    }

    group.finish();
}

fn bench_energy_series(c: &mut Criterion) {
    let (params, state) = example();
    let traj = Integrator::new(IntegrationStrategy::FixedStepRk4)
        .integrate(&params, state, (0.0, 30.0), 2000)
        .expect("integration should succeed");
    c.bench_function("energy_series_2000", |b| {
        b.iter(|| black_box(energy_series(&params, black_box(&traj))))
    });
}

criterion_group!(
    benches,
    bench_derivatives,
    bench_integrate,
    bench_energy_series
);
criterion_main!(benches);
