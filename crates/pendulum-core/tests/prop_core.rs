// ─────────────────────────────────────────────────────────────────────
// Double Pendulum Core — Property-Based Tests (proptest) for pendulum-core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for pendulum-core using proptest.
//!
//! Covers: equations of motion finiteness, energy bookkeeping, output
//! grid shape, determinism, ensemble ordering.

use pendulum_core::dynamics::derivatives;
use pendulum_core::energy::{energy, lagrangian, max_energy_drift, relative_energy_drift};
use pendulum_core::ensemble::{perturbed_initial_states, EnsembleRunner};
use pendulum_core::integrator::{integrate, IntegrationStrategy, Integrator};
use pendulum_types::state::{PendulumParameters, PendulumState};
use proptest::prelude::*;

fn arb_params() -> impl Strategy<Value = PendulumParameters> {
    (0.1f64..20.0, 0.1f64..20.0, 0.1f64..5.0, 0.1f64..5.0, 1.0f64..20.0).prop_map(
        |(m1, m2, l1, l2, g)| PendulumParameters::new(m1, m2, l1, l2, g).unwrap(),
    )
}

fn arb_state() -> impl Strategy<Value = PendulumState> {
    (
        -20.0f64..20.0,
        -20.0f64..20.0,
        -50.0f64..50.0,
        -50.0f64..50.0,
    )
        .prop_map(|(a, b, wa, wb)| PendulumState::new(a, b, wa, wb))
}

// ── Equations of Motion ──────────────────────────────────────────────

proptest! {
    /// Finite state + valid parameters → finite derivative.
    #[test]
    fn derivatives_finite(p in arb_params(), s in arb_state()) {
        let d = derivatives(&p, &s);
        prop_assert!(d.to_array().iter().all(|v| v.is_finite()), "{:?} -> {:?}", s, d);
        prop_assert_eq!(d.theta_1_dot, s.omega_1);
        prop_assert_eq!(d.theta_2_dot, s.omega_2);
    }

    /// Shifting both angles by 2π leaves the dynamics unchanged.
    #[test]
    fn derivatives_periodic_in_angles(p in arb_params(), s in arb_state()) {
        let tau = std::f64::consts::TAU;
        let shifted = PendulumState::new(s.theta_1 + tau, s.theta_2 - tau, s.omega_1, s.omega_2);
        let a = derivatives(&p, &s);
        let b = derivatives(&p, &shifted);
        // Magnitude of the largest numerator term over the smallest denominator.
        let m = p.total_mass();
        let bound = (m * (p.length_1() + p.length_2()) * (s.omega_1.powi(2) + s.omega_2.powi(2))
            + 2.0 * m * p.gravity())
            / (p.length_1().min(p.length_2()) * p.mass_1());
        prop_assert!((a.omega_1_dot - b.omega_1_dot).abs() < 1e-12 * bound);
        prop_assert!((a.omega_2_dot - b.omega_2_dot).abs() < 1e-12 * bound);
    }
}

// ── Energy ───────────────────────────────────────────────────────────

proptest! {
    /// total = kinetic + potential, kinetic ≥ 0, L = T − V.
    #[test]
    fn energy_bookkeeping(p in arb_params(), s in arb_state()) {
        let e = energy(&p, &s);
        prop_assert!(e.kinetic >= -1e-9 * (1.0 + e.kinetic.abs()));
        prop_assert_eq!(e.total, e.kinetic + e.potential);
        prop_assert_eq!(lagrangian(&p, &s), e.kinetic - e.potential);
    }
}

// ── Integration ──────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Both strategies return the requested grid, starting from the input.
    #[test]
    fn output_grid_shape(
        theta_1 in -1.0f64..1.0,
        theta_2 in -1.0f64..1.0,
        end in 0.1f64..2.0,
        n in 2usize..60,
        fixed in any::<bool>(),
    ) {
        let p = PendulumParameters::new(1.0, 1.0, 1.0, 1.0, 9.81).unwrap();
        let s = PendulumState::new(theta_1, theta_2, 0.0, 0.0);
        let strategy = if fixed {
            IntegrationStrategy::FixedStepRk4
        } else {
            IntegrationStrategy::AdaptiveHighOrder
        };
        let traj = integrate(&p, s, (0.0, end), n, strategy).unwrap();
        prop_assert!(traj.succeeded);
        prop_assert_eq!(traj.len(), n);
        prop_assert_eq!(traj.times[0], 0.0);
        prop_assert_eq!(traj.times[n - 1], end);
        prop_assert_eq!(traj.states[0], s);
        prop_assert!(traj.times.windows(2).all(|w| w[1] > w[0]));
    }

    /// Adaptive runs conserve energy over short spans, |E(t) − E(0)| < 1e-6.
    #[test]
    fn adaptive_energy_conserved(
        theta_1 in -1.0f64..1.0,
        theta_2 in -1.0f64..1.0,
    ) {
        let p = PendulumParameters::new(2.0, 10.0, 1.0, 1.0, 9.81).unwrap();
        let s = PendulumState::new(theta_1, theta_2, 0.0, 0.0);
        let traj = integrate(&p, s, (0.0, 1.0), 51, IntegrationStrategy::AdaptiveHighOrder).unwrap();
        prop_assert!(traj.succeeded);
        let drift = max_energy_drift(&p, &traj);
        prop_assert!(drift < 1e-6, "drift {} J from {:?}", drift, s);
        let relative = relative_energy_drift(&p, &traj);
        prop_assert!(relative < 1e-7, "relative drift {} from {:?}", relative, s);
    }

    /// Same inputs, same bits.
    #[test]
    fn integration_deterministic(s in arb_state(), fixed in any::<bool>()) {
        let p = PendulumParameters::new(2.0, 10.0, 1.0, 1.0, 9.81).unwrap();
        let strategy = if fixed {
            IntegrationStrategy::FixedStepRk4
        } else {
            IntegrationStrategy::AdaptiveHighOrder
        };
        let a = integrate(&p, s, (0.0, 0.5), 20, strategy).unwrap();
        let b = integrate(&p, s, (0.0, 0.5), 20, strategy).unwrap();
        prop_assert_eq!(a, b);
    }
}

// ── Ensembles ────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Member `i` starts at `theta_1 + i * perturbation`, nothing else changes.
    #[test]
    fn perturbation_ordering(
        s in arb_state(),
        count in 1usize..32,
        perturbation in 1e-8f64..1e-1,
    ) {
        let states = perturbed_initial_states(s, count, perturbation).unwrap();
        prop_assert_eq!(states.len(), count);
        for (i, st) in states.iter().enumerate() {
            prop_assert_eq!(st.theta_1, s.theta_1 + i as f64 * perturbation);
            prop_assert_eq!(st.theta_2, s.theta_2);
            prop_assert_eq!(st.omega_1, s.omega_1);
            prop_assert_eq!(st.omega_2, s.omega_2);
        }
        prop_assert!(states.windows(2).all(|w| w[1].theta_1 > w[0].theta_1));
    }

    /// Parallel and sequential ensembles are bit-identical.
    #[test]
    fn ensemble_parallel_equals_sequential(
        theta_1 in -1.0f64..1.0,
        count in 1usize..6,
        fixed in any::<bool>(),
    ) {
        let p = PendulumParameters::new(2.0, 10.0, 1.0, 1.0, 9.81).unwrap();
        let s = PendulumState::new(theta_1, 0.0, 0.0, 0.0);
        let strategy = if fixed {
            IntegrationStrategy::FixedStepRk4
        } else {
            IntegrationStrategy::AdaptiveHighOrder
        };
        let runner = EnsembleRunner::new(Integrator::new(strategy), (0.0, 0.5), 20);
        let parallel = runner.run(&p, s, count, 1e-4).unwrap();
        let sequential = runner.sequential().run(&p, s, count, 1e-4).unwrap();
        prop_assert_eq!(parallel, sequential);
    }
}
