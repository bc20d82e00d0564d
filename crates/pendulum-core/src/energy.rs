// ─────────────────────────────────────────────────────────────────────
// Double Pendulum Core — Energy Diagnostics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Kinetic, potential and total energy of a double pendulum state.
//!
//! ```text
//! T = ½ M l₁² ω₁² + ½ m₂ l₂² ω₂² + m₂ l₁ l₂ ω₁ ω₂ cos(θ₁ − θ₂)
//! V = −M g l₁ cos θ₁ − m₂ g l₂ cos θ₂
//! ```
//!
//! Total energy is conserved by the exact dynamics, so its drift along a
//! trajectory measures integration error.

use serde::Serialize;

use pendulum_types::state::{Ensemble, PendulumParameters, PendulumState, Trajectory};

/// Energy triple of one state [J].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyBreakdown {
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
}

pub fn kinetic_energy(params: &PendulumParameters, state: &PendulumState) -> f64 {
    let m2 = params.mass_2();
    let l1 = params.length_1();
    let l2 = params.length_2();
    let (w1, w2) = (state.omega_1, state.omega_2);

    0.5 * params.total_mass() * l1 * l1 * w1 * w1
        + 0.5 * m2 * l2 * l2 * w2 * w2
        + m2 * l1 * l2 * w1 * w2 * (state.theta_1 - state.theta_2).cos()
}

/// Potential energy with the pivot as reference height.
pub fn potential_energy(params: &PendulumParameters, state: &PendulumState) -> f64 {
    let g = params.gravity();
    -params.total_mass() * g * params.length_1() * state.theta_1.cos()
        - params.mass_2() * g * params.length_2() * state.theta_2.cos()
}

pub fn energy(params: &PendulumParameters, state: &PendulumState) -> EnergyBreakdown {
    let kinetic = kinetic_energy(params, state);
    let potential = potential_energy(params, state);
    EnergyBreakdown {
        kinetic,
        potential,
        total: kinetic + potential,
    }
}

/// `L = T − V`.
pub fn lagrangian(params: &PendulumParameters, state: &PendulumState) -> f64 {
    kinetic_energy(params, state) - potential_energy(params, state)
}

/// One triple per trajectory sample, same order as `trajectory.states`.
pub fn energy_series(params: &PendulumParameters, trajectory: &Trajectory) -> Vec<EnergyBreakdown> {
    trajectory
        .states
        .iter()
        .map(|s| energy(params, s))
        .collect()
}

/// Energy series of every ensemble member, in member order.
pub fn ensemble_energy_series(ensemble: &Ensemble) -> Vec<Vec<EnergyBreakdown>> {
    ensemble
        .members
        .iter()
        .map(|m| energy_series(&m.parameters, &m.trajectory))
        .collect()
}

/// `max_k |E(t_k) − E(t_0)|`; zero for an empty trajectory.
pub fn max_energy_drift(params: &PendulumParameters, trajectory: &Trajectory) -> f64 {
    let Some(first) = trajectory.states.first() else {
        return 0.0;
    };
    let e0 = energy(params, first).total;
    trajectory
        .states
        .iter()
        .map(|s| (energy(params, s).total - e0).abs())
        .fold(0.0, f64::max)
}

/// Maximum drift relative to `|E(t_0)|`.
///
/// Falls back to the absolute drift when the initial energy is zero.
pub fn relative_energy_drift(params: &PendulumParameters, trajectory: &Trajectory) -> f64 {
    let drift = max_energy_drift(params, trajectory);
    let e0 = trajectory
        .states
        .first()
        .map(|s| energy(params, s).total.abs())
        .unwrap_or(0.0);
    if e0 > 0.0 {
        drift / e0
    } else {
        drift
    }
}
