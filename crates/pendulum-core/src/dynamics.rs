// ─────────────────────────────────────────────────────────────────────
// Double Pendulum Core — Equations of Motion
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Point-mass double pendulum, massless rigid rods, no friction.
//!
//! With `δ = θ₁ − θ₂`, `M = m₁ + m₂` and `α = m₁ + m₂ sin²δ`:
//!
//! ```text
//! ω̇₁ = [−sin δ (m₂ l₁ ω₁² cos δ + m₂ l₂ ω₂²) − g (M sin θ₁ − m₂ sin θ₂ cos δ)] / (l₁ α)
//! ω̇₂ = [ sin δ (M l₁ ω₁² + m₂ l₂ ω₂² cos δ) + g (M sin θ₁ cos δ − M sin θ₂)] / (l₂ α)
//! ```
//!
//! `α ≥ m₁ > 0`, so the right-hand side is finite for every finite state.

use pendulum_types::constants::STATE_DIM;
use pendulum_types::state::{PendulumParameters, PendulumState};

/// Time derivative of a [`PendulumState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateDerivative {
    pub theta_1_dot: f64,
    pub theta_2_dot: f64,
    pub omega_1_dot: f64,
    pub omega_2_dot: f64,
}

impl StateDerivative {
    pub fn to_array(&self) -> [f64; STATE_DIM] {
        [
            self.theta_1_dot,
            self.theta_2_dot,
            self.omega_1_dot,
            self.omega_2_dot,
        ]
    }
}

/// Evaluate the equations of motion at `state`.
///
/// Pure: no clamping, no wrapping of angles.
pub fn derivatives(params: &PendulumParameters, state: &PendulumState) -> StateDerivative {
    let m1 = params.mass_1();
    let m2 = params.mass_2();
    let l1 = params.length_1();
    let l2 = params.length_2();
    let g = params.gravity();
    let total = m1 + m2;

    let PendulumState {
        theta_1,
        theta_2,
        omega_1,
        omega_2,
    } = *state;

    let (sin_d, cos_d) = (theta_1 - theta_2).sin_cos();
    let sin_1 = theta_1.sin();
    let sin_2 = theta_2.sin();
    let alpha = m1 + m2 * sin_d * sin_d;

    let w1_sq = omega_1 * omega_1;
    let w2_sq = omega_2 * omega_2;

    let omega_1_dot = (-sin_d * (m2 * l1 * w1_sq * cos_d + m2 * l2 * w2_sq)
        - g * (total * sin_1 - m2 * sin_2 * cos_d))
        / (l1 * alpha);
    let omega_2_dot = (sin_d * (total * l1 * w1_sq + m2 * l2 * w2_sq * cos_d)
        + g * (total * sin_1 * cos_d - total * sin_2))
        / (l2 * alpha);

    StateDerivative {
        theta_1_dot: omega_1,
        theta_2_dot: omega_2,
        omega_1_dot,
        omega_2_dot,
    }
}

/// Array form `[θ₁, θ₂, ω₁, ω₂] → d/dt` fed to the integrator kernels.
#[inline]
pub fn rhs(params: &PendulumParameters, y: &[f64; STATE_DIM]) -> [f64; STATE_DIM] {
    derivatives(params, &PendulumState::from_array(*y)).to_array()
}
