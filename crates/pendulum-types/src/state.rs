// ─────────────────────────────────────────────────────────────────────
// Double Pendulum Core — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::Array2;
use serde::Serialize;

use crate::constants::{STANDARD_GRAVITY, STATE_DIM};
use crate::error::{IntegrationFailure, PendulumError, PendulumResult};

/// Physical constants of one double pendulum.
///
/// Immutable after construction; every field is finite and strictly
/// positive, checked once in [`PendulumParameters::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PendulumParameters {
    mass_1: f64,
    mass_2: f64,
    length_1: f64,
    length_2: f64,
    gravity: f64,
}

impl PendulumParameters {
    pub fn new(
        mass_1: f64,
        mass_2: f64,
        length_1: f64,
        length_2: f64,
        gravity: f64,
    ) -> PendulumResult<Self> {
        for (name, value) in [
            ("mass_1", mass_1),
            ("mass_2", mass_2),
            ("length_1", length_1),
            ("length_2", length_2),
            ("gravity", gravity),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PendulumError::ConfigError(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        Ok(PendulumParameters {
            mass_1,
            mass_2,
            length_1,
            length_2,
            gravity,
        })
    }

    /// Same as [`PendulumParameters::new`] with g = 9.81 m/s².
    pub fn with_standard_gravity(
        mass_1: f64,
        mass_2: f64,
        length_1: f64,
        length_2: f64,
    ) -> PendulumResult<Self> {
        Self::new(mass_1, mass_2, length_1, length_2, STANDARD_GRAVITY)
    }

    pub fn mass_1(&self) -> f64 {
        self.mass_1
    }

    pub fn mass_2(&self) -> f64 {
        self.mass_2
    }

    pub fn length_1(&self) -> f64 {
        self.length_1
    }

    pub fn length_2(&self) -> f64 {
        self.length_2
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// M = m1 + m2.
    pub fn total_mass(&self) -> f64 {
        self.mass_1 + self.mass_2
    }
}

/// Kinematic state: rod angles from the downward vertical (radians,
/// never wrapped) and their angular velocities (rad/s).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PendulumState {
    pub theta_1: f64,
    pub theta_2: f64,
    pub omega_1: f64,
    pub omega_2: f64,
}

impl PendulumState {
    pub fn new(theta_1: f64, theta_2: f64, omega_1: f64, omega_2: f64) -> Self {
        PendulumState {
            theta_1,
            theta_2,
            omega_1,
            omega_2,
        }
    }

    /// Build from angles in degrees and angular velocities in degrees/s.
    /// This is the only place degrees enter the model.
    pub fn from_degrees(
        theta_1_deg: f64,
        theta_2_deg: f64,
        omega_1_deg_s: f64,
        omega_2_deg_s: f64,
    ) -> Self {
        PendulumState {
            theta_1: theta_1_deg.to_radians(),
            theta_2: theta_2_deg.to_radians(),
            omega_1: omega_1_deg_s.to_radians(),
            omega_2: omega_2_deg_s.to_radians(),
        }
    }

    /// State vector layout used by the integrators.
    pub fn to_array(&self) -> [f64; STATE_DIM] {
        [self.theta_1, self.theta_2, self.omega_1, self.omega_2]
    }

    pub fn from_array(y: [f64; STATE_DIM]) -> Self {
        let [theta_1, theta_2, omega_1, omega_2] = y;
        PendulumState {
            theta_1,
            theta_2,
            omega_1,
            omega_2,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

/// Sampled solution of one integration.
///
/// `states[i]` is the state at `times[i]`; `times` is strictly increasing.
/// When `succeeded` is false, `failure` names what went wrong and the
/// vectors hold only the samples computed before it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    pub times: Vec<f64>,
    pub states: Vec<PendulumState>,
    pub succeeded: bool,
    pub failure: Option<IntegrationFailure>,
}

impl Trajectory {
    pub fn with_capacity(capacity: usize) -> Self {
        Trajectory {
            times: Vec::with_capacity(capacity),
            states: Vec::with_capacity(capacity),
            succeeded: true,
            failure: None,
        }
    }

    pub fn push(&mut self, time: f64, state: PendulumState) {
        debug_assert!(
            self.times.last().map_or(true, |&last| time > last),
            "trajectory times must be strictly increasing"
        );
        self.times.push(time);
        self.states.push(state);
    }

    /// Mark the trajectory as terminated early.
    pub fn fail(&mut self, failure: IntegrationFailure) {
        self.succeeded = false;
        self.failure = Some(failure);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn initial_state(&self) -> Option<PendulumState> {
        self.states.first().copied()
    }

    pub fn final_state(&self) -> Option<PendulumState> {
        self.states.last().copied()
    }

    /// Samples as a `[len, 5]` matrix with columns
    /// `[t, theta_1, theta_2, omega_1, omega_2]`.
    pub fn to_array(&self) -> Array2<f64> {
        let mut out = Array2::zeros((self.len(), STATE_DIM + 1));
        for (i, (t, s)) in self.times.iter().zip(&self.states).enumerate() {
            out[[i, 0]] = *t;
            for (j, v) in s.to_array().into_iter().enumerate() {
                out[[i, j + 1]] = v;
            }
        }
        out
    }

    /// Turn a failed trajectory into an error, for callers that only
    /// want complete solutions.
    pub fn into_result(self) -> PendulumResult<Self> {
        match self.failure {
            Some(failure) => Err(PendulumError::Integration(failure)),
            None => Ok(self),
        }
    }
}

/// One ensemble member: its parameters and its trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleMember {
    pub parameters: PendulumParameters,
    pub trajectory: Trajectory,
}

/// Ordered ensemble; `members[i]` started from perturbation index `i`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ensemble {
    pub members: Vec<EnsembleMember>,
}

impl Ensemble {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True when every member integrated to the end of its span.
    pub fn all_succeeded(&self) -> bool {
        self.members.iter().all(|m| m.trajectory.succeeded)
    }

    pub fn failed_count(&self) -> usize {
        self.members.iter().filter(|m| !m.trajectory.succeeded).count()
    }

    /// Angular separation of each member from member 0,
    /// `sqrt(Δθ1² + Δθ2²)`, as a `[members, samples]` matrix.
    ///
    /// Samples missing on either side (early termination) are NaN.
    pub fn divergence(&self) -> Array2<f64> {
        let n_samples = self
            .members
            .iter()
            .map(|m| m.trajectory.len())
            .max()
            .unwrap_or(0);
        let mut out = Array2::from_elem((self.members.len(), n_samples), f64::NAN);
        let Some(reference) = self.members.first() else {
            return out;
        };
        let base = &reference.trajectory.states;
        for (i, member) in self.members.iter().enumerate() {
            for (k, (s, r)) in member.trajectory.states.iter().zip(base).enumerate() {
                let d1 = s.theta_1 - r.theta_1;
                let d2 = s.theta_2 - r.theta_2;
                out[[i, k]] = (d1 * d1 + d2 * d2).sqrt();
            }
        }
        out
    }
}
