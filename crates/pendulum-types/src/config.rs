// ─────────────────────────────────────────────────────────────────────
// Double Pendulum Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::constants::{
    ADAPTIVE_ABS_TOL, ADAPTIVE_MAX_STEPS, ADAPTIVE_MIN_STEP, ADAPTIVE_REL_TOL, STANDARD_GRAVITY,
};
use crate::error::{PendulumError, PendulumResult};
use crate::state::{PendulumParameters, PendulumState};

/// Time-stepping family used to advance a pendulum.
///
/// Also accepts the legacy `method` values `"rk4"` and `"solve_ivp"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegrationStrategy {
    /// Classic 4-stage Runge-Kutta, one step per output interval.
    #[serde(rename = "fixed-step", alias = "rk4", alias = "fixed_step")]
    FixedStepRk4,
    /// Dormand-Prince 5(4) with error control, resampled onto the output grid.
    #[default]
    #[serde(rename = "adaptive", alias = "solve_ivp")]
    AdaptiveHighOrder,
}

impl std::fmt::Display for IntegrationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationStrategy::FixedStepRk4 => write!(f, "fixed-step"),
            IntegrationStrategy::AdaptiveHighOrder => write!(f, "adaptive"),
        }
    }
}

/// Step-size control settings for the adaptive integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveSettings {
    /// Absolute error tolerance (default: 1e-10).
    pub abs_tol: f64,
    /// Relative error tolerance (default: 1e-10).
    pub rel_tol: f64,
    /// Safety factor applied to the optimal step estimate (default: 0.9).
    pub safety: f64,
    /// Smallest allowed step-size ratio h_new / h (default: 0.2).
    pub min_factor: f64,
    /// Largest allowed step-size ratio h_new / h (default: 10.0).
    pub max_factor: f64,
    /// Step-size floor; a rejection at this size is non-convergence (default: 1e-12).
    pub min_step: f64,
    /// Accepted + rejected step budget (default: 5_000_000).
    pub max_steps: usize,
    /// First trial step; estimated from the initial derivative when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_step: Option<f64>,
}

impl Default for AdaptiveSettings {
    fn default() -> Self {
        AdaptiveSettings {
            abs_tol: ADAPTIVE_ABS_TOL,
            rel_tol: ADAPTIVE_REL_TOL,
            safety: 0.9,
            min_factor: 0.2,
            max_factor: 10.0,
            min_step: ADAPTIVE_MIN_STEP,
            max_steps: ADAPTIVE_MAX_STEPS,
            initial_step: None,
        }
    }
}

impl AdaptiveSettings {
    pub fn validate(&self) -> PendulumResult<()> {
        for (name, value) in [
            ("abs_tol", self.abs_tol),
            ("rel_tol", self.rel_tol),
            ("safety", self.safety),
            ("min_factor", self.min_factor),
            ("max_factor", self.max_factor),
            ("min_step", self.min_step),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PendulumError::ConfigError(format!(
                    "adaptive {name} must be finite and > 0, got {value}"
                )));
            }
        }
        if self.safety >= 1.0 {
            return Err(PendulumError::ConfigError(format!(
                "adaptive safety must be < 1, got {}",
                self.safety
            )));
        }
        if self.min_factor >= 1.0 || self.max_factor <= 1.0 {
            return Err(PendulumError::ConfigError(format!(
                "adaptive step factors must satisfy min_factor < 1 < max_factor, got {} and {}",
                self.min_factor, self.max_factor
            )));
        }
        if self.max_steps == 0 {
            return Err(PendulumError::ConfigError(
                "adaptive max_steps must be >= 1".to_string(),
            ));
        }
        if let Some(h) = self.initial_step {
            if !h.is_finite() || h <= 0.0 {
                return Err(PendulumError::ConfigError(format!(
                    "adaptive initial_step must be finite and > 0, got {h}"
                )));
            }
        }
        Ok(())
    }
}

/// Simulation configuration.
/// Field names follow the legacy JSON configuration layout; angles are
/// in degrees and angular velocities in degrees/s. Presentation-only keys
/// (`animate`, `interval`, `plot`, `energy_plot`) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub mass_1: f64,
    pub mass_2: f64,
    pub length_1: f64,
    pub length_2: f64,
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    pub theta_1: f64,
    pub theta_2: f64,
    #[serde(default)]
    pub theta_1_dot: f64,
    #[serde(default)]
    pub theta_2_dot: f64,
    /// `[start, end]` in seconds.
    pub t_span: [f64; 2],
    /// Number of output samples over `t_span` (>= 2).
    pub steps: usize,
    #[serde(default, alias = "method")]
    pub strategy: IntegrationStrategy,
    #[serde(default)]
    pub adaptive: AdaptiveSettings,
    #[serde(default)]
    pub multi_pendulum: bool,
    #[serde(default = "default_num_pendulums", alias = "num_of_pendulums")]
    pub num_pendulums: usize,
    /// Increment added to `theta_1` (radians) per ensemble member index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perturbation: Option<f64>,
}

fn default_gravity() -> f64 {
    STANDARD_GRAVITY
}
fn default_num_pendulums() -> usize {
    1
}

impl SimulationConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> PendulumResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(contents: &str) -> PendulumResult<Self> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field before any integration starts.
    pub fn validate(&self) -> PendulumResult<()> {
        self.parameters()?;
        self.initial_state()?;
        self.time_span()?;
        if self.steps < 2 {
            return Err(PendulumError::ConfigError(format!(
                "steps must be >= 2, got {}",
                self.steps
            )));
        }
        if self.num_pendulums == 0 {
            return Err(PendulumError::ConfigError(
                "num_pendulums must be >= 1".to_string(),
            ));
        }
        match self.perturbation {
            Some(p) if !p.is_finite() => {
                return Err(PendulumError::ConfigError(format!(
                    "perturbation must be finite, got {p}"
                )));
            }
            None if self.multi_pendulum => {
                return Err(PendulumError::ConfigError(
                    "multi_pendulum runs require an explicit perturbation".to_string(),
                ));
            }
            _ => {}
        }
        self.adaptive.validate()
    }

    pub fn parameters(&self) -> PendulumResult<PendulumParameters> {
        PendulumParameters::new(
            self.mass_1,
            self.mass_2,
            self.length_1,
            self.length_2,
            self.gravity,
        )
    }

    /// Initial state in radians; the single degrees → radians conversion.
    pub fn initial_state(&self) -> PendulumResult<PendulumState> {
        let state = PendulumState::from_degrees(
            self.theta_1,
            self.theta_2,
            self.theta_1_dot,
            self.theta_2_dot,
        );
        if !state.is_finite() {
            return Err(PendulumError::ConfigError(format!(
                "initial angles and angular velocities must be finite, got {:?}",
                [self.theta_1, self.theta_2, self.theta_1_dot, self.theta_2_dot]
            )));
        }
        Ok(state)
    }

    pub fn time_span(&self) -> PendulumResult<(f64, f64)> {
        let [t0, t1] = self.t_span;
        if !t0.is_finite() || !t1.is_finite() || t0 >= t1 {
            return Err(PendulumError::ConfigError(format!(
                "t_span must be finite with start < end, got ({t0}, {t1})"
            )));
        }
        Ok((t0, t1))
    }
}
