// ─────────────────────────────────────────────────────────────────────
// Double Pendulum Core — Errors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PendulumError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Integration failed: {0}")]
    Integration(#[from] IntegrationFailure),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PendulumResult<T> = Result<T, PendulumError>;

/// Why an adaptive step controller gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NonConvergenceReason {
    /// A step had to be rejected while already at the minimum step size.
    StepSizeUnderflow,
    /// The accepted + rejected step budget ran out before reaching `t1`.
    MaxStepsExceeded,
}

impl std::fmt::Display for NonConvergenceReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StepSizeUnderflow => write!(f, "step size fell below the minimum step"),
            Self::MaxStepsExceeded => write!(f, "maximum number of steps exceeded"),
        }
    }
}

/// Numerical failure local to a single trajectory.
///
/// These never abort a batch; they travel inside the partial
/// trajectory that was computed before the failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Serialize)]
pub enum IntegrationFailure {
    #[error("State became non-finite at t={time}")]
    NumericalInstability { time: f64 },

    #[error("Solver did not converge at t={time} (h={step_size}): {reason}")]
    SolverNonConvergence {
        time: f64,
        step_size: f64,
        reason: NonConvergenceReason,
    },
}

impl IntegrationFailure {
    /// Simulation time at which the failure was detected.
    pub fn time(&self) -> f64 {
        match *self {
            IntegrationFailure::NumericalInstability { time } => time,
            IntegrationFailure::SolverNonConvergence { time, .. } => time,
        }
    }
}
