// ─────────────────────────────────────────────────────────────────────
// Double Pendulum Core — Integrator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Advance one double pendulum over a time span onto a uniform output grid.
//!
//! Both strategies return `sample_count` samples at
//! `t0 + i (t1 − t0) / (sample_count − 1)` (the last one exactly `t1`):
//! - [`IntegrationStrategy::FixedStepRk4`] takes one RK4 step per grid
//!   interval.
//! - [`IntegrationStrategy::AdaptiveHighOrder`] runs Dormand-Prince 5(4)
//!   with its own step control and samples the dense output at the grid.
//!
//! Numerical failures end stepping early and are recorded on the returned
//! [`Trajectory`]; only invalid requests produce an `Err`.

use std::ops::ControlFlow;

use pendulum_math::dopri5::integrate_dense;
use pendulum_math::rk4::rk4_step;
use pendulum_math::sampling::uniform_grid;
use pendulum_types::error::{IntegrationFailure, PendulumError, PendulumResult};
use pendulum_types::state::{PendulumParameters, PendulumState, Trajectory};
use tracing::{debug, warn};

pub use pendulum_types::config::{AdaptiveSettings, IntegrationStrategy};

use crate::dynamics::rhs;

/// Strategy plus the adaptive step-control settings.
///
/// Stateless between calls: the same inputs always produce a
/// bit-identical trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integrator {
    strategy: IntegrationStrategy,
    adaptive: AdaptiveSettings,
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new(IntegrationStrategy::default())
    }
}

impl Integrator {
    pub fn new(strategy: IntegrationStrategy) -> Self {
        Integrator {
            strategy,
            adaptive: AdaptiveSettings::default(),
        }
    }

    /// Replace the adaptive settings (ignored by the fixed-step strategy).
    pub fn with_adaptive_settings(mut self, settings: AdaptiveSettings) -> Self {
        self.adaptive = settings;
        self
    }

    pub fn strategy(&self) -> IntegrationStrategy {
        self.strategy
    }

    pub fn adaptive_settings(&self) -> &AdaptiveSettings {
        &self.adaptive
    }

    /// Reject requests that cannot be integrated at all.
    pub fn validate_request(
        &self,
        initial: &PendulumState,
        time_span: (f64, f64),
        sample_count: usize,
    ) -> PendulumResult<()> {
        let (t0, t1) = time_span;
        if !t0.is_finite() || !t1.is_finite() || t0 >= t1 {
            return Err(PendulumError::ConfigError(format!(
                "time span must be finite with start < end, got ({t0}, {t1})"
            )));
        }
        if sample_count < 2 {
            return Err(PendulumError::ConfigError(format!(
                "sample_count must be >= 2, got {sample_count}"
            )));
        }
        let grid = uniform_grid(t0, t1, sample_count);
        if let Some(w) = grid.windows(2).find(|w| w[1] <= w[0]) {
            return Err(PendulumError::ConfigError(format!(
                "time span ({t0}, {t1}) is too narrow for {sample_count} distinct samples, \
                 grid repeats t={}",
                w[0]
            )));
        }
        if !initial.is_finite() {
            return Err(PendulumError::ConfigError(format!(
                "initial state must be finite, got {initial:?}"
            )));
        }
        if self.strategy == IntegrationStrategy::AdaptiveHighOrder {
            self.adaptive.validate()?;
        }
        Ok(())
    }

    /// Integrate from `initial` at `time_span.0` to `time_span.1`.
    ///
    /// `Err` only for invalid input. A numerical failure yields
    /// `Ok(trajectory)` with `succeeded == false` and the finite samples
    /// computed before it.
    pub fn integrate(
        &self,
        params: &PendulumParameters,
        initial: PendulumState,
        time_span: (f64, f64),
        sample_count: usize,
    ) -> PendulumResult<Trajectory> {
        self.validate_request(&initial, time_span, sample_count)?;
        let grid = uniform_grid(time_span.0, time_span.1, sample_count);

        let trajectory = match self.strategy {
            IntegrationStrategy::FixedStepRk4 => integrate_fixed_step(params, initial, &grid),
            IntegrationStrategy::AdaptiveHighOrder => {
                integrate_adaptive(params, initial, &grid, &self.adaptive)
            }
        };

        if let Some(failure) = trajectory.failure {
            warn!(
                strategy = %self.strategy,
                failure = %failure,
                time = failure.time(),
                samples = trajectory.len(),
                requested = sample_count,
                "trajectory terminated early"
            );
        }
        Ok(trajectory)
    }
}

/// Convenience wrapper with default adaptive settings.
pub fn integrate(
    params: &PendulumParameters,
    initial: PendulumState,
    time_span: (f64, f64),
    sample_count: usize,
    strategy: IntegrationStrategy,
) -> PendulumResult<Trajectory> {
    Integrator::new(strategy).integrate(params, initial, time_span, sample_count)
}

fn integrate_fixed_step(
    params: &PendulumParameters,
    initial: PendulumState,
    grid: &[f64],
) -> Trajectory {
    let mut trajectory = Trajectory::with_capacity(grid.len());
    trajectory.push(grid[0], initial);

    let mut y = initial.to_array();
    for w in grid.windows(2) {
        let (t, t_next) = (w[0], w[1]);
        y = rk4_step(t, &y, t_next - t, |_t, y| rhs(params, y));
        let state = PendulumState::from_array(y);
        if !state.is_finite() {
            trajectory.fail(IntegrationFailure::NumericalInstability { time: t_next });
            break;
        }
        trajectory.push(t_next, state);
    }

    debug!(
        strategy = %IntegrationStrategy::FixedStepRk4,
        samples = trajectory.len(),
        steps = trajectory.len().saturating_sub(1),
        "fixed-step integration finished"
    );
    trajectory
}

fn integrate_adaptive(
    params: &PendulumParameters,
    initial: PendulumState,
    grid: &[f64],
    settings: &AdaptiveSettings,
) -> Trajectory {
    let t0 = grid[0];
    let t1 = grid[grid.len() - 1];
    let mut trajectory = Trajectory::with_capacity(grid.len());
    trajectory.push(t0, initial);

    let mut next = 1;
    let outcome = integrate_dense(
        t0,
        t1,
        &initial.to_array(),
        |_t, y| rhs(params, y),
        settings,
        |segment| {
            while next < grid.len() && grid[next] <= segment.t_end() {
                let t = grid[next];
                let state = PendulumState::from_array(segment.evaluate(t));
                if !state.is_finite() {
                    return ControlFlow::Break(IntegrationFailure::NumericalInstability { time: t });
                }
                trajectory.push(t, state);
                next += 1;
            }
            ControlFlow::Continue(())
        },
    );

    match outcome {
        Ok(stats) => {
            debug_assert_eq!(trajectory.len(), grid.len());
            debug!(
                strategy = %IntegrationStrategy::AdaptiveHighOrder,
                samples = trajectory.len(),
                accepted = stats.accepted,
                rejected = stats.rejected,
                evaluations = stats.evaluations,
                "adaptive integration finished"
            );
        }
        Err(failure) => trajectory.fail(failure),
    }
    trajectory
}
