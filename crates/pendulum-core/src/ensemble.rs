// ─────────────────────────────────────────────────────────────────────
// Double Pendulum Core — Ensemble Runner
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Batches of pendulums differing only in the initial upper angle.
//!
//! Member `i` starts from `theta_1 + i * perturbation`. Members share no
//! state, are integrated on the rayon pool and gathered in index order, so
//! parallel and sequential runs are bit-identical.

use rayon::prelude::*;
use tracing::{info, warn};

use pendulum_types::error::{PendulumError, PendulumResult};
use pendulum_types::state::{Ensemble, EnsembleMember, PendulumParameters, PendulumState};

use crate::integrator::{IntegrationStrategy, Integrator};

/// Shared integration request applied to every ensemble member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleRunner {
    integrator: Integrator,
    time_span: (f64, f64),
    sample_count: usize,
    parallel: bool,
}

impl EnsembleRunner {
    /// Parallel runner; see [`EnsembleRunner::sequential`].
    pub fn new(integrator: Integrator, time_span: (f64, f64), sample_count: usize) -> Self {
        EnsembleRunner {
            integrator,
            time_span,
            sample_count,
            parallel: true,
        }
    }

    /// Integrate members one after another on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn integrator(&self) -> &Integrator {
        &self.integrator
    }

    /// Run `member_count` pendulums from perturbed copies of `base_state`.
    ///
    /// Invalid requests fail before any member starts. Numerical failures
    /// stay inside the affected member's trajectory.
    pub fn run(
        &self,
        base_parameters: &PendulumParameters,
        base_state: PendulumState,
        member_count: usize,
        perturbation: f64,
    ) -> PendulumResult<Ensemble> {
        let initial_states = perturbed_initial_states(base_state, member_count, perturbation)?;
        for state in &initial_states {
            self.integrator
                .validate_request(state, self.time_span, self.sample_count)?;
        }

        info!(
            members = member_count,
            strategy = %self.integrator.strategy(),
            samples = self.sample_count,
            parallel = self.parallel,
            "ensemble started"
        );

        let run_member = |state: &PendulumState| -> PendulumResult<EnsembleMember> {
            let trajectory = self.integrator.integrate(
                base_parameters,
                *state,
                self.time_span,
                self.sample_count,
            )?;
            Ok(EnsembleMember {
                parameters: *base_parameters,
                trajectory,
            })
        };

        let members = if self.parallel {
            initial_states
                .par_iter()
                .map(run_member)
                .collect::<PendulumResult<Vec<_>>>()?
        } else {
            initial_states
                .iter()
                .map(run_member)
                .collect::<PendulumResult<Vec<_>>>()?
        };

        let ensemble = Ensemble { members };
        for (index, member) in ensemble.members.iter().enumerate() {
            if let Some(failure) = member.trajectory.failure {
                warn!(member = index, failure = %failure, "ensemble member failed");
            }
        }
        info!(
            members = ensemble.len(),
            failed = ensemble.failed_count(),
            "ensemble finished"
        );
        Ok(ensemble)
    }
}

/// Initial states `base_state` with `theta_1 + i * perturbation`, `i = 0..member_count`.
///
/// Requires `member_count >= 1` and a finite perturbation; for more than
/// one member the perturbation must be positive so the angles strictly
/// increase with the index.
pub fn perturbed_initial_states(
    base_state: PendulumState,
    member_count: usize,
    perturbation: f64,
) -> PendulumResult<Vec<PendulumState>> {
    if member_count == 0 {
        return Err(PendulumError::ConfigError(
            "ensemble member_count must be >= 1".to_string(),
        ));
    }
    if !perturbation.is_finite() {
        return Err(PendulumError::ConfigError(format!(
            "ensemble perturbation must be finite, got {perturbation}"
        )));
    }
    if member_count > 1 && perturbation <= 0.0 {
        return Err(PendulumError::ConfigError(format!(
            "ensemble perturbation must be > 0 for {member_count} members, got {perturbation}"
        )));
    }

    Ok((0..member_count)
        .map(|i| PendulumState {
            theta_1: base_state.theta_1 + i as f64 * perturbation,
            ..base_state
        })
        .collect())
}

/// One-shot parallel ensemble with default adaptive settings.
pub fn run_ensemble(
    base_parameters: &PendulumParameters,
    base_state: PendulumState,
    member_count: usize,
    perturbation: f64,
    time_span: (f64, f64),
    sample_count: usize,
    strategy: IntegrationStrategy,
) -> PendulumResult<Ensemble> {
    EnsembleRunner::new(Integrator::new(strategy), time_span, sample_count).run(
        base_parameters,
        base_state,
        member_count,
        perturbation,
    )
}
