// ─────────────────────────────────────────────────────────────────────
// Double Pendulum Core — Simulation Runner
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Configuration-driven entry point: one pendulum or an ensemble.

use serde::Serialize;

use pendulum_types::config::SimulationConfig;
use pendulum_types::error::{PendulumError, PendulumResult};
use pendulum_types::state::{Ensemble, EnsembleMember, PendulumParameters, Trajectory};

use crate::energy::{energy_series, EnergyBreakdown};
use crate::ensemble::EnsembleRunner;
use crate::integrator::Integrator;

/// Result of [`run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimulationOutput {
    Single(EnsembleMember),
    Ensemble(Ensemble),
}

impl SimulationOutput {
    /// `(parameters, trajectory)` pairs in member order.
    pub fn trajectories(&self) -> Vec<(&PendulumParameters, &Trajectory)> {
        match self {
            SimulationOutput::Single(member) => vec![(&member.parameters, &member.trajectory)],
            SimulationOutput::Ensemble(ensemble) => ensemble
                .members
                .iter()
                .map(|m| (&m.parameters, &m.trajectory))
                .collect(),
        }
    }

    /// Energy series parallel to [`SimulationOutput::trajectories`].
    pub fn energy_series(&self) -> Vec<Vec<EnergyBreakdown>> {
        self.trajectories()
            .into_iter()
            .map(|(p, t)| energy_series(p, t))
            .collect()
    }

    pub fn all_succeeded(&self) -> bool {
        self.trajectories().iter().all(|(_, t)| t.succeeded)
    }
}

/// Validate `config` and integrate what it describes.
pub fn run(config: &SimulationConfig) -> PendulumResult<SimulationOutput> {
    config.validate()?;
    let parameters = config.parameters()?;
    let initial = config.initial_state()?;
    let time_span = config.time_span()?;
    let integrator = Integrator::new(config.strategy).with_adaptive_settings(config.adaptive);

    if config.multi_pendulum {
        let perturbation = config.perturbation.ok_or_else(|| {
            PendulumError::ConfigError(
                "multi_pendulum runs require an explicit perturbation".to_string(),
            )
        })?;
        let ensemble = EnsembleRunner::new(integrator, time_span, config.steps).run(
            &parameters,
            initial,
            config.num_pendulums,
            perturbation,
        )?;
        Ok(SimulationOutput::Ensemble(ensemble))
    } else {
        let trajectory = integrator.integrate(&parameters, initial, time_span, config.steps)?;
        Ok(SimulationOutput::Single(EnsembleMember {
            parameters,
            trajectory,
        }))
    }
}

/// Load a JSON configuration and [`run`] it.
pub fn run_file(path: &str) -> PendulumResult<SimulationOutput> {
    run(&SimulationConfig::from_file(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pendulum_types::config::IntegrationStrategy;

    fn config_path(name: &str) -> String {
        format!("{}/../../configs/{name}", env!("CARGO_MANIFEST_DIR"))
    }

    fn example_config() -> SimulationConfig {
        SimulationConfig::from_json_str(
            r#"{
                "mass_1": 2.0, "mass_2": 10.0, "length_1": 1.0, "length_2": 1.0,
                "theta_1": 20.0, "theta_2": 0.0, "theta_1_dot": 1.0, "theta_2_dot": 1.0,
                "t_span": [0.0, 30.0], "steps": 2000, "method": "rk4",
                "animate": true, "interval": 10, "energy_plot": true
            }"#,
        )
        .expect("valid config")
    }

    #[test]
    fn test_run_single_from_example_config() {
        let cfg = example_config();
        assert_eq!(cfg.strategy, IntegrationStrategy::FixedStepRk4);
        let output = run(&cfg).expect("run");
        let trajectories = output.trajectories();
        assert_eq!(trajectories.len(), 1);
        let (_, traj) = trajectories[0];
        assert!(traj.succeeded);
        assert_eq!(traj.len(), 2000);
        assert_eq!(traj.times[1999], 30.0);
        assert_eq!(traj.states[0].theta_1, 20.0_f64.to_radians());
        assert_eq!(output.energy_series()[0].len(), 2000);
    }

    #[test]
    fn test_run_ensemble_from_config() {
        let mut cfg = example_config();
        cfg.t_span = [0.0, 2.0];
        cfg.steps = 100;
        cfg.multi_pendulum = true;
        cfg.num_pendulums = 3;
        cfg.perturbation = Some(1e-3);
        match run(&cfg).expect("run") {
            SimulationOutput::Ensemble(ensemble) => {
                assert_eq!(ensemble.len(), 3);
                assert!(ensemble.all_succeeded());
                let d = ensemble.divergence();
                assert_eq!(d.shape(), &[3, 100]);
                assert_eq!(d[[0, 50]], 0.0);
                assert!((d[[2, 0]] - 2e-3).abs() < 1e-12);
            }
            other => panic!("Unexpected output: {other:?}"),
        }
    }

    #[test]
    fn test_ensemble_without_perturbation_rejected() {
        let mut cfg = example_config();
        cfg.multi_pendulum = true;
        cfg.num_pendulums = 2;
        cfg.perturbation = None;
        match run(&cfg) {
            Err(PendulumError::ConfigError(msg)) => assert!(msg.contains("perturbation")),
            other => panic!("Unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_run_file_with_bundled_configs() {
        let single = run_file(&config_path("default_config.json")).expect("default config");
        assert!(single.all_succeeded());
        let ensemble = run_file(&config_path("ensemble_config.json")).expect("ensemble config");
        assert!(matches!(ensemble, SimulationOutput::Ensemble(_)));
        assert!(ensemble.all_succeeded());
    }

    #[test]
    fn test_output_serializes_to_json() {
        let mut cfg = example_config();
        cfg.steps = 3;
        cfg.t_span = [0.0, 0.2];
        let value = serde_json::to_value(run(&cfg).expect("run")).expect("serializable");
        let traj = &value["Single"]["trajectory"];
        assert_eq!(traj["times"].as_array().map(|t| t.len()), Some(3));
        assert_eq!(traj["succeeded"], serde_json::Value::Bool(true));
        assert!(traj["failure"].is_null());
    }

    #[test]
    fn test_run_file_missing_is_io_error() {
        match run_file(&config_path("does_not_exist.json")) {
            Err(PendulumError::Io(_)) => {}
            other => panic!("Unexpected result: {other:?}"),
        }
    }
}
