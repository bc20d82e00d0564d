//! Double pendulum equations of motion, integrators, energy diagnostics
//! and ensembles.
//!
//! Stage 1: equations of motion, energy
//! Stage 2: fixed-step and adaptive integration
//! Stage 3: ensembles, config-driven runs

pub mod dynamics;
pub mod energy;
pub mod ensemble;
pub mod integrator;
pub mod simulation;
