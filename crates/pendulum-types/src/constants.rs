// ─────────────────────────────────────────────────────────────────────
// Double Pendulum Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Standard gravitational acceleration (m/s²), used when a config omits `gravity`.
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Number of components in the integrated state vector
/// `[theta_1, theta_2, omega_1, omega_2]`.
pub const STATE_DIM: usize = 4;

/// Default absolute tolerance of the adaptive integrator.
pub const ADAPTIVE_ABS_TOL: f64 = 1e-10;

/// Default relative tolerance of the adaptive integrator.
pub const ADAPTIVE_REL_TOL: f64 = 1e-10;

/// Smallest step the adaptive controller may take before reporting
/// non-convergence (s).
pub const ADAPTIVE_MIN_STEP: f64 = 1e-12;

/// Accepted + rejected step budget of the adaptive integrator.
pub const ADAPTIVE_MAX_STEPS: usize = 5_000_000;
