// ─────────────────────────────────────────────────────────────────────
// Double Pendulum Core — Dormand-Prince 5(4)
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Adaptive Dormand-Prince 5(4) integrator with dense output.
//!
//! 7 stages, 5th-order propagated solution, embedded 4th-order error
//! estimate, First-Same-As-Last stage reuse. Every accepted step is handed
//! to the caller as a [`DenseSegment`] carrying the 4th-order continuous
//! extension, so the solution can be sampled anywhere inside the step
//! without extra derivative evaluations.
//!
//! References:
//! - J. R. Dormand and P. J. Prince, "A family of embedded Runge-Kutta
//!   formulae," J. Comput. Appl. Math. 6 (1980) 19–26.
//! - E. Hairer, S. P. Nørsett, G. Wanner, "Solving Ordinary Differential
//!   Equations I", 2nd ed., §II.4–II.6 (step control, dense output).

use std::ops::ControlFlow;

use pendulum_types::config::AdaptiveSettings;
use pendulum_types::error::{IntegrationFailure, NonConvergenceReason};

use crate::rk4::axpy;

const STAGES: usize = 7;

/// Nodes.
const C: [f64; STAGES] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

/// Butcher A matrix (strictly lower triangular, row 6 equals `B`).
const A: [[f64; STAGES]; STAGES] = [
    [0.0; STAGES],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
        0.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
        0.0,
        0.0,
    ],
    [
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
        0.0,
    ],
];

/// 5th-order weights.
const B: [f64; STAGES] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
    0.0,
];

/// Error weights `B - B̂` against the embedded 4th-order solution.
const BERR: [f64; STAGES] = [
    35.0 / 384.0 - 5179.0 / 57600.0,
    0.0,
    500.0 / 1113.0 - 7571.0 / 16695.0,
    125.0 / 192.0 - 393.0 / 640.0,
    -2187.0 / 6784.0 + 92097.0 / 339200.0,
    11.0 / 84.0 - 187.0 / 2100.0,
    -1.0 / 40.0,
];

/// Continuous-extension weights (Hairer's `contd5`).
const D: [f64; STAGES] = [
    -12715105075.0 / 11282082432.0,
    0.0,
    87487479700.0 / 32700410799.0,
    -10690763975.0 / 1880347072.0,
    701980252875.0 / 199316789632.0,
    -1453857185.0 / 822651844.0,
    69997945.0 / 29380423.0,
];

/// Order used by the step-size controller exponent (error ~ h^5).
const CONTROL_ORDER: f64 = 5.0;

/// Interpolant over one accepted step `[t, t + h]`.
#[derive(Debug, Clone, Copy)]
pub struct DenseSegment<const N: usize> {
    t: f64,
    t_next: f64,
    h: f64,
    y: [f64; N],
    ydiff: [f64; N],
    bspl: [f64; N],
    r4: [f64; N],
    r5: [f64; N],
}

impl<const N: usize> DenseSegment<N> {
    pub fn t_start(&self) -> f64 {
        self.t
    }

    /// End of the step; exactly `t1` for the final step.
    pub fn t_end(&self) -> f64 {
        self.t_next
    }

    /// Solution at the start of the step.
    pub fn y_start(&self) -> [f64; N] {
        self.y
    }

    /// Evaluate the continuous extension at `t` (expected inside the step).
    pub fn evaluate(&self, t: f64) -> [f64; N] {
        let theta = (t - self.t) / self.h;
        let theta1 = 1.0 - theta;
        let mut out = [0.0; N];
        for i in 0..N {
            out[i] = self.y[i]
                + theta
                    * (self.ydiff[i]
                        + theta1 * (self.bspl[i] + theta * (self.r4[i] + theta1 * self.r5[i])));
        }
        out
    }
}

/// Work counters of one adaptive integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdaptiveStats {
    pub accepted: usize,
    pub rejected: usize,
    pub evaluations: usize,
}

/// Weighted RMS norm `sqrt(mean((e_i / (atol + rtol * max(|a_i|, |b_i|)))²))`.
fn error_norm<const N: usize>(
    err: &[f64; N],
    a: &[f64; N],
    b: &[f64; N],
    settings: &AdaptiveSettings,
) -> f64 {
    let mut sum = 0.0;
    for i in 0..N {
        let scale = settings.abs_tol + settings.rel_tol * a[i].abs().max(b[i].abs());
        let r = err[i] / scale;
        sum += r * r;
    }
    (sum / N as f64).sqrt()
}

/// Starting step from the initial derivative (Hairer et al., §II.4).
fn initial_step<const N: usize>(
    t0: f64,
    t1: f64,
    y0: &[f64; N],
    f0: &[f64; N],
    f: &mut impl FnMut(f64, &[f64; N]) -> [f64; N],
    settings: &AdaptiveSettings,
    stats: &mut AdaptiveStats,
) -> f64 {
    let span = t1 - t0;
    if let Some(h) = settings.initial_step {
        return h.min(span);
    }

    let zeros = [0.0; N];
    let d0 = error_norm(y0, y0, &zeros, settings);
    let d1 = error_norm(f0, y0, &zeros, settings);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };

    let y1 = axpy(y0, h0, f0);
    let f1 = f(t0 + h0, &y1);
    stats.evaluations += 1;
    let mut diff = [0.0; N];
    for i in 0..N {
        diff[i] = f1[i] - f0[i];
    }
    let d2 = error_norm(&diff, y0, &zeros, settings) / h0;

    let dmax = d1.max(d2);
    let h1 = if dmax <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / dmax).powf(1.0 / CONTROL_ORDER)
    };

    let h = (100.0 * h0).min(h1).min(span);
    if h.is_finite() && h > 0.0 {
        h
    } else {
        span
    }
}

/// Integrate `dy/dt = f(t, y)` from `t0` to `t1` (`t0 < t1`) with local
/// error control, handing each accepted step to `on_step`.
///
/// Returns the work counters on reaching `t1`. Fails with
/// - [`IntegrationFailure::NumericalInstability`] when even a step at the
///   minimum step size gives a non-finite error estimate or state,
/// - [`IntegrationFailure::SolverNonConvergence`] when a finite step must be
///   rejected at the minimum step size or the step budget runs out,
/// - whatever `on_step` breaks with.
///
/// Tolerances are used as given; nothing is retried with looser settings.
pub fn integrate_dense<const N: usize>(
    t0: f64,
    t1: f64,
    y0: &[f64; N],
    mut f: impl FnMut(f64, &[f64; N]) -> [f64; N],
    settings: &AdaptiveSettings,
    mut on_step: impl FnMut(&DenseSegment<N>) -> ControlFlow<IntegrationFailure>,
) -> Result<AdaptiveStats, IntegrationFailure> {
    let mut stats = AdaptiveStats::default();
    if t1 <= t0 {
        return Ok(stats);
    }

    let mut t = t0;
    let mut y = *y0;
    let mut k_first = f(t, &y);
    stats.evaluations += 1;

    let mut h = initial_step(t0, t1, y0, &k_first, &mut f, settings, &mut stats)
        .max(settings.min_step);

    loop {
        let last = t + h >= t1;
        if last {
            h = t1 - t;
        }

        // Stages; k[6] is evaluated at the new point and reused next step.
        let mut k = [[0.0; N]; STAGES];
        k[0] = k_first;
        for s in 1..STAGES {
            let mut ys = y;
            for (j, kj) in k.iter().enumerate().take(s) {
                let a = A[s][j];
                if a != 0.0 {
                    for i in 0..N {
                        ys[i] += h * a * kj[i];
                    }
                }
            }
            k[s] = f(t + C[s] * h, &ys);
        }
        stats.evaluations += STAGES - 1;

        let mut y_new = y;
        let mut err = [0.0; N];
        for (s, ks) in k.iter().enumerate() {
            for i in 0..N {
                y_new[i] += h * B[s] * ks[i];
                err[i] += h * BERR[s] * ks[i];
            }
        }

        let enorm = error_norm(&err, &y, &y_new, settings);
        let finite = enorm.is_finite() && y_new.iter().all(|v| v.is_finite());

        if finite && enorm <= 1.0 {
            let t_next = if last { t1 } else { t + h };
            let mut segment = DenseSegment {
                t,
                t_next,
                h,
                y,
                ydiff: [0.0; N],
                bspl: [0.0; N],
                r4: [0.0; N],
                r5: [0.0; N],
            };
            for i in 0..N {
                let ydiff = y_new[i] - y[i];
                let bspl = h * k[0][i] - ydiff;
                segment.ydiff[i] = ydiff;
                segment.bspl[i] = bspl;
                segment.r4[i] = ydiff - h * k[6][i] - bspl;
                segment.r5[i] = h * D
                    .iter()
                    .zip(k.iter())
                    .map(|(d, ks)| d * ks[i])
                    .sum::<f64>();
            }

            stats.accepted += 1;
            if let ControlFlow::Break(failure) = on_step(&segment) {
                return Err(failure);
            }

            t = t_next;
            y = y_new;
            k_first = k[6];

            if last {
                return Ok(stats);
            }

            let factor = if enorm == 0.0 {
                settings.max_factor
            } else {
                (settings.safety * enorm.powf(-1.0 / CONTROL_ORDER))
                    .clamp(settings.min_factor, settings.max_factor)
            };
            h *= factor;
        } else {
            stats.rejected += 1;
            if h <= settings.min_step {
                // No admissible step keeps the state finite.
                if !finite {
                    return Err(IntegrationFailure::NumericalInstability { time: t });
                }
                return Err(IntegrationFailure::SolverNonConvergence {
                    time: t,
                    step_size: h,
                    reason: NonConvergenceReason::StepSizeUnderflow,
                });
            }
            let factor = if finite {
                (settings.safety * enorm.powf(-1.0 / CONTROL_ORDER))
                    .clamp(settings.min_factor, 1.0)
            } else {
                settings.min_factor
            };
            h = (h * factor).max(settings.min_step);
        }

        if stats.accepted + stats.rejected >= settings.max_steps {
            return Err(IntegrationFailure::SolverNonConvergence {
                time: t,
                step_size: h,
                reason: NonConvergenceReason::MaxStepsExceeded,
            });
        }
    }
}
