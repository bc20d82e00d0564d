// ─────────────────────────────────────────────────────────────────────
// Double Pendulum Core — RK4
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Classic fixed-step 4th-order Runge-Kutta on fixed-size state arrays.
//!
//! The state lives on the stack (`[f64; N]`), so a step allocates nothing.

/// `y + a * k`, component-wise.
#[inline]
pub(crate) fn axpy<const N: usize>(y: &[f64; N], a: f64, k: &[f64; N]) -> [f64; N] {
    let mut out = *y;
    for (o, ki) in out.iter_mut().zip(k) {
        *o += a * ki;
    }
    out
}

/// Single RK4 step advancing `y` from `t` to `t + h` for `dy/dt = f(t, y)`.
///
/// ```text
/// k1 = f(t,       y)
/// k2 = f(t + h/2, y + h/2 k1)
/// k3 = f(t + h/2, y + h/2 k2)
/// k4 = f(t + h,   y + h   k3)
/// y' = y + h/6 (k1 + 2 k2 + 2 k3 + k4)
/// ```
pub fn rk4_step<const N: usize>(
    t: f64,
    y: &[f64; N],
    h: f64,
    mut f: impl FnMut(f64, &[f64; N]) -> [f64; N],
) -> [f64; N] {
    let half = 0.5 * h;

    let k1 = f(t, y);
    let k2 = f(t + half, &axpy(y, half, &k1));
    let k3 = f(t + half, &axpy(y, half, &k2));
    let k4 = f(t + h, &axpy(y, h, &k3));

    let mut out = *y;
    for i in 0..N {
        out[i] += (h / 6.0) * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    out
}
