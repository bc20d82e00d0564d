//! Numerical kernels for the double pendulum core.
//!
//! Fixed-step RK4 and adaptive Dormand-Prince 5(4) on stack-allocated
//! `[f64; N]` state vectors, plus the uniform output grid both share.

pub mod dopri5;
pub mod rk4;
pub mod sampling;
