//! Numerical solvers for neurosim.
//!
//! - [`transient::euler`]: fixed-step forward Euler with a per-step finalize
//!   hook for threshold resets.
//! - [`transient::adaptive`]: Runge–Kutta integration (fixed-step Rk4,
//!   adaptive Dopri5 and Dop853) resampled onto a
//!   [`TimeGrid`](neurosim_core::TimeGrid).

pub mod transient;
