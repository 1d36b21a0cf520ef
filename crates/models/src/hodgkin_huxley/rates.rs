//! Voltage-dependent gating rates of the squid giant axon, in 1/ms with `V`
//! in mV.
//!
//! `alpha_m` and `alpha_n` have the form `x / (1 - exp(-x / k))`, which is
//! 0/0 at `x = 0`. They are evaluated through [`exprel`], which stays finite
//! and continuous there.

/// Below this `|x / k|` the first-order series replaces the exponential.
const SERIES_THRESHOLD: f64 = 1e-7;

/// Returns `x / (1 - exp(-x / k))`, extended continuously to `k` at `x = 0`.
pub fn exprel(x: f64, k: f64) -> f64 {
    let y = x / k;
    if y.abs() < SERIES_THRESHOLD {
        k * (1.0 + y / 2.0)
    } else {
        -x / (-y).exp_m1()
    }
}

/// Sodium activation opening rate.
pub fn alpha_m(v: f64) -> f64 {
    0.1 * exprel(v + 40.0, 10.0)
}

/// Sodium activation closing rate.
pub fn beta_m(v: f64) -> f64 {
    4.0 * (-(v + 65.0) / 18.0).exp()
}

/// Sodium inactivation opening rate.
pub fn alpha_h(v: f64) -> f64 {
    0.07 * (-(v + 65.0) / 20.0).exp()
}

/// Sodium inactivation closing rate.
pub fn beta_h(v: f64) -> f64 {
    1.0 / (1.0 + (-(v + 35.0) / 10.0).exp())
}

/// Potassium activation opening rate.
pub fn alpha_n(v: f64) -> f64 {
    0.01 * exprel(v + 55.0, 10.0)
}

/// Potassium activation closing rate.
pub fn beta_n(v: f64) -> f64 {
    0.125 * (-(v + 65.0) / 80.0).exp()
}
