//! Solvers that advance a model through time.

pub mod adaptive;
pub mod euler;
