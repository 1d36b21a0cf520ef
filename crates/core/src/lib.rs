//! Core traits and types for neurosim.
//!
//! This crate defines the shared abstractions that the solvers and neuron
//! models build on:
//!
//! - [`Model`] — a deterministic callable that maps a typed input to a typed output
//! - [`Snapshot`] — a captured input/output pair from a model call
//! - [`Observer`] — receives solver events
//! - [`OdeProblem`] — adapts a model to fixed-step integration
//! - [`Integratable`] — adapts a model to a general-purpose vector ODE solver
//! - [`TimeGrid`] — the uniform sample times a simulation is reported on

mod model;
mod observer;
mod problems;
mod step;
mod time;

pub use observer::Observer;
pub use problems::{Integratable, OdeProblem, State};
pub use step::{DerivativeOf, StepIntegrable};
pub use time::{TimeGrid, TimeGridError};
pub use {model::Model, model::Snapshot};
