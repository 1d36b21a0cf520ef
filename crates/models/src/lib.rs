//! Single-neuron models for neurosim.
//!
//! Each model module exposes its parameters, a `simulate` function on the
//! model's standard grid, and a `simulate_on` variant for an explicit
//! [`TimeGrid`](neurosim_core::TimeGrid):
//!
//! - [`lif`]: leaky integrate-and-fire with a hard threshold and reset
//! - [`izhikevich`]: two-variable quadratic model with named presets
//! - [`fitzhugh_nagumo`]: dimensionless relaxation oscillator
//! - [`hodgkin_huxley`]: four-variable conductance model, integrated
//!   adaptively
//!
//! [`simulate()`] dispatches on [`ModelParameters`] for callers that select
//! the model at runtime, and [`SimulationConfig`] builds those parameters
//! from TOML.

pub mod config;
pub mod fitzhugh_nagumo;
pub mod hodgkin_huxley;
pub mod izhikevich;
pub mod lif;
pub mod spikes;
pub mod stimulus;

mod error;
mod simulate;

pub use config::{ConfigError, SimulationConfig};
pub use error::{DomainError, Error};
pub use izhikevich::{IzhikevichPreset, UnknownPresetError};
pub use simulate::{
    ModelKind, ModelParameters, Trajectory, UnknownModelError, simulate, simulate_on,
};
pub use spikes::SpikeTrain;
pub use stimulus::{CurrentPulse, StimulusWaveform, generate_stimulus};
