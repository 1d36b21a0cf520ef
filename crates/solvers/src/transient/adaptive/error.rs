use std::error::Error as StdError;

use ode_solvers::dop_shared::IntegrationError;
use thiserror::Error;

/// Errors that can occur during adaptive integration.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Integration(#[from] IntegrationError),

    #[error("model call failed")]
    Model(#[source] Box<dyn StdError + Send + Sync>),

    #[error("solver produced no output at t = {time}")]
    MissingSample { time: f64 },

    #[error("state became non-finite at t = {time}")]
    NonFinite { time: f64 },

    #[error("invalid method: {reason}")]
    InvalidMethod { reason: String },
}
