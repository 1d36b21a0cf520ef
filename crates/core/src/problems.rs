mod integratable;
mod ode;

pub use integratable::{Integratable, State};
pub use ode::OdeProblem;
