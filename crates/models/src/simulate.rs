use std::{fmt, str::FromStr};

use neurosim_core::TimeGrid;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uom::si::electric_current::ampere;

use crate::{
    error::{DomainError, Error},
    fitzhugh_nagumo::{self, FitzHughNagumoParameters, FitzHughNagumoTrajectory},
    hodgkin_huxley::{self, HodgkinHuxleyParameters, HodgkinHuxleyTrajectory},
    izhikevich::{self, IzhikevichParameters, IzhikevichTrajectory},
    lif::{self, LifParameters, LifTrajectory},
    spikes::SpikeTrain,
    stimulus::StimulusWaveform,
};

/// The neuron models that can be simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "lif")]
    Lif,
    #[serde(rename = "izhikevich")]
    Izhikevich,
    #[serde(rename = "fitzhugh-nagumo")]
    FitzHughNagumo,
    #[serde(rename = "hodgkin-huxley")]
    HodgkinHuxley,
}

/// Error returned when parsing an unknown model name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown model `{name}`, expected one of: lif, izhikevich, fitzhugh-nagumo, hodgkin-huxley")]
pub struct UnknownModelError {
    pub name: String,
}

impl ModelKind {
    pub const ALL: [Self; 4] = [
        Self::Lif,
        Self::Izhikevich,
        Self::FitzHughNagumo,
        Self::HodgkinHuxley,
    ];

    /// Returns the identifier used in configs and on the command line.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Lif => "lif",
            Self::Izhikevich => "izhikevich",
            Self::FitzHughNagumo => "fitzhugh-nagumo",
            Self::HodgkinHuxley => "hodgkin-huxley",
        }
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Lif => "Leaky Integrate-and-Fire",
            Self::Izhikevich => "Izhikevich",
            Self::FitzHughNagumo => "FitzHugh-Nagumo",
            Self::HodgkinHuxley => "Hodgkin-Huxley",
        }
    }

    /// Returns the model's standard time grid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Grid`] if grid construction fails.
    pub fn grid(self) -> Result<TimeGrid, Error> {
        let (duration, dt) = match self {
            Self::Lif => (lif::DURATION, lif::DT),
            Self::Izhikevich => (izhikevich::DURATION, izhikevich::DT),
            Self::FitzHughNagumo => (fitzhugh_nagumo::DURATION, fitzhugh_nagumo::DT),
            Self::HodgkinHuxley => (hodgkin_huxley::DURATION, hodgkin_huxley::DT),
        };
        Ok(TimeGrid::new(duration, dt)?)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModelKind {
    type Err = UnknownModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lif" | "leaky-integrate-and-fire" => Ok(Self::Lif),
            "izhikevich" | "iz" => Ok(Self::Izhikevich),
            "fitzhugh-nagumo" | "fn" => Ok(Self::FitzHughNagumo),
            "hodgkin-huxley" | "hh" => Ok(Self::HodgkinHuxley),
            _ => Err(UnknownModelError { name: s.to_owned() }),
        }
    }
}

/// Parameters for one of the four models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", content = "parameters")]
pub enum ModelParameters {
    #[serde(rename = "lif")]
    Lif(LifParameters),
    #[serde(rename = "izhikevich")]
    Izhikevich(IzhikevichParameters),
    #[serde(rename = "fitzhugh-nagumo")]
    FitzHughNagumo(FitzHughNagumoParameters),
    #[serde(rename = "hodgkin-huxley")]
    HodgkinHuxley(HodgkinHuxleyParameters),
}

impl ModelParameters {
    /// Returns the default parameters of `kind`.
    #[must_use]
    pub fn defaults(kind: ModelKind) -> Self {
        match kind {
            ModelKind::Lif => Self::Lif(LifParameters::default()),
            ModelKind::Izhikevich => Self::Izhikevich(IzhikevichParameters::default()),
            ModelKind::FitzHughNagumo => Self::FitzHughNagumo(FitzHughNagumoParameters::default()),
            ModelKind::HodgkinHuxley => Self::HodgkinHuxley(HodgkinHuxleyParameters::default()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ModelKind {
        match self {
            Self::Lif(_) => ModelKind::Lif,
            Self::Izhikevich(_) => ModelKind::Izhikevich,
            Self::FitzHughNagumo(_) => ModelKind::FitzHughNagumo,
            Self::HodgkinHuxley(_) => ModelKind::HodgkinHuxley,
        }
    }

    /// Returns the injected current amplitude in the model's own units.
    #[must_use]
    pub fn current(&self) -> f64 {
        match self {
            Self::Lif(p) => p.current.get::<ampere>(),
            Self::Izhikevich(p) => p.current,
            Self::FitzHughNagumo(p) => p.current,
            Self::HodgkinHuxley(p) => p.current,
        }
    }

    /// Returns these parameters with the injected current replaced.
    ///
    /// `current` is in the model's own units (amperes for LIF).
    #[must_use]
    pub fn with_current(self, current: f64) -> Self {
        match self {
            Self::Lif(p) => Self::Lif(p.current_si(current)),
            Self::Izhikevich(p) => Self::Izhikevich(IzhikevichParameters { current, ..p }),
            Self::FitzHughNagumo(p) => {
                Self::FitzHughNagumo(FitzHughNagumoParameters { current, ..p })
            }
            Self::HodgkinHuxley(p) => {
                Self::HodgkinHuxley(HodgkinHuxleyParameters { current, ..p })
            }
        }
    }

    /// Checks the parameters against their model's domain.
    ///
    /// # Errors
    ///
    /// Returns the first [`DomainError`] found.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::Lif(p) => p.validate(),
            Self::Izhikevich(p) => p.validate(),
            Self::FitzHughNagumo(p) => p.validate(),
            Self::HodgkinHuxley(p) => p.validate(),
        }
    }
}

impl From<LifParameters> for ModelParameters {
    fn from(parameters: LifParameters) -> Self {
        Self::Lif(parameters)
    }
}

impl From<IzhikevichParameters> for ModelParameters {
    fn from(parameters: IzhikevichParameters) -> Self {
        Self::Izhikevich(parameters)
    }
}

impl From<FitzHughNagumoParameters> for ModelParameters {
    fn from(parameters: FitzHughNagumoParameters) -> Self {
        Self::FitzHughNagumo(parameters)
    }
}

impl From<HodgkinHuxleyParameters> for ModelParameters {
    fn from(parameters: HodgkinHuxleyParameters) -> Self {
        Self::HodgkinHuxley(parameters)
    }
}

/// The trajectory of one of the four models.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "model")]
pub enum Trajectory {
    #[serde(rename = "lif")]
    Lif(LifTrajectory),
    #[serde(rename = "izhikevich")]
    Izhikevich(IzhikevichTrajectory),
    #[serde(rename = "fitzhugh-nagumo")]
    FitzHughNagumo(FitzHughNagumoTrajectory),
    #[serde(rename = "hodgkin-huxley")]
    HodgkinHuxley(HodgkinHuxleyTrajectory),
}

impl Trajectory {
    #[must_use]
    pub fn kind(&self) -> ModelKind {
        match self {
            Self::Lif(_) => ModelKind::Lif,
            Self::Izhikevich(_) => ModelKind::Izhikevich,
            Self::FitzHughNagumo(_) => ModelKind::FitzHughNagumo,
            Self::HodgkinHuxley(_) => ModelKind::HodgkinHuxley,
        }
    }

    #[must_use]
    pub fn grid(&self) -> &TimeGrid {
        match self {
            Self::Lif(t) => t.grid(),
            Self::Izhikevich(t) => t.grid(),
            Self::FitzHughNagumo(t) => t.grid(),
            Self::HodgkinHuxley(t) => t.grid(),
        }
    }

    #[must_use]
    pub fn stimulus(&self) -> &StimulusWaveform {
        match self {
            Self::Lif(t) => t.stimulus(),
            Self::Izhikevich(t) => t.stimulus(),
            Self::FitzHughNagumo(t) => t.stimulus(),
            Self::HodgkinHuxley(t) => t.stimulus(),
        }
    }

    /// Returns the membrane potential.
    #[must_use]
    pub fn potential(&self) -> &[f64] {
        match self {
            Self::Lif(t) => t.potential(),
            Self::Izhikevich(t) => t.potential(),
            Self::FitzHughNagumo(t) => t.potential(),
            Self::HodgkinHuxley(t) => t.potential(),
        }
    }

    /// Returns the spike train for reset models, `None` otherwise.
    #[must_use]
    pub fn spikes(&self) -> Option<&SpikeTrain> {
        match self {
            Self::Lif(t) => Some(t.spikes()),
            Self::Izhikevich(t) => Some(t.spikes()),
            Self::FitzHughNagumo(_) | Self::HodgkinHuxley(_) => None,
        }
    }

    /// Returns every state variable by name, potential first.
    #[must_use]
    pub fn variables(&self) -> Vec<(&'static str, &[f64])> {
        match self {
            Self::Lif(t) => vec![("potential", t.potential())],
            Self::Izhikevich(t) => vec![("potential", t.potential()), ("recovery", t.recovery())],
            Self::FitzHughNagumo(t) => {
                vec![("potential", t.potential()), ("recovery", t.recovery())]
            }
            Self::HodgkinHuxley(t) => vec![
                ("potential", t.potential()),
                ("m", t.m()),
                ("h", t.h()),
                ("n", t.n()),
            ],
        }
    }

    /// Returns the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.potential().len()
    }

    /// Returns `true` if the trajectory holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.potential().is_empty()
    }
}

/// Simulates the selected model on its standard grid.
///
/// # Errors
///
/// Returns [`Error::Domain`] for invalid parameters, or
/// [`Error::NumericalIntegration`] if the Hodgkin-Huxley solver fails.
pub fn simulate(parameters: &ModelParameters) -> Result<Trajectory, Error> {
    tracing::debug!(model = %parameters.kind(), "dispatching simulation");

    Ok(match parameters {
        ModelParameters::Lif(p) => Trajectory::Lif(lif::simulate(p)?),
        ModelParameters::Izhikevich(p) => Trajectory::Izhikevich(izhikevich::simulate(p)?),
        ModelParameters::FitzHughNagumo(p) => {
            Trajectory::FitzHughNagumo(fitzhugh_nagumo::simulate(p)?)
        }
        ModelParameters::HodgkinHuxley(p) => {
            Trajectory::HodgkinHuxley(hodgkin_huxley::simulate(p)?)
        }
    })
}

/// Simulates the selected model on an explicit grid.
///
/// # Errors
///
/// See [`simulate`].
pub fn simulate_on(parameters: &ModelParameters, grid: &TimeGrid) -> Result<Trajectory, Error> {
    Ok(match parameters {
        ModelParameters::Lif(p) => Trajectory::Lif(lif::simulate_on(p, grid)?),
        ModelParameters::Izhikevich(p) => {
            Trajectory::Izhikevich(izhikevich::simulate_on(p, grid)?)
        }
        ModelParameters::FitzHughNagumo(p) => {
            Trajectory::FitzHughNagumo(fitzhugh_nagumo::simulate_on(p, grid)?)
        }
        ModelParameters::HodgkinHuxley(p) => {
            Trajectory::HodgkinHuxley(hodgkin_huxley::simulate_on(p, grid)?)
        }
    })
}
