//! Leaky integrate-and-fire neuron.
//!
//! A single membrane potential charged by the injected current and drained
//! by a leak toward rest:
//!
//! ```text
//! C_m dV/dt = I - g_L (V - E_L)
//! ```
//!
//! The potential is stepped with forward Euler. When a step carries it above
//! the threshold, the sample before the crossing is overwritten with the
//! spike marker and the potential resets to rest. All quantities are SI
//! (volts, seconds, amperes, siemens, farads).

use std::{
    convert::Infallible,
    ops::{Div, Range},
};

use neurosim_core::{DerivativeOf, Model, OdeProblem, StepIntegrable, TimeGrid};
use neurosim_solvers::transient::euler::{self, Event};
use serde::{Deserialize, Serialize};
use uom::si::{
    capacitance::farad,
    electric_current::ampere,
    electric_potential::volt,
    electrical_conductance::siemens,
    f64::{Capacitance, ElectricCurrent, ElectricPotential, ElectricalConductance, Time},
    time::second,
};

use crate::{
    error::{self, Error},
    spikes::SpikeTrain,
    stimulus::StimulusWaveform,
};

/// Simulated duration in seconds.
pub const DURATION: f64 = 0.100;

/// Step size in seconds.
pub const DT: f64 = 0.000_02;

/// Sample indices during which the stimulus is on.
pub const STIMULUS_WINDOW: Range<usize> = 1000..4000;

/// Resting potential `E_L` in volts. Also the initial and reset potential.
pub const RESTING_POTENTIAL: f64 = -0.065;

/// Firing threshold `V_th` in volts.
pub const THRESHOLD: f64 = -0.050;

/// Value written to the spike apex sample, in volts.
pub const SPIKE_MARKER: f64 = 0.04;

/// Parameters of the leaky integrate-and-fire neuron.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LifParameters {
    /// Amplitude of the injected current.
    pub current: ElectricCurrent,

    /// Leak conductance `g_L`.
    pub leak_conductance: ElectricalConductance,

    /// Membrane capacitance `C_m`.
    pub capacitance: Capacitance,
}

impl Default for LifParameters {
    fn default() -> Self {
        Self {
            current: ElectricCurrent::new::<ampere>(0.005),
            leak_conductance: ElectricalConductance::new::<siemens>(0.16),
            capacitance: Capacitance::new::<farad>(0.0049),
        }
    }
}

impl LifParameters {
    /// Sets the injected current.
    #[must_use]
    pub fn current(mut self, current: ElectricCurrent) -> Self {
        self.current = current;
        self
    }

    /// Sets the injected current in SI units (A).
    #[must_use]
    pub fn current_si(self, current: f64) -> Self {
        self.current(ElectricCurrent::new::<ampere>(current))
    }

    /// Sets the leak conductance in SI units (S).
    #[must_use]
    pub fn leak_conductance_si(mut self, conductance: f64) -> Self {
        self.leak_conductance = ElectricalConductance::new::<siemens>(conductance);
        self
    }

    /// Sets the membrane capacitance in SI units (F).
    #[must_use]
    pub fn capacitance_si(mut self, capacitance: f64) -> Self {
        self.capacitance = Capacitance::new::<farad>(capacitance);
        self
    }

    /// Checks that every parameter lies in its physical domain.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`](crate::DomainError) if the current is not
    /// finite, the conductance is negative, or the capacitance is not positive.
    pub fn validate(&self) -> Result<(), error::DomainError> {
        error::finite("current", self.current.get::<ampere>())?;
        error::non_negative("leak_conductance", self.leak_conductance.get::<siemens>())?;
        error::positive("capacitance", self.capacitance.get::<farad>())?;
        Ok(())
    }
}

/// The result of a leaky integrate-and-fire simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifTrajectory {
    grid: TimeGrid,
    stimulus: StimulusWaveform,
    potential: Vec<f64>,
    spikes: SpikeTrain,
}

impl LifTrajectory {
    /// Returns the time grid.
    #[must_use]
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Returns the injected current waveform, in amperes.
    #[must_use]
    pub fn stimulus(&self) -> &StimulusWaveform {
        &self.stimulus
    }

    /// Returns the membrane potential, in volts.
    #[must_use]
    pub fn potential(&self) -> &[f64] {
        &self.potential
    }

    /// Returns the spike apex indices.
    #[must_use]
    pub fn spikes(&self) -> &SpikeTrain {
        &self.spikes
    }
}

/// Simulates the neuron on its standard grid (0.1 s at 20 µs).
///
/// # Errors
///
/// Returns [`Error::Domain`] if the parameters are invalid.
pub fn simulate(parameters: &LifParameters) -> Result<LifTrajectory, Error> {
    simulate_on(parameters, &TimeGrid::new(DURATION, DT)?)
}

/// Simulates the neuron on an explicit grid, with `dt` in seconds.
///
/// The stimulus window stays at samples `1000..4000`, clamped to the grid.
///
/// # Errors
///
/// Returns [`Error::Domain`] if the parameters are invalid.
pub fn simulate_on(parameters: &LifParameters, grid: &TimeGrid) -> Result<LifTrajectory, Error> {
    parameters.validate()?;

    let stimulus = StimulusWaveform::generate(
        grid,
        parameters.current.get::<ampere>(),
        STIMULUS_WINDOW,
    );
    let neuron = Neuron {
        parameters,
        stimulus: &stimulus,
    };
    let initial = Input {
        index: 0,
        potential: Potential(volts(RESTING_POTENTIAL)),
        fired: false,
    };

    tracing::debug!(samples = grid.samples(), "simulating leaky integrate-and-fire");

    let mut resets = Vec::new();
    let solution = euler::solve(
        &neuron,
        &neuron,
        initial,
        Time::new::<second>(grid.dt()),
        grid.steps(),
        |event: &Event<Input, Output>| {
            if event.snapshot.input.fired {
                resets.push(event.step);
            }
        },
    )?;

    let mut potential: Vec<f64> = solution
        .inputs()
        .map(|input| input.potential.0.get::<volt>())
        .collect();

    let spikes: SpikeTrain = resets.into_iter().map(|reset| reset - 1).collect();
    for &apex in spikes.indices() {
        potential[apex] = SPIKE_MARKER;
    }

    tracing::debug!(spikes = spikes.count(), "leaky integrate-and-fire finished");

    Ok(LifTrajectory {
        grid: *grid,
        stimulus,
        potential,
        spikes,
    })
}

fn volts(value: f64) -> ElectricPotential {
    ElectricPotential::new::<volt>(value)
}

/// Rate of change of the membrane potential.
type PotentialRate = <ElectricPotential as Div<Time>>::Output;

/// Membrane potential as an Euler-steppable state.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Potential(ElectricPotential);

impl StepIntegrable<Time> for Potential {
    type Derivative = PotentialRate;

    fn step(&self, derivative: PotentialRate, dt: Time) -> Self {
        Potential(self.0 + derivative * dt)
    }
}

#[derive(Debug, Clone, Copy)]
struct Input {
    index: usize,
    potential: Potential,
    fired: bool,
}

#[derive(Debug, Clone, Copy)]
struct Output {
    rate: PotentialRate,
}

/// The membrane equation bound to one parameter set and stimulus.
struct Neuron<'a> {
    parameters: &'a LifParameters,
    stimulus: &'a StimulusWaveform,
}

impl Model for Neuron<'_> {
    type Input = Input;
    type Output = Output;
    type Error = Infallible;

    /// Computes `dV/dt` for the step leaving sample `index`.
    ///
    /// The step is driven by the stimulus at its end sample, `index + 1`.
    fn call(&self, input: &Input) -> Result<Output, Infallible> {
        let LifParameters {
            leak_conductance,
            capacitance,
            ..
        } = *self.parameters;
        let current = ElectricCurrent::new::<ampere>(self.stimulus.at(input.index + 1));
        let leak = leak_conductance * (input.potential.0 - volts(RESTING_POTENTIAL));

        Ok(Output {
            rate: (current - leak) / capacitance,
        })
    }
}

impl OdeProblem for Neuron<'_> {
    type Input = Input;
    type Output = Output;
    type Delta = Time;
    type State = Potential;
    type Error = Infallible;

    fn state(&self, input: &Input) -> Result<Potential, Infallible> {
        Ok(input.potential)
    }

    fn derivative(
        &self,
        _input: &Input,
        output: &Output,
    ) -> Result<DerivativeOf<Potential, Time>, Infallible> {
        Ok(output.rate)
    }

    fn build_input(
        &self,
        base: &Input,
        state: &Potential,
        _delta: &Time,
    ) -> Result<Input, Infallible> {
        Ok(Input {
            index: base.index + 1,
            potential: *state,
            fired: false,
        })
    }

    fn finalize_step(
        &self,
        next_input: Input,
        _prev_input: &Input,
        _prev_output: &Output,
        _step_delta: &Time,
    ) -> Result<Input, Infallible> {
        if next_input.potential.0 > volts(THRESHOLD) {
            Ok(Input {
                potential: Potential(volts(RESTING_POTENTIAL)),
                fired: true,
                ..next_input
            })
        } else {
            Ok(next_input)
        }
    }
}
