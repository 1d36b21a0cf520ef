//! Izhikevich two-variable spiking neuron.
//!
//! ```text
//! dV/dt = 0.04 V² + 5 V + 140 - u + I
//! du/dt = a (b V - u)
//! ```
//!
//! Stepped with forward Euler in milliseconds. A step that starts at or above
//! the spike marker (35 mV) does not integrate: the starting sample is pinned
//! to the marker, `V` resets to `c` and `u` jumps by `d`.

mod preset;

pub use preset::{IzhikevichPreset, UnknownPresetError};

use std::{convert::Infallible, ops::Range};

use neurosim_core::{DerivativeOf, Model, OdeProblem, StepIntegrable, TimeGrid};
use neurosim_solvers::transient::euler::{self, Event};
use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Error},
    spikes::SpikeTrain,
    stimulus::StimulusWaveform,
};

/// Simulated duration in milliseconds.
pub const DURATION: f64 = 1000.0;

/// Step size in milliseconds.
pub const DT: f64 = 0.5;

/// Sample indices during which the stimulus is on.
pub const STIMULUS_WINDOW: Range<usize> = 200..1500;

/// Spike marker in mV. A sample at or above it triggers a reset.
pub const SPIKE_MARKER: f64 = 35.0;

/// Initial membrane potential in mV.
pub const INITIAL_POTENTIAL: f64 = -70.0;

/// Initial recovery variable.
pub const INITIAL_RECOVERY: f64 = -14.0;

/// Parameters of the Izhikevich neuron.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IzhikevichParameters {
    /// Amplitude of the injected current.
    pub current: f64,

    /// Time scale of the recovery variable.
    pub a: f64,

    /// Sensitivity of the recovery variable to the potential.
    pub b: f64,

    /// Reset potential after a spike, in mV.
    pub c: f64,

    /// Recovery jump after a spike.
    pub d: f64,
}

impl Default for IzhikevichParameters {
    fn default() -> Self {
        Self {
            current: 10.0,
            a: 0.02,
            b: 0.2,
            c: -65.0,
            d: 8.0,
        }
    }
}

impl IzhikevichParameters {
    /// Returns these parameters with a preset's `(a, b, c, d)` substituted.
    #[must_use]
    pub fn with_preset(&self, preset: IzhikevichPreset) -> Self {
        preset.apply(self)
    }

    /// Checks that every parameter is finite.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`](crate::DomainError) naming the first
    /// non-finite parameter.
    pub fn validate(&self) -> Result<(), error::DomainError> {
        error::finite("current", self.current)?;
        error::finite("a", self.a)?;
        error::finite("b", self.b)?;
        error::finite("c", self.c)?;
        error::finite("d", self.d)?;
        Ok(())
    }
}

/// The result of an Izhikevich simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IzhikevichTrajectory {
    grid: TimeGrid,
    stimulus: StimulusWaveform,
    potential: Vec<f64>,
    recovery: Vec<f64>,
    spikes: SpikeTrain,
}

impl IzhikevichTrajectory {
    #[must_use]
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    #[must_use]
    pub fn stimulus(&self) -> &StimulusWaveform {
        &self.stimulus
    }

    /// Returns the membrane potential `V`, in mV.
    #[must_use]
    pub fn potential(&self) -> &[f64] {
        &self.potential
    }

    /// Returns the recovery variable `u`.
    #[must_use]
    pub fn recovery(&self) -> &[f64] {
        &self.recovery
    }

    #[must_use]
    pub fn spikes(&self) -> &SpikeTrain {
        &self.spikes
    }
}

/// Simulates the neuron on its standard grid (1000 ms at 0.5 ms).
///
/// # Errors
///
/// Returns [`Error::Domain`] if a parameter is not finite.
pub fn simulate(parameters: &IzhikevichParameters) -> Result<IzhikevichTrajectory, Error> {
    simulate_on(parameters, &TimeGrid::new(DURATION, DT)?)
}

/// Simulates the neuron on an explicit grid, with `dt` in milliseconds.
///
/// # Errors
///
/// Returns [`Error::Domain`] if a parameter is not finite.
pub fn simulate_on(
    parameters: &IzhikevichParameters,
    grid: &TimeGrid,
) -> Result<IzhikevichTrajectory, Error> {
    parameters.validate()?;

    let stimulus = StimulusWaveform::generate(grid, parameters.current, STIMULUS_WINDOW);
    let neuron = Neuron {
        parameters,
        stimulus: &stimulus,
    };
    let initial = Input {
        index: 0,
        state: Membrane {
            v: INITIAL_POTENTIAL,
            u: INITIAL_RECOVERY,
        },
        fired: false,
    };

    tracing::debug!(samples = grid.samples(), ?parameters, "simulating Izhikevich");

    let mut resets = Vec::new();
    let solution = euler::solve(
        &neuron,
        &neuron,
        initial,
        grid.dt(),
        grid.steps(),
        |event: &Event<Input, Output>| {
            if event.snapshot.input.fired {
                resets.push(event.step);
            }
        },
    )?;

    let (mut potential, recovery): (Vec<f64>, Vec<f64>) = solution
        .inputs()
        .map(|input| (input.state.v, input.state.u))
        .unzip();

    let spikes: SpikeTrain = resets.into_iter().map(|reset| reset - 1).collect();
    for &apex in spikes.indices() {
        potential[apex] = SPIKE_MARKER;
    }

    tracing::debug!(spikes = spikes.count(), "Izhikevich finished");

    Ok(IzhikevichTrajectory {
        grid: *grid,
        stimulus,
        potential,
        recovery,
        spikes,
    })
}

/// Potential and recovery, stepped together.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Membrane {
    v: f64,
    u: f64,
}

#[derive(Debug, Clone, Copy)]
struct MembraneRate {
    dv: f64,
    du: f64,
}

impl StepIntegrable<f64> for Membrane {
    type Derivative = MembraneRate;

    fn step(&self, derivative: MembraneRate, dt: f64) -> Self {
        Membrane {
            v: self.v + derivative.dv * dt,
            u: self.u + dt * derivative.du,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Input {
    index: usize,
    state: Membrane,
    fired: bool,
}

#[derive(Debug, Clone, Copy)]
struct Output {
    rate: MembraneRate,
}

struct Neuron<'a> {
    parameters: &'a IzhikevichParameters,
    stimulus: &'a StimulusWaveform,
}

impl Model for Neuron<'_> {
    type Input = Input;
    type Output = Output;
    type Error = Infallible;

    /// Computes the rates for the step leaving sample `index`, driven by the
    /// stimulus at that same sample.
    fn call(&self, input: &Input) -> Result<Output, Infallible> {
        let IzhikevichParameters { a, b, .. } = *self.parameters;
        let Membrane { v, u } = input.state;
        let current = self.stimulus.at(input.index);

        Ok(Output {
            rate: MembraneRate {
                dv: (0.04 * v + 5.0) * v + 140.0 - u + current,
                du: a * (b * v - u),
            },
        })
    }
}

impl OdeProblem for Neuron<'_> {
    type Input = Input;
    type Output = Output;
    type Delta = f64;
    type State = Membrane;
    type Error = Infallible;

    fn state(&self, input: &Input) -> Result<Membrane, Infallible> {
        Ok(input.state)
    }

    fn derivative(
        &self,
        _input: &Input,
        output: &Output,
    ) -> Result<DerivativeOf<Membrane, f64>, Infallible> {
        Ok(output.rate)
    }

    fn build_input(
        &self,
        base: &Input,
        state: &Membrane,
        _delta: &f64,
    ) -> Result<Input, Infallible> {
        Ok(Input {
            index: base.index + 1,
            state: *state,
            fired: false,
        })
    }

    /// Replaces the Euler step with a reset when the step started at or
    /// above the spike marker.
    fn finalize_step(
        &self,
        next_input: Input,
        prev_input: &Input,
        _prev_output: &Output,
        _step_delta: &f64,
    ) -> Result<Input, Infallible> {
        if prev_input.state.v >= SPIKE_MARKER {
            Ok(Input {
                state: Membrane {
                    v: self.parameters.c,
                    u: prev_input.state.u + self.parameters.d,
                },
                fired: true,
                ..next_input
            })
        } else {
            Ok(next_input)
        }
    }
}
