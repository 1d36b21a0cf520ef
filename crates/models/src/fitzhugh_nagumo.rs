//! FitzHugh-Nagumo relaxation oscillator.
//!
//! ```text
//! dV/dt = V - V³/3 - W + I
//! dW/dt = (V + a - b W) / tau
//! ```
//!
//! Dimensionless, stepped with forward Euler. There is no threshold or
//! reset; spikes are smooth excursions of `V`.

use std::{convert::Infallible, ops::Range};

use neurosim_core::{DerivativeOf, Model, OdeProblem, StepIntegrable, TimeGrid};
use neurosim_solvers::transient::euler;
use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Error},
    stimulus::StimulusWaveform,
};

/// Simulated duration.
pub const DURATION: f64 = 400.0;

/// Step size.
pub const DT: f64 = 0.01;

/// Sample indices during which the stimulus is on.
pub const STIMULUS_WINDOW: Range<usize> = 5000..35000;

/// Initial potential.
pub const INITIAL_POTENTIAL: f64 = -0.7;

/// Initial recovery variable.
pub const INITIAL_RECOVERY: f64 = -0.5;

/// Parameters of the FitzHugh-Nagumo model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FitzHughNagumoParameters {
    pub current: f64,
    pub a: f64,
    pub b: f64,

    /// Time constant of the recovery variable.
    pub tau: f64,
}

impl Default for FitzHughNagumoParameters {
    fn default() -> Self {
        Self {
            current: 0.5,
            a: 0.7,
            b: 0.8,
            tau: 1.0 / 0.08,
        }
    }
}

impl FitzHughNagumoParameters {
    /// Checks that every parameter is finite and `tau` is positive.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`](crate::DomainError) for the first offending
    /// parameter.
    pub fn validate(&self) -> Result<(), error::DomainError> {
        error::finite("current", self.current)?;
        error::finite("a", self.a)?;
        error::finite("b", self.b)?;
        error::positive("tau", self.tau)?;
        Ok(())
    }
}

/// The result of a FitzHugh-Nagumo simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitzHughNagumoTrajectory {
    grid: TimeGrid,
    stimulus: StimulusWaveform,
    potential: Vec<f64>,
    recovery: Vec<f64>,
}

impl FitzHughNagumoTrajectory {
    #[must_use]
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    #[must_use]
    pub fn stimulus(&self) -> &StimulusWaveform {
        &self.stimulus
    }

    /// Returns the potential `V`.
    #[must_use]
    pub fn potential(&self) -> &[f64] {
        &self.potential
    }

    /// Returns the recovery variable `W`.
    #[must_use]
    pub fn recovery(&self) -> &[f64] {
        &self.recovery
    }
}

/// Simulates the model on its standard grid (400 time units at 0.01).
///
/// # Errors
///
/// Returns [`Error::Domain`] if the parameters are invalid.
pub fn simulate(parameters: &FitzHughNagumoParameters) -> Result<FitzHughNagumoTrajectory, Error> {
    simulate_on(parameters, &TimeGrid::new(DURATION, DT)?)
}

/// Simulates the model on an explicit grid.
///
/// # Errors
///
/// Returns [`Error::Domain`] if the parameters are invalid.
pub fn simulate_on(
    parameters: &FitzHughNagumoParameters,
    grid: &TimeGrid,
) -> Result<FitzHughNagumoTrajectory, Error> {
    parameters.validate()?;

    let stimulus = StimulusWaveform::generate(grid, parameters.current, STIMULUS_WINDOW);
    let oscillator = Oscillator {
        parameters,
        stimulus: &stimulus,
    };
    let initial = Input {
        index: 0,
        state: Membrane {
            v: INITIAL_POTENTIAL,
            w: INITIAL_RECOVERY,
        },
    };

    tracing::debug!(samples = grid.samples(), "simulating FitzHugh-Nagumo");

    let solution =
        euler::solve_unobserved(&oscillator, &oscillator, initial, grid.dt(), grid.steps())?;
    let (potential, recovery) = solution
        .inputs()
        .map(|input| (input.state.v, input.state.w))
        .unzip();

    Ok(FitzHughNagumoTrajectory {
        grid: *grid,
        stimulus,
        potential,
        recovery,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Membrane {
    v: f64,
    w: f64,
}

#[derive(Debug, Clone, Copy)]
struct MembraneRate {
    dv: f64,
    dw: f64,
}

impl StepIntegrable<f64> for Membrane {
    type Derivative = MembraneRate;

    fn step(&self, derivative: MembraneRate, dt: f64) -> Self {
        Membrane {
            v: self.v + derivative.dv * dt,
            w: self.w + derivative.dw * dt,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Input {
    index: usize,
    state: Membrane,
}

struct Oscillator<'a> {
    parameters: &'a FitzHughNagumoParameters,
    stimulus: &'a StimulusWaveform,
}

impl Model for Oscillator<'_> {
    type Input = Input;
    type Output = MembraneRate;
    type Error = Infallible;

    /// Rates for the step leaving sample `index`, driven by the stimulus at
    /// `index + 1`.
    fn call(&self, input: &Input) -> Result<MembraneRate, Infallible> {
        let FitzHughNagumoParameters { a, b, tau, .. } = *self.parameters;
        let Membrane { v, w } = input.state;
        let current = self.stimulus.at(input.index + 1);

        Ok(MembraneRate {
            dv: v - v.powi(3) / 3.0 - w + current,
            dw: (v + a - b * w) / tau,
        })
    }
}

impl OdeProblem for Oscillator<'_> {
    type Input = Input;
    type Output = MembraneRate;
    type Delta = f64;
    type State = Membrane;
    type Error = Infallible;

    fn state(&self, input: &Input) -> Result<Membrane, Infallible> {
        Ok(input.state)
    }

    fn derivative(
        &self,
        _input: &Input,
        output: &MembraneRate,
    ) -> Result<DerivativeOf<Membrane, f64>, Infallible> {
        Ok(*output)
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
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn standard_grid_has_40001_samples() {
        let trajectory = simulate(&FitzHughNagumoParameters::default()).unwrap();

        assert_eq!(trajectory.potential().len(), 40001);
        assert_eq!(trajectory.recovery().len(), 40001);
        assert_eq!(trajectory.potential()[0], INITIAL_POTENTIAL);
        assert_eq!(trajectory.recovery()[0], INITIAL_RECOVERY);
    }

    #[test]
    fn potential_moves_smoothly() {
        let trajectory = simulate(&FitzHughNagumoParameters::default()).unwrap();

        let largest_jump = trajectory
            .potential()
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).abs())
            .fold(0.0, f64::max);
        assert!(largest_jump < 0.05, "largest jump {largest_jump}");
    }

    #[test]
    fn oscillates_under_stimulus() {
        let trajectory = simulate(&FitzHughNagumoParameters::default()).unwrap();
        let during = &trajectory.potential()[STIMULUS_WINDOW];

        let max = during.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = during.iter().copied().fold(f64::INFINITY, f64::min);
        assert!(max > 1.5, "max {max}");
        assert!(min < -1.0, "min {min}");
    }

    #[test]
    fn first_step_matches_update_rule() {
        let parameters = FitzHughNagumoParameters::default();
        let trajectory = simulate(&parameters).unwrap();
        let (v, w) = (INITIAL_POTENTIAL, INITIAL_RECOVERY);

        assert_relative_eq!(
            trajectory.potential()[1],
            v + (v - v.powi(3) / 3.0 - w) * DT
        );
        assert_relative_eq!(
            trajectory.recovery()[1],
            w + ((v + parameters.a - parameters.b * w) / parameters.tau) * DT
        );
    }

    #[test]
    fn deterministic() {
        let parameters = FitzHughNagumoParameters {
            current: 0.8,
            ..FitzHughNagumoParameters::default()
        };

        assert_eq!(simulate(&parameters).unwrap(), simulate(&parameters).unwrap());
    }

    #[test]
    fn rejects_non_positive_tau() {
        let parameters = FitzHughNagumoParameters {
            tau: 0.0,
            ..FitzHughNagumoParameters::default()
        };

        assert!(matches!(
            simulate(&parameters),
            Err(Error::Domain(error::DomainError::NonPositive { name: "tau", .. }))
        ));
    }
}
