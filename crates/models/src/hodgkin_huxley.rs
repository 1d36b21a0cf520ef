//! Hodgkin-Huxley conductance-based neuron.
//!
//! Four coupled ODEs for the membrane potential `V` (mV) and the gating
//! variables `m`, `h` and `n`:
//!
//! ```text
//! C_m dV/dt = I(t) - g_Na m³ h (V - E_Na) - g_K n⁴ (V - E_K) - g_L (V - E_L)
//! dx/dt     = α_x(V) (1 - x) - β_x(V) x        for x in {m, h, n}
//! ```
//!
//! The gating kinetics are much faster than the membrane, so the system is
//! integrated with an adaptive Runge–Kutta method and resampled onto the
//! grid. The injected current is a continuous pulse, on for `40 < t < 300` ms.

pub mod rates;

use std::{convert::Infallible, ops::Range};

use neurosim_core::{Integratable, Model, State, TimeGrid};
use neurosim_solvers::transient::adaptive::{self, Method};
use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Error},
    stimulus::{CurrentPulse, StimulusWaveform},
};

/// Simulated duration in milliseconds.
pub const DURATION: f64 = 400.0;

/// Output step in milliseconds.
pub const DT: f64 = 0.1;

/// Start of the driving pulse in ms (exclusive).
pub const PULSE_START: f64 = 40.0;

/// End of the driving pulse in ms (exclusive).
pub const PULSE_END: f64 = 300.0;

/// Initial `(V, m, h, n)`, near rest.
pub const INITIAL_STATE: [f64; 4] = [-65.0, 0.05, 0.6, 0.32];

/// Parameters of the Hodgkin-Huxley neuron.
///
/// Potentials in mV, conductances in mS/cm², capacitance in µF/cm² and
/// current in µA/cm².
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HodgkinHuxleyParameters {
    pub current: f64,
    pub capacitance: f64,
    pub g_na: f64,
    pub g_k: f64,
    pub g_leak: f64,
    pub e_na: f64,
    pub e_k: f64,
    pub e_leak: f64,
}

impl Default for HodgkinHuxleyParameters {
    fn default() -> Self {
        Self {
            current: 7.0,
            capacitance: 1.0,
            g_na: 120.0,
            g_k: 36.0,
            g_leak: 0.3,
            e_na: 50.0,
            e_k: -77.0,
            e_leak: -54.387,
        }
    }
}

impl HodgkinHuxleyParameters {
    /// Checks that every parameter is finite, the capacitance is positive
    /// and no conductance is negative.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`](crate::DomainError) for the first offending
    /// parameter.
    pub fn validate(&self) -> Result<(), error::DomainError> {
        error::finite("current", self.current)?;
        error::positive("capacitance", self.capacitance)?;
        error::non_negative("g_na", self.g_na)?;
        error::non_negative("g_k", self.g_k)?;
        error::non_negative("g_leak", self.g_leak)?;
        error::finite("e_na", self.e_na)?;
        error::finite("e_k", self.e_k)?;
        error::finite("e_leak", self.e_leak)?;
        Ok(())
    }

    /// Returns the driving pulse for these parameters.
    #[must_use]
    pub fn pulse(&self) -> CurrentPulse {
        CurrentPulse {
            amplitude: self.current,
            start: PULSE_START,
            end: PULSE_END,
        }
    }
}

/// Returns the sample indices of the reported stimulus waveform on `grid`.
///
/// The window runs from the first sample at or after [`PULSE_START`] to the
/// first sample at or after [`PULSE_END`], so it covers `400..3000` on the
/// standard grid and follows the driving pulse on any other step.
#[must_use]
pub fn stimulus_window(grid: &TimeGrid) -> Range<usize> {
    grid.first_index_at_or_after(PULSE_START)..grid.first_index_at_or_after(PULSE_END)
}

/// Solver settings for the Hodgkin-Huxley integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HodgkinHuxleySettings {
    pub method: Method,
}

/// The result of a Hodgkin-Huxley simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HodgkinHuxleyTrajectory {
    grid: TimeGrid,
    stimulus: StimulusWaveform,
    potential: Vec<f64>,
    m: Vec<f64>,
    h: Vec<f64>,
    n: Vec<f64>,
    evaluations: u32,
}

impl HodgkinHuxleyTrajectory {
    #[must_use]
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Returns the display stimulus waveform.
    #[must_use]
    pub fn stimulus(&self) -> &StimulusWaveform {
        &self.stimulus
    }

    /// Returns the membrane potential, in mV.
    #[must_use]
    pub fn potential(&self) -> &[f64] {
        &self.potential
    }

    /// Returns the sodium activation `m`.
    #[must_use]
    pub fn m(&self) -> &[f64] {
        &self.m
    }

    /// Returns the sodium inactivation `h`.
    #[must_use]
    pub fn h(&self) -> &[f64] {
        &self.h
    }

    /// Returns the potassium activation `n`.
    #[must_use]
    pub fn n(&self) -> &[f64] {
        &self.n
    }

    /// Returns the number of derivative evaluations the solver made.
    #[must_use]
    pub fn evaluations(&self) -> u32 {
        self.evaluations
    }
}

/// Simulates the neuron on its standard grid (400 ms at 0.1 ms) with the
/// default solver.
///
/// # Errors
///
/// Returns [`Error::Domain`] if the parameters are invalid, or
/// [`Error::NumericalIntegration`] if the solver fails.
pub fn simulate(parameters: &HodgkinHuxleyParameters) -> Result<HodgkinHuxleyTrajectory, Error> {
    simulate_on(parameters, &TimeGrid::new(DURATION, DT)?)
}

/// Simulates the neuron on an explicit grid, in ms, with the default solver.
///
/// # Errors
///
/// See [`simulate`].
pub fn simulate_on(
    parameters: &HodgkinHuxleyParameters,
    grid: &TimeGrid,
) -> Result<HodgkinHuxleyTrajectory, Error> {
    simulate_with(parameters, grid, &HodgkinHuxleySettings::default())
}

/// Simulates the neuron on an explicit grid with the given solver settings.
///
/// # Errors
///
/// Returns [`Error::Domain`] if the parameters are invalid, or
/// [`Error::NumericalIntegration`] if the method is invalid, the solver
/// fails, or the result is not finite.
pub fn simulate_with(
    parameters: &HodgkinHuxleyParameters,
    grid: &TimeGrid,
    settings: &HodgkinHuxleySettings,
) -> Result<HodgkinHuxleyTrajectory, Error> {
    parameters.validate()?;

    let stimulus = StimulusWaveform::generate(grid, parameters.current, stimulus_window(grid));
    let membrane = Membrane {
        parameters,
        pulse: parameters.pulse(),
    };
    let initial = State {
        x: 0.0,
        y: INITIAL_STATE,
    };

    tracing::debug!(
        samples = grid.samples(),
        method = ?settings.method,
        "simulating Hodgkin-Huxley"
    );

    let solution = adaptive::solve(&membrane, &initial, grid, settings.method)?;

    let mut potential = Vec::with_capacity(grid.samples());
    let mut m = Vec::with_capacity(grid.samples());
    let mut h = Vec::with_capacity(grid.samples());
    let mut n = Vec::with_capacity(grid.samples());
    for State { y, .. } in &solution.samples {
        potential.push(y[0]);
        m.push(y[1]);
        h.push(y[2]);
        n.push(y[3]);
    }

    tracing::debug!(
        evaluations = solution.evaluations,
        "Hodgkin-Huxley finished"
    );

    Ok(HodgkinHuxleyTrajectory {
        grid: *grid,
        stimulus,
        potential,
        m,
        h,
        n,
        evaluations: solution.evaluations,
    })
}

/// The membrane and gating equations for one parameter set.
struct Membrane<'a> {
    parameters: &'a HodgkinHuxleyParameters,
    pulse: CurrentPulse,
}

impl Model for Membrane<'_> {
    type Input = State<4>;
    type Output = [f64; 4];
    type Error = Infallible;

    fn call(&self, input: &State<4>) -> Result<[f64; 4], Infallible> {
        let HodgkinHuxleyParameters {
            capacitance,
            g_na,
            g_k,
            g_leak,
            e_na,
            e_k,
            e_leak,
            ..
        } = *self.parameters;
        let [v, m, h, n] = input.y;
        let Ok(current) = self.pulse.call(&input.x);

        let sodium = g_na * m.powi(3) * h * (v - e_na);
        let potassium = g_k * n.powi(4) * (v - e_k);
        let leak = g_leak * (v - e_leak);

        Ok([
            (current - sodium - potassium - leak) / capacitance,
            rates::alpha_m(v) * (1.0 - m) - rates::beta_m(v) * m,
            rates::alpha_h(v) * (1.0 - h) - rates::beta_h(v) * h,
            rates::alpha_n(v) * (1.0 - n) - rates::beta_n(v) * n,
        ])
    }
}

impl Integratable<4> for Membrane<'_> {
    fn apply_state(_initial_conditions: &State<4>, state: State<4>) -> State<4> {
        state
    }

    fn extract_state(input: &State<4>) -> State<4> {
        *input
    }

    fn extract_derivative(output: &[f64; 4]) -> [f64; 4] {
        *output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;

    /// Counts upward crossings of 0 mV.
    fn count_spikes(potential: &[f64]) -> usize {
        potential
            .windows(2)
            .filter(|pair| pair[0] < 0.0 && pair[1] >= 0.0)
            .count()
    }

    #[test]
    fn standard_grid_has_4001_samples() {
        let trajectory = simulate(&HodgkinHuxleyParameters::default()).unwrap();

        assert_eq!(trajectory.potential().len(), 4001);
        assert_eq!(trajectory.m().len(), 4001);
        assert_eq!(trajectory.stimulus().len(), 4001);
        assert_eq!(trajectory.potential()[0], -65.0);
        assert_eq!(trajectory.n()[0], 0.32);
        assert!(trajectory.evaluations() > 0);
    }

    #[test]
    fn gating_variables_stay_in_unit_interval() {
        let trajectory = simulate(&HodgkinHuxleyParameters::default()).unwrap();

        for gate in [trajectory.m(), trajectory.h(), trajectory.n()] {
            assert!(gate.iter().all(|x| (0.0..=1.0).contains(x)));
        }
    }

    #[test]
    fn spikes_only_while_pulse_is_on() {
        let trajectory = simulate(&HodgkinHuxleyParameters::default()).unwrap();
        let potential = trajectory.potential();

        // Samples 0..=400 cover t <= 40 ms; 3100.. covers t >= 310 ms.
        assert_eq!(count_spikes(&potential[..=400]), 0);
        assert!(count_spikes(&potential[400..3000]) >= 5);
        assert_eq!(count_spikes(&potential[3100..]), 0);
    }

    #[test]
    fn quiet_without_current() {
        let parameters = HodgkinHuxleyParameters {
            current: 0.0,
            ..HodgkinHuxleyParameters::default()
        };
        let trajectory = simulate(&parameters).unwrap();

        assert_eq!(count_spikes(trajectory.potential()), 0);
        assert!(trajectory.potential().iter().all(|v| (-80.0..-55.0).contains(v)));
    }

    #[test]
    fn raised_potassium_reversal_integrates() {
        let parameters = HodgkinHuxleyParameters {
            e_k: -50.0,
            ..HodgkinHuxleyParameters::default()
        };
        let trajectory = simulate(&parameters).unwrap();

        assert_eq!(trajectory.potential().len(), 4001);
        assert!(trajectory.potential().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn every_corner_of_the_interactive_ranges_integrates() {
        let ranges: [(f64, f64); 7] = [
            (0.0, 7.0),
            (80.0, 160.0),
            (0.0, 70.0),
            (0.0, 1.0),
            (20.0, 80.0),
            (-100.0, -50.0),
            (-70.0, -40.0),
        ];

        for corner in 0..1_u32 << ranges.len() {
            let [current, g_na, g_k, g_leak, e_na, e_k, e_leak] = std::array::from_fn(|i| {
                let (low, high) = ranges[i];
                if corner >> i & 1 == 0 { low } else { high }
            });
            let parameters = HodgkinHuxleyParameters {
                current,
                g_na,
                g_k,
                g_leak,
                e_na,
                e_k,
                e_leak,
                ..HodgkinHuxleyParameters::default()
            };

            let trajectory = simulate(&parameters)
                .unwrap_or_else(|err| panic!("{parameters:?} failed: {err}"));

            assert_eq!(trajectory.potential().len(), 4001);
            assert!(trajectory.potential().iter().all(|v| v.is_finite()));
            for gate in [trajectory.m(), trajectory.h(), trajectory.n()] {
                assert!(
                    gate.iter().all(|x| (-1e-6..=1.0 + 1e-6).contains(x)),
                    "{parameters:?} left the unit interval"
                );
            }
        }
    }

    #[test]
    fn stimulus_window_follows_the_pulse_on_any_step() {
        let standard = TimeGrid::new(DURATION, DT).unwrap();
        assert_eq!(stimulus_window(&standard), 400..3000);

        let grid = TimeGrid::new(DURATION, 0.01).unwrap();
        assert_eq!(stimulus_window(&grid), 4000..30000);

        let parameters = HodgkinHuxleyParameters::default();
        let trajectory = simulate_on(&parameters, &grid).unwrap();
        let stimulus = trajectory.stimulus().values();

        assert_eq!(stimulus.len(), 40001);
        assert!(stimulus[..4000].iter().all(|&i| i == 0.0));
        assert!(stimulus[4000..30000].iter().all(|&i| i == parameters.current));
        assert!(stimulus[30000..].iter().all(|&i| i == 0.0));
    }

    #[test]
    fn high_order_method_agrees() {
        let parameters = HodgkinHuxleyParameters::default();
        let grid = TimeGrid::new(100.0, DT).unwrap();
        let settings = HodgkinHuxleySettings {
            method: Method::dop853(),
        };

        let dopri5 = simulate_on(&parameters, &grid).unwrap();
        let dop853 = simulate_with(&parameters, &grid, &settings).unwrap();

        for (a, b) in dopri5.potential().iter().zip(dop853.potential()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 2.0);
        }
    }

    #[test]
    fn fixed_step_method_runs_on_fine_grid() {
        let settings = HodgkinHuxleySettings {
            method: Method::Rk4,
        };
        let grid = TimeGrid::new(100.0, 0.01).unwrap();
        let trajectory =
            simulate_with(&HodgkinHuxleyParameters::default(), &grid, &settings).unwrap();

        assert_eq!(trajectory.potential().len(), 10001);
        assert!(count_spikes(trajectory.potential()) >= 3);
        for gate in [trajectory.m(), trajectory.h(), trajectory.n()] {
            assert!(gate.iter().all(|x| (0.0..=1.0).contains(x)));
        }
    }

    #[test]
    fn deterministic() {
        let parameters = HodgkinHuxleyParameters::default();

        assert_eq!(simulate(&parameters).unwrap(), simulate(&parameters).unwrap());
    }

    #[test]
    fn rejects_invalid_parameters() {
        let no_capacitance = HodgkinHuxleyParameters {
            capacitance: 0.0,
            ..HodgkinHuxleyParameters::default()
        };
        let negative_conductance = HodgkinHuxleyParameters {
            g_k: -36.0,
            ..HodgkinHuxleyParameters::default()
        };

        for parameters in [no_capacitance, negative_conductance] {
            assert!(matches!(simulate(&parameters), Err(Error::Domain(_))));
        }
    }

    #[test]
    fn invalid_method_is_a_numerical_error() {
        let settings = HodgkinHuxleySettings {
            method: Method::Dopri5 {
                abs_tol: 0.0,
                rel_tol: 1e-6,
            },
        };
        let grid = TimeGrid::new(10.0, DT).unwrap();
        let result = simulate_with(&HodgkinHuxleyParameters::default(), &grid, &settings);

        assert!(matches!(
            result,
            Err(Error::NumericalIntegration(adaptive::Error::InvalidMethod { .. }))
        ));
    }
}
