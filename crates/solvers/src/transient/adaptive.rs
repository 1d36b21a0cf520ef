//! General-purpose Runge–Kutta integration on a time grid.
//!
//! Wraps the `ode_solvers` steppers (fixed-step Rk4, adaptive Dopri5 and
//! Dop853) for any model implementing [`Integratable`]. The steppers choose
//! their own internal steps, so the solver is free to evaluate the model at
//! off-grid times. Their output is resampled onto the requested [`TimeGrid`]:
//! the returned solution always holds exactly one state per grid sample.

mod error;
mod method;
mod solution;

pub use error::Error;
pub use method::Method;
pub use solution::Solution;

use std::{cell::RefCell, rc::Rc};

use neurosim_core::{Integratable, State, TimeGrid};
use ode_solvers::{SVector, System, dop_shared::OutputType};

/// Fraction of the grid step within which a solver output is matched to a
/// grid sample.
const SAMPLE_TOLERANCE: f64 = 1e-6;

/// Step budget for the adaptive steppers.
///
/// Runaway but finite trajectories are stability limited and can need tens
/// of thousands of steps across a grid.
const MAX_STEPS: u32 = 1_000_000;

/// Interval of the steppers' stiffness test.
///
/// Set so the test never runs. A stiff but solvable problem is integrated
/// with small steps until the tolerance or the step budget gives out.
const STIFFNESS_CHECK_INTERVAL: u32 = u32::MAX;

/// Integrates `component` from its initial conditions across `grid`.
///
/// The integration runs from the initial conditions' `x` to half a step past
/// the end of the grid, so the final sample is always produced by the
/// stepper's regular output rather than by a truncated last step.
///
/// # Errors
///
/// - [`Error::InvalidMethod`] if the method's tolerances are not usable.
/// - [`Error::Integration`] if the stepper fails (step size underflow or step
///   budget exhausted).
/// - [`Error::Model`] if a model call fails.
/// - [`Error::MissingSample`] if no stepper output lines up with a grid time.
/// - [`Error::NonFinite`] if any resampled state is NaN or infinite.
pub fn solve<C, const N: usize>(
    component: &C,
    initial_conditions: &C::Input,
    grid: &TimeGrid,
    method: Method,
) -> Result<Solution<N>, Error>
where
    C: Integratable<N>,
{
    method
        .validate()
        .map_err(|reason| Error::InvalidMethod { reason })?;

    let initial = C::extract_state(initial_conditions);
    let x_start = initial.x;
    let x_end = x_start + grid.end() + 0.5 * grid.dt();
    let dx = grid.dt();
    let y_start: SVector<f64, N> = initial.y.into();

    let model_error = Rc::new(RefCell::new(None));
    let system = OdeSystem {
        component,
        initial_conditions,
        model_error: Rc::clone(&model_error),
    };

    let integrated = match method {
        Method::Rk4 => {
            let mut stepper = ode_solvers::Rk4::new(system, x_start, y_start, x_end, dx);
            stepper.integrate().map(|stats| {
                let x_out = stepper.x_out().clone();
                let y_out = stepper.y_out().clone();
                (stats.num_eval, x_out, y_out)
            })
        }
        Method::Dopri5 { abs_tol, rel_tol } => {
            let mut stepper = ode_solvers::Dopri5::from_param(
                system,
                x_start,
                x_end,
                dx,
                y_start,
                rel_tol,
                abs_tol,
                0.9,
                0.04,
                0.2,
                10.0,
                x_end - x_start,
                0.0,
                MAX_STEPS,
                STIFFNESS_CHECK_INTERVAL,
                OutputType::Dense,
            );
            stepper.integrate().map(|stats| {
                let x_out = stepper.x_out().clone();
                let y_out = stepper.y_out().clone();
                (stats.num_eval, x_out, y_out)
            })
        }
        Method::Dop853 { abs_tol, rel_tol } => {
            let mut stepper = ode_solvers::Dop853::from_param(
                system,
                x_start,
                x_end,
                dx,
                y_start,
                rel_tol,
                abs_tol,
                0.9,
                0.0,
                0.333,
                6.0,
                x_end - x_start,
                0.0,
                MAX_STEPS,
                STIFFNESS_CHECK_INTERVAL,
                OutputType::Dense,
            );
            stepper.integrate().map(|stats| {
                let x_out = stepper.x_out().clone();
                let y_out = stepper.y_out().clone();
                (stats.num_eval, x_out, y_out)
            })
        }
    };

    // A failed model call poisons the derivative with NaN, which usually
    // makes the stepper fail too. Report the model error first.
    if let Some(err) = model_error.borrow_mut().take() {
        return Err(Error::Model(Box::new(err)));
    }
    let (evaluations, x_out, y_out) = integrated?;

    let outputs = x_out.into_iter().zip(y_out.into_iter().map(<[f64; N]>::from));
    let samples = resample(initial, outputs, grid)?;

    tracing::debug!(
        ?method,
        samples = samples.len(),
        evaluations,
        "adaptive integration finished"
    );

    Ok(Solution {
        samples,
        evaluations,
    })
}

/// Picks the stepper output matching each grid time.
///
/// Sample 0 is the initial condition itself. Later samples are matched in
/// order; outputs that fall between grid times (or repeat the initial point)
/// are skipped.
fn resample<const N: usize>(
    initial: State<N>,
    mut outputs: impl Iterator<Item = (f64, [f64; N])>,
    grid: &TimeGrid,
) -> Result<Vec<State<N>>, Error> {
    let tolerance = SAMPLE_TOLERANCE * grid.dt();

    let mut samples = Vec::with_capacity(grid.samples());
    samples.push(initial);

    for index in 1..grid.samples() {
        let time = initial.x + grid.time(index);
        let (_, y) = outputs
            .by_ref()
            .find(|(x, _)| (x - time).abs() <= tolerance)
            .ok_or(Error::MissingSample { time })?;
        samples.push(State { x: time, y });
    }

    if let Some(state) = samples.iter().find(|state| !state.is_finite()) {
        return Err(Error::NonFinite { time: state.x });
    }

    Ok(samples)
}

/// Adapts an [`Integratable`] model into an `ode_solvers` system.
struct OdeSystem<'a, C: Integratable<N>, const N: usize> {
    component: &'a C,
    initial_conditions: &'a C::Input,
    model_error: Rc<RefCell<Option<C::Error>>>,
}

impl<C: Integratable<N>, const N: usize> System<f64, SVector<f64, N>> for OdeSystem<'_, C, N> {
    fn system(&self, x: f64, y: &SVector<f64, N>, dy: &mut SVector<f64, N>) {
        let state = State { x, y: (*y).into() };
        let input = C::apply_state(self.initial_conditions, state);

        match self.component.call(&input) {
            Ok(output) => {
                let derivative = C::extract_derivative(&output);
                *dy = SVector::from_row_slice(&derivative);
            }
            Err(err) => {
                *self.model_error.borrow_mut() = Some(err);
                *dy = SVector::from_element(f64::NAN);
            }
        }
    }

    fn solout(&mut self, _x: f64, _y: &SVector<f64, N>, _dy: &SVector<f64, N>) -> bool {
        // Stop integration early if a model call failed.
        self.model_error.borrow().is_some()
    }
}
