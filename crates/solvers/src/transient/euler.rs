//! Forward Euler solver for fixed-step neuron models.
//!
//! Steps a model forward with explicit Euler:
//!
//! ```text
//! state_{n+1} = state_n + derivative_n * dt
//! ```
//!
//! After each step the problem's [`OdeProblem::finalize_step`] hook runs
//! before the model is evaluated at the new sample. Integrate-and-fire style
//! models use it to apply threshold resets, so the solver itself never needs
//! to know about spikes.
//!
//! # Example
//!
//! ```ignore
//! use neurosim_solvers::transient::euler;
//!
//! let solution = euler::solve_unobserved(&neuron, &neuron, initial, dt, grid.steps())?;
//!
//! for snapshot in &solution.history {
//!     println!("{:?}", snapshot.input);
//! }
//! ```

mod error;
mod event;
mod solution;

pub use error::Error;
pub use event::Event;
pub use solution::Solution;

use neurosim_core::{Model, Observer, OdeProblem, Snapshot, StepIntegrable};

/// Integrates an ODE problem using forward Euler.
///
/// # Algorithm
///
/// 1. Call the model with the initial input to get the initial snapshot.
/// 2. For each of the `steps` steps:
///    - Extract the state from the current input.
///    - Compute the derivative from the current input and output.
///    - Step the state forward: `state + derivative * dt`.
///    - Build the next input from the stepped state.
///    - Finalize the step (threshold resets, recovery jumps).
///    - Call the model to get the next output.
///    - Emit an [`Event`] to the observer.
/// 3. Return the solution with the full history of `steps + 1` snapshots.
///
/// # Errors
///
/// Returns an error if the model or problem returns an error at any point.
pub fn solve<M, P, Obs>(
    model: &M,
    problem: &P,
    initial: M::Input,
    dt: P::Delta,
    steps: usize,
    mut observer: Obs,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    M::Input: Clone,
    M::Output: Clone,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
    P::Delta: Clone,
    Obs: Observer<Event<M::Input, M::Output>>,
{
    tracing::trace!(steps, "starting forward Euler integration");

    let initial_output = model.call(&initial).map_err(Error::model)?;
    let initial_snapshot = Snapshot::new(initial, initial_output);

    let mut history = Vec::with_capacity(steps + 1);
    history.push(initial_snapshot.clone());

    observer.observe(&Event {
        step: 0,
        snapshot: initial_snapshot,
    });

    for step in 1..=steps {
        let current = &history[step - 1];

        let state = problem.state(&current.input).map_err(Error::problem)?;
        let derivative = problem
            .derivative(&current.input, &current.output)
            .map_err(Error::problem)?;
        let next_state = state.step(derivative, dt.clone());

        let next_input = problem
            .build_input(&current.input, &next_state, &dt)
            .map_err(Error::problem)?;
        let next_input = problem
            .finalize_step(next_input, &current.input, &current.output, &dt)
            .map_err(Error::problem)?;

        let next_output = model.call(&next_input).map_err(Error::model)?;
        let next_snapshot = Snapshot::new(next_input, next_output);

        observer.observe(&Event {
            step,
            snapshot: next_snapshot.clone(),
        });
        history.push(next_snapshot);
    }

    tracing::trace!(steps, "forward Euler integration finished");

    Ok(Solution { history, steps })
}

/// Integrates an ODE problem using forward Euler without observation.
///
/// This is a convenience wrapper around [`solve`] that discards events.
///
/// # Errors
///
/// Returns an error if the model or problem returns an error at any point.
pub fn solve_unobserved<M, P>(
    model: &M,
    problem: &P,
    initial: M::Input,
    dt: P::Delta,
    steps: usize,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    M::Input: Clone,
    M::Output: Clone,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
    P::Delta: Clone,
{
    solve(model, problem, initial, dt, steps, ())
}
