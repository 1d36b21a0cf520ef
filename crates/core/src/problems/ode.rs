use crate::{DerivativeOf, StepIntegrable};

/// Defines a fixed-step ODE problem over a model.
///
/// An ODE problem extracts a state from model input, computes derivatives from
/// model input and output, and rebuilds model input from an updated state.
/// This lets the fixed-step solvers integrate any neuron model whose state
/// implements [`StepIntegrable`].
pub trait OdeProblem {
    type Input;
    type Output;
    type Delta;
    type State: StepIntegrable<Self::Delta>;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Extracts the state from model input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the state cannot be extracted from the input.
    fn state(&self, input: &Self::Input) -> Result<Self::State, Self::Error>;

    /// Computes the derivative of the state from model input and output.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the derivative cannot be computed.
    fn derivative(
        &self,
        input: &Self::Input,
        output: &Self::Output,
    ) -> Result<DerivativeOf<Self::State, Self::Delta>, Self::Error>;

    /// Builds model input from a stepped state and the step size.
    ///
    /// `base` is the input the step started from; anything that is not part of
    /// the integrated state (sample index, elapsed time) is advanced here.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the input cannot be constructed from the state.
    fn build_input(
        &self,
        base: &Self::Input,
        state: &Self::State,
        delta: &Self::Delta,
    ) -> Result<Self::Input, Self::Error>;

    /// Finalizes input after an integration step.
    ///
    /// Called once per step, after [`OdeProblem::build_input`] and before the
    /// model is evaluated at the new sample. This is where discrete events
    /// happen: a threshold crossing resets the membrane potential, or a recovery
    /// variable jumps after a spike.
    ///
    /// The default implementation returns the input unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if finalization fails.
    fn finalize_step(
        &self,
        next_input: Self::Input,
        _prev_input: &Self::Input,
        _prev_output: &Self::Output,
        _step_delta: &Self::Delta,
    ) -> Result<Self::Input, Self::Error> {
        Ok(next_input)
    }
}
