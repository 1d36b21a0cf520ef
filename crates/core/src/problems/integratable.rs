use crate::Model;

/// A trait for models that represent systems of ordinary differential
/// equations with `N` state variables.
///
/// This trait lets a [`Model`] be integrated by a general-purpose vector ODE
/// solver (adaptive Runge–Kutta) by converting between the solver's
/// [`State<N>`] and the model's input/output types. Unlike [`OdeProblem`],
/// the solver is free to evaluate the model at any time, not only on the
/// output grid.
///
/// [`OdeProblem`]: crate::OdeProblem
pub trait Integratable<const N: usize>: Model {
    /// Constructs the model's input by applying the given solver state to
    /// the provided initial conditions.
    ///
    /// Called for every derivative evaluation.
    fn apply_state(initial_conditions: &Self::Input, state: State<N>) -> Self::Input;

    /// Extracts the solver state from the model's input.
    ///
    /// Called once at the start of integration to determine initial values.
    fn extract_state(input: &Self::Input) -> State<N>;

    /// Extracts the state derivatives from the model's output.
    ///
    /// The returned array must align with the order of `y` in [`State`].
    fn extract_derivative(output: &Self::Output) -> [f64; N];
}

/// The state of an ODE system at a given point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State<const N: usize> {
    /// The independent variable (time).
    pub x: f64,

    /// The dependent variables at this point.
    ///
    /// The order of values must match the derivative array returned by
    /// [`Integratable::extract_derivative`].
    pub y: [f64; N],
}

impl<const N: usize> State<N> {
    /// Returns `true` if every dependent variable is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.y.iter().all(|value| value.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_state() {
        let state = State {
            x: 0.0,
            y: [-65.0, 0.05, 0.6, 0.32],
        };

        assert!(state.is_finite());
    }

    #[test]
    fn nan_or_infinity_is_not_finite() {
        let nan = State {
            x: 1.0,
            y: [f64::NAN, 0.1],
        };
        let inf = State {
            x: 1.0,
            y: [0.1, f64::INFINITY],
        };

        assert!(!nan.is_finite());
        assert!(!inf.is_finite());
    }
}
