/// A callable model that maps a typed input to a typed output.
///
/// Models must be deterministic, always producing the same result for a given
/// input. Neuron models turn the current state and drive into state
/// derivatives.
pub trait Model {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Calls the model with the given input.
    ///
    /// # Errors
    ///
    /// Each model defines its own `Error` type to represent domain-specific failures.
    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// A captured input/output pair from a model call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot<I, O> {
    pub input: I,
    pub output: O,
}

impl<I, O> Snapshot<I, O> {
    /// Creates a new snapshot from input and output values.
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    /// Passive membrane: dV/dt = -(V - rest) / tau.
    struct PassiveMembrane {
        rest: f64,
        tau: f64,
    }

    impl Model for PassiveMembrane {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, potential: &f64) -> Result<f64, Infallible> {
            Ok(-(potential - self.rest) / self.tau)
        }
    }

    #[test]
    fn model_is_deterministic() {
        let model = PassiveMembrane {
            rest: -65.0,
            tau: 10.0,
        };

        let first = model.call(&-55.0).unwrap();
        let second = model.call(&-55.0).unwrap();

        assert_eq!(first.to_bits(), second.to_bits());
        assert_eq!(first, -1.0);
    }

    #[test]
    fn snapshot_keeps_input_and_output() {
        let model = PassiveMembrane {
            rest: -65.0,
            tau: 5.0,
        };
        let output = model.call(&-75.0).unwrap();

        let snapshot = Snapshot::new(-75.0, output);

        assert_eq!(snapshot.input, -75.0);
        assert_eq!(snapshot.output, 2.0);
    }
}
