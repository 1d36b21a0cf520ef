use neurosim_core::State;

/// The result of an adaptive integration.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<const N: usize> {
    /// One state per grid sample, starting with the initial condition.
    pub samples: Vec<State<N>>,

    /// Number of times the model was evaluated.
    pub evaluations: u32,
}

impl<const N: usize> Solution<N> {
    /// Returns the values of state variable `index` across all samples.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    pub fn component(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(move |state| state.y[index])
    }
}
