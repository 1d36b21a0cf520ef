use neurosim_core::Snapshot;

/// The result of an Euler integration.
#[derive(Debug, Clone)]
pub struct Solution<I, O> {
    /// Snapshots of every sample, starting with the initial condition.
    pub history: Vec<Snapshot<I, O>>,

    /// Number of integration steps completed.
    pub steps: usize,
}

impl<I, O> Solution<I, O> {
    /// Returns an iterator over the model inputs of every sample.
    pub fn inputs(&self) -> impl Iterator<Item = &I> {
        self.history.iter().map(|snapshot| &snapshot.input)
    }
}
