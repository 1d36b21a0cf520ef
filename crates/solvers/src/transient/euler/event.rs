use neurosim_core::Snapshot;

/// Event emitted by the Euler solver for each sample.
///
/// Step 0 is the initial condition. Steps `1..=N` are emitted after each
/// integration step, once the finalize hook has run, so an observer sees the
/// sample exactly as it will appear in the history.
#[derive(Debug, Clone)]
pub struct Event<I, O> {
    /// The sample index (0 for the initial condition).
    pub step: usize,

    /// Snapshot of the model input and output at this sample.
    pub snapshot: Snapshot<I, O>,
}
