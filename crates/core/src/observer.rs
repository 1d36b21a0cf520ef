/// Receives solver events.
///
/// Solvers call [`Observer::observe`] after every sample they produce.
/// Observers record diagnostics, such as the sample indices at which a neuron
/// fired, and cannot alter the integration.
pub trait Observer<E> {
    /// Observes a solver event.
    fn observe(&mut self, event: &E);
}

/// Blanket implementation for observer closures.
impl<E, F> Observer<E> for F
where
    F: FnMut(&E),
{
    fn observe(&mut self, event: &E) {
        self(event);
    }
}

/// A no-op observer.
impl<E> Observer<E> for () {
    fn observe(&mut self, _event: &E) {}
}
