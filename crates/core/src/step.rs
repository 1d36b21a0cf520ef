/// A trait for state types that can be stepped using their derivative.
///
/// Implementing this trait enables the fixed-step solvers to advance the type
/// via `state + derivative * delta`. `Delta` is the independent variable step;
/// it can be a plain `f64` (milliseconds, dimensionless model time) or a
/// dimensioned `uom::si::f64::Time` for compile-time unit checking.
pub trait StepIntegrable<Delta> {
    /// The derivative of the type with respect to `Delta`.
    type Derivative;

    /// Returns the value after stepping with a derivative and step size.
    #[must_use]
    fn step(&self, derivative: Self::Derivative, delta: Delta) -> Self;
}

/// Type alias for the derivative of a `StepIntegrable` type.
///
/// This is a convenience for accessing the [`StepIntegrable::Derivative`]
/// associated type without writing out the fully qualified syntax.
pub type DerivativeOf<T, Delta> = <T as StepIntegrable<Delta>>::Derivative;
