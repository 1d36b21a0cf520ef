use neurosim_core::TimeGridError;
use neurosim_solvers::transient::{adaptive, euler};
use thiserror::Error;

/// A model parameter outside its valid domain.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum DomainError {
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },
}

/// Errors returned by the `simulate` functions.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    Domain(#[from] DomainError),

    #[error("invalid time grid: {0}")]
    Grid(#[from] TimeGridError),

    #[error("integration failed: {0}")]
    Integration(#[from] euler::Error),

    #[error("numerical integration failed: {0}")]
    NumericalIntegration(#[from] adaptive::Error),
}

/// Checks that `value` is finite.
pub(crate) fn finite(name: &'static str, value: f64) -> Result<f64, DomainError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::NonFinite { name, value })
    }
}

/// Checks that `value` is finite and strictly positive.
pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64, DomainError> {
    if finite(name, value)? > 0.0 {
        Ok(value)
    } else {
        Err(DomainError::NonPositive { name, value })
    }
}

/// Checks that `value` is finite and not negative.
pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<f64, DomainError> {
    if finite(name, value)? >= 0.0 {
        Ok(value)
    } else {
        Err(DomainError::Negative { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_rejects_nan_and_infinity() {
        assert_eq!(finite("a", 0.02), Ok(0.02));
        assert!(matches!(
            finite("a", f64::NAN),
            Err(DomainError::NonFinite { name: "a", .. })
        ));
        assert!(matches!(
            finite("a", f64::NEG_INFINITY),
            Err(DomainError::NonFinite { .. })
        ));
    }

    #[test]
    fn positive_rejects_zero() {
        assert_eq!(positive("tau", 12.5), Ok(12.5));
        assert_eq!(
            positive("tau", 0.0),
            Err(DomainError::NonPositive {
                name: "tau",
                value: 0.0
            })
        );
        assert!(matches!(
            positive("tau", f64::NAN),
            Err(DomainError::NonFinite { .. })
        ));
    }

    #[test]
    fn non_negative_accepts_zero() {
        assert_eq!(non_negative("g_leak", 0.0), Ok(0.0));
        assert_eq!(
            non_negative("g_leak", -0.3),
            Err(DomainError::Negative {
                name: "g_leak",
                value: -0.3
            })
        );
    }

    #[test]
    fn messages_name_the_parameter() {
        let err = Error::from(DomainError::NonPositive {
            name: "capacitance",
            value: -1.0,
        });

        assert_eq!(
            err.to_string(),
            "invalid parameter: capacitance must be positive, got -1"
        );
    }
}
