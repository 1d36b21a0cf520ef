use serde::{Deserialize, Serialize};

/// Default absolute tolerance for the adaptive methods.
pub const DEFAULT_ABS_TOL: f64 = 1e-8;

/// Default relative tolerance for the adaptive methods.
pub const DEFAULT_REL_TOL: f64 = 1e-6;

/// Supported Runge–Kutta methods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum Method {
    /// Classic fixed-step 4th-order Runge–Kutta, stepping once per grid
    /// sample.
    Rk4,

    /// Adaptive Dormand–Prince 5(4).
    ///
    /// Chooses its own internal steps to keep the local error within
    /// `abs_tol + rel_tol * |y|`. The default method.
    Dopri5 { abs_tol: f64, rel_tol: f64 },

    /// Adaptive Dormand–Prince 8(5,3).
    ///
    /// Higher order than [`Method::Dopri5`]; fewer, more expensive steps.
    Dop853 { abs_tol: f64, rel_tol: f64 },
}

impl Default for Method {
    fn default() -> Self {
        Self::Dopri5 {
            abs_tol: DEFAULT_ABS_TOL,
            rel_tol: DEFAULT_REL_TOL,
        }
    }
}

impl Method {
    /// Returns [`Method::Dop853`] with the default tolerances.
    #[must_use]
    pub fn dop853() -> Self {
        Self::Dop853 {
            abs_tol: DEFAULT_ABS_TOL,
            rel_tol: DEFAULT_REL_TOL,
        }
    }

    /// Checks that the tolerances are finite and positive.
    ///
    /// # Errors
    ///
    /// Returns a description of the first offending tolerance.
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            Self::Rk4 => Ok(()),
            Self::Dopri5 { abs_tol, rel_tol } | Self::Dop853 { abs_tol, rel_tol } => {
                check_tolerance("abs_tol", abs_tol)?;
                check_tolerance("rel_tol", rel_tol)
            }
        }
    }
}

fn check_tolerance(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("{name} must be finite and positive, got {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_dopri5() {
        assert_eq!(
            Method::default(),
            Method::Dopri5 {
                abs_tol: 1e-8,
                rel_tol: 1e-6,
            }
        );
        assert!(Method::default().validate().is_ok());
    }

    #[test]
    fn rk4_has_nothing_to_validate() {
        assert!(Method::Rk4.validate().is_ok());
    }

    #[test]
    fn rejects_bad_tolerances() {
        let zero = Method::Dop853 {
            abs_tol: 1e-8,
            rel_tol: 0.0,
        };
        let nan = Method::Dopri5 {
            abs_tol: f64::NAN,
            rel_tol: 1e-6,
        };

        assert!(zero.validate().unwrap_err().contains("rel_tol"));
        assert!(nan.validate().unwrap_err().contains("abs_tol"));
    }
}
