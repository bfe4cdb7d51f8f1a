//! Error types for Black-76 pricing and IV solving

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum B76Error {
    /// A model parameter is not strictly positive (or not finite)
    #[error("Domain error: {parameter} must be finite and > 0, got {value}")]
    Domain { parameter: &'static str, value: f64 },

    /// Bisection hit its iteration cap without meeting the price tolerance
    #[error("IV solver did not converge after {iterations} iterations (residual: {residual:.2e}, last vol: {last_vol:.6})")]
    NonConvergence {
        iterations: u32,
        residual: f64,
        last_vol: f64,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type B76Result<T> = Result<T, B76Error>;

impl B76Error {
    pub fn domain(parameter: &'static str, value: f64) -> Self {
        Self::Domain { parameter, value }
    }

    pub fn non_convergence(iterations: u32, residual: f64, last_vol: f64) -> Self {
        Self::NonConvergence {
            iterations,
            residual,
            last_vol,
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// True for the solver's non-convergent marker
    pub fn is_non_convergence(&self) -> bool {
        matches!(self, Self::NonConvergence { .. })
    }
}

/// Require `value` to be finite and strictly positive
pub(crate) fn ensure_positive(parameter: &'static str, value: f64) -> B76Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(B76Error::domain(parameter, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = B76Error::non_convergence(100, 1.5e-3, 499.9);
        assert!(err.to_string().contains("100 iterations"));
        assert!(err.is_non_convergence());

        let err = B76Error::domain("sigma", 0.0);
        assert!(err.to_string().contains("sigma"));
        assert!(!err.is_non_convergence());
    }

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("strike", 100.0).is_ok());
        assert_eq!(
            ensure_positive("strike", 0.0),
            Err(B76Error::domain("strike", 0.0))
        );
        assert!(ensure_positive("time", -1.0).is_err());
        assert!(ensure_positive("forward", f64::NAN).is_err());
        assert!(ensure_positive("forward", f64::INFINITY).is_err());
    }
}
