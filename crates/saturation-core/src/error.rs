//! Error type for the closed-form models and estimators.

use thiserror::Error;

/// Errors raised by the numeric core.
///
/// A search that runs out of room is not an error: it reports
/// [`SearchOutcome::Unattainable`](crate::types::SearchOutcome::Unattainable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A parameter lies outside its mathematical domain.
    #[error("invalid input: {parameter} {reason}")]
    InvalidInput {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// What the parameter must satisfy.
        reason: &'static str,
    },

    /// An intermediate value became NaN or infinite.
    #[error("numerically unstable: {0}")]
    NumericallyUnstable(&'static str),
}

impl Error {
    pub(crate) const fn invalid(parameter: &'static str, reason: &'static str) -> Self {
        Self::InvalidInput { parameter, reason }
    }
}

/// Result alias for the numeric core.
pub type Result<T> = core::result::Result<T, Error>;

/// Validate a per-trial probability in the open interval (0, 1).
pub(crate) fn check_probability(p: f64) -> Result<()> {
    if p > 0.0 && p < 1.0 {
        Ok(())
    } else {
        Err(Error::invalid("p", "must be in (0, 1)"))
    }
}

/// Validate a probability in the closed interval [0, 1].
pub(crate) fn check_unit_interval(p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(Error::invalid("p", "must be in [0, 1]"))
    }
}

/// Validate that an intermediate value is finite.
#[inline]
pub(crate) fn check_finite(x: f64, what: &'static str) -> Result<f64> {
    if x.is_finite() {
        Ok(x)
    } else {
        Err(Error::NumericallyUnstable(what))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_display() {
        let err = Error::invalid("p", "must be in (0, 1)");
        assert_eq!(err.to_string(), "invalid input: p must be in (0, 1)");

        let err = Error::NumericallyUnstable("binomial pmf");
        assert_eq!(err.to_string(), "numerically unstable: binomial pmf");
    }

    #[test]
    fn test_probability_checks() {
        assert!(check_probability(0.5).is_ok());
        assert!(check_probability(0.0).is_err());
        assert!(check_probability(1.0).is_err());
        assert!(check_probability(f64::NAN).is_err());

        assert!(check_unit_interval(0.0).is_ok());
        assert!(check_unit_interval(1.0).is_ok());
        assert!(check_unit_interval(1.5).is_err());
    }

    #[test]
    fn test_check_finite() {
        assert_eq!(check_finite(1.5, "x"), Ok(1.5));
        assert_eq!(
            check_finite(f64::INFINITY, "x"),
            Err(Error::NumericallyUnstable("x"))
        );
    }
}
