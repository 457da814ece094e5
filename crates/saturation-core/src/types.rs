//! Common types shared by the models, searches and estimators.

use serde::{Deserialize, Serialize};

use crate::constants::{Z_90, Z_95, Z_99};
use crate::error::{Error, Result};
use crate::statistics::normal_quantile;

/// Identifier of a theme (a category of the token distribution).
pub type ThemeId = u32;

/// A confidence level expressed as a percentage in the open interval (0, 100).
///
/// # Example
///
/// ```
/// use saturation_core::Confidence;
///
/// let c = Confidence::new(95.0).unwrap();
/// assert!((c.fraction() - 0.95).abs() < 1e-12);
/// assert!((c.z_score() - 1.96).abs() < 1e-3);
/// assert!(Confidence::new(100.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Validate and wrap a percentage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] unless `0 < percent < 100`.
    pub fn new(percent: f64) -> Result<Self> {
        if percent > 0.0 && percent < 100.0 {
            Ok(Self(percent))
        } else {
            Err(Error::InvalidInput {
                parameter: "C",
                reason: "must be in (0, 100)",
            })
        }
    }

    /// The level as a percentage, e.g. `95.0`.
    #[inline]
    pub fn percent(self) -> f64 {
        self.0
    }

    /// The level as a fraction, e.g. `0.95`.
    #[inline]
    pub fn fraction(self) -> f64 {
        self.0 / 100.0
    }

    /// The tolerated failure probability `1 − C/100`.
    #[inline]
    pub fn miss_probability(self) -> f64 {
        1.0 - self.fraction()
    }

    /// Two-sided standard normal quantile `z` with `P(|Z| ≤ z) = C/100`.
    ///
    /// The common levels 90/95/99 return tabulated constants; other levels
    /// invert the normal CDF numerically.
    pub fn z_score(self) -> f64 {
        if self.0 == 90.0 {
            Z_90
        } else if self.0 == 95.0 {
            Z_95
        } else if self.0 == 99.0 {
            Z_99
        } else {
            normal_quantile(0.5 + self.fraction() / 2.0)
        }
    }
}

impl TryFrom<f64> for Confidence {
    type Error = Error;

    fn try_from(percent: f64) -> Result<Self> {
        Self::new(percent)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> f64 {
        c.0
    }
}

impl core::fmt::Display for Confidence {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Terminal result of a bounded search.
///
/// `Unattainable` means the search exhausted its range without meeting the
/// target. It is distinct from both a numeric answer and from invalid input,
/// which surfaces as an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SearchOutcome<T> {
    /// Smallest value in range satisfying the target.
    Found(T),
    /// No value up to `limit` satisfies the target.
    Unattainable {
        /// The largest value examined.
        limit: T,
    },
}

impl<T> SearchOutcome<T> {
    /// The found value, if any.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Unattainable { .. } => None,
        }
    }

    /// Whether the search met its target.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Whether the search ran out of range.
    pub fn is_unattainable(&self) -> bool {
        matches!(self, Self::Unattainable { .. })
    }

    /// Map both the found value and the limit.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> SearchOutcome<U> {
        match self {
            Self::Found(value) => SearchOutcome::Found(f(value)),
            Self::Unattainable { limit } => SearchOutcome::Unattainable { limit: f(limit) },
        }
    }
}
