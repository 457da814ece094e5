//! Bracket-then-bisect searches over monotone coverage functions.
//!
//! Both searches need the coverage function to be non-decreasing in the
//! search variable. They first grow an upper bound until it passes the target
//! (never beyond the hard maximum), then bisect down to the smallest passing
//! value. Running out of range yields [`SearchOutcome::Unattainable`].
//!
//! The `try_` variants accept fallible coverage functions (Monte Carlo
//! evaluations that can be cancelled, closed forms that can go non-finite)
//! and stop at the first error.

use core::convert::Infallible;

use crate::constants::{
    DEFAULT_P_FLOOR, DEFAULT_P_MAX, DEFAULT_P_TOLERANCE, INTEGER_BRACKET_MIN_HI,
    MAX_BISECTION_ITERATIONS, REAL_BRACKET_GROWTH, REAL_BRACKET_MIN_HI, REAL_BRACKET_NUDGE,
};
use crate::types::SearchOutcome;

/// Search range for an integer (trial count) search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerBracket {
    /// Theory-informed starting point for the upper bound.
    pub guess: u64,
    /// Smallest admissible value (1, or `O` for occurrence searches).
    pub lower: u64,
    /// Hard cap; the upper bound never grows past it.
    pub max: u64,
}

impl IntegerBracket {
    /// Bracket over `[lower, max]` starting from `guess`.
    pub fn new(guess: u64, lower: u64, max: u64) -> Self {
        Self {
            guess,
            lower: lower.max(1),
            max,
        }
    }
}

/// Search range for a real (probability) search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealBracket {
    /// Theory-informed starting point for the upper bound.
    pub guess: f64,
    /// The lower bound never starts below this.
    pub floor: f64,
    /// Hard cap; the upper bound never grows past it.
    pub max: f64,
    /// Geometric growth factor of the upper bound.
    pub growth: f64,
    /// Bisection stops once `hi - lo` is at most this.
    pub tolerance: f64,
}

impl RealBracket {
    /// Bracket starting from `guess` with the default floor, cap, growth and
    /// tolerance.
    pub fn new(guess: f64) -> Self {
        Self {
            guess,
            floor: DEFAULT_P_FLOOR,
            max: DEFAULT_P_MAX,
            growth: REAL_BRACKET_GROWTH,
            tolerance: DEFAULT_P_TOLERANCE,
        }
    }

    /// Set the hard cap.
    pub fn max(mut self, max: f64) -> Self {
        self.max = max;
        self
    }

    /// Set the floor of the initial lower bound.
    pub fn floor(mut self, floor: f64) -> Self {
        self.floor = floor;
        self
    }

    /// Set the bisection tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Smallest integer in range whose coverage reaches `target`.
///
/// # Example
///
/// ```
/// use saturation_core::search::{find_min_integer, IntegerBracket};
/// use saturation_core::SearchOutcome;
///
/// let found = find_min_integer(0.5, IntegerBracket::new(4, 1, 100), |n| n as f64 / 40.0);
/// assert_eq!(found, SearchOutcome::Found(20));
///
/// let capped = find_min_integer(0.5, IntegerBracket::new(4, 1, 10), |n| n as f64 / 40.0);
/// assert_eq!(capped, SearchOutcome::Unattainable { limit: 10 });
/// ```
pub fn find_min_integer<F>(target: f64, bracket: IntegerBracket, mut coverage: F) -> SearchOutcome<u64>
where
    F: FnMut(u64) -> f64,
{
    match try_find_min_integer(target, bracket, |n| Ok::<_, Infallible>(coverage(n))) {
        Ok(outcome) => outcome,
        Err(never) => match never {},
    }
}

/// Fallible form of [`find_min_integer`].
pub fn try_find_min_integer<F, E>(
    target: f64,
    bracket: IntegerBracket,
    mut coverage: F,
) -> Result<SearchOutcome<u64>, E>
where
    F: FnMut(u64) -> Result<f64, E>,
{
    let IntegerBracket { guess, lower, max } = bracket;
    if max < lower {
        return Ok(SearchOutcome::Unattainable { limit: max });
    }

    let mut lo = lower;
    let mut hi = guess.max(INTEGER_BRACKET_MIN_HI).max(lower).min(max);
    let mut cov = coverage(hi)?;
    while cov < target && hi < max {
        lo = hi + 1;
        hi = hi.saturating_mul(2).min(max);
        cov = coverage(hi)?;
    }
    if cov < target {
        return Ok(SearchOutcome::Unattainable { limit: hi });
    }

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if coverage(mid)? >= target {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Ok(SearchOutcome::Found(lo))
}

/// Smallest real in range whose coverage reaches `target`, to within the
/// bracket tolerance. Returns the passing (upper) end of the final bracket.
///
/// The lower end starts at `guess / 2` (at least the floor) and is taken to
/// fail without being evaluated. The result is only minimal when
/// `coverage(lo) < target` holds there; otherwise it is a passing value
/// within the tolerance of that lower end.
///
/// # Example
///
/// ```
/// use saturation_core::search::{find_min_real, RealBracket};
///
/// let p = find_min_real(0.5, RealBracket::new(0.01), |p| p / 0.3).found().unwrap();
/// assert!(p >= 0.15 && p - 0.15 <= 1e-4);
/// ```
pub fn find_min_real<F>(target: f64, bracket: RealBracket, mut coverage: F) -> SearchOutcome<f64>
where
    F: FnMut(f64) -> f64,
{
    match try_find_min_real(target, bracket, |p| Ok::<_, Infallible>(coverage(p))) {
        Ok(outcome) => outcome,
        Err(never) => match never {},
    }
}

/// Fallible form of [`find_min_real`], with the same lower-end contract.
pub fn try_find_min_real<F, E>(
    target: f64,
    bracket: RealBracket,
    mut coverage: F,
) -> Result<SearchOutcome<f64>, E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let RealBracket {
        guess,
        floor,
        max,
        growth,
        tolerance,
    } = bracket;

    let mut lo = (guess / 2.0).max(floor).min(max);
    let mut hi = guess.max(REAL_BRACKET_MIN_HI).min(max);
    let mut cov = coverage(hi)?;
    while cov < target && hi < max {
        lo = hi;
        hi = (hi * growth + REAL_BRACKET_NUDGE).min(max);
        cov = coverage(hi)?;
    }
    if cov < target {
        return Ok(SearchOutcome::Unattainable { limit: hi });
    }

    let mut iterations = 0;
    while hi - lo > tolerance && iterations < MAX_BISECTION_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if coverage(mid)? >= target {
            hi = mid;
        } else {
            lo = mid;
        }
        iterations += 1;
    }
    Ok(SearchOutcome::Found(hi))
}
