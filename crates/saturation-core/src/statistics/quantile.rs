//! Quantiles using the inverse empirical CDF (Hyndman & Fan Type 1).
//!
//! For a sample of size `n` at probability `q`:
//! ```text
//! idx = max(0, ceil(n * q) - 1)
//! Q(q) = x_sorted[idx]
//! ```
//!
//! No averaging is done at discontinuities, so the quantile of a sample of
//! trial counts is always one of the observed counts. A coverage requirement
//! "at least C% of experiments succeed within `Q(C/100)` draws" then holds
//! exactly on the sample.
//!
//! # Input Requirements
//!
//! Values may be infinite (an experiment that never succeeds is recorded as
//! `f64::INFINITY`), but not NaN. In debug builds this is checked.

use crate::math;

#[inline]
fn debug_assert_not_nan(data: &[f64]) {
    debug_assert!(
        data.iter().all(|x| !x.is_nan()),
        "quantile input must not contain NaN"
    );
}

/// 0-based index of the Type 1 quantile for `n` sorted values.
#[inline]
fn inverse_ecdf_index(n: usize, q: f64) -> usize {
    let rank = math::ceil(n as f64 * q) as usize;
    rank.saturating_sub(1).min(n - 1)
}

/// Compute a single quantile from a mutable slice.
///
/// Uses `select_nth_unstable_by()` for O(n) expected time complexity.
/// The slice is partially reordered as a side effect.
///
/// # Panics
///
/// Panics if `data` is empty or if `q` is outside [0, 1].
pub fn empirical_quantile(data: &mut [f64], q: f64) -> f64 {
    assert!(!data.is_empty(), "Cannot compute quantile of empty slice");
    assert!((0.0..=1.0).contains(&q), "Quantile probability must be in [0, 1]");
    debug_assert_not_nan(data);

    let idx = inverse_ecdf_index(data.len(), q);
    let (_, value, _) = data.select_nth_unstable_by(idx, |a, b| a.total_cmp(b));
    *value
}

/// Compute a quantile from data that is already sorted ascending.
///
/// # Panics
///
/// Panics if `sorted` is empty or if `q` is outside [0, 1].
pub fn empirical_quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    assert!(!sorted.is_empty(), "Cannot compute quantile of empty slice");
    assert!((0.0..=1.0).contains(&q), "Quantile probability must be in [0, 1]");
    debug_assert!(
        sorted.windows(2).all(|w| w[0] <= w[1]),
        "input must be sorted ascending"
    );

    sorted[inverse_ecdf_index(sorted.len(), q)]
}
