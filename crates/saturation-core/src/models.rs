//! Closed-form relations between trial count `n`, per-trial probability `p`,
//! confidence `C` and occurrence threshold `O`.
//!
//! All models treat draws as independent Bernoulli trials (sampling with
//! replacement). The finite-population simulator in the `saturation` crate
//! checks how well that approximation holds when drawing without replacement.
//!
//! Confidence levels are percentages in (0, 100). Probabilities for the
//! inverse models must lie in (0, 1).

use crate::error::{check_finite, check_probability, check_unit_interval, Error, Result};
use crate::math;
use crate::search::{try_find_min_real, RealBracket};
use crate::types::{Confidence, SearchOutcome};

/// Bisection tolerance for [`probability_for_at_least`].
const CLOSED_FORM_P_TOLERANCE: f64 = 1e-10;

fn check_trials(n: u64) -> Result<()> {
    if n >= 1 {
        Ok(())
    } else {
        Err(Error::invalid("n", "must be at least 1"))
    }
}

fn check_occurrences(occurrences: u64) -> Result<()> {
    if occurrences >= 1 {
        Ok(())
    } else {
        Err(Error::invalid("O", "must be at least 1"))
    }
}

/// Smallest `n` with `1 − (1−p)^n ≥ C/100`:
///
/// ```text
/// n = ceil( ln(1 − C/100) / ln(1 − p) )
/// ```
///
/// # Errors
///
/// [`Error::InvalidInput`] when `C ∉ (0, 100)` or `p ∉ (0, 1)`.
pub fn trials_from_probability(confidence: f64, p: f64) -> Result<u64> {
    let c = Confidence::new(confidence)?;
    check_probability(p)?;

    let ratio = math::ln(c.miss_probability()) / math::ln(1.0 - p);
    let n = check_finite(math::ceil(ratio), "trial count")?;
    Ok((n as u64).max(1))
}

/// Largest `p` that `n` trials detect with confidence `C`:
///
/// ```text
/// p = 1 − exp( ln(1 − C/100) / n )
/// ```
///
/// # Errors
///
/// [`Error::InvalidInput`] when `C ∉ (0, 100)` or `n < 1`.
pub fn probability_from_trials(confidence: f64, n: u64) -> Result<f64> {
    let c = Confidence::new(confidence)?;
    check_trials(n)?;

    let p = 1.0 - math::exp(math::ln(c.miss_probability()) / n as f64);
    check_finite(p, "detectable probability")
}

/// `ln Pr(X < O)` for `X ~ Binomial(n, p)` with `0 < p < 1` and `O ≤ n`.
///
/// Terms are carried as logarithms, from `ln pmf(0) = n·ln(1−p)` through the
/// ratio recurrence
///
/// ```text
/// pmf(k+1) = pmf(k) · (n−k)/(k+1) · p/(1−p)
/// ```
///
/// and summed with a running log-sum-exp, so no term underflows to zero
/// however large `n` and `O` get.
fn ln_lower_tail(n: u64, occurrences: u64, ln_q: f64, ln_odds: f64) -> Result<f64> {
    let mut ln_pmf = n as f64 * ln_q;
    let mut ln_max = ln_pmf;
    // Σ exp(ln pmf(k) − ln_max)
    let mut scaled_sum = 1.0_f64;
    for k in 0..occurrences - 1 {
        ln_pmf += math::ln((n - k) as f64) - math::ln((k + 1) as f64) + ln_odds;
        if ln_pmf > ln_max {
            scaled_sum = scaled_sum * math::exp(ln_max - ln_pmf) + 1.0;
            ln_max = ln_pmf;
        } else {
            scaled_sum += math::exp(ln_pmf - ln_max);
        }
    }
    check_finite(ln_max + math::ln(scaled_sum), "binomial lower tail")
}

/// `ln(1−p)` and `ln(p/(1−p))` for `p ∈ (0, 1)`.
fn ln_factors(p: f64) -> Result<(f64, f64)> {
    let ln_q = check_finite(math::ln_1p(-p), "failure log-probability")?;
    let ln_odds = check_finite(math::ln(p) - ln_q, "success log-odds")?;
    Ok((ln_q, ln_odds))
}

/// Smallest `n ∈ [O, n_max]` with `Pr(X < O) ≤ 1 − C/100` for
/// `X ~ Binomial(n, p)`.
///
/// The lower tail is accumulated term by term in log space, so each
/// candidate `n` costs `O` steps and stays exact when `(1−p)^n` is far below
/// the smallest `f64`. `O = 1` reduces to [`trials_from_probability`] and
/// returns exactly its value.
///
/// # Errors
///
/// - [`Error::InvalidInput`] for `C ∉ (0, 100)`, `p ∉ (0, 1)` or `O < 1`.
/// - [`Error::NumericallyUnstable`] if the log-space sum is not finite.
pub fn trials_for_at_least(
    confidence: f64,
    p: f64,
    occurrences: u64,
    n_max: u64,
) -> Result<SearchOutcome<u64>> {
    let c = Confidence::new(confidence)?;
    check_probability(p)?;
    check_occurrences(occurrences)?;

    if occurrences == 1 {
        let n = trials_from_probability(confidence, p)?;
        return Ok(if n <= n_max {
            SearchOutcome::Found(n)
        } else {
            SearchOutcome::Unattainable { limit: n_max }
        });
    }

    let ln_alpha = math::ln(c.miss_probability());
    let (ln_q, ln_odds) = ln_factors(p)?;

    for n in occurrences..=n_max {
        if ln_lower_tail(n, occurrences, ln_q, ln_odds)? <= ln_alpha {
            return Ok(SearchOutcome::Found(n));
        }
    }
    Ok(SearchOutcome::Unattainable { limit: n_max })
}

/// `Pr(X ≥ O)` for `X ~ Binomial(n, p)`.
///
/// Evaluated as `1 − Pr(X < O)`, the lower tail summed in log space with the
/// binomial coefficient and the `p/(1−p)` factor folded into each step of the
/// recurrence. The result is clamped at 0 against cancellation.
///
/// # Errors
///
/// - [`Error::InvalidInput`] for `n < 1`, `O < 1` or `p ∉ [0, 1]`.
/// - [`Error::NumericallyUnstable`] if the log-space sum is not finite.
pub fn binomial_at_least_probability(n: u64, occurrences: u64, p: f64) -> Result<f64> {
    check_trials(n)?;
    check_occurrences(occurrences)?;
    check_unit_interval(p)?;

    if occurrences > n || p == 0.0 {
        return Ok(0.0);
    }
    if p == 1.0 {
        return Ok(1.0);
    }

    let (ln_q, ln_odds) = ln_factors(p)?;
    let lower_tail = math::exp(ln_lower_tail(n, occurrences, ln_q, ln_odds)?);
    Ok((1.0 - lower_tail).max(0.0))
}

/// Smallest `p` with `Pr(X ≥ O) ≥ C/100` for `X ~ Binomial(n, p)`.
///
/// `O = 1` uses the closed form of [`probability_from_trials`]. Larger `O`
/// bisects the binomial tail starting from that value, which is always a
/// lower bound. Returns `Unattainable` when `n < O`.
///
/// # Errors
///
/// As for [`binomial_at_least_probability`], plus `C ∉ (0, 100)`.
pub fn probability_for_at_least(
    confidence: f64,
    n: u64,
    occurrences: u64,
) -> Result<SearchOutcome<f64>> {
    let c = Confidence::new(confidence)?;
    check_trials(n)?;
    check_occurrences(occurrences)?;

    if n < occurrences {
        return Ok(SearchOutcome::Unattainable { limit: 1.0 });
    }
    let guess = probability_from_trials(confidence, n)?;
    if occurrences == 1 {
        return Ok(SearchOutcome::Found(guess));
    }

    let bracket = RealBracket::new(guess)
        .floor(guess)
        .max(1.0)
        .tolerance(CLOSED_FORM_P_TOLERANCE);
    try_find_min_real(c.fraction(), bracket, |p| {
        binomial_at_least_probability(n, occurrences, p)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_trials_from_probability_known_value() {
        // ceil(ln 0.05 / ln 0.95) = ceil(58.40) = 59
        assert_eq!(trials_from_probability(95.0, 0.05), Ok(59));
        assert_eq!(trials_from_probability(90.0, 0.1), Ok(22));
        assert_eq!(trials_from_probability(99.0, 0.01), Ok(459));
    }

    #[test]
    fn test_probability_from_trials_known_value() {
        let p = probability_from_trials(95.0, 59).unwrap();
        assert!((p - 0.0495).abs() < 1e-3, "p = {p}");
        assert!(p <= 0.05);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            trials_from_probability(0.0, 0.1),
            Err(Error::InvalidInput { parameter: "C", .. })
        ));
        assert!(matches!(
            trials_from_probability(95.0, 0.0),
            Err(Error::InvalidInput { parameter: "p", .. })
        ));
        assert!(trials_from_probability(95.0, 1.0).is_err());
        assert!(matches!(
            probability_from_trials(95.0, 0),
            Err(Error::InvalidInput { parameter: "n", .. })
        ));
        assert!(matches!(
            trials_for_at_least(95.0, 0.1, 0, 2000),
            Err(Error::InvalidInput { parameter: "O", .. })
        ));
        assert!(binomial_at_least_probability(10, 1, 1.5).is_err());
    }

    #[test]
    fn test_two_occurrences_need_more_trials() {
        let one = trials_from_probability(95.0, 0.1).unwrap();
        let two = trials_for_at_least(95.0, 0.1, 2, 2000).unwrap().found().unwrap();
        assert!(two > one, "O=2 gave {two}, O=1 gave {one}");
        // Pr(X<2; 46, 0.1) = 0.9^46 + 46·0.1·0.9^45 ≈ 0.0486
        assert_eq!(two, 46);
    }

    #[test]
    fn test_at_least_unattainable() {
        assert_eq!(
            trials_for_at_least(99.999, 0.05, 1, 50),
            Ok(SearchOutcome::Unattainable { limit: 50 })
        );
        assert_eq!(
            trials_for_at_least(95.0, 0.01, 3, 100),
            Ok(SearchOutcome::Unattainable { limit: 100 })
        );
        // Range below O is empty
        assert_eq!(
            trials_for_at_least(95.0, 0.5, 5, 4),
            Ok(SearchOutcome::Unattainable { limit: 4 })
        );
    }

    #[test]
    fn test_at_least_agrees_with_tail_probability() {
        for &(p, o) in &[(0.05, 2), (0.1, 3), (0.2, 3)] {
            let n = trials_for_at_least(95.0, p, o, 2000).unwrap().found().unwrap();
            assert!(binomial_at_least_probability(n, o, p).unwrap() >= 0.95 - 1e-12);
            assert!(binomial_at_least_probability(n - 1, o, p).unwrap() < 0.95);
        }
    }

    #[test]
    fn test_binomial_tail_edges() {
        assert_eq!(binomial_at_least_probability(3, 5, 0.5), Ok(0.0));
        assert_eq!(binomial_at_least_probability(10, 1, 0.0), Ok(0.0));
        assert_eq!(binomial_at_least_probability(10, 3, 1.0), Ok(1.0));

        let one = binomial_at_least_probability(20, 1, 0.1).unwrap();
        assert!((one - (1.0 - 0.9_f64.powi(20))).abs() < 1e-12);
    }

    #[test]
    fn test_probability_for_at_least() {
        let p1 = probability_for_at_least(95.0, 59, 1).unwrap().found().unwrap();
        assert_eq!(p1, probability_from_trials(95.0, 59).unwrap());

        let p2 = probability_for_at_least(95.0, 59, 2).unwrap().found().unwrap();
        assert!(p2 > p1);
        let tail = binomial_at_least_probability(59, 2, p2).unwrap();
        assert!(tail >= 0.95 && tail < 0.95 + 1e-6, "tail = {tail}");

        assert_eq!(
            probability_for_at_least(95.0, 2, 3),
            Ok(SearchOutcome::Unattainable { limit: 1.0 })
        );
    }

    #[test]
    fn test_at_least_many_occurrences() {
        // (1−p)^n underflows for every candidate n here
        let n = trials_for_at_least(95.0, 0.5, 1100, 5000).unwrap().found().unwrap();
        assert!((2200..2400).contains(&n), "n = {n}");
        assert!(binomial_at_least_probability(n, 1100, 0.5).unwrap() >= 0.95 - 1e-9);
        assert!(binomial_at_least_probability(n - 1, 1100, 0.5).unwrap() < 0.95);

        assert_eq!(
            trials_for_at_least(95.0, 0.5, 1100, 2000),
            Ok(SearchOutcome::Unattainable { limit: 2000 })
        );
    }

    #[test]
    fn test_binomial_tail_large_n() {
        // Normal approximation: 1 − Φ((599.5 − 550) / 16.58) ≈ 0.0014
        let tail = binomial_at_least_probability(1100, 600, 0.5).unwrap();
        assert!(tail > 0.001 && tail < 0.002, "tail = {tail}");

        // Tiny upper tail: terms near k = 0 are far below f64::MIN_POSITIVE
        let tail = binomial_at_least_probability(5000, 10, 0.5).unwrap();
        assert_eq!(tail, 1.0);
        let tail = binomial_at_least_probability(5000, 4000, 0.5).unwrap();
        assert!(tail >= 0.0 && tail < 1e-12, "tail = {tail}");
    }

    #[test]
    fn test_probability_for_at_least_large_n() {
        let p = probability_for_at_least(95.0, 1100, 600).unwrap().found().unwrap();
        assert!(p > 0.55 && p < 0.59, "p = {p}");
        let tail = binomial_at_least_probability(1100, 600, p).unwrap();
        assert!(tail >= 0.95 && tail < 0.95 + 1e-6, "tail = {tail}");
    }

    #[test]
    fn test_at_least_near_certain_success() {
        // p/(1−p) ≈ 1e12; Pr(X < 5; 5, p) ≈ 5e-12
        assert_eq!(
            trials_for_at_least(95.0, 1.0 - 1e-12, 5, 100),
            Ok(SearchOutcome::Found(5))
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn found_count_meets_tail(p in 0.05f64..0.95, o in 2u64..80) {
            let n = trials_for_at_least(95.0, p, o, 10_000).unwrap().found().unwrap();
            prop_assert!(binomial_at_least_probability(n, o, p).unwrap() >= 0.95 - 1e-9);
            prop_assert!(binomial_at_least_probability(n - 1, o, p).unwrap() < 0.95 + 1e-9);
        }
    }

    proptest! {
        #[test]
        fn inverse_never_loosens(c in 1.0f64..99.9, p in 0.001f64..0.9) {
            let n = trials_from_probability(c, p).unwrap();
            let back = probability_from_trials(c, n).unwrap();
            prop_assert!(back <= p + 1e-12, "n = {}, back = {}, p = {}", n, back, p);
        }

        #[test]
        fn trials_monotone_in_p(c in 1.0f64..99.9, p in 0.002f64..0.9, shrink in 0.1f64..0.99) {
            let n_hi = trials_from_probability(c, p).unwrap();
            let n_lo = trials_from_probability(c, p * shrink).unwrap();
            prop_assert!(n_lo >= n_hi);
        }

        #[test]
        fn trials_monotone_in_confidence(c in 1.0f64..99.0, bump in 0.0f64..0.99, p in 0.001f64..0.9) {
            let n = trials_from_probability(c, p).unwrap();
            let n_more = trials_from_probability(c + bump, p).unwrap();
            prop_assert!(n_more >= n);
        }

        #[test]
        fn single_occurrence_reduces_to_base(c in 1.0f64..99.9, p in 0.005f64..0.9) {
            let base = trials_from_probability(c, p).unwrap();
            let at_least = trials_for_at_least(c, p, 1, u64::MAX).unwrap();
            prop_assert_eq!(at_least, SearchOutcome::Found(base));
        }
    }
}
