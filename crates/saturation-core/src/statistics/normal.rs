//! Standard normal quantile.

use crate::math::normal_cdf;

/// Inverse of the standard normal CDF, found by bisection on `Φ`.
///
/// Returns `-inf` / `+inf` at the endpoints and NaN outside [0, 1].
/// Accurate to about `1e-12` in `z` over the open interval.
pub fn normal_quantile(prob: f64) -> f64 {
    if prob.is_nan() || !(0.0..=1.0).contains(&prob) {
        return f64::NAN;
    }
    if prob == 0.0 {
        return f64::NEG_INFINITY;
    }
    if prob == 1.0 {
        return f64::INFINITY;
    }

    // Φ(±40) is 0/1 to double precision
    let (mut lo, mut hi) = (-40.0_f64, 40.0_f64);
    for _ in 0..100 {
        let mid = 0.5 * (lo + hi);
        if normal_cdf(mid) < prob {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < 1e-13 {
            break;
        }
    }
    0.5 * (lo + hi)
}
