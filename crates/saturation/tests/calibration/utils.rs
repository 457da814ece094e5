//! Shared utilities for calibration tests.
//!
//! This module provides:
//! - Tier selection via the `CALIBRATION_TIER` environment variable
//! - Exact finite-population references for the coverage engine

#![allow(dead_code)]

use saturation::SimulationConfig;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Test tier controlling experiment counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Quick tier for PR checks
    Quick,
    /// Full tier for thorough validation
    Full,
}

impl Tier {
    pub fn from_env() -> Self {
        match std::env::var("CALIBRATION_TIER").as_deref() {
            Ok("quick") => Tier::Quick,
            Ok("full") => Tier::Full,
            _ => {
                // Auto-detect: quick in CI, full locally
                if is_ci() {
                    Tier::Quick
                } else {
                    Tier::Full
                }
            }
        }
    }

    /// Coverage experiments per evaluation.
    pub fn coverage_experiments(&self) -> usize {
        match self {
            Tier::Quick => 400,
            Tier::Full => 1_000,
        }
    }

    /// Missing-mass experiments per aggregation.
    pub fn missing_mass_experiments(&self) -> usize {
        match self {
            Tier::Quick => 60,
            Tier::Full => 200,
        }
    }

    /// Relative tolerance on simulated minimum trial counts.
    ///
    /// Near 99% coverage the curve is flat in `n`, so Monte Carlo error in the
    /// coverage turns into a wide spread in the minimum.
    pub fn n_tolerance(&self) -> f64 {
        match self {
            Tier::Quick => 0.25,
            Tier::Full => 0.15,
        }
    }

    /// Calibration configuration sized for this tier.
    pub fn config(&self, seed: u64) -> SimulationConfig {
        SimulationConfig::calibration()
            .experiments(self.coverage_experiments())
            .seed(seed)
    }
}

fn is_ci() -> bool {
    matches!(std::env::var("CI").as_deref(), Ok("true") | Ok("1"))
}

// =============================================================================
// FINITE-POPULATION REFERENCE
// =============================================================================

/// Probability that `n` draws without replacement from `population` members,
/// `carriers` of them carriers, contain no carrier.
pub fn hypergeometric_miss(population: u64, carriers: u64, n: u64) -> f64 {
    if n > population - carriers {
        return 0.0;
    }
    (0..n)
        .map(|i| (population - carriers - i) as f64 / (population - i) as f64)
        .product()
}

/// Smallest `n` whose exact finite-population coverage reaches `target`.
pub fn hypergeometric_min_trials(population: u64, carriers: u64, target: f64) -> Option<u64> {
    (1..=population).find(|&n| 1.0 - hypergeometric_miss(population, carriers, n) >= target)
}

/// Relative tolerance with an absolute floor.
pub fn within(actual: f64, expected: f64, relative: f64, absolute: f64) -> bool {
    (actual - expected).abs() <= (relative * expected.abs()).max(absolute)
}
