//! Coverage calibration tests.
//!
//! The closed-form `n` assumes draws with replacement. Drawing without
//! replacement can only help, so simulated coverage at the closed-form `n`
//! must reach `C`, and the simulated minimum must sit at or below it, close
//! to the exact hypergeometric minimum.

use crate::calibration_utils;

use calibration_utils::{hypergeometric_min_trials, within, Tier};
use saturation::population::carrier_count;
use saturation::{CoverageEngine, SearchOutcome};
use saturation_core::models::{probability_from_trials, trials_from_probability};

const CONFIDENCES: [f64; 3] = [90.0, 95.0, 99.0];
const FREQUENCIES: [f64; 3] = [0.01, 0.05, 0.2];

// =============================================================================
// COVERAGE AT THE CLOSED-FORM N
// =============================================================================

#[test]
fn coverage_at_theoretical_n_reaches_confidence() {
    let tier = Tier::from_env();
    let engine = CoverageEngine::new(tier.config(101)).unwrap();

    for c in CONFIDENCES {
        for p in FREQUENCIES {
            let n = trials_from_probability(c, p).unwrap();
            let coverage = engine.coverage_at(n, p).unwrap();
            eprintln!("[coverage] C={c} p={p} n={n}: {coverage:.3}");
            assert!(
                coverage >= c / 100.0 - 0.05,
                "C={c} p={p}: coverage {coverage} at n={n}"
            );
        }
    }
}

// =============================================================================
// EMPIRICAL MINIMUM N
// =============================================================================

#[test]
fn empirical_n_tracks_finite_population_reference() {
    let tier = Tier::from_env();
    let engine = CoverageEngine::new(tier.config(202)).unwrap();
    let population = engine.config().population as u64;

    for c in CONFIDENCES {
        for p in FREQUENCIES {
            let theory = trials_from_probability(c, p).unwrap();
            let carriers = carrier_count(population as usize, p) as u64;
            let reference = hypergeometric_min_trials(population, carriers, c / 100.0).unwrap();

            let empirical = match engine.empirical_minimum_n(p, c).unwrap() {
                SearchOutcome::Found(n) => n,
                other => panic!("C={c} p={p}: {other:?}"),
            };
            eprintln!("[minimum n] C={c} p={p}: theory {theory}, exact {reference}, simulated {empirical}");

            let tolerance = tier.n_tolerance();
            assert!(
                empirical as f64 <= theory as f64 * (1.0 + tolerance) + 3.0,
                "C={c} p={p}: {empirical} > {theory}"
            );
            assert!(
                within(empirical as f64, reference as f64, tolerance, 3.0),
                "C={c} p={p}: simulated {empirical}, exact {reference}"
            );
        }
    }
}

#[test]
fn quantile_of_first_success_matches_search() {
    // With shared RNG streams, the quantile of per-experiment minima and the
    // bisection over coverage read the same empirical distribution.
    let engine = CoverageEngine::new(
        saturation::SimulationConfig::calibration().experiments(500).seed(303),
    )
    .unwrap();

    for p in FREQUENCIES {
        let searched = engine.empirical_minimum_n(p, 90.0).unwrap();
        let quantile = engine.quantile_trials_for_at_least(p, &[1], 90.0).unwrap();
        assert_eq!(quantile[0], searched, "p={p}");
    }
}

#[test]
fn coverage_is_monotone_across_grid() {
    let engine = CoverageEngine::new(Tier::Quick.config(404)).unwrap();
    let coverages: Vec<f64> = (1..=300)
        .step_by(5)
        .map(|n| engine.coverage_at(n, 0.01).unwrap())
        .collect();
    assert!(coverages.windows(2).all(|w| w[0] <= w[1]));
}

// =============================================================================
// EMPIRICAL MINIMUM P
// =============================================================================

#[test]
fn empirical_p_at_or_below_theory() {
    let tier = Tier::from_env();
    let engine = CoverageEngine::new(tier.config(505)).unwrap();

    for n in [30, 59, 150] {
        let theory = probability_from_trials(95.0, n).unwrap();
        let empirical = engine.empirical_minimum_p(n, 95.0).unwrap().found().unwrap();
        eprintln!("[minimum p] n={n}: theory {theory:.4}, simulated {empirical:.4}");
        assert!(empirical > 0.0);
        assert!(empirical <= theory * 1.2 + 0.005, "n={n}: {empirical} vs {theory}");
    }
}

// =============================================================================
// UNATTAINABLE TARGETS
// =============================================================================

#[test]
fn unattainable_within_trial_cap() {
    let engine = CoverageEngine::new(Tier::Quick.config(606).n_max(50)).unwrap();
    assert_eq!(
        engine.empirical_minimum_n(0.01, 99.0).unwrap(),
        SearchOutcome::Unattainable { limit: 50 }
    );
}

#[test]
fn unattainable_below_p_max() {
    let engine = CoverageEngine::new(Tier::Quick.config(707).p_max(0.05)).unwrap();
    // Three draws cannot reach 99% coverage for any p below 5%
    assert_eq!(
        engine.empirical_minimum_p(3, 99.0).unwrap(),
        SearchOutcome::Unattainable { limit: 0.05 }
    );
}

#[test]
fn too_few_carriers_for_occurrences() {
    let engine = CoverageEngine::new(Tier::Quick.config(808)).unwrap();
    // 0.002 · 1000 = 2 carriers
    assert_eq!(engine.coverage_for_at_least(1_000, 3, 0.002).unwrap(), 0.0);
    assert!(engine
        .empirical_minimum_trials(0.002, 3, 95.0)
        .unwrap()
        .is_unattainable());
}
