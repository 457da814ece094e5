//! Tests for the finite-population simulator.

use saturation::population::{
    carrier_count, draw_order, CarrierPopulation, InterviewPopulation, LazyDraws,
    ThemeDistribution,
};
use saturation::rng::experiment_rng;
use saturation::InterviewConfig;

// =============================================================================
// CARRIER POPULATIONS
// =============================================================================

#[test]
fn carrier_count_floors() {
    assert_eq!(carrier_count(1000, 0.05), 50);
    assert_eq!(carrier_count(1000, 0.0015), 1);
    assert_eq!(carrier_count(1000, 0.0009), 0);
    assert_eq!(carrier_count(10, 1.0), 10);
}

#[test]
fn carrier_population_has_exact_count() {
    let mut rng = experiment_rng(5, 0);
    for p in [0.0, 0.013, 0.2, 0.5, 1.0] {
        let population = CarrierPopulation::build(500, p, &mut rng).unwrap();
        let flagged = (0..population.len()).filter(|&i| population.is_carrier(i)).count();
        assert_eq!(flagged, carrier_count(500, p));
        assert_eq!(population.carrier_count(), flagged);
    }
}

#[test]
fn carrier_population_rejects_invalid() {
    let mut rng = experiment_rng(5, 0);
    assert!(CarrierPopulation::build(0, 0.1, &mut rng).is_err());
    assert!(CarrierPopulation::build(100, -0.1, &mut rng).is_err());
    assert!(CarrierPopulation::build(100, f64::NAN, &mut rng).is_err());
}

#[test]
fn lazy_draws_are_a_permutation() {
    let mut rng = experiment_rng(8, 3);
    let mut drawn: Vec<usize> = LazyDraws::new(64, &mut rng).collect();
    assert_eq!(drawn.len(), 64);
    drawn.sort_unstable();
    assert_eq!(drawn, (0..64).collect::<Vec<_>>());
}

#[test]
fn lazy_draw_prefix_is_stable() {
    let short: Vec<usize> = LazyDraws::new(100, &mut experiment_rng(1, 1)).take(10).collect();
    let long: Vec<usize> = LazyDraws::new(100, &mut experiment_rng(1, 1)).take(40).collect();
    assert_eq!(short[..], long[..10]);
}

#[test]
fn first_success_counts_draws() {
    // Carriers at indices 2 and 5
    let population = CarrierPopulation::from_flags(vec![false, false, true, false, false, true]);
    let order = [0, 2, 1, 3, 5, 4];
    assert_eq!(population.first_success_draw(order, 1, 6), Some(2));
    assert_eq!(population.first_success_draw(order, 2, 6), Some(5));
    assert_eq!(population.first_success_draw(order, 2, 4), None);
    assert_eq!(population.first_success_draw(order, 3, 6), None);
    assert!(population.hits_within(order, 5, 2));
    assert!(!population.hits_within(order, 4, 2));
}

#[test]
fn draw_order_is_reproducible() {
    let a = draw_order(50, &mut experiment_rng(42, 7));
    let b = draw_order(50, &mut experiment_rng(42, 7));
    let c = draw_order(50, &mut experiment_rng(42, 8));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

// =============================================================================
// INTERVIEW POPULATIONS
// =============================================================================

#[test]
fn zipf_distribution_is_normalized_and_decreasing() {
    let distribution = ThemeDistribution::zipf(800, 1.05).unwrap();
    let probabilities = distribution.probabilities();
    assert_eq!(probabilities.len(), 800);
    let total: f64 = probabilities.iter().sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(probabilities.windows(2).all(|w| w[0] > w[1]));
    assert_eq!(distribution.theme_at(0.0), 0);
    assert_eq!(distribution.theme_at(1.0), 799);
}

#[test]
fn interview_population_totals_match_interviews() {
    let config = InterviewConfig::new().interviews(50).themes(100);
    let population = InterviewPopulation::build(&config, &mut experiment_rng(3, 0)).unwrap();

    assert_eq!(population.len(), 50);
    assert_eq!(population.theme_totals().len(), 100);

    let tokens: usize = population.interviews().iter().map(Vec::len).sum();
    assert_eq!(population.total_tokens(), tokens as u64);

    let mut totals = vec![0u32; 100];
    for interview in population.interviews() {
        for &theme in interview {
            totals[theme as usize] += 1;
        }
    }
    assert_eq!(population.theme_totals(), &totals[..]);
}

#[test]
fn interview_population_mean_tokens() {
    let config = InterviewConfig::new().interviews(2_000).themes(50).mean_tokens(20.0);
    let population = InterviewPopulation::build(&config, &mut experiment_rng(9, 0)).unwrap();
    let mean = population.total_tokens() as f64 / population.len() as f64;
    // Poisson(20) mean over 2000 interviews: standard error 0.1
    assert!((mean - 20.0).abs() < 0.5, "mean tokens {mean}");
}

#[test]
fn from_interviews_rejects_unknown_theme() {
    assert!(InterviewPopulation::from_interviews(vec![vec![0, 3]], 3).is_err());
}
