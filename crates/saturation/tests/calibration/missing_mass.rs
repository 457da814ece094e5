//! Missing-mass calibration tests.
//!
//! Averaged over many populations, the true missing mass falls steadily as
//! interviews are drawn and vanishes once the population is exhausted. Early
//! on, while few tokens have been drawn, the Good–Turing estimate tracks it
//! closely.

use crate::calibration_utils::Tier;

use saturation::{missing_mass_series, InterviewConfig, MissingMassSimulator, SimulationConfig};

/// Steps over which the averaged true mass must fall strictly.
const EARLY_STEPS: usize = 20;

/// Largest rise of the averaged true mass allowed between adjacent steps.
const STEP_NOISE: f64 = 0.03;

fn simulate(seed: u64) -> Vec<saturation::MissingMassPoint> {
    let tier = Tier::from_env();
    let simulator = MissingMassSimulator::new(
        SimulationConfig::new()
            .experiments(tier.missing_mass_experiments())
            .seed(seed),
        InterviewConfig::new(),
    )
    .unwrap();
    let n_max = simulator.interviews().interviews;
    simulator.aggregate(n_max, 95.0).unwrap()
}

#[test]
fn true_mass_decreases_to_zero() {
    let points = simulate(11);
    assert_eq!(points.len(), 200);

    let checkpoints = [1, 10, 50, 100, 150, 200];
    let masses: Vec<f64> = checkpoints.iter().map(|&n| points[n - 1].true_mass).collect();
    eprintln!("[missing mass] {masses:?}");

    assert!(masses.windows(2).all(|w| w[0] > w[1]), "{masses:?}");
    assert_eq!(masses[5], 0.0);

    // Early steps remove a large share of the unseen mass each time
    for w in points[..EARLY_STEPS].windows(2) {
        assert!(
            w[1].true_mass < w[0].true_mass,
            "step {}: {} -> {}",
            w[1].step,
            w[0].true_mass,
            w[1].true_mass
        );
    }
    // Later the per-step decrease is smaller than the noise of the average
    for w in points.windows(2) {
        assert!(
            w[1].true_mass <= w[0].true_mass + STEP_NOISE,
            "step {}: {} -> {}",
            w[1].step,
            w[0].true_mass,
            w[1].true_mass
        );
    }
}

#[test]
fn estimate_tracks_truth_early() {
    let points = simulate(22);
    for n in [5, 10] {
        let point = points[n - 1];
        assert!(
            (point.estimate - point.true_mass).abs() < 0.08,
            "n={n}: estimate {} vs true {}",
            point.estimate,
            point.true_mass
        );
        assert!(point.lower <= point.true_mass && point.true_mass <= point.upper);
    }
}

#[test]
fn series_pairs_truth_with_estimate() {
    let points = simulate(33);
    let [truth, estimate] = missing_mass_series(&points);
    assert!(truth.is_empirical());
    assert!(!estimate.is_empirical());
    assert_eq!(truth.points().len(), estimate.points().len());
    assert!(estimate.points().iter().all(|p| p.lower <= p.mid && p.mid <= p.upper));
}
