//! Synthetic finite populations and draw orders.
//!
//! Two kinds of population are simulated:
//!
//! - [`CarrierPopulation`]: `POP` members of which exactly `⌊p·POP⌋` carry the
//!   theme, used by the coverage engine.
//! - [`InterviewPopulation`]: `POP` interviews, each emitting a Poisson number
//!   of theme tokens drawn from a Zipf distribution, used by the missing-mass
//!   experiments.
//!
//! Draws are without replacement: a draw order is a uniform permutation of the
//! member indices. Populations and orders are built fresh for every
//! experiment and never reused across experiments.

mod carrier;
mod interview;

pub use carrier::{carrier_count, CarrierPopulation, LazyDraws};
pub use interview::{InterviewPopulation, ThemeDistribution};

use rand::seq::SliceRandom;
use rand::Rng;

/// Uniformly permute `items` in place (Fisher–Yates).
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// A uniformly random order in which to draw all `population` members.
pub fn draw_order<R: Rng + ?Sized>(population: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..population).collect();
    shuffle(&mut order, rng);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::experiment_rng;

    #[test]
    fn test_draw_order_is_permutation() {
        let mut rng = experiment_rng(1, 0);
        let mut order = draw_order(100, &mut rng);
        order.sort_unstable();
        assert_eq!(order, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_draw_order_positions_are_uniform() {
        // Member 0 should land in the first half about half the time.
        let trials = 4_000;
        let first_half = (0..trials)
            .filter(|&i| {
                let order = draw_order(10, &mut experiment_rng(5, i));
                order.iter().position(|&m| m == 0).is_some_and(|pos| pos < 5)
            })
            .count();
        let share = first_half as f64 / trials as f64;
        assert!((share - 0.5).abs() < 0.04, "share = {share}");
    }
}
