//! Monte Carlo coverage engine.
//!
//! Coverage at `(n, p)` is the fraction of E independent experiments in which
//! drawing `n` members without replacement from a fresh carrier population
//! turns up at least `O` carriers. It is the empirical counterpart of the
//! closed forms in [`saturation_core::models`], and the searches here invert
//! it the same way those closed forms are inverted.
//!
//! Experiment `i` always uses the RNG stream derived from `(seed, i)`, so
//! evaluating coverage at several `n` for the same `p` reuses populations and
//! draw orders. Coverage is then exactly non-decreasing in `n`, which the
//! integer search relies on.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, warn};

use saturation_core::models::{
    probability_for_at_least, probability_from_trials, trials_for_at_least,
};
use saturation_core::search::{try_find_min_integer, try_find_min_real, IntegerBracket, RealBracket};
use saturation_core::statistics::empirical_quantile;
use saturation_core::{Confidence, Error as ModelError, SearchOutcome};

use crate::cancel::CancelToken;
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::population::{CarrierPopulation, LazyDraws};
use crate::rng::{experiment_rng, ExperimentRng};

fn check_p(p: f64) -> Result<()> {
    if p > 0.0 && p < 1.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidInput {
            parameter: "p",
            reason: "must be in (0, 1)",
        }
        .into())
    }
}

fn check_at_least_one(value: u64, parameter: &'static str) -> Result<()> {
    if value >= 1 {
        Ok(())
    } else {
        Err(ModelError::InvalidInput {
            parameter,
            reason: "must be at least 1",
        }
        .into())
    }
}

/// Runs coverage experiments over a finite carrier population.
#[derive(Debug, Clone)]
pub struct CoverageEngine {
    config: SimulationConfig,
    cancel: CancelToken,
}

impl CoverageEngine {
    /// Engine for the given configuration.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the
    /// configuration does not validate.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: CancelToken::new(),
        })
    }

    /// Check `token` between experiments and stop with
    /// [`Error::Cancelled`](crate::Error::Cancelled) once it is cancelled.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// The engine's configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    // =========================================================================
    // Coverage
    // =========================================================================

    /// Fraction of experiments with at least one carrier among the first
    /// `min(n, POP)` draws.
    pub fn coverage_at(&self, n: u64, p: f64) -> Result<f64> {
        self.coverage_for_at_least(n, 1, p)
    }

    /// Fraction of experiments with at least `occurrences` carriers among the
    /// first `min(n, POP)` draws. Each experiment stops drawing as soon as
    /// the threshold is reached.
    pub fn coverage_for_at_least(&self, n: u64, occurrences: u64, p: f64) -> Result<f64> {
        check_at_least_one(n, "n")?;
        check_at_least_one(occurrences, "O")?;
        check_p(p)?;
        self.coverage(n, occurrences, p)
    }

    fn coverage(&self, n: u64, occurrences: u64, p: f64) -> Result<f64> {
        let population = self.config.population;
        let successes = self.count_successes(|rng| {
            let carriers = CarrierPopulation::build(population, p, rng)?;
            if (carriers.carrier_count() as u64) < occurrences {
                return Ok(false);
            }
            Ok(carriers.hits_within(LazyDraws::new(population, rng), n, occurrences))
        })?;
        Ok(successes as f64 / self.config.experiments as f64)
    }

    // =========================================================================
    // Searches
    // =========================================================================

    /// Smallest `n` whose coverage (at least one carrier) reaches `C`.
    ///
    /// The bracket starts from the closed-form `n` and never grows beyond
    /// `min(n_max, POP)`.
    pub fn empirical_minimum_n(&self, p: f64, confidence: f64) -> Result<SearchOutcome<u64>> {
        self.empirical_minimum_trials(p, 1, confidence)
    }

    /// Smallest `n` whose coverage (at least `occurrences` carriers) reaches `C`.
    pub fn empirical_minimum_trials(
        &self,
        p: f64,
        occurrences: u64,
        confidence: f64,
    ) -> Result<SearchOutcome<u64>> {
        let c = Confidence::new(confidence)?;
        check_p(p)?;
        check_at_least_one(occurrences, "O")?;

        let cap = self.config.trial_cap();
        let guess = match trials_for_at_least(confidence, p, occurrences, cap)? {
            SearchOutcome::Found(n) => n,
            SearchOutcome::Unattainable { limit } => limit,
        };
        let bracket = IntegerBracket::new(guess, occurrences, cap);
        debug!(p, occurrences, confidence, guess, cap, "searching minimum n");

        let outcome = try_find_min_integer(c.fraction(), bracket, |n| {
            let coverage = self.coverage(n, occurrences, p)?;
            debug!(n, coverage, "coverage evaluated");
            Ok::<_, crate::error::Error>(coverage)
        })?;
        if let SearchOutcome::Unattainable { limit } = outcome {
            warn!(p, occurrences, confidence, limit, "target coverage not reached within trial cap");
        }
        Ok(outcome)
    }

    /// Smallest `p` whose coverage at `n` draws (at least one carrier)
    /// reaches `C`, to within the configured tolerance.
    ///
    /// The bracket starts from the closed-form `p` and never grows beyond
    /// `p_max`.
    pub fn empirical_minimum_p(&self, n: u64, confidence: f64) -> Result<SearchOutcome<f64>> {
        self.empirical_probability_for_at_least(n, 1, confidence)
    }

    /// Smallest `p` whose coverage at `n` draws (at least `occurrences`
    /// carriers) reaches `C`.
    pub fn empirical_probability_for_at_least(
        &self,
        n: u64,
        occurrences: u64,
        confidence: f64,
    ) -> Result<SearchOutcome<f64>> {
        let c = Confidence::new(confidence)?;
        check_at_least_one(n, "n")?;
        check_at_least_one(occurrences, "O")?;

        let guess = match probability_for_at_least(confidence, n, occurrences)? {
            SearchOutcome::Found(p) => p,
            SearchOutcome::Unattainable { .. } => probability_from_trials(confidence, n)?,
        };
        let bracket = RealBracket::new(guess)
            .floor(self.config.p_floor)
            .max(self.config.p_max)
            .tolerance(self.config.p_tolerance);
        debug!(n, occurrences, confidence, guess, "searching minimum p");

        let outcome = try_find_min_real(c.fraction(), bracket, |p| {
            let coverage = self.coverage(n, occurrences, p)?;
            debug!(p, coverage, "coverage evaluated");
            Ok::<_, crate::error::Error>(coverage)
        })?;
        if let SearchOutcome::Unattainable { limit } = outcome {
            warn!(n, occurrences, confidence, limit, "target coverage not reached below p_max");
        }
        Ok(outcome)
    }

    // =========================================================================
    // Per-experiment minima
    // =========================================================================

    /// For every experiment, the number of draws needed to reach each
    /// threshold in `occurrences` (`None` if not reached within
    /// `min(n_max, POP)`).
    ///
    /// All thresholds of one experiment share its population and draw order.
    pub fn first_success_draws(
        &self,
        p: f64,
        occurrences: &[u64],
    ) -> Result<Vec<Vec<Option<u64>>>> {
        check_p(p)?;
        for &o in occurrences {
            check_at_least_one(o, "O")?;
        }

        let population = self.config.population;
        let cap = self.config.trial_cap();
        self.run_experiments(|rng| {
            let carriers = CarrierPopulation::build(population, p, rng)?;
            let order: Vec<usize> = LazyDraws::new(population, rng).take(cap as usize).collect();
            Ok(occurrences
                .iter()
                .map(|&o| carriers.first_success_draw(order.iter().copied(), o, cap))
                .collect())
        })
    }

    /// The `C`-quantile, across experiments, of the draws needed to reach
    /// each threshold in `occurrences`.
    ///
    /// Experiments that never reach a threshold count as needing infinitely
    /// many draws, so the quantile is `Unattainable` once more than
    /// `1 − C/100` of them miss.
    pub fn quantile_trials_for_at_least(
        &self,
        p: f64,
        occurrences: &[u64],
        confidence: f64,
    ) -> Result<Vec<SearchOutcome<u64>>> {
        let c = Confidence::new(confidence)?;
        let per_experiment = self.first_success_draws(p, occurrences)?;
        let cap = self.config.trial_cap();

        let outcomes = (0..occurrences.len())
            .map(|j| {
                let mut draws: Vec<f64> = per_experiment
                    .iter()
                    .map(|row| row[j].map_or(f64::INFINITY, |n| n as f64))
                    .collect();
                let q = empirical_quantile(&mut draws, c.fraction());
                if q.is_finite() {
                    SearchOutcome::Found(q as u64)
                } else {
                    SearchOutcome::Unattainable { limit: cap }
                }
            })
            .collect();
        Ok(outcomes)
    }

    // =========================================================================
    // Experiment runners
    // =========================================================================

    /// Number of experiments for which `experiment` returns true.
    fn count_successes<F>(&self, experiment: F) -> Result<usize>
    where
        F: Fn(&mut ExperimentRng) -> Result<bool> + Sync + Send,
    {
        let seed = self.config.seed;

        #[cfg(feature = "parallel")]
        let successes = (0..self.config.experiments)
            .into_par_iter()
            .try_fold(
                || 0usize,
                |acc, i| {
                    self.cancel.check()?;
                    let mut rng = experiment_rng(seed, i);
                    Ok::<_, crate::error::Error>(acc + usize::from(experiment(&mut rng)?))
                },
            )
            .try_reduce(|| 0, |a, b| Ok(a + b))?;

        #[cfg(not(feature = "parallel"))]
        let successes = {
            let mut successes = 0usize;
            for i in 0..self.config.experiments {
                self.cancel.check()?;
                let mut rng = experiment_rng(seed, i);
                successes += usize::from(experiment(&mut rng)?);
            }
            successes
        };

        Ok(successes)
    }

    /// Per-experiment results, in experiment order.
    fn run_experiments<T, F>(&self, experiment: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(&mut ExperimentRng) -> Result<T> + Sync + Send,
    {
        let seed = self.config.seed;

        #[cfg(feature = "parallel")]
        let results = (0..self.config.experiments)
            .into_par_iter()
            .map(|i| {
                self.cancel.check()?;
                experiment(&mut experiment_rng(seed, i))
            })
            .collect::<Result<Vec<T>>>();

        #[cfg(not(feature = "parallel"))]
        let results = (0..self.config.experiments)
            .map(|i| {
                self.cancel.check()?;
                experiment(&mut experiment_rng(seed, i))
            })
            .collect::<Result<Vec<T>>>();

        results
    }
}
