//! Missing-mass experiments and their aggregation.
//!
//! One experiment draws interviews from a fresh [`InterviewPopulation`] in a
//! random order and records, after every interview, the true missing mass of
//! the next draw next to the Good–Turing estimate and its band. The
//! aggregator averages those per-step values over E experiments.
//!
//! The averaged band is the mean of the per-experiment analytic bands, not a
//! band derived from the spread between experiments: it shows what a single
//! study would report on average.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info};

use saturation_core::{Confidence, Error as ModelError, MissingMassPoint, MissingMassState};

use crate::cancel::CancelToken;
use crate::config::{InterviewConfig, SimulationConfig};
use crate::error::Result;
use crate::population::{draw_order, InterviewPopulation, ThemeDistribution};
use crate::rng::experiment_rng;

/// Experiments handed to the thread pool between two progress reports.
const PROGRESS_BATCH: usize = 64;

/// Run one experiment over the first `n_max` interviews of `order`.
///
/// Returns one point per step `1..=n_max`.
///
/// # Errors
///
/// Fails if `n_max` exceeds the length of `order` or an index in `order` is
/// not an interview of `population`.
pub fn run_experiment(
    population: &InterviewPopulation,
    order: &[usize],
    n_max: usize,
    z: f64,
) -> Result<Vec<MissingMassPoint>> {
    if n_max > order.len() {
        return Err(ModelError::InvalidInput {
            parameter: "n_max",
            reason: "exceeds the number of interviews",
        }
        .into());
    }

    let mut state = MissingMassState::new(population.theme_totals());
    let mut points = Vec::with_capacity(n_max);
    for &interview in &order[..n_max] {
        if interview >= population.len() {
            return Err(ModelError::InvalidInput {
                parameter: "order",
                reason: "names an interview outside the population",
            }
            .into());
        }
        state = state.step(population.interview(interview))?;
        points.push(state.point(z));
    }
    Ok(points)
}

/// Per-step running sums of the four tracked quantities.
#[derive(Debug, Clone)]
struct StepSums {
    true_mass: Vec<f64>,
    estimate: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl StepSums {
    fn new(steps: usize) -> Self {
        Self {
            true_mass: vec![0.0; steps],
            estimate: vec![0.0; steps],
            lower: vec![0.0; steps],
            upper: vec![0.0; steps],
        }
    }

    fn add(&mut self, points: &[MissingMassPoint]) {
        for (i, point) in points.iter().enumerate() {
            self.true_mass[i] += point.true_mass;
            self.estimate[i] += point.estimate;
            self.lower[i] += point.lower;
            self.upper[i] += point.upper;
        }
    }

    fn merge(mut self, other: Self) -> Self {
        for i in 0..self.true_mass.len() {
            self.true_mass[i] += other.true_mass[i];
            self.estimate[i] += other.estimate[i];
            self.lower[i] += other.lower[i];
            self.upper[i] += other.upper[i];
        }
        self
    }

    fn mean(&self, experiments: usize) -> Vec<MissingMassPoint> {
        let k = experiments as f64;
        (0..self.true_mass.len())
            .map(|i| MissingMassPoint {
                step: i + 1,
                true_mass: self.true_mass[i] / k,
                estimate: self.estimate[i] / k,
                lower: self.lower[i] / k,
                upper: self.upper[i] / k,
            })
            .collect()
    }
}

/// Averages missing-mass experiments over freshly generated populations.
#[derive(Debug, Clone)]
pub struct MissingMassSimulator {
    simulation: SimulationConfig,
    interviews: InterviewConfig,
    distribution: ThemeDistribution,
    cancel: CancelToken,
}

impl MissingMassSimulator {
    /// Simulator using `simulation.experiments` and `simulation.seed`, with
    /// populations shaped by `interviews`.
    pub fn new(simulation: SimulationConfig, interviews: InterviewConfig) -> Result<Self> {
        simulation.validate()?;
        interviews.validate()?;
        let distribution = ThemeDistribution::zipf(interviews.themes, interviews.zipf_exponent)?;
        Ok(Self {
            simulation,
            interviews,
            distribution,
            cancel: CancelToken::new(),
        })
    }

    /// Check `token` between experiments.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Population shape.
    pub fn interviews(&self) -> &InterviewConfig {
        &self.interviews
    }

    /// Run experiment `index`: generate its population and draw order, then
    /// track the first `n_max` steps.
    pub fn experiment(&self, index: usize, n_max: usize, z: f64) -> Result<Vec<MissingMassPoint>> {
        let mut rng = experiment_rng(self.simulation.seed, index);
        let population = InterviewPopulation::generate(
            self.interviews.interviews,
            self.interviews.mean_tokens,
            &self.distribution,
            &mut rng,
        )?;
        let order = draw_order(population.len(), &mut rng);
        run_experiment(&population, &order, n_max, z)
    }

    /// Mean true mass, estimate and band per step `1..=n_max`.
    pub fn aggregate(&self, n_max: usize, confidence: f64) -> Result<Vec<MissingMassPoint>> {
        self.aggregate_with_progress(n_max, confidence, |_, _| {})
    }

    /// [`aggregate`](Self::aggregate) with a progress callback receiving the
    /// completed fraction and a short status.
    pub fn aggregate_with_progress<P>(
        &self,
        n_max: usize,
        confidence: f64,
        mut progress: P,
    ) -> Result<Vec<MissingMassPoint>>
    where
        P: FnMut(f64, &str),
    {
        let z = Confidence::new(confidence)?.z_score();
        if n_max == 0 || n_max > self.interviews.interviews {
            return Err(ModelError::InvalidInput {
                parameter: "n_max",
                reason: "must be in [1, interviews]",
            }
            .into());
        }

        let experiments = self.simulation.experiments;
        info!(experiments, n_max, confidence, "aggregating missing-mass experiments");
        progress(0.0, "Simulating interview populations...");

        let mut sums = StepSums::new(n_max);
        let mut done = 0;
        while done < experiments {
            let batch = done..(done + PROGRESS_BATCH).min(experiments);
            let batch_len = batch.len();
            sums = sums.merge(self.sum_batch(batch, n_max, z)?);
            done += batch_len;
            debug!(done, experiments, "missing-mass batch complete");
            progress(done as f64 / experiments as f64, &format!("{done}/{experiments} experiments"));
        }

        info!(experiments, "missing-mass aggregation complete");
        Ok(sums.mean(experiments))
    }

    fn sum_batch(&self, batch: std::ops::Range<usize>, n_max: usize, z: f64) -> Result<StepSums> {
        let run = |mut acc: StepSums, i: usize| -> Result<StepSums> {
            self.cancel.check()?;
            acc.add(&self.experiment(i, n_max, z)?);
            Ok(acc)
        };

        #[cfg(feature = "parallel")]
        let sums = batch
            .into_par_iter()
            .try_fold(|| StepSums::new(n_max), run)
            .try_reduce(|| StepSums::new(n_max), |a, b| Ok(a.merge(b)))?;

        #[cfg(not(feature = "parallel"))]
        let sums = batch.into_iter().try_fold(StepSums::new(n_max), run)?;

        Ok(sums)
    }
}
