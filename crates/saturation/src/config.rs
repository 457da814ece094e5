//! Configuration for Monte Carlo coverage and missing-mass simulations.
//!
//! Every simulation entry point takes its configuration explicitly, so two
//! runs with different population sizes or experiment counts never interfere.

use serde::{Deserialize, Serialize};

use saturation_core::constants::{
    DEFAULT_EXPERIMENTS, DEFAULT_INTERVIEWS, DEFAULT_MEAN_TOKENS, DEFAULT_N_MAX, DEFAULT_POPULATION,
    DEFAULT_P_FLOOR, DEFAULT_P_MAX, DEFAULT_P_TOLERANCE, DEFAULT_SEED, DEFAULT_THEMES,
    DEFAULT_ZIPF_EXPONENT,
};

use crate::error::{Error, Result};

/// Settings shared by the coverage engine and the missing-mass aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // =========================================================================
    // Monte Carlo size
    // =========================================================================
    /// Population size (POP) of each simulated experiment.
    ///
    /// Draws are without replacement, so no experiment draws more than this.
    /// Default: 1,000.
    pub population: usize,

    /// Number of independent experiments (E) per evaluation.
    ///
    /// The Monte Carlo standard error of a coverage near 95% is roughly
    /// `sqrt(0.05 · 0.95 / E)`, about 0.7 points at the default. Default: 1,000.
    pub experiments: usize,

    // =========================================================================
    // Search limits
    // =========================================================================
    /// Largest trial count an integer search may examine. Default: 2,000.
    pub n_max: u64,

    /// Largest probability a real search may examine. Default: 0.40.
    pub p_max: f64,

    /// Smallest starting lower bound for a real search. Default: 1e-4.
    pub p_floor: f64,

    /// Width at which a real bisection stops. Default: 1e-4.
    pub p_tolerance: f64,

    // =========================================================================
    // Reproducibility
    // =========================================================================
    /// Base seed; experiment `i` uses a stream derived from `(seed, i)`.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population: DEFAULT_POPULATION,
            experiments: DEFAULT_EXPERIMENTS,
            n_max: DEFAULT_N_MAX,
            p_max: DEFAULT_P_MAX,
            p_floor: DEFAULT_P_FLOOR,
            p_tolerance: DEFAULT_P_TOLERANCE,
            seed: DEFAULT_SEED,
        }
    }
}

impl SimulationConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default-sized runs: POP = 1,000 and E = 1,000.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Small runs for development:
    /// - 200 experiments
    /// - real searches stop at a width of 5e-4
    pub fn quick() -> Self {
        Self {
            experiments: 200,
            p_tolerance: 5e-4,
            ..Default::default()
        }
    }

    /// Large runs for publication-quality curves:
    /// - 5,000 experiments
    /// - real searches stop at a width of 5e-5
    pub fn thorough() -> Self {
        Self {
            experiments: 5_000,
            p_tolerance: 5e-5,
            ..Default::default()
        }
    }

    /// Settings for calibration tests that cross-check theory and simulation:
    /// - 1,000 experiments on a population of 1,000
    /// - 1,000 trial cap (no draw past the population is informative)
    pub fn calibration() -> Self {
        Self {
            n_max: 1_000,
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Set the population size.
    pub fn population(mut self, population: usize) -> Self {
        assert!(population > 0, "population must be positive");
        self.population = population;
        self
    }

    /// Set the number of experiments.
    pub fn experiments(mut self, experiments: usize) -> Self {
        assert!(experiments > 0, "experiments must be positive");
        self.experiments = experiments;
        self
    }

    /// Set the trial cap for integer searches.
    pub fn n_max(mut self, n_max: u64) -> Self {
        assert!(n_max > 0, "n_max must be positive");
        self.n_max = n_max;
        self
    }

    /// Set the probability cap for real searches.
    pub fn p_max(mut self, p_max: f64) -> Self {
        assert!(p_max > 0.0 && p_max <= 1.0, "p_max must be in (0, 1]");
        assert!(p_max > self.p_floor, "p_max must be > p_floor");
        self.p_max = p_max;
        self
    }

    /// Set the floor of the real search bracket.
    pub fn p_floor(mut self, p_floor: f64) -> Self {
        assert!(p_floor > 0.0 && p_floor < 1.0, "p_floor must be in (0, 1)");
        assert!(p_floor < self.p_max, "p_floor must be < p_max");
        self.p_floor = p_floor;
        self
    }

    /// Set the real bisection tolerance.
    pub fn p_tolerance(mut self, tolerance: f64) -> Self {
        assert!(tolerance > 0.0, "p_tolerance must be positive");
        self.p_tolerance = tolerance;
        self
    }

    /// Set the base seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The effective trial cap when drawing without replacement.
    pub fn trial_cap(&self) -> u64 {
        self.n_max.min(self.population as u64)
    }

    /// Check if the configuration is valid.
    ///
    /// Builder methods reject bad values eagerly; this catches configurations
    /// assembled by struct literal or deserialization.
    pub fn validate(&self) -> Result<()> {
        if self.population == 0 {
            return Err(Error::InvalidConfig("population must be positive".to_string()));
        }
        if self.experiments == 0 {
            return Err(Error::InvalidConfig("experiments must be positive".to_string()));
        }
        if self.n_max == 0 {
            return Err(Error::InvalidConfig("n_max must be positive".to_string()));
        }
        if !(self.p_max > 0.0 && self.p_max <= 1.0) {
            return Err(Error::InvalidConfig("p_max must be in (0, 1]".to_string()));
        }
        if !(self.p_floor > 0.0 && self.p_floor < self.p_max) {
            return Err(Error::InvalidConfig("p_floor must be in (0, p_max)".to_string()));
        }
        if !(self.p_tolerance > 0.0 && self.p_tolerance.is_finite()) {
            return Err(Error::InvalidConfig("p_tolerance must be positive".to_string()));
        }
        Ok(())
    }
}

/// Shape of the synthetic interview population used for missing-mass runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewConfig {
    /// Interviews per population. Default: 200.
    pub interviews: usize,

    /// Distinct themes (T). Default: 800.
    ///
    /// Higher values make the tail rarer.
    pub themes: usize,

    /// Mean of the Poisson token count per interview. Default: 20.
    pub mean_tokens: f64,

    /// Zipf exponent `s` of the theme distribution (`P(t) ∝ (t+1)^−s`).
    /// Default: 1.05.
    pub zipf_exponent: f64,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            interviews: DEFAULT_INTERVIEWS,
            themes: DEFAULT_THEMES,
            mean_tokens: DEFAULT_MEAN_TOKENS,
            zipf_exponent: DEFAULT_ZIPF_EXPONENT,
        }
    }
}

impl InterviewConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of interviews.
    pub fn interviews(mut self, interviews: usize) -> Self {
        assert!(interviews > 0, "interviews must be positive");
        self.interviews = interviews;
        self
    }

    /// Set the number of themes.
    pub fn themes(mut self, themes: usize) -> Self {
        assert!(themes > 0, "themes must be positive");
        assert!(themes <= u32::MAX as usize, "themes must fit in a theme id");
        self.themes = themes;
        self
    }

    /// Set the mean token count per interview.
    pub fn mean_tokens(mut self, mean: f64) -> Self {
        assert!(mean > 0.0 && mean.is_finite(), "mean_tokens must be positive");
        self.mean_tokens = mean;
        self
    }

    /// Set the Zipf exponent.
    pub fn zipf_exponent(mut self, s: f64) -> Self {
        assert!(s >= 0.0 && s.is_finite(), "zipf_exponent must be non-negative");
        self.zipf_exponent = s;
        self
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        if self.interviews == 0 {
            return Err(Error::InvalidConfig("interviews must be positive".to_string()));
        }
        if self.themes == 0 || self.themes > u32::MAX as usize {
            return Err(Error::InvalidConfig(
                "themes must be positive and fit in a theme id".to_string(),
            ));
        }
        if !(self.mean_tokens > 0.0 && self.mean_tokens.is_finite()) {
            return Err(Error::InvalidConfig("mean_tokens must be positive".to_string()));
        }
        if !(self.zipf_exponent >= 0.0 && self.zipf_exponent.is_finite()) {
            return Err(Error::InvalidConfig(
                "zipf_exponent must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
