//! Interview populations for missing-mass experiments.

use rand::Rng;
use rand_distr::{Distribution, Poisson};

use saturation_core::{Error as ModelError, ThemeId};

use crate::config::InterviewConfig;
use crate::error::{Error, Result};

/// Zipf-shaped distribution over `T` themes, `P(t) ∝ (t+1)^−s`.
///
/// Sampling inverts the cumulative distribution by binary search.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeDistribution {
    probabilities: Vec<f64>,
    cdf: Vec<f64>,
}

impl ThemeDistribution {
    /// Normalized Zipf weights over `themes` themes with exponent `exponent`.
    ///
    /// # Errors
    ///
    /// Fails when `themes` is zero or does not fit a [`ThemeId`], or when the
    /// exponent is negative or not finite.
    pub fn zipf(themes: usize, exponent: f64) -> Result<Self> {
        if themes == 0 || themes > ThemeId::MAX as usize {
            return Err(ModelError::InvalidInput {
                parameter: "T",
                reason: "must be positive and fit in a theme id",
            }
            .into());
        }
        if !(exponent >= 0.0 && exponent.is_finite()) {
            return Err(ModelError::InvalidInput {
                parameter: "zipf_s",
                reason: "must be finite and non-negative",
            }
            .into());
        }

        let weights: Vec<f64> = (1..=themes).map(|rank| (rank as f64).powf(-exponent)).collect();
        let total: f64 = weights.iter().sum();
        let probabilities: Vec<f64> = weights.iter().map(|w| w / total).collect();

        let mut acc = 0.0;
        let mut cdf: Vec<f64> = probabilities
            .iter()
            .map(|p| {
                acc += p;
                acc
            })
            .collect();
        // Force the last to be exactly 1.0 so every u in [0, 1) maps to a theme.
        if let Some(last) = cdf.last_mut() {
            *last = 1.0;
        }

        Ok(Self { probabilities, cdf })
    }

    /// Number of themes.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Always false; a distribution has at least one theme.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Probability of each theme, most frequent first.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Theme whose cumulative probability first reaches `u`.
    #[inline]
    pub fn theme_at(&self, u: f64) -> ThemeId {
        let idx = self.cdf.partition_point(|&c| c < u).min(self.cdf.len() - 1);
        idx as ThemeId
    }

    /// Draw one theme.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ThemeId {
        self.theme_at(rng.random::<f64>())
    }
}

/// A finite population of interviews and the theme tokens each one emits.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewPopulation {
    interviews: Vec<Vec<ThemeId>>,
    theme_totals: Vec<u32>,
    total_tokens: u64,
}

impl InterviewPopulation {
    /// Generate a population per `config`, building its theme distribution.
    pub fn build<R: Rng + ?Sized>(config: &InterviewConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let distribution = ThemeDistribution::zipf(config.themes, config.zipf_exponent)?;
        Self::generate(config.interviews, config.mean_tokens, &distribution, rng)
    }

    /// Generate `interviews` interviews, each with a Poisson(`mean_tokens`)
    /// number of tokens drawn i.i.d. from `distribution`.
    pub fn generate<R: Rng + ?Sized>(
        interviews: usize,
        mean_tokens: f64,
        distribution: &ThemeDistribution,
        rng: &mut R,
    ) -> Result<Self> {
        let poisson = Poisson::new(mean_tokens)
            .map_err(|e| Error::InvalidConfig(format!("mean_tokens: {e}")))?;

        let mut theme_totals = vec![0u32; distribution.len()];
        let mut total_tokens = 0u64;
        let mut population = Vec::with_capacity(interviews);
        for _ in 0..interviews {
            let count = poisson.sample(rng) as usize;
            let tokens: Vec<ThemeId> = (0..count).map(|_| distribution.sample(rng)).collect();
            for &theme in &tokens {
                theme_totals[theme as usize] += 1;
            }
            total_tokens += tokens.len() as u64;
            population.push(tokens);
        }

        Ok(Self {
            interviews: population,
            theme_totals,
            total_tokens,
        })
    }

    /// Population from explicit token lists over `themes` themes.
    ///
    /// # Errors
    ///
    /// Fails if a token names a theme `>= themes`.
    pub fn from_interviews(interviews: Vec<Vec<ThemeId>>, themes: usize) -> Result<Self> {
        let mut theme_totals = vec![0u32; themes];
        let mut total_tokens = 0u64;
        for &theme in interviews.iter().flatten() {
            let slot = theme_totals
                .get_mut(theme as usize)
                .ok_or(ModelError::InvalidInput {
                    parameter: "theme",
                    reason: "is outside the population",
                })?;
            *slot += 1;
            total_tokens += 1;
        }
        Ok(Self {
            interviews,
            theme_totals,
            total_tokens,
        })
    }

    /// Number of interviews.
    pub fn len(&self) -> usize {
        self.interviews.len()
    }

    /// Whether there are no interviews.
    pub fn is_empty(&self) -> bool {
        self.interviews.is_empty()
    }

    /// Tokens emitted by interview `index`.
    pub fn interview(&self, index: usize) -> &[ThemeId] {
        &self.interviews[index]
    }

    /// All interviews.
    pub fn interviews(&self) -> &[Vec<ThemeId>] {
        &self.interviews
    }

    /// Tokens per theme across the whole population.
    pub fn theme_totals(&self) -> &[u32] {
        &self.theme_totals
    }

    /// Tokens across the whole population (`N`).
    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }
}
