//! Good–Turing missing-mass estimation.
//!
//! After observing `m` tokens of which `f1` belong to themes seen exactly
//! once, the Good–Turing estimate of the probability that the next token
//! belongs to an unseen theme is
//!
//! ```text
//! R̂ = f1 / m        SE = sqrt(f1) / m
//! ```
//!
//! [`MissingMassState`] carries the running counts through one draw sequence.
//! It is advanced by a pure [`step`](MissingMassState::step) per interview, so
//! a whole experiment is a left fold over the draw order. When the state is
//! built from the full population's per-theme totals it also exposes the true
//! missing mass of the next draw, which the estimator is validated against.

use alloc::vec;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math;
use crate::types::ThemeId;

/// Good–Turing point estimate with its analytic standard error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoodTuringEstimate {
    /// `f1 / m`, or 0 before anything was observed.
    pub estimate: f64,
    /// `sqrt(f1) / m`, or 0 before anything was observed.
    pub std_error: f64,
}

impl GoodTuringEstimate {
    /// Estimate from `singletons` (f1) among `observed` (m) tokens.
    pub fn from_counts(singletons: u64, observed: u64) -> Self {
        if observed == 0 {
            return Self {
                estimate: 0.0,
                std_error: 0.0,
            };
        }
        let m = observed as f64;
        Self {
            estimate: singletons as f64 / m,
            std_error: math::sqrt(singletons as f64) / m,
        }
    }

    /// Symmetric band `R̂ ± z·SE`, clamped to [0, 1].
    pub fn band(&self, z: f64) -> (f64, f64) {
        let half_width = z * self.std_error;
        (
            (self.estimate - half_width).max(0.0),
            (self.estimate + half_width).min(1.0),
        )
    }
}

/// One step of a missing-mass experiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissingMassPoint {
    /// Number of interviews drawn so far (1-based).
    pub step: usize,
    /// Probability that the next token drawn is of an unseen theme.
    pub true_mass: f64,
    /// Good–Turing estimate `R̂`.
    pub estimate: f64,
    /// Lower end of the band.
    pub lower: f64,
    /// Upper end of the band.
    pub upper: f64,
}

/// Running state of a Good–Turing pass over one population.
///
/// `theme_totals[t]` is how many tokens of theme `t` the population holds in
/// total. Themes with a total of zero can never be observed.
#[derive(Debug, Clone)]
pub struct MissingMassState<'a> {
    theme_totals: &'a [u32],
    total_tokens: u64,
    seen: Vec<u32>,
    singletons: u64,
    observed: u64,
    unseen_tokens: u64,
    steps: usize,
}

impl<'a> MissingMassState<'a> {
    /// Fresh state with nothing observed.
    pub fn new(theme_totals: &'a [u32]) -> Self {
        let total_tokens = theme_totals.iter().map(|&c| u64::from(c)).sum();
        Self {
            theme_totals,
            total_tokens,
            seen: vec![0; theme_totals.len()],
            singletons: 0,
            observed: 0,
            unseen_tokens: total_tokens,
            steps: 0,
        }
    }

    /// Advance by one interview's tokens.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if a token names a theme outside the population
    /// or is seen more often than the population holds it. The state is left
    /// unchanged in that case (it is consumed either way).
    pub fn step(mut self, tokens: &[ThemeId]) -> Result<Self> {
        self.observe(tokens)?;
        Ok(self)
    }

    /// In-place form of [`step`](Self::step).
    ///
    /// On error no count has been modified.
    pub fn observe(&mut self, tokens: &[ThemeId]) -> Result<()> {
        for &theme in tokens {
            if theme as usize >= self.theme_totals.len() {
                return Err(Error::invalid("theme", "is outside the population"));
            }
        }

        for (i, &theme) in tokens.iter().enumerate() {
            let t = theme as usize;
            if self.seen[t] >= self.theme_totals[t] {
                // Undo this interview's partial update before reporting.
                for &earlier in &tokens[..i] {
                    self.unsee(earlier as usize);
                }
                return Err(Error::invalid("theme", "is drawn more often than it occurs"));
            }
            self.see(t);
        }

        self.observed += tokens.len() as u64;
        self.steps += 1;
        Ok(())
    }

    fn see(&mut self, t: usize) {
        let previous = self.seen[t];
        self.seen[t] = previous + 1;
        match previous {
            0 => {
                self.singletons += 1;
                self.unseen_tokens -= u64::from(self.theme_totals[t]);
            }
            1 => self.singletons -= 1,
            _ => {}
        }
    }

    fn unsee(&mut self, t: usize) {
        let current = self.seen[t];
        self.seen[t] = current - 1;
        match current {
            1 => {
                self.singletons -= 1;
                self.unseen_tokens += u64::from(self.theme_totals[t]);
            }
            2 => self.singletons += 1,
            _ => {}
        }
    }

    /// Interviews observed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Tokens observed so far (`m`).
    pub fn tokens_observed(&self) -> u64 {
        self.observed
    }

    /// Themes seen exactly once so far (`f1`).
    pub fn singletons(&self) -> u64 {
        self.singletons
    }

    /// Number of distinct themes seen so far.
    pub fn distinct_seen(&self) -> usize {
        self.seen.iter().filter(|&&c| c > 0).count()
    }

    /// Total tokens in the population (`N`).
    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    /// Share of the population's tokens that belong to themes not yet seen
    /// (`U`), without any correction for tokens already drawn.
    pub fn unseen_share(&self) -> f64 {
        if self.total_tokens == 0 {
            0.0
        } else {
            self.unseen_tokens as f64 / self.total_tokens as f64
        }
    }

    /// Probability that the next token drawn belongs to an unseen theme.
    ///
    /// Unseen tokens over the tokens still undrawn, i.e. `U / (1 − m/N)`.
    /// Zero once the population is exhausted.
    pub fn true_missing_mass(&self) -> f64 {
        if self.total_tokens > self.observed {
            self.unseen_tokens as f64 / (self.total_tokens - self.observed) as f64
        } else {
            0.0
        }
    }

    /// Good–Turing estimate from the current counts.
    pub fn estimate(&self) -> GoodTuringEstimate {
        GoodTuringEstimate::from_counts(self.singletons, self.observed)
    }

    /// Snapshot of the current step with a band of half-width `z·SE`.
    pub fn point(&self, z: f64) -> MissingMassPoint {
        let estimate = self.estimate();
        let (lower, upper) = estimate.band(z);
        MissingMassPoint {
            step: self.steps,
            true_mass: self.true_missing_mass(),
            estimate: estimate.estimate,
            lower,
            upper,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Z_95;

    #[test]
    fn test_estimate_from_counts() {
        let empty = GoodTuringEstimate::from_counts(0, 0);
        assert_eq!(empty.estimate, 0.0);
        assert_eq!(empty.std_error, 0.0);

        let est = GoodTuringEstimate::from_counts(4, 16);
        assert_eq!(est.estimate, 0.25);
        assert_eq!(est.std_error, 0.125);
    }

    #[test]
    fn test_band_clamps() {
        let est = GoodTuringEstimate::from_counts(1, 2);
        let (lo, hi) = est.band(Z_95);
        assert_eq!(lo, 0.0);
        assert!(hi <= 1.0);

        let est = GoodTuringEstimate::from_counts(1, 1);
        assert_eq!(est.band(Z_95), (0.0, 1.0));
    }

    #[test]
    fn test_singleton_transitions() {
        // theme 0: 3 tokens, theme 1: 1 token, theme 2: 2 tokens
        let totals = [3, 1, 2];
        let state = MissingMassState::new(&totals);
        assert_eq!(state.total_tokens(), 6);
        assert_eq!(state.true_missing_mass(), 1.0);

        let state = state.step(&[0, 1]).unwrap();
        assert_eq!(state.singletons(), 2);
        assert_eq!(state.tokens_observed(), 2);
        // Unseen: theme 2 (2 tokens) of 4 remaining
        assert_eq!(state.true_missing_mass(), 0.5);
        assert!((state.unseen_share() - 2.0 / 6.0).abs() < 1e-12);

        let state = state.step(&[0]).unwrap();
        assert_eq!(state.singletons(), 1);
        assert_eq!(state.distinct_seen(), 2);

        // Population exhausted; theme 1 is still the only singleton
        let state = state.step(&[2, 0, 2]).unwrap();
        assert_eq!(state.singletons(), 1);
        assert_eq!(state.steps(), 3);
        assert_eq!(state.true_missing_mass(), 0.0);
        assert!((state.estimate().estimate - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_interview_still_counts_as_step() {
        let totals = [2];
        let state = MissingMassState::new(&totals).step(&[]).unwrap();
        assert_eq!(state.steps(), 1);
        let point = state.point(Z_95);
        assert_eq!(point.step, 1);
        assert_eq!(point.estimate, 0.0);
        assert_eq!(point.true_mass, 1.0);
    }

    #[test]
    fn test_rejects_unknown_theme() {
        let totals = [1, 1];
        let result = MissingMassState::new(&totals).step(&[0, 5]);
        assert!(matches!(
            result,
            Err(Error::InvalidInput { parameter: "theme", .. })
        ));
    }

    #[test]
    fn test_overdraw_leaves_state_unchanged() {
        let totals = [1, 2];
        let mut state = MissingMassState::new(&totals);
        state.observe(&[1]).unwrap();

        let before = (state.singletons(), state.tokens_observed(), state.true_missing_mass());
        assert!(state.observe(&[0, 1, 1]).is_err());
        let after = (state.singletons(), state.tokens_observed(), state.true_missing_mass());
        assert_eq!(before, after);
        assert_eq!(state.steps(), 1);
    }

    #[test]
    fn test_fold_over_draws() {
        let totals = [2, 1, 1];
        let draws: [&[ThemeId]; 3] = [&[0], &[0, 1], &[2]];
        let final_state = draws
            .iter()
            .try_fold(MissingMassState::new(&totals), |state, tokens| state.step(tokens))
            .unwrap();
        assert_eq!(final_state.steps(), 3);
        assert_eq!(final_state.tokens_observed(), 4);
        // theme 1 and theme 2 are singletons
        assert_eq!(final_state.singletons(), 2);
        assert_eq!(final_state.point(Z_95).estimate, 0.5);
    }
}
