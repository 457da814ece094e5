//! Figure sweep infrastructure.
//!
//! This module provides:
//! - `FigureConfig`: grids, confidences and simulation sizes, with presets
//! - `SweepRunner`: builds the requested figures in order, reporting progress
//! - `SweepResults`: the figure tables and how long they took
//!
//! # Example
//!
//! ```no_run
//! use saturation_bench::sweep::{FigureConfig, SweepMode, SweepRunner};
//!
//! let config = FigureConfig::quick();
//! let results = SweepRunner::new()
//!     .run(&config, SweepMode::Theory, |progress, task| {
//!         println!("{:.0}% - {}", progress * 100.0, task);
//!     })
//!     .unwrap();
//!
//! println!("{}", saturation_bench::output::to_markdown(&results));
//! ```

use std::time::{Duration, Instant};

use tracing::info;

use saturation::{
    CancelToken, Confidence, CoverageEngine, Error, InterviewConfig, MissingMassSimulator,
    Result, SimulationConfig,
};

use crate::figures::{self, grid, trial_grid, Figure, FigureId};

/// Preset levels for figure detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigurePreset {
    /// Coarse grids and few experiments, for checking the pipeline
    Quick,
    /// The published grids: POP = 1,000 and E = 1,000
    Full,
}

impl FigurePreset {
    /// Get a short name for this preset
    pub fn name(&self) -> &'static str {
        match self {
            FigurePreset::Quick => "quick",
            FigurePreset::Full => "full",
        }
    }
}

/// Which group of figures to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// Closed-form figures 1 to 3
    Theory,
    /// Monte Carlo overlays of figures 1 to 3
    MonteCarlo,
    /// Figure 4
    MissingMass,
    /// Everything
    All,
}

impl SweepMode {
    /// Figures built in this mode, in build order.
    pub fn figures(&self) -> Vec<FigureId> {
        let theory = [FigureId::SampleSize, FigureId::Detectable, FigureId::Occurrences];
        let monte_carlo = [
            FigureId::SampleSizeMc,
            FigureId::DetectableMc,
            FigureId::OccurrencesMc,
            FigureId::OccurrenceQuantiles,
        ];
        match self {
            SweepMode::Theory => theory.to_vec(),
            SweepMode::MonteCarlo => monte_carlo.to_vec(),
            SweepMode::MissingMass => vec![FigureId::MissingMass],
            SweepMode::All => theory
                .into_iter()
                .chain(monte_carlo)
                .chain([FigureId::MissingMass])
                .collect(),
        }
    }
}

/// Configuration for a figure sweep.
#[derive(Debug, Clone)]
pub struct FigureConfig {
    /// Preset level (informational)
    pub preset: FigurePreset,
    /// Population, experiments and search limits for every simulation
    pub simulation: SimulationConfig,
    /// Interview population shape for the missing-mass figure
    pub interviews: InterviewConfig,
    /// Confidence levels of figures 1 and 2, in percent
    pub confidences: Vec<f64>,
    /// Occurrence thresholds of figure 3
    pub occurrences: Vec<u64>,
    /// Confidence of figures 3 and 4, in percent
    pub fixed_confidence: f64,
    /// Smallest theme probability on p axes
    pub p_min: f64,
    /// Largest theme probability on p axes
    pub p_max: f64,
    /// Step of the closed-form p grid
    pub theory_p_step: f64,
    /// Step of the simulated p grid
    pub mc_p_step: f64,
    /// Largest n on the n axis of figure 2
    pub n_max: u64,
    /// Step of the simulated n grid
    pub mc_n_step: u64,
    /// Probabilities at which figure 3 is simulated by bisection
    pub occurrence_ps: Vec<f64>,
    /// Interviews tracked in figure 4
    pub missing_mass_steps: usize,
    /// Trial cap for the closed-form curves of figure 3
    pub theory_n_cap: u64,
}

impl FigureConfig {
    /// Quick preset: coarse simulated grids for fast feedback
    ///
    /// - 200 experiments on a population of 1,000
    /// - p every 0.05, n every 25
    /// - 200 interviews per missing-mass population
    pub fn quick() -> Self {
        Self {
            preset: FigurePreset::Quick,
            simulation: SimulationConfig::quick(),
            interviews: InterviewConfig::new(),
            mc_p_step: 0.05,
            mc_n_step: 25,
            occurrence_ps: vec![0.01, 0.05, 0.2],
            ..Self::full()
        }
    }

    /// Full preset: the published grids
    ///
    /// - 1,000 experiments on a population of 1,000
    /// - closed forms: p from 0.01 to 0.40 every 0.002, n from 1 to 300
    /// - simulations: p every 0.01, n every 5
    /// - figure 3 simulated at p ∈ {0.01, 0.02, 0.05, 0.1, 0.2, 0.4}
    /// - figure 4 over 1,000 interviews, tracked for 200 steps
    pub fn full() -> Self {
        Self {
            preset: FigurePreset::Full,
            simulation: SimulationConfig::balanced(),
            interviews: InterviewConfig::new().interviews(1_000),
            confidences: vec![90.0, 95.0, 99.0],
            occurrences: vec![1, 2, 3],
            fixed_confidence: 95.0,
            p_min: 0.01,
            p_max: 0.40,
            theory_p_step: 0.002,
            mc_p_step: 0.01,
            n_max: 300,
            mc_n_step: 5,
            occurrence_ps: vec![0.01, 0.02, 0.05, 0.1, 0.2, 0.4],
            missing_mass_steps: 200,
            theory_n_cap: saturation_core::constants::DEFAULT_N_MAX,
        }
    }

    /// Closed-form p grid.
    pub fn theory_ps(&self) -> Vec<f64> {
        grid(self.p_min, self.p_max, self.theory_p_step)
    }

    /// Simulated p grid.
    pub fn mc_ps(&self) -> Vec<f64> {
        grid(self.p_min, self.p_max, self.mc_p_step)
    }

    /// Closed-form n grid.
    pub fn theory_ns(&self) -> Vec<u64> {
        trial_grid(self.n_max, 1)
    }

    /// Simulated n grid.
    pub fn mc_ns(&self) -> Vec<u64> {
        trial_grid(self.n_max, self.mc_n_step)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        self.interviews.validate()?;
        for &c in self.confidences.iter().chain([&self.fixed_confidence]) {
            Confidence::new(c)?;
        }
        if self.confidences.is_empty() || self.occurrences.is_empty() {
            return Err(Error::InvalidConfig(
                "confidences and occurrences must not be empty".to_string(),
            ));
        }
        if self.occurrences.contains(&0) {
            return Err(Error::InvalidConfig("occurrences must be at least 1".to_string()));
        }
        if !(self.p_min > 0.0 && self.p_min <= self.p_max && self.p_max < 1.0) {
            return Err(Error::InvalidConfig(
                "p axis must satisfy 0 < p_min <= p_max < 1".to_string(),
            ));
        }
        if !(self.theory_p_step > 0.0 && self.mc_p_step > 0.0) {
            return Err(Error::InvalidConfig("p steps must be positive".to_string()));
        }
        if self.n_max == 0 || self.mc_n_step == 0 || self.theory_n_cap == 0 {
            return Err(Error::InvalidConfig(
                "n_max, mc_n_step and theory_n_cap must be positive".to_string(),
            ));
        }
        if self.occurrence_ps.iter().any(|&p| !(p > 0.0 && p < 1.0)) {
            return Err(Error::InvalidConfig(
                "occurrence probabilities must be in (0, 1)".to_string(),
            ));
        }
        if self.missing_mass_steps == 0 || self.missing_mass_steps > self.interviews.interviews {
            return Err(Error::InvalidConfig(
                "missing_mass_steps must be in [1, interviews]".to_string(),
            ));
        }
        Ok(())
    }
}

/// Figures produced by one sweep.
#[derive(Debug, Clone)]
pub struct SweepResults {
    /// Configuration the figures were built with
    pub config: FigureConfig,
    /// Figures in build order
    pub figures: Vec<Figure>,
    /// Total execution time
    pub total_time: Duration,
}

impl SweepResults {
    /// Create empty results.
    pub fn new(config: FigureConfig) -> Self {
        Self {
            config,
            figures: Vec::new(),
            total_time: Duration::ZERO,
        }
    }

    /// Add a figure.
    pub fn push(&mut self, figure: Figure) {
        self.figures.push(figure);
    }

    /// The figure with the given id, if it was built.
    pub fn figure(&self, id: FigureId) -> Option<&Figure> {
        self.figures.iter().find(|f| f.id == id)
    }
}

/// Figure sweep runner.
///
/// Figures are built one after another; the experiments behind each
/// simulated point run in parallel inside the engines.
#[derive(Debug, Clone, Default)]
pub struct SweepRunner {
    cancel: CancelToken,
}

impl SweepRunner {
    /// Create a new sweep runner
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop at the next experiment once `token` is cancelled.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// The runner's cancellation token.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Build the figures of `mode` with a progress callback.
    ///
    /// # Arguments
    /// * `config` - Sweep configuration
    /// * `progress` - Callback receiving (progress_fraction, current_task)
    ///
    /// Each figure gets an equal share of the progress range.
    pub fn run<F>(&self, config: &FigureConfig, mode: SweepMode, mut progress: F) -> Result<SweepResults>
    where
        F: FnMut(f64, &str),
    {
        config.validate()?;
        let start = Instant::now();
        let mut results = SweepResults::new(config.clone());

        let ids = mode.figures();
        let count = ids.len() as f64;
        info!(preset = config.preset.name(), figures = ids.len(), "starting figure sweep");
        progress(0.0, "Preparing...");

        for (i, &id) in ids.iter().enumerate() {
            self.cancel.check()?;
            let figure = self.build(config, id, |fraction, task| {
                progress((i as f64 + fraction) / count, task)
            })?;
            info!(
                figure = id.name(),
                rows = figure.table.len(),
                columns = figure.table.columns.len(),
                "figure complete"
            );
            results.push(figure);
        }

        progress(1.0, "Complete");
        results.total_time = start.elapsed();
        info!(elapsed_s = results.total_time.as_secs_f64(), "figure sweep complete");
        Ok(results)
    }

    /// Build one figure.
    pub fn build<F>(&self, config: &FigureConfig, id: FigureId, mut progress: F) -> Result<Figure>
    where
        F: FnMut(f64, &str),
    {
        let c = config.fixed_confidence;
        let series = match id {
            FigureId::SampleSize => {
                figures::sample_size_theory(&config.confidences, &config.theory_ps())?
            }
            FigureId::Detectable => {
                figures::detectable_theory(&config.confidences, &config.theory_ns())?
            }
            FigureId::Occurrences => figures::occurrences_theory(
                c,
                &config.occurrences,
                &config.theory_ps(),
                config.theory_n_cap,
            )?,
            FigureId::SampleSizeMc => figures::sample_size_overlay(
                &self.engine(config)?,
                &config.confidences,
                &config.mc_ps(),
                &mut progress,
            )?,
            FigureId::DetectableMc => figures::detectable_overlay(
                &self.engine(config)?,
                &config.confidences,
                &config.mc_ns(),
                &mut progress,
            )?,
            FigureId::OccurrencesMc => figures::occurrences_overlay(
                &self.engine(config)?,
                c,
                &config.occurrences,
                &config.occurrence_ps,
                &mut progress,
            )?,
            FigureId::OccurrenceQuantiles => figures::occurrence_quantiles(
                &self.engine(config)?,
                c,
                &config.occurrences,
                &config.mc_ps(),
                &mut progress,
            )?,
            FigureId::MissingMass => {
                let simulator =
                    MissingMassSimulator::new(config.simulation.clone(), config.interviews.clone())?
                        .with_cancel_token(self.cancel.clone());
                return figures::missing_mass(&simulator, config.missing_mass_steps, c, progress);
            }
        };
        progress(1.0, id.name());
        Ok(Figure::from_series(id, &series))
    }

    fn engine(&self, config: &FigureConfig) -> Result<CoverageEngine> {
        Ok(CoverageEngine::new(config.simulation.clone())?.with_cancel_token(self.cancel.clone()))
    }
}
