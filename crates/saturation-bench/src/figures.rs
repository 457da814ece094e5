//! Figure data builders.
//!
//! Each builder returns the series of one figure. Closed-form figures are
//! cheap and evaluated on a fine grid; Monte Carlo overlays pair every
//! simulated curve with the closed form evaluated on the same coarse grid,
//! so the two can be compared point by point.
//!
//! Nothing here renders anything: a figure is a [`Table`] of values, with
//! gaps where a value is unattainable.

use serde::{Deserialize, Serialize};
use tracing::debug;

use saturation::output::Table;
use saturation::{
    missing_mass_series, CoverageEngine, MissingMassSimulator, Point, Result, Series,
};
use saturation_core::models::{probability_from_trials, trials_for_at_least, trials_from_probability};

/// Grid values are rounded to this many decimal places.
const GRID_DECIMALS: i32 = 6;

/// Evenly spaced values from `start` to `stop` inclusive.
///
/// Values are computed by index rather than by repeated addition and rounded,
/// so `grid(0.01, 0.40, 0.01)` contains exactly `0.4`.
pub fn grid(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || stop < start {
        return Vec::new();
    }
    let scale = 10f64.powi(GRID_DECIMALS);
    let count = ((stop - start) / step + 1e-9).floor() as usize + 1;
    (0..count)
        .map(|i| ((start + i as f64 * step) * scale).round() / scale)
        .collect()
}

/// Trial counts `1, 1 + step, …` up to `n_max`.
pub fn trial_grid(n_max: u64, step: u64) -> Vec<u64> {
    (1..=n_max).step_by(step.max(1) as usize).collect()
}

/// Which figure a table holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FigureId {
    /// Fig 1: trials needed vs theme probability, one curve per confidence.
    SampleSize,
    /// Fig 1 with simulated minima.
    SampleSizeMc,
    /// Fig 2: detectable probability vs trials, one curve per confidence.
    Detectable,
    /// Fig 2 with simulated minima.
    DetectableMc,
    /// Fig 3: trials needed vs theme probability, one curve per occurrence
    /// threshold.
    Occurrences,
    /// Fig 3 with simulated minima found by bisection.
    OccurrencesMc,
    /// Fig 3 from quantiles of per-experiment minima.
    OccurrenceQuantiles,
    /// Fig 4: true missing mass vs the Good–Turing band.
    MissingMass,
}

impl FigureId {
    /// Short name, used for file names.
    pub fn name(&self) -> &'static str {
        match self {
            FigureId::SampleSize => "fig1",
            FigureId::SampleSizeMc => "fig1-mc",
            FigureId::Detectable => "fig2",
            FigureId::DetectableMc => "fig2-mc",
            FigureId::Occurrences => "fig3",
            FigureId::OccurrencesMc => "fig3-mc",
            FigureId::OccurrenceQuantiles => "fig3-mc-quantile",
            FigureId::MissingMass => "fig4-mc",
        }
    }

    /// Human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            FigureId::SampleSize | FigureId::SampleSizeMc => "Trials needed vs theme probability",
            FigureId::Detectable | FigureId::DetectableMc => "Detectable probability vs trials",
            FigureId::Occurrences | FigureId::OccurrencesMc => {
                "Trials needed for at least O occurrences (C = 95%)"
            }
            FigureId::OccurrenceQuantiles => {
                "Quantile of per-experiment trials for at least O occurrences (C = 95%)"
            }
            FigureId::MissingMass => "Missing mass vs trials",
        }
    }

    /// Label of the x column.
    pub fn x_label(&self) -> &'static str {
        match self {
            FigureId::Detectable | FigureId::DetectableMc | FigureId::MissingMass => "n",
            _ => "p",
        }
    }

    /// Whether building the figure runs simulations.
    pub fn is_simulated(&self) -> bool {
        !matches!(
            self,
            FigureId::SampleSize | FigureId::Detectable | FigureId::Occurrences
        )
    }
}

/// One figure's data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// Which figure this is.
    pub id: FigureId,
    /// Values, one column per series.
    pub table: Table,
}

impl Figure {
    /// Lay `series` out as figure `id`.
    pub fn from_series<P: saturation::series::TablePoint>(id: FigureId, series: &[Series<P>]) -> Self {
        Self {
            id,
            table: Table::from_series(id.name(), id.x_label(), series),
        }
    }
}

fn confidence_label(prefix: &str, confidence: f64) -> String {
    format!("{prefix} C={confidence}%")
}

fn occurrence_label(prefix: &str, occurrences: u64) -> String {
    format!("{prefix} O={occurrences}")
}

/// Interleave simulated and closed-form curves as `MC a, Th a, MC b, Th b, …`.
fn paired(simulated: Vec<Series>, theory: Vec<Series>) -> Vec<Series> {
    simulated
        .into_iter()
        .zip(theory)
        .flat_map(|(mc, th)| [mc, th])
        .collect()
}

// =============================================================================
// CLOSED FORMS
// =============================================================================

/// Fig 1: `n(C, p)` over `ps` for each confidence.
pub fn sample_size_theory(confidences: &[f64], ps: &[f64]) -> Result<Vec<Series>> {
    confidences
        .iter()
        .map(|&c| -> Result<Series> {
            let points = ps
                .iter()
                .map(|&p| -> Result<Point> { Ok(Point::new(p, trials_from_probability(c, p)? as f64)) })
                .collect::<Result<Vec<_>>>()?;
            Ok(Series::theoretical(confidence_label("Th", c), points))
        })
        .collect()
}

/// Fig 2: `p(C, n)` over `ns` for each confidence.
pub fn detectable_theory(confidences: &[f64], ns: &[u64]) -> Result<Vec<Series>> {
    confidences
        .iter()
        .map(|&c| -> Result<Series> {
            let points = ns
                .iter()
                .map(|&n| -> Result<Point> { Ok(Point::new(n as f64, probability_from_trials(c, n)?)) })
                .collect::<Result<Vec<_>>>()?;
            Ok(Series::theoretical(confidence_label("Th", c), points))
        })
        .collect()
}

/// Fig 3: `n(C, p, O)` over `ps` for each threshold, searched up to `n_max`.
pub fn occurrences_theory(
    confidence: f64,
    occurrences: &[u64],
    ps: &[f64],
    n_max: u64,
) -> Result<Vec<Series>> {
    occurrences
        .iter()
        .map(|&o| -> Result<Series> {
            let points = ps
                .iter()
                .map(|&p| -> Result<Point> {
                    Ok(Point::from_trials(p, trials_for_at_least(confidence, p, o, n_max)?))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Series::theoretical(occurrence_label("Th", o), points))
        })
        .collect()
}

// =============================================================================
// MONTE CARLO OVERLAYS
// =============================================================================

/// Fig 1 overlay: simulated minimum `n` next to the closed form at each `p`.
///
/// `progress` receives the completed fraction after every grid point.
pub fn sample_size_overlay<F>(
    engine: &CoverageEngine,
    confidences: &[f64],
    ps: &[f64],
    mut progress: F,
) -> Result<Vec<Series>>
where
    F: FnMut(f64, &str),
{
    let total = (ps.len() * confidences.len()).max(1);
    let mut simulated = vec![Vec::with_capacity(ps.len()); confidences.len()];
    let mut done = 0;
    for &p in ps {
        for (i, &c) in confidences.iter().enumerate() {
            let outcome = engine.empirical_minimum_n(p, c)?;
            debug!(p, confidence = c, ?outcome, "simulated minimum n");
            simulated[i].push(Point::from_trials(p, outcome));
            done += 1;
            progress(done as f64 / total as f64, &format!("fig1 p={p} C={c}%"));
        }
    }

    let simulated = confidences
        .iter()
        .zip(simulated)
        .map(|(&c, points)| Series::empirical(confidence_label("MC", c), points))
        .collect();
    Ok(paired(simulated, sample_size_theory(confidences, ps)?))
}

/// Fig 2 overlay: simulated minimum `p` next to the closed form at each `n`.
pub fn detectable_overlay<F>(
    engine: &CoverageEngine,
    confidences: &[f64],
    ns: &[u64],
    mut progress: F,
) -> Result<Vec<Series>>
where
    F: FnMut(f64, &str),
{
    let total = (ns.len() * confidences.len()).max(1);
    let mut simulated = vec![Vec::with_capacity(ns.len()); confidences.len()];
    let mut done = 0;
    for &n in ns {
        for (i, &c) in confidences.iter().enumerate() {
            let outcome = engine.empirical_minimum_p(n, c)?;
            debug!(n, confidence = c, ?outcome, "simulated minimum p");
            simulated[i].push(Point::from_outcome(n as f64, outcome));
            done += 1;
            progress(done as f64 / total as f64, &format!("fig2 n={n} C={c}%"));
        }
    }

    let simulated = confidences
        .iter()
        .zip(simulated)
        .map(|(&c, points)| Series::empirical(confidence_label("MC", c), points))
        .collect();
    Ok(paired(simulated, detectable_theory(confidences, ns)?))
}

/// Fig 3 overlay: simulated minimum `n` for each threshold next to the
/// closed form, both capped at the engine's trial cap.
pub fn occurrences_overlay<F>(
    engine: &CoverageEngine,
    confidence: f64,
    occurrences: &[u64],
    ps: &[f64],
    mut progress: F,
) -> Result<Vec<Series>>
where
    F: FnMut(f64, &str),
{
    let total = (ps.len() * occurrences.len()).max(1);
    let mut simulated = vec![Vec::with_capacity(ps.len()); occurrences.len()];
    let mut done = 0;
    for &p in ps {
        for (i, &o) in occurrences.iter().enumerate() {
            let outcome = engine.empirical_minimum_trials(p, o, confidence)?;
            debug!(p, occurrences = o, ?outcome, "simulated minimum n");
            simulated[i].push(Point::from_trials(p, outcome));
            done += 1;
            progress(done as f64 / total as f64, &format!("fig3 p={p} O={o}"));
        }
    }

    let simulated = occurrences
        .iter()
        .zip(simulated)
        .map(|(&o, points)| Series::empirical(occurrence_label("MC", o), points))
        .collect();
    let cap = engine.config().trial_cap();
    Ok(paired(
        simulated,
        occurrences_theory(confidence, occurrences, ps, cap)?,
    ))
}

/// Fig 3 from the `C`-quantile of per-experiment minima, all thresholds of
/// an experiment sharing one population and draw order.
pub fn occurrence_quantiles<F>(
    engine: &CoverageEngine,
    confidence: f64,
    occurrences: &[u64],
    ps: &[f64],
    mut progress: F,
) -> Result<Vec<Series>>
where
    F: FnMut(f64, &str),
{
    let total = ps.len().max(1);
    let mut simulated = vec![Vec::with_capacity(ps.len()); occurrences.len()];
    for (done, &p) in ps.iter().enumerate() {
        let outcomes = engine.quantile_trials_for_at_least(p, occurrences, confidence)?;
        for (points, outcome) in simulated.iter_mut().zip(outcomes) {
            points.push(Point::from_trials(p, outcome));
        }
        progress((done + 1) as f64 / total as f64, &format!("fig3 quantiles p={p}"));
    }

    Ok(occurrences
        .iter()
        .zip(simulated)
        .map(|(&o, points)| Series::empirical(occurrence_label("MC", o), points))
        .collect())
}

/// Fig 4: mean true missing mass and mean Good–Turing band over steps
/// `1..=n_max`.
pub fn missing_mass<F>(
    simulator: &MissingMassSimulator,
    n_max: usize,
    confidence: f64,
    progress: F,
) -> Result<Figure>
where
    F: FnMut(f64, &str),
{
    let points = simulator.aggregate_with_progress(n_max, confidence, progress)?;
    Ok(Figure::from_series(
        FigureId::MissingMass,
        &missing_mass_series(&points),
    ))
}
