//! Theory-versus-simulation series.
//!
//! Every cross-check pairs a curve computed from a closed form with one
//! measured by simulation. Both carry the same point shape, so consumers
//! (tests, table writers, renderers) handle them uniformly and only look at
//! the tag when they need to tell them apart.

use serde::{Deserialize, Serialize};

use saturation_core::{MissingMassPoint, SearchOutcome};

/// A single `(x, y)` point; `y` is `None` where the value is unattainable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Abscissa.
    pub x: f64,
    /// Ordinate, if defined.
    pub y: Option<f64>,
}

impl Point {
    /// Point with a defined value.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y: Some(y) }
    }

    /// Point from a search outcome; unattainable becomes a gap.
    pub fn from_outcome(x: f64, outcome: SearchOutcome<f64>) -> Self {
        Self {
            x,
            y: outcome.found(),
        }
    }

    /// Point from a trial-count search outcome.
    pub fn from_trials(x: f64, outcome: SearchOutcome<u64>) -> Self {
        Self::from_outcome(x, outcome.map(|n| n as f64))
    }
}

/// A point with a `[lower, mid, upper]` band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPoint {
    /// Abscissa.
    pub x: f64,
    /// Lower end of the band.
    pub lower: f64,
    /// Central value.
    pub mid: f64,
    /// Upper end of the band.
    pub upper: f64,
}

impl BandPoint {
    /// Band of zero width around `value`.
    pub fn degenerate(x: f64, value: f64) -> Self {
        Self {
            x,
            lower: value,
            mid: value,
            upper: value,
        }
    }
}

/// Point shapes that can be laid out as table columns.
pub trait TablePoint {
    /// Abscissa.
    fn x(&self) -> f64;

    /// Column labels for a series called `label`.
    fn columns(label: &str) -> Vec<String>;

    /// Cell values, one per column.
    fn cells(&self) -> Vec<Option<f64>>;
}

impl TablePoint for Point {
    fn x(&self) -> f64 {
        self.x
    }

    fn columns(label: &str) -> Vec<String> {
        vec![label.to_string()]
    }

    fn cells(&self) -> Vec<Option<f64>> {
        vec![self.y]
    }
}

impl TablePoint for BandPoint {
    fn x(&self) -> f64 {
        self.x
    }

    fn columns(label: &str) -> Vec<String> {
        vec![
            format!("{label} lower"),
            label.to_string(),
            format!("{label} upper"),
        ]
    }

    fn cells(&self) -> Vec<Option<f64>> {
        vec![Some(self.lower), Some(self.mid), Some(self.upper)]
    }
}

/// A labelled sequence of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve<P = Point> {
    /// Legend label.
    pub label: String,
    /// Points in ascending `x`.
    pub points: Vec<P>,
}

/// A curve tagged with where its values come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Series<P = Point> {
    /// Values from a closed-form model.
    Theoretical(Curve<P>),
    /// Values measured by Monte Carlo simulation.
    Empirical(Curve<P>),
}

impl<P> Series<P> {
    /// Closed-form series.
    pub fn theoretical(label: impl Into<String>, points: Vec<P>) -> Self {
        Self::Theoretical(Curve {
            label: label.into(),
            points,
        })
    }

    /// Simulated series.
    pub fn empirical(label: impl Into<String>, points: Vec<P>) -> Self {
        Self::Empirical(Curve {
            label: label.into(),
            points,
        })
    }

    /// The underlying curve.
    pub fn curve(&self) -> &Curve<P> {
        match self {
            Self::Theoretical(curve) | Self::Empirical(curve) => curve,
        }
    }

    /// Legend label.
    pub fn label(&self) -> &str {
        &self.curve().label
    }

    /// Points of the curve.
    pub fn points(&self) -> &[P] {
        &self.curve().points
    }

    /// Whether the values were simulated.
    pub fn is_empirical(&self) -> bool {
        matches!(self, Self::Empirical(_))
    }
}

/// Mean true missing mass (as a zero-width band) and mean Good–Turing band,
/// indexed by step.
pub fn missing_mass_series(points: &[MissingMassPoint]) -> [Series<BandPoint>; 2] {
    let truth = points
        .iter()
        .map(|p| BandPoint::degenerate(p.step as f64, p.true_mass))
        .collect();
    let estimate = points
        .iter()
        .map(|p| BandPoint {
            x: p.step as f64,
            lower: p.lower,
            mid: p.estimate,
            upper: p.upper,
        })
        .collect();
    [
        Series::empirical("MC R_true", truth),
        Series::theoretical("Good-Turing R", estimate),
    ]
}
