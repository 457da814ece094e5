//! # saturation
//!
//! Monte Carlo validation of sample-size planning for thematic sampling.
//!
//! The closed forms in [`saturation_core`] assume independent draws with a
//! fixed theme frequency `p`. Real studies draw without replacement from a
//! finite population, and estimate how much of the theme space is still
//! unseen from the sample itself. This crate simulates both situations so
//! the closed forms can be checked against them:
//!
//! - [`CoverageEngine`]: coverage of "at least `O` carriers in `n` draws" over
//!   E experiments, the searches that invert it, and per-experiment minimum
//!   draw counts with their quantiles
//! - [`MissingMassSimulator`]: the true missing mass of a Zipf interview
//!   population next to the Good–Turing estimate, averaged per step
//! - [`Series`] and [`output::Table`]: theory and simulation curves laid out
//!   side by side, with CSV and JSON export
//!
//! ## Quick Start
//!
//! ```no_run
//! use saturation::{CoverageEngine, SimulationConfig};
//! use saturation_core::models::trials_from_probability;
//!
//! let engine = CoverageEngine::new(SimulationConfig::quick()).unwrap();
//!
//! let theory = trials_from_probability(95.0, 0.05).unwrap();
//! let coverage = engine.coverage_at(theory, 0.05).unwrap();
//! println!("n = {theory} covers {:.1}% of experiments", coverage * 100.0);
//!
//! match engine.empirical_minimum_n(0.05, 95.0).unwrap() {
//!     saturation::SearchOutcome::Found(n) => println!("simulated n = {n}"),
//!     saturation::SearchOutcome::Unattainable { limit } => {
//!         println!("not reached within {limit} draws")
//!     }
//! }
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): run the experiments of one evaluation on the
//!   `rayon` thread pool. Results do not depend on the feature, since every
//!   experiment owns an RNG stream derived from the base seed and its index.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod cancel;
mod config;
mod error;

// Functional modules
pub mod coverage;
pub mod missing_mass;
pub mod output;
pub mod population;
pub mod rng;
pub mod series;

// Re-exports for public API
pub use cancel::CancelToken;
pub use config::{InterviewConfig, SimulationConfig};
pub use coverage::CoverageEngine;
pub use error::{Error, Result};
pub use missing_mass::{run_experiment, MissingMassSimulator};
pub use series::{missing_mass_series, BandPoint, Curve, Point, Series};

// Re-export the numerics most callers need alongside the engines
pub use saturation_core::{Confidence, MissingMassPoint, SearchOutcome};
