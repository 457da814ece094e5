//! Figure sweeps and theory-versus-simulation checks for `saturation`.
//!
//! This crate builds the data behind the four sample-size figures:
//!
//! - Fig 1: trials needed to observe a theme of probability `p` at confidence `C`
//! - Fig 2: smallest detectable `p` after `n` trials
//! - Fig 3: trials needed for at least `O` occurrences
//! - Fig 4: true missing mass against the Good–Turing estimate
//!
//! Closed-form curves come from `saturation-core`; simulated overlays come
//! from the `saturation` engines. Results are written as CSV and JSON tables
//! plus a markdown summary, and the `figures` binary drives all of it.

#![warn(missing_docs)]

pub mod figures;
pub mod output;
pub mod sweep;
pub mod validation;

pub use figures::{Figure, FigureId};
pub use sweep::{FigureConfig, FigurePreset, SweepMode, SweepResults, SweepRunner};
pub use validation::{validate, Check, ValidationReport};
