//! Core numerics for sample-size planning under thematic sampling.
//!
//! Given a population whose members carry a theme with frequency `p`, how many
//! independent draws are needed to see the theme at least once (or at least `O`
//! times) with confidence `C`? And, from a sample in progress, how much
//! probability mass is still unseen?
//!
//! This crate holds the pure, allocation-light half of the answer and is
//! designed to work in `no_std` environments with only an allocator:
//!
//! - [`models`]: closed-form and recurrence-based relations between `n`, `p`,
//!   `C` and `O`
//! - [`search`]: integer and real bracket-and-bisect searches over monotone
//!   coverage functions
//! - [`estimator`]: the Good–Turing missing-mass estimator, its analytic
//!   standard error and the online state threaded through a draw sequence
//! - [`statistics`]: empirical and standard-normal quantiles
//!
//! # Features
//!
//! - `std` (default): Enable standard library support for convenience
//!
//! # Usage
//!
//! This crate is typically used through the `saturation` crate, which adds
//! the finite-population simulator and the Monte Carlo engines that validate
//! these closed forms.
//!
//! ```
//! use saturation_core::models::{probability_from_trials, trials_from_probability};
//!
//! let n = trials_from_probability(95.0, 0.05).unwrap();
//! assert_eq!(n, 59);
//!
//! let p = probability_from_trials(95.0, n).unwrap();
//! assert!(p <= 0.05);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod constants;
pub mod error;
pub mod estimator;
pub mod math;
pub mod models;
pub mod search;
pub mod statistics;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{Error, Result};
pub use estimator::{GoodTuringEstimate, MissingMassPoint, MissingMassState};
pub use types::{Confidence, SearchOutcome, ThemeId};
