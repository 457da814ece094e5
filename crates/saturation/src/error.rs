//! Error type for the simulation engine.

use thiserror::Error;

/// Errors raised by simulations and their marshalling.
#[derive(Debug, Error)]
pub enum Error {
    /// A model or estimator rejected its input.
    #[error(transparent)]
    Model(#[from] saturation_core::Error),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The run was cancelled between experiments.
    #[error("simulation cancelled")]
    Cancelled,

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for the simulation engine.
pub type Result<T> = std::result::Result<T, Error>;
