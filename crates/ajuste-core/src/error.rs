//! Error types for filter construction and streaming runs.

use thiserror::Error;

/// Errors produced by adaptive filters and the learning-rate explorer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A hyperparameter lies outside its algorithm-specific bound.
    #[error("parameter {name} = {value} is not in range {range}")]
    ParameterOutOfRange {
        /// Name of the rejected parameter (`mu`, `eps`, `order`, ...).
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable bound, e.g. `[0, 2]` or `(0, 1]`.
        range: String,
    },

    /// Two sequences that must agree in length do not.
    #[error("length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// What was being compared.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Weight initialisation policy string is not known.
    #[error("unrecognized weight policy '{0}' (expected \"zeros\", \"random\" or explicit values)")]
    UnrecognizedPolicy(String),

    /// The regularized normal equations of the AP filter could not be solved.
    #[error("singular system at sample {sample}: regularized normal equations have no solution")]
    SingularSystem {
        /// Index of the sample whose update failed.
        sample: usize,
    },

    /// The error-metric name is not one of `MAE`, `MSE`, `RMSE`.
    #[error("unknown error metric '{0}' (use \"MAE\", \"MSE\" or \"RMSE\")")]
    UnknownMetric(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Create a length mismatch error.
    pub fn length_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Error::LengthMismatch {
            what,
            expected,
            actual,
        }
    }
}
