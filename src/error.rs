//! Error types for constellation and waveform operations.

use pyo3::PyErr;
use pyo3::exceptions::PyValueError;
use thiserror::Error;

/// Errors raised while validating parameters or exporting results.
#[derive(Debug, Error)]
pub enum QamError {
    /// Order is neither a perfect square of at least 4 nor 32.
    #[error("unsupported modulation order {0}: expected a perfect square >= 4 or 32")]
    UnsupportedOrder(usize),

    /// Noise level is negative, not finite, or outside the percent range.
    #[error("noise level out of range: {0}")]
    NoiseOutOfRange(f64),

    #[error("samples per symbol must be at least 1")]
    ZeroSamplesPerSymbol,

    /// Canvas size must be positive and finite.
    #[error("invalid canvas size: {0}")]
    InvalidCanvas(f64),

    /// The chart backend refused to create a chart.
    #[error("chart backend failed: {0}")]
    Chart(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type for constellation and waveform operations.
pub type QamResult<T> = Result<T, QamError>;

impl From<QamError> for PyErr {
    fn from(err: QamError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
