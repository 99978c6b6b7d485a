//! Errors for event-stream labelling and corpus construction.
//!
//! [`EventError`] covers the two input checks of the indicator transform
//! (rank and binary values) plus the shape contracts of target assembly,
//! matrix splitting and windowing. Everything is raised before any output
//! is produced; there are no partial results.
//!
//! ## Conventions
//! - Indices are 0-based: `stream` is the row, `time` the column of the
//!   indicator.
use thiserror::Error;

/// Result alias for event-stream operations.
pub type EventResult<T> = Result<T, EventError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EventError {
    // ---- Indicator validation ----
    /// The indicator must be a (streams × time) matrix.
    #[error("Event indicator must have 2 dimensions, found {rank}.")]
    InvalidRank { rank: usize },

    /// Indicator entries must be exactly 0 or 1.
    #[error("Event indicator holds {value} at stream {stream}, time {time}; only 0 and 1 are allowed.")]
    NonBinaryValue { stream: usize, time: usize, value: f64 },

    /// Both axes of the indicator must be non-empty.
    #[error("Event indicator is empty: {streams} streams × {timesteps} timesteps.")]
    EmptyIndicator { streams: usize, timesteps: usize },

    // ---- Targets and matrices ----
    /// Stream index past the number of streams.
    #[error("Stream {stream} out of range for {streams} streams.")]
    StreamOutOfRange { stream: usize, streams: usize },

    /// A labelled matrix needs the four target columns in front.
    #[error("Labelled matrix needs at least 4 columns (tse, tte, uncensored, eligible), found {found}.")]
    TooFewColumns { found: usize },

    /// Covariates and targets disagree on streams or timesteps.
    #[error("Covariate shape {covariates:?} does not match target shape {targets:?}.")]
    ShapeMismatch { covariates: Vec<usize>, targets: Vec<usize> },

    /// The scale seed needs a positive, finite mean elapsed time.
    #[error("Initial scale estimate {value} is not positive and finite.")]
    InvalidInitialScale { value: f64 },

    // ---- Windowing ----
    /// Windows need at least one timestep.
    #[error("Window length must be at least 1.")]
    ZeroWindowLength,

    /// Every window was discarded or no stream was long enough.
    #[error("No valid windows of length {winlen}.")]
    EmptyCorpus { winlen: usize },

    /// Validation fraction must lie in [0, 1).
    #[error("Validation fraction {value} must lie in [0, 1).")]
    InvalidValidationFraction { value: f64 },
}

#[cfg(feature = "python-bindings")]
impl From<EventError> for pyo3::PyErr {
    fn from(err: EventError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
