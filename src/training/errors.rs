//! Errors for the epoch loop.
//!
//! Divergence is *not* an error: a NaN epoch loss is a signal handled by the
//! monitors (rollback or stop). [`TrainingError`] is reserved for invalid
//! configuration and for failures of the model or data layer that make an
//! epoch impossible to run.
use thiserror::Error;

use crate::{events::errors::EventError, models::errors::ModelError};

/// Result alias for training operations.
pub type TrainingResult<T> = Result<T, TrainingError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainingError {
    #[error("Invalid learning rate {value}: must be finite and > 0.")]
    InvalidLearningRate { value: f64 },

    #[error("Invalid learning-rate floor {value}: must be finite, > 0 and not above the learning rate.")]
    InvalidLearningRateFloor { value: f64 },

    #[error("Invalid learning-rate factor {value}: must lie in (0, 1).")]
    InvalidLearningRateFactor { value: f64 },

    #[error("Invalid clip value {value}: must be > 0.")]
    InvalidClipValue { value: f64 },

    #[error("Number of epochs must be at least 1.")]
    ZeroEpochs,

    #[error("Batch size must be at least 1.")]
    ZeroBatchSize,

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Event(#[from] EventError),
}

#[cfg(feature = "python-bindings")]
impl From<TrainingError> for pyo3::PyErr {
    fn from(err: TrainingError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
