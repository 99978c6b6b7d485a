//! Errors for sequence heads.
//!
//! [`ModelError`] covers parameter bookkeeping and covariate shapes, and
//! wraps the hazard/event errors a head can hit while seeding or evaluating
//! its objective. Inside the optimizer every [`ModelError`] surfaces as
//! [`OptError::Objective`].
use thiserror::Error;

use crate::{events::errors::EventError, hazard::errors::HazardError, optimization::errors::OptError};

/// Result alias for sequence-head operations.
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Covariate axis does not match the head's design.
    #[error("Head expects {expected} covariates per timestep, found {found}.")]
    CovariateMismatch { expected: usize, found: usize },

    /// Parameter vector has the wrong length.
    #[error("Head expects {expected} parameters, found {found}.")]
    ParameterLength { expected: usize, found: usize },

    /// Parameters must be finite.
    #[error("Parameter {index} is not finite: {value}.")]
    NonFiniteParameter { index: usize, value: f64 },

    /// Internal tensor had an unexpected rank.
    #[error("Unexpected tensor layout: {text}")]
    Layout { text: String },

    #[error(transparent)]
    Hazard(#[from] HazardError),

    #[error(transparent)]
    Event(#[from] EventError),
}

impl From<ModelError> for OptError {
    fn from(err: ModelError) -> Self {
        OptError::Objective { text: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ModelError> for pyo3::PyErr {
    fn from(err: ModelError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
