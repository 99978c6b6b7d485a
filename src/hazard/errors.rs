//! Errors for the hazard layer (configuration, activation and loss inputs).
//!
//! [`HazardError`] is raised only for *structural* problems: invalid
//! configuration values and tensors whose shapes do not line up. Numerical
//! degeneracy inside the likelihood (non-positive scale, overflowing
//! hazards) is not an error here; it propagates as NaN/±∞ so the training
//! loop can react to it.
//!
//! ## Conventions
//! - Shapes are reported as the full `ndarray` shape of the offending tensor.
use thiserror::Error;

/// Result alias for hazard operations.
pub type HazardResult<T> = Result<T, HazardError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HazardError {
    // ---- Configuration ----
    /// ε must satisfy 0 < ε < 0.5 so that `clip(σ, ε, 1-ε)` is non-empty.
    #[error("Invalid epsilon {value}: must be finite with 0 < epsilon < 0.5.")]
    InvalidEpsilon { value: f64 },

    /// The shape ceiling must be finite and > 0.
    #[error("Invalid maximum shape {value}: must be finite and > 0.")]
    InvalidMaxShape { value: f64 },

    /// The scale seed must be finite and > 0.
    #[error("Invalid initial scale {value}: must be finite and > 0.")]
    InvalidInitialScale { value: f64 },

    /// Quantile level must lie in [0, 1).
    #[error("Invalid probability {value}: must lie in [0, 1).")]
    InvalidProbability { value: f64 },

    // ---- Tensor shapes ----
    /// The last axis of a tensor has the wrong length.
    #[error("Tensor '{tensor}' must have trailing axis of length {expected}, found shape {found:?}.")]
    TrailingAxis { tensor: &'static str, expected: usize, found: Vec<usize> },

    /// A tensor has too few axes.
    #[error("Tensor '{tensor}' must have at least {min} axes, found {rank}.")]
    RankTooLow { tensor: &'static str, min: usize, rank: usize },

    /// Target and prediction tensors disagree on their leading axes.
    #[error("Leading axes of targets {targets:?} and predictions {predictions:?} differ.")]
    LeadingShapeMismatch { targets: Vec<usize>, predictions: Vec<usize> },
}

#[cfg(feature = "python-bindings")]
impl From<HazardError> for pyo3::PyErr {
    fn from(err: HazardError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
