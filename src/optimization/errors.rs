//! Errors for the log-likelihood optimizer.
//!
//! [`OptError`] is the single error surface of the optimization layer. It
//! covers invalid optimizer configuration, non-finite objective values or
//! derivatives, backend (`argmin`) failures, and the hazard / shape errors a
//! [`LogLikelihood`](crate::optimization::loglik_optimizer::LogLikelihood)
//! implementation may raise while evaluating the censored objective.
//!
//! ## Conventions
//! - Backend errors are normalized through `From<argmin::core::Error>`; raw
//!   `argmin` errors never cross the module boundary.
//! - Indices are 0-based.
use argmin::core::{ArgminError, Error};
use thiserror::Error;

use crate::hazard::errors::HazardError;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptError {
    // ---- Gradient ----
    /// The objective has no analytic gradient; finite differences are used.
    #[error("Analytic gradient not implemented.")]
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    #[error("Gradient dimension mismatch: expected {expected}, found {found}")]
    GradientDimMismatch { expected: usize, found: usize },

    /// Gradient elements need to be finite.
    #[error("Invalid gradient at index {index}: {value}. {reason}")]
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- MLEOptions ----
    /// Gradient tolerance needs to be positive and finite.
    #[error("Invalid gradient tolerance {tol}: {reason}")]
    InvalidTolGrad { tol: f64, reason: &'static str },

    /// Cost change tolerance needs to be positive and finite.
    #[error("Invalid cost tolerance {tol}: {reason}")]
    InvalidTolCost { tol: f64, reason: &'static str },

    /// Maximum iterations needs to be positive.
    #[error("Invalid maximum iterations {max_iter}: {reason}")]
    InvalidMaxIter { max_iter: usize, reason: &'static str },

    /// At least one stopping rule must be provided.
    #[error("At least one of tol_grad, tol_cost or max_iter must be provided.")]
    NoTolerancesProvided,

    /// Unknown line-search name.
    #[error("Invalid line search '{name}': {reason}")]
    InvalidLineSearch { name: String, reason: &'static str },

    /// lbfgs_mem needs to be at least 1.
    #[error("Invalid L-BFGS memory {mem}: {reason}")]
    InvalidLBFGSMem { mem: usize, reason: &'static str },

    // ---- Cost function ----
    /// The log-likelihood evaluated to NaN or ±inf.
    #[error("Log-likelihood is not finite: {value}")]
    NonFiniteCost { value: f64 },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    #[error("Invalid estimate at index {index}: {value}. {reason}")]
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    /// The solver finished without a best parameter vector.
    #[error("Optimizer returned no parameter estimate.")]
    MissingThetaHat,

    /// Parameter vector has the wrong length for the model.
    #[error("Theta length mismatch: expected {expected}, got {actual}")]
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// Parameter vector entries must be finite.
    #[error("Theta input at index {index} must be finite, got {value}")]
    InvalidThetaInput { index: usize, value: f64 },

    // ---- Objective ----
    /// Hazard configuration or tensor-shape failure raised by the objective.
    #[error("Objective evaluation failed: {text}")]
    Objective { text: String },

    /// The data payload holds no observations.
    #[error("Objective data payload is empty.")]
    EmptyData,

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    #[error("Invalid parameter: {text}")]
    InvalidParameter { text: String },
    /// Wrapper for argmin::NotImplemented
    #[error("Not implemented: {text}")]
    NotImplemented { text: String },
    /// Wrapper for argmin::NotInitialized
    #[error("Not initialized: {text}")]
    NotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated
    #[error("Condition violated: {text}")]
    ConditionViolated { text: String },
    /// Wrapper for argmin::CheckpointNotFound
    #[error("Checkpoint not found: {text}")]
    CheckPointNotFound { text: String },
    /// Wrapper for argmin::PotentialBug
    #[error("Potential bug: {text}")]
    PotentialBug { text: String },
    /// Wrapper for argmin::ImpossibleError
    #[error("Impossible error: {text}")]
    ImpossibleError { text: String },
    /// Any other backend failure (line search, observers).
    #[error("Backend error: {text}")]
    BackendError { text: String },

    /// ---- Fallback ----
    #[error("Unknown optimizer error")]
    UnknownError,
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Errors raised by our own cost/gradient come back wrapped in anyhow.
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<HazardError> for OptError {
    fn from(err: HazardError) -> Self {
        OptError::Objective { text: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<OptError> for pyo3::PyErr {
    fn from(err: OptError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
