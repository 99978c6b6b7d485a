//! optimization — likelihood maximization, guarded transforms, error surface.
//!
//! Purpose
//! -------
//! Provide the fitting layer for hazard heads: an Argmin-backed maximizer
//! of censored log-likelihoods, the numerically guarded scalar transforms
//! shared by the output activation and the loss, and one error type for
//! everything that can go wrong while optimizing.
//!
//! Key behaviors
//! -------------
//! - `loglik_optimizer`: [`maximize`](loglik_optimizer::maximize) over any
//!   [`LogLikelihood`](loglik_optimizer::LogLikelihood), L-BFGS with
//!   Hager–Zhang or More–Thuente line search.
//! - `numerical_stability`: logistic, `ln(1 - e^{-d})` and friends.
//! - `errors`: [`OptError`](errors::OptError) / [`OptResult`](errors::OptResult),
//!   including conversions from Argmin and hazard errors.
//!
//! Conventions
//! -----------
//! - Solvers minimize `c(θ) = -ℓ(θ)`; user-facing values are in `ℓ` units.
//! - Only the runner logs, at debug level.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use excess_hazard::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
