//! loglik_optimizer — argmin-backed log-likelihood maximization.
//!
//! Purpose
//! -------
//! Fit the parameters of a hazard head by **maximizing** its censored
//! log-likelihood `ℓ(θ)`. Callers implement [`LogLikelihood`] and call
//! [`maximize`] to run L-BFGS with a configurable line search and
//! tolerances; missing analytic gradients fall back to finite differences.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the Argmin cost
//!   `c(θ) = -ℓ(θ)` and flips analytic gradients.
//! - [`maximize`] validates the starting point with
//!   [`LogLikelihood::check`], builds the solver ([`builders`]) and runs it
//!   ([`run::run_lbfgs`]).
//! - [`finite_diff`] supplies central/forward gradients with error capture.
//! - [`validation`] holds the shared tolerance, gradient and parameter
//!   checks.
//!
//! Invariants & assumptions
//! ------------------------
//! - `value` and `grad` report bad inputs as [`OptError`](crate::optimization::errors::OptError),
//!   never by panicking.
//! - A non-finite `ℓ(θ)` is an error for the line search, which then
//!   shortens its step.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained [`Theta`] (`Array1<f64>`); the
//!   positivity and shape bounds of the hazard are imposed downstream by
//!   the output activation, not by the optimizer.
//! - [`OptimOutcome::value`] is in log-likelihood units.
//!
//! Testing notes
//! -------------
//! - Submodule tests cover sign conventions, builders, finite differences
//!   and validation; `api` runs full solves on toy objectives.
//! - The hazard-head fit in `tests/integration_pipeline.rs` drives the
//!   whole stack on labelled event streams.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, FnEvalMap, Grad, Theta, DEFAULT_LBFGS_MEM};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
