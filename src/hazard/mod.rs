//! hazard — the excess-conditional-hazard objective.
//!
//! Purpose
//! -------
//! Everything between a sequence model's raw outputs and a scalar training
//! loss: the output activation that produces valid `(scale, shape)` pairs,
//! the conditional hazard quantities of the Weibull-type model, and the
//! censored log-likelihood loss built from them.
//!
//! Key behaviors
//! -------------
//! - [`OutputActivation`]: `(a, b) ↦ (iniscale·e^a, m·clip(σ(b − ln(m−1)), ε, 1−ε))`.
//! - [`HazardModel`]: log-survival, log discretized pmf, log density,
//!   quantile, median; [`wtte_mean`] for the unconditional Weibull.
//! - [`CensoredLikelihoodLoss`]: per-example negative log-likelihood and
//!   its gradient; [`SquaredErrorLoss`] as a point-prediction baseline.
//! - [`HazardRegime`] switches between the standard conditional objective
//!   and the WTTE-RNN special case at the point where cumulative hazards
//!   are formed.
//!
//! Invariants & assumptions
//! ------------------------
//! - ε and the shape ceiling come from an explicit [`HazardConfig`]; no
//!   global state is read.
//! - Structural errors (shapes, configuration) are [`HazardError`]s.
//!   Numerical degeneracy is NaN/±∞ in the output.
//!
//! Testing notes
//! -------------
//! - Unit tests in each submodule check closed forms at shape 1 and
//!   analytic derivatives against central differences.
//! - tests/properties.rs checks activation bounds, monotone survival,
//!   non-negative loss and WTTE invariance on random inputs.

pub mod activation;
pub mod config;
pub mod errors;
pub mod loss;
pub mod model;
pub mod regime;

pub use self::activation::OutputActivation;
pub use self::config::{HazardConfig, DEFAULT_EPSILON, DEFAULT_MAX_SHAPE};
pub use self::errors::{HazardError, HazardResult};
pub use self::loss::{CensoredLikelihoodLoss, SquaredErrorLoss};
pub use self::model::{wtte_mean, HazardModel, LogLikPartials};
pub use self::regime::{CumulativeHazard, HazardRegime, HazardTerms};

pub mod prelude {
    pub use super::{
        wtte_mean, CensoredLikelihoodLoss, HazardConfig, HazardError, HazardModel, HazardRegime,
        HazardResult, OutputActivation, SquaredErrorLoss,
    };
}
