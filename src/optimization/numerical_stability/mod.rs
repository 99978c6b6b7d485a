//! numerical_stability — guarded scalar transforms for the hazard objective.
//!
//! Purpose
//! -------
//! Collect the few nonlinear scalar maps whose naïve forms lose precision
//! or overflow inside the censored hazard likelihood and its activation:
//! the logistic squashing of the shape output, and `ln(1 - e^{-d})`, the
//! log-probability that the event falls inside a one-step interval.
//!
//! Conventions
//! -----------
//! - Scalar `f64` in, scalar `f64` out. No allocation, logging or state.
//! - Inputs are assumed finite; NaN propagates unchanged.

pub mod transformations;

pub use self::transformations::{clip, inv_expm1, log1m_exp_neg, safe_logistic};

pub mod prelude {
    pub use super::transformations::{clip, log1m_exp_neg, safe_logistic};
}
