//! loglik_optimizer::types — numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Keep the parameter, gradient and cost types of the optimizer in one place
//! so the adapter, builders and runner never spell out `ndarray` or Argmin
//! generics themselves.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` are flat `Array1<f64>` vectors of equal length. For
//!   the hazard heads in [`crate::models`] the layout is
//!   `θ = (a-coefficients, b-coefficients)`.
//! - `Cost` is the scalar minimized by Argmin, `c(θ) = -ℓ(θ)`.
//! - The L-BFGS aliases pin the three-parameter line-search forms
//!   `(Param, Gradient, Float)` of the Argmin version in use.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient vector, same length as [`Theta`].
pub type Grad = Array1<f64>;

/// Scalar objective value.
pub type Cost = f64;

/// Function-evaluation counters reported by Argmin (`"cost_count"`,
/// `"gradient_count"`, ...).
pub type FnEvalMap = HashMap<String, u64>;

/// Default L-BFGS history size.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS with Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS with More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
