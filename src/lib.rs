//! excess_hazard — censored time-to-event objectives for sequence models.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the labelling pipeline and the hazard objective to Python via the
//! `_excess_hazard` extension module.
//!
//! Key behaviors
//! -------------
//! - [`events`]: binary event streams → time since/to event, censoring and
//!   eligibility labels → windowed training corpus.
//! - [`hazard`]: output activation, excess-conditional (and WTTE-RNN) hazard
//!   quantities, censored log-likelihood loss and its gradient.
//! - [`models`]: the sequence-model seam and a linear reference head.
//! - [`optimization`]: L-BFGS maximum likelihood through Argmin.
//! - [`training`]: explicit epoch loop with checkpoint rollback, learning
//!   rate retreat and early stopping.
//! - [`config`]: TOML run configuration.
//!
//! Invariants & assumptions
//! ------------------------
//! - Validation happens once at each boundary (indicator construction,
//!   tensor shape checks, configuration parsing). Numerical degeneracy
//!   inside the likelihood propagates as NaN and is handled by the training
//!   loop, never by the loss itself.
//! - Library code logs through the `log` facade only; binaries and tests
//!   choose the logger.
//!
//! Conventions
//! -----------
//! - Target tensors end in `(tse, tte, uncensored, eligible)`; prediction
//!   tensors end in `(scale, shape)` after activation and `(a, b)` before.
//! - Python-exposed functions live under `_excess_hazard.events` and
//!   `_excess_hazard.hazard`; core errors become `ValueError`s at the
//!   boundary.
//!
//! Testing notes
//! -------------
//! - Unit tests sit next to the code; tests/properties.rs holds the
//!   randomized invariants and tests/integration_pipeline.rs runs the whole
//!   chain from indicator to fitted head.

pub mod config;
pub mod events;
pub mod hazard;
pub mod models;
pub mod optimization;
pub mod training;
pub mod utils;

#[cfg(feature = "python-bindings")]
use ndarray::{Ix3, Ix4};

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray2, PyArray3, PyArray4, PyArrayDyn};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    events::{CorpusConfig, EventIndicator},
    hazard::{CensoredLikelihoodLoss, OutputActivation, DEFAULT_EPSILON, DEFAULT_MAX_SHAPE},
    utils::{build_hazard_config, extract_f64_array_dyn},
};

/// Label series of a `(streams, timesteps)` 0/1 indicator.
///
/// Returns `(tse, tte, uncensored, eligible)`, each `(streams, timesteps)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(text_signature = "(indicator, /)")]
#[allow(clippy::type_complexity)]
fn transform<'py>(
    py: Python<'py>, indicator: &Bound<'py, PyAny>,
) -> PyResult<(
    Bound<'py, PyArray2<f64>>,
    Bound<'py, PyArray2<f64>>,
    Bound<'py, PyArray2<f64>>,
    Bound<'py, PyArray2<f64>>,
)> {
    let arr = extract_f64_array_dyn(indicator)?;
    let derived = events::transform(&EventIndicator::from_dyn(arr.as_array())?);
    Ok((
        derived.tse().clone().into_pyarray(py),
        derived.tte().clone().into_pyarray(py),
        derived.uncensored().clone().into_pyarray(py),
        derived.eligible().clone().into_pyarray(py),
    ))
}

/// Overlapping windows of `(nobs, nseq, ncov)` covariates and
/// `(nobs, nseq, 1, 4)` targets.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    text_signature = "(x, y, /, winlen=78, padding_sentinel=-1.0)",
    signature = (x, y, winlen = 78, padding_sentinel = -1.0)
)]
fn windows<'py>(
    py: Python<'py>, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>, winlen: usize,
    padding_sentinel: f64,
) -> PyResult<(Bound<'py, PyArray3<f64>>, Bound<'py, PyArray4<f64>>)> {
    let x = extract_f64_array_dyn(x)?;
    let y = extract_f64_array_dyn(y)?;
    let xv = x
        .as_array()
        .into_dimensionality::<Ix3>()
        .map_err(|_| PyValueError::new_err("x must have shape (nobs, nseq, ncov)"))?;
    let yv = y
        .as_array()
        .into_dimensionality::<Ix4>()
        .map_err(|_| PyValueError::new_err("y must have shape (nobs, nseq, 1, 4)"))?;
    let config = CorpusConfig::new(winlen, padding_sentinel)?;
    let corpus = events::windows(xv, yv, &config)?;
    Ok((corpus.x.into_pyarray(py), corpus.y.into_pyarray(py)))
}

/// Raw `(..., 2)` outputs → activated `(scale, shape)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    text_signature = "(raw, initial_scale, /, max_shape=10.0, epsilon=1e-7)",
    signature = (raw, initial_scale, max_shape = DEFAULT_MAX_SHAPE, epsilon = DEFAULT_EPSILON)
)]
fn activation<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>, initial_scale: f64, max_shape: f64, epsilon: f64,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    let raw = extract_f64_array_dyn(raw)?;
    let config = build_hazard_config(epsilon, max_shape, false)?;
    let act = OutputActivation::new(initial_scale, &config)?;
    Ok(act.activate(raw.as_array())?.into_pyarray(py))
}

/// Per-example negative censored log-likelihood.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    text_signature = "(y_true, y_pred, /, epsilon=1e-7, wtte=False)",
    signature = (y_true, y_pred, epsilon = DEFAULT_EPSILON, wtte = false)
)]
fn excess_conditional_loss<'py>(
    py: Python<'py>, y_true: &Bound<'py, PyAny>, y_pred: &Bound<'py, PyAny>, epsilon: f64,
    wtte: bool,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    let y_true = extract_f64_array_dyn(y_true)?;
    let y_pred = extract_f64_array_dyn(y_pred)?;
    let loss = CensoredLikelihoodLoss::new(&build_hazard_config(epsilon, DEFAULT_MAX_SHAPE, wtte)?);
    Ok(loss.loss(y_true.as_array(), y_pred.as_array())?.into_pyarray(py))
}

/// `∂loss/∂(scale, shape)`, laid out like `y_pred`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    text_signature = "(y_true, y_pred, /, epsilon=1e-7, wtte=False)",
    signature = (y_true, y_pred, epsilon = DEFAULT_EPSILON, wtte = false)
)]
fn loss_gradient<'py>(
    py: Python<'py>, y_true: &Bound<'py, PyAny>, y_pred: &Bound<'py, PyAny>, epsilon: f64,
    wtte: bool,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    let y_true = extract_f64_array_dyn(y_true)?;
    let y_pred = extract_f64_array_dyn(y_pred)?;
    let loss = CensoredLikelihoodLoss::new(&build_hazard_config(epsilon, DEFAULT_MAX_SHAPE, wtte)?);
    Ok(loss.gradient(y_true.as_array(), y_pred.as_array())?.into_pyarray(py))
}

/// _excess_hazard — PyO3 module initializer.
///
/// Creates the `events` and `hazard` submodules, attaches them to
/// `_excess_hazard` and registers them in `sys.modules` so dotted imports
/// (`excess_hazard.events`) work.
///
/// Errors
/// ------
/// - `PyErr` if creating a submodule or touching `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _excess_hazard<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let events_mod = PyModule::new(_py, "events")?;
    let hazard_mod = PyModule::new(_py, "hazard")?;
    events_module(m, &events_mod)?;
    hazard_module(m, &hazard_mod)?;

    let sys_modules = _py.import("sys")?.getattr("modules")?;
    sys_modules.set_item("excess_hazard.events", events_mod)?;
    sys_modules.set_item("excess_hazard.hazard", hazard_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn events_module<'py>(parent: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(transform, m)?)?;
    m.add_function(wrap_pyfunction!(windows, m)?)?;
    parent.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn hazard_module<'py>(parent: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(activation, m)?)?;
    m.add_function(wrap_pyfunction!(excess_conditional_loss, m)?)?;
    m.add_function(wrap_pyfunction!(loss_gradient, m)?)?;
    parent.add_submodule(m)?;
    Ok(())
}
