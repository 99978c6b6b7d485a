//! Python-boundary helpers shared by the PyO3 wrappers in `lib.rs`.
//!
//! - [`extract_f64_array_dyn`]: accept a float64 `numpy.ndarray` of any rank,
//!   or anything with a `.to_numpy()` method (pandas objects).
//! - [`build_hazard_config`]: validated [`HazardConfig`] from keyword
//!   arguments.
#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArrayDyn;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::hazard::{HazardConfig, HazardRegime};

#[cfg(feature = "python-bindings")]
pub fn extract_f64_array_dyn<'py>(raw: &Bound<'py, PyAny>) -> PyResult<PyReadonlyArrayDyn<'py, f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArrayDyn<f64>>() {
        return Ok(arr);
    }
    if let Ok(obj) = raw.call_method0("to_numpy") {
        if let Ok(arr) = obj.extract::<PyReadonlyArrayDyn<f64>>() {
            return Ok(arr);
        }
    }
    Err(PyTypeError::new_err("expected a float64 numpy.ndarray or an object with .to_numpy()"))
}

#[cfg(feature = "python-bindings")]
pub fn build_hazard_config(epsilon: f64, max_shape: f64, wtte: bool) -> PyResult<HazardConfig> {
    let regime = if wtte { HazardRegime::Wtte } else { HazardRegime::Standard };
    Ok(HazardConfig::new(epsilon, max_shape, regime)?)
}
