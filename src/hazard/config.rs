//! Hazard configuration: numerical ε, shape ceiling and regime.
//!
//! Both numbers are threaded explicitly through the activation and the loss
//! rather than read from a global, so two models with different settings
//! can coexist in one process.
use serde::Deserialize;

use crate::hazard::{
    errors::{HazardError, HazardResult},
    regime::HazardRegime,
};

/// Default ε: the backend epsilon of the original training framework.
pub const DEFAULT_EPSILON: f64 = 1e-7;

/// Default upper bound on the Weibull-type shape.
pub const DEFAULT_MAX_SHAPE: f64 = 10.0;

/// Validated hazard settings.
///
/// - `epsilon`: offset inside every cumulative hazard and the clip margin
///   of the shape sigmoid.
/// - `max_shape`: ceiling of the activated shape.
/// - `regime`: [`HazardRegime::Standard`] or [`HazardRegime::Wtte`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HazardConfig {
    pub epsilon: f64,
    pub max_shape: f64,
    pub regime: HazardRegime,
}

impl HazardConfig {
    /// # Errors
    /// [`HazardError::InvalidEpsilon`] or [`HazardError::InvalidMaxShape`].
    pub fn new(epsilon: f64, max_shape: f64, regime: HazardRegime) -> HazardResult<Self> {
        let config = Self { epsilon, max_shape, regime };
        config.validate()?;
        Ok(config)
    }

    /// Re-check the invariants, e.g. after deserialization.
    pub fn validate(&self) -> HazardResult<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0 && self.epsilon < 0.5) {
            return Err(HazardError::InvalidEpsilon { value: self.epsilon });
        }
        if !(self.max_shape.is_finite() && self.max_shape > 0.0) {
            return Err(HazardError::InvalidMaxShape { value: self.max_shape });
        }
        Ok(())
    }

    pub fn with_regime(mut self, regime: HazardRegime) -> Self {
        self.regime = regime;
        self
    }
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            max_shape: DEFAULT_MAX_SHAPE,
            regime: HazardRegime::Standard,
        }
    }
}
