//! Training-loop configuration.
//!
//! Defaults follow the reference training scripts: learning rate 0.01,
//! gradient values clipped to ±5, 100 epochs, batches of 1024 windows,
//! patience 20 on the validation loss, a tenfold learning-rate cut on
//! divergence down to machine epsilon, and the last 10% of windows held
//! out for validation.
use serde::Deserialize;

use crate::training::errors::{TrainingError, TrainingResult};

/// Which epoch loss the early-stopping monitor follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitoredLoss {
    /// Mean training loss of the epoch.
    Loss,
    /// Mean loss on the held-out windows; falls back to the training loss
    /// when nothing is held out.
    #[default]
    ValLoss,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    /// Elementwise gradient clip; `None` disables clipping.
    pub clip_value: Option<f64>,
    /// Windows per gradient step; `None` uses the full training set.
    pub batch_size: Option<usize>,
    pub patience: usize,
    pub lr_factor: f64,
    pub lr_min: f64,
    pub validation_fraction: f64,
    pub monitor: MonitoredLoss,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 100,
            learning_rate: 0.01,
            clip_value: Some(5.0),
            batch_size: Some(1024),
            patience: 20,
            lr_factor: 0.1,
            lr_min: f64::EPSILON,
            validation_fraction: 0.1,
            monitor: MonitoredLoss::ValLoss,
        }
    }
}

impl TrainingConfig {
    /// # Errors
    /// One [`TrainingError`] variant per rejected field. The validation
    /// fraction is checked when the corpus is split.
    pub fn validate(&self) -> TrainingResult<()> {
        if self.epochs == 0 {
            return Err(TrainingError::ZeroEpochs);
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(TrainingError::InvalidLearningRate { value: self.learning_rate });
        }
        if !(self.lr_min.is_finite() && self.lr_min > 0.0 && self.lr_min <= self.learning_rate) {
            return Err(TrainingError::InvalidLearningRateFloor { value: self.lr_min });
        }
        if !(self.lr_factor > 0.0 && self.lr_factor < 1.0) {
            return Err(TrainingError::InvalidLearningRateFactor { value: self.lr_factor });
        }
        if let Some(value) = self.clip_value {
            if !(value > 0.0) {
                return Err(TrainingError::InvalidClipValue { value });
            }
        }
        if self.batch_size == Some(0) {
            return Err(TrainingError::ZeroBatchSize);
        }
        Ok(())
    }
}
