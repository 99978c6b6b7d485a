//! Epoch runners: one pass over the training windows.
//!
//! [`EpochRunner`] is the seam between the training loop and whatever
//! updates the model. [`GradientDescentRunner`] is the minimal stepper for
//! any [`TrainableHead`]: consecutive batches, elementwise gradient clipping
//! to `±clip_value`, and a plain `θ ← θ − lr·g` step.
//!
//! The epoch loss is the window-weighted mean of the batch losses, each
//! measured before its own step. A non-finite batch loss or raw (unclipped)
//! gradient ends the epoch early with a NaN loss and leaves the parameters as they were
//! before that batch.
use crate::{
    events::TrainingCorpus,
    models::traits::TrainableHead,
    optimization::numerical_stability::clip,
    training::{config::TrainingConfig, errors::TrainingResult},
};

pub trait EpochRunner<M> {
    /// Train on `corpus` once and return the epoch's training loss.
    ///
    /// # Errors
    /// Failures of the model layer; divergence is a NaN return value.
    fn run_epoch(&mut self, model: &mut M, corpus: &TrainingCorpus, learning_rate: f64)
        -> TrainingResult<f64>;

    /// Loss of `model` on `corpus` without updating it.
    ///
    /// # Errors
    /// Failures of the model layer.
    fn evaluate(&self, model: &M, corpus: &TrainingCorpus) -> TrainingResult<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientDescentRunner {
    pub clip_value: Option<f64>,
    pub batch_size: Option<usize>,
}

impl GradientDescentRunner {
    pub fn new(clip_value: Option<f64>, batch_size: Option<usize>) -> Self {
        Self { clip_value, batch_size }
    }

    pub fn from_config(config: &TrainingConfig) -> Self {
        Self::new(config.clip_value, config.batch_size)
    }
}

impl<M: TrainableHead> EpochRunner<M> for GradientDescentRunner {
    fn run_epoch(
        &mut self, model: &mut M, corpus: &TrainingCorpus, learning_rate: f64,
    ) -> TrainingResult<f64> {
        let mut weighted = 0.0;
        let mut seen = 0usize;
        for batch in corpus.batches(self.batch_size.unwrap_or(0)) {
            let loss = model.mean_loss(&batch)?;
            let mut grad = model.mean_loss_gradient(&batch)?;
            if !loss.is_finite() || grad.iter().any(|g| !g.is_finite()) {
                log::debug!("non-finite batch loss {loss} or gradient after {seen} windows");
                return Ok(f64::NAN);
            }
            if let Some(c) = self.clip_value {
                grad.mapv_inplace(|g| clip(g, -c, c));
            }
            let step = model.parameters() - &(grad * learning_rate);
            model.set_parameters(step)?;
            weighted += loss * batch.len() as f64;
            seen += batch.len();
        }
        Ok(if seen == 0 { 0.0 } else { weighted / seen as f64 })
    }

    fn evaluate(&self, model: &M, corpus: &TrainingCorpus) -> TrainingResult<f64> {
        Ok(model.mean_loss(corpus)?)
    }
}
