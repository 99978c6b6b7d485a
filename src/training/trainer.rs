//! The explicit epoch loop.
//!
//! Purpose
//! -------
//! Run epochs with an [`EpochRunner`], report each one to the registered
//! [`Monitor`]s, and apply the [`TrainingSignal`]s they return:
//!
//! - `Continue`: nothing.
//! - `Rollback`: the model is replaced by the checkpoint and the learning
//!   rate by the one carried in the signal; `then_stop` ends training after
//!   the rollback.
//! - `Stop`: training ends after every monitor has seen the epoch.
//!
//! Key behaviors
//! -------------
//! - With `validation_fraction > 0` the trailing windows of the corpus are
//!   held out and evaluated after each epoch.
//! - [`Trainer::from_config`] registers a [`TacticalRetreat`] followed by
//!   an [`EarlyStopping`] monitor, in that order.
//! - The returned [`TrainingHistory`] records every epoch report, the
//!   number of rollbacks, the final learning rate and why training ended.
use crate::{
    events::TrainingCorpus,
    training::{
        config::TrainingConfig,
        errors::TrainingResult,
        monitor::{EarlyStopping, EpochReport, Monitor, StopReason, TacticalRetreat, TrainingSignal},
        runner::EpochRunner,
    },
};

/// Outcome of [`Trainer::fit`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingHistory {
    pub epochs: Vec<EpochReport>,
    pub rollbacks: usize,
    pub learning_rate: f64,
    /// `None` when every configured epoch ran.
    pub stop_reason: Option<StopReason>,
}

impl TrainingHistory {
    pub fn train_losses(&self) -> Vec<f64> {
        self.epochs.iter().map(|r| r.train_loss).collect()
    }
}

pub struct Trainer<M, R> {
    config: TrainingConfig,
    runner: R,
    monitors: Vec<Box<dyn Monitor<M>>>,
}

impl<M: Clone + 'static, R: EpochRunner<M>> Trainer<M, R> {
    /// Trainer without monitors.
    ///
    /// # Errors
    /// Invalid `config` fields.
    pub fn new(config: TrainingConfig, runner: R) -> TrainingResult<Self> {
        config.validate()?;
        Ok(Self { config, runner, monitors: Vec::new() })
    }

    /// Trainer with tactical retreat and early stopping configured from
    /// `config`.
    ///
    /// # Errors
    /// Invalid `config` fields.
    pub fn from_config(config: TrainingConfig, runner: R) -> TrainingResult<Self> {
        let retreat = TacticalRetreat::<M>::new(config.lr_factor, config.lr_min);
        let early = EarlyStopping::new(config.patience, config.monitor);
        Ok(Self::new(config, runner)?.with_monitor(retreat).with_monitor(early))
    }

    pub fn with_monitor(mut self, monitor: impl Monitor<M> + 'static) -> Self {
        self.monitors.push(Box::new(monitor));
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train `model` on `corpus`.
    ///
    /// # Errors
    /// - Validation-split errors from the corpus.
    /// - Model-layer errors raised by the runner.
    pub fn fit(&mut self, model: &mut M, corpus: &TrainingCorpus) -> TrainingResult<TrainingHistory> {
        let (train, valid) = if self.config.validation_fraction > 0.0 {
            let (train, valid) = corpus.split_validation(self.config.validation_fraction)?;
            (train, (!valid.is_empty()).then_some(valid))
        } else {
            (corpus.split_validation(0.0)?.0, None)
        };
        log::info!(
            "training on {} windows, validating on {}, for up to {} epochs",
            train.len(),
            valid.as_ref().map_or(0, |v| v.len()),
            self.config.epochs
        );

        let mut learning_rate = self.config.learning_rate;
        let mut history =
            TrainingHistory { epochs: Vec::new(), rollbacks: 0, learning_rate, stop_reason: None };

        for epoch in 0..self.config.epochs {
            let train_loss = self.runner.run_epoch(model, &train, learning_rate)?;
            let validation_loss = match &valid {
                Some(v) => Some(self.runner.evaluate(model, v)?),
                None => None,
            };
            let report = EpochReport { epoch, train_loss, validation_loss, learning_rate };
            log::debug!(
                "epoch {epoch}: loss = {train_loss:.6}, val_loss = {validation_loss:?}, lr = {learning_rate:e}"
            );
            history.epochs.push(report);

            let mut stop = None;
            for monitor in &mut self.monitors {
                match monitor.on_epoch_end(&report, model) {
                    TrainingSignal::Continue => {}
                    TrainingSignal::Rollback { checkpoint, learning_rate: lr, then_stop } => {
                        log::warn!(
                            "epoch {epoch}: loss {train_loss}, rolling back to epoch {} and cutting learning rate {learning_rate:e} -> {lr:e}",
                            checkpoint.epoch
                        );
                        *model = checkpoint.model;
                        learning_rate = lr;
                        history.rollbacks += 1;
                        stop = stop.or(then_stop);
                    }
                    TrainingSignal::Stop(reason) => {
                        stop = stop.or(Some(reason));
                    }
                }
            }
            if let Some(reason) = stop {
                log::info!("training stopped after epoch {epoch}: {reason}");
                history.stop_reason = Some(reason);
                break;
            }
        }
        history.learning_rate = learning_rate;
        Ok(history)
    }
}
