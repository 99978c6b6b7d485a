//! Epoch monitors and the signals they emit.
//!
//! Purpose
//! -------
//! Decide, after every epoch, whether training continues, stops, or rolls
//! back to an earlier model. Monitors never touch the model or the
//! optimizer themselves; they return a [`TrainingSignal`] and the loop in
//! [`crate::training::trainer`] applies it.
//!
//! Key behaviors
//! -------------
//! - [`TacticalRetreat`]: stores a checkpoint after every epoch with a
//!   finite training loss. On a NaN training loss it emits
//!   [`TrainingSignal::Rollback`] to that checkpoint with the learning rate
//!   cut to `max(lr_min, lr · lr_factor)`, and asks to stop once the cut
//!   rate sits on the floor. Without a checkpoint it emits
//!   [`TrainingSignal::Stop`].
//! - [`EarlyStopping`]: tracks the best monitored loss; every epoch without
//!   a strict improvement increments a counter, an improvement resets it,
//!   and the counter exceeding `patience` stops training. Non-finite losses
//!   are skipped (divergence is the retreat monitor's business).
use std::fmt;

use crate::training::config::MonitoredLoss;

/// Losses and learning rate of one finished epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    pub train_loss: f64,
    pub validation_loss: Option<f64>,
    pub learning_rate: f64,
}

impl EpochReport {
    /// The loss selected by `which`, falling back to the training loss when
    /// no validation loss exists.
    pub fn monitored(&self, which: MonitoredLoss) -> f64 {
        match (which, self.validation_loss) {
            (MonitoredLoss::ValLoss, Some(v)) => v,
            _ => self.train_loss,
        }
    }
}

/// A stored model together with the epoch and loss it was taken at.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint<M> {
    pub epoch: usize,
    pub loss: f64,
    pub model: M,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopReason {
    /// Training diverged before any finite epoch.
    NoCheckpoint,
    /// The learning rate was cut down to its floor.
    LearningRateFloor { learning_rate: f64 },
    /// No improvement for more than `patience` epochs.
    EarlyStopping { best: f64, best_epoch: usize },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::NoCheckpoint => write!(f, "diverged with no finite checkpoint"),
            StopReason::LearningRateFloor { learning_rate } => {
                write!(f, "learning rate reached its floor ({learning_rate:e})")
            }
            StopReason::EarlyStopping { best, best_epoch } => {
                write!(f, "early stopping, best loss {best:.6} at epoch {best_epoch}")
            }
        }
    }
}

/// What the loop should do after an epoch.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingSignal<M> {
    Continue,
    Stop(StopReason),
    /// Restore `checkpoint`, continue with `learning_rate`, and stop
    /// afterwards when `then_stop` is set.
    Rollback { checkpoint: Checkpoint<M>, learning_rate: f64, then_stop: Option<StopReason> },
}

pub trait Monitor<M> {
    fn on_epoch_end(&mut self, report: &EpochReport, model: &M) -> TrainingSignal<M>;
}

/// Last-good checkpointing plus learning-rate retreat on NaN losses.
#[derive(Debug, Clone)]
pub struct TacticalRetreat<M> {
    lr_factor: f64,
    lr_min: f64,
    last_good: Option<Checkpoint<M>>,
}

impl<M: Clone> TacticalRetreat<M> {
    pub fn new(lr_factor: f64, lr_min: f64) -> Self {
        Self { lr_factor, lr_min, last_good: None }
    }

    pub fn last_good(&self) -> Option<&Checkpoint<M>> {
        self.last_good.as_ref()
    }
}

impl<M: Clone> Monitor<M> for TacticalRetreat<M> {
    fn on_epoch_end(&mut self, report: &EpochReport, model: &M) -> TrainingSignal<M> {
        if !report.train_loss.is_nan() {
            self.last_good =
                Some(Checkpoint { epoch: report.epoch, loss: report.train_loss, model: model.clone() });
            return TrainingSignal::Continue;
        }
        let Some(checkpoint) = self.last_good.clone() else {
            return TrainingSignal::Stop(StopReason::NoCheckpoint);
        };
        let learning_rate = self.lr_min.max(report.learning_rate * self.lr_factor);
        let then_stop = (learning_rate == self.lr_min)
            .then_some(StopReason::LearningRateFloor { learning_rate });
        TrainingSignal::Rollback { checkpoint, learning_rate, then_stop }
    }
}

/// Patience-based early stopping on the monitored loss.
#[derive(Debug, Clone, PartialEq)]
pub struct EarlyStopping {
    patience: usize,
    monitor: MonitoredLoss,
    best: f64,
    best_epoch: usize,
    wait: usize,
}

impl EarlyStopping {
    pub fn new(patience: usize, monitor: MonitoredLoss) -> Self {
        Self { patience, monitor, best: f64::INFINITY, best_epoch: 0, wait: 0 }
    }

    pub fn best(&self) -> f64 {
        self.best
    }

    pub fn wait(&self) -> usize {
        self.wait
    }
}

impl<M> Monitor<M> for EarlyStopping {
    fn on_epoch_end(&mut self, report: &EpochReport, _model: &M) -> TrainingSignal<M> {
        let loss = report.monitored(self.monitor);
        if !loss.is_finite() {
            return TrainingSignal::Continue;
        }
        if loss < self.best {
            self.best = loss;
            self.best_epoch = report.epoch;
            self.wait = 0;
        } else {
            self.wait += 1;
        }
        if self.wait > self.patience {
            return TrainingSignal::Stop(StopReason::EarlyStopping {
                best: self.best,
                best_epoch: self.best_epoch,
            });
        }
        TrainingSignal::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Signal sequences of both monitors on scripted epoch reports. The loop
    // that applies them is tested in `trainer`.
    // -------------------------------------------------------------------------

    fn report(epoch: usize, train_loss: f64, learning_rate: f64) -> EpochReport {
        EpochReport { epoch, train_loss, validation_loss: None, learning_rate }
    }

    #[test]
    // Purpose
    // -------
    // NaN after a finite epoch rolls back to that epoch's model with a
    // tenfold smaller learning rate.
    //
    // Given
    // -----
    // - Epoch 0 finite with model "a", epoch 1 finite with model "b",
    //   epoch 2 NaN.
    //
    // Expect
    // ------
    // - Rollback to "b" (epoch 1) at lr 0.01·0.1, no stop.
    fn retreat_rolls_back_to_last_finite_epoch() {
        // Arrange
        let mut retreat = TacticalRetreat::new(0.1, 1e-9);

        // Act
        retreat.on_epoch_end(&report(0, 3.0, 0.01), &"a");
        retreat.on_epoch_end(&report(1, 2.0, 0.01), &"b");
        let signal = retreat.on_epoch_end(&report(2, f64::NAN, 0.01), &"nan");

        // Assert
        match signal {
            TrainingSignal::Rollback { checkpoint, learning_rate, then_stop } => {
                assert_eq!(checkpoint.model, "b");
                assert_eq!(checkpoint.epoch, 1);
                assert!((learning_rate - 0.001).abs() < 1e-15);
                assert_eq!(then_stop, None);
            }
            other => panic!("expected rollback, got {other:?}"),
        }
    }

    #[test]
    fn retreat_without_checkpoint_stops() {
        let mut retreat = TacticalRetreat::<u8>::new(0.1, 1e-9);

        let signal = retreat.on_epoch_end(&report(0, f64::NAN, 0.01), &0);

        assert_eq!(signal, TrainingSignal::Stop(StopReason::NoCheckpoint));
    }

    #[test]
    // Purpose
    // -------
    // A cut that lands on the floor still rolls back, then stops.
    fn retreat_stops_once_learning_rate_hits_floor() {
        let mut retreat = TacticalRetreat::new(0.1, 1e-3);
        retreat.on_epoch_end(&report(0, 1.0, 0.005), &7);

        let signal = retreat.on_epoch_end(&report(1, f64::NAN, 0.005), &8);

        assert_eq!(
            signal,
            TrainingSignal::Rollback {
                checkpoint: Checkpoint { epoch: 0, loss: 1.0, model: 7 },
                learning_rate: 1e-3,
                then_stop: Some(StopReason::LearningRateFloor { learning_rate: 1e-3 }),
            }
        );
    }

    #[test]
    // Purpose
    // -------
    // Every epoch without strict improvement counts, including worse ones;
    // the stop fires when the count exceeds patience.
    //
    // Given
    // -----
    // - patience 2, losses 5, 4, 4.5, 4, 6.
    //
    // Expect
    // ------
    // - Continue until the fifth epoch (wait = 3), then stop with best 4 at
    //   epoch 1.
    fn early_stopping_counts_epochs_without_improvement() {
        let mut stop = EarlyStopping::new(2, MonitoredLoss::Loss);
        let losses = [5.0, 4.0, 4.5, 4.0, 6.0];

        let signals: Vec<TrainingSignal<()>> = losses
            .iter()
            .enumerate()
            .map(|(e, &l)| stop.on_epoch_end(&report(e, l, 0.01), &()))
            .collect();

        assert!(signals[..4].iter().all(|s| *s == TrainingSignal::Continue));
        assert_eq!(
            signals[4],
            TrainingSignal::Stop(StopReason::EarlyStopping { best: 4.0, best_epoch: 1 })
        );
    }

    #[test]
    fn early_stopping_skips_non_finite_and_prefers_validation_loss() {
        let mut stop = EarlyStopping::new(0, MonitoredLoss::ValLoss);
        let with_val =
            EpochReport { epoch: 0, train_loss: 9.0, validation_loss: Some(2.0), learning_rate: 0.1 };

        let _: TrainingSignal<()> = stop.on_epoch_end(&with_val, &());
        let nan: TrainingSignal<()> = stop.on_epoch_end(&report(1, f64::NAN, 0.1), &());

        assert_eq!(stop.best(), 2.0);
        assert_eq!(nan, TrainingSignal::Continue);
        assert_eq!(stop.wait(), 0);
    }
}
