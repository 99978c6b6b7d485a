//! training — explicit epoch loop with divergence handling.
//!
//! Purpose
//! -------
//! Drive a [`TrainableHead`](crate::models::TrainableHead) (or any model an
//! [`EpochRunner`] knows how to update) over a
//! [`TrainingCorpus`](crate::events::TrainingCorpus), reacting to NaN losses
//! and stalled validation loss.
//!
//! Key behaviors
//! -------------
//! - Monitors return [`TrainingSignal`] values (`Continue`, `Stop`,
//!   `Rollback`); only [`Trainer::fit`] mutates the model or the learning
//!   rate.
//! - [`TacticalRetreat`] keeps the last finite checkpoint and cuts the
//!   learning rate on divergence; [`EarlyStopping`] counts epochs without
//!   improvement.
//! - [`GradientDescentRunner`] is the reference stepper: batches in corpus
//!   order, value clipping, plain gradient steps.
//!
//! Conventions
//! -----------
//! - Epoch outcomes are logged at debug level, rollbacks at warn, start and
//!   stop at info.

pub mod config;
pub mod errors;
pub mod monitor;
pub mod runner;
pub mod trainer;

pub use self::config::{MonitoredLoss, TrainingConfig};
pub use self::errors::{TrainingError, TrainingResult};
pub use self::monitor::{
    Checkpoint, EarlyStopping, EpochReport, Monitor, StopReason, TacticalRetreat, TrainingSignal,
};
pub use self::runner::{EpochRunner, GradientDescentRunner};
pub use self::trainer::{Trainer, TrainingHistory};

pub mod prelude {
    pub use super::{
        EpochRunner, GradientDescentRunner, MonitoredLoss, Trainer, TrainingConfig, TrainingError,
        TrainingHistory, TrainingSignal,
    };
}
