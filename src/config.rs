//! Run configuration loaded from TOML.
//!
//! One file groups the four option sets a training run needs:
//!
//! ```toml
//! [hazard]
//! epsilon = 1e-7
//! max_shape = 10.0
//! regime = "standard"     # or "wtte"
//!
//! [corpus]
//! winlen = 78
//! padding_sentinel = -1.0
//!
//! [training]
//! epochs = 100
//! learning_rate = 0.01
//! clip_value = 5.0
//! monitor = "val_loss"    # or "loss"
//!
//! [optimizer]
//! tol_grad = 1e-6
//! max_iter = 300
//! line_searcher = "MoreThuente"
//! ```
//!
//! Every table and field is optional and falls back to its default. Unknown
//! keys are rejected. Values are validated after parsing, so a file that
//! parses always yields usable settings.
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::{
    events::{CorpusConfig, EventError},
    hazard::{HazardConfig, HazardError},
    optimization::{
        errors::OptError,
        loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
    },
    training::{TrainingConfig, TrainingError},
};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Could not read configuration file {path}: {text}")]
    Io { path: String, text: String },

    #[error("Invalid configuration syntax: {text}")]
    Parse { text: String },

    #[error("Invalid [hazard] settings: {0}")]
    Hazard(#[from] HazardError),

    #[error("Invalid [corpus] settings: {0}")]
    Corpus(#[from] EventError),

    #[error("Invalid [training] settings: {0}")]
    Training(#[from] TrainingError),

    #[error("Invalid [optimizer] settings: {0}")]
    Optimizer(#[from] OptError),
}

/// L-BFGS settings in file form; converted with
/// [`OptimizerConfig::mle_options`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerConfig {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
    pub line_searcher: String,
    pub lbfgs_mem: Option<usize>,
    pub verbose: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            tol_grad: Some(1e-6),
            tol_cost: None,
            max_iter: Some(300),
            line_searcher: "MoreThuente".to_string(),
            lbfgs_mem: None,
            verbose: false,
        }
    }
}

impl OptimizerConfig {
    /// # Errors
    /// Tolerance, line-search or memory errors from the optimizer layer.
    pub fn mle_options(&self) -> ConfigResult<MLEOptions> {
        let tols = Tolerances::new(self.tol_grad, self.tol_cost, self.max_iter)?;
        let line_searcher: LineSearcher = self.line_searcher.parse()?;
        Ok(MLEOptions::new(tols, line_searcher, self.verbose, self.lbfgs_mem)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub hazard: HazardConfig,
    pub corpus: CorpusConfig,
    pub training: TrainingConfig,
    pub optimizer: OptimizerConfig,
}

impl RunConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    /// [`ConfigError::Parse`] for syntax/type errors and unknown keys, then
    /// the first validation error of the sections in file order.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: RunConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse { text: e.to_string() })?;
        config.validate()?;
        log::debug!("loaded run configuration: {config:?}");
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    /// [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            text: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.hazard.validate()?;
        self.corpus.validate()?;
        self.training.validate()?;
        self.optimizer.mle_options()?;
        Ok(())
    }
}
