//! Collaborator interfaces for sequence models.
//!
//! - [`SequenceModel`]: anything that maps covariate windows to raw
//!   `(a, b)` outputs. This is the seam where a recurrent network would
//!   plug in; [`crate::hazard::OutputActivation`] and the censored loss sit
//!   downstream of it.
//! - [`TrainableHead`]: a [`SequenceModel`] with a flat parameter vector
//!   and an analytic gradient of its mean training loss, which is all the
//!   epoch runners in [`crate::training`] need.
use ndarray::{Array4, ArrayView3};

use crate::{
    events::TrainingCorpus,
    models::errors::ModelResult,
    optimization::loglik_optimizer::{Grad, Theta},
};

pub trait SequenceModel {
    /// Raw outputs shaped `(examples, winlen, 1, 2)` for covariates shaped
    /// `(examples, winlen, ncov)`.
    fn predict(&self, x: ArrayView3<'_, f64>) -> ModelResult<Array4<f64>>;
}

pub trait TrainableHead: SequenceModel + Clone {
    fn parameters(&self) -> &Theta;

    /// Replace the parameter vector.
    ///
    /// # Errors
    /// Length or finiteness violations.
    fn set_parameters(&mut self, theta: Theta) -> ModelResult<()>;

    /// Mean censored loss over every example and timestep of `corpus`.
    fn mean_loss(&self, corpus: &TrainingCorpus) -> ModelResult<f64>;

    /// Gradient of [`mean_loss`](Self::mean_loss) with respect to the
    /// parameters.
    fn mean_loss_gradient(&self, corpus: &TrainingCorpus) -> ModelResult<Grad>;
}
