//! Linear hazard head: per-timestep affine map to raw `(a, b)` outputs.
//!
//! Purpose
//! -------
//! A small reference [`SequenceModel`] that is fittable end to end with the
//! censored likelihood. For every timestep of every window
//!
//! ```text
//! a = θ_a0 + Σ_j θ_aj · x_j
//! b = θ_b0 + Σ_j θ_bj · x_j
//! ```
//!
//! and the raw pair goes through [`OutputActivation`] before reaching the
//! loss. The intercept-only design ignores covariates and fits one
//! `(scale, shape)` pair for the whole corpus.
//!
//! Key behaviors
//! -------------
//! - `θ = (θ_a0, θ_a1..θ_ak, θ_b0, θ_b1..θ_bk)`, length `2·(k + 1)`.
//! - `θ = 0` reproduces the activation seed `(iniscale, 1)` everywhere.
//! - [`LogLikelihood`] with `ℓ(θ) = −mean loss` and an analytic gradient:
//!   loss gradient w.r.t. `(scale, shape)` → activation Jacobian →
//!   covariate outer product.
//! - [`LinearHazardHead::fit`] maximizes `ℓ` with L-BFGS via [`maximize`]
//!   starting from the current parameters (warm start).
//!
//! Invariants & assumptions
//! ------------------------
//! - The affine design requires exactly `k` covariates per timestep.
//! - Non-finite losses are returned as values; the optimizer adapter turns
//!   them into [`OptError::NonFiniteCost`].
use ndarray::{s, Array1, Array3, Array4, ArrayView1, ArrayView3, ArrayView4, Axis, Zip};

use crate::{
    events::{initial_scale, TrainingCorpus},
    hazard::{CensoredLikelihoodLoss, HazardConfig, OutputActivation},
    models::{
        errors::{ModelError, ModelResult},
        traits::{SequenceModel, TrainableHead},
    },
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{
            maximize, validation::validate_theta_input, Grad, LogLikelihood, MLEOptions,
            OptimOutcome, Theta,
        },
    },
};

/// Which inputs feed the raw outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadDesign {
    /// Bias terms only; covariates are ignored.
    Intercept,
    /// Bias plus one weight per covariate.
    Affine { covariates: usize },
}

impl HeadDesign {
    pub fn covariates(&self) -> usize {
        match self {
            HeadDesign::Intercept => 0,
            HeadDesign::Affine { covariates } => *covariates,
        }
    }

    pub fn n_params(&self) -> usize {
        2 * (self.covariates() + 1)
    }
}

/// Affine hazard head with its activation, loss and optimizer options.
///
/// After [`fit`](Self::fit), `results` holds the optimizer outcome and the
/// head's parameters are the estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearHazardHead {
    pub design: HeadDesign,
    pub activation: OutputActivation,
    pub loss: CensoredLikelihoodLoss,
    pub options: MLEOptions,
    pub results: Option<OptimOutcome>,
    theta: Theta,
}

impl LinearHazardHead {
    /// Head with all parameters at zero.
    pub fn new(
        design: HeadDesign, activation: OutputActivation, loss: CensoredLikelihoodLoss,
        options: MLEOptions,
    ) -> Self {
        let theta = Theta::zeros(design.n_params());
        Self { design, activation, loss, options, results: None, theta }
    }

    /// Intercept-only baseline.
    pub fn intercept_only(
        activation: OutputActivation, loss: CensoredLikelihoodLoss, options: MLEOptions,
    ) -> Self {
        Self::new(HeadDesign::Intercept, activation, loss, options)
    }

    /// Build a head whose activation is seeded with the mean final-step TSE
    /// of the stream-level targets `y`, shaped `(nobs, nseq, 1, 4)` as
    /// returned by [`split_matrix`](crate::events::split_matrix).
    ///
    /// The seed is taken before windowing: the final step of each full
    /// stream, not of each window.
    ///
    /// # Errors
    /// - [`ModelError::Event`] when the scale seed is not positive.
    /// - [`ModelError::Hazard`] when the seed is rejected by the activation.
    pub fn seeded(
        design: HeadDesign, y: ArrayView4<'_, f64>, config: &HazardConfig, options: MLEOptions,
    ) -> ModelResult<Self> {
        let iniscale = initial_scale(y)?;
        let activation = OutputActivation::new(iniscale, config)?;
        Ok(Self::new(design, activation, CensoredLikelihoodLoss::new(config), options))
    }

    pub fn n_params(&self) -> usize {
        self.design.n_params()
    }

    /// Activated `(scale, shape)` predictions, `(examples, winlen, 1, 2)`.
    ///
    /// # Errors
    /// Covariate mismatches.
    pub fn predict_parameters(&self, x: ArrayView3<'_, f64>) -> ModelResult<Array4<f64>> {
        let raw = self.predict(x)?;
        let activated = self.activation.activate(raw.view().into_dyn())?;
        activated
            .into_dimensionality()
            .map_err(|e| ModelError::Layout { text: e.to_string() })
    }

    /// Fit by maximum likelihood, starting from the current parameters.
    ///
    /// # Errors
    /// Anything raised by [`maximize`], including objective failures wrapped
    /// as [`OptError::Objective`].
    pub fn fit(&mut self, corpus: &TrainingCorpus) -> OptResult<()> {
        let outcome = maximize(&*self, self.theta.clone(), corpus, &self.options)?;
        log::info!(
            "linear hazard head fitted: loglik = {:.6}, iterations = {}, status = {}",
            outcome.value,
            outcome.iterations,
            outcome.status
        );
        self.theta = outcome.theta_hat.clone();
        self.results = Some(outcome);
        Ok(())
    }

    fn check_covariates(&self, found: usize) -> ModelResult<()> {
        match self.design {
            HeadDesign::Affine { covariates } if covariates != found => {
                Err(ModelError::CovariateMismatch { expected: covariates, found })
            }
            _ => Ok(()),
        }
    }

    fn raw_outputs(&self, theta: ArrayView1<'_, f64>, x: ArrayView3<'_, f64>) -> ModelResult<Array4<f64>> {
        let (n, w, ncov) = x.dim();
        self.check_covariates(ncov)?;
        let k = self.design.covariates();
        let (a0, b0) = (theta[0], theta[k + 1]);
        let wa = theta.slice(s![1..k + 1]);
        let wb = theta.slice(s![k + 2..]);

        let mut out = Array3::<f64>::zeros((n, w, 2));
        Zip::from(out.lanes_mut(Axis(2))).and(x.lanes(Axis(2))).for_each(|mut o, xr| {
            o[0] = a0;
            o[1] = b0;
            if k > 0 {
                o[0] += wa.dot(&xr);
                o[1] += wb.dot(&xr);
            }
        });
        Ok(out.insert_axis(Axis(2)))
    }

    fn mean_loss_at(&self, theta: ArrayView1<'_, f64>, corpus: &TrainingCorpus) -> ModelResult<f64> {
        let raw = self.raw_outputs(theta, corpus.x.view())?;
        let activated = self.activation.activate(raw.view().into_dyn())?;
        Ok(self.loss.mean_loss(corpus.y.view().into_dyn(), activated.view())?)
    }

    fn mean_loss_gradient_at(
        &self, theta: ArrayView1<'_, f64>, corpus: &TrainingCorpus,
    ) -> ModelResult<Grad> {
        let k = self.design.covariates();
        let mut grad = Grad::zeros(self.n_params());
        let count = corpus.len() * corpus.winlen();
        if count == 0 {
            return Ok(grad);
        }

        let raw = self.raw_outputs(theta, corpus.x.view())?.into_dyn();
        let activated = self.activation.activate(raw.view())?;
        let d_activated = self.loss.gradient(corpus.y.view().into_dyn(), activated.view())?;
        let d_raw = self.activation.backpropagate(raw.view(), d_activated.view())?;
        let d_raw = d_raw
            .into_dimensionality::<ndarray::Ix4>()
            .map_err(|e| ModelError::Layout { text: e.to_string() })?;
        let d_raw = d_raw.index_axis(Axis(2), 0);

        Zip::from(d_raw.lanes(Axis(2))).and(corpus.x.lanes(Axis(2))).for_each(|g, xr| {
            grad[0] += g[0];
            grad[k + 1] += g[1];
            if k > 0 {
                grad.slice_mut(s![1..k + 1]).scaled_add(g[0], &xr);
                grad.slice_mut(s![k + 2..]).scaled_add(g[1], &xr);
            }
        });
        grad /= count as f64;
        Ok(grad)
    }
}

impl SequenceModel for LinearHazardHead {
    fn predict(&self, x: ArrayView3<'_, f64>) -> ModelResult<Array4<f64>> {
        self.raw_outputs(self.theta.view(), x)
    }
}

impl TrainableHead for LinearHazardHead {
    fn parameters(&self) -> &Theta {
        &self.theta
    }

    fn set_parameters(&mut self, theta: Theta) -> ModelResult<()> {
        if theta.len() != self.n_params() {
            return Err(ModelError::ParameterLength { expected: self.n_params(), found: theta.len() });
        }
        if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ModelError::NonFiniteParameter { index, value });
        }
        self.theta = theta;
        Ok(())
    }

    fn mean_loss(&self, corpus: &TrainingCorpus) -> ModelResult<f64> {
        self.mean_loss_at(self.theta.view(), corpus)
    }

    fn mean_loss_gradient(&self, corpus: &TrainingCorpus) -> ModelResult<Grad> {
        self.mean_loss_gradient_at(self.theta.view(), corpus)
    }
}

impl LogLikelihood for LinearHazardHead {
    type Data = TrainingCorpus;

    /// `ℓ(θ) = −mean loss`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        Ok(-self.mean_loss_at(theta.view(), data)?)
    }

    /// Length/finiteness of `θ`, a non-empty corpus and a matching
    /// covariate axis.
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        validate_theta_input(theta, self.n_params())?;
        if data.is_empty() {
            return Err(OptError::EmptyData);
        }
        self.check_covariates(data.covariates())?;
        Ok(())
    }

    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        let g: Array1<f64> = self.mean_loss_gradient_at(theta.view(), data)?;
        Ok(-g)
    }
}
