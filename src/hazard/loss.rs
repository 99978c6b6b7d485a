//! CensoredLikelihoodLoss — negative censored log-likelihood over tensors.
//!
//! Purpose
//! -------
//! Turn labelled targets and activated hazard parameters into a
//! per-example loss that a gradient-based trainer can minimize. This is the
//! excess-conditional-hazard objective; with [`HazardRegime::Wtte`](crate::hazard::HazardRegime::Wtte) it is the
//! WTTE-RNN discrete Weibull objective.
//!
//! Key behaviors
//! -------------
//! - Targets `y_true[..., 4] = (tse, tte, uncensored, eligible)`, predictions
//!   `y_pred[..., 2] = (scale, shape)`. All leading axes must agree.
//! - Per element: `ℓ = eligible · (u·log_pmf + (1-u)·log_survival)`.
//! - `ℓ` is summed over the event-type axis (the axis just before the last)
//!   and negated. For targets shaped `(examples, winlen, types, 4)` the loss
//!   is shaped `(examples, winlen)`.
//! - [`CensoredLikelihoodLoss::gradient`] returns `∂loss/∂(scale, shape)`
//!   with the layout of `y_pred`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Scale/shape bounds are not re-validated; out-of-domain parameters show
//!   up as NaN in the output, never as an error.
//! - Ineligible positions (before a stream's first event) are skipped in
//!   both the loss and the gradient: they contribute exactly zero even where
//!   their likelihood term would be NaN or ±∞.
//!
//! Conventions
//! -----------
//! - Only shape problems are errors ([`HazardError`]).
//! - [`SquaredErrorLoss`] is a point-prediction baseline with the same
//!   tensor contract, using `y_pred[..., 0]` as the predicted TTE.
use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn, Zip};

use crate::hazard::{
    config::HazardConfig,
    errors::{HazardError, HazardResult},
    model::HazardModel,
};

/// Indices into the target axis.
pub const TSE: usize = 0;
pub const TTE: usize = 1;
pub const UNCENSORED: usize = 2;
pub const ELIGIBLE: usize = 3;

/// Negative censored log-likelihood for one hazard configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CensoredLikelihoodLoss {
    model: HazardModel,
}

impl CensoredLikelihoodLoss {
    pub fn new(config: &HazardConfig) -> Self {
        Self { model: HazardModel::from_config(config) }
    }

    pub fn model(&self) -> &HazardModel {
        &self.model
    }

    /// Eligibility-weighted log-likelihood before summing and negation,
    /// shaped like `y_true` without its last axis.
    ///
    /// # Errors
    /// See [`check_pair`].
    pub fn log_likelihood(
        &self, y_true: ArrayViewD<'_, f64>, y_pred: ArrayViewD<'_, f64>,
    ) -> HazardResult<ArrayD<f64>> {
        let last = check_pair(&y_true, &y_pred)?;
        let mut out = ArrayD::<f64>::zeros(IxDyn(&y_true.shape()[..last.index()]));
        Zip::from(&mut out)
            .and(y_true.lanes(last))
            .and(y_pred.lanes(last))
            .for_each(|o, t, p| {
                let eligible = t[ELIGIBLE];
                if eligible == 0.0 {
                    return;
                }
                let ll = self.model.log_likelihood(t[TSE], t[TTE], t[UNCENSORED], p[0], p[1]);
                *o = eligible * ll;
            });
        Ok(out)
    }

    /// Per-example loss: `-Σ_types eligible·ℓ`.
    ///
    /// # Errors
    /// See [`check_pair`].
    pub fn loss(
        &self, y_true: ArrayViewD<'_, f64>, y_pred: ArrayViewD<'_, f64>,
    ) -> HazardResult<ArrayD<f64>> {
        let weighted = self.log_likelihood(y_true, y_pred)?;
        let types = Axis(weighted.ndim() - 1);
        Ok(weighted.sum_axis(types).mapv(|v| -v))
    }

    /// Mean of [`loss`](Self::loss) over all examples and timesteps.
    ///
    /// # Errors
    /// See [`check_pair`].
    pub fn mean_loss(
        &self, y_true: ArrayViewD<'_, f64>, y_pred: ArrayViewD<'_, f64>,
    ) -> HazardResult<f64> {
        let loss = self.loss(y_true, y_pred)?;
        Ok(loss.mean().unwrap_or(0.0))
    }

    /// `∂loss/∂(scale, shape)` for every element, laid out like `y_pred`.
    ///
    /// # Errors
    /// See [`check_pair`].
    pub fn gradient(
        &self, y_true: ArrayViewD<'_, f64>, y_pred: ArrayViewD<'_, f64>,
    ) -> HazardResult<ArrayD<f64>> {
        let last = check_pair(&y_true, &y_pred)?;
        let mut grad = ArrayD::<f64>::zeros(y_pred.raw_dim());
        Zip::from(grad.lanes_mut(last))
            .and(y_true.lanes(last))
            .and(y_pred.lanes(last))
            .for_each(|mut g, t, p| {
                let eligible = t[ELIGIBLE];
                if eligible == 0.0 {
                    return;
                }
                let d = self.model.log_likelihood_partials(
                    t[TSE],
                    t[TTE],
                    t[UNCENSORED],
                    p[0],
                    p[1],
                );
                g[0] = -eligible * d.d_scale;
                g[1] = -eligible * d.d_shape;
            });
        Ok(grad)
    }
}

/// Squared-error baseline: `Σ_types eligible·uncensored·(ŷ₀ − tte)²`.
///
/// Only uncensored, eligible positions carry a known TTE, so everything
/// else is masked out.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SquaredErrorLoss;

impl SquaredErrorLoss {
    /// # Errors
    /// See [`check_pair`].
    pub fn loss(
        &self, y_true: ArrayViewD<'_, f64>, y_pred: ArrayViewD<'_, f64>,
    ) -> HazardResult<ArrayD<f64>> {
        let last = check_pair(&y_true, &y_pred)?;
        let mut out = ArrayD::<f64>::zeros(IxDyn(&y_true.shape()[..last.index()]));
        Zip::from(&mut out)
            .and(y_true.lanes(last))
            .and(y_pred.lanes(last))
            .for_each(|o, t, p| {
                let err = p[0] - t[TTE];
                *o = t[ELIGIBLE] * t[UNCENSORED] * err * err;
            });
        Ok(out.sum_axis(Axis(last.index() - 1)))
    }
}

/// Validate a `(targets, predictions)` pair and return the trailing axis.
///
/// Rules:
/// - both tensors have at least 2 axes (event-type axis + value axis),
/// - `y_true` ends in 4, `y_pred` ends in 2,
/// - all other axes are identical.
///
/// # Errors
/// [`HazardError::RankTooLow`], [`HazardError::TrailingAxis`] or
/// [`HazardError::LeadingShapeMismatch`].
pub fn check_pair(y_true: &ArrayViewD<'_, f64>, y_pred: &ArrayViewD<'_, f64>) -> HazardResult<Axis> {
    if y_true.ndim() < 2 {
        return Err(HazardError::RankTooLow { tensor: "targets", min: 2, rank: y_true.ndim() });
    }
    if y_pred.ndim() < 2 {
        return Err(HazardError::RankTooLow { tensor: "predictions", min: 2, rank: y_pred.ndim() });
    }
    let last = y_true.ndim() - 1;
    if y_true.shape()[last] != 4 {
        return Err(HazardError::TrailingAxis {
            tensor: "targets",
            expected: 4,
            found: y_true.shape().to_vec(),
        });
    }
    if y_pred.shape()[y_pred.ndim() - 1] != 2 {
        return Err(HazardError::TrailingAxis {
            tensor: "predictions",
            expected: 2,
            found: y_pred.shape().to_vec(),
        });
    }
    if y_true.shape()[..last] != y_pred.shape()[..y_pred.ndim() - 1] {
        return Err(HazardError::LeadingShapeMismatch {
            targets: y_true.shape().to_vec(),
            predictions: y_pred.shape().to_vec(),
        });
    }
    Ok(Axis(last))
}
