//! OutputActivation — raw network outputs to valid hazard parameters.
//!
//! Purpose
//! -------
//! Map the two unconstrained outputs `(a, b)` of a sequence model onto a
//! positive scale and a bounded shape:
//!
//! ```text
//! scale = iniscale · exp(a)
//! shape = m · clip(σ(b − ln(m − 1)), ε, 1 − ε)   if m > 1
//! shape = m · clip(σ(b), ε, 1 − ε)               otherwise
//! ```
//!
//! At `a = b = 0` the activation returns `(iniscale, 1)` whenever `m > 1`,
//! so an untrained model starts at the exponential (shape 1) hazard whose
//! maximum-likelihood scale is `iniscale`.
//!
//! Key behaviors
//! -------------
//! - Scalar maps ([`OutputActivation::scale`], [`OutputActivation::shape`])
//!   and a tensor map over any array whose last axis has length 2.
//! - [`OutputActivation::backpropagate`] pulls a gradient with respect to
//!   the activated `(scale, shape)` back to the raw `(a, b)`. Inside the
//!   clip `∂shape/∂b = m·σ(1 − σ)`; on the clipped plateau it is 0.
//!
//! Invariants & assumptions
//! ------------------------
//! - `iniscale > 0` and finite, enforced by [`OutputActivation::new`].
//! - `scale` overflows to `+∞` for `a ≳ 709 − ln(iniscale)`; no clamp is
//!   applied there.
use ndarray::{ArrayD, ArrayViewD, Axis, Zip};

use crate::{
    hazard::{
        config::HazardConfig,
        errors::{HazardError, HazardResult},
    },
    optimization::numerical_stability::{clip, safe_logistic},
};

/// Elementwise activation with a fixed scale seed and shape ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputActivation {
    initial_scale: f64,
    max_shape: f64,
    epsilon: f64,
    shape_offset: f64,
}

impl OutputActivation {
    /// # Errors
    /// [`HazardError::InvalidInitialScale`] unless `initial_scale` is
    /// finite and positive.
    pub fn new(initial_scale: f64, config: &HazardConfig) -> HazardResult<Self> {
        if !(initial_scale.is_finite() && initial_scale > 0.0) {
            return Err(HazardError::InvalidInitialScale { value: initial_scale });
        }
        let max_shape = config.max_shape;
        let shape_offset = if max_shape > 1.0 { (max_shape - 1.0).ln() } else { 0.0 };
        Ok(Self { initial_scale, max_shape, epsilon: config.epsilon, shape_offset })
    }

    pub fn initial_scale(&self) -> f64 {
        self.initial_scale
    }

    pub fn max_shape(&self) -> f64 {
        self.max_shape
    }

    pub fn scale(&self, a: f64) -> f64 {
        self.initial_scale * a.exp()
    }

    pub fn shape(&self, b: f64) -> f64 {
        let sigma = safe_logistic(b - self.shape_offset);
        self.max_shape * clip(sigma, self.epsilon, 1.0 - self.epsilon)
    }

    /// `∂shape/∂b`, zero where the clip is active.
    pub fn shape_derivative(&self, b: f64) -> f64 {
        let sigma = safe_logistic(b - self.shape_offset);
        if sigma <= self.epsilon || sigma >= 1.0 - self.epsilon {
            0.0
        } else {
            self.max_shape * sigma * (1.0 - sigma)
        }
    }

    /// Activate a tensor whose last axis holds `(a, b)`.
    ///
    /// # Errors
    /// [`HazardError::RankTooLow`] for a 0-d input,
    /// [`HazardError::TrailingAxis`] when the last axis is not 2.
    pub fn activate(&self, raw: ArrayViewD<'_, f64>) -> HazardResult<ArrayD<f64>> {
        let last = pair_axis(&raw, "raw output")?;
        let mut out = raw.to_owned();
        for mut lane in out.lanes_mut(last) {
            lane[0] = self.scale(lane[0]);
            lane[1] = self.shape(lane[1]);
        }
        Ok(out)
    }

    /// Chain rule through the activation.
    ///
    /// Given `∂L/∂(scale, shape)` laid out like the activated tensor, return
    /// `∂L/∂(a, b)` laid out like `raw`.
    ///
    /// # Errors
    /// Same shape errors as [`activate`](Self::activate), plus
    /// [`HazardError::LeadingShapeMismatch`] when the two tensors differ.
    pub fn backpropagate(
        &self, raw: ArrayViewD<'_, f64>, grad_activated: ArrayViewD<'_, f64>,
    ) -> HazardResult<ArrayD<f64>> {
        let last = pair_axis(&raw, "raw output")?;
        if raw.shape() != grad_activated.shape() {
            return Err(HazardError::LeadingShapeMismatch {
                targets: grad_activated.shape().to_vec(),
                predictions: raw.shape().to_vec(),
            });
        }
        let mut out = ArrayD::<f64>::zeros(raw.raw_dim());
        Zip::from(out.lanes_mut(last))
            .and(raw.lanes(last))
            .and(grad_activated.lanes(last))
            .for_each(|mut g, r, up| {
                g[0] = up[0] * self.scale(r[0]);
                g[1] = up[1] * self.shape_derivative(r[1]);
            });
        Ok(out)
    }
}

/// Index of the trailing `(·, ·)` axis, validated.
fn pair_axis(raw: &ArrayViewD<'_, f64>, tensor: &'static str) -> HazardResult<Axis> {
    if raw.ndim() == 0 {
        return Err(HazardError::RankTooLow { tensor, min: 1, rank: 0 });
    }
    let last = raw.ndim() - 1;
    if raw.shape()[last] != 2 {
        return Err(HazardError::TrailingAxis { tensor, expected: 2, found: raw.shape().to_vec() });
    }
    Ok(Axis(last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hazard::regime::HazardRegime;
    use approx::assert_relative_eq;
    use ndarray::{array, IxDyn};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Seed point (a, b) = (0, 0) → (iniscale, 1).
    // - Shape bounds and the m ≤ 1 branch.
    // - Tensor layout handling and shape errors.
    // - The Jacobian used by `backpropagate`.
    //
    // Randomized bound checks live in tests/properties.rs.
    // -------------------------------------------------------------------------

    fn activation(iniscale: f64, max_shape: f64) -> OutputActivation {
        let config = HazardConfig::new(1e-7, max_shape, HazardRegime::Standard).unwrap();
        OutputActivation::new(iniscale, &config).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Zero raw outputs reproduce the exponential seed: scale = iniscale and
    // shape = m·σ(-ln(m-1)) = 1.
    //
    // Given
    // -----
    // - iniscale = 12.5, m = 10.
    //
    // Expect
    // ------
    // - (12.5, 1.0).
    fn zero_outputs_map_to_seed_scale_and_unit_shape() {
        let act = activation(12.5, 10.0);

        assert_relative_eq!(act.scale(0.0), 12.5);
        assert_relative_eq!(act.shape(0.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Extreme raw shape outputs are clipped strictly inside (0, m).
    fn shape_is_clipped_inside_open_interval() {
        let act = activation(1.0, 10.0);

        let hi = act.shape(50.0);
        let lo = act.shape(-50.0);

        assert_relative_eq!(hi, 10.0 * (1.0 - 1e-7), epsilon = 1e-12);
        assert_relative_eq!(lo, 10.0 * 1e-7, epsilon = 1e-15);
        assert!(hi < 10.0 && lo > 0.0);
        assert_eq!(act.shape_derivative(50.0), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // With m ≤ 1 the logistic is not shifted, so b = 0 gives m/2.
    fn small_max_shape_uses_unshifted_logistic() {
        let act = activation(1.0, 0.8);

        assert_relative_eq!(act.shape(0.0), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn activate_maps_every_pair_in_a_tensor() {
        let act = activation(2.0, 10.0);
        let raw = array![[[0.0, 0.0], [1.0, 3.0]]].into_dyn();

        let out = act.activate(raw.view()).unwrap();

        assert_eq!(out.shape(), &[1, 2, 2]);
        assert_relative_eq!(out[[0, 1, 0]], 2.0 * 1.0_f64.exp(), epsilon = 1e-12);
        assert_relative_eq!(out[[0, 1, 1]], act.shape(3.0), epsilon = 1e-12);
    }

    #[test]
    fn activate_rejects_wrong_trailing_axis() {
        let act = activation(2.0, 10.0);
        let raw = ArrayD::<f64>::zeros(IxDyn(&[3, 4]));

        let err = act.activate(raw.view()).unwrap_err();

        assert!(matches!(err, HazardError::TrailingAxis { expected: 2, .. }));
    }

    #[test]
    fn new_rejects_non_positive_initial_scale() {
        let config = HazardConfig::default();

        assert_eq!(
            OutputActivation::new(0.0, &config).unwrap_err(),
            HazardError::InvalidInitialScale { value: 0.0 }
        );
    }

    #[test]
    // Purpose
    // -------
    // `backpropagate` applies ∂scale/∂a = scale and ∂shape/∂b = m·σ(1-σ),
    // checked against central differences.
    fn backpropagate_matches_finite_differences() {
        // Arrange
        let act = activation(3.0, 10.0);
        let (a, b, h) = (0.4, -0.7, 1e-6);
        let raw = array![[a, b]].into_dyn();
        let upstream = array![[1.0, 1.0]].into_dyn();

        // Act
        let g = act.backpropagate(raw.view(), upstream.view()).unwrap();

        // Assert
        let fd_a = (act.scale(a + h) - act.scale(a - h)) / (2.0 * h);
        let fd_b = (act.shape(b + h) - act.shape(b - h)) / (2.0 * h);
        assert_relative_eq!(g[[0, 0]], fd_a, max_relative = 1e-7);
        assert_relative_eq!(g[[0, 1]], fd_b, max_relative = 1e-7);
    }
}
