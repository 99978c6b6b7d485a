//! Validation helpers for log-likelihood optimization.
//!
//! - **Tolerances**: [`verify_tol_grad`], [`verify_tol_cost`].
//! - **Gradients**: [`validate_grad`] (dimension and finiteness).
//! - **Parameter vectors**: [`validate_theta_input`] for caller-supplied
//!   starting points, [`validate_theta_hat`] for solver output.
//! - **Objective values**: [`validate_value`].
//!
//! Every helper reports the first offending entry through a dedicated
//! [`OptError`] variant.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta},
};

/// Validate the optional gradient-norm tolerance.
///
/// # Errors
/// [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost-change tolerance.
///
/// # Errors
/// [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if `grad.len() != dim`.
/// - [`OptError::InvalidGradient`] for the first NaN/±∞ entry.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate a caller-supplied parameter vector before it reaches a model.
///
/// # Errors
/// - [`OptError::ThetaLengthMismatch`] if `theta.len() != expected`.
/// - [`OptError::InvalidThetaInput`] for the first non-finite entry.
pub fn validate_theta_input(theta: &Theta, expected: usize) -> OptResult<()> {
    if theta.len() != expected {
        return Err(OptError::ThetaLengthMismatch { expected, actual: theta.len() });
    }
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidThetaInput { index, value });
        }
    }
    Ok(())
}

/// Validate and unwrap the solver's best parameter vector.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was produced.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidThetaHat {
                index,
                value,
                reason: "Parameter estimates must be finite.",
            });
        }
    }
    Ok(theta)
}

/// Validate that a scalar log-likelihood value is finite.
///
/// # Errors
/// [`OptError::NonFiniteCost`] if the value is NaN or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Covers the accept/reject boundary of every validation helper. The
    // optimizer paths that call them are exercised in `api` and the
    // integration tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Tolerances accept `None` and positive finite values only.
    fn tolerance_checks_reject_non_positive_and_non_finite() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_grad(Some(1e-8)).is_ok());
        assert!(matches!(verify_tol_grad(Some(0.0)), Err(OptError::InvalidTolGrad { .. })));
        assert!(matches!(
            verify_tol_cost(Some(f64::NAN)),
            Err(OptError::InvalidTolCost { .. })
        ));
        assert!(matches!(verify_tol_cost(Some(-1.0)), Err(OptError::InvalidTolCost { .. })));
    }

    #[test]
    // Purpose
    // -------
    // `validate_grad` reports the length mismatch before looking at values.
    //
    // Given
    // -----
    // - A length-2 gradient containing NaN, validated against dim = 3.
    //
    // Expect
    // ------
    // - `GradientDimMismatch { expected: 3, found: 2 }`.
    fn validate_grad_checks_dimension_first() {
        let grad = array![f64::NAN, 1.0];

        let err = validate_grad(&grad, 3).unwrap_err();

        assert_eq!(err, OptError::GradientDimMismatch { expected: 3, found: 2 });
    }

    #[test]
    fn validate_grad_reports_first_non_finite_index() {
        let grad = array![1.0, f64::INFINITY, f64::NAN];

        let err = validate_grad(&grad, 3).unwrap_err();

        assert!(matches!(err, OptError::InvalidGradient { index: 1, .. }));
    }

    #[test]
    // Purpose
    // -------
    // Starting points must match the model's parameter count and be finite.
    fn validate_theta_input_rejects_wrong_length_and_nan() {
        assert!(validate_theta_input(&array![0.0, 1.0], 2).is_ok());
        assert_eq!(
            validate_theta_input(&array![0.0], 2).unwrap_err(),
            OptError::ThetaLengthMismatch { expected: 2, actual: 1 }
        );
        assert!(matches!(
            validate_theta_input(&array![0.0, f64::NAN], 2),
            Err(OptError::InvalidThetaInput { index: 1, .. })
        ));
    }

    #[test]
    fn validate_theta_hat_requires_a_finite_vector() {
        assert_eq!(validate_theta_hat(None).unwrap_err(), OptError::MissingThetaHat);
        assert!(validate_theta_hat(Some(array![f64::NEG_INFINITY])).is_err());
        assert_eq!(validate_theta_hat(Some(array![2.0])).unwrap(), array![2.0]);
    }

    #[test]
    fn validate_value_accepts_negative_finite_values() {
        assert!(validate_value(-1e6).is_ok());
        assert!(validate_value(f64::NAN).is_err());
    }
}
