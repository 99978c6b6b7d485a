//! loglik_optimizer::finite_diff — finite-difference gradients with error capture.
//!
//! Purpose
//! -------
//! Approximate the gradient of a fallible scalar objective when the model
//! does not provide an analytic one. `finitediff` closures must return a
//! plain `f64`, so evaluation errors are parked in a shared cell and turned
//! back into real errors once differencing is done.
//!
//! Key behaviors
//! -------------
//! - [`fd_gradient`] tries central differences first and falls back to
//!   forward differences when the central pass hit an evaluation error or
//!   produced a non-finite gradient.
//! - [`run_fd_diff`] is the forward-difference pass on its own.
//!
//! Conventions
//! -----------
//! - Differences are taken in the unconstrained `Theta` space.
//! - The closure handed to these helpers stores the first error it sees in
//!   `closure_err` and returns `NaN`.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{validation::validate_grad, Grad, Theta},
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Central-difference gradient with forward-difference fallback.
///
/// # Errors
/// - Any error captured in `closure_err` during the forward pass.
/// - [`validate_grad`] failures on the forward-difference result.
pub fn fd_gradient<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let central = theta.central_diff(func);
    if closure_err.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
        return Ok(central);
    }
    run_fd_diff(theta, func, closure_err)
}

/// Forward-difference gradient with error capture and validation.
///
/// Clears `closure_err`, runs `forward_diff`, then returns the captured
/// error if one was recorded, otherwise the validated gradient.
///
/// # Errors
/// - The captured closure error, converted through `From<argmin::core::Error>`.
/// - [`OptError::GradientDimMismatch`](crate::optimization::errors::OptError::GradientDimMismatch)
///   or [`OptError::InvalidGradient`](crate::optimization::errors::OptError::InvalidGradient)
///   from [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use approx::assert_relative_eq;
    use argmin::core::ArgminError;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Gradient accuracy on a smooth objective.
    // - Error capture from inside the differencing closure.
    // - The central → forward fallback.
    //
    // They intentionally DO NOT cover:
    // - Adapter sign conventions (see `adapter`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Central differences recover the exact gradient of a quadratic.
    //
    // Given
    // -----
    // - f(θ) = θ₀² + 3θ₁ at θ = (1, 2).
    //
    // Expect
    // ------
    // - ∇f = (2, 3) to ~1e-6.
    fn fd_gradient_matches_quadratic() {
        // Arrange
        let theta = array![1.0_f64, 2.0];
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |x: &Theta| x[0] * x[0] + 3.0 * x[1];

        // Act
        let grad = fd_gradient(&theta, &f, &closure_err).expect("gradient should exist");

        // Assert
        assert_relative_eq!(grad[0], 2.0, epsilon = 1e-6);
        assert_relative_eq!(grad[1], 3.0, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // An error raised inside the closure surfaces as an `OptError`.
    fn run_fd_diff_closure_error_is_propagated() {
        // Arrange
        let theta = array![1.0_f64];
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |_: &Theta| {
            closure_err
                .replace(Some(ArgminError::NotImplemented { text: "fd".to_string() }.into()));
            f64::NAN
        };

        // Act
        let err = run_fd_diff(&theta, &f, &closure_err).unwrap_err();

        // Assert
        assert_eq!(err, OptError::NotImplemented { text: "fd".to_string() });
    }

    #[test]
    // Purpose
    // -------
    // When the central stencil steps into a region where the objective is
    // undefined, the forward stencil (which only steps upward) is used.
    //
    // Given
    // -----
    // - f(θ) = ln(θ) with NaN below zero, evaluated exactly at θ = 0 + tiny,
    //   so θ - h is negative.
    //
    // Expect
    // ------
    // - A finite positive gradient.
    fn fd_gradient_falls_back_to_forward_difference() {
        // Arrange
        let theta = array![1e-12_f64];
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |x: &Theta| if x[0] > 0.0 { x[0].ln() } else { f64::NAN };

        // Act
        let grad = fd_gradient(&theta, &f, &closure_err).expect("forward pass should succeed");

        // Assert
        assert!(grad[0].is_finite() && grad[0] > 0.0);
    }

    #[test]
    fn run_fd_diff_non_finite_gradient_yields_invalid_gradient() {
        let theta = array![0.0_f64, 1.0];
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |_x: &Theta| f64::NAN;

        let err = run_fd_diff(&theta, &f, &closure_err).unwrap_err();

        assert!(matches!(err, OptError::InvalidGradient { .. }));
    }
}
