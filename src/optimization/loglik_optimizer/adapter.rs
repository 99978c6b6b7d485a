//! Adapter that exposes a [`LogLikelihood`] as an `argmin` problem.
//!
//! Maximizing `ℓ(θ)` becomes minimizing `c(θ) = -ℓ(θ)`. Analytic gradients
//! are negated accordingly; without one, the **cost** closure is finite
//! differenced, so that branch needs no sign flip.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::fd_gradient,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};

/// Bridges a [`LogLikelihood`] and its data to `argmin`'s `CostFunction`
/// and `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<F: LogLikelihood> CostFunction for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Output = Cost;

    /// `c(θ) = -ℓ(θ)`; a non-finite `ℓ` is reported as
    /// [`OptError::NonFiniteCost`] so the line search can back off.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err(OptError::NonFiniteCost { value: output }.into());
        }
        Ok(-output)
    }
}

impl<F: LogLikelihood> Gradient for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// `-∇ℓ(θ)` when the model supplies it, otherwise a finite-difference
    /// gradient of the cost (central first, forward on failure).
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                Ok(fd_gradient(theta, &cost_func, &closure_err)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Sign conventions of the cost and gradient, with and without an
    // analytic gradient, plus rejection of non-finite log-likelihoods.
    // -------------------------------------------------------------------------

    struct Concave {
        analytic: bool,
    }

    impl LogLikelihood for Concave {
        type Data = f64;

        fn value(&self, theta: &Theta, shift: &f64) -> OptResult<Cost> {
            Ok(-(theta[0] - shift).powi(2))
        }

        fn check(&self, _theta: &Theta, _data: &f64) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, shift: &f64) -> OptResult<Grad> {
            if self.analytic {
                Ok(array![-2.0 * (theta[0] - shift)])
            } else {
                Err(OptError::GradientNotImplemented)
            }
        }
    }

    struct Exploding;

    impl LogLikelihood for Exploding {
        type Data = ();

        fn value(&self, _theta: &Theta, _data: &()) -> OptResult<Cost> {
            Ok(f64::NAN)
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // The adapter returns the negated log-likelihood and the negated
    // analytic gradient.
    //
    // Given
    // -----
    // - ℓ(θ) = -(θ - 1)², θ = 3.
    //
    // Expect
    // ------
    // - cost = 4, gradient of cost = +4.
    fn adapter_flips_signs_for_analytic_gradient() {
        // Arrange
        let model = Concave { analytic: true };
        let shift = 1.0;
        let adapter = ArgMinAdapter::new(&model, &shift);
        let theta = array![3.0];

        // Act
        let cost = adapter.cost(&theta).unwrap();
        let grad = adapter.gradient(&theta).unwrap();

        // Assert
        assert_relative_eq!(cost, 4.0);
        assert_relative_eq!(grad[0], 4.0);
    }

    #[test]
    // Purpose
    // -------
    // Without an analytic gradient the finite-difference path agrees with
    // the analytic cost gradient.
    fn adapter_finite_difference_matches_analytic() {
        let model = Concave { analytic: false };
        let shift = 1.0;
        let adapter = ArgMinAdapter::new(&model, &shift);

        let grad = adapter.gradient(&array![3.0]).unwrap();

        assert_relative_eq!(grad[0], 4.0, epsilon = 1e-5);
    }

    #[test]
    fn adapter_rejects_non_finite_log_likelihood() {
        let adapter = ArgMinAdapter::new(&Exploding, &());

        let err = OptError::from(adapter.cost(&array![0.0]).unwrap_err());

        assert!(matches!(err, OptError::NonFiniteCost { .. }));
    }
}
