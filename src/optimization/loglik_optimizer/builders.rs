//! loglik_optimizer::builders — L-BFGS solver construction.
//!
//! Purpose
//! -------
//! Build L-BFGS solvers for the hazard-head fits with either line search,
//! applying the gradient and cost tolerances of [`MLEOptions`]. The
//! starting point and iteration cap are runtime concerns handled by
//! [`run_lbfgs`](super::run::run_lbfgs).
//!
//! Conventions
//! -----------
//! - History size is `opts.lbfgs_mem`, or [`DEFAULT_LBFGS_MEM`] when unset.
//! - Argmin rejections of a tolerance surface as
//!   [`OptError`](crate::optimization::errors::OptError) through the
//!   crate's `From<argmin::core::Error>` conversion.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente, MoreThuenteLS, Theta,
            DEFAULT_LBFGS_MEM,
        },
    },
};

/// L-BFGS with Hager–Zhang line search and the tolerances from `opts`.
///
/// # Errors
/// Argmin rejecting `tol_grad` / `tol_cost`.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// L-BFGS with More–Thuente line search and the tolerances from `opts`.
///
/// # Errors
/// Argmin rejecting `tol_grad` / `tol_cost`.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Apply whichever of `tol_grad` / `tol_cost` is set; unset tolerances keep
/// Argmin's defaults.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::traits::{LineSearcher, Tolerances};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Construction of both solver variants with default and explicit memory,
    // and tolerance wiring. Executor behavior is covered in `api`.
    // -------------------------------------------------------------------------

    fn opts(line_searcher: LineSearcher, mem: Option<usize>) -> MLEOptions {
        let tols = Tolerances::new(Some(1e-6), Some(1e-10), Some(50)).expect("valid tolerances");
        MLEOptions::new(tols, line_searcher, false, mem).expect("valid options")
    }

    #[test]
    // Purpose
    // -------
    // Both builders succeed with the default history size and with an
    // explicit one.
    fn builders_accept_default_and_explicit_memory() {
        assert!(build_optimizer_hager_zhang(&opts(LineSearcher::HagerZhang, None)).is_ok());
        assert!(build_optimizer_hager_zhang(&opts(LineSearcher::HagerZhang, Some(11))).is_ok());
        assert!(build_optimizer_more_thuente(&opts(LineSearcher::MoreThuente, None)).is_ok());
        assert!(build_optimizer_more_thuente(&opts(LineSearcher::MoreThuente, Some(3))).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // With neither tolerance set, `configure_lbfgs` leaves the solver as is.
    fn configure_lbfgs_respects_absent_tolerances() {
        // Arrange
        let raw = LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);
        let tols = Tolerances::new(None, None, Some(10)).expect("valid tolerances");
        let opts = MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).unwrap();

        // Act
        let configured = configure_lbfgs(raw, &opts);

        // Assert
        assert!(configured.is_ok());
    }
}
