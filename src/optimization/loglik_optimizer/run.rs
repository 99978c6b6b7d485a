//! Executes an `argmin` solver on an [`ArgMinAdapter`] and converts the final
//! state into an [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter, Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta,
    },
};
use argmin::core::{CostFunction, Executor, Gradient, State};
use argmin_math::ArgminL2Norm;

/// Run an L-BFGS variant on a log-likelihood problem.
///
/// Wires `theta0`, the optional iteration cap and, with the `obs_slog`
/// feature and `opts.verbose`, a terminal slog observer. The starting
/// log-likelihood and gradient norm are logged at debug level.
///
/// The reported `value` is the best **log-likelihood** `ℓ(θ̂)`, i.e. the
/// negated best cost.
///
/// # Errors
/// - Argmin runtime errors (line-search failures, non-finite costs raised
///   by the adapter), converted into [`OptError`](crate::optimization::errors::OptError).
/// - Validation errors from [`OptimOutcome::new`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    log_initial_state(&theta0, &problem);

    let mut optimizer = Executor::new(problem, solver).configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    let outcome = OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )?;
    log::debug!(
        "lbfgs finished: status = {}, iterations = {}, loglik = {:.6}",
        outcome.status,
        outcome.iterations,
        outcome.value
    );
    Ok(outcome)
}

fn log_initial_state<F: LogLikelihood>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    match problem.cost(theta0) {
        Ok(cost) => {
            let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());
            log::debug!(
                "lbfgs start: loglik = {:.6}{}",
                -cost,
                g0n.map(|n| format!(", ||grad|| = {n:.6}")).unwrap_or_default()
            );
        }
        Err(err) => log::debug!("lbfgs start: objective not evaluable at theta0 ({err})"),
    }
}
