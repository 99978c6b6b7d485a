//! HazardModel — conditional survival quantities of the excess-time hazard.
//!
//! Purpose
//! -------
//! Evaluate the log-survival, log discretized pmf, log density and
//! quantiles of the Weibull-type conditional hazard used by the censored
//! likelihood, for one observation at a time. The loss applies these
//! scalar routines element-wise across its tensors.
//!
//! Key behaviors
//! -------------
//! - With `H(t) = ((t + ε)/c)^k` and the regime's terms `haz0`, `haz1`,
//!   `hazc` (see [`regime`](super::regime)):
//!   - `log_survival     = -haz0 + hazc`
//!   - `log_discrete_pmf = -haz1 + ln(e^{haz1-haz0} - 1) + hazc`
//!   - `log_density      = ln(k/c) + (k-1)·ln((h + ε)/c) + log_survival`
//!   - `quantile(e, p)   = c·(hazc - ln(1-p))^{1/k} - e`
//!   where `h` is the regime horizon.
//! - [`HazardModel::log_likelihood`] mixes the pmf (uncensored) and the
//!   survival (censored) contributions; [`HazardModel::log_likelihood_partials`]
//!   adds its derivatives with respect to `(c, k)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `c > 0` and `k > 0` are the caller's responsibility (guaranteed when
//!   the parameters come out of the output activation). Nothing is checked:
//!   violations yield NaN/±∞.
//! - The pmf is evaluated as `-haz0 + hazc + ln(1 - e^{-(haz1-haz0)})`,
//!   which equals the form above without forming `e^{haz1-haz0}`.
//!
//! Conventions
//! -----------
//! - `elapsed` is the time since the last event (TSE), `excess` the time
//!   to the next event or to the end of observation (TTE).
//! - All log quantities are natural logarithms.
use statrs::function::gamma::gamma;

use crate::{
    hazard::{
        config::HazardConfig,
        errors::{HazardError, HazardResult},
        regime::{HazardRegime, HazardTerms},
    },
    optimization::numerical_stability::{inv_expm1, log1m_exp_neg},
};

/// Value of a log-likelihood contribution and its partials in `(c, k)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLikPartials {
    pub value: f64,
    pub d_scale: f64,
    pub d_shape: f64,
}

/// Conditional hazard evaluator for one regime and ε.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardModel {
    regime: HazardRegime,
    epsilon: f64,
}

impl HazardModel {
    pub fn new(regime: HazardRegime, epsilon: f64) -> Self {
        Self { regime, epsilon }
    }

    pub fn from_config(config: &HazardConfig) -> Self {
        Self::new(config.regime, config.epsilon)
    }

    pub fn regime(&self) -> HazardRegime {
        self.regime
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn terms(&self, elapsed: f64, excess: f64, scale: f64, shape: f64) -> HazardTerms {
        self.regime.terms(elapsed, excess, scale, shape, self.epsilon)
    }

    /// `ln S(e + x) - ln S(e)`: log-probability of surviving `x` more steps.
    pub fn log_survival(&self, elapsed: f64, excess: f64, scale: f64, shape: f64) -> f64 {
        let t = self.terms(elapsed, excess, scale, shape);
        -t.haz0.value + t.hazc.value
    }

    /// Log-probability that the event falls in `[e + x, e + x + 1)` given
    /// survival to `e`.
    pub fn log_discrete_pmf(&self, elapsed: f64, excess: f64, scale: f64, shape: f64) -> f64 {
        let t = self.terms(elapsed, excess, scale, shape);
        -t.haz0.value + t.hazc.value + log1m_exp_neg(t.haz1.value - t.haz0.value)
    }

    /// Log of the conditional continuous density at `e + x`.
    pub fn log_density(&self, elapsed: f64, excess: f64, scale: f64, shape: f64) -> f64 {
        let horizon = self.regime.horizon(elapsed, excess);
        (shape / scale).ln()
            + (shape - 1.0) * ((horizon + self.epsilon) / scale).ln()
            + self.log_survival(elapsed, excess, scale, shape)
    }

    /// Excess time by which the conditional CDF reaches `p`.
    ///
    /// # Errors
    /// [`HazardError::InvalidProbability`] unless `0 ≤ p < 1`.
    pub fn quantile(&self, elapsed: f64, p: f64, scale: f64, shape: f64) -> HazardResult<f64> {
        if !(0.0..1.0).contains(&p) {
            return Err(HazardError::InvalidProbability { value: p });
        }
        let hazc = self.terms(elapsed, 0.0, scale, shape).hazc.value;
        let target = hazc - (-p).ln_1p();
        let start = match self.regime {
            HazardRegime::Standard => elapsed,
            HazardRegime::Wtte => 0.0,
        };
        Ok(scale * target.powf(1.0 / shape) - start)
    }

    /// [`quantile`](Self::quantile) at `p = 0.5`.
    pub fn median(&self, elapsed: f64, scale: f64, shape: f64) -> f64 {
        let hazc = self.terms(elapsed, 0.0, scale, shape).hazc.value;
        let start = match self.regime {
            HazardRegime::Standard => elapsed,
            HazardRegime::Wtte => 0.0,
        };
        scale * (hazc + std::f64::consts::LN_2).powf(1.0 / shape) - start
    }

    /// Uncensored and right-censored log-likelihood contributions.
    pub fn censored_pair(&self, elapsed: f64, excess: f64, scale: f64, shape: f64) -> (f64, f64) {
        let t = self.terms(elapsed, excess, scale, shape);
        let survival = -t.haz0.value + t.hazc.value;
        (survival + log1m_exp_neg(t.haz1.value - t.haz0.value), survival)
    }

    /// `u·log_discrete_pmf + (1-u)·log_survival`, `u` the uncensored flag.
    pub fn log_likelihood(
        &self, elapsed: f64, excess: f64, uncensored: f64, scale: f64, shape: f64,
    ) -> f64 {
        let (interval, survival) = self.censored_pair(elapsed, excess, scale, shape);
        uncensored * interval + (1.0 - uncensored) * survival
    }

    /// [`log_likelihood`](Self::log_likelihood) with `∂/∂c` and `∂/∂k`.
    pub fn log_likelihood_partials(
        &self, elapsed: f64, excess: f64, uncensored: f64, scale: f64, shape: f64,
    ) -> LogLikPartials {
        let t = self.terms(elapsed, excess, scale, shape);
        let gap = t.haz1.value - t.haz0.value;
        let weight = inv_expm1(gap);

        let survival = -t.haz0.value + t.hazc.value;
        let ds_scale = -t.haz0.d_scale + t.hazc.d_scale;
        let ds_shape = -t.haz0.d_shape + t.hazc.d_shape;

        let interval = survival + log1m_exp_neg(gap);
        let di_scale = ds_scale + weight * (t.haz1.d_scale - t.haz0.d_scale);
        let di_shape = ds_shape + weight * (t.haz1.d_shape - t.haz0.d_shape);

        let censored = 1.0 - uncensored;
        LogLikPartials {
            value: uncensored * interval + censored * survival,
            d_scale: uncensored * di_scale + censored * ds_scale,
            d_shape: uncensored * di_shape + censored * ds_shape,
        }
    }
}

/// Mean time to event of the WTTE-RNN Weibull, `c·Γ(1 + 1/k)`.
pub fn wtte_mean(scale: f64, shape: f64) -> f64 {
    scale * gamma(1.0 + 1.0 / shape)
}
