//! Hazard regimes and the cumulative-hazard terms they produce.
//!
//! Every likelihood term is built from the cumulative hazard
//! `H(t) = ((t + ε) / c)^k` evaluated at three horizons:
//!
//! | term   | Standard          | Wtte          |
//! |--------|-------------------|---------------|
//! | `haz0` | `H(e + x)`        | `H(x)`        |
//! | `haz1` | `H(e + x + 1)`    | `H(x + 1)`    |
//! | `hazc` | `H(e)`            | `0`           |
//!
//! where `e` is the elapsed time since the last event and `x` the excess
//! time to the next one. Each term also carries its partial derivatives
//! with respect to the scale `c` and the shape `k`:
//! `∂H/∂c = -(k/c)·H` and `∂H/∂k = H·ln((t + ε)/c)`.
use serde::Deserialize;

/// Which horizons enter the cumulative hazards.
///
/// `Standard` conditions on survival up to the elapsed time; `Wtte` is the
/// unconditional WTTE-RNN special case, invariant to the elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardRegime {
    #[default]
    Standard,
    Wtte,
}

/// `H(t)` together with `∂H/∂c` and `∂H/∂k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CumulativeHazard {
    pub value: f64,
    pub d_scale: f64,
    pub d_shape: f64,
}

impl CumulativeHazard {
    pub const ZERO: Self = Self { value: 0.0, d_scale: 0.0, d_shape: 0.0 };

    /// Evaluate `((t + ε)/c)^k` and its partials.
    pub fn at(t: f64, scale: f64, shape: f64, epsilon: f64) -> Self {
        let ratio = (t + epsilon) / scale;
        let value = ratio.powf(shape);
        Self { value, d_scale: -shape / scale * value, d_shape: value * ratio.ln() }
    }
}

/// The three cumulative hazards of one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardTerms {
    pub haz0: CumulativeHazard,
    pub haz1: CumulativeHazard,
    pub hazc: CumulativeHazard,
}

impl HazardRegime {
    /// Cumulative hazards at the horizons of this regime.
    pub fn terms(
        self, elapsed: f64, excess: f64, scale: f64, shape: f64, epsilon: f64,
    ) -> HazardTerms {
        match self {
            HazardRegime::Standard => {
                let horizon = elapsed + excess;
                HazardTerms {
                    haz0: CumulativeHazard::at(horizon, scale, shape, epsilon),
                    haz1: CumulativeHazard::at(horizon + 1.0, scale, shape, epsilon),
                    hazc: CumulativeHazard::at(elapsed, scale, shape, epsilon),
                }
            }
            HazardRegime::Wtte => HazardTerms {
                haz0: CumulativeHazard::at(excess, scale, shape, epsilon),
                haz1: CumulativeHazard::at(excess + 1.0, scale, shape, epsilon),
                hazc: CumulativeHazard::ZERO,
            },
        }
    }

    /// Time at which the hazard clock starts for the density and quantile:
    /// `e + x` under `Standard`, `x` under `Wtte`.
    pub fn horizon(self, elapsed: f64, excess: f64) -> f64 {
        match self {
            HazardRegime::Standard => elapsed + excess,
            HazardRegime::Wtte => excess,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // With shape 1 and ε → 0 the cumulative hazard is linear in time, so the
    // standard terms are plain ratios.
    //
    // Given
    // -----
    // - e = 2, x = 3, c = 5, k = 1, ε = 1e-12.
    //
    // Expect
    // ------
    // - haz0 = 1, haz1 = 1.2, hazc = 0.4.
    fn standard_terms_follow_elapsed_plus_excess() {
        let terms = HazardRegime::Standard.terms(2.0, 3.0, 5.0, 1.0, 1e-12);

        assert_relative_eq!(terms.haz0.value, 1.0, epsilon = 1e-10);
        assert_relative_eq!(terms.haz1.value, 1.2, epsilon = 1e-10);
        assert_relative_eq!(terms.hazc.value, 0.4, epsilon = 1e-10);
    }

    #[test]
    fn wtte_terms_ignore_elapsed_time() {
        let a = HazardRegime::Wtte.terms(0.0, 3.0, 5.0, 1.7, 1e-7);
        let b = HazardRegime::Wtte.terms(40.0, 3.0, 5.0, 1.7, 1e-7);

        assert_eq!(a, b);
        assert_eq!(a.hazc, CumulativeHazard::ZERO);
    }

    #[test]
    // Purpose
    // -------
    // The closed-form partials match central differences.
    fn cumulative_hazard_partials_match_finite_differences() {
        let (t, c, k, eps, h) = (3.5, 2.2, 1.6, 1e-7, 1e-6);
        let at = CumulativeHazard::at(t, c, k, eps);

        let fd_c = (CumulativeHazard::at(t, c + h, k, eps).value
            - CumulativeHazard::at(t, c - h, k, eps).value)
            / (2.0 * h);
        let fd_k = (CumulativeHazard::at(t, c, k + h, eps).value
            - CumulativeHazard::at(t, c, k - h, eps).value)
            / (2.0 * h);

        assert_relative_eq!(at.d_scale, fd_c, max_relative = 1e-6);
        assert_relative_eq!(at.d_shape, fd_k, max_relative = 1e-6);
    }
}
