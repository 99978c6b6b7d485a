//! Guarded transforms.
//!
//! - [`safe_logistic`]: `1 / (1 + e^{-x})` without overflow in either tail.
//! - [`log1m_exp_neg`]: `ln(1 - e^{-d})` for `d > 0`, switching between
//!   `ln(-expm1(-d))` and `ln_1p(-e^{-d})` at `d = ln 2`.
//! - [`inv_expm1`]: `1 / (e^{d} - 1)`, the derivative of `log1m_exp_neg`.
//! - [`clip`]: clamp that keeps NaN.

use std::f64::consts::LN_2;

/// Logistic function evaluated on the non-overflowing branch.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 - e^{-d})`.
///
/// Equals `ln(e^{d} - 1) - d`, so the excess-hazard log-pmf
/// `-H₁ + ln(e^{H₁-H₀} - 1) + H_c` can be written as
/// `-H₀ + H_c + log1m_exp_neg(H₁ - H₀)` without evaluating `e^{H₁-H₀}`.
/// Returns `-∞` at `d = 0` and NaN for `d < 0`.
pub fn log1m_exp_neg(d: f64) -> f64 {
    if d <= LN_2 {
        (-(-d).exp_m1()).ln()
    } else {
        (-(-d).exp()).ln_1p()
    }
}

/// `1 / (e^{d} - 1)`, i.e. `d/dd ln(1 - e^{-d})`.
pub fn inv_expm1(d: f64) -> f64 {
    1.0 / d.exp_m1()
}

/// Clamp `x` into `[lo, hi]`; NaN stays NaN.
pub fn clip(x: f64, lo: f64, hi: f64) -> f64 {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}
