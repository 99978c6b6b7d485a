//! Property-based tests for the hazard objective and the windowing step.
//!
//! Uses proptest to check invariants that must hold for every admissible
//! input, not just the hand-picked cases in the unit tests.

use ndarray::{array, Array3, Array4, ArrayD, IxDyn};
use proptest::prelude::*;

use excess_hazard::{
    events::{windows, CorpusConfig},
    hazard::{CensoredLikelihoodLoss, HazardConfig, HazardModel, HazardRegime, OutputActivation},
};

fn config(regime: HazardRegime) -> HazardConfig {
    HazardConfig::default().with_regime(regime)
}

fn regime() -> impl Strategy<Value = HazardRegime> {
    prop_oneof![Just(HazardRegime::Standard), Just(HazardRegime::Wtte)]
}

/// Per-example loss for a single (targets, prediction) pair.
fn single_loss(regime: HazardRegime, target: [f64; 4], scale: f64, shape: f64) -> f64 {
    let loss = CensoredLikelihoodLoss::new(&config(regime));
    let y_true = ArrayD::from_shape_vec(IxDyn(&[1, 1, 4]), target.to_vec()).unwrap();
    let y_pred = ArrayD::from_shape_vec(IxDyn(&[1, 1, 2]), vec![scale, shape]).unwrap();
    loss.loss(y_true.view(), y_pred.view()).unwrap()[[0]]
}

// ============================================================================
// Activation
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Activated scale is positive and finite; shape stays strictly inside
    /// (0, max_shape).
    #[test]
    fn activation_respects_bounds(
        a in -50.0..50.0f64,
        b in -50.0..50.0f64,
        iniscale in 0.1..100.0f64,
        max_shape in 0.5..20.0f64,
    ) {
        let cfg = HazardConfig::new(1e-7, max_shape, HazardRegime::Standard).unwrap();
        let act = OutputActivation::new(iniscale, &cfg).unwrap();

        let out = act.activate(array![[a, b]].into_dyn().view()).unwrap();

        prop_assert!(out[[0, 0]] > 0.0 && out[[0, 0]].is_finite(), "scale {}", out[[0, 0]]);
        prop_assert!(out[[0, 1]] > 0.0 && out[[0, 1]] < max_shape, "shape {} vs {}", out[[0, 1]], max_shape);
    }
}

// ============================================================================
// Hazard model
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Surviving a longer excess is never more likely.
    #[test]
    fn log_survival_non_increasing_in_excess(
        regime in regime(),
        elapsed in 0.0..50.0f64,
        x1 in 0.0..50.0f64,
        dx in 0.0..50.0f64,
        scale in 0.5..50.0f64,
        shape in 0.1..10.0f64,
    ) {
        let model = HazardModel::new(regime, 1e-7);

        let near = model.log_survival(elapsed, x1, scale, shape);
        let far = model.log_survival(elapsed, x1 + dx, scale, shape);

        prop_assert!(far <= near, "S({}) = {} > S({}) = {}", x1 + dx, far, x1, near);
    }

    /// The loss is a negative log-probability: finite and ≥ 0 for every
    /// combination of the censoring and eligibility flags.
    #[test]
    fn loss_is_finite_and_non_negative(
        regime in regime(),
        tse in 0u32..50,
        tte in 0u32..50,
        uncensored in prop::bool::ANY,
        eligible in prop::bool::ANY,
        scale in 0.5..50.0f64,
        shape in 0.1..10.0f64,
    ) {
        let target = [
            f64::from(tse),
            f64::from(tte),
            if uncensored { 1.0 } else { 0.0 },
            if eligible { 1.0 } else { 0.0 },
        ];

        let loss = single_loss(regime, target, scale, shape);

        prop_assert!(loss.is_finite(), "loss {} for {:?}", loss, target);
        prop_assert!(loss >= 0.0, "loss {} for {:?}", loss, target);
    }

    /// The WTTE objective ignores the time since the last event.
    #[test]
    fn wtte_loss_is_invariant_to_tse(
        tse_a in 0u32..100,
        tse_b in 0u32..100,
        tte in 0u32..50,
        uncensored in prop::bool::ANY,
        scale in 0.5..50.0f64,
        shape in 0.1..10.0f64,
    ) {
        let u = if uncensored { 1.0 } else { 0.0 };

        let a = single_loss(HazardRegime::Wtte, [f64::from(tse_a), f64::from(tte), u, 1.0], scale, shape);
        let b = single_loss(HazardRegime::Wtte, [f64::from(tse_b), f64::from(tte), u, 1.0], scale, shape);

        prop_assert_eq!(a, b);
    }
}

// ============================================================================
// Windowing
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Each sequence yields max(0, nseq − winlen) candidate windows; those
    /// starting on the padding sentinel are dropped.
    #[test]
    fn window_count_matches_candidates_minus_padding(
        nobs in 1usize..5,
        nseq in 1usize..30,
        winlen in 1usize..12,
        padding in prop::collection::vec(prop::bool::weighted(0.2), 150),
    ) {
        let x = Array3::from_shape_fn((nobs, nseq, 2), |(o, t, c)| {
            if c == 0 && padding[o * nseq + t] { -1.0 } else { (o + t) as f64 }
        });
        let y = Array4::<f64>::zeros((nobs, nseq, 1, 4));
        let expected: usize = (0..nobs)
            .map(|o| (0..nseq.saturating_sub(winlen)).filter(|&t| !padding[o * nseq + t]).count())
            .sum();

        let corpus = windows(x.view(), y.view(), &CorpusConfig::new(winlen, -1.0).unwrap()).unwrap();

        prop_assert_eq!(corpus.len(), expected);
        prop_assert!(corpus.iter().all(|w| w.x[[0, 0]] != -1.0));
        prop_assert!(corpus.iter().all(|w| w.x.nrows() == winlen));
    }
}
