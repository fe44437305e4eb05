//! Property-based tests for STL decomposition.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated series.

use proptest::prelude::*;
use seasonal_stl::loess::{DataWindow, DataWindowMut};
use seasonal_stl::prelude::*;

/// Strategy for generating noisy seasonal series of at least two cycles.
fn seasonal_values_strategy(
    min_cycles: usize,
    max_cycles: usize,
    period: usize,
) -> impl Strategy<Value = Vec<f64>> {
    (min_cycles..max_cycles).prop_flat_map(move |cycles| {
        let len = cycles * period;
        (
            50.0..100.0_f64,
            1.0..20.0_f64,
            prop::collection::vec(-1.0..1.0_f64, len),
        )
            .prop_map(move |(base, amplitude, noise)| {
                noise
                    .iter()
                    .enumerate()
                    .map(|(i, eps)| {
                        let phase = 2.0 * std::f64::consts::PI * i as f64 / period as f64;
                        base + amplitude * phase.sin() + eps
                    })
                    .collect()
            })
    })
}

// ============================================================================
// Decomposition identities
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn additive_components_reconstruct_series(
        values in seasonal_values_strategy(3, 10, 12),
        outer in 0usize..4,
    ) {
        let spec = StlSpec::builder()
            .with_season(SeasonalSpec::new(12, 7).unwrap())
            .with_outer_loops(outer)
            .build()
            .unwrap();
        let result = decompose(&values, &spec).unwrap();

        prop_assert_eq!(result.len(), values.len());
        for i in 0..values.len() {
            let rebuilt = result.trend()[i] + result.seasonal()[i] + result.irregular()[i];
            prop_assert!((rebuilt - values[i]).abs() < 1e-8);
        }
    }

    #[test]
    fn multiplicative_components_reconstruct_series(
        values in seasonal_values_strategy(2, 8, 4),
    ) {
        let spec = StlSpec::builder()
            .with_season(SeasonalSpec::new(4, 7).unwrap())
            .multiplicative(true)
            .build()
            .unwrap();
        let result = decompose(&values, &spec).unwrap();

        for i in 0..values.len() {
            let rebuilt = result.trend()[i] * result.seasonal()[i] * result.irregular()[i];
            prop_assert!((rebuilt - values[i]).abs() < 1e-8 * values[i].abs().max(1.0));
        }
    }

    #[test]
    fn robustness_weights_are_bounded(
        values in seasonal_values_strategy(3, 10, 7),
        outlier in 0usize..21,
    ) {
        let mut values = values;
        values[outlier] += 500.0;
        let result = decompose(&values, &StlSpec::robust_for_period(7, 7).unwrap()).unwrap();
        for w in result.weights() {
            prop_assert!((0.0..=1.0).contains(w), "weight out of range: {}", w);
        }
    }

    #[test]
    fn outputs_are_finite(values in seasonal_values_strategy(2, 10, 12)) {
        let result = decompose(&values, &StlSpec::for_period(12, 9).unwrap()).unwrap();
        for v in result.trend().iter().chain(result.seasonal()).chain(result.irregular()) {
            prop_assert!(v.is_finite());
        }
    }
}

// ============================================================================
// Constant and shifted inputs
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn constant_series_is_all_trend(level in -1000.0..1000.0_f64, cycles in 2usize..8) {
        let values = vec![level; cycles * 12];
        let result = decompose(&values, &StlSpec::robust_for_period(12, 7).unwrap()).unwrap();
        for i in 0..values.len() {
            prop_assert!((result.trend()[i] - level).abs() < 1e-6 * level.abs().max(1.0));
            prop_assert!(result.seasonal()[i].abs() < 1e-6 * level.abs().max(1.0));
        }
    }

    #[test]
    fn shifting_the_series_shifts_the_trend(
        values in seasonal_values_strategy(2, 6, 12),
        shift in -100.0..100.0_f64,
    ) {
        let spec = StlSpec::for_period(12, 7).unwrap();
        let base = decompose(&values, &spec).unwrap();
        let shifted: Vec<f64> = values.iter().map(|v| v + shift).collect();
        let moved = decompose(&shifted, &spec).unwrap();
        for i in 0..values.len() {
            prop_assert!((moved.trend()[i] - base.trend()[i] - shift).abs() < 1e-6);
            prop_assert!((moved.seasonal()[i] - base.seasonal()[i]).abs() < 1e-6);
        }
    }
}

// ============================================================================
// Loess smoother
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn loess_reproduces_lines(
        intercept in -50.0..50.0_f64,
        slope in -5.0..5.0_f64,
        len in 3usize..60,
        half in 1usize..10,
        jump in 1usize..6,
    ) {
        let y: Vec<f64> = (0..len).map(|i| intercept + slope * i as f64).collect();
        let spec = LoessSpec::new(2 * half + 1, 1).unwrap().with_jump(jump).unwrap();
        // one extra position on both sides
        let mut out = vec![0.0; len + 2];
        let ok = LoessFilter::new(spec).filter(
            &DataWindow::new(&y),
            None,
            &mut DataWindowMut::with_origin(&mut out, -1),
        );
        prop_assert!(ok);
        for (k, v) in out.iter().enumerate() {
            let x = k as f64 - 1.0;
            prop_assert!((v - (intercept + slope * x)).abs() < 1e-6);
        }
    }
}
