//! Property-based tests for the Poisson tables and the normal approximation.

use proptest::prelude::*;

use distribution::approx::{continuity_corrected_eq, continuity_corrected_geq, continuity_corrected_leq};
use distribution::{DistError, compute_table, point_probabilities};

/// Strategy: a rate spanning sparse to near-normal regimes.
fn rate_strategy() -> impl Strategy<Value = f64> {
    0.05f64..80.0
}

/// Strategy: rates large enough that the incomplete Gamma switches to
/// quadrature (shape >= 100) inside the window.
fn wide_rate_strategy() -> impl Strategy<Value = f64> {
    0.05f64..1000.0
}

/// Strategy: a window `[min, max]` with `min < max`, crossing x = 100
/// where the incomplete Gamma changes evaluation method.
fn window_strategy() -> impl Strategy<Value = (u64, u64)> {
    (0u64..1200).prop_flat_map(|min| (Just(min), (min + 1)..=1500))
}

proptest! {
    // 1. cdf is non-decreasing and every value is a probability
    #[test]
    fn table_is_a_distribution(rate in wide_rate_strategy(), (min, max) in window_strategy()) {
        let table = compute_table(rate, min, max).unwrap();
        prop_assert_eq!(table.len() as u64, max - min + 1);
        for row in table.rows() {
            prop_assert!((0.0..=1.0).contains(&row.pmf), "pmf={} at x={}", row.pmf, row.x);
            prop_assert!((0.0..=1.0).contains(&row.cdf), "cdf={} at x={}", row.cdf, row.x);
            prop_assert!((0.0..=1.0).contains(&row.ccdf), "ccdf={} at x={}", row.ccdf, row.x);
        }
        for pair in table.rows().windows(2) {
            prop_assert!(pair[1].cdf >= pair[0].cdf, "rate={rate}: {:?}", pair);
        }
        prop_assert!(table.total_mass() <= 1.0 + 1e-10);
    }

    // 2. both CCDF formulas agree
    #[test]
    fn ccdf_forms_agree(rate in wide_rate_strategy(), x in 0i64..1500) {
        let at = point_probabilities(rate, x).unwrap();
        let below = point_probabilities(rate, x - 1).unwrap();
        let via_pmf = 1.0 - at.leq + at.eq;
        let via_previous = 1.0 - below.leq;
        prop_assert!((via_pmf - via_previous).abs() < 1e-9, "{via_pmf} vs {via_previous}");
        prop_assert!((at.geq - via_previous).abs() < 1e-9, "{} vs {via_previous}", at.geq);
    }

    // 3. tables are pure
    #[test]
    fn table_is_deterministic(rate in rate_strategy(), (min, max) in window_strategy()) {
        let a = compute_table(rate, min, max).unwrap();
        let b = compute_table(rate, min, max).unwrap();
        prop_assert_eq!(a, b);
    }

    // 4. empty or inverted windows are rejected
    #[test]
    fn inverted_window_rejected(rate in rate_strategy(), min in 0u64..100, shrink in 0u64..50) {
        let max = min.saturating_sub(shrink);
        prop_assert_eq!(
            compute_table(rate, min, max),
            Err(DistError::InvalidRange { min, max })
        );
    }

    // 5. non-positive rates are rejected everywhere
    #[test]
    fn non_positive_rate_rejected(rate in -100.0f64..=0.0, k in -5i64..50) {
        prop_assert!(matches!(compute_table(rate, 0, 10), Err(DistError::InvalidParameter(_))));
        prop_assert!(matches!(point_probabilities(rate, k), Err(DistError::InvalidParameter(_))));
        prop_assert!(matches!(continuity_corrected_eq(rate, k), Err(DistError::InvalidParameter(_))));
    }

    // 6. the corrected normal queries are probabilities with eq = leq - P(Y < k - 0.5)
    #[test]
    fn normal_queries_consistent(rate in rate_strategy(), k in -10i64..150) {
        let eq = continuity_corrected_eq(rate, k).unwrap();
        let leq = continuity_corrected_leq(rate, k).unwrap();
        let geq = continuity_corrected_geq(rate, k).unwrap();
        prop_assert!((0.0..=1.0).contains(&eq));
        prop_assert!((0.0..=1.0).contains(&leq));
        prop_assert!((0.0..=1.0).contains(&geq));
        prop_assert!((eq - (leq - (1.0 - geq))).abs() < 1e-12);
    }
}

#[test]
fn ccdf_forms_agree_across_method_switch() {
    // x = 99 mixes series and quadrature: cdf(99) uses shape 100, sf(99) shape 99
    for rate in [60.0, 99.5, 100.0, 140.0] {
        for x in 95..=105 {
            let at = point_probabilities(rate, x).unwrap();
            let below = point_probabilities(rate, x - 1).unwrap();
            let via_pmf = 1.0 - at.leq + at.eq;
            assert!((at.geq - via_pmf).abs() < 1e-9, "rate={rate}, x={x}");
            assert!((at.geq - (1.0 - below.leq)).abs() < 1e-9, "rate={rate}, x={x}");
        }
    }
}

#[test]
fn near_normal_regime_matches() {
    let exact = point_probabilities(30.0, 30).unwrap();
    let approx = continuity_corrected_eq(30.0, 30).unwrap();
    assert!((exact.eq - approx).abs() < 0.01);
}
