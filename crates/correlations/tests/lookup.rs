use correlations::{interpolate, lookup, sort_by_distance, CoordinateOffset, CorrelationTable};
use proptest::prelude::*;

fn table() -> CorrelationTable {
    CorrelationTable::ed_benchmark().unwrap()
}

#[test]
fn ratio_half_is_row_five() {
    let t = table();
    let s = interpolate(&t, 0.5).unwrap();
    assert_eq!(
        s.values,
        [0.75, -0.3108, 0.1225, 0.0934, -0.0538, 0.0410, -0.0620, 0.0400, -0.0390, 0.0380]
    );
}

#[test]
fn every_node_is_reproduced_exactly() {
    let t = table();
    for (i, &ratio) in t.ratios().iter().enumerate() {
        let s = interpolate(&t, ratio).unwrap();
        assert_eq!(s.values.as_slice(), t.row(i).unwrap());
        assert_eq!(s.values[0], 0.75);
    }
}

#[test]
fn default_ratio_blends_neighbouring_rows() {
    let t = table();
    let s = interpolate(&t, 0.52).unwrap();
    let (lo, hi) = (t.row(5).unwrap(), t.row(6).unwrap());
    let w = (0.52 - 0.5) / (0.55 - 0.5);
    for (k, v) in s.values.iter().enumerate() {
        let expect = lo[k] + w * (hi[k] - lo[k]);
        assert!((v - expect).abs() < 1e-12, "column {}: {} vs {}", k, v, expect);
    }
    // (1,0) at 0.52: -0.3108 + 0.4 * 0.0122
    assert!((s.values[1] + 0.30592).abs() < 1e-9);
}

#[test]
fn lookup_report_is_distance_ordered() {
    let r = lookup(&table(), 0.52).unwrap();
    assert_eq!(r.series.len(), 10);
    assert_eq!(r.series.labels[0], "(0,0)");
    assert_eq!(r.series.labels[1], "(1,0)");
    assert_eq!(r.series.labels[9], "(3,3)");
    assert!(r.series.distances.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn outside_the_table_is_an_error() {
    let t = table();
    let err = lookup(&t, 0.95).unwrap_err();
    assert_eq!(
        err.to_string(),
        "J2/J1 = 0.95 is outside the tabulated range [0, 0.9]"
    );
    assert!(lookup(&t, -0.01).is_err());
    assert!(lookup(&t, f64::INFINITY).is_err());
}

proptest! {
    #[test]
    fn interpolated_values_stay_between_nodes(ratio in 0.0f64..=0.9) {
        let t = table();
        let s = interpolate(&t, ratio).unwrap();
        let xs = t.ratios();
        let hi = xs.iter().position(|&x| x >= ratio).unwrap();
        let lo = if xs[hi] == ratio { hi } else { hi - 1 };
        let (a, b) = (t.row(lo).unwrap(), t.row(hi).unwrap());
        for (k, v) in s.values.iter().enumerate() {
            let (min, max) = (a[k].min(b[k]), a[k].max(b[k]));
            prop_assert!(*v >= min - 1e-12 && *v <= max + 1e-12);
        }
    }

    #[test]
    fn distance_sort_is_stable(
        offsets in proptest::collection::vec((-3i32..=3, -3i32..=3), 0..24),
    ) {
        let pairs: Vec<(CoordinateOffset, f64)> = offsets
            .iter()
            .enumerate()
            .map(|(i, &(dx, dy))| (CoordinateOffset::new(dx, dy), i as f64))
            .collect();
        let s = sort_by_distance(pairs);
        prop_assert_eq!(s.len(), offsets.len());
        for k in 1..s.len() {
            prop_assert!(s.distances[k - 1] <= s.distances[k]);
            if s.distances[k - 1] == s.distances[k] {
                prop_assert!(s.values[k - 1] < s.values[k]);
            }
        }
    }
}
