use crate::error::InterpolationError;
use crate::offsets::{sort_by_distance, CoordinateOffset, DistanceSortedSeries};
use crate::table::CorrelationTable;
use serde::Serialize;

/// Table values evaluated at one coupling ratio, in table column order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InterpolatedSample {
    pub ratio: f64,
    pub values: Vec<f64>,
}

impl InterpolatedSample {
    pub fn sorted(&self, offsets: &[CoordinateOffset]) -> DistanceSortedSeries {
        sort_by_distance(offsets.iter().copied().zip(self.values.iter().copied()))
    }
}

/// Piecewise-linear interpolation of every column at `ratio`.
///
/// A ratio equal to a tabulated node returns that row unchanged. Ratios
/// outside the tabulated range are rejected rather than extrapolated.
pub fn interpolate(
    table: &CorrelationTable,
    ratio: f64,
) -> Result<InterpolatedSample, InterpolationError> {
    if !ratio.is_finite() {
        return Err(InterpolationError::NotFinite(ratio));
    }
    let (min, max) = table.domain();
    if ratio < min || ratio > max {
        return Err(InterpolationError::OutOfDomain { ratio, min, max });
    }

    let xs = table.ratios();
    let hi = xs.partition_point(|&x| x < ratio);
    if xs[hi] == ratio {
        return Ok(InterpolatedSample {
            ratio,
            values: table.rows_at(hi).to_vec(),
        });
    }

    let lo = hi - 1;
    let (x0, x1) = (xs[lo], xs[hi]);
    let t = (ratio - x0) / (x1 - x0);
    let values = table
        .rows_at(lo)
        .iter()
        .zip(table.rows_at(hi))
        .map(|(v0, v1)| v0 + t * (v1 - v0))
        .collect();
    Ok(InterpolatedSample { ratio, values })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CorrelationTable {
        CorrelationTable::new(
            vec![0.0, 1.0, 3.0],
            vec![vec![0.0], vec![1.0], vec![-1.0]],
            vec![CoordinateOffset::new(0, 0), CoordinateOffset::new(1, 0)],
        )
        .unwrap()
    }

    #[test]
    fn midpoints_blend_linearly() {
        let t = table();
        assert!((interpolate(&t, 0.5).unwrap().values[1] - 0.5).abs() < 1e-15);
        assert!((interpolate(&t, 2.0).unwrap().values[1]).abs() < 1e-15);
    }

    #[test]
    fn endpoints_are_inside_the_domain() {
        let t = table();
        assert_eq!(interpolate(&t, 0.0).unwrap().values, [0.75, 0.0]);
        assert_eq!(interpolate(&t, 3.0).unwrap().values, [0.75, -1.0]);
    }

    #[test]
    fn rejects_outside_and_nan() {
        let t = table();
        assert_eq!(
            interpolate(&t, 3.5),
            Err(InterpolationError::OutOfDomain {
                ratio: 3.5,
                min: 0.0,
                max: 3.0
            })
        );
        assert!(matches!(
            interpolate(&t, -0.1),
            Err(InterpolationError::OutOfDomain { .. })
        ));
        assert!(matches!(
            interpolate(&t, f64::NAN),
            Err(InterpolationError::NotFinite(_))
        ));
    }
}
