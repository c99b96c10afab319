//! Tabulated spin-spin correlations indexed by the coupling ratio J2/J1.

use crate::error::TableError;
use crate::offsets::CoordinateOffset;
use quantum::spin::SELF_CORRELATION;
use serde::Serialize;

/// Correlation rows sampled at strictly increasing coupling ratios.
///
/// Column 0 is always the `(0,0)` self-correlation, `S(S+1) = 0.75`; it is
/// prepended to every raw row on construction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CorrelationTable {
    ratios: Vec<f64>,
    rows: Vec<Vec<f64>>,
    offsets: Vec<CoordinateOffset>,
}

impl CorrelationTable {
    /// `raw` rows omit the self-correlation; `offsets` include `(0,0)` first.
    pub fn new(
        ratios: Vec<f64>,
        raw: Vec<Vec<f64>>,
        offsets: Vec<CoordinateOffset>,
    ) -> Result<Self, TableError> {
        if ratios.len() < 2 {
            return Err(TableError::TooFewSamples {
                count: ratios.len(),
            });
        }
        if raw.len() != ratios.len() {
            return Err(TableError::RowCount {
                ratios: ratios.len(),
                rows: raw.len(),
            });
        }
        for (index, &value) in ratios.iter().enumerate() {
            if !value.is_finite() {
                return Err(TableError::NonFiniteRatio { index, value });
            }
            if index > 0 && value <= ratios[index - 1] {
                return Err(TableError::NotIncreasing { index, value });
            }
        }

        let expected = raw[0].len();
        let mut rows = Vec::with_capacity(raw.len());
        for (index, r) in raw.into_iter().enumerate() {
            if r.len() != expected {
                return Err(TableError::RowLength {
                    index,
                    len: r.len(),
                    expected,
                });
            }
            if let Some(column) = r.iter().position(|v| !v.is_finite()) {
                return Err(TableError::NonFiniteValue {
                    row: index,
                    column: column + 1,
                });
            }
            let mut row = Vec::with_capacity(expected + 1);
            row.push(SELF_CORRELATION);
            row.extend(r);
            rows.push(row);
        }

        if offsets.len() != expected + 1 {
            return Err(TableError::OffsetCount {
                offsets: offsets.len(),
                columns: expected + 1,
            });
        }
        if !offsets[0].is_origin() {
            return Err(TableError::MissingOrigin);
        }

        Ok(Self {
            ratios,
            rows,
            offsets,
        })
    }

    /// Exact-diagonalisation correlations of the 6×6 J1-J2 model
    /// (Richter & Schulenburg), J2/J1 from 0 to 0.9.
    pub fn ed_benchmark() -> Result<Self, TableError> {
        let ratios = vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.55, 0.6, 0.7, 0.8, 0.9];
        let raw = ED_6X6_ROWS.iter().map(|r| r.to_vec()).collect();
        let offsets = ED_6X6_OFFSETS
            .iter()
            .map(|&(dx, dy)| CoordinateOffset::new(dx, dy))
            .collect();
        Self::new(ratios, raw, offsets)
    }

    pub fn len(&self) -> usize {
        self.ratios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }

    pub fn ratios(&self) -> &[f64] {
        &self.ratios
    }

    /// Full row including the self-correlation column.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub(crate) fn rows_at(&self, index: usize) -> &[f64] {
        &self.rows[index]
    }

    pub fn offsets(&self) -> &[CoordinateOffset] {
        &self.offsets
    }

    /// `(min, max)` of the tabulated ratios.
    pub fn domain(&self) -> (f64, f64) {
        (self.ratios[0], self.ratios[self.ratios.len() - 1])
    }
}

const ED_6X6_OFFSETS: [(i32, i32); 10] = [
    (0, 0),
    (1, 0),
    (1, 1),
    (2, 0),
    (2, 1),
    (2, 2),
    (3, 0),
    (3, 1),
    (3, 2),
    (3, 3),
];

#[rustfmt::skip]
const ED_6X6_ROWS: [[f64; 9]; 11] = [
    [-0.3387,  0.2072, 0.1851, -0.1790,  0.1685, -0.1670,  0.1650, -0.1645,  0.1630],
    [-0.3383,  0.2000, 0.1755, -0.1661,  0.1550, -0.1550,  0.1530, -0.1520,  0.1510],
    [-0.3369,  0.1905, 0.1631, -0.1497,  0.1380, -0.1401,  0.1370, -0.1360,  0.1350],
    [-0.3334,  0.1769, 0.1467, -0.1278,  0.1150, -0.1209,  0.1130, -0.1120,  0.1110],
    [-0.3261,  0.1562, 0.1239, -0.0971,  0.0820, -0.0952,  0.0810, -0.0790,  0.0780],
    [-0.3108,  0.1225, 0.0934, -0.0538,  0.0410, -0.0620,  0.0400, -0.0390,  0.0380],
    [-0.2986,  0.0993, 0.0774, -0.0289,  0.0250, -0.0453,  0.0240, -0.0230,  0.0220],
    [-0.1295, -0.1839, 0.1456,  0.0344,  0.0150, -0.0324,  0.0140, -0.0130,  0.0120],
    [-0.0771, -0.2659, 0.1814,  0.0302,  0.0050, -0.0248,  0.0040, -0.0030,  0.0020],
    [-0.0504, -0.3017, 0.1959,  0.0253, -0.0050, -0.0202, -0.0040, -0.0030, -0.0020],
    [-0.0347, -0.3236, 0.2028,  0.0215, -0.0100, -0.0173, -0.0080,  0.0070, -0.0050],
];

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(n: usize) -> Vec<CoordinateOffset> {
        (0..n as i32).map(|i| CoordinateOffset::new(i, 0)).collect()
    }

    #[test]
    fn benchmark_is_valid() {
        let t = CorrelationTable::ed_benchmark().unwrap();
        assert_eq!(t.len(), 11);
        assert_eq!(t.offsets().len(), 10);
        assert_eq!(t.domain(), (0.0, 0.9));
        let row = t.row(5).unwrap();
        assert_eq!(row[0], 0.75);
        assert_eq!(row[1], -0.3108);
        assert_eq!(row.len(), 10);
    }

    #[test]
    fn rejects_single_sample() {
        let err = CorrelationTable::new(vec![0.0], vec![vec![0.1]], offsets(2)).unwrap_err();
        assert_eq!(err, TableError::TooFewSamples { count: 1 });
    }

    #[test]
    fn rejects_unsorted_ratios() {
        let err = CorrelationTable::new(
            vec![0.0, 0.5, 0.5],
            vec![vec![0.1]; 3],
            offsets(2),
        )
        .unwrap_err();
        assert_eq!(err, TableError::NotIncreasing { index: 2, value: 0.5 });
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = CorrelationTable::new(
            vec![0.0, 1.0],
            vec![vec![0.1, 0.2], vec![0.1]],
            offsets(3),
        )
        .unwrap_err();
        assert!(matches!(err, TableError::RowLength { index: 1, len: 1, expected: 2 }));
    }

    #[test]
    fn offsets_must_cover_every_column() {
        let err = CorrelationTable::new(vec![0.0, 1.0], vec![vec![0.1]; 2], offsets(3)).unwrap_err();
        assert_eq!(err, TableError::OffsetCount { offsets: 3, columns: 2 });

        let shifted = vec![CoordinateOffset::new(1, 0), CoordinateOffset::new(2, 0)];
        let err = CorrelationTable::new(vec![0.0, 1.0], vec![vec![0.1]; 2], shifted).unwrap_err();
        assert_eq!(err, TableError::MissingOrigin);
    }
}
