use serde::{Deserialize, Serialize};
use std::fmt;

/// Lattice displacement `(dx, dy)` between two sites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordinateOffset {
    pub dx: i32,
    pub dy: i32,
}

impl CoordinateOffset {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn distance(&self) -> f64 {
        f64::from(self.dx).hypot(f64::from(self.dy))
    }

    pub fn is_origin(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// `"(dx,dy)"`
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CoordinateOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.dx, self.dy)
    }
}

/// Parallel columns ordered by ascending distance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceSortedSeries {
    pub labels: Vec<String>,
    pub distances: Vec<f64>,
    pub values: Vec<f64>,
}

impl DistanceSortedSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(label, distance, value)` per row.
    pub fn rows(&self) -> impl Iterator<Item = (&str, f64, f64)> + '_ {
        self.labels
            .iter()
            .zip(&self.distances)
            .zip(&self.values)
            .map(|((l, d), v)| (l.as_str(), *d, *v))
    }
}

/// Orders `(offset, value)` pairs by Euclidean distance. The sort is stable:
/// offsets at equal distance keep their input order.
pub fn sort_by_distance<I>(pairs: I) -> DistanceSortedSeries
where
    I: IntoIterator<Item = (CoordinateOffset, f64)>,
{
    let mut keyed: Vec<(f64, CoordinateOffset, f64)> = pairs
        .into_iter()
        .map(|(o, v)| (o.distance(), o, v))
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut out = DistanceSortedSeries {
        labels: Vec::with_capacity(keyed.len()),
        distances: Vec::with_capacity(keyed.len()),
        values: Vec::with_capacity(keyed.len()),
    };
    for (d, o, v) in keyed {
        out.labels.push(o.label());
        out.distances.push(d);
        out.values.push(v);
    }
    out
}
