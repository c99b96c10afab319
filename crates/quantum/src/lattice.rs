use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Finite square lattice with open boundaries. Sites are numbered row-major,
/// `i = y * width + x`, which is also their position along the MPS chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareLattice {
    pub width: usize,
    pub height: usize,
}

impl SquareLattice {
    pub fn new(width: usize, height: usize) -> Result<Self, ModelError> {
        if width == 0 || height == 0 {
            return Err(ModelError::EmptyLattice { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn site(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn coords(&self, site: usize) -> (usize, usize) {
        (site % self.width, site / self.width)
    }

    /// Central site, rounded toward the origin on even sizes.
    pub fn center(&self) -> usize {
        let x = (self.width - 1) / 2;
        let y = (self.height - 1) / 2;
        y * self.width + x
    }

    /// Lattice displacement from `from` to `to`.
    pub fn offset(&self, from: usize, to: usize) -> (i64, i64) {
        let (x0, y0) = self.coords(from);
        let (x1, y1) = self.coords(to);
        (x1 as i64 - x0 as i64, y1 as i64 - y0 as i64)
    }

    pub fn distance(&self, from: usize, to: usize) -> f64 {
        let (dx, dy) = self.offset(from, to);
        ((dx * dx + dy * dy) as f64).sqrt()
    }
}

impl Default for SquareLattice {
    fn default() -> Self {
        Self {
            width: 6,
            height: 6,
        }
    }
}
