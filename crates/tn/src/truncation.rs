/// SVD truncation budget applied whenever a two-site tensor is split.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Truncation {
    /// Maximum number of singular values kept (bond dimension χ).
    pub max_bond: usize,
    /// Singular values at or below this are discarded.
    pub cutoff: f64,
}

impl Truncation {
    /// Keeps every non-zero singular value.
    pub fn exact() -> Self {
        Self {
            max_bond: usize::MAX,
            cutoff: 0.0,
        }
    }
}

impl Default for Truncation {
    fn default() -> Self {
        Self {
            max_bond: 64,
            cutoff: 1e-10,
        }
    }
}

/// What a single split kept and threw away.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TruncationReport {
    pub kept: usize,
    /// Sum of squared discarded singular values relative to the total.
    pub discarded_weight: f64,
}
