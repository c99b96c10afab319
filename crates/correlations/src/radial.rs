//! Reference-site correlations of a ground state and their radial average.

use crate::error::ExplorerError;
use crate::offsets::CoordinateOffset;
use quantum::observables::Correlator;
use quantum::{GroundState, ModelError, SquareLattice};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MAX_DIGITS: u32 = 12;

/// `<S_ref · S_site>` for one site.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SiteCorrelation {
    pub site: usize,
    pub offset: CoordinateOffset,
    pub distance: f64,
    pub value: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RadialShell {
    pub distance: f64,
    pub mean: f64,
    pub count: usize,
}

/// Shells in ascending distance.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RadialCorrelationProfile {
    pub shells: Vec<RadialShell>,
}

impl RadialCorrelationProfile {
    pub fn len(&self) -> usize {
        self.shells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shells.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadialOptions {
    /// Largest distance from the reference site that is sampled.
    pub cutoff: f64,
    /// Decimals kept when grouping distances.
    pub digits: u32,
    /// Reference site `(x, y)`; the lattice centre when `None`.
    pub reference: Option<(usize, usize)>,
}

impl Default for RadialOptions {
    fn default() -> Self {
        Self {
            cutoff: 3.3,
            digits: 4,
            reference: None,
        }
    }
}

impl RadialOptions {
    pub fn validate(&self) -> Result<(), ExplorerError> {
        if !self.cutoff.is_finite() || self.cutoff <= 0.0 {
            return Err(ExplorerError::InvalidOption(format!(
                "radius must be positive, got {}",
                self.cutoff
            )));
        }
        if self.digits > MAX_DIGITS {
            return Err(ExplorerError::InvalidOption(format!(
                "digits must be at most {}, got {}",
                MAX_DIGITS, self.digits
            )));
        }
        Ok(())
    }

    pub fn reference_site(&self, lattice: &SquareLattice) -> Result<usize, ExplorerError> {
        match self.reference {
            None => Ok(lattice.center()),
            Some((x, y)) => lattice.site(x, y).ok_or_else(|| {
                ExplorerError::InvalidOption(format!(
                    "reference ({},{}) is outside the {}x{} lattice",
                    x, y, lattice.width, lattice.height
                ))
            }),
        }
    }
}

/// Correlations between `reference` and every other site within `cutoff`,
/// in site order. Sites are evaluated in parallel against one shared
/// [`Correlator`].
pub fn correlations_from_reference(
    state: &GroundState,
    lattice: &SquareLattice,
    reference: usize,
    cutoff: f64,
) -> Result<Vec<SiteCorrelation>, ModelError> {
    let n = lattice.len();
    if state.psi.len() != n {
        return Err(ModelError::SizeMismatch {
            len: state.psi.len(),
            expected: n,
        });
    }
    if reference >= n {
        return Err(ModelError::SiteOutOfRange {
            site: reference,
            len: n,
        });
    }

    let correlator = Correlator::new(&state.psi)?;
    (0..n)
        .into_par_iter()
        .filter(|&j| j != reference && lattice.distance(reference, j) <= cutoff)
        .map(|j| -> Result<SiteCorrelation, ModelError> {
            let (dx, dy) = lattice.offset(reference, j);
            Ok(SiteCorrelation {
                site: j,
                offset: CoordinateOffset::new(dx as i32, dy as i32),
                distance: lattice.distance(reference, j),
                value: correlator.spin_spin(reference, j)?,
            })
        })
        .collect()
}

/// Groups samples whose distances agree to `digits` decimals and averages
/// each group. Shell distances are the rounded keys.
pub fn radial_average(samples: &[SiteCorrelation], digits: u32) -> RadialCorrelationProfile {
    let scale = 10f64.powi(digits.min(MAX_DIGITS) as i32);
    let mut groups: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for s in samples {
        let key = (s.distance * scale).round() as i64;
        let entry = groups.entry(key).or_insert((0.0, 0));
        entry.0 += s.value;
        entry.1 += 1;
    }

    let shells = groups
        .into_iter()
        .map(|(key, (sum, count))| RadialShell {
            distance: key as f64 / scale,
            mean: sum / count as f64,
            count,
        })
        .collect();
    RadialCorrelationProfile { shells }
}
