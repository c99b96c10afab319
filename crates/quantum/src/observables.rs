use crate::env::{left_envs, right_envs, transfer_left, Overlap};
use crate::error::ModelError;
use crate::spin::{compose, sminus, splus, sz, Op, C64};
use tn::mps::MPS;

/// Caches the left and right overlaps of a state so any one- or two-point
/// expectation value costs a single pass over the sites in between.
///
/// Holds only shared data, so one correlator can serve many threads.
pub struct Correlator<'a> {
    psi: &'a MPS,
    left: Vec<Overlap>,
    right: Vec<Overlap>,
    norm: f64,
}

impl<'a> Correlator<'a> {
    pub fn new(psi: &'a MPS) -> Result<Self, ModelError> {
        let left = left_envs(&psi.sites);
        let right = right_envs(&psi.sites);
        let norm = left[psi.len()].close(&right[psi.len()]).re;
        if !(norm > 0.0) || !norm.is_finite() {
            return Err(ModelError::ZeroNorm);
        }
        Ok(Self {
            psi,
            left,
            right,
            norm,
        })
    }

    pub fn len(&self) -> usize {
        self.psi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.psi.is_empty()
    }

    fn check(&self, site: usize) -> Result<(), ModelError> {
        if site >= self.psi.len() {
            return Err(ModelError::SiteOutOfRange {
                site,
                len: self.psi.len(),
            });
        }
        Ok(())
    }

    /// `<op_k>`
    pub fn local(&self, k: usize, op: &Op) -> Result<C64, ModelError> {
        self.check(k)?;
        let env = transfer_left(&self.left[k], &self.psi.sites[k], Some(op));
        Ok(env.close(&self.right[k + 1]) / self.norm)
    }

    /// `<op_i op_j>`; operators on different sites commute, so the order of
    /// `i` and `j` does not matter.
    pub fn two_point(&self, i: usize, op_i: &Op, j: usize, op_j: &Op) -> Result<C64, ModelError> {
        self.check(i)?;
        self.check(j)?;
        if i == j {
            return self.local(i, &compose(*op_i, *op_j));
        }
        let (a, op_a, b, op_b) = if i < j {
            (i, op_i, j, op_j)
        } else {
            (j, op_j, i, op_i)
        };

        let mut env = transfer_left(&self.left[a], &self.psi.sites[a], Some(op_a));
        for k in a + 1..b {
            env = transfer_left(&env, &self.psi.sites[k], None);
        }
        env = transfer_left(&env, &self.psi.sites[b], Some(op_b));
        Ok(env.close(&self.right[b + 1]) / self.norm)
    }

    /// `<S_i · S_j> = <Sz Sz> + ½(<S+ S-> + <S- S+>)`; 0.75 on the diagonal.
    pub fn spin_spin(&self, i: usize, j: usize) -> Result<f64, ModelError> {
        let zz = self.two_point(i, &sz(), j, &sz())?;
        let pm = self.two_point(i, &splus(), j, &sminus())?;
        let mp = self.two_point(i, &sminus(), j, &splus())?;
        Ok((zz + (pm + mp) * 0.5).re)
    }

    pub fn sz(&self, k: usize) -> Result<f64, ModelError> {
        Ok(self.local(k, &sz())?.re)
    }

    pub fn total_sz(&self) -> Result<f64, ModelError> {
        (0..self.len()).map(|k| self.sz(k)).sum()
    }
}

/// Convenience for a single `<S_i · S_j>`.
pub fn spin_correlation(psi: &MPS, i: usize, j: usize) -> Result<f64, ModelError> {
    Correlator::new(psi)?.spin_spin(i, j)
}
