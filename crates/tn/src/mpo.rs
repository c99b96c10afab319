use crate::error::TnError;
use crate::mps::C64;

/// Single-site operator, `op[out][in]`.
pub type Op = [[C64; 2]; 2];

/// One non-zero block of an MPO tensor: `op` placed between virtual
/// states `left` and `right`.
#[derive(Clone, Debug)]
pub struct MpoEntry {
    pub left: usize,
    pub right: usize,
    pub op: Op,
}

/// Operator-valued matrix `W[left][right]`, stored sparsely.
#[derive(Clone, Debug)]
pub struct MpoTensor {
    pub dl: usize,
    pub dr: usize,
    pub entries: Vec<MpoEntry>,
}

impl MpoTensor {
    pub fn new(dl: usize, dr: usize) -> Self {
        Self {
            dl,
            dr,
            entries: Vec::new(),
        }
    }

    /// Adds `op` to block `(left, right)`, merging with an existing entry.
    pub fn add(&mut self, left: usize, right: usize, op: Op) {
        debug_assert!(left < self.dl && right < self.dr);
        if let Some(e) = self
            .entries
            .iter_mut()
            .find(|e| e.left == left && e.right == right)
        {
            for p in 0..2 {
                for q in 0..2 {
                    e.op[p][q] += op[p][q];
                }
            }
            return;
        }
        self.entries.push(MpoEntry { left, right, op });
    }
}

/// Matrix product operator `v_start · W_0 · W_1 ⋯ W_{n-1} · v_finish`, where
/// the boundary vectors select a single virtual state.
#[derive(Clone, Debug)]
pub struct Mpo {
    pub tensors: Vec<MpoTensor>,
    pub start: usize,
    pub finish: usize,
}

impl Mpo {
    pub fn new(tensors: Vec<MpoTensor>, start: usize, finish: usize) -> Result<Self, TnError> {
        let first = tensors
            .first()
            .ok_or_else(|| TnError::Dimension("MPO has no sites".to_string()))?;
        if start >= first.dl {
            return Err(TnError::Dimension(format!(
                "start state {} outside left bond of size {}",
                start, first.dl
            )));
        }
        for (k, pair) in tensors.windows(2).enumerate() {
            if pair[0].dr != pair[1].dl {
                return Err(TnError::Dimension(format!(
                    "MPO bond {} has sizes {} and {}",
                    k, pair[0].dr, pair[1].dl
                )));
            }
        }
        let last = &tensors[tensors.len() - 1];
        if finish >= last.dr {
            return Err(TnError::Dimension(format!(
                "finish state {} outside right bond of size {}",
                finish, last.dr
            )));
        }
        Ok(Self {
            tensors,
            start,
            finish,
        })
    }

    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    pub fn max_bond(&self) -> usize {
        self.tensors.iter().map(|w| w.dl.max(w.dr)).max().unwrap_or(0)
    }

    /// Dense `2^n × 2^n` matrix, row-major, site 0 as the most significant
    /// bit. Intended for checking small systems.
    pub fn to_dense(&self) -> Result<Vec<C64>, TnError> {
        if self.len() > 12 {
            return Err(TnError::Dimension(format!(
                "dense form of a {}-site MPO is too large",
                self.len()
            )));
        }

        let zero = C64::new(0.0, 0.0);
        // one dim×dim block per open virtual state
        let mut dim = 1usize;
        let mut blocks: Vec<Option<Vec<C64>>> = vec![None; self.tensors[0].dl];
        blocks[self.start] = Some(vec![C64::new(1.0, 0.0)]);

        for w in &self.tensors {
            let next_dim = dim * 2;
            let mut next: Vec<Option<Vec<C64>>> = vec![None; w.dr];
            for e in &w.entries {
                let Some(prev) = &blocks[e.left] else {
                    continue;
                };
                let out = next[e.right].get_or_insert_with(|| vec![zero; next_dim * next_dim]);
                for i in 0..dim {
                    for j in 0..dim {
                        let m = prev[i * dim + j];
                        if m == zero {
                            continue;
                        }
                        for p in 0..2 {
                            for q in 0..2 {
                                out[(i * 2 + p) * next_dim + j * 2 + q] += m * e.op[p][q];
                            }
                        }
                    }
                }
            }
            blocks = next;
            dim = next_dim;
        }

        Ok(blocks[self.finish]
            .take()
            .unwrap_or_else(|| vec![zero; dim * dim]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(a: f64, b: f64) -> Op {
        let z = C64::new(0.0, 0.0);
        [[C64::new(a, 0.0), z], [z, C64::new(b, 0.0)]]
    }

    #[test]
    fn rejects_mismatched_bonds() {
        let tensors = vec![MpoTensor::new(1, 2), MpoTensor::new(3, 1)];
        assert!(Mpo::new(tensors, 0, 0).is_err());
    }

    #[test]
    fn dense_zz_on_two_sites() {
        // H = Z_0 Z_1 through a 3-state automaton
        let id = diag(1.0, 1.0);
        let z = diag(1.0, -1.0);
        let mut w0 = MpoTensor::new(3, 3);
        w0.add(0, 0, id);
        w0.add(0, 1, z);
        w0.add(2, 2, id);
        let mut w1 = MpoTensor::new(3, 3);
        w1.add(0, 0, id);
        w1.add(1, 2, z);
        w1.add(2, 2, id);
        let mpo = Mpo::new(vec![w0, w1], 0, 2).unwrap();

        let h = mpo.to_dense().unwrap();
        let expect = [1.0, -1.0, -1.0, 1.0];
        for i in 0..4 {
            for j in 0..4 {
                let want = if i == j { expect[i] } else { 0.0 };
                assert!((h[i * 4 + j].re - want).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn add_merges_entries() {
        let mut w = MpoTensor::new(2, 2);
        w.add(0, 1, diag(1.0, 0.0));
        w.add(0, 1, diag(0.0, 2.0));
        assert_eq!(w.entries.len(), 1);
        assert_eq!(w.entries[0].op[1][1], C64::new(2.0, 0.0));
    }
}
