use crate::error::ModelError;
use crate::lattice::SquareLattice;
use crate::spin::{identity, scaled, sminus, splus, sz};
use rng::SeedStream;
use serde::{Deserialize, Serialize};
use tn::mpo::{Mpo, MpoTensor};
use tn::mps::MPS;

/// Exchange couplings of the J1-J2-J3 Heisenberg model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Couplings {
    /// Nearest neighbours, distance 1.
    pub j1: f64,
    /// Diagonal neighbours, distance √2.
    pub j2: f64,
    /// Straight second neighbours, distance 2.
    pub j3: f64,
}

impl Couplings {
    fn validate(&self) -> Result<(), ModelError> {
        for (name, value) in [("J1", self.j1), ("J2", self.j2), ("J3", self.j3)] {
            if !value.is_finite() {
                return Err(ModelError::NonFiniteCoupling { name, value });
            }
        }
        Ok(())
    }
}

impl Default for Couplings {
    fn default() -> Self {
        Self {
            j1: 1.0,
            j2: 0.5,
            j3: 0.0,
        }
    }
}

/// Which neighbour shell a bond belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shell {
    First,
    Second,
    Third,
}

/// `J (S_i · S_j)` with `i < j`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub shell: Shell,
    pub coupling: f64,
}

/// Everything the ground-state solver needs to know about the model:
/// couplings, geometry and whether total Sz is held fixed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatticeModelSpec {
    pub couplings: Couplings,
    pub lattice: SquareLattice,
    /// Start from a state with total Sz = 0 (or 1/2 for odd site counts).
    /// The Hamiltonian conserves total Sz, so the search stays in that sector.
    pub conserve_sz: bool,
}

impl LatticeModelSpec {
    pub fn new(couplings: Couplings, lattice: SquareLattice) -> Result<Self, ModelError> {
        couplings.validate()?;
        let spec = Self {
            couplings,
            lattice,
            conserve_sz: true,
        };
        if spec.bonds().is_empty() {
            return Err(ModelError::NoBonds);
        }
        Ok(spec)
    }

    /// The 6×6 open-boundary lattice used by the explorer.
    pub fn square_6x6(couplings: Couplings) -> Result<Self, ModelError> {
        Self::new(couplings, SquareLattice::default())
    }

    pub fn len(&self) -> usize {
        self.lattice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lattice.is_empty()
    }

    /// Every bond with a non-zero coupling, ordered by `(i, j)`.
    pub fn bonds(&self) -> Vec<Bond> {
        let n = self.lattice.len();
        let mut bonds = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                let (dx, dy) = self.lattice.offset(i, j);
                let (shell, coupling) = match (dx.abs(), dy.abs()) {
                    (1, 0) | (0, 1) => (Shell::First, self.couplings.j1),
                    (1, 1) => (Shell::Second, self.couplings.j2),
                    (2, 0) | (0, 2) => (Shell::Third, self.couplings.j3),
                    _ => continue,
                };
                if coupling != 0.0 {
                    bonds.push(Bond {
                        i,
                        j,
                        shell,
                        coupling,
                    });
                }
            }
        }
        bonds
    }

    /// Encodes `H = Σ J (Sz Sz + ½(S+ S- + S- S+))` as an MPO.
    ///
    /// Virtual states: 0 = nothing placed yet, `D - 1` = term complete, and
    /// for each of Sz, S+, S- one channel per chain distance `1..=R`
    /// carrying the operator placed that many sites to the left.
    pub fn to_mpo(&self) -> Result<Mpo, ModelError> {
        let n = self.lattice.len();
        let bonds = self.bonds();
        if bonds.is_empty() {
            return Err(ModelError::NoBonds);
        }
        let range = bonds.iter().map(|b| b.j - b.i).max().unwrap_or(1);
        let dim = 3 * range + 2;
        let done = dim - 1;
        let channel = |kind: usize, d: usize| 1 + kind * range + (d - 1);

        let starts = [sz(), splus(), sminus()];
        let mut has_start = vec![false; n];
        for b in &bonds {
            has_start[b.i] = true;
        }

        let mut tensors: Vec<MpoTensor> = (0..n).map(|_| MpoTensor::new(dim, dim)).collect();
        for (k, w) in tensors.iter_mut().enumerate() {
            w.add(0, 0, identity());
            w.add(done, done, identity());
            if has_start[k] {
                for (kind, op) in starts.iter().enumerate() {
                    w.add(0, channel(kind, 1), *op);
                }
            }
            for d in 1..range.min(k + 1) {
                for kind in 0..3 {
                    w.add(channel(kind, d), channel(kind, d + 1), identity());
                }
            }
        }
        for b in &bonds {
            let d = b.j - b.i;
            let w = &mut tensors[b.j];
            w.add(channel(0, d), done, scaled(sz(), b.coupling));
            w.add(channel(1, d), done, scaled(sminus(), 0.5 * b.coupling));
            w.add(channel(2, d), done, scaled(splus(), 0.5 * b.coupling));
        }

        Ok(Mpo::new(tensors, 0, done)?)
    }

    /// Checkerboard product state, up on even `x + y`.
    pub fn neel_state(&self) -> Result<MPS, ModelError> {
        let states: Vec<usize> = (0..self.lattice.len())
            .map(|i| {
                let (x, y) = self.lattice.coords(i);
                (x + y) % 2
            })
            .collect();
        Ok(MPS::product(&states)?)
    }

    /// Random product state drawn from `seed`. With `conserve_sz` half the
    /// spins point down, placed at random; otherwise each spin is independent.
    pub fn random_state(&self, seed: &str) -> Result<MPS, ModelError> {
        let n = self.lattice.len();
        let mut rng = SeedStream::new(seed.as_bytes());
        let states: Vec<usize> = if self.conserve_sz {
            let mut s: Vec<usize> = (0..n).map(|i| usize::from(i < n / 2)).collect();
            rng.shuffle(&mut s);
            s
        } else {
            (0..n)
                .map(|_| usize::from(rng.next_f64(b"SPIN") < 0.5))
                .collect()
        };
        Ok(MPS::product(&states)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(w: usize, h: usize, j1: f64, j2: f64, j3: f64) -> LatticeModelSpec {
        LatticeModelSpec::new(Couplings { j1, j2, j3 }, SquareLattice::new(w, h).unwrap()).unwrap()
    }

    #[test]
    fn bond_counts_on_six_by_six() {
        let m = LatticeModelSpec::square_6x6(Couplings {
            j1: 1.0,
            j2: 0.5,
            j3: 0.25,
        })
        .unwrap();
        let bonds = m.bonds();
        let count = |s: Shell| bonds.iter().filter(|b| b.shell == s).count();
        assert_eq!(count(Shell::First), 60);
        assert_eq!(count(Shell::Second), 50);
        assert_eq!(count(Shell::Third), 48);
    }

    #[test]
    fn zero_couplings_drop_bonds() {
        let m = spec(2, 2, 1.0, 0.0, 0.0);
        assert_eq!(m.bonds().len(), 4);
        assert!(m.bonds().iter().all(|b| b.shell == Shell::First));
    }

    #[test]
    fn rejects_non_finite_and_empty_models() {
        let lat = SquareLattice::default();
        let bad = Couplings {
            j1: f64::NAN,
            j2: 0.0,
            j3: 0.0,
        };
        assert!(matches!(
            LatticeModelSpec::new(bad, lat),
            Err(ModelError::NonFiniteCoupling { name: "J1", .. })
        ));
        let zero = Couplings {
            j1: 0.0,
            j2: 0.0,
            j3: 0.0,
        };
        assert_eq!(LatticeModelSpec::new(zero, lat), Err(ModelError::NoBonds));
    }

    /// Dense H built directly from the bond list, site 0 as the top bit.
    fn dense_from_bonds(m: &LatticeModelSpec) -> Vec<f64> {
        let n = m.len();
        let dim = 1usize << n;
        let bit = |s: usize, k: usize| (s >> (n - 1 - k)) & 1;
        let mut h = vec![0.0; dim * dim];
        for b in m.bonds() {
            for s in 0..dim {
                let same = bit(s, b.i) == bit(s, b.j);
                h[s * dim + s] += if same { 0.25 } else { -0.25 } * b.coupling;
                if !same {
                    let t = s ^ (1 << (n - 1 - b.i)) ^ (1 << (n - 1 - b.j));
                    h[t * dim + s] += 0.5 * b.coupling;
                }
            }
        }
        h
    }

    #[test]
    fn mpo_matches_bond_sum() {
        let m = spec(2, 3, 1.0, 0.45, 0.2);
        let dense = m.to_mpo().unwrap().to_dense().unwrap();
        let expect = dense_from_bonds(&m);
        assert_eq!(dense.len(), expect.len());
        for (a, b) in dense.iter().zip(&expect) {
            assert!((a.re - b).abs() < 1e-12 && a.im.abs() < 1e-12);
        }
    }

    #[test]
    fn neel_state_alternates() {
        let m = spec(2, 2, 1.0, 0.0, 0.0);
        let psi = m.neel_state().unwrap();
        let up = |k: usize| psi.sites[k].get(0, 0, 0).re == 1.0;
        assert!(up(0) && !up(1) && !up(2) && up(3));
    }

    #[test]
    fn random_state_is_balanced_and_seeded() {
        let m = LatticeModelSpec::square_6x6(Couplings::default()).unwrap();
        let a = m.random_state("s").unwrap();
        let b = m.random_state("s").unwrap();
        let downs = |psi: &MPS| {
            psi.sites
                .iter()
                .filter(|t| t.get(0, 1, 0).re == 1.0)
                .count()
        };
        assert_eq!(downs(&a), 18);
        for (x, y) in a.sites.iter().zip(&b.sites) {
            assert_eq!(x.data, y.data);
        }
    }

    #[test]
    fn free_sz_draws_spins_independently() {
        let mut m = LatticeModelSpec::square_6x6(Couplings::default()).unwrap();
        m.conserve_sz = false;
        let downs = |psi: &MPS| {
            psi.sites
                .iter()
                .filter(|t| t.get(0, 1, 0).re == 1.0)
                .count()
        };
        let counts: Vec<usize> = (0..8)
            .map(|k| downs(&m.random_state(&format!("free-{}", k)).unwrap()))
            .collect();
        assert!(counts.iter().any(|&c| c != 18), "{:?}", counts);

        let again = m.random_state("free-0").unwrap();
        assert_eq!(downs(&again), counts[0]);
    }
}
