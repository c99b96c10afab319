//! MPO environments and the two-site effective Hamiltonian used by DMRG.
//!
//! An environment `E[a_bra][w][a_ket]` is the contraction of everything on
//! one side of a bond: bra tensors, MPO tensors and ket tensors.

use crate::mpo::MpoTensor;
use crate::mps::{Tensor3, C64};

#[derive(Clone, Debug)]
pub struct Env {
    pub chi: usize,
    pub mpo: usize,
    pub data: Vec<C64>,
}

impl Env {
    fn zeros(chi: usize, mpo: usize) -> Self {
        Self {
            chi,
            mpo,
            data: vec![C64::new(0.0, 0.0); chi * mpo * chi],
        }
    }

    /// Trivial boundary with bond dimension one, selecting MPO state `state`.
    pub fn boundary(mpo: usize, state: usize) -> Self {
        let mut env = Self::zeros(1, mpo);
        env.data[state] = C64::new(1.0, 0.0);
        env
    }

    #[inline]
    pub fn get(&self, bra: usize, w: usize, ket: usize) -> C64 {
        self.data[(bra * self.mpo + w) * self.chi + ket]
    }
}

#[inline]
fn is_zero(v: C64) -> bool {
    v.norm_sqr() == 0.0
}

/// Absorbs site tensor `a` (and its MPO tensor) into a left environment.
pub fn extend_left(env: &Env, a: &Tensor3, w: &MpoTensor) -> Env {
    let (dl, dp, dr) = (a.dl, a.dp, a.dr);
    debug_assert_eq!(env.chi, dl);
    debug_assert_eq!(env.mpo, w.dl);
    let zero = C64::new(0.0, 0.0);

    // t1[l_bra][w][p_in][r_ket]
    let mut t1 = vec![zero; dl * w.dl * dp * dr];
    for lb in 0..dl {
        for wi in 0..w.dl {
            for lk in 0..dl {
                let e = env.get(lb, wi, lk);
                if is_zero(e) {
                    continue;
                }
                for p in 0..dp {
                    let base = ((lb * w.dl + wi) * dp + p) * dr;
                    for r in 0..dr {
                        t1[base + r] += e * a.get(lk, p, r);
                    }
                }
            }
        }
    }

    // t2[l_bra][w'][p_out][r_ket]
    let mut t2 = vec![zero; dl * w.dr * dp * dr];
    for entry in &w.entries {
        for po in 0..dp {
            for pi in 0..dp {
                let o = entry.op[po][pi];
                if is_zero(o) {
                    continue;
                }
                for lb in 0..dl {
                    let src = ((lb * w.dl + entry.left) * dp + pi) * dr;
                    let dst = ((lb * w.dr + entry.right) * dp + po) * dr;
                    for r in 0..dr {
                        t2[dst + r] += o * t1[src + r];
                    }
                }
            }
        }
    }

    let mut out = Env::zeros(dr, w.dr);
    for lb in 0..dl {
        for po in 0..dp {
            for rb in 0..dr {
                let ac = a.get(lb, po, rb).conj();
                if is_zero(ac) {
                    continue;
                }
                for wo in 0..w.dr {
                    let src = ((lb * w.dr + wo) * dp + po) * dr;
                    let dst = (rb * w.dr + wo) * dr;
                    for rk in 0..dr {
                        out.data[dst + rk] += ac * t2[src + rk];
                    }
                }
            }
        }
    }
    out
}

/// Absorbs site tensor `b` (and its MPO tensor) into a right environment.
pub fn extend_right(env: &Env, b: &Tensor3, w: &MpoTensor) -> Env {
    let (dl, dp, dr) = (b.dl, b.dp, b.dr);
    debug_assert_eq!(env.chi, dr);
    debug_assert_eq!(env.mpo, w.dr);
    let zero = C64::new(0.0, 0.0);

    // t1[l_ket][p_in][r_bra][w']
    let mut t1 = vec![zero; dl * dp * dr * w.dr];
    for lk in 0..dl {
        for p in 0..dp {
            for rk in 0..dr {
                let bv = b.get(lk, p, rk);
                if is_zero(bv) {
                    continue;
                }
                for rb in 0..dr {
                    let base = ((lk * dp + p) * dr + rb) * w.dr;
                    for wo in 0..w.dr {
                        t1[base + wo] += bv * env.get(rb, wo, rk);
                    }
                }
            }
        }
    }

    // t2[l_ket][p_out][r_bra][w]
    let mut t2 = vec![zero; dl * dp * dr * w.dl];
    for entry in &w.entries {
        for po in 0..dp {
            for pi in 0..dp {
                let o = entry.op[po][pi];
                if is_zero(o) {
                    continue;
                }
                for lk in 0..dl {
                    for rb in 0..dr {
                        let src = ((lk * dp + pi) * dr + rb) * w.dr + entry.right;
                        let dst = ((lk * dp + po) * dr + rb) * w.dl + entry.left;
                        t2[dst] += o * t1[src];
                    }
                }
            }
        }
    }

    let mut out = Env::zeros(dl, w.dl);
    for lb in 0..dl {
        for po in 0..dp {
            for rb in 0..dr {
                let bc = b.get(lb, po, rb).conj();
                if is_zero(bc) {
                    continue;
                }
                for lk in 0..dl {
                    let src = ((lk * dp + po) * dr + rb) * w.dl;
                    for wi in 0..w.dl {
                        out.data[(lb * w.dl + wi) * dl + lk] += bc * t2[src + wi];
                    }
                }
            }
        }
    }
    out
}

/// `H_eff` acting on a two-site tensor θ laid out as `[l][p1][p2][r]`.
pub struct TwoSiteOperator<'a> {
    pub left: &'a Env,
    pub w1: &'a MpoTensor,
    pub w2: &'a MpoTensor,
    pub right: &'a Env,
}

impl TwoSiteOperator<'_> {
    pub fn dim(&self) -> usize {
        self.left.chi * 4 * self.right.chi
    }

    pub fn apply(&self, theta: &[C64]) -> Vec<C64> {
        let cl = self.left.chi;
        let cr = self.right.chi;
        let (m0, m1, m2) = (self.w1.dl, self.w1.dr, self.w2.dr);
        let zero = C64::new(0.0, 0.0);
        // one (l_bra, p1, p2, r_ket) block per MPO state
        let block = cl * 4 * cr;

        // t1[w][a_bra][p1][p2][c]
        let mut t1 = vec![zero; m0 * block];
        for ab in 0..cl {
            for w in 0..m0 {
                for ak in 0..cl {
                    let e = self.left.get(ab, w, ak);
                    if is_zero(e) {
                        continue;
                    }
                    let src = ak * 4 * cr;
                    let dst = w * block + ab * 4 * cr;
                    for x in 0..4 * cr {
                        t1[dst + x] += e * theta[src + x];
                    }
                }
            }
        }

        // t2[w1][a_bra][q1][p2][c]
        let mut t2 = vec![zero; m1 * block];
        for entry in &self.w1.entries {
            for q1 in 0..2 {
                for p1 in 0..2 {
                    let o = entry.op[q1][p1];
                    if is_zero(o) {
                        continue;
                    }
                    for ab in 0..cl {
                        let src = entry.left * block + (ab * 2 + p1) * 2 * cr;
                        let dst = entry.right * block + (ab * 2 + q1) * 2 * cr;
                        for x in 0..2 * cr {
                            t2[dst + x] += o * t1[src + x];
                        }
                    }
                }
            }
        }

        // t3[w2][a_bra][q1][q2][c]
        let mut t3 = vec![zero; m2 * block];
        for entry in &self.w2.entries {
            for q2 in 0..2 {
                for p2 in 0..2 {
                    let o = entry.op[q2][p2];
                    if is_zero(o) {
                        continue;
                    }
                    for ab in 0..cl {
                        for q1 in 0..2 {
                            let row = (ab * 2 + q1) * 2;
                            let src = entry.left * block + (row + p2) * cr;
                            let dst = entry.right * block + (row + q2) * cr;
                            for c in 0..cr {
                                t3[dst + c] += o * t2[src + c];
                            }
                        }
                    }
                }
            }
        }

        // out[a_bra][q1][q2][c_bra]
        let mut out = vec![zero; block];
        for w in 0..m2 {
            for row in 0..cl * 4 {
                let src = w * block + row * cr;
                for ck in 0..cr {
                    let t = t3[src + ck];
                    if is_zero(t) {
                        continue;
                    }
                    for cb in 0..cr {
                        out[row * cr + cb] += t * self.right.get(cb, w, ck);
                    }
                }
            }
        }
        out
    }
}
