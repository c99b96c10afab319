use crate::spin::{Op, C64};
use tn::mps::Tensor3;

/// Partial overlap `<psi|psi>` across a cut, `data[ket * chi + bra]`.
#[derive(Clone, Debug)]
pub(crate) struct Overlap {
    pub chi: usize,
    pub data: Vec<C64>,
}

impl Overlap {
    pub fn boundary() -> Self {
        Self {
            chi: 1,
            data: vec![C64::new(1.0, 0.0)],
        }
    }

    /// Joins a left and a right overlap that meet at the same bond.
    pub fn close(&self, right: &Overlap) -> C64 {
        debug_assert_eq!(self.chi, right.chi);
        self.data
            .iter()
            .zip(&right.data)
            .map(|(l, r)| *l * *r)
            .sum()
    }
}

/// Absorbs site `a` from the left, optionally with `op` between ket and bra.
pub(crate) fn transfer_left(env: &Overlap, a: &Tensor3, op: Option<&Op>) -> Overlap {
    let (dl, dp, dr) = (a.dl, a.dp, a.dr);
    let zero = C64::new(0.0, 0.0);

    // t[bra_l][p][ket_r]
    let mut t = vec![zero; dl * dp * dr];
    for l in 0..dl {
        for lp in 0..dl {
            let e = env.data[l * dl + lp];
            if e == zero {
                continue;
            }
            for p in 0..dp {
                let base = (lp * dp + p) * dr;
                for r in 0..dr {
                    t[base + r] += e * a.get(l, p, r);
                }
            }
        }
    }
    let t = match op {
        Some(op) => apply_physical(&t, dl, dp, dr, op),
        None => t,
    };

    let mut next = vec![zero; dr * dr];
    for lp in 0..dl {
        for pp in 0..dp {
            for rp in 0..dr {
                let ac = a.get(lp, pp, rp).conj();
                if ac == zero {
                    continue;
                }
                let base = (lp * dp + pp) * dr;
                for r in 0..dr {
                    next[r * dr + rp] += t[base + r] * ac;
                }
            }
        }
    }
    Overlap {
        chi: dr,
        data: next,
    }
}

/// Absorbs site `b` from the right, optionally with `op` between ket and bra.
pub(crate) fn transfer_right(env: &Overlap, b: &Tensor3, op: Option<&Op>) -> Overlap {
    let (dl, dp, dr) = (b.dl, b.dp, b.dr);
    let zero = C64::new(0.0, 0.0);

    // t[ket_l][p][bra_r]
    let mut t = vec![zero; dl * dp * dr];
    for l in 0..dl {
        for p in 0..dp {
            for r in 0..dr {
                let bv = b.get(l, p, r);
                if bv == zero {
                    continue;
                }
                let base = (l * dp + p) * dr;
                for rp in 0..dr {
                    t[base + rp] += bv * env.data[r * dr + rp];
                }
            }
        }
    }
    let t = match op {
        Some(op) => apply_physical(&t, dl, dp, dr, op),
        None => t,
    };

    let mut next = vec![zero; dl * dl];
    for l in 0..dl {
        for pp in 0..dp {
            let base = (l * dp + pp) * dr;
            for lp in 0..dl {
                let mut acc = zero;
                for rp in 0..dr {
                    acc += t[base + rp] * b.get(lp, pp, rp).conj();
                }
                next[l * dl + lp] += acc;
            }
        }
    }
    Overlap {
        chi: dl,
        data: next,
    }
}

/// `out[x][q][y] = Σ_p op[q][p] t[x][p][y]`
fn apply_physical(t: &[C64], dx: usize, dp: usize, dy: usize, op: &Op) -> Vec<C64> {
    let zero = C64::new(0.0, 0.0);
    let mut out = vec![zero; t.len()];
    for x in 0..dx {
        for q in 0..dp {
            for p in 0..dp {
                let o = op[q][p];
                if o == zero {
                    continue;
                }
                let src = (x * dp + p) * dy;
                let dst = (x * dp + q) * dy;
                for y in 0..dy {
                    out[dst + y] += o * t[src + y];
                }
            }
        }
    }
    out
}

/// `left[k]` covers sites `0..k`; `n + 1` entries.
pub(crate) fn left_envs(sites: &[Tensor3]) -> Vec<Overlap> {
    let mut envs = Vec::with_capacity(sites.len() + 1);
    envs.push(Overlap::boundary());
    for a in sites {
        let next = transfer_left(&envs[envs.len() - 1], a, None);
        envs.push(next);
    }
    envs
}

/// `right[k]` covers sites `k..n`; `n + 1` entries.
pub(crate) fn right_envs(sites: &[Tensor3]) -> Vec<Overlap> {
    let mut envs = vec![Overlap::boundary(); sites.len() + 1];
    for k in (0..sites.len()).rev() {
        envs[k] = transfer_right(&envs[k + 1], &sites[k], None);
    }
    envs
}
