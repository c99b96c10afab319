use crate::error::TnError;
use crate::truncation::{Truncation, TruncationReport};
use faer::Mat;
use num_complex::Complex64;

pub type C64 = Complex64;

#[derive(Clone, Debug)]
pub struct Tensor3 {
    pub data: Vec<C64>,
    pub dl: usize,
    pub dp: usize,
    pub dr: usize,
}

impl Tensor3 {
    pub fn zeros(dl: usize, dp: usize, dr: usize) -> Self {
        Self {
            data: vec![C64::new(0.0, 0.0); dl * dp * dr],
            dl,
            dp,
            dr,
        }
    }

    #[inline]
    fn idx(&self, l: usize, p: usize, r: usize) -> usize {
        (l * self.dp + p) * self.dr + r
    }

    #[inline]
    pub fn get(&self, l: usize, p: usize, r: usize) -> C64 {
        self.data[self.idx(l, p, r)]
    }

    #[inline]
    pub fn set(&mut self, l: usize, p: usize, r: usize, v: C64) {
        let i = self.idx(l, p, r);
        self.data[i] = v;
    }

    fn scale(&mut self, f: f64) {
        for v in &mut self.data {
            *v *= f;
        }
    }
}

/// Which neighbour receives the singular values after a two-site split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Left tensor becomes left-canonical, `S·V†` moves right.
    Right,
    /// Right tensor becomes right-canonical, `U·S` stays left.
    Left,
}

#[derive(Clone, Debug)]
pub struct MPS {
    pub sites: Vec<Tensor3>,
}

impl MPS {
    /// Product state of spin-1/2 sites; `states[k]` is 0 for up, 1 for down.
    pub fn product(states: &[usize]) -> Result<Self, TnError> {
        let mut sites = Vec::with_capacity(states.len());
        for (k, &s) in states.iter().enumerate() {
            if s > 1 {
                return Err(TnError::Dimension(format!(
                    "site {} has local state {} (spin-1/2 allows 0 or 1)",
                    k, s
                )));
            }
            let mut t = Tensor3::zeros(1, 2, 1);
            t.set(0, s, 0, C64::new(1.0, 0.0));
            sites.push(t);
        }
        Ok(Self { sites })
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Bond dimensions between neighbouring sites, `len() - 1` entries.
    pub fn bond_dims(&self) -> Vec<usize> {
        self.sites.iter().skip(1).map(|s| s.dl).collect()
    }

    pub fn max_bond(&self) -> usize {
        self.sites
            .iter()
            .map(|s| s.dl.max(s.dr))
            .max()
            .unwrap_or(1)
    }

    fn check_bond(&self, k: usize) -> Result<(), TnError> {
        if k + 1 >= self.sites.len() {
            return Err(TnError::SiteOutOfRange {
                site: k + 1,
                len: self.sites.len(),
            });
        }
        Ok(())
    }

    /// Contracts sites `k` and `k + 1` into θ laid out as `[l][p1][p2][r]`.
    pub fn two_site_theta(&self, k: usize) -> Result<Vec<C64>, TnError> {
        self.check_bond(k)?;
        let a = &self.sites[k];
        let b = &self.sites[k + 1];

        let dl = a.dl;
        let dr = b.dr;
        let chi = a.dr;
        let mut theta = vec![C64::new(0.0, 0.0); dl * 2 * 2 * dr];

        for l in 0..dl {
            for p1 in 0..2 {
                for m in 0..chi {
                    let av = a.get(l, p1, m);
                    if av.norm_sqr() == 0.0 {
                        continue;
                    }
                    for p2 in 0..2 {
                        let base = ((l * 2 + p1) * 2 + p2) * dr;
                        for r in 0..dr {
                            theta[base + r] += av * b.get(m, p2, r);
                        }
                    }
                }
            }
        }
        Ok(theta)
    }

    /// Splits θ (layout `[l][p1][p2][r]`, `l` and `r` matching the outer bonds
    /// of sites `k`, `k + 1`) back into two tensors through a truncated SVD.
    ///
    /// Kept singular values are renormalised so the state stays normalised.
    pub fn split_two_site(
        &mut self,
        k: usize,
        theta: &[C64],
        trunc: Truncation,
        dir: Direction,
    ) -> Result<TruncationReport, TnError> {
        self.check_bond(k)?;
        let dl = self.sites[k].dl;
        let dr = self.sites[k + 1].dr;
        if theta.len() != dl * 4 * dr {
            return Err(TnError::Dimension(format!(
                "theta has {} entries, bond {} expects {}",
                theta.len(),
                k,
                dl * 4 * dr
            )));
        }
        if theta.iter().any(|v| !v.re.is_finite() || !v.im.is_finite()) {
            return Err(TnError::Numerical(format!(
                "non-finite entry in two-site tensor at bond {}",
                k
            )));
        }

        let mut mat = Mat::<C64>::zeros(dl * 2, 2 * dr);
        for row in 0..dl * 2 {
            for col in 0..2 * dr {
                mat.write(row, col, theta[row * 2 * dr + col]);
            }
        }

        let svd = mat.thin_svd();
        let s = svd.s_diagonal();

        let mut total = 0.0;
        for i in 0..s.nrows() {
            let sv = s.read(i).re;
            total += sv * sv;
        }
        if !(total > 0.0) || !total.is_finite() {
            return Err(TnError::Numerical(format!(
                "two-site tensor at bond {} has zero norm",
                k
            )));
        }

        let mut kept = 0;
        for i in 0..s.nrows() {
            let sv = s.read(i).re;
            if sv > trunc.cutoff && kept < trunc.max_bond {
                kept += 1;
            }
        }
        if kept == 0 {
            kept = 1;
        }

        let mut kept_weight = 0.0;
        let mut s_vals = Vec::with_capacity(kept);
        for i in 0..kept {
            let sv = s.read(i).re;
            kept_weight += sv * sv;
            s_vals.push(sv);
        }
        let renorm = 1.0 / kept_weight.sqrt();
        for sv in &mut s_vals {
            *sv *= renorm;
        }

        let u_full = svd.u();
        let v_full = svd.v();
        let u_mat = u_full.submatrix(0, 0, u_full.nrows(), kept);
        let v_mat = v_full.submatrix(0, 0, v_full.nrows(), kept);

        let mut new_a = Tensor3::zeros(dl, 2, kept);
        for l in 0..dl {
            for p in 0..2 {
                for m in 0..kept {
                    let u_val = u_mat.read(l * 2 + p, m);
                    let v = match dir {
                        Direction::Right => u_val,
                        Direction::Left => u_val * s_vals[m],
                    };
                    new_a.set(l, p, m, v);
                }
            }
        }

        let mut new_b = Tensor3::zeros(kept, 2, dr);
        for m in 0..kept {
            for p in 0..2 {
                for r in 0..dr {
                    let v_val = v_mat.read(p * dr + r, m).conj();
                    let v = match dir {
                        Direction::Right => v_val * s_vals[m],
                        Direction::Left => v_val,
                    };
                    new_b.set(m, p, r, v);
                }
            }
        }

        self.sites[k] = new_a;
        self.sites[k + 1] = new_b;

        Ok(TruncationReport {
            kept,
            discarded_weight: ((total - kept_weight) / total).max(0.0),
        })
    }

    /// Brings every site but the first into right-canonical form and
    /// normalises the state. No singular value above zero is dropped.
    pub fn right_canonicalize(&mut self) -> Result<(), TnError> {
        if self.sites.is_empty() {
            return Ok(());
        }
        for k in (0..self.sites.len().saturating_sub(1)).rev() {
            let theta = self.two_site_theta(k)?;
            self.split_two_site(k, &theta, Truncation::exact(), Direction::Left)?;
        }

        let first = &mut self.sites[0];
        let norm_sq: f64 = first.data.iter().map(|v| v.norm_sqr()).sum();
        if !(norm_sq > 0.0) || !norm_sq.is_finite() {
            return Err(TnError::Numerical("state has zero norm".to_string()));
        }
        first.scale(1.0 / norm_sq.sqrt());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_state_shapes() {
        let psi = MPS::product(&[0, 1, 0, 1]).unwrap();
        assert_eq!(psi.len(), 4);
        assert_eq!(psi.bond_dims(), vec![1, 1, 1]);
        assert_eq!(psi.sites[1].get(0, 1, 0), C64::new(1.0, 0.0));
    }

    #[test]
    fn product_rejects_bad_local_state() {
        assert!(MPS::product(&[0, 2]).is_err());
    }

    #[test]
    fn theta_of_product_state() {
        let psi = MPS::product(&[0, 1]).unwrap();
        let theta = psi.two_site_theta(0).unwrap();
        // |up, down> sits at p1 = 0, p2 = 1
        assert_eq!(theta.len(), 4);
        assert_eq!(theta[1], C64::new(1.0, 0.0));
        assert_eq!(theta[0] + theta[2] + theta[3], C64::new(0.0, 0.0));
    }

    #[test]
    fn singlet_split_keeps_two_values() {
        let mut psi = MPS::product(&[0, 1]).unwrap();
        let s = 1.0 / 2.0_f64.sqrt();
        let theta = vec![
            C64::new(0.0, 0.0),
            C64::new(s, 0.0),
            C64::new(-s, 0.0),
            C64::new(0.0, 0.0),
        ];
        let report = psi
            .split_two_site(0, &theta, Truncation::default(), Direction::Right)
            .unwrap();
        assert_eq!(report.kept, 2);
        assert!(report.discarded_weight < 1e-12);

        let back = psi.two_site_theta(0).unwrap();
        for (x, y) in back.iter().zip(theta.iter()) {
            assert!((*x - *y).norm() < 1e-12);
        }
    }

    #[test]
    fn truncation_to_one_reports_weight() {
        let mut psi = MPS::product(&[0, 1]).unwrap();
        let theta = vec![
            C64::new(0.0, 0.0),
            C64::new(0.8, 0.0),
            C64::new(0.6, 0.0),
            C64::new(0.0, 0.0),
        ];
        let trunc = Truncation {
            max_bond: 1,
            cutoff: 0.0,
        };
        let report = psi.split_two_site(0, &theta, trunc, Direction::Left).unwrap();
        assert_eq!(report.kept, 1);
        assert!((report.discarded_weight - 0.36).abs() < 1e-12);
    }

    #[test]
    fn zero_theta_is_numerical_error() {
        let mut psi = MPS::product(&[0, 0]).unwrap();
        let theta = vec![C64::new(0.0, 0.0); 4];
        let err = psi
            .split_two_site(0, &theta, Truncation::default(), Direction::Right)
            .unwrap_err();
        assert!(matches!(err, TnError::Numerical(_)));
    }

    #[test]
    fn out_of_range_bond() {
        let psi = MPS::product(&[0, 1]).unwrap();
        assert!(matches!(
            psi.two_site_theta(1),
            Err(TnError::SiteOutOfRange { .. })
        ));
    }
}
