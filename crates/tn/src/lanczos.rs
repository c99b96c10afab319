//! Lowest eigenpair of a Hermitian operator given only its action on vectors.
//!
//! Krylov basis with full reorthogonalisation; the projected tridiagonal
//! matrix is diagonalised by faer.

use crate::error::LanczosError;
use crate::mps::C64;
use faer::{Mat, Side};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LanczosParams {
    /// Maximum Krylov dimension.
    pub max_iter: usize,
    /// Stop once the lowest Ritz value moves by less than this.
    pub tol: f64,
}

impl Default for LanczosParams {
    fn default() -> Self {
        Self {
            max_iter: 24,
            tol: 1e-12,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Eigenpair {
    pub value: f64,
    /// Normalised eigenvector.
    pub vector: Vec<C64>,
    pub iterations: usize,
}

fn dot(a: &[C64], b: &[C64]) -> C64 {
    a.iter().zip(b).map(|(x, y)| x.conj() * *y).sum()
}

fn norm(a: &[C64]) -> f64 {
    a.iter().map(|x| x.norm_sqr()).sum::<f64>().sqrt()
}

/// Runs Lanczos from `start`, which must be non-zero. The start vector is
/// normally the current two-site tensor, so a converged state costs a
/// single iteration.
pub fn lowest_eigenpair<F>(
    matvec: F,
    start: &[C64],
    params: &LanczosParams,
) -> Result<Eigenpair, LanczosError>
where
    F: Fn(&[C64]) -> Vec<C64>,
{
    let dim = start.len();
    if dim == 0 {
        return Err(LanczosError::EmptyStart);
    }
    let n0 = norm(start);
    if !(n0 > 0.0) || !n0.is_finite() {
        return Err(LanczosError::DegenerateStart);
    }

    let m = params.max_iter.min(dim).max(1);
    let mut basis: Vec<Vec<C64>> = Vec::with_capacity(m);
    basis.push(start.iter().map(|x| *x / n0).collect());

    let mut alpha: Vec<f64> = Vec::with_capacity(m);
    let mut beta: Vec<f64> = Vec::with_capacity(m);
    let mut prev = f64::INFINITY;

    for j in 0..m {
        let mut w = matvec(&basis[j]);

        let a = dot(&basis[j], &w).re;
        alpha.push(a);
        for (wi, qi) in w.iter_mut().zip(&basis[j]) {
            *wi -= *qi * a;
        }
        if j > 0 {
            let b = beta[j - 1];
            for (wi, qi) in w.iter_mut().zip(&basis[j - 1]) {
                *wi -= *qi * b;
            }
        }
        for q in &basis {
            let overlap = dot(q, &w);
            for (wi, qi) in w.iter_mut().zip(q) {
                *wi -= *qi * overlap;
            }
        }
        let b = norm(&w);

        let (values, vectors) = tridiagonal_eigen(&alpha, &beta);
        let (lowest_idx, lowest) = values
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::INFINITY), |acc, (i, v)| if v < acc.1 { (i, v) } else { acc });
        if !lowest.is_finite() || !b.is_finite() {
            return Err(LanczosError::NotFinite { step: j + 1 });
        }

        let converged = (lowest - prev).abs() < params.tol;
        prev = lowest;
        let exhausted = b < 1e-12 || j + 1 == m;

        if converged || exhausted {
            let k = alpha.len();
            let mut vector = vec![C64::new(0.0, 0.0); dim];
            for (i, q) in basis.iter().enumerate().take(k) {
                let y = vectors[i * k + lowest_idx];
                for (vi, qi) in vector.iter_mut().zip(q) {
                    *vi += *qi * y;
                }
            }
            let nv = norm(&vector);
            if !(nv > 0.0) || !nv.is_finite() {
                return Err(LanczosError::NotFinite { step: j + 1 });
            }
            for v in &mut vector {
                *v /= nv;
            }
            debug!(
                iterations = j + 1,
                energy = lowest,
                converged,
                "lanczos finished"
            );
            return Ok(Eigenpair {
                value: lowest,
                vector,
                iterations: j + 1,
            });
        }

        beta.push(b);
        basis.push(w.iter().map(|x| *x / b).collect());
    }

    unreachable!("loop returns on its final iteration")
}

/// Eigen-decomposition of the symmetric tridiagonal matrix with diagonal
/// `alpha` and off-diagonal `beta`. Eigenvalues ascend; eigenvectors are the
/// columns of the returned row-major `n × n` matrix.
fn tridiagonal_eigen(alpha: &[f64], beta: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = alpha.len();
    let mut t = Mat::<f64>::zeros(n, n);
    for i in 0..n {
        t.write(i, i, alpha[i]);
        if i > 0 {
            t.write(i, i - 1, beta[i - 1]);
            t.write(i - 1, i, beta[i - 1]);
        }
    }

    let evd = t.selfadjoint_eigendecomposition(Side::Lower);
    let s = evd.s().column_vector();
    let u = evd.u();
    let values = (0..n).map(|i| s.read(i)).collect();
    let mut vectors = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            vectors[i * n + j] = u.read(i, j);
        }
    }
    (values, vectors)
}
