use num_complex::Complex64;

pub type C64 = Complex64;

/// `[out][in]` matrix of a single-site operator, basis `0 = up`, `1 = down`.
pub type Op = [[C64; 2]; 2];

/// S(S+1) for a single spin-1/2.
pub const SELF_CORRELATION: f64 = 0.75;

pub fn identity() -> Op {
    let z = C64::new(0.0, 0.0);
    let o = C64::new(1.0, 0.0);
    [[o, z], [z, o]]
}

pub fn sz() -> Op {
    let z = C64::new(0.0, 0.0);
    let h = C64::new(0.5, 0.0);
    [[h, z], [z, -h]]
}

/// S+ |down> = |up>
pub fn splus() -> Op {
    let z = C64::new(0.0, 0.0);
    let o = C64::new(1.0, 0.0);
    [[z, o], [z, z]]
}

/// S- |up> = |down>
pub fn sminus() -> Op {
    let z = C64::new(0.0, 0.0);
    let o = C64::new(1.0, 0.0);
    [[z, z], [o, z]]
}

pub fn scaled(op: Op, f: f64) -> Op {
    let mut out = op;
    for row in out.iter_mut() {
        for v in row.iter_mut() {
            *v *= f;
        }
    }
    out
}

/// Matrix product `a · b`.
pub fn compose(a: Op, b: Op) -> Op {
    let mut out = [[C64::new(0.0, 0.0); 2]; 2];
    for i in 0..2 {
        for j in 0..2 {
            for k in 0..2 {
                out[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spin_squared_is_three_quarters() {
        let zz = compose(sz(), sz());
        let pm = compose(splus(), sminus());
        let mp = compose(sminus(), splus());
        for p in 0..2 {
            let v = zz[p][p] + (pm[p][p] + mp[p][p]) * 0.5;
            assert!((v.re - SELF_CORRELATION).abs() < 1e-15);
        }
    }

    #[test]
    fn commutator_of_ladder_ops() {
        // [S+, S-] = 2 Sz
        let pm = compose(splus(), sminus());
        let mp = compose(sminus(), splus());
        let two_sz = scaled(sz(), 2.0);
        for i in 0..2 {
            for j in 0..2 {
                assert_eq!(pm[i][j] - mp[i][j], two_sz[i][j]);
            }
        }
    }
}
