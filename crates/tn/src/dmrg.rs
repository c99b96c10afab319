//! Two-site DMRG ground-state search.

use crate::env::{extend_left, extend_right, Env, TwoSiteOperator};
use crate::error::DmrgError;
use crate::lanczos::{lowest_eigenpair, LanczosParams};
use crate::mpo::Mpo;
use crate::mps::{Direction, MPS};
use crate::truncation::Truncation;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepSchedule {
    pub max_sweeps: usize,
    pub truncation: Truncation,
    /// Converged once the energy changes by less than this between sweeps.
    pub energy_tol: f64,
    pub lanczos: LanczosParams,
    /// Turn a run that exhausts `max_sweeps` into [`DmrgError::NotConverged`];
    /// when unset the last state is returned with `converged = false`.
    pub require_convergence: bool,
}

impl Default for SweepSchedule {
    fn default() -> Self {
        Self {
            max_sweeps: 10,
            truncation: Truncation::default(),
            energy_tol: 1e-8,
            lanczos: LanczosParams::default(),
            require_convergence: true,
        }
    }
}

/// One full left-right-left sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepStats {
    pub sweep: usize,
    pub energy: f64,
    pub max_bond: usize,
    /// Largest discarded weight of any split during the sweep.
    pub discarded_weight: f64,
}

#[derive(Clone, Debug)]
pub struct DmrgOutcome {
    pub psi: MPS,
    pub energy: f64,
    pub sweeps: Vec<SweepStats>,
    pub converged: bool,
}

fn validate(mpo: &Mpo, psi: &MPS, schedule: &SweepSchedule) -> Result<(), DmrgError> {
    if schedule.max_sweeps == 0 {
        return Err(DmrgError::InvalidSchedule(
            "max_sweeps must be > 0".to_string(),
        ));
    }
    if schedule.truncation.max_bond == 0 {
        return Err(DmrgError::InvalidSchedule(
            "max_bond must be > 0".to_string(),
        ));
    }
    if !(schedule.truncation.cutoff >= 0.0) || !(schedule.energy_tol > 0.0) {
        return Err(DmrgError::InvalidSchedule(
            "cutoff must be >= 0 and energy_tol > 0".to_string(),
        ));
    }
    if schedule.lanczos.max_iter == 0 {
        return Err(DmrgError::InvalidSchedule(
            "Lanczos needs at least one iteration".to_string(),
        ));
    }
    if psi.len() < 2 {
        return Err(DmrgError::Shape(format!(
            "two-site DMRG needs at least 2 sites, got {}",
            psi.len()
        )));
    }
    if mpo.len() != psi.len() {
        return Err(DmrgError::Shape(format!(
            "MPO has {} sites, MPS has {}",
            mpo.len(),
            psi.len()
        )));
    }
    if psi.sites.iter().any(|s| s.dp != 2) {
        return Err(DmrgError::Shape(
            "only spin-1/2 sites are supported".to_string(),
        ));
    }
    Ok(())
}

struct Sweeper<'a> {
    mpo: &'a Mpo,
    psi: MPS,
    left: Vec<Env>,
    right: Vec<Env>,
    schedule: &'a SweepSchedule,
}

impl Sweeper<'_> {
    /// Optimises sites `k, k + 1`, then splits toward `dir`.
    fn optimize_bond(&mut self, k: usize, dir: Direction) -> Result<(f64, f64), DmrgError> {
        let theta = self.psi.two_site_theta(k)?;
        let op = TwoSiteOperator {
            left: &self.left[k],
            w1: &self.mpo.tensors[k],
            w2: &self.mpo.tensors[k + 1],
            right: &self.right[k + 1],
        };
        let pair = lowest_eigenpair(|v| op.apply(v), &theta, &self.schedule.lanczos)?;
        let report = self
            .psi
            .split_two_site(k, &pair.vector, self.schedule.truncation, dir)?;
        debug!(
            bond = k,
            energy = pair.value,
            kept = report.kept,
            lanczos_iters = pair.iterations,
            "bond optimised"
        );
        Ok((pair.value, report.discarded_weight))
    }

    fn sweep(&mut self) -> Result<(f64, f64), DmrgError> {
        let n = self.psi.len();
        let mut energy = f64::NAN;
        let mut discarded: f64 = 0.0;

        for k in 0..n - 1 {
            let (e, w) = self.optimize_bond(k, Direction::Right)?;
            energy = e;
            discarded = discarded.max(w);
            self.left[k + 1] =
                extend_left(&self.left[k], &self.psi.sites[k], &self.mpo.tensors[k]);
        }
        for k in (0..n - 1).rev() {
            let (e, w) = self.optimize_bond(k, Direction::Left)?;
            energy = e;
            discarded = discarded.max(w);
            self.right[k] = extend_right(
                &self.right[k + 1],
                &self.psi.sites[k + 1],
                &self.mpo.tensors[k + 1],
            );
        }
        Ok((energy, discarded))
    }
}

/// Finds the ground state of `mpo` starting from `initial`.
///
/// The initial state is right-canonicalised first; each sweep goes
/// left→right then right→left, and the energy reported for a sweep is the
/// Lanczos value at its final bond.
pub fn run_dmrg(
    mpo: &Mpo,
    initial: MPS,
    schedule: &SweepSchedule,
) -> Result<DmrgOutcome, DmrgError> {
    validate(mpo, &initial, schedule)?;

    let mut psi = initial;
    psi.right_canonicalize()?;
    let n = psi.len();

    let mut right: Vec<Env> = vec![Env::boundary(1, 0); n];
    right[n - 1] = Env::boundary(mpo.tensors[n - 1].dr, mpo.finish);
    for k in (1..n).rev() {
        right[k - 1] = extend_right(&right[k], &psi.sites[k], &mpo.tensors[k]);
    }
    let mut left: Vec<Env> = vec![Env::boundary(1, 0); n];
    left[0] = Env::boundary(mpo.tensors[0].dl, mpo.start);

    let mut sweeper = Sweeper {
        mpo,
        psi,
        left,
        right,
        schedule,
    };

    let mut stats = Vec::with_capacity(schedule.max_sweeps);
    let mut prev = f64::INFINITY;
    let mut delta = f64::INFINITY;
    let mut converged = false;

    for sweep in 1..=schedule.max_sweeps {
        let (energy, discarded) = sweeper.sweep()?;
        if !energy.is_finite() {
            return Err(crate::error::TnError::Numerical(format!(
                "energy became {} in sweep {}",
                energy, sweep
            ))
            .into());
        }

        let max_bond = sweeper.psi.max_bond();
        stats.push(SweepStats {
            sweep,
            energy,
            max_bond,
            discarded_weight: discarded,
        });
        delta = (energy - prev).abs();
        info!(
            sweep,
            energy,
            delta,
            max_bond,
            discarded_weight = discarded,
            "dmrg sweep"
        );

        if delta < schedule.energy_tol {
            converged = true;
            break;
        }
        prev = energy;
    }

    if !converged {
        if schedule.require_convergence {
            return Err(DmrgError::NotConverged {
                sweeps: schedule.max_sweeps,
                delta,
            });
        }
        warn!(
            sweeps = schedule.max_sweeps,
            delta, "dmrg stopped before the energy converged"
        );
    }

    let energy = stats.last().map(|s| s.energy).unwrap_or(f64::NAN);
    Ok(DmrgOutcome {
        psi: sweeper.psi,
        energy,
        sweeps: stats,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mpo::{MpoTensor, Op};
    use crate::mps::C64;

    fn ops() -> (Op, Op, Op, Op) {
        let z = C64::new(0.0, 0.0);
        let o = C64::new(1.0, 0.0);
        let h = C64::new(0.5, 0.0);
        (
            [[o, z], [z, o]],
            [[h, z], [z, -h]],
            [[z, o], [z, z]],
            [[z, z], [o, z]],
        )
    }

    /// Uniform nearest-neighbour Heisenberg chain with open ends.
    fn chain(n: usize) -> Mpo {
        let (id, sz, sp, sm) = ops();
        let half = |op: Op| {
            let mut out = op;
            for row in out.iter_mut() {
                for v in row.iter_mut() {
                    *v *= 0.5;
                }
            }
            out
        };
        let tensors = (0..n)
            .map(|_| {
                let mut w = MpoTensor::new(5, 5);
                w.add(0, 0, id);
                w.add(0, 1, sz);
                w.add(0, 2, sp);
                w.add(0, 3, sm);
                w.add(1, 4, sz);
                w.add(2, 4, half(sm));
                w.add(3, 4, half(sp));
                w.add(4, 4, id);
                w
            })
            .collect();
        Mpo::new(tensors, 0, 4).unwrap()
    }

    fn neel(n: usize) -> MPS {
        let states: Vec<usize> = (0..n).map(|i| i % 2).collect();
        MPS::product(&states).unwrap()
    }

    #[test]
    fn dimer_singlet() {
        let out = run_dmrg(&chain(2), neel(2), &SweepSchedule::default()).unwrap();
        assert!((out.energy + 0.75).abs() < 1e-10, "E = {}", out.energy);
        assert!(out.converged);
    }

    #[test]
    fn four_site_open_chain() {
        let exact = -(0.75 + 3.0_f64.sqrt() / 2.0);
        let out = run_dmrg(&chain(4), neel(4), &SweepSchedule::default()).unwrap();
        assert!((out.energy - exact).abs() < 1e-8, "E = {}", out.energy);
        assert!(out.psi.max_bond() <= 4);
    }

    #[test]
    fn running_out_of_sweeps_is_an_error_by_default() {
        let schedule = SweepSchedule {
            max_sweeps: 1,
            ..SweepSchedule::default()
        };
        let err = run_dmrg(&chain(6), neel(6), &schedule).unwrap_err();
        assert!(matches!(err, DmrgError::NotConverged { sweeps: 1, .. }));
    }

    #[test]
    fn unconverged_run_can_be_accepted() {
        let schedule = SweepSchedule {
            max_sweeps: 1,
            require_convergence: false,
            ..SweepSchedule::default()
        };
        let out = run_dmrg(&chain(6), neel(6), &schedule).unwrap();
        assert!(!out.converged);
        assert_eq!(out.sweeps.len(), 1);
    }

    #[test]
    fn rejects_empty_budget() {
        let schedule = SweepSchedule {
            max_sweeps: 0,
            ..SweepSchedule::default()
        };
        assert!(matches!(
            run_dmrg(&chain(2), neel(2), &schedule),
            Err(DmrgError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn rejects_length_mismatch() {
        assert!(matches!(
            run_dmrg(&chain(3), neel(4), &SweepSchedule::default()),
            Err(DmrgError::Shape(_))
        ));
    }
}
