//! Ground-state solver boundary.
//!
//! Callers only see [`GroundStateSolver`]; [`DmrgSolver`] is the shipped
//! implementation and tests swap in their own.

use crate::error::ModelError;
use crate::model::LatticeModelSpec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tn::dmrg::{run_dmrg, SweepSchedule, SweepStats};
use tn::lanczos::LanczosParams;
use tn::mps::MPS;
use tn::truncation::Truncation;
use tn::DmrgError;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitialState {
    Neel,
    Random { seed: String },
}

/// Truncation and sweep budget of one solver run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverBudget {
    /// Maximum bond dimension χ.
    pub max_bond: usize,
    pub max_sweeps: usize,
    /// Singular values at or below this are dropped.
    pub cutoff: f64,
    pub energy_tol: f64,
    /// Report running out of sweeps as [`SolverError::NotConverged`]. On by
    /// default; turning it off returns the last state unconverged.
    pub require_convergence: bool,
    pub initial: InitialState,
}

impl Default for SolverBudget {
    fn default() -> Self {
        Self {
            max_bond: 24,
            max_sweeps: 10,
            cutoff: 1e-10,
            energy_tol: 1e-3,
            require_convergence: true,
            initial: InitialState::Neel,
        }
    }
}

/// Solver output; the state stays in MPS form.
#[derive(Clone, Debug)]
pub struct GroundState {
    pub psi: MPS,
    pub energy: f64,
    pub sweeps: Vec<SweepStats>,
    pub converged: bool,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("invalid solver parameters: {0}")]
    InvalidParameters(String),

    #[error("ground-state search did not converge after {sweeps} sweeps (energy change {delta:.3e})")]
    NotConverged { sweeps: usize, delta: f64 },

    #[error("numerical failure in ground-state search: {0}")]
    Numerical(String),
}

impl From<DmrgError> for SolverError {
    fn from(err: DmrgError) -> Self {
        match err {
            DmrgError::InvalidSchedule(msg) | DmrgError::Shape(msg) => {
                SolverError::InvalidParameters(msg)
            }
            DmrgError::NotConverged { sweeps, delta } => SolverError::NotConverged { sweeps, delta },
            DmrgError::Lanczos(e) => SolverError::Numerical(e.to_string()),
            DmrgError::Tn(e) => SolverError::Numerical(e.to_string()),
        }
    }
}

impl From<ModelError> for SolverError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Tensor(e) => SolverError::Numerical(e.to_string()),
            ModelError::ZeroNorm => SolverError::Numerical("state has zero norm".to_string()),
            other => SolverError::InvalidParameters(other.to_string()),
        }
    }
}

pub trait GroundStateSolver {
    fn solve(
        &self,
        model: &LatticeModelSpec,
        budget: &SolverBudget,
    ) -> Result<GroundState, SolverError>;
}

/// Two-site DMRG from a product initial state.
#[derive(Clone, Copy, Debug, Default)]
pub struct DmrgSolver {
    pub lanczos: LanczosParams,
}

impl DmrgSolver {
    fn schedule(&self, budget: &SolverBudget) -> SweepSchedule {
        SweepSchedule {
            max_sweeps: budget.max_sweeps,
            truncation: Truncation {
                max_bond: budget.max_bond,
                cutoff: budget.cutoff,
            },
            energy_tol: budget.energy_tol,
            lanczos: self.lanczos,
            require_convergence: budget.require_convergence,
        }
    }
}

impl GroundStateSolver for DmrgSolver {
    fn solve(
        &self,
        model: &LatticeModelSpec,
        budget: &SolverBudget,
    ) -> Result<GroundState, SolverError> {
        let mpo = model.to_mpo()?;
        let initial = match &budget.initial {
            InitialState::Neel => model.neel_state()?,
            InitialState::Random { seed } => model.random_state(seed)?,
        };
        info!(
            sites = model.len(),
            mpo_bond = mpo.max_bond(),
            max_bond = budget.max_bond,
            max_sweeps = budget.max_sweeps,
            "starting DMRG"
        );

        let out = run_dmrg(&mpo, initial, &self.schedule(budget))?;
        Ok(GroundState {
            psi: out.psi,
            energy: out.energy,
            sweeps: out.sweeps,
            converged: out.converged,
        })
    }
}
