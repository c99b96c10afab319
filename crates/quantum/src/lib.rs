//! Spin-1/2 Heisenberg models on the square lattice and their ground states.

pub mod energy;
mod env;
pub mod error;
pub mod lattice;
pub mod model;
pub mod observables;
pub mod solver;
pub mod spin;

pub use error::ModelError;
pub use lattice::SquareLattice;
pub use model::{Couplings, LatticeModelSpec};
pub use solver::{DmrgSolver, GroundState, GroundStateSolver, SolverBudget, SolverError};
