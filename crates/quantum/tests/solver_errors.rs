use quantum::{
    solver::{DmrgSolver, GroundStateSolver, SolverBudget, SolverError},
    Couplings, LatticeModelSpec, SquareLattice,
};

fn chain(n: usize) -> LatticeModelSpec {
    LatticeModelSpec::new(
        Couplings {
            j1: 1.0,
            j2: 0.0,
            j3: 0.0,
        },
        SquareLattice::new(n, 1).unwrap(),
    )
    .unwrap()
}

#[test]
fn zero_bond_dimension_is_invalid() {
    let budget = SolverBudget {
        max_bond: 0,
        ..SolverBudget::default()
    };
    let err = DmrgSolver::default().solve(&chain(4), &budget).unwrap_err();
    assert!(matches!(err, SolverError::InvalidParameters(_)), "{err}");
}

#[test]
fn zero_sweeps_is_invalid() {
    let budget = SolverBudget {
        max_sweeps: 0,
        ..SolverBudget::default()
    };
    let err = DmrgSolver::default().solve(&chain(4), &budget).unwrap_err();
    assert!(matches!(err, SolverError::InvalidParameters(_)));
}

#[test]
fn default_budget_surfaces_non_convergence() {
    assert!(SolverBudget::default().require_convergence);
    let budget = SolverBudget {
        max_sweeps: 1,
        ..SolverBudget::default()
    };
    let err = DmrgSolver::default().solve(&chain(6), &budget).unwrap_err();
    assert!(matches!(err, SolverError::NotConverged { sweeps: 1, .. }));
    assert!(err.to_string().contains("did not converge"));
}

#[test]
fn unconverged_state_is_returned_when_allowed() {
    let budget = SolverBudget {
        max_sweeps: 1,
        require_convergence: false,
        ..SolverBudget::default()
    };
    let gs = DmrgSolver::default().solve(&chain(6), &budget).unwrap();
    assert!(!gs.converged);
    assert!(gs.energy < 0.0, "E = {}", gs.energy);
}

#[test]
fn single_site_lattice_has_no_model() {
    let lattice = SquareLattice::new(1, 1).unwrap();
    assert!(LatticeModelSpec::new(Couplings::default(), lattice).is_err());
}
