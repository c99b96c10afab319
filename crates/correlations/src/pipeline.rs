//! The two end-to-end pipelines. Each call is independent and returns a
//! report ready for rendering.

use crate::error::{ExplorerError, InterpolationError};
use crate::interp::interpolate;
use crate::offsets::DistanceSortedSeries;
use crate::radial::{correlations_from_reference, radial_average, RadialCorrelationProfile, RadialOptions};
use crate::table::CorrelationTable;
use quantum::{Couplings, GroundStateSolver, LatticeModelSpec, SolverBudget, SquareLattice};
use serde::Serialize;
use std::time::Instant;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LookupReport {
    /// J2/J1
    pub ratio: f64,
    pub series: DistanceSortedSeries,
}

pub fn lookup(table: &CorrelationTable, ratio: f64) -> Result<LookupReport, InterpolationError> {
    let sample = interpolate(table, ratio)?;
    Ok(LookupReport {
        ratio,
        series: sample.sorted(table.offsets()),
    })
}

/// Everything one solver-driven run needs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SolverParams {
    pub couplings: Couplings,
    pub lattice: SquareLattice,
    pub budget: SolverBudget,
    pub radial: RadialOptions,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RadialReport {
    pub couplings: Couplings,
    pub lattice: SquareLattice,
    pub reference: (usize, usize),
    pub energy: f64,
    pub sweeps: usize,
    pub converged: bool,
    pub profile: RadialCorrelationProfile,
}

/// Builds the model, runs `solver` and radially averages the correlations
/// around the reference site. Any failure aborts the whole run.
pub fn solve_radial(
    solver: &dyn GroundStateSolver,
    params: &SolverParams,
) -> Result<RadialReport, ExplorerError> {
    params.radial.validate()?;
    let model = LatticeModelSpec::new(params.couplings, params.lattice)?;
    let reference = params.radial.reference_site(&params.lattice)?;

    info!(
        j1 = params.couplings.j1,
        j2 = params.couplings.j2,
        j3 = params.couplings.j3,
        "solving"
    );
    let start = Instant::now();
    let state = solver.solve(&model, &params.budget)?;
    info!(
        energy = state.energy,
        sweeps = state.sweeps.len(),
        seconds = start.elapsed().as_secs_f64(),
        "ground state ready"
    );

    let samples =
        correlations_from_reference(&state, &params.lattice, reference, params.radial.cutoff)?;
    let profile = radial_average(&samples, params.radial.digits);

    Ok(RadialReport {
        couplings: params.couplings,
        lattice: params.lattice,
        reference: params.lattice.coords(reference),
        energy: state.energy,
        sweeps: state.sweeps.len(),
        converged: state.converged,
        profile,
    })
}
