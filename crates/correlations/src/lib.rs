//! Spin-spin correlation explorer for the square-lattice Heisenberg model:
//! table lookup with interpolation, and radial averages of solver output.

pub mod error;
pub mod interp;
pub mod offsets;
pub mod output;
pub mod pipeline;
pub mod plot;
pub mod present;
pub mod radial;
pub mod session;
pub mod table;

pub use error::{ExplorerError, InterpolationError, TableError};
pub use interp::{interpolate, InterpolatedSample};
pub use offsets::{sort_by_distance, CoordinateOffset, DistanceSortedSeries};
pub use pipeline::{lookup, solve_radial, LookupReport, RadialReport, SolverParams};
pub use radial::{
    correlations_from_reference, radial_average, RadialCorrelationProfile, RadialOptions,
    RadialShell, SiteCorrelation,
};
pub use table::CorrelationTable;
