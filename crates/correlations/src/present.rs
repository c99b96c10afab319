//! Plain-text rendering of pipeline reports.

use crate::pipeline::{LookupReport, RadialReport};
use std::fmt::{Display, Write};

pub const PHASE_NOTE: &str = "Around J2/J1 ≈ 0.5 the system enters a highly frustrated regime. \
Note the sign flip of the (1,1) correlation beyond J2/J1 ≈ 0.6.";

pub fn lookup_table(report: &LookupReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "6x6 Heisenberg J1-J2 ground state, J2/J1 = {:.3}", report.ratio);
    let _ = writeln!(out, "{:<12}{:>10}", "Coordinate", "C(x,y)");
    for (label, _, value) in report.series.rows() {
        let _ = writeln!(out, "{:<12}{:>10.5}", label, value);
    }
    out
}

pub fn radial_table(report: &RadialReport) -> String {
    let c = report.couplings;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}x{} J1-J2-J3 ground state, J1 = {}, J2 = {}, J3 = {}",
        report.lattice.width, report.lattice.height, c.j1, c.j2, c.j3
    );
    let _ = writeln!(
        out,
        "E = {:.8} after {} sweeps{}",
        report.energy,
        report.sweeps,
        if report.converged { "" } else { " (not converged)" }
    );
    let _ = writeln!(
        out,
        "reference site ({},{})",
        report.reference.0, report.reference.1
    );
    let _ = writeln!(out, "{:>8}{:>12}{:>6}", "r", "C(r)", "n");
    for s in &report.profile.shells {
        let _ = writeln!(out, "{:>8.4}{:>12.5}{:>6}", s.distance, s.mean, s.count);
    }
    out
}

/// The single line shown for a failed request.
pub fn error_line(err: &dyn Display) -> String {
    format!("error: {}", err)
}
