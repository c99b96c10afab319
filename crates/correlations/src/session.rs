//! Line-oriented interactive sessions.
//!
//! Each non-empty input line is one request. A successful request prints its
//! rendering; a failed one prints exactly one `error: …` line and the session
//! continues. `quit`, `exit` or end of input ends it.

use crate::error::ExplorerError;
use crate::pipeline::{lookup, solve_radial, SolverParams};
use crate::plot::{lookup_svg, radial_svg};
use crate::present::{error_line, lookup_table, radial_table, PHASE_NOTE};
use crate::table::CorrelationTable;
use quantum::{Couplings, GroundStateSolver};
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Where each successful request's SVG goes, if anywhere.
pub type SvgSink<'a> = Option<&'a mut dyn FnMut(&str) -> Result<(), ExplorerError>>;

pub fn run_session<R, W, F>(input: R, out: &mut W, mut handle: F) -> io::Result<usize>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> Result<String, ExplorerError>,
{
    let mut served = 0;
    for line in input.lines() {
        let line = line?;
        let request = line.trim();
        if request.is_empty() {
            continue;
        }
        if request == "quit" || request == "exit" {
            break;
        }
        debug!(request, "session request");
        match handle(request) {
            Ok(text) => write!(out, "{}", text)?,
            Err(err) => writeln!(out, "{}", error_line(&err))?,
        }
        out.flush()?;
        served += 1;
    }
    Ok(served)
}

pub fn parse_ratio(line: &str) -> Result<f64, ExplorerError> {
    line.trim().parse::<f64>().map_err(|e| ExplorerError::Request {
        line: line.to_string(),
        reason: e.to_string(),
    })
}

/// `"<j1> <j2> <j3>"`, separated by whitespace or commas.
pub fn parse_couplings(line: &str) -> Result<Couplings, ExplorerError> {
    let bad = |reason: String| ExplorerError::Request {
        line: line.to_string(),
        reason,
    };
    let parts: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() != 3 {
        return Err(bad(format!("expected 3 couplings, got {}", parts.len())));
    }
    let mut j = [0.0; 3];
    for (slot, part) in j.iter_mut().zip(&parts) {
        *slot = part.parse::<f64>().map_err(|e| bad(e.to_string()))?;
    }
    Ok(Couplings {
        j1: j[0],
        j2: j[1],
        j3: j[2],
    })
}

/// Interactive lookup: one ratio per line.
pub fn lookup_session<R: BufRead, W: Write>(
    table: &CorrelationTable,
    input: R,
    out: &mut W,
    mut svg: SvgSink<'_>,
) -> io::Result<usize> {
    run_session(input, out, |line| {
        let report = lookup(table, parse_ratio(line)?)?;
        if let Some(sink) = svg.as_deref_mut() {
            sink(&lookup_svg(&report))?;
        }
        Ok(format!("{}{}\n", lookup_table(&report), PHASE_NOTE))
    })
}

/// Interactive solver runs: `j1 j2 j3` per line, the rest of `params` fixed.
pub fn solver_session<R: BufRead, W: Write>(
    solver: &dyn GroundStateSolver,
    params: &SolverParams,
    input: R,
    out: &mut W,
    mut svg: SvgSink<'_>,
) -> io::Result<usize> {
    run_session(input, out, |line| {
        let run = SolverParams {
            couplings: parse_couplings(line)?,
            ..params.clone()
        };
        let report = solve_radial(solver, &run)?;
        if let Some(sink) = svg.as_deref_mut() {
            sink(&radial_svg(&report))?;
        }
        Ok(radial_table(&report))
    })
}
