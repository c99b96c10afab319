use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use correlations::{
    output::{to_file, write_json, write_profile_csv},
    plot::radial_svg,
    present::{error_line, radial_table},
    session::solver_session,
    solve_radial, ExplorerError, RadialOptions, SolverParams,
};
use quantum::{solver::InitialState, Couplings, DmrgSolver, SolverBudget, SquareLattice};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// DMRG ground state of the 6x6 J1-J2-J3 Heisenberg model and its radial spin correlations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Nearest-neighbour coupling
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    j1: f64,

    /// Diagonal coupling
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    j2: f64,

    /// Second-neighbour coupling along the axes
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    j3: f64,

    /// Maximum bond dimension
    #[arg(long, default_value_t = 24)]
    max_bond: usize,

    /// Maximum number of sweeps
    #[arg(long, default_value_t = 10)]
    max_sweeps: usize,

    /// SVD cutoff
    #[arg(long, default_value_t = 1e-10)]
    cutoff: f64,

    /// Energy change between sweeps that counts as converged
    #[arg(long, default_value_t = 1e-3)]
    energy_tol: f64,

    /// Show the last state when the sweeps run out before convergence
    #[arg(long)]
    allow_unconverged: bool,

    /// Initial product state
    #[arg(long, value_enum, default_value_t = Initial::Neel)]
    initial: Initial,

    /// RNG seed for --initial random
    #[arg(long, default_value = "dmrg-explorer")]
    seed: String,

    /// Largest distance from the centre site
    #[arg(long, default_value_t = 3.3)]
    radius: f64,

    /// Decimals kept when grouping distances
    #[arg(long, default_value_t = 4)]
    digits: u32,

    /// Number of Rayon worker threads (0 = Rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Write the radial plot to this SVG file
    #[arg(long)]
    svg: Option<String>,

    /// Write distance,value,count rows to this CSV file
    #[arg(long)]
    csv: Option<String>,

    /// Write the report as JSON to this file
    #[arg(long)]
    json: Option<String>,

    /// Read `j1 j2 j3` per line from stdin
    #[arg(long)]
    interactive: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Initial {
    Neel,
    Random,
}

impl Args {
    fn params(&self) -> SolverParams {
        SolverParams {
            couplings: Couplings {
                j1: self.j1,
                j2: self.j2,
                j3: self.j3,
            },
            lattice: SquareLattice::default(),
            budget: SolverBudget {
                max_bond: self.max_bond,
                max_sweeps: self.max_sweeps,
                cutoff: self.cutoff,
                energy_tol: self.energy_tol,
                require_convergence: !self.allow_unconverged,
                initial: match self.initial {
                    Initial::Neel => InitialState::Neel,
                    Initial::Random => InitialState::Random {
                        seed: self.seed.clone(),
                    },
                },
            },
            radial: RadialOptions {
                cutoff: self.radius,
                digits: self.digits,
                reference: None,
            },
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("{}", error_line(&format!("{:#}", err)));
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("building the rayon thread pool")?;
    }

    let solver = DmrgSolver::default();
    let params = args.params();

    if args.interactive {
        let mut write_svg = |svg: &str| -> Result<(), ExplorerError> {
            if let Some(path) = &args.svg {
                std::fs::write(path, svg)?;
            }
            Ok(())
        };
        let sink: &mut dyn FnMut(&str) -> Result<(), ExplorerError> = &mut write_svg;
        let served = solver_session(
            &solver,
            &params,
            io::stdin().lock(),
            &mut io::stdout().lock(),
            Some(sink),
        )?;
        tracing::info!(served, "session closed");
        return Ok(());
    }

    let report = solve_radial(&solver, &params)?;
    print!("{}", radial_table(&report));

    if let Some(path) = &args.svg {
        std::fs::write(path, radial_svg(&report)).with_context(|| format!("writing {}", path))?;
    }
    if let Some(path) = &args.csv {
        to_file(path, |w| write_profile_csv(w, &report.profile))
            .with_context(|| format!("writing {}", path))?;
    }
    if let Some(path) = &args.json {
        to_file(path, |w| write_json(w, &report).map_err(ExplorerError::from))
            .with_context(|| format!("writing {}", path))?;
    }
    Ok(())
}
