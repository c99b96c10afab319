use anyhow::{Context, Result};
use clap::Parser;
use correlations::{
    lookup,
    output::{to_file, write_json, write_series_csv},
    plot::lookup_svg,
    present::{error_line, lookup_table, PHASE_NOTE},
    session::lookup_session,
    CorrelationTable, ExplorerError,
};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Interpolated ED spin correlations of the 6x6 J1-J2 Heisenberg model
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Coupling ratio J2/J1, between 0 and 0.9
    #[arg(long, default_value_t = 0.52, allow_negative_numbers = true)]
    ratio: f64,

    /// Write the correlation plot to this SVG file
    #[arg(long)]
    svg: Option<String>,

    /// Write label,distance,value rows to this CSV file
    #[arg(long)]
    csv: Option<String>,

    /// Write the report as JSON to this file
    #[arg(long)]
    json: Option<String>,

    /// Read one ratio per line from stdin
    #[arg(long)]
    interactive: bool,
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
    let table = CorrelationTable::ed_benchmark()?;

    if args.interactive {
        let mut write_svg = |svg: &str| -> Result<(), ExplorerError> {
            if let Some(path) = &args.svg {
                std::fs::write(path, svg)?;
            }
            Ok(())
        };
        let sink: &mut dyn FnMut(&str) -> Result<(), ExplorerError> = &mut write_svg;
        let served = lookup_session(
            &table,
            io::stdin().lock(),
            &mut io::stdout().lock(),
            Some(sink),
        )?;
        tracing::info!(served, "session closed");
        return Ok(());
    }

    let report = lookup(&table, args.ratio)?;
    print!("{}", lookup_table(&report));
    println!("{}", PHASE_NOTE);

    if let Some(path) = &args.svg {
        std::fs::write(path, lookup_svg(&report)).with_context(|| format!("writing {}", path))?;
    }
    if let Some(path) = &args.csv {
        to_file(path, |w| write_series_csv(w, &report.series))
            .with_context(|| format!("writing {}", path))?;
    }
    if let Some(path) = &args.json {
        to_file(path, |w| write_json(w, &report).map_err(ExplorerError::from))
            .with_context(|| format!("writing {}", path))?;
    }
    Ok(())
}
