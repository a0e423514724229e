//! Queueing network simulator CLI
//!
//! ```bash
//! # Simulate up to t=1000 and write the text report
//! qnsim 1000 network.txt report.txt --seed 42
//!
//! # Same run, JSON report
//! qnsim 1000 network.txt report.json --seed 42 --format json
//! ```

use clap::{Parser, ValueEnum};
use log::info;
use qnsim::{NetworkSimulation, SimError, SimResult, SimulationConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Open queueing network simulator
///
/// Runs a seeded discrete-event simulation of a network of generators,
/// single-server FIFO queues and exits, then writes the statistics report.
#[derive(Parser, Debug)]
#[command(name = "qnsim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Simulation end time; arrivals are generated up to it
    #[arg(allow_negative_numbers = true)]
    end_time: f64,

    /// Network description file
    network_path: PathBuf,

    /// Where to write the report
    report_path: PathBuf,

    /// Random seed for reproducible results. When omitted, a random seed is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    format: ReportFormat,
}

fn read_network(path: &Path) -> SimResult<String> {
    fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn run(args: &Args) -> SimResult<()> {
    let mut config = SimulationConfig::new(args.end_time);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let text = read_network(&args.network_path)?;
    let mut simulation = NetworkSimulation::from_text(&text, &config)?;
    let summary = simulation.run()?;

    let model = simulation.model();
    if let Some(stats) = model.system_stats().summary() {
        info!(
            "{} of {} customers exited; time in system avg {:.6} (min {:.6}, max {:.6})",
            stats.count,
            model.entered(),
            stats.average,
            stats.min,
            stats.max
        );
    }
    if summary.pending_events > 0 {
        info!(
            "{} events were due after t={} and were not processed",
            summary.pending_events, args.end_time
        );
    }

    let report = simulation.report();
    let rendered = match args.format {
        ReportFormat::Text => report.render_text(),
        ReportFormat::Json => report.to_json()?,
    };
    fs::write(&args.report_path, rendered).map_err(|source| SimError::Io {
        path: args.report_path.clone(),
        source,
    })?;
    info!(
        "Report written to {} (seed {})",
        args.report_path.display(),
        model.seed()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
