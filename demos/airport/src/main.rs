//! airport: command-line runner for the airport discrete-event simulation.
//!
//! Loads an optional JSON configuration, applies command-line overrides,
//! runs one simulation (or a batch of replications) and prints the report.
//!
//! # Example
//!
//! ```bash
//! # Default airport: 5 gates, 3 queues, 10 arrivals, random seed
//! airport
//!
//! # Reproducible run with CSV output
//! airport --seed 42 --servers 2 --arrivals 200 --output ./out
//!
//! # Hold slots instead of queues, 20 replications
//! airport --holds 4 --retry 0.5 --replications 20
//!
//! # Replay recorded traffic
//! airport --manifest demos/airport/data/arrivals.csv --servers 1 --queues 1
//!
//! # Configuration file
//! airport --config demos/airport/data/airport.json --output ./out
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ap_core::{AirportConfig, WaitingConfig};
use ap_engine::NoopObserver;
use ap_model::load_manifest_csv;
use ap_output::{CsvWriter, EventLogObserver};
use ap_sim::{BatchSummary, SimBuilder, Spread, run_batch};

/// Airport simulation
///
/// Planes arrive, compete for gates, wait in queues or hold slots, or are
/// diverted.  Reproducible when the same seed is used.
#[derive(Parser, Debug)]
#[command(name = "airport")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON configuration file.  Command-line options override its values.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Random seed.  When omitted, a random seed is used and reported.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of gates
    #[arg(short = 's', long)]
    servers: Option<usize>,

    /// Total number of arrivals
    #[arg(short = 'n', long)]
    arrivals: Option<u32>,

    /// Mean inter-arrival time
    #[arg(long)]
    mean_arrival: Option<f64>,

    /// Mean service time
    #[arg(long)]
    mean_service: Option<f64>,

    /// Fraction of high-priority planes (0.0-1.0)
    #[arg(long)]
    high_priority: Option<f64>,

    /// Number of parallel FIFO queues (0 = divert when every gate is busy)
    #[arg(short = 'q', long, conflicts_with = "holds")]
    queues: Option<usize>,

    /// Maximum length of each queue
    #[arg(long, requires = "queues")]
    queue_capacity: Option<usize>,

    /// Number of hold slots, replacing the queues
    #[arg(long)]
    holds: Option<usize>,

    /// Retry interval for held planes
    #[arg(long, default_value = "1.0")]
    retry: f64,

    /// Time of the first arrival
    #[arg(long)]
    warm_up: Option<f64>,

    /// Stop the run at this time even if planes remain
    #[arg(long)]
    time_limit: Option<f64>,

    /// CSV of pre-planned arrivals (arrival_time,priority,service_time)
    #[arg(short = 'm', long, conflicts_with = "replications")]
    manifest: Option<PathBuf>,

    /// Directory for events.csv, summary.csv and servers.csv
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Run this many replications with consecutive seeds and print a summary
    #[arg(short = 'r', long)]
    replications: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,airport=info")),
        )
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;
    info!(?config, "configuration resolved");

    if let Some(replications) = args.replications {
        if args.output.is_some() {
            bail!("--output writes a single run; drop it or --replications");
        }
        let summary = run_batch(&config, replications)?;
        print_batch(&summary);
        return Ok(());
    }

    let mut builder = SimBuilder::new(config);
    if let Some(path) = &args.manifest {
        let manifest = load_manifest_csv(path)
            .with_context(|| format!("loading arrival manifest {}", path.display()))?;
        info!(arrivals = manifest.len(), "manifest loaded");
        builder = builder.arrivals(manifest);
    }
    let mut sim = builder.build()?;

    let report = match &args.output {
        Some(dir) => {
            let writer = CsvWriter::new(dir)
                .with_context(|| format!("creating output directory {}", dir.display()))?;
            let mut obs = EventLogObserver::new(writer);
            let report = sim.run(&mut obs)?;
            obs.write_report(&report)?;
            if let Some(e) = obs.take_error() {
                bail!("writing events.csv: {e}");
            }
            info!(rows = obs.rows(), dir = %dir.display(), "CSV output written");
            report
        }
        None => sim.run(&mut NoopObserver)?,
    };

    println!("{report}");
    Ok(())
}

/// Defaults, then the JSON file, then command-line overrides.
fn resolve_config(args: &Args) -> Result<AirportConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => AirportConfig::default(),
    };

    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(v) = args.servers {
        config.servers = v;
    }
    if let Some(v) = args.arrivals {
        config.total_arrivals = v;
    }
    if let Some(v) = args.mean_arrival {
        config.mean_arrival_time = v;
    }
    if let Some(v) = args.mean_service {
        config.mean_service_time = v;
    }
    if let Some(v) = args.high_priority {
        config.high_priority_fraction = v;
    }
    if let Some(v) = args.warm_up {
        config.warm_up = v;
    }
    if args.time_limit.is_some() {
        config.time_limit = args.time_limit;
    }

    if let Some(slots) = args.holds {
        config.waiting = WaitingConfig::Holds { slots, retry_interval: args.retry };
    } else if let Some(count) = args.queues {
        config.waiting = WaitingConfig::Queues { count, capacity: args.queue_capacity };
    }

    config.validate()?;
    Ok(config)
}

fn print_batch(summary: &BatchSummary) {
    let row = |name: &str, s: &Spread| {
        println!("   {name:<22} {:>10.3} {:>10.3} {:>10.3}", s.mean, s.min, s.max);
    };
    println!("=== AIRPORT BATCH SUMMARY ===");
    println!();
    println!("   Replications:          {}", summary.runs.len());
    println!("   Seeds:                 {}..{}", summary.base_seed, summary.base_seed.wrapping_add(summary.runs.len() as u64));
    println!();
    println!("   {:<22} {:>10} {:>10} {:>10}", "", "mean", "min", "max");
    row("Average delay", &summary.average_delay);
    row("Gate utilization", &summary.utilization);
    row("Diverted", &summary.diverted);
    row("Throughput", &summary.throughput);
}
