//! loadgrid: run the two-balancer dispatch simulation.
//!
//! # Usage
//!
//! ```text
//! loadgrid run --units 3 --ticks 10000 --seed 42
//! loadgrid run --format json --config loadgrid.toml
//! loadgrid config
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod report;

#[derive(Parser)]
#[command(
    name = "loadgrid",
    about = "LoadGrid: discrete-time admission, dispatch, and autoscaling simulator",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation and print a summary.
    ///
    /// Missing --units or --ticks are prompted for on stdin.
    Run {
        /// Initial work units per balancer.
        #[arg(short, long)]
        units: Option<usize>,
        /// Number of ticks to simulate.
        #[arg(short, long)]
        ticks: Option<u64>,
        /// TOML file overriding the tuning parameters.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Seed for the traffic generator.
        #[arg(long)]
        seed: Option<u64>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Milliseconds between ticks. 0 runs as fast as possible;
        /// otherwise Ctrl-C stops the run early.
        #[arg(long, default_value = "0")]
        pace_ms: u64,
    },
    /// Print the effective configuration as TOML.
    Config {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Run {
            units,
            ticks,
            config,
            seed,
            format,
            pace_ms,
        } => commands::run::run(commands::run::RunArgs {
            units,
            ticks,
            config,
            seed,
            format,
            pace_ms,
        }),
        Commands::Config { config } => commands::config::show(config.as_deref()),
    }
}
