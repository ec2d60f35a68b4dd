//! # Laser Control
//!
//! Runs a laser job through the power ring and the fan-coupled actuator on
//! simulated outputs.
//!
//! Loads the controller TOML and the job TOML, feeds every line through the
//! commit protocol while step ticks consume the claimed power values, then
//! shuts the laser down and reports the run statistics.

use clap::Parser;
use laser_common::consts::DEFAULT_CONFIG_PATH;
use laser_common::prelude::{LogLevel, POWER_BUFFER_LEN};
use laser_control::config::{LoadedConfig, load_config};
use laser_control::cycle::JobRunner;
use laser_control::output::SimulatedOutputs;
use laser_control::ring::PowerRing;
use std::path::PathBuf;
use std::process;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Laser Control: power ring and laser actuator job runner
#[derive(Parser, Debug)]
#[command(name = "laser_control")]
#[command(version)]
#[command(about = "Run a laser job through the power ring on simulated outputs")]
struct Args {
    /// Path to the controller configuration TOML.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Path to the job TOML.
    #[arg(long, default_value = "config/job.toml")]
    job: PathBuf,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let loaded = load_config(&args.config, &args.job);

    let level = loaded
        .as_ref()
        .map(|l| l.config.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, level);

    info!("Laser Control v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = loaded
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(run);
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Laser Control shutdown complete");
}

fn run(loaded: LoadedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let LoadedConfig { config, job } = loaded;
    info!(
        service = %config.shared.service_name,
        slots = POWER_BUFFER_LEN,
        fan_on_duty = config.laser.fan_on_duty,
        steps_per_tick = config.runner.steps_per_tick,
        "Config OK"
    );

    let mut ring = PowerRing::<POWER_BUFFER_LEN>::new();
    let mut runner = JobRunner::new(&mut ring, SimulatedOutputs::new(), &config)?;

    let outcome = runner.run(&job);
    runner.shutdown();
    let stats = outcome?;

    let p = &stats.pipeline;
    info!(
        lines = p.lines,
        queued = p.queued,
        rolled_back = p.rolled_back,
        rejected = p.rejected,
        moves = stats.moves_completed,
        steps = stats.steps,
        skipped = stats.samples_skipped,
        ticks = stats.ticks,
        fan_on_ticks = stats.fan_on_ticks,
        max_live_samples = stats.max_live_samples,
        "job complete"
    );
    if p.samples_dropped > 0 {
        warn!(
            dropped = p.samples_dropped,
            "laser power values were dropped on a full ring"
        );
    }
    if p.stale_rollbacks > 0 {
        warn!(count = p.stale_rollbacks, "out-of-order rollbacks refused");
    }

    Ok(())
}

/// Setup tracing subscriber from CLI arguments and the configured level.
fn setup_tracing(args: &Args, level: LogLevel) {
    let filter = if args.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_directive()))
    };

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
