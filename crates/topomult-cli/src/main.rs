//! Directional topographic wind multipliers for an ascii-grid DEM.
//!
//! Writes `mh_<dir>.asc` and `mh_<dir>_smooth.asc` for each requested
//! direction. With `--workers N` the directions are shared round-robin
//! between N workers.
mod logging;

use std::path::PathBuf;

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, ValueEnum};
use topomult_core::schedule::run_parallel;
use topomult_core::{run, Direction, Identity, MultiplierModel, Neutral, RunConfig, SingleProcess};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "topomult", version, about = "Directional topographic multipliers from a DEM")]
struct Args {
    /// Input DEM in ascii-grid format.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory (created if absent).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Comma separated directions, e.g. `n,se,w`. Defaults to all eight.
    #[arg(short, long)]
    directions: Option<String>,

    /// Run configuration JSON; flags given on the command line take precedence.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of parallel workers.
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    /// Multiplier model applied to each sweep line.
    #[arg(short, long, value_enum, default_value_t = ModelKind::Neutral)]
    model: ModelKind,

    /// Log file, truncated on start.
    #[arg(long, default_value = "topomult.log")]
    log_file: PathBuf,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Do not mirror log output to the terminal.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModelKind {
    /// Every cell gets 1.0.
    Neutral,
    /// Multiplier equals elevation; for checking output orientation.
    Identity,
}

impl ModelKind {
    fn build(self) -> Box<dyn MultiplierModel> {
        match self {
            ModelKind::Neutral => Box::new(Neutral),
            ModelKind::Identity => Box::new(Identity),
        }
    }
}

const DEFAULT_INPUT: &str = "input/dem.asc";
const DEFAULT_OUTPUT: &str = "output";

/// Merge the optional JSON config with command-line overrides.
fn resolve_config(args: &Args) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_json_file(path)
            .with_context(|| format!("loading run configuration {}", path.display()))?,
        None => RunConfig::new(DEFAULT_INPUT, DEFAULT_OUTPUT),
    };
    if let Some(input) = &args.input {
        config.input = input.clone();
    }
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    if let Some(list) = &args.directions {
        config.directions = Direction::parse_list(list).context("parsing --directions")?;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    ensure!(args.workers >= 1, "--workers must be at least 1");

    let _log_guard = logging::init_logging(&args.log_file, &args.log_level, args.quiet)
        .with_context(|| format!("initialising logging to {}", args.log_file.display()))?;

    let config = resolve_config(&args)?;
    let model = args.model.build();
    info!(
        "topomult {}: {} -> {} ({} directions, {} workers, {:?} model)",
        env!("CARGO_PKG_VERSION"),
        config.input.display(),
        config.output_dir.display(),
        config.directions.len(),
        args.workers,
        args.model
    );

    let reports = if args.workers > 1 {
        run_parallel(args.workers, |member| run(&config, model.as_ref(), member))?
    } else {
        vec![run(&config, model.as_ref(), &SingleProcess)]
    };

    let mut written = 0usize;
    let mut failed = Vec::new();
    for report in reports {
        let report = report.with_context(|| format!("reading {}", config.input.display()))?;
        written += report.completed.len();
        for (direction, e) in report.failed {
            error!("direction {direction}: {e}");
            failed.push(direction.code());
        }
    }

    if !failed.is_empty() {
        bail!("failed directions: {}", failed.join(", "));
    }
    info!("wrote {} direction(s) to {}", written, config.output_dir.display());
    Ok(())
}
