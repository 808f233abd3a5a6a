//! shotdiff - screenshot comparison CLI
//!
//! Compares freshly captured snapshots against their stored baselines.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use shotdiff_ops::CropSize;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "shotdiff")]
#[command(author, version, about = "Screenshot comparison CLI")]
#[command(long_about = "
Compares a candidate snapshot against its baseline under configurable
tolerances. By default the baseline of `view.png` is `view.png~`; when the
two differ, annotated copies `view_0.png~` and `view_1.png~` are written
with the difference outlined in red.

Examples:
  shotdiff compare shots/home.png                   # Exact comparison
  shotdiff compare shots/home.png --color-distance 5 --area-size 20
  shotdiff compare new.png --baseline old.png --shift-distance 1
  shotdiff batch 'shots/**/*.png' --config tolerance.yaml -j 8
  shotdiff metrics shots/home.png --shift-distance 3
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare one snapshot against its baseline
    #[command(visible_alias = "c")]
    Compare(CompareArgs),

    /// Compare every snapshot matching a glob pattern
    Batch(BatchArgs),

    /// Print color and shift distances without touching any file
    #[command(visible_alias = "m")]
    Metrics(MetricsArgs),
}

/// Tolerance flags shared by all commands.
#[derive(Args, Clone, Default)]
struct ToleranceArgs {
    /// YAML tolerance file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Largest RGBA distance still counted as the same color
    #[arg(long)]
    color_distance: Option<f64>,

    /// Radius searched for a displaced pixel
    #[arg(long)]
    shift_distance: Option<u32>,

    /// Largest difference area (pixels) still counted as equal
    #[arg(long)]
    area_size: Option<u64>,

    /// Compare only the top-left WIDTHxHEIGHT region
    #[arg(long, value_name = "WxH", value_parser = parse_crop)]
    crop: Option<CropSize>,

    /// Measure the difference box with a full scan
    #[arg(long)]
    exhaustive: bool,
}

#[derive(Args)]
struct CompareArgs {
    /// Candidate (newly captured) image
    candidate: PathBuf,

    /// Baseline image (default: candidate path with `~` appended)
    #[arg(short, long)]
    baseline: Option<PathBuf>,

    /// Exit successfully even if the images differ
    #[arg(long)]
    no_fail: bool,

    #[command(flatten)]
    tolerance: ToleranceArgs,
}

#[derive(Args)]
struct BatchArgs {
    /// Candidate pattern (glob)
    pattern: String,

    /// Exit successfully even if some images differ
    #[arg(long)]
    no_fail: bool,

    #[command(flatten)]
    tolerance: ToleranceArgs,
}

#[derive(Args)]
struct MetricsArgs {
    /// Candidate (newly captured) image
    candidate: PathBuf,

    /// Baseline image (default: candidate path with `~` appended)
    #[arg(short, long)]
    baseline: Option<PathBuf>,

    #[command(flatten)]
    tolerance: ToleranceArgs,
}

fn parse_crop(s: &str) -> Result<CropSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let width = w.trim().parse().map_err(|e| format!("bad crop width '{}': {}", w, e))?;
    let height = h.trim().parse().map_err(|e| format!("bad crop height '{}': {}", h, e))?;
    Ok(CropSize::new(width, height))
}

/// Installs the global subscriber. `RUST_LOG` wins over `--verbose`.
///
/// The returned guard flushes the log file on drop.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Compare(args) => commands::compare::run(args, cli.verbose),
        Commands::Batch(args) => commands::batch::run(args, cli.verbose),
        Commands::Metrics(args) => commands::metrics::run(args, cli.verbose),
    }
}
