//! dirscan - recursive filesystem listing with loop-safe symlink traversal.
//!
//! Usage:
//!   dirscan [OPTIONS] PATH...     List every node under each PATH
//!   dirscan -d PATH               Follow directory links
//!   dirscan -f PATH               List direct children only
//!   dirscan --format json PATH    One JSON record per line
//!   dirscan --help                Show help

mod report;

use std::fs;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::thread;

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::EnvFilter;

use dirscan_scan::{DeviceBaseline, DirScanner, ScanConfig, ScanProgress, ScanSummary};

use crate::report::{JsonReporter, TextOptions, TextReporter};

#[derive(Parser)]
#[command(
    name = "dirscan",
    version,
    about = "Recursive filesystem listing",
    long_about = "dirscan lists every file, directory and link below the given paths,\n\
                  one node per line. Symbolic links are reported as links and only \
                  followed into directories with --deep, with loop detection."
)]
struct Cli {
    /// Paths to scan
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Follow symbolic links to directories
    #[arg(short, long)]
    deep: bool,

    /// Do not descend below the direct children of each path
    #[arg(short, long)]
    flat: bool,

    /// Stay on the device of the first path
    #[arg(short, long)]
    same_device: bool,

    /// Take the start device from each path instead of the first
    #[arg(long)]
    per_root_device: bool,

    /// Add access time columns
    #[arg(short, long)]
    access: bool,

    /// Add human-readable local times beside timestamps
    #[arg(short = 't', long)]
    htime: bool,

    /// Print a run description before the listing (text format only)
    #[arg(long)]
    header: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// TOML file with scan settings; command line flags are applied on top
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report scan progress on stderr
    #[arg(long)]
    progress: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.header && matches!(cli.format, OutputFormat::Json) {
        bail!("--header is only available with the text format");
    }

    let config = load_config(&cli)?;
    tracing::debug!(?config, roots = cli.paths.len(), "resolved scan settings");
    let scanner = DirScanner::new(config.clone());
    let progress = cli.progress.then(|| spawn_progress_printer(scanner.subscribe()));

    let summary = run_scan(&cli, &config, &scanner)?;

    // Closing the channel stops the progress printer.
    drop(scanner);
    if let Some(handle) = progress {
        join_progress_printer(handle);
        eprintln!(
            "{} nodes, {} errors in {:.2}s",
            summary.stats.nodes,
            summary.stats.error_count(),
            summary.duration.as_secs_f64()
        );
    }

    Ok(())
}

fn run_scan(cli: &Cli, config: &ScanConfig, scanner: &DirScanner) -> Result<ScanSummary> {
    let out = BufWriter::new(io::stdout().lock());
    let err = io::stderr().lock();

    let summary = match cli.format {
        OutputFormat::Text => {
            let options = TextOptions {
                access: cli.access,
                human_time: cli.htime,
            };
            let mut reporter = TextReporter::new(out, err, options);
            if cli.header {
                reporter
                    .write_header(&cli.paths, config)
                    .context("Failed to write header")?;
            }
            let summary = scanner.scan_roots(&cli.paths, &mut reporter);
            reporter.finish().context("Failed to write listing")?;
            summary
        }
        OutputFormat::Json => {
            let mut reporter = JsonReporter::new(out, err);
            let summary = scanner.scan_roots(&cli.paths, &mut reporter);
            reporter.finish().context("Failed to write listing")?;
            summary
        }
    };

    Ok(summary)
}

/// Settings from `--config` (if any) with command line flags switched on top.
fn load_config(cli: &Cli) -> Result<ScanConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Cannot read config file {}", path.display()))?;
            toml::from_str::<ScanConfig>(&text)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => ScanConfig::default(),
    };

    config.follow_symlinks |= cli.deep;
    config.flatten |= cli.flat;
    config.same_device |= cli.same_device;
    if cli.per_root_device {
        config.device_baseline = DeviceBaseline::PerRoot;
    }

    Ok(config)
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dirscan={level},dirscan_scan={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn spawn_progress_printer(mut rx: broadcast::Receiver<ScanProgress>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        loop {
            match rx.blocking_recv() {
                Ok(progress) => eprintln!(
                    "[{} nodes, {} dirs, {} errors, {:.0} nodes/s] {}",
                    progress.nodes_reported,
                    progress.dirs_scanned,
                    progress.errors_count,
                    progress.nodes_per_second(),
                    progress.current_path.display()
                ),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Wait for the progress printer. Returns false if it panicked.
fn join_progress_printer(handle: thread::JoinHandle<()>) -> bool {
    match handle.join() {
        Ok(()) => true,
        Err(_) => {
            tracing::warn!("progress printer panicked");
            false
        }
    }
}
