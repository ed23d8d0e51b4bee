//! `assetslim` - resize and recompress a directory of bundled PNG assets in
//! place, then print how much space was saved.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use assetslim_core::{Optimizer, OptimizerConfig, RunReport};
use clap::{ArgAction, Parser};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Android drawable folder, relative to the project root.
const DEFAULT_ASSET_DIR: &str = "app/src/main/res/drawable";

#[derive(Parser, Debug)]
#[command(
    name = "assetslim",
    version,
    about = "Resize and recompress bundled PNG assets in place"
)]
struct Cli {
    /// Directory holding the PNG assets.
    #[arg(default_value = DEFAULT_ASSET_DIR)]
    dir: PathBuf,
    /// Print the report as JSON instead of the summary line.
    #[arg(long, default_value_t = false, action = ArgAction::SetTrue)]
    json: bool,
    /// More log output (-v debug, -vv trace). Overrides RUST_LOG.
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize, Debug)]
struct JsonSummary<'a> {
    directory: &'a Path,
    config: &'a OptimizerConfig,
    #[serde(flatten)]
    report: &'a RunReport,
    savings_bytes: i64,
}

impl<'a> JsonSummary<'a> {
    fn new(directory: &'a Path, config: &'a OptimizerConfig, report: &'a RunReport) -> Self {
        Self {
            directory,
            config,
            report,
            savings_bytes: report.savings_bytes(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let optimizer =
        Optimizer::new(OptimizerConfig::default()).context("invalid built-in configuration")?;
    debug!(config = ?optimizer.config(), "using built-in configuration");
    let report = optimizer
        .run(&cli.dir)
        .with_context(|| format!("optimization of {} aborted", cli.dir.display()))?;

    if cli.json {
        let summary = JsonSummary::new(&cli.dir, optimizer.config(), &report);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

/// Log to stderr so stdout carries only the summary.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
