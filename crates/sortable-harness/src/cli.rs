use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use sortable_core::{ItemId, ListAxis, SortableConfig};

use crate::error::{HarnessError, Result};
use crate::layout::StackLayout;
use crate::logging;
use crate::replay::{ReplayReport, replay};
use crate::trace::TraceReader;

#[derive(Debug, Parser)]
#[command(
    name = "sortable-harness",
    about = "Replay recorded drag traces against the sortable list engine",
    version
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a JSONL trace (optionally gzip-compressed) and report the result.
    Replay(ReplayArgs),

    /// Load and validate a list config file.
    #[command(name = "check-config")]
    CheckConfig {
        /// TOML or JSON config file.
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Trace file to replay.
    pub trace: PathBuf,

    /// List config (TOML or JSON). Defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Slot size along the list axis, in pixels.
    #[arg(long, default_value_t = 40.0)]
    pub row_height: f32,

    /// Slot size across the list axis, in pixels.
    #[arg(long, default_value_t = 200.0)]
    pub width: f32,

    /// Print the report as JSON instead of a summary.
    #[arg(long)]
    pub json: bool,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_json);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Replay(args) => {
            let json = args.json;
            let report = run_replay(&args)?;
            print_report(&report, json)
        }
        Commands::CheckConfig { file } => {
            let config = load_config(&file)?;
            println!("{}: ok", file.display());
            tracing::debug!(?config, "config validated");
            Ok(())
        }
    }
}

/// Load the trace and config named by `args` and replay it.
pub fn run_replay(args: &ReplayArgs) -> Result<ReplayReport> {
    for (name, value) in [("row-height", args.row_height), ("width", args.width)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(HarnessError::invalid(format!(
                "--{name} must be a positive number, got {value}"
            )));
        }
    }
    require_path(&args.trace)?;

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SortableConfig::default(),
    };
    let layout = match config.keyboard.axis {
        ListAxis::Vertical => StackLayout::vertical(args.row_height, args.width),
        ListAxis::Horizontal => StackLayout::horizontal(args.row_height, args.width),
    };
    let trace = TraceReader::open(&args.trace)?;
    replay(&trace, config, &layout)
}

fn load_config(path: &Path) -> Result<SortableConfig> {
    require_path(path)?;
    Ok(SortableConfig::load(path)?)
}

fn require_path(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(HarnessError::MissingPath {
            path: path.to_path_buf(),
        })
    }
}

fn print_report(report: &ReplayReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    let join = |ids: &[ItemId]| {
        ids.iter().map(ItemId::as_str).collect::<Vec<_>>().join(",")
    };
    println!("session: {}", report.session_name);
    println!("events: {} ({} ignored)", report.events, report.ignored);
    for (n, commit) in report.commits.iter().enumerate() {
        println!("commit {}: {}", n + 1, join(commit.as_slice()));
    }
    println!("unchanged drops: {}", report.unchanged_drops);
    println!("final order: {}", join(report.final_order.as_slice()));
    Ok(())
}
