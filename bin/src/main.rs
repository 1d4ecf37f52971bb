//! pivotbar CLI - Parquet tick files to candles and Fibonacci pivot levels.

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use pivotbar_lib::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::{Format, Unit};

/// Default destination directory for converted files.
const DEFAULT_OUTPUT_DIR: &str = "5min_candles";

#[derive(Parser)]
#[command(name = "pivotbar")]
#[command(about = "Convert Parquet tick files into candles and pivot levels", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every file of a directory
    Convert {
        /// Directory holding one Parquet tick file per instrument
        source_dir: PathBuf,

        /// Output directory. Files keep their input name
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,

        /// Replace the input extension with the output format's
        #[arg(long)]
        extension: bool,

        /// Maximum concurrent file conversions
        #[arg(short, long, default_value = "1")]
        jobs: usize,

        /// Stop at the first file that fails
        #[arg(long)]
        fail_fast: bool,

        #[command(flatten)]
        aggregation: AggregationArgs,
    },

    /// Convert a single file
    File {
        /// Parquet tick file
        input: PathBuf,

        /// Output file path. Defaults to <output-dir>/<input file name>
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        aggregation: AggregationArgs,
    },

    /// Print the Parquet schema of a tick file
    Schema {
        /// Parquet file to inspect
        input: PathBuf,
    },
}

/// Options shared by the converting commands.
#[derive(Args, Clone)]
struct AggregationArgs {
    /// Trading day to keep (YYYY-MM-DD)
    #[arg(short, long)]
    date: String,

    /// In-range ticks per candle
    #[arg(long, default_value = "5", conflicts_with = "timeframe")]
    window_ticks: u32,

    /// Clock-aligned bucket instead of tick counts (s1, m1, m5, m15, m30, h1, h4, d1)
    #[arg(short, long)]
    timeframe: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: Format,

    /// Write a header row (CSV only)
    #[arg(long)]
    header: bool,

    /// Offset of the trading day's local midnight from UTC, in minutes
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    utc_offset_minutes: i32,

    /// Timestamp unit of the `date` column (inferred from the schema by default)
    #[arg(long, value_enum)]
    unit: Option<Unit>,

    /// Print the pivot report as JSON
    #[arg(long)]
    json: bool,
}

impl AggregationArgs {
    /// Builds conversion options from the command line.
    fn options(&self) -> Result<ConvertOptions> {
        let offset = self
            .utc_offset_minutes
            .checked_mul(60)
            .context("UTC offset out of range")?;
        let day = DayRange::parse_with_offset(&self.date, offset)
            .with_context(|| format!("Invalid date: {}", self.date))?;

        let window = match &self.timeframe {
            Some(tf) => {
                let timeframe = tf
                    .parse::<Timeframe>()
                    .map_err(|e| anyhow::anyhow!("{e}"))?;
                Window::clock(timeframe)
            }
            None => Window::ticks(self.window_ticks)?,
        };

        let mut options = ConvertOptions::new(day)
            .with_window(window)
            .with_format(self.format.into())
            .with_header(self.header);
        if let Some(unit) = self.unit {
            options = options.with_unit(unit.into());
        }

        Ok(options)
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Convert {
            source_dir,
            output_dir,
            extension,
            jobs,
            fail_fast,
            aggregation,
        } => {
            commands::convert::convert(
                source_dir,
                output_dir,
                &aggregation,
                extension,
                jobs,
                fail_fast,
                cli.quiet,
            )
            .await
        }
        Commands::File {
            input,
            output,
            aggregation,
        } => commands::file::convert_one(input, output, &aggregation),
        Commands::Schema { input } => commands::schema::show_schema(&input),
    }
}
