//! Directory conversion command.
//!
//! Every file of the source directory is converted independently on the
//! blocking pool. Reports come back in file name order regardless of how
//! many conversions run at once.

use crate::AggregationArgs;
use crate::display::render_report;
use anyhow::{Context, Result, bail};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use pivotbar_lib::prelude::*;
use std::path::PathBuf;
use tracing::{error, warn};

/// Execute the convert command.
pub(crate) async fn convert(
    source_dir: PathBuf,
    output_dir: PathBuf,
    aggregation: &AggregationArgs,
    extension: bool,
    jobs: usize,
    fail_fast: bool,
    quiet: bool,
) -> Result<()> {
    let options = aggregation.options()?;

    let planned = plan_jobs(&source_dir, &output_dir, options.format, extension)
        .with_context(|| format!("Failed to list input files in {}", source_dir.display()))?;
    if planned.is_empty() {
        warn!(dir = %source_dir.display(), "no input files");
        return Ok(());
    }

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(planned.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:30.cyan/blue}] {pos}/{len} files {msg}")?
                .progress_chars("=>-"),
        );
        pb
    };

    let total = planned.len();
    let mut results = stream::iter(planned)
        .map(|job| {
            let input = job.input.clone();
            let task =
                tokio::task::spawn_blocking(move || convert_file(&job.input, &job.output, &options));
            async move {
                let outcome = match task.await {
                    Ok(result) => result.map_err(anyhow::Error::from),
                    Err(e) => Err(anyhow::Error::from(e).context("Conversion task failed")),
                };
                (input, outcome)
            }
        })
        .buffered(jobs.max(1));

    let mut converted = 0usize;
    let mut empty = 0usize;
    let mut failures: Vec<(PathBuf, anyhow::Error)> = Vec::new();

    while let Some((input, outcome)) = results.next().await {
        progress.inc(1);
        progress.set_message(
            input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );

        match outcome {
            Ok(report) => {
                if report.is_empty() {
                    empty += 1;
                } else {
                    converted += 1;
                }
                let rendered = render_report(&report, aggregation.json)?;
                progress.suspend(|| println!("{rendered}"));
            }
            Err(e) => {
                error!(input = %input.display(), "{e:#}");
                if fail_fast {
                    progress.abandon();
                    return Err(e.context(format!("Failed to convert {}", input.display())));
                }
                failures.push((input, e));
            }
        }
    }
    progress.finish_and_clear();

    if !quiet {
        eprintln!("\nConversion complete:");
        eprintln!("  Converted: {converted}");
        if empty > 0 {
            eprintln!("  No data: {empty}");
        }
        if !failures.is_empty() {
            eprintln!("  Failed: {}", failures.len());
            for (i, (input, err)) in failures.iter().enumerate() {
                eprintln!("    {}: {}: {err:#}", i + 1, input.display());
            }
        }
    }

    // Return error if any conversion failed
    if !failures.is_empty() {
        bail!("{} out of {} conversions failed", failures.len(), total);
    }

    Ok(())
}
