//! Single-file conversion command.

use crate::AggregationArgs;
use crate::display::render_report;
use anyhow::{Context, Result};
use pivotbar_lib::output_path;
use pivotbar_lib::prelude::*;
use std::path::{Path, PathBuf};

/// Convert one tick file and print its pivot report.
pub(crate) fn convert_one(
    input: PathBuf,
    output: Option<PathBuf>,
    aggregation: &AggregationArgs,
) -> Result<()> {
    let options = aggregation.options()?;
    let output = output.unwrap_or_else(|| {
        output_path(&input, Path::new(crate::DEFAULT_OUTPUT_DIR), options.format, false)
    });

    let report = convert_file(&input, &output, &options)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    println!("{}", render_report(&report, aggregation.json)?);

    Ok(())
}
