//! Schema inspection command.

use anyhow::{Context, Result};
use pivotbar_lib::describe_schema;
use std::path::Path;

/// Print the Parquet schema and row counts of a file.
pub(crate) fn show_schema(input: &Path) -> Result<()> {
    let summary = describe_schema(input)
        .with_context(|| format!("Failed to inspect {}", input.display()))?;

    println!("{summary}");

    Ok(())
}
