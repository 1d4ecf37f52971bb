//! Display utilities and output formatting for the pivotbar CLI.

use anyhow::Result;
use clap::ValueEnum;
use pivotbar_lib::prelude::*;

/// Output format for converted candles.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
    Parquet,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
            Format::Ndjson => Self::Ndjson,
            Format::Parquet => Self::Parquet,
        }
    }
}

/// Timestamp unit of the input `date` column.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Unit {
    S,
    Ms,
    Us,
    Ns,
}

impl From<Unit> for TimestampUnit {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::S => Self::Seconds,
            Unit::Ms => Self::Milliseconds,
            Unit::Us => Self::Microseconds,
            Unit::Ns => Self::Nanoseconds,
        }
    }
}

/// Renders the pivot report of one converted file.
pub(crate) fn render_report(report: &ConvertReport, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string(report)?);
    }

    let mut out = format!(
        "{} -> {} ({} candles from {} ticks",
        report.input.display(),
        report.output.display(),
        report.stats.candles,
        report.stats.ticks_in_range
    );
    if report.stats.ticks_discarded > 0 {
        out.push_str(&format!(", {} outside the day", report.stats.ticks_discarded));
    }
    out.push(')');

    match &report.pivots {
        Some(p) => {
            let levels = [
                ("R3", p.r3),
                ("R2", p.r2),
                ("R1", p.r1),
                ("P ", p.pivot),
                ("S1", p.s1),
                ("S2", p.s2),
                ("S3", p.s3),
            ];
            for (name, value) in levels {
                out.push_str(&format!("\n  {name} = {value:.5}"));
            }
        }
        None => out.push_str("\n  no data for the day"),
    }

    Ok(out)
}
