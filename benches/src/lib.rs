//! Benchmark utilities for pivotbar.

use arrow::array::{ArrayRef, Float32Array, Int32Array, Int64Array};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::errors::ParquetError;
use pivotbar_lib::Tick;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// 2024-01-10T03:45:00Z, the 09:15 IST market open.
pub const SESSION_OPEN: i64 = 1_704_858_300;

/// Generates `count` one-second ticks from [`SESSION_OPEN`], in seconds.
///
/// Prices follow a deterministic zig-zag so windows have distinct extremes.
pub fn synthetic_ticks(count: usize) -> Vec<Tick> {
    (0..count)
        .map(|i| {
            let step = (i % 17) as f32 * 0.05 - 0.4;
            let base = 46_000.0 + (i % 1_000) as f32 * 0.25;
            let open = base + step;
            let close = base - step;
            Tick::new(
                SESSION_OPEN + i as i64,
                open,
                open.max(close) + 0.5,
                open.min(close) - 0.5,
                close,
                (i % 50) as i64 * 15,
            )
        })
        .collect()
}

/// Error writing a benchmark fixture.
#[derive(Error, Debug)]
pub enum FixtureError {
    /// Building the record batch failed.
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),
    /// Writing the Parquet file failed.
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),
    /// Creating the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes ticks to a Parquet file with nanosecond `date` and Int32 `volume`,
/// the layout of the production tick files.
pub fn write_tick_file(path: &Path, ticks: &[Tick]) -> Result<(), FixtureError> {
    let prices = |f: fn(&Tick) -> f32| -> ArrayRef {
        Arc::new(Float32Array::from(ticks.iter().map(f).collect::<Vec<_>>()))
    };
    let batch = RecordBatch::try_from_iter(vec![
        (
            "date",
            Arc::new(Int64Array::from(
                ticks
                    .iter()
                    .map(|t| t.timestamp * 1_000_000_000)
                    .collect::<Vec<_>>(),
            )) as ArrayRef,
        ),
        ("open", prices(|t| t.open)),
        ("high", prices(|t| t.high)),
        ("low", prices(|t| t.low)),
        ("close", prices(|t| t.close)),
        (
            "volume",
            Arc::new(Int32Array::from(
                ticks.iter().map(|t| t.volume as i32).collect::<Vec<_>>(),
            )),
        ),
    ])?;

    let mut writer = ArrowWriter::try_new(File::create(path)?, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}
