//! Batch-buffered Parquet tick reader.

use arrow::array::{Array, ArrowPrimitiveType, AsArray, PrimitiveArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float32Type, Int64Type, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ProjectionMask;
use parquet::arrow::arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder};
use pivotbar_types::{Tick, TimestampUnit};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::SourceError;

/// Columns read from every tick file, in output order.
pub const COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

/// Default number of rows decoded per record batch.
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Lazy, non-restartable tick iterator over a Parquet file.
///
/// Rows are decoded one record batch at a time, so memory stays bounded by
/// the batch size regardless of file length. The iterator yields `Ok(tick)`
/// per row, ends with `None` at a clean end of file, and yields a single
/// `Err` (then `None`) on a decode or validation failure.
pub struct TickReader {
    path: PathBuf,
    batches: ParquetRecordBatchReader,
    unit: TimestampUnit,
    total_rows: u64,
    rows_read: u64,
    current: Option<TickColumns>,
    row: usize,
    failed: bool,
}

impl TickReader {
    /// Opens a tick file with the default batch size.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, is not Parquet, or
    /// lacks a required column.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        Self::open_with_batch_size(path, DEFAULT_BATCH_SIZE)
    }

    /// Opens a tick file, decoding `batch_size` rows at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, is not Parquet, or
    /// lacks a required column.
    pub fn open_with_batch_size(
        path: impl AsRef<Path>,
        batch_size: usize,
    ) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| SourceError::Open {
            path: path.clone(),
            source,
        })?;

        let builder =
            ParquetRecordBatchReaderBuilder::try_new(file).map_err(|source| {
                SourceError::Parquet {
                    path: path.clone(),
                    source,
                }
            })?;

        let (unit, indices) = check_schema(&path, builder.schema())?;
        let mask = ProjectionMask::roots(builder.parquet_schema(), indices);
        let total_rows = u64::try_from(builder.metadata().file_metadata().num_rows()).unwrap_or(0);

        let batches = builder
            .with_projection(mask)
            .with_batch_size(batch_size.max(1))
            .build()
            .map_err(|source| SourceError::Parquet {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), rows = total_rows, %unit, "opened tick file");

        Ok(Self {
            path,
            batches,
            unit,
            total_rows,
            rows_read: 0,
            current: None,
            row: 0,
            failed: false,
        })
    }

    /// Overrides the timestamp unit inferred from the schema.
    ///
    /// Plain integer `date` columns carry no unit and are assumed to hold
    /// nanoseconds; use this when a file stores seconds or milliseconds.
    #[must_use]
    pub const fn with_unit(mut self, unit: TimestampUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Returns the file being read.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the unit of the raw `date` values.
    #[must_use]
    pub const fn unit(&self) -> TimestampUnit {
        self.unit
    }

    /// Returns the row count recorded in the file footer.
    #[must_use]
    pub const fn total_rows(&self) -> u64 {
        self.total_rows
    }

    /// Returns the number of rows decoded so far.
    #[must_use]
    pub const fn rows_read(&self) -> u64 {
        self.rows_read
    }

    fn load(&mut self, batch: &RecordBatch) -> Result<(), SourceError> {
        let columns = TickColumns::decode(batch, &self.path, self.rows_read)?;
        debug!(path = %self.path.display(), rows = columns.len(), "decoded record batch");
        self.rows_read += batch.num_rows() as u64;
        self.current = Some(columns);
        self.row = 0;
        Ok(())
    }
}

impl std::fmt::Debug for TickReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickReader")
            .field("path", &self.path)
            .field("unit", &self.unit)
            .field("total_rows", &self.total_rows)
            .field("rows_read", &self.rows_read)
            .finish_non_exhaustive()
    }
}

impl Iterator for TickReader {
    type Item = Result<Tick, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            if let Some(columns) = &self.current
                && self.row < columns.len()
            {
                let tick = columns.tick(self.row);
                self.row += 1;
                return Some(Ok(tick));
            }

            let loaded = match self.batches.next()? {
                Ok(batch) => self.load(&batch),
                Err(source) => Err(SourceError::Read {
                    path: self.path.clone(),
                    source,
                }),
            };

            if let Err(err) = loaded {
                self.failed = true;
                self.current = None;
                return Some(Err(err));
            }
        }
    }
}

impl std::iter::FusedIterator for TickReader {}

/// One decoded record batch, normalized to the tick column types.
#[derive(Debug)]
struct TickColumns {
    date: PrimitiveArray<Int64Type>,
    open: PrimitiveArray<Float32Type>,
    high: PrimitiveArray<Float32Type>,
    low: PrimitiveArray<Float32Type>,
    close: PrimitiveArray<Float32Type>,
    volume: PrimitiveArray<Int64Type>,
}

impl TickColumns {
    fn decode(batch: &RecordBatch, path: &Path, first_row: u64) -> Result<Self, SourceError> {
        Ok(Self {
            date: column(batch, path, "date", &DataType::Int64, first_row)?,
            open: column(batch, path, "open", &DataType::Float32, first_row)?,
            high: column(batch, path, "high", &DataType::Float32, first_row)?,
            low: column(batch, path, "low", &DataType::Float32, first_row)?,
            close: column(batch, path, "close", &DataType::Float32, first_row)?,
            volume: column(batch, path, "volume", &DataType::Int64, first_row)?,
        })
    }

    fn len(&self) -> usize {
        self.date.len()
    }

    fn tick(&self, row: usize) -> Tick {
        Tick::new(
            self.date.value(row),
            self.open.value(row),
            self.high.value(row),
            self.low.value(row),
            self.close.value(row),
            self.volume.value(row),
        )
    }
}

/// Extracts a column and casts it to the tick representation.
fn column<T: ArrowPrimitiveType>(
    batch: &RecordBatch,
    path: &Path,
    name: &'static str,
    target: &DataType,
    first_row: u64,
) -> Result<PrimitiveArray<T>, SourceError> {
    let array = batch
        .column_by_name(name)
        .ok_or_else(|| SourceError::MissingColumn {
            path: path.to_path_buf(),
            column: name,
        })?;

    let array = cast(array, target).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if array.null_count() > 0 {
        let row = (0..array.len()).find(|&i| array.is_null(i)).unwrap_or(0);
        return Err(SourceError::NullValue {
            path: path.to_path_buf(),
            column: name,
            row: first_row + row as u64,
        });
    }

    Ok(array.as_primitive::<T>().clone())
}

/// Validates column presence and types, returning the timestamp unit and
/// the root column indices to project.
fn check_schema(path: &Path, schema: &Schema) -> Result<(TimestampUnit, Vec<usize>), SourceError> {
    let mut unit = TimestampUnit::Nanoseconds;
    let mut indices = Vec::with_capacity(COLUMNS.len());

    for name in COLUMNS {
        let index = schema
            .index_of(name)
            .map_err(|_| SourceError::MissingColumn {
                path: path.to_path_buf(),
                column: name,
            })?;
        let data_type = schema.field(index).data_type();

        let supported = match (name, data_type) {
            ("date", DataType::Timestamp(time_unit, _)) => {
                unit = timestamp_unit(*time_unit);
                true
            }
            ("date", DataType::Int64) => true,
            ("volume", DataType::Int16 | DataType::Int32 | DataType::Int64 | DataType::UInt32) => {
                true
            }
            ("open" | "high" | "low" | "close", DataType::Float32 | DataType::Float64) => true,
            _ => false,
        };

        if !supported {
            return Err(SourceError::UnsupportedType {
                path: path.to_path_buf(),
                column: name,
                data_type: data_type.clone(),
            });
        }
        indices.push(index);
    }

    Ok((unit, indices))
}

const fn timestamp_unit(unit: TimeUnit) -> TimestampUnit {
    match unit {
        TimeUnit::Second => TimestampUnit::Seconds,
        TimeUnit::Millisecond => TimestampUnit::Milliseconds,
        TimeUnit::Microsecond => TimestampUnit::Microseconds,
        TimeUnit::Nanosecond => TimestampUnit::Nanoseconds,
    }
}
