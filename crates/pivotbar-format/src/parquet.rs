//! Apache Parquet output format.

use arrow::array::{Float32Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use pivotbar_aggregate::Candle;
use std::io::Write;
use std::sync::Arc;

use crate::{CandleSink, FormatError};

const DEFAULT_ROW_GROUP_SIZE: usize = 100_000;

/// Streaming Parquet sink.
///
/// Candles are buffered and written one row group at a time. The column
/// layout mirrors the tick input (`date`, `open`, `high`, `low`, `close`,
/// `volume`), so converted output can be read back as input.
pub struct ParquetSink<W: Write + Send> {
    writer: Option<ArrowWriter<W>>,
    schema: SchemaRef,
    buffer: Vec<Candle>,
    /// Row group size (number of rows per group).
    row_group_size: usize,
    rows: u64,
}

impl<W: Write + Send> std::fmt::Debug for ParquetSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParquetSink")
            .field("buffered", &self.buffer.len())
            .field("row_group_size", &self.row_group_size)
            .field("rows", &self.rows)
            .field("finished", &self.writer.is_none())
            .finish_non_exhaustive()
    }
}

impl<W: Write + Send> ParquetSink<W> {
    /// Creates a new Parquet sink with Snappy compression.
    ///
    /// # Errors
    ///
    /// Returns an error if the Parquet writer cannot be created.
    pub fn new(writer: W) -> Result<Self, FormatError> {
        Self::with_row_group_size(writer, DEFAULT_ROW_GROUP_SIZE)
    }

    /// Creates a new Parquet sink with the given row group size.
    ///
    /// # Errors
    ///
    /// Returns an error if the Parquet writer cannot be created.
    pub fn with_row_group_size(writer: W, row_group_size: usize) -> Result<Self, FormatError> {
        let row_group_size = row_group_size.max(1);
        let schema = Arc::new(Self::candle_schema());
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .set_max_row_group_size(row_group_size)
            .build();

        let writer = ArrowWriter::try_new(writer, Arc::clone(&schema), Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(Self {
            writer: Some(writer),
            schema,
            buffer: Vec::with_capacity(row_group_size.min(DEFAULT_ROW_GROUP_SIZE)),
            row_group_size,
            rows: 0,
        })
    }

    /// Returns the Arrow schema of the written file.
    #[must_use]
    pub fn candle_schema() -> Schema {
        Schema::new(vec![
            Field::new("date", DataType::Int64, false),
            Field::new("open", DataType::Float32, false),
            Field::new("high", DataType::Float32, false),
            Field::new("low", DataType::Float32, false),
            Field::new("close", DataType::Float32, false),
            Field::new("volume", DataType::Int64, false),
        ])
    }

    fn candles_to_batch(&self) -> Result<RecordBatch, FormatError> {
        let dates: Vec<_> = self.buffer.iter().map(|c| c.timestamp).collect();
        let opens: Vec<_> = self.buffer.iter().map(|c| c.open).collect();
        let highs: Vec<_> = self.buffer.iter().map(|c| c.high).collect();
        let lows: Vec<_> = self.buffer.iter().map(|c| c.low).collect();
        let closes: Vec<_> = self.buffer.iter().map(|c| c.close).collect();
        let volumes: Vec<_> = self.buffer.iter().map(|c| c.volume).collect();

        RecordBatch::try_new(
            Arc::clone(&self.schema),
            vec![
                Arc::new(Int64Array::from(dates)),
                Arc::new(Float32Array::from(opens)),
                Arc::new(Float32Array::from(highs)),
                Arc::new(Float32Array::from(lows)),
                Arc::new(Float32Array::from(closes)),
                Arc::new(Int64Array::from(volumes)),
            ],
        )
        .map_err(|e| FormatError::Parquet(e.to_string()))
    }

    fn flush_buffer(&mut self) -> Result<(), FormatError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let batch = self.candles_to_batch()?;
        let writer = self.writer.as_mut().ok_or(FormatError::Finished)?;
        writer
            .write(&batch)
            .map_err(|e| FormatError::Parquet(e.to_string()))?;
        self.buffer.clear();
        Ok(())
    }
}

impl<W: Write + Send> CandleSink for ParquetSink<W> {
    fn write_candle(&mut self, candle: &Candle) -> Result<(), FormatError> {
        if self.writer.is_none() {
            return Err(FormatError::Finished);
        }
        self.buffer.push(*candle);
        self.rows += 1;
        if self.buffer.len() >= self.row_group_size {
            self.flush_buffer()?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), FormatError> {
        if self.writer.is_none() {
            return Ok(());
        }
        self.flush_buffer()?;
        if let Some(writer) = self.writer.take() {
            writer
                .close()
                .map_err(|e| FormatError::Parquet(e.to_string()))?;
        }
        Ok(())
    }

    fn rows_written(&self) -> u64 {
        self.rows
    }
}
