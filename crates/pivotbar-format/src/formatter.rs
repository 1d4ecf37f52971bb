//! Output sink abstraction.

use pivotbar_aggregate::Candle;
use std::io::Write;
use thiserror::Error;

use crate::{CsvSink, JsonSink};

/// Output format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// CSV format.
    #[default]
    Csv,
    /// JSON array format.
    Json,
    /// Newline-delimited JSON format.
    Ndjson,
    /// Apache Parquet format.
    Parquet,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Json, Self::Ndjson, Self::Parquet]
    }

    /// Opens a sink of this format over `writer`.
    ///
    /// `include_header` only affects CSV output.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot be initialized, or if Parquet
    /// support was not compiled in.
    pub fn open<W: Write + Send + 'static>(
        self,
        writer: W,
        include_header: bool,
    ) -> Result<Box<dyn CandleSink>, FormatError> {
        let sink: Box<dyn CandleSink> = match self {
            Self::Csv => Box::new(CsvSink::new(writer).with_header(include_header)),
            Self::Json => Box::new(JsonSink::new(writer)),
            Self::Ndjson => Box::new(JsonSink::ndjson(writer)),
            Self::Parquet => {
                #[cfg(feature = "parquet")]
                {
                    Box::new(crate::ParquetSink::new(writer)?)
                }
                #[cfg(not(feature = "parquet"))]
                {
                    drop(writer);
                    return Err(FormatError::Parquet(
                        "Parquet support not compiled in".to_string(),
                    ));
                }
            }
        };
        Ok(sink)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "parquet" | "pq" => Ok(Self::Parquet),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur while writing candles.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown output format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow/Parquet error.
    #[error("Parquet error: {0}")]
    Parquet(String),

    /// A candle was written after the sink was finished.
    #[error("Sink already finished")]
    Finished,
}

/// Destination for emitted candles.
///
/// Candles arrive one at a time in emission order; [`finish`](Self::finish)
/// writes any trailer and flushes the underlying writer.
pub trait CandleSink {
    /// Appends one candle.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_candle(&mut self, candle: &Candle) -> Result<(), FormatError>;

    /// Completes the output and flushes the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or flushing fails.
    fn finish(&mut self) -> Result<(), FormatError>;

    /// Returns the number of candles written so far.
    fn rows_written(&self) -> u64;
}
