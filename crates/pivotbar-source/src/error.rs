//! Error types for tick sources.

use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening or reading a tick file.
///
/// Every variant carries the offending file path.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The file could not be opened.
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        /// The input file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid Parquet or its metadata is corrupt.
    #[error("Invalid parquet file {}: {source}", path.display())]
    Parquet {
        /// The input file.
        path: PathBuf,
        /// The underlying Parquet error.
        #[source]
        source: ParquetError,
    },

    /// A record batch could not be decoded.
    #[error("Failed to read records from {}: {source}", path.display())]
    Read {
        /// The input file.
        path: PathBuf,
        /// The underlying Arrow error.
        #[source]
        source: ArrowError,
    },

    /// A required column is absent.
    #[error("Missing column '{column}' in {}", path.display())]
    MissingColumn {
        /// The input file.
        path: PathBuf,
        /// The missing column name.
        column: &'static str,
    },

    /// A column has a type that cannot be read as tick data.
    #[error("Unsupported type {data_type} for column '{column}' in {}", path.display())]
    UnsupportedType {
        /// The input file.
        path: PathBuf,
        /// The offending column name.
        column: &'static str,
        /// The column's Arrow type.
        data_type: DataType,
    },

    /// A required value is null.
    #[error("Null value in column '{column}' at row {row} of {}", path.display())]
    NullValue {
        /// The input file.
        path: PathBuf,
        /// The offending column name.
        column: &'static str,
        /// Zero-based row index within the file.
        row: u64,
    },
}
