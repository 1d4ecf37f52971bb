//! Candle output sinks for the pivotbar candle converter.
//!
//! Sinks accept candles one at a time as the aggregator emits them:
//!
//! - [`CsvSink`] - Header-less CSV rows (`date,open,high,low,close,volume`)
//! - [`JsonSink`] - JSON array or NDJSON
//! - [`ParquetSink`] - Apache Parquet columnar format

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;

#[cfg(feature = "parquet")]
mod parquet;

pub use crate::csv::CsvSink;
pub use formatter::{CandleSink, FormatError, OutputFormat};
pub use json::{JsonSink, JsonStyle};

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetSink;
