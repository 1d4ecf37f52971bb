//! Parquet tick readers for the pivotbar candle converter.
//!
//! This crate turns a per-instrument, per-day Parquet file into a lazy
//! sequence of [`Tick`](pivotbar_types::Tick)s:
//!
//! - [`TickReader`] - Pull-based, batch-buffered tick iterator
//! - [`describe_schema`] - Human-readable schema of an input file
//! - [`SourceError`] - Open, decode and validation failures

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod reader;
mod schema;

pub use error::SourceError;
pub use reader::{COLUMNS, DEFAULT_BATCH_SIZE, TickReader};
pub use schema::{SchemaSummary, describe_schema};
