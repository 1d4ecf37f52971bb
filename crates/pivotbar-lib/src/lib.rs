//! Streaming tick-to-candle conversion with Fibonacci pivot levels.
//!
//! This is a facade crate that re-exports functionality from the pivotbar
//! workspace crates and adds the per-file converter that glues them together.
//!
//! # Quick Start
//!
//! ```no_run
//! use pivotbar_lib::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = ConvertOptions::new(DayRange::parse("2024-01-10")?);
//!     let report = convert_file(
//!         "data/BANKNIFTY.parquet".as_ref(),
//!         "5min_candles/BANKNIFTY.parquet".as_ref(),
//!         &options,
//!     )?;
//!
//!     if let Some(pivots) = report.pivots {
//!         println!("P = {:.5}", pivots.pivot);
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod convert;

pub use convert::{
    ConvertError, ConvertJob, ConvertOptions, ConvertReport, convert_file, list_inputs,
    output_path, plan_jobs,
};

// Re-export core types
pub use pivotbar_types::*;

// Re-export the tick source
pub use pivotbar_source::{
    COLUMNS, DEFAULT_BATCH_SIZE, SchemaSummary, SourceError, TickReader, describe_schema,
};

// Re-export aggregation
pub use pivotbar_aggregate::{
    AggregateStats, Candle, FIBONACCI_RATIOS, PivotAccumulator, PivotError, Pivots,
    WindowAggregator, aggregate,
};

// Re-export sinks
pub use pivotbar_format::{CandleSink, CsvSink, FormatError, JsonSink, JsonStyle, OutputFormat};

#[cfg(feature = "parquet")]
pub use pivotbar_format::ParquetSink;

/// Prelude module for convenient imports.
///
/// ```
/// use pivotbar_lib::prelude::*;
/// ```
pub mod prelude {
    pub use pivotbar_types::{DayRange, DayRangeError, Tick, Timeframe, TimestampUnit, Window};

    pub use pivotbar_source::{SourceError, TickReader};

    pub use pivotbar_aggregate::{
        AggregateStats, Candle, PivotAccumulator, PivotError, Pivots, WindowAggregator,
    };

    pub use pivotbar_format::{CandleSink, OutputFormat};

    pub use crate::convert::{
        ConvertError, ConvertJob, ConvertOptions, ConvertReport, convert_file, plan_jobs,
    };
}
