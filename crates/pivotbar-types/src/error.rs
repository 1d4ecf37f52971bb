//! Error types for pivotbar core types.

use thiserror::Error;

/// Error for invalid day ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DayRangeError {
    /// The date string is not a `YYYY-MM-DD` calendar date.
    #[error("Invalid date '{input}': {source}")]
    InvalidDate {
        /// The rejected input.
        input: String,
        /// The underlying parse failure.
        #[source]
        source: chrono::ParseError,
    },
}

/// Error for invalid aggregation windows.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowError {
    /// A tick-count window must hold at least one tick.
    #[error("Window size must be at least 1 tick")]
    ZeroTicks,
}
