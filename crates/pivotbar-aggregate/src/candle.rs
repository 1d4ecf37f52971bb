//! Aggregate candle data structure.

use serde::{Deserialize, Serialize};

/// OHLCV summary of one aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Window start, in epoch seconds.
    #[serde(rename = "date")]
    pub timestamp: i64,
    /// Opening price (first tick's open).
    pub open: f32,
    /// Highest price during the window.
    pub high: f32,
    /// Lowest price during the window.
    pub low: f32,
    /// Closing price (last tick's close).
    pub close: f32,
    /// Total traded volume.
    pub volume: i64,
    /// Number of ticks folded into the candle.
    pub tick_count: u32,
}

impl Candle {
    /// Creates a new candle.
    #[must_use]
    pub const fn new(
        timestamp: i64,
        open: f32,
        high: f32,
        low: f32,
        close: f32,
        volume: i64,
        tick_count: u32,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            tick_count,
        }
    }
}
