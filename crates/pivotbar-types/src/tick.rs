//! Tick data representation.

use serde::{Deserialize, Serialize};

/// A single raw OHLCV record read from a day file.
///
/// The timestamp is kept in whatever unit the source stores; the aggregator
/// normalizes it to epoch seconds with a [`TimestampUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Timestamp in the source's native unit.
    pub timestamp: i64,
    /// Opening price.
    pub open: f32,
    /// Highest price.
    pub high: f32,
    /// Lowest price.
    pub low: f32,
    /// Closing price.
    pub close: f32,
    /// Traded volume.
    pub volume: i64,
}

impl Tick {
    /// Creates a new tick.
    #[must_use]
    pub const fn new(timestamp: i64, open: f32, high: f32, low: f32, close: f32, volume: i64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Unit of a raw tick timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampUnit {
    /// Seconds since the Unix epoch.
    Seconds,
    /// Milliseconds since the Unix epoch.
    Milliseconds,
    /// Microseconds since the Unix epoch.
    Microseconds,
    /// Nanoseconds since the Unix epoch.
    #[default]
    Nanoseconds,
}

impl TimestampUnit {
    /// Returns how many units make up one second.
    #[must_use]
    pub const fn per_second(&self) -> i64 {
        match self {
            Self::Seconds => 1,
            Self::Milliseconds => 1_000,
            Self::Microseconds => 1_000_000,
            Self::Nanoseconds => 1_000_000_000,
        }
    }

    /// Converts a raw timestamp in this unit to whole epoch seconds.
    ///
    /// Sub-second parts are floored, so instants before the epoch land in
    /// the second that contains them.
    #[must_use]
    pub const fn to_seconds(&self, raw: i64) -> i64 {
        raw.div_euclid(self.per_second())
    }

    /// Returns the unit as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Seconds => "s",
            Self::Milliseconds => "ms",
            Self::Microseconds => "us",
            Self::Nanoseconds => "ns",
        }
    }
}

impl std::fmt::Display for TimestampUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
