//! Window definitions for grouping ticks into candles.

use std::num::NonZeroU32;

use crate::{Timeframe, WindowError};

/// Ticks per window in the default count-based mode.
pub const DEFAULT_WINDOW_TICKS: NonZeroU32 = match NonZeroU32::new(5) {
    Some(n) => n,
    None => unreachable!(),
};

/// How in-range ticks are grouped into candles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    /// Every `n` consecutive in-range ticks form one candle.
    ///
    /// Candles are not aligned to the clock; each takes the timestamp of its
    /// first tick.
    Ticks(NonZeroU32),
    /// Ticks are grouped by clock-aligned buckets of a fixed duration.
    Clock(Timeframe),
}

impl Window {
    /// Creates a count-based window.
    ///
    /// # Errors
    ///
    /// Returns an error if `n` is zero.
    pub fn ticks(n: u32) -> Result<Self, WindowError> {
        NonZeroU32::new(n).map(Self::Ticks).ok_or(WindowError::ZeroTicks)
    }

    /// Creates a clock-aligned window.
    #[must_use]
    pub const fn clock(timeframe: Timeframe) -> Self {
        Self::Clock(timeframe)
    }

}

impl Default for Window {
    fn default() -> Self {
        Self::Ticks(DEFAULT_WINDOW_TICKS)
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ticks(n) => write!(f, "{n} ticks"),
            Self::Clock(timeframe) => write!(f, "{timeframe} buckets"),
        }
    }
}
