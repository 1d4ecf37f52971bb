//! Fibonacci pivot levels.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Candle;

/// Fibonacci ratios applied to the day's range for levels 1, 2 and 3.
pub const FIBONACCI_RATIOS: [f64; 3] = [0.382, 0.618, 1.0];

/// Errors that can occur when deriving pivot levels.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotError {
    /// No candle was produced for the day, so high, low and close are undefined.
    #[error("No candles were produced for the day; pivot levels are undefined")]
    NoCandles,
}

/// Support and resistance levels for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pivots {
    /// Central pivot, the mean of high, low and close.
    pub pivot: f64,
    /// First resistance.
    pub r1: f64,
    /// Second resistance.
    pub r2: f64,
    /// Third resistance.
    pub r3: f64,
    /// First support.
    pub s1: f64,
    /// Second support.
    pub s2: f64,
    /// Third support.
    pub s3: f64,
}

impl Pivots {
    /// Computes Fibonacci pivot levels from a day's high, low and close.
    #[must_use]
    pub fn compute(high: f64, low: f64, close: f64) -> Self {
        let pivot = (high + low + close) / 3.0;
        let range = high - low;
        let [first, second, third] = FIBONACCI_RATIOS.map(|ratio| ratio * range);

        Self {
            pivot,
            r1: pivot + first,
            r2: pivot + second,
            r3: pivot + third,
            s1: pivot - first,
            s2: pivot - second,
            s3: pivot - third,
        }
    }
}

/// Folds day extremes from a candle stream as it is emitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PivotAccumulator {
    day: Option<DayExtremes>,
    candles: u64,
}

#[derive(Debug, Clone, Copy)]
struct DayExtremes {
    high: f32,
    low: f32,
    close: f32,
}

impl PivotAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            day: None,
            candles: 0,
        }
    }

    /// Folds one emitted candle into the day's high, low and close.
    pub fn observe(&mut self, candle: &Candle) {
        self.candles += 1;
        self.day = Some(match self.day {
            Some(day) => DayExtremes {
                high: day.high.max(candle.high),
                low: day.low.min(candle.low),
                close: candle.close,
            },
            None => DayExtremes {
                high: candle.high,
                low: candle.low,
                close: candle.close,
            },
        });
    }

    /// Returns the number of candles observed.
    #[must_use]
    pub const fn candles(&self) -> u64 {
        self.candles
    }

    /// Computes the pivot levels for everything observed so far.
    ///
    /// # Errors
    ///
    /// Returns [`PivotError::NoCandles`] if no candle was observed.
    pub fn finish(&self) -> Result<Pivots, PivotError> {
        let day = self.day.ok_or(PivotError::NoCandles)?;
        Ok(Pivots::compute(
            f64::from(day.high),
            f64::from(day.low),
            f64::from(day.close),
        ))
    }
}
