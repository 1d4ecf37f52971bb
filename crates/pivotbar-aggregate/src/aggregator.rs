//! Streaming tick-to-candle aggregation.

use std::num::NonZeroU32;

use pivotbar_types::{DayRange, Tick, Timeframe, TimestampUnit, Window};
use serde::{Deserialize, Serialize};

use crate::Candle;

/// Counters collected while aggregating one tick stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Ticks that fell inside the day range and were folded into candles.
    pub ticks_in_range: u64,
    /// Ticks consumed from the stream but outside the day range.
    pub ticks_discarded: u64,
    /// Candles emitted so far.
    pub candles: u64,
}

impl AggregateStats {
    /// Returns the total number of ticks consumed from the stream.
    #[must_use]
    pub const fn ticks_read(&self) -> u64 {
        self.ticks_in_range + self.ticks_discarded
    }
}

/// Lazy tick-to-candle aggregator.
///
/// Wraps a fallible tick iterator that is sorted by timestamp and yields one
/// [`Candle`] per non-empty window, in window order. Ticks whose normalized
/// timestamp falls outside the [`DayRange`] are consumed but never occupy a
/// window slot.
///
/// A trailing window that holds at least one tick when the stream ends is
/// emitted as a short candle. The first error from the tick stream is
/// yielded as-is and ends aggregation; the partially built window is dropped.
#[derive(Debug)]
pub struct WindowAggregator<I> {
    ticks: I,
    day: DayRange,
    window: Window,
    unit: TimestampUnit,
    current: Option<CandleBuilder>,
    stats: AggregateStats,
    done: bool,
}

impl<I> WindowAggregator<I> {
    /// Creates a new aggregator over `ticks`.
    #[must_use]
    pub const fn new(ticks: I, day: DayRange, window: Window, unit: TimestampUnit) -> Self {
        Self {
            ticks,
            day,
            window,
            unit,
            current: None,
            stats: AggregateStats {
                ticks_in_range: 0,
                ticks_discarded: 0,
                candles: 0,
            },
            done: false,
        }
    }

    /// Returns the day range ticks are filtered to.
    #[must_use]
    pub const fn day(&self) -> DayRange {
        self.day
    }

    /// Returns the window definition.
    #[must_use]
    pub const fn window(&self) -> Window {
        self.window
    }

    /// Returns the counters collected so far.
    #[must_use]
    pub const fn stats(&self) -> AggregateStats {
        self.stats
    }

    /// Folds one in-range tick, returning a candle if it completed a window.
    fn fold(&mut self, seconds: i64, tick: &Tick) -> Option<Candle> {
        match self.window {
            Window::Ticks(size) => self.fold_count(size, seconds, tick),
            Window::Clock(timeframe) => self.fold_clock(timeframe, seconds, tick),
        }
    }

    fn fold_count(&mut self, size: NonZeroU32, seconds: i64, tick: &Tick) -> Option<Candle> {
        let builder = match self.current.take() {
            Some(mut builder) => {
                builder.update(tick);
                builder
            }
            None => CandleBuilder::new(seconds, tick),
        };

        if builder.tick_count >= size.get() {
            Some(self.complete(builder))
        } else {
            self.current = Some(builder);
            None
        }
    }

    fn fold_clock(&mut self, timeframe: Timeframe, seconds: i64, tick: &Tick) -> Option<Candle> {
        let bucket = timeframe.bucket_start(seconds);

        match self.current.take() {
            Some(mut builder) if builder.timestamp == bucket => {
                builder.update(tick);
                self.current = Some(builder);
                None
            }
            Some(builder) => {
                // Bucket boundary crossed, finish the old one
                self.current = Some(CandleBuilder::new(bucket, tick));
                Some(self.complete(builder))
            }
            None => {
                self.current = Some(CandleBuilder::new(bucket, tick));
                None
            }
        }
    }

    fn complete(&mut self, builder: CandleBuilder) -> Candle {
        self.stats.candles += 1;
        builder.finish()
    }
}

impl<I, E> Iterator for WindowAggregator<I>
where
    I: Iterator<Item = Result<Tick, E>>,
{
    type Item = Result<Candle, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let tick = match self.ticks.next() {
                Some(Ok(tick)) => tick,
                Some(Err(err)) => {
                    self.done = true;
                    self.current = None;
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    return self
                        .current
                        .take()
                        .map(|builder| Ok(self.complete(builder)));
                }
            };

            let seconds = self.unit.to_seconds(tick.timestamp);
            if !self.day.contains(seconds) {
                self.stats.ticks_discarded += 1;
                continue;
            }
            self.stats.ticks_in_range += 1;

            if let Some(candle) = self.fold(seconds, &tick) {
                return Some(Ok(candle));
            }
        }
    }
}

impl<I, E> std::iter::FusedIterator for WindowAggregator<I> where
    I: Iterator<Item = Result<Tick, E>>
{
}

/// Creates a [`WindowAggregator`] over any fallible tick sequence.
pub fn aggregate<T, E>(
    ticks: T,
    day: DayRange,
    window: Window,
    unit: TimestampUnit,
) -> WindowAggregator<T::IntoIter>
where
    T: IntoIterator<Item = Result<Tick, E>>,
{
    WindowAggregator::new(ticks.into_iter(), day, window, unit)
}

/// Working candle for the window being filled.
#[derive(Debug)]
struct CandleBuilder {
    timestamp: i64,
    open: f32,
    high: f32,
    low: f32,
    close: f32,
    volume: i64,
    tick_count: u32,
}

impl CandleBuilder {
    /// Starts a window from its first tick.
    const fn new(timestamp: i64, tick: &Tick) -> Self {
        Self {
            timestamp,
            open: tick.open,
            high: tick.high,
            low: tick.low,
            close: tick.close,
            volume: tick.volume,
            tick_count: 1,
        }
    }

    fn update(&mut self, tick: &Tick) {
        self.high = self.high.max(tick.high);
        self.low = self.low.min(tick.low);
        self.close = tick.close;
        self.volume += tick.volume;
        self.tick_count += 1;
    }

    const fn finish(self) -> Candle {
        Candle::new(
            self.timestamp,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.tick_count,
        )
    }
}
