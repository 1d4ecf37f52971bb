//! Core types for the pivotbar candle converter.
//!
//! This crate provides the fundamental data structures used throughout pivotbar:
//!
//! - [`Tick`] - A raw OHLCV record with a timestamp in the source's native unit
//! - [`TimestampUnit`] - Unit of a raw tick timestamp
//! - [`DayRange`] - Half-open epoch-second interval covering one trading day
//! - [`Timeframe`] - Clock-aligned bucket duration
//! - [`Window`] - How ticks are grouped into candles

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod day_range;
mod error;
mod tick;
mod timeframe;
mod window;

pub use day_range::{DayRange, SECONDS_PER_DAY};
pub use error::{DayRangeError, WindowError};
pub use tick::{Tick, TimestampUnit};
pub use timeframe::{Timeframe, TimeframeParseError};
pub use window::{DEFAULT_WINDOW_TICKS, Window};
