//! Streaming candle aggregation for pivotbar.
//!
//! This crate provides the single-pass engine that turns an ordered tick
//! stream into candles and the day's pivot levels:
//!
//! - [`Candle`] - OHLCV summary of one window
//! - [`WindowAggregator`] - Lazy tick-to-candle iterator adapter
//! - [`PivotAccumulator`] / [`Pivots`] - Fibonacci pivot levels for the day

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod candle;
mod pivot;

pub use aggregator::{AggregateStats, WindowAggregator, aggregate};
pub use candle::Candle;
pub use pivot::{FIBONACCI_RATIOS, PivotAccumulator, PivotError, Pivots};
