//! JSON output format.

use pivotbar_aggregate::Candle;
use std::io::Write;

use crate::{CandleSink, FormatError};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// Streaming JSON sink.
#[derive(Debug)]
pub struct JsonSink<W: Write> {
    writer: W,
    /// Output style.
    style: JsonStyle,
    rows: u64,
    finished: bool,
}

impl<W: Write> JsonSink<W> {
    /// Creates a new JSON array sink.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            style: JsonStyle::Array,
            rows: 0,
            finished: false,
        }
    }

    /// Creates a new NDJSON sink.
    #[must_use]
    pub const fn ndjson(writer: W) -> Self {
        Self {
            writer,
            style: JsonStyle::Ndjson,
            rows: 0,
            finished: false,
        }
    }

    /// Returns the output style.
    #[must_use]
    pub const fn style(&self) -> JsonStyle {
        self.style
    }

    /// Consumes the sink, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> CandleSink for JsonSink<W> {
    fn write_candle(&mut self, candle: &Candle) -> Result<(), FormatError> {
        if self.finished {
            return Err(FormatError::Finished);
        }

        match self.style {
            JsonStyle::Array => {
                let sep = if self.rows == 0 { '[' } else { ',' };
                write!(self.writer, "{sep}")?;
                serde_json::to_writer(&mut self.writer, candle)?;
            }
            JsonStyle::Ndjson => {
                serde_json::to_writer(&mut self.writer, candle)?;
                writeln!(self.writer)?;
            }
        }
        self.rows += 1;

        Ok(())
    }

    fn finish(&mut self) -> Result<(), FormatError> {
        if self.finished {
            return Ok(());
        }
        if self.style == JsonStyle::Array {
            if self.rows == 0 {
                write!(self.writer, "[")?;
            }
            writeln!(self.writer, "]")?;
        }
        self.writer.flush()?;
        self.finished = true;
        Ok(())
    }

    fn rows_written(&self) -> u64 {
        self.rows
    }
}
