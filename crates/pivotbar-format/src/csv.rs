//! CSV output format.

use pivotbar_aggregate::Candle;
use std::io::Write;

use crate::{CandleSink, FormatError};

/// Streaming CSV sink.
///
/// Rows are `date,open,high,low,close,volume` with each value in its natural
/// decimal form. No header is written unless requested.
#[derive(Debug)]
pub struct CsvSink<W: Write> {
    writer: W,
    /// Whether to include a header row.
    include_header: bool,
    header_written: bool,
    rows: u64,
}

impl<W: Write> CsvSink<W> {
    /// Creates a new header-less sink.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            include_header: false,
            header_written: false,
            rows: 0,
        }
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Consumes the sink, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_header(&mut self) -> Result<(), FormatError> {
        if self.include_header && !self.header_written {
            writeln!(self.writer, "date,open,high,low,close,volume")?;
            self.header_written = true;
        }
        Ok(())
    }
}

impl<W: Write> CandleSink for CsvSink<W> {
    fn write_candle(&mut self, candle: &Candle) -> Result<(), FormatError> {
        self.write_header()?;

        writeln!(
            self.writer,
            "{},{},{},{},{},{}",
            candle.timestamp, candle.open, candle.high, candle.low, candle.close, candle.volume
        )?;
        self.rows += 1;

        Ok(())
    }

    fn finish(&mut self) -> Result<(), FormatError> {
        self.write_header()?;
        self.writer.flush()?;
        Ok(())
    }

    fn rows_written(&self) -> u64 {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_candles() -> Vec<Candle> {
        vec![
            Candle::new(1_704_878_100, 45.35, 46.9, 45.05, 46.4, 1_250, 5),
            Candle::new(1_704_878_400, 46.4, 47.0, 46.0, 46.75, 300, 5),
        ]
    }

    fn render(sink: CsvSink<Vec<u8>>) -> String {
        let mut sink = sink;
        for candle in create_test_candles() {
            sink.write_candle(&candle).unwrap();
        }
        sink.finish().unwrap();
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_csv_rows() {
        let result = render(CsvSink::new(Vec::new()));
        assert_eq!(
            result,
            "1704878100,45.35,46.9,45.05,46.4,1250\n1704878400,46.4,47,46,46.75,300\n"
        );
    }

    #[test]
    fn test_csv_header() {
        let result = render(CsvSink::new(Vec::new()).with_header(true));
        assert!(result.starts_with("date,open,high,low,close,volume\n"));
        assert_eq!(result.lines().count(), 3);
    }

    #[test]
    fn test_header_written_for_empty_output() {
        let mut sink = CsvSink::new(Vec::new()).with_header(true);
        sink.finish().unwrap();
        assert_eq!(sink.rows_written(), 0);
        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            "date,open,high,low,close,volume\n"
        );
    }

    #[test]
    fn test_rows_written() {
        let mut sink = CsvSink::new(Vec::new());
        for candle in create_test_candles() {
            sink.write_candle(&candle).unwrap();
        }
        assert_eq!(sink.rows_written(), 2);
    }
}
