//! Day boundaries for tick filtering.

use chrono::{DateTime, NaiveDate, NaiveTime};

use crate::DayRangeError;

/// Number of seconds in a calendar day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Half-open `[start, end)` interval of epoch seconds covering one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayRange {
    start: i64,
    end: i64,
}

impl DayRange {
    /// Creates the range covering a full UTC calendar day.
    ///
    /// The end bound is the following midnight, so the day's final second
    /// `23:59:59` is included.
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        Self::for_date_with_offset(date, 0)
    }

    /// Creates the range covering a calendar day in a fixed-offset local time.
    ///
    /// `utc_offset_secs` is the local zone's offset east of UTC, e.g. `19_800`
    /// for `+05:30`.
    #[must_use]
    pub fn for_date_with_offset(date: NaiveDate, utc_offset_secs: i32) -> Self {
        let midnight = date.and_time(NaiveTime::MIN).and_utc().timestamp();
        let start = midnight - i64::from(utc_offset_secs);
        Self {
            start,
            end: start + SECONDS_PER_DAY,
        }
    }

    /// Parses a `YYYY-MM-DD` date string into a UTC day range.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid calendar date.
    pub fn parse(day: &str) -> Result<Self, DayRangeError> {
        Self::parse_with_offset(day, 0)
    }

    /// Parses a `YYYY-MM-DD` date string into a fixed-offset day range.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid calendar date.
    pub fn parse_with_offset(day: &str, utc_offset_secs: i32) -> Result<Self, DayRangeError> {
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|source| {
            DayRangeError::InvalidDate {
                input: day.to_string(),
                source,
            }
        })?;
        Ok(Self::for_date_with_offset(date, utc_offset_secs))
    }

    /// Returns the inclusive start, in epoch seconds.
    #[must_use]
    pub const fn start(&self) -> i64 {
        self.start
    }

    /// Returns the exclusive end, in epoch seconds.
    #[must_use]
    pub const fn end(&self) -> i64 {
        self.end
    }

    /// Returns true if the epoch second falls inside the range.
    #[must_use]
    pub const fn contains(&self, seconds: i64) -> bool {
        seconds >= self.start && seconds < self.end
    }
}

impl std::fmt::Display for DayRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (
            DateTime::from_timestamp(self.start, 0),
            DateTime::from_timestamp(self.end, 0),
        ) {
            (Some(start), Some(end)) => write!(
                f,
                "[{}, {})",
                start.format("%Y-%m-%dT%H:%M:%SZ"),
                end.format("%Y-%m-%dT%H:%M:%SZ")
            ),
            _ => write!(f, "[{}, {})", self.start, self.end),
        }
    }
}
