//! The validated reporting window shared by every tenant in a firing.

use core::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::LabsyncError;

/// Display format for interval bounds in titles, subjects and file names.
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

/// Display format for record timestamps inside the workbook.
pub const DISPLAY_DATETIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Inclusive reporting window in the reporting time zone.
///
/// Invariant: `start <= end`, enforced by every constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateInterval {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateInterval {
    /// Build an interval from two timestamps.
    ///
    /// # Errors
    /// Returns `Configuration` if `start` is after `end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, LabsyncError> {
        if start > end {
            return Err(LabsyncError::configuration(format!(
                "interval start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Build an interval spanning whole days: `first` at 00:00:00 through
    /// `last` at 23:59:59.
    ///
    /// # Errors
    /// Returns `Configuration` if `first` is after `last`.
    pub fn from_days(first: NaiveDate, last: NaiveDate) -> Result<Self, LabsyncError> {
        let end = last
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| LabsyncError::configuration(format!("invalid end of day for {last}")))?;
        Self::new(first.and_time(NaiveTime::MIN), end)
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Inclusive upper bound.
    #[must_use]
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Lower bound formatted as `dd-MM-yyyy`.
    #[must_use]
    pub fn formatted_start(&self) -> String {
        self.start.format(DISPLAY_DATE_FORMAT).to_string()
    }

    /// Upper bound formatted as `dd-MM-yyyy`.
    #[must_use]
    pub fn formatted_end(&self) -> String {
        self.end.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.start, self.end)
    }
}
