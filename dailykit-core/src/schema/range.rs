//! Inclusive date ranges for filter queries
//!
//! Both bounds are calendar days in UTC and both are inclusive, so a range
//! with `start == end == D` selects everything that happened on `D`.

use chrono::{DateTime, Days, NaiveDate, Utc};

use super::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, ValidationError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(ValidationError::InvertedRange {
                    start: "start_date",
                    end: "end_date",
                });
            }
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Midnight UTC at the start of `start`.
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.start
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// Midnight UTC after `end`, to be used as an exclusive upper bound.
    pub fn end_instant_exclusive(&self) -> Option<DateTime<Utc>> {
        self.end
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}
