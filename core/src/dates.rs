//! Calendar arithmetic for recency windows.
//!
//! All windows are anchored on the run's as-of date, never on wall clock.

use crate::error::{PipelineError, PipelineResult};
use chrono::{Datelike, Months, NaiveDate};

/// The as-of date moved back by `months` calendar months, clamping to
/// the end of shorter months (chrono semantics).
pub fn months_back(date: NaiveDate, months: u32) -> PipelineResult<NaiveDate> {
    date.checked_sub_months(Months::new(months))
        .ok_or(PipelineError::InvalidDateRange { from: date, months })
}

/// Whole calendar months elapsed from `start` to `end`; a partial final
/// month does not count. Never negative.
pub fn whole_months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let mut months = (end.year() as i64 - start.year() as i64) * 12
        + (end.month() as i64 - start.month() as i64);
    if end.day() < start.day() {
        months -= 1;
    }
    months.max(0)
}
