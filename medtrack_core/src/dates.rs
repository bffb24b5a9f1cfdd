//! Calendar-date helpers.
//!
//! All dates in the system are `NaiveDate`s rendered as `YYYY-MM-DD`.
//! Nothing here reads the system clock; "today" is always passed in.

use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};

/// Date format used for every key, argument and report column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string into a date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| Error::InvalidDate(format!("'{}': {}", s, e)))
}

/// Reject dates that lie after `today`
pub fn ensure_not_future(date: NaiveDate, today: NaiveDate) -> Result<()> {
    if date > today {
        return Err(Error::InvalidDate(format!(
            "{} is after today ({})",
            date, today
        )));
    }
    Ok(())
}

/// Number of days in the given month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Build the date for `day` in the given month, clamping to the month's last day
pub fn clamped_day(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let day = day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The (year, month) pair following the given one
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}
