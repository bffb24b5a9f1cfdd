//! Recurrence engine: which medications are due on a date, and when next.
//!
//! Periodic rules are measured from the medication's anchor date (the first
//! day it was marked taken):
//! - Every other day: even number of days from the anchor
//! - Weekly: multiple of seven days from the anchor
//! - Monthly: same day of month as the anchor, clamped to the month's last day
//!
//! Day distances are absolute, so dates before the anchor follow the same
//! pattern as dates after it. A medication with no anchor is always due.

use crate::dates::{clamped_day, next_month};
use crate::{Frequency, Medication};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// When the next dose falls, relative to a reference date
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextDose {
    Today,
    Tomorrow,
    InDays(u32),
    On(NaiveDate),
}

impl fmt::Display for NextDose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextDose::Today => f.write_str("today"),
            NextDose::Tomorrow => f.write_str("tomorrow"),
            NextDose::InDays(days) => write!(f, "in {} days", days),
            NextDose::On(date) => write!(f, "on {}", date),
        }
    }
}

/// Whole calendar days between two dates, ignoring direction
fn days_between(a: NaiveDate, b: NaiveDate) -> u64 {
    (a - b).num_days().unsigned_abs()
}

/// Anchor day of month as it falls in the given month
fn anchor_day_in(anchor: NaiveDate, year: i32, month: u32) -> Option<NaiveDate> {
    clamped_day(year, month, anchor.day())
}

/// Whether the medication should be taken on `date`
pub fn is_due(medication: &Medication, date: NaiveDate) -> bool {
    let Some(anchor) = medication.first_taken else {
        return true;
    };

    match medication.frequency {
        Frequency::Daily | Frequency::Custom(_) => true,
        Frequency::EveryOtherDay => days_between(date, anchor) % 2 == 0,
        Frequency::Weekly => days_between(date, anchor) % 7 == 0,
        Frequency::Monthly => {
            anchor_day_in(anchor, date.year(), date.month()) == Some(date)
        }
    }
}

/// When the next dose after `from` falls
///
/// `Today` is returned when `from` itself is a due date for weekly and
/// monthly rules.
pub fn next_due_after(medication: &Medication, from: NaiveDate) -> NextDose {
    let Some(anchor) = medication.first_taken else {
        return NextDose::Tomorrow;
    };

    match medication.frequency {
        Frequency::Daily | Frequency::Custom(_) => NextDose::Tomorrow,
        Frequency::EveryOtherDay => {
            let tomorrow = from + Duration::days(1);
            if is_due(medication, tomorrow) {
                NextDose::Tomorrow
            } else {
                NextDose::InDays(2)
            }
        }
        Frequency::Weekly => {
            // Euclidean remainder keeps dates before the anchor on the same grid
            let offset = (from - anchor).num_days().rem_euclid(7) as u32;
            match 7 - offset {
                7 => NextDose::Today,
                1 => NextDose::Tomorrow,
                days => NextDose::InDays(days),
            }
        }
        Frequency::Monthly => next_monthly(anchor, from),
    }
}

fn next_monthly(anchor: NaiveDate, from: NaiveDate) -> NextDose {
    let this_month = match anchor_day_in(anchor, from.year(), from.month()) {
        Some(date) => date,
        None => return NextDose::Tomorrow,
    };

    if this_month == from {
        NextDose::Today
    } else if this_month > from {
        NextDose::On(this_month)
    } else {
        let (year, month) = next_month(from.year(), from.month());
        anchor_day_in(anchor, year, month)
            .map(NextDose::On)
            .unwrap_or(NextDose::Tomorrow)
    }
}
