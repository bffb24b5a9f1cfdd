//! Per-day schedule view.
//!
//! Splits the registry into medications due on a date (with the recorded
//! status of each slot) and medications skipped that day (with when their
//! next dose falls).

use crate::events::EventLog;
use crate::recurrence::{is_due, next_due_after, NextDose};
use crate::{DoseStatus, Medication, TimeSlot};
use chrono::NaiveDate;
use serde::Serialize;

/// Recorded status of one declared slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlotStatus {
    pub slot: TimeSlot,
    pub status: DoseStatus,
}

/// A medication due on the date, with its slot statuses in declared order
#[derive(Clone, Debug, Serialize)]
pub struct DueMedication<'a> {
    pub medication: &'a Medication,
    pub slots: Vec<SlotStatus>,
}

impl DueMedication<'_> {
    /// Slots with no recorded status yet
    pub fn pending(&self) -> impl Iterator<Item = &TimeSlot> {
        self.slots
            .iter()
            .filter(|s| s.status == DoseStatus::Pending)
            .map(|s| &s.slot)
    }
}

/// A medication not due on the date
#[derive(Clone, Debug, Serialize)]
pub struct SkippedMedication<'a> {
    pub medication: &'a Medication,
    pub next: NextDose,
}

#[derive(Clone, Debug, Serialize)]
pub struct DaySchedule<'a> {
    pub date: NaiveDate,
    pub due: Vec<DueMedication<'a>>,
    pub skipped: Vec<SkippedMedication<'a>>,
}

pub fn day_schedule<'a>(
    medications: &'a [Medication],
    event_log: &EventLog,
    date: NaiveDate,
) -> DaySchedule<'a> {
    let mut due = Vec::new();
    let mut skipped = Vec::new();

    for medication in medications {
        if is_due(medication, date) {
            let slots = medication
                .times
                .iter()
                .map(|slot| SlotStatus {
                    slot: slot.clone(),
                    status: event_log.status(date, medication.id, slot),
                })
                .collect();
            due.push(DueMedication { medication, slots });
        } else {
            skipped.push(SkippedMedication {
                medication,
                next: next_due_after(medication, date),
            });
        }
    }

    DaySchedule { date, due, skipped }
}

impl Medication {
    /// One-line "take or skip" summary for `today`
    pub fn today_summary(&self, today: NaiveDate) -> String {
        if is_due(self, today) {
            "✓ Take today".to_string()
        } else {
            format!("✗ Skip today (Next dose {})", next_due_after(self, today))
        }
    }
}
