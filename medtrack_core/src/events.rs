//! Dose event log.
//!
//! The log maps `date → medication → slot → taken`. Entries are created the
//! first time a status is recorded and overwritten by later records for the
//! same key. Nothing is ever removed. Iteration order carries no meaning for
//! any computation; ordered maps are used only so output is deterministic.

use crate::{DoseStatus, MedicationId, TimeSlot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Slot statuses recorded for one medication on one date
pub type SlotEvents = BTreeMap<TimeSlot, bool>;

/// All medications' slot statuses recorded on one date
pub type DayEvents = BTreeMap<MedicationId, SlotEvents>;

/// Sparse record of every dose status change
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    days: BTreeMap<NaiveDate, DayEvents>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a single entry. Returns the previous value for the key, if any.
    pub fn record(
        &mut self,
        date: NaiveDate,
        id: MedicationId,
        slot: TimeSlot,
        taken: bool,
    ) -> Option<bool> {
        self.days
            .entry(date)
            .or_default()
            .entry(id)
            .or_default()
            .insert(slot, taken)
    }

    /// Everything recorded on a date
    pub fn for_date(&self, date: NaiveDate) -> Option<&DayEvents> {
        self.days.get(&date)
    }

    /// Raw entry for a key, if one was ever recorded
    pub fn entry(&self, date: NaiveDate, id: MedicationId, slot: &TimeSlot) -> Option<bool> {
        self.days.get(&date)?.get(&id)?.get(slot).copied()
    }

    /// Entry for a key as a dose status
    pub fn status(&self, date: NaiveDate, id: MedicationId, slot: &TimeSlot) -> DoseStatus {
        DoseStatus::from(self.entry(date, id, slot))
    }

    /// Dates that have at least one recorded entry
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DayEvents)> {
        self.days.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Total number of (date, medication, slot) entries
    pub fn len(&self) -> usize {
        self.days
            .values()
            .flat_map(|day| day.values())
            .map(|slots| slots.len())
            .sum()
    }
}

/// Number of entries marked taken for one medication on one day
pub fn count_taken(day: Option<&DayEvents>, id: MedicationId) -> u32 {
    day.and_then(|d| d.get(&id))
        .map(|slots| slots.values().filter(|&&taken| taken).count() as u32)
        .unwrap_or(0)
}
