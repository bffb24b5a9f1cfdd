//! Status store: the medication registry and the dose event log.
//!
//! The store is the only owner of both collections. Callers read through
//! accessors and change state only through [`StatusStore::add_medication`]
//! and [`StatusStore::record_dose`]. Both validate before mutating, so a
//! failed call leaves the store untouched.

use crate::events::EventLog;
use crate::{Error, Frequency, Medication, MedicationId, Result, TimeSlot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusStore {
    #[serde(default)]
    medications: Vec<Medication>,
    #[serde(default)]
    events: EventLog,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn medication(&self, id: MedicationId) -> Option<&Medication> {
        self.medications.iter().find(|m| m.id == id)
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Register a new medication
    ///
    /// Name and dosage are trimmed and must be non-empty; at least one time
    /// slot is required. Repeated slots are collapsed, keeping first-seen
    /// order. The new record has no anchor date.
    pub fn add_medication(
        &mut self,
        name: &str,
        dosage: &str,
        times: Vec<TimeSlot>,
        frequency: Frequency,
    ) -> Result<Medication> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Medication name is required".into()));
        }

        let dosage = dosage.trim();
        if dosage.is_empty() {
            return Err(Error::Validation("Dosage is required".into()));
        }

        let mut slots: Vec<TimeSlot> = Vec::with_capacity(times.len());
        for slot in times {
            if !slots.contains(&slot) {
                slots.push(slot);
            }
        }
        if slots.is_empty() {
            return Err(Error::Validation(
                "Please select at least one time for the medication".into(),
            ));
        }

        let id = self.next_id()?;
        let medication = Medication {
            id,
            name: name.to_string(),
            dosage: dosage.to_string(),
            times: slots,
            frequency,
            first_taken: None,
        };

        self.medications.push(medication.clone());
        tracing::info!(
            "Added medication {} ({}, {}, {})",
            id,
            medication.name,
            medication.dosage,
            medication.frequency
        );

        Ok(medication)
    }

    /// Record whether the dose for `slot` on `date` was taken
    ///
    /// The first `taken = true` record for a medication sets its anchor date;
    /// later records never move it. Re-recording identical arguments changes
    /// nothing. Returns the (possibly updated) medication.
    pub fn record_dose(
        &mut self,
        id: MedicationId,
        date: NaiveDate,
        slot: TimeSlot,
        taken: bool,
    ) -> Result<Medication> {
        let medication = self
            .medications
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(Error::NotFound(id))?;

        tracing::debug!("Recording {} {} {} = {}", date, id, slot, taken);
        self.events.record(date, id, slot, taken);

        if taken && medication.first_taken.is_none() {
            medication.first_taken = Some(date);
            tracing::info!("Medication {} first taken on {}", id, date);
        }

        Ok(medication.clone())
    }

    fn next_id(&self) -> Result<MedicationId> {
        let max = self.medications.iter().map(|m| m.id.0).max().unwrap_or(0);
        max.checked_add(1)
            .map(MedicationId)
            .ok_or_else(|| Error::State(format!("medication ids exhausted (highest is {})", max)))
    }
}
