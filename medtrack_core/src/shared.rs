//! Thread-safe handle around a [`StatusStore`].
//!
//! Writes take the write lock for the whole read-then-write sequence (id
//! assignment, anchor check), so concurrent callers cannot lose updates.
//! Readers take a cloned snapshot under the read lock and compute on that.

use crate::{Error, Frequency, Medication, MedicationId, Result, StatusStore, TimeSlot};
use chrono::NaiveDate;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Clone, Debug, Default)]
pub struct SharedStatusStore {
    inner: Arc<RwLock<StatusStore>>,
}

impl SharedStatusStore {
    pub fn new(store: StatusStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StatusStore>> {
        self.inner
            .read()
            .map_err(|_| Error::State("status store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StatusStore>> {
        self.inner
            .write()
            .map_err(|_| Error::State("status store lock poisoned".into()))
    }

    /// Consistent copy of medications and events
    pub fn snapshot(&self) -> Result<StatusStore> {
        Ok(self.read()?.clone())
    }

    pub fn add_medication(
        &self,
        name: &str,
        dosage: &str,
        times: Vec<TimeSlot>,
        frequency: Frequency,
    ) -> Result<Medication> {
        self.write()?.add_medication(name, dosage, times, frequency)
    }

    pub fn record_dose(
        &self,
        id: MedicationId,
        date: NaiveDate,
        slot: TimeSlot,
        taken: bool,
    ) -> Result<Medication> {
        self.write()?.record_dose(id, date, slot, taken)
    }
}
