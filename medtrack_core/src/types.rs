//! Core domain types for the medication tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Medication identity and registry records
//! - Time slots and recurrence frequencies
//! - Per-slot dose status

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Identity
// ============================================================================

/// Identifier assigned by the status store on creation
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MedicationId(pub u32);

impl fmt::Display for MedicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for MedicationId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

// ============================================================================
// Time Slots
// ============================================================================

/// A named point in the day a medication is scheduled for (e.g. "Morning").
///
/// Purely a label: it is never parsed as a clock time.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSlot(String);

impl TimeSlot {
    /// Preset labels offered when adding a medication
    pub const PRESETS: [&'static str; 5] = ["Morning", "Noon", "Afternoon", "Evening", "Bedtime"];

    /// Create a slot from a label, trimming whitespace. Blank labels are rejected.
    pub fn new(label: impl AsRef<str>) -> Result<Self> {
        let label = label.as_ref().trim();
        if label.is_empty() {
            return Err(Error::Validation("time slot label is required".into()));
        }
        Ok(Self(label.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this label is one of the presets rather than a custom time
    pub fn is_preset(&self) -> bool {
        Self::PRESETS.contains(&self.0.as_str())
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TimeSlot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

// ============================================================================
// Frequency
// ============================================================================

/// Recurrence rule for a medication
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    EveryOtherDay,
    Weekly,
    Monthly,
    /// Free-text rule with no computable recurrence; always due
    Custom(String),
}

impl Frequency {
    /// Option labels shown when picking a frequency
    pub const OPTIONS: [&'static str; 5] =
        ["Daily", "Every other day", "Weekly", "Monthly", "Custom"];

    /// Build a frequency from an option name and an optional custom description.
    ///
    /// The description is only kept for `Custom`; other rules ignore it.
    pub fn from_parts(name: &str, custom_description: Option<&str>) -> Result<Self> {
        let normalized = name.trim().to_lowercase().replace(&['-', '_'][..], " ");
        if normalized == "custom" {
            let description = custom_description.unwrap_or_default().trim().to_string();
            return Ok(Frequency::Custom(description));
        }
        normalized.parse()
    }

    /// Whether this rule has a period the recurrence engine can compute
    pub fn is_periodic(&self) -> bool {
        matches!(
            self,
            Frequency::EveryOtherDay | Frequency::Weekly | Frequency::Monthly
        )
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => f.write_str("Daily"),
            Frequency::EveryOtherDay => f.write_str("Every other day"),
            Frequency::Weekly => f.write_str("Weekly"),
            Frequency::Monthly => f.write_str("Monthly"),
            Frequency::Custom(description) if description.is_empty() => f.write_str("Custom"),
            Frequency::Custom(description) => f.write_str(description),
        }
    }
}

impl FromStr for Frequency {
    type Err = Error;

    /// Parses the non-custom rules; use [`Frequency::from_parts`] for `Custom`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(&['-', '_'][..], " ").as_str() {
            "daily" => Ok(Frequency::Daily),
            "every other day" => Ok(Frequency::EveryOtherDay),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "custom" => Ok(Frequency::Custom(String::new())),
            _ => Err(Error::InvalidFrequency(s.to_string())),
        }
    }
}

// ============================================================================
// Medication
// ============================================================================

/// A registered medication
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub id: MedicationId,
    pub name: String,
    pub dosage: String,
    pub times: Vec<TimeSlot>,
    pub frequency: Frequency,
    /// Anchor for periodic recurrence: the date of the first "taken" event.
    /// Set once by the status store and never overwritten.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_taken: Option<NaiveDate>,
}

// ============================================================================
// Dose Status
// ============================================================================

/// Recorded state of a single (date, medication, slot) entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoseStatus {
    Taken,
    NotTaken,
    /// No event recorded yet
    Pending,
}

impl From<Option<bool>> for DoseStatus {
    fn from(entry: Option<bool>) -> Self {
        match entry {
            Some(true) => DoseStatus::Taken,
            Some(false) => DoseStatus::NotTaken,
            None => DoseStatus::Pending,
        }
    }
}

impl fmt::Display for DoseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoseStatus::Taken => f.write_str("taken"),
            DoseStatus::NotTaken => f.write_str("not taken"),
            DoseStatus::Pending => f.write_str("pending"),
        }
    }
}

/// Confirmation text for a recorded dose, e.g. "Morning medication marked as taken"
pub fn dose_message(slot: &TimeSlot, taken: bool) -> String {
    format!(
        "{} medication marked as {}",
        slot,
        if taken { "taken" } else { "not taken" }
    )
}
