//! Adherence aggregation for the calendar view.
//!
//! For each date, every medication due that day contributes one scheduled dose
//! per declared time slot, and every "taken" entry recorded for it counts as a
//! taken dose. Recorded slot names are not cross-checked against the
//! medication's declared slots.

use crate::events::{count_taken, DayEvents, EventLog};
use crate::recurrence::is_due;
use crate::Medication;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Scheduled vs. taken doses for a single date
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAdherence {
    pub scheduled: u32,
    pub taken: u32,
    /// Rounded percentage of scheduled doses taken; 0 when nothing is scheduled
    pub percent: u32,
}

impl DayAdherence {
    fn from_counts(scheduled: u32, taken: u32) -> Self {
        let percent = if scheduled > 0 {
            (100.0 * f64::from(taken) / f64::from(scheduled)).round() as u32
        } else {
            0
        };

        Self {
            scheduled,
            taken,
            percent: percent.min(100),
        }
    }

    /// Percentage bucket (0, 10, ..., 100) for gradient indicators
    pub fn gradient_class(&self) -> u32 {
        (self.percent / 10) * 10
    }

    pub fn tier(&self) -> AdherenceTier {
        adherence_tier(self.percent, self.scheduled)
    }
}

impl fmt::Display for DayAdherence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}% taken ({}/{})",
            self.percent, self.taken, self.scheduled
        )
    }
}

/// Compute scheduled/taken counts for `date`
///
/// `events_for_date` is whatever the log holds for that date; `None` is
/// treated as an empty day.
pub fn day_adherence(
    medications: &[Medication],
    events_for_date: Option<&DayEvents>,
    date: NaiveDate,
) -> DayAdherence {
    let (scheduled, taken) = medications
        .iter()
        .filter(|m| is_due(m, date))
        .fold((0u32, 0u32), |(scheduled, taken), m| {
            (
                scheduled + m.times.len() as u32,
                taken + count_taken(events_for_date, m.id),
            )
        });

    // Taken entries are not matched to declared slots, so they can exceed
    // the scheduled count; the percentage is capped at 100.
    DayAdherence::from_counts(scheduled, taken)
}

// ============================================================================
// Tiers
// ============================================================================

/// Coarse adherence bucket used to colour calendar days
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdherenceTier {
    /// Nothing scheduled
    None,
    Low,
    Medium,
    High,
}

impl fmt::Display for AdherenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdherenceTier::None => f.pad("none"),
            AdherenceTier::Low => f.pad("low"),
            AdherenceTier::Medium => f.pad("medium"),
            AdherenceTier::High => f.pad("high"),
        }
    }
}

/// Percentage cut-offs for the Medium and High tiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdherenceThresholds {
    pub high: u32,
    pub medium: u32,
}

impl Default for AdherenceThresholds {
    fn default() -> Self {
        Self {
            high: 90,
            medium: 50,
        }
    }
}

impl AdherenceThresholds {
    pub fn classify(&self, percent: u32, scheduled: u32) -> AdherenceTier {
        if scheduled == 0 {
            AdherenceTier::None
        } else if percent >= self.high {
            AdherenceTier::High
        } else if percent >= self.medium {
            AdherenceTier::Medium
        } else {
            AdherenceTier::Low
        }
    }
}

/// Tier for a day using the default thresholds (High ≥ 90, Medium ≥ 50)
pub fn adherence_tier(percent: u32, scheduled: u32) -> AdherenceTier {
    AdherenceThresholds::default().classify(percent, scheduled)
}

// ============================================================================
// Calendar Markings
// ============================================================================

/// Everything the calendar renderer needs for one date
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMark {
    pub tier: AdherenceTier,
    pub percent: u32,
    pub taken: u32,
    pub scheduled: u32,
    pub is_selected: bool,
}

impl CalendarMark {
    fn new(adherence: DayAdherence, tier: AdherenceTier, is_selected: bool) -> Self {
        Self {
            tier,
            percent: adherence.percent,
            taken: adherence.taken,
            scheduled: adherence.scheduled,
            is_selected,
        }
    }

    /// Whether any dose was scheduled (drives the day's dot indicator)
    pub fn marked(&self) -> bool {
        self.scheduled > 0
    }

    pub fn adherence(&self) -> DayAdherence {
        DayAdherence {
            scheduled: self.scheduled,
            taken: self.taken,
            percent: self.percent,
        }
    }
}

/// Markings for every date in the log, plus the selected date
pub fn calendar_markings(
    medications: &[Medication],
    event_log: &EventLog,
    selected: NaiveDate,
) -> BTreeMap<NaiveDate, CalendarMark> {
    calendar_markings_with(
        medications,
        event_log,
        selected,
        &AdherenceThresholds::default(),
    )
}

/// [`calendar_markings`] with caller-supplied tier thresholds
pub fn calendar_markings_with(
    medications: &[Medication],
    event_log: &EventLog,
    selected: NaiveDate,
    thresholds: &AdherenceThresholds,
) -> BTreeMap<NaiveDate, CalendarMark> {
    let mut markings: BTreeMap<NaiveDate, CalendarMark> = event_log
        .iter()
        .map(|(&date, day)| {
            let adherence = day_adherence(medications, Some(day), date);
            let tier = thresholds.classify(adherence.percent, adherence.scheduled);
            (date, CalendarMark::new(adherence, tier, date == selected))
        })
        .collect();

    markings.entry(selected).or_insert_with(|| {
        CalendarMark::new(DayAdherence::default(), AdherenceTier::None, true)
    });

    tracing::debug!(
        "Computed {} calendar markings (selected {})",
        markings.len(),
        selected
    );

    markings
}
