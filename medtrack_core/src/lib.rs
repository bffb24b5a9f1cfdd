#![forbid(unsafe_code)]

//! Core domain model and business logic for the medtrack adherence scheduler.
//!
//! This crate provides:
//! - Domain types (medications, time slots, frequencies)
//! - Recurrence engine (due dates, next dose)
//! - Adherence aggregation and calendar markings
//! - The status store and its thread-safe handle
//! - Snapshot persistence and CSV reports for hosts
//!
//! Nothing in this crate reads the system clock: the current date is always
//! an explicit argument.

pub mod types;
pub mod error;
pub mod dates;
pub mod events;
pub mod recurrence;
pub mod adherence;
pub mod schedule;
pub mod store;
pub mod shared;
pub mod state;
pub mod report;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use dates::{ensure_not_future, parse_date};
pub use events::EventLog;
pub use recurrence::{is_due, next_due_after, NextDose};
pub use adherence::{
    adherence_tier, calendar_markings, calendar_markings_with, day_adherence,
    AdherenceThresholds, AdherenceTier, CalendarMark, DayAdherence,
};
pub use schedule::{day_schedule, DaySchedule};
pub use store::StatusStore;
pub use shared::SharedStatusStore;
pub use report::write_report;
pub use config::Config;
