//! CSV export of calendar markings.

use crate::adherence::CalendarMark;
use crate::Result;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct ReportRow {
    date: String,
    tier: String,
    percent: u32,
    taken: u32,
    scheduled: u32,
    selected: bool,
}

impl ReportRow {
    fn new(date: &NaiveDate, mark: &CalendarMark) -> Self {
        ReportRow {
            date: date.to_string(),
            tier: mark.tier.to_string(),
            percent: mark.percent,
            taken: mark.taken,
            scheduled: mark.scheduled,
            selected: mark.is_selected,
        }
    }
}

/// Append one row per marked date to a CSV file
///
/// Headers are written only when the file is new or empty. Returns the
/// number of rows written.
pub fn write_report(markings: &BTreeMap<NaiveDate, CalendarMark>, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for (date, mark) in markings {
        writer.serialize(ReportRow::new(date, mark))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| crate::Error::Io(e.into_error()))?;
    file.sync_all()?;

    tracing::info!("Wrote {} adherence rows to {:?}", markings.len(), path);
    Ok(markings.len())
}
