//! Output formatting and persistence for the uptime report.
//!
//! Supports the plain `<id> <percent>` report lines, JSON serialization, and
//! CSV append.

use anyhow::Result;
use tracing::{debug, info};

use crate::aggregator::{StationUptime, UptimeReport};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Writes the report in its primary textual form: one `"<id> <percent>"`
/// line per station, ascending by id.
pub fn write_report<W: Write>(mut writer: W, rows: &[StationUptime]) -> Result<()> {
    for row in rows {
        writeln!(writer, "{} {}", row.station_id, row.percent_uptime)?;
    }
    Ok(())
}

/// Logs the full report as pretty-printed JSON.
pub fn print_json(report: &UptimeReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Appends per-station rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_csv(path: &str, rows: &[StationUptime]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
