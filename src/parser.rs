//! Text parser for charger availability log files.
//!
//! A log file has two sections. `[Stations]` declares each station followed
//! by the charger ids it owns, one station per line. `[Charger Availability
//! Reports]` carries one report per line: charger id, start time, end time,
//! and `true`/`false` for up or down. A blank line (or EOF) ends a section.
//!
//! The parser streams lines from any [`BufRead`] and drives an [`Aggregator`]
//! directly; it holds no file or position state beyond the current line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::aggregator::Aggregator;
use crate::error::{Result, UptimeError};

const STATION_HEADER: &str = "[Stations]";
const REPORT_HEADER: &str = "[Charger Availability Reports]";

/// One line of the `[Stations]` section.
#[derive(Debug, PartialEq, Eq)]
pub struct StationDecl {
    pub station_id: u32,
    pub charger_ids: Vec<u32>,
}

/// One line of the `[Charger Availability Reports]` section.
#[derive(Debug, PartialEq, Eq)]
pub struct AvailabilityReport {
    pub charger_id: u32,
    pub start: i64,
    pub end: i64,
    pub up: bool,
}

/// Line reader that tracks the 1-based line number for diagnostics.
struct NumberedLines<R: BufRead> {
    inner: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> NumberedLines<R> {
    fn new(reader: R) -> Self {
        Self {
            inner: reader.lines(),
            line_no: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        match self.inner.next() {
            Some(line) => {
                self.line_no += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> UptimeError {
    UptimeError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_token<T: std::str::FromStr>(token: &str, what: &str, line_no: usize) -> Result<T> {
    token
        .parse()
        .map_err(|_| parse_error(line_no, format!("invalid {what} `{token}`")))
}

/// Parses a station declaration: a station id followed by zero or more
/// charger ids, space-separated.
pub fn parse_station_line(line: &str, line_no: usize) -> Result<StationDecl> {
    let mut tokens = line.split_whitespace();
    let station_id = match tokens.next() {
        Some(token) => parse_token(token, "station id", line_no)?,
        None => return Err(parse_error(line_no, "empty station declaration")),
    };

    let charger_ids = tokens
        .map(|token| parse_token(token, "charger id", line_no))
        .collect::<Result<Vec<u32>>>()?;

    Ok(StationDecl {
        station_id,
        charger_ids,
    })
}

/// Parses an availability report: `<charger_id> <start> <end> <true|false>`.
///
/// Exactly four tokens are required, and the up flag must be the literal
/// `true` or `false`.
pub fn parse_report_line(line: &str, line_no: usize) -> Result<AvailabilityReport> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 4 {
        return Err(parse_error(
            line_no,
            format!("expected 4 report fields, found {}", tokens.len()),
        ));
    }

    let charger_id = parse_token(tokens[0], "charger id", line_no)?;
    let start = parse_token(tokens[1], "start time", line_no)?;
    let end = parse_token(tokens[2], "end time", line_no)?;
    let up = match tokens[3] {
        "true" => true,
        "false" => false,
        other => return Err(parse_error(line_no, format!("invalid up flag `{other}`"))),
    };

    Ok(AvailabilityReport {
        charger_id,
        start,
        end,
        up,
    })
}

/// Advances past the given section header, skipping any preceding lines.
fn seek_header<R: BufRead>(lines: &mut NumberedLines<R>, header: &str) -> Result<()> {
    while let Some(line) = lines.next_line()? {
        if line.trim_end() == header {
            return Ok(());
        }
    }
    Err(parse_error(
        lines.line_no,
        format!("missing `{header}` section"),
    ))
}

/// Ingests a whole log file, returning the populated aggregator.
///
/// Any malformed line, unknown/duplicate id, or invalid report range aborts
/// ingestion with the first error encountered.
pub fn ingest<R: BufRead>(reader: R) -> Result<Aggregator> {
    let mut lines = NumberedLines::new(reader);
    let mut agg = Aggregator::new();

    seek_header(&mut lines, STATION_HEADER)?;
    let mut charger_count = 0usize;
    while let Some(line) = lines.next_line()? {
        if line.trim().is_empty() {
            break;
        }
        let decl = parse_station_line(&line, lines.line_no)?;
        agg.register_station(decl.station_id)?;
        for charger_id in decl.charger_ids {
            agg.register_charger(decl.station_id, charger_id)?;
            charger_count += 1;
        }
    }
    debug!(
        stations = agg.station_count(),
        chargers = charger_count,
        "Station section parsed"
    );

    seek_header(&mut lines, REPORT_HEADER)?;
    let mut report_count = 0usize;
    while let Some(line) = lines.next_line()? {
        if line.trim().is_empty() {
            break;
        }
        let report = parse_report_line(&line, lines.line_no)?;
        agg.route_charger_report(report.charger_id, report.start, report.end, report.up)?;
        report_count += 1;
    }
    debug!(reports = report_count, "Report section parsed");

    Ok(agg)
}

/// Opens and ingests a log file from disk.
pub fn ingest_file(path: impl AsRef<Path>) -> Result<Aggregator> {
    let file = File::open(path)?;
    ingest(BufReader::new(file))
}
