//! Error taxonomy for log ingestion and uptime computation.
//!
//! Every variant is fatal: a malformed report or integrity violation aborts
//! the whole run rather than producing a partial uptime report.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UptimeError {
    #[error("invalid report range: end {end} precedes start {start}")]
    InvalidRange { start: i64, end: i64 },

    #[error("no reports resolved for station, uptime is undefined")]
    NoData,

    #[error("observed span is zero, uptime is undefined")]
    DegenerateSpan,

    #[error("station {0} was never declared")]
    UnknownStation(u32),

    #[error("station {0} declared more than once")]
    DuplicateStation(u32),

    #[error("charger {0} does not belong to any declared station")]
    UnknownCharger(u32),

    #[error("charger {0} declared under more than one station")]
    DuplicateCharger(u32),

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, UptimeError>;
