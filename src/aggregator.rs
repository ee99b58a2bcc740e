//! Station registry and report routing.
//!
//! The aggregator owns one [`IntervalStore`] per declared station and a map
//! of declared chargers to their owning station. Availability reports arrive
//! keyed by charger id and are folded into the owning station's store.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Result, UptimeError};
use crate::interval::IntervalStore;

/// Final uptime figure for a single station.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StationUptime {
    pub station_id: u32,
    pub percent_uptime: u8,
}

/// Complete uptime report across all declared stations.
#[derive(Debug, Serialize)]
pub struct UptimeReport {
    pub generated_at: DateTime<Utc>,
    pub stations: Vec<StationUptime>,
}

#[derive(Debug, Default)]
pub struct Aggregator {
    // BTreeMap keeps render() in ascending station-id order.
    stations: BTreeMap<u32, IntervalStore>,
    chargers: HashMap<u32, u32>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a station with an empty interval store.
    pub fn register_station(&mut self, station_id: u32) -> Result<()> {
        if self.stations.contains_key(&station_id) {
            return Err(UptimeError::DuplicateStation(station_id));
        }
        self.stations.insert(station_id, IntervalStore::new());
        Ok(())
    }

    /// Declares a charger as belonging to an already-declared station.
    pub fn register_charger(&mut self, station_id: u32, charger_id: u32) -> Result<()> {
        if !self.stations.contains_key(&station_id) {
            return Err(UptimeError::UnknownStation(station_id));
        }
        if self.chargers.contains_key(&charger_id) {
            return Err(UptimeError::DuplicateCharger(charger_id));
        }
        self.chargers.insert(charger_id, station_id);
        Ok(())
    }

    /// Routes one availability report to the station's store by station id.
    pub fn route_report(&mut self, station_id: u32, start: i64, end: i64, up: bool) -> Result<()> {
        let store = self
            .stations
            .get_mut(&station_id)
            .ok_or(UptimeError::UnknownStation(station_id))?;
        store.resolve(start, end, up)
    }

    /// Routes one availability report keyed by charger id, as the log file
    /// delivers them, to the charger's owning station.
    pub fn route_charger_report(
        &mut self,
        charger_id: u32,
        start: i64,
        end: i64,
        up: bool,
    ) -> Result<()> {
        let station_id = *self
            .chargers
            .get(&charger_id)
            .ok_or(UptimeError::UnknownCharger(charger_id))?;
        self.route_report(station_id, start, end, up)
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Computes the final uptime rows, ascending by station id.
    ///
    /// Fails fast on the first station whose percentage is undefined; a
    /// partial report is never produced.
    pub fn render(&self) -> Result<Vec<StationUptime>> {
        self.stations
            .iter()
            .map(|(&station_id, store)| {
                Ok(StationUptime {
                    station_id,
                    percent_uptime: store.percent_uptime()?,
                })
            })
            .collect()
    }

    /// Wraps [`Aggregator::render`] output with a generation timestamp.
    pub fn render_report(&self) -> Result<UptimeReport> {
        Ok(UptimeReport {
            generated_at: Utc::now(),
            stations: self.render()?,
        })
    }
}
