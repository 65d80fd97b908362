//! The bundled reference-station directory and nearest-station resolution.
//!
//! The directory is a small static list shipped inside the binary; it is parsed
//! once at startup and never mutated afterwards. Nearest-station lookup is a
//! plain linear Haversine scan, which is both sufficient and exactly
//! deterministic for a list of this size.

use crate::geo::{distance_km, LatLon};
use crate::stations::error::StationDirectoryError;
use serde::{Deserialize, Serialize};

/// Raw station directory data, embedded at compile time.
const BUNDLED_STATIONS: &str = include_str!("../../data/stations.json");

/// A single reference weather station.
///
/// Carries everything the upstream clients need: the BOM observation feed URL,
/// the Area Administrative Code (AAC) used to filter the forecast XML, and the
/// monthly history CSV URL template with its `YYYYMM` placeholder.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Station {
    pub name: String,
    pub station_id: String,
    pub lat: f64,
    pub lon: f64,
    pub observation_url: String,
    pub aac: String,
    pub history_url_template: String,
}

impl Station {
    pub fn coordinate(&self) -> LatLon {
        LatLon(self.lat, self.lon)
    }
}

#[derive(Debug, Deserialize)]
struct StationFile {
    stations: Vec<Station>,
}

/// Read-only directory of reference stations, loaded once per process.
#[derive(Debug, Clone)]
pub struct StationDirectory {
    stations: Vec<Station>,
}

impl StationDirectory {
    /// Parses the station list bundled into the binary.
    pub fn bundled() -> Result<Self, StationDirectoryError> {
        Self::from_json(BUNDLED_STATIONS)
    }

    pub fn from_json(json: &str) -> Result<Self, StationDirectoryError> {
        let file: StationFile =
            serde_json::from_str(json).map_err(StationDirectoryError::DirectoryParse)?;
        Ok(Self {
            stations: file.stations,
        })
    }

    /// Builds a directory from an explicit station list. Used by tests and by
    /// deployments that override the bundled data.
    pub fn from_stations(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Finds the station closest to `point`, together with its distance in km.
    ///
    /// Contract: when two stations are equidistant, the one listed first in the
    /// directory wins (strict `<` comparison during the scan). Returns `None`
    /// for an empty directory; callers surface this as a "no weather station
    /// found" condition rather than an error.
    pub fn nearest(&self, point: LatLon) -> Option<(&Station, f64)> {
        let mut best: Option<(&Station, f64)> = None;
        for station in &self.stations {
            let dist = distance_km(point, station.coordinate());
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((station, dist)),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(name: &str, id: &str, lat: f64, lon: f64) -> Station {
        Station {
            name: name.to_string(),
            station_id: id.to_string(),
            lat,
            lon,
            observation_url: format!("http://example.invalid/{id}.json"),
            aac: "WA_PT053".to_string(),
            history_url_template: format!("http://example.invalid/YYYYMM/{id}.csv"),
        }
    }

    #[test]
    fn bundled_directory_is_non_empty() {
        let directory = StationDirectory::bundled().unwrap();
        assert!(!directory.is_empty());
    }

    #[test]
    fn nearest_returns_exact_station_for_its_own_coordinates() {
        let directory = StationDirectory::bundled().unwrap();
        let target = &directory.stations()[0];
        let (found, dist) = directory.nearest(target.coordinate()).unwrap();
        assert_eq!(found.station_id, target.station_id);
        assert!(dist < 1e-6);
    }

    #[test]
    fn nearest_on_empty_directory_is_none() {
        let directory = StationDirectory::from_stations(vec![]);
        assert!(directory.nearest(LatLon(-31.9, 115.9)).is_none());
    }

    #[test]
    fn equidistant_tie_goes_to_first_listed_station() {
        // Two stations mirrored east/west of the query point.
        let directory = StationDirectory::from_stations(vec![
            station("West", "W1", -31.9, 115.8),
            station("East", "E1", -31.9, 116.0),
        ]);
        let (found, _) = directory.nearest(LatLon(-31.9, 115.9)).unwrap();
        assert_eq!(found.station_id, "W1");
    }
}
