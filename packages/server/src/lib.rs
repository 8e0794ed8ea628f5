#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the building energy benchmarking map.
//!
//! Ingests the full benchmarking dataset at startup (or loads a snapshot),
//! then serves the filtered dataset, summary statistics, metadata, and CSV
//! export to the map frontend. Filter criteria arrive as query parameters
//! on each request; the dataset itself is immutable once the server is up,
//! so there is no shared mutable state.

pub mod handlers;

use benchmap_engine::ranges::{available_years, compute_ranges, property_types};
use benchmap_models::{Building, DataRanges};
use benchmap_source::IngestResult;

/// Shared application state: the post-ingest dataset and everything
/// derived from it exactly once.
pub struct AppState {
    /// All normalized buildings, in source order.
    pub buildings: Vec<Building>,
    /// Natural bounds for the range filters.
    pub ranges: DataRanges,
    /// Sorted distinct property types.
    pub property_types: Vec<String>,
    /// Distinct reporting years, newest first.
    pub years: Vec<String>,
    /// The year selected by default (newest available).
    pub default_year: String,
    /// Rows dropped at normalization time for missing or invalid
    /// coordinates.
    pub excluded_count: u64,
}

impl AppState {
    /// Builds the application state from an ingest result.
    ///
    /// Returns `None` when ingestion produced no valid buildings, so the
    /// caller can distinguish an empty dataset from a transport failure.
    #[must_use]
    pub fn from_ingest(result: IngestResult) -> Option<Self> {
        if result.buildings.is_empty() {
            return None;
        }

        let ranges = compute_ranges(&result.buildings);
        let types = property_types(&result.buildings);
        let years = available_years(&result.buildings);
        let default_year = years.first().cloned().unwrap_or_default();

        Some(Self {
            buildings: result.buildings,
            ranges,
            property_types: types,
            years,
            default_year,
            excluded_count: result.excluded_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use benchmap_models::Borough;

    use super::*;

    fn sample(id: &str, year: &str) -> Building {
        Building {
            id: id.to_owned(),
            name: format!("Building {id}"),
            address: String::new(),
            borough: Borough::Queens,
            bbl: String::new(),
            bin: String::new(),
            lat: 40.7,
            lng: -73.8,
            year_built: Some(1960.0),
            property_type: "Office".to_owned(),
            floor_area: Some(100_000.0),
            site_eui: None,
            source_eui: None,
            wui: None,
            ghg_intensity: None,
            energy_star_score: None,
            data_year: year.to_owned(),
        }
    }

    #[test]
    fn empty_ingest_is_a_distinct_terminal_state() {
        let result = IngestResult {
            buildings: Vec::new(),
            excluded_count: 12,
        };
        assert!(AppState::from_ingest(result).is_none());
    }

    #[test]
    fn default_year_is_the_newest() {
        let result = IngestResult {
            buildings: vec![sample("a", "2023"), sample("b", "2024")],
            excluded_count: 0,
        };
        let state = AppState::from_ingest(result).unwrap();
        assert_eq!(state.default_year, "2024");
        assert_eq!(state.years, ["2024", "2023"]);
        assert_eq!(state.property_types, ["Office"]);
    }
}
