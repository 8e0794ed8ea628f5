#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Pure filter, classification, and summary engine.
//!
//! Everything in this crate is a deterministic function over explicit data:
//! no I/O, no shared state, and no error path. Absent values are ordinary
//! values (`Option<f64>`), so filtering and classification cannot fail,
//! only exclude or stay neutral.

pub mod classify;
pub mod filter;
pub mod ranges;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing {
    use benchmap_models::{Borough, Building};

    /// A valid Manhattan building with every metric absent; tests override
    /// the fields they care about.
    pub fn building(id: &str, year: &str) -> Building {
        Building {
            id: id.to_owned(),
            name: format!("Building {id}"),
            address: String::new(),
            borough: Borough::Manhattan,
            bbl: String::new(),
            bin: String::new(),
            lat: 40.75,
            lng: -73.98,
            year_built: None,
            property_type: "Office".to_owned(),
            floor_area: None,
            site_eui: None,
            source_eui: None,
            wui: None,
            ghg_intensity: None,
            energy_star_score: None,
            data_year: year.to_owned(),
        }
    }
}
