#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CSV export of a filtered building subset.
//!
//! One row per building under a fixed 15-column header, every field
//! quoted, EUI figures at one decimal place, WUI and GHG at two, absent
//! values as empty strings.

use std::io::Write;

use benchmap_models::Building;
use csv::{QuoteStyle, WriterBuilder};

/// Errors that can occur while writing an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The produced bytes were not valid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

const HEADERS: [&str; 15] = [
    "Name",
    "Address",
    "Borough",
    "BBL",
    "Type",
    "Year Built",
    "Floor Area",
    "Site EUI",
    "Source EUI",
    "WUI",
    "GHG Intensity",
    "ENERGY STAR Rating",
    "Report Year",
    "Lat",
    "Lng",
];

fn plain(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn fixed(value: Option<f64>, decimals: usize) -> String {
    value.map(|v| format!("{v:.decimals$}")).unwrap_or_default()
}

/// Writes the subset as CSV to the given writer.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization or the underlying write fails.
pub fn write_csv<W: Write>(buildings: &[&Building], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    csv_writer.write_record(HEADERS)?;

    for building in buildings {
        csv_writer.write_record([
            building.name.clone(),
            building.address.clone(),
            building.borough.to_string(),
            building.bbl.clone(),
            building.property_type.clone(),
            plain(building.year_built),
            plain(building.floor_area),
            fixed(building.site_eui, 1),
            fixed(building.source_eui, 1),
            fixed(building.wui, 2),
            fixed(building.ghg_intensity, 2),
            plain(building.energy_star_score),
            building.data_year.clone(),
            building.lat.to_string(),
            building.lng.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Renders the subset as an in-memory CSV string.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization fails.
pub fn csv_string(buildings: &[&Building]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(buildings, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// The download filename for an export of the given reporting year,
/// date-stamped like `nyc_building_energy_2024_2026-08-29.csv`.
#[must_use]
pub fn export_filename(year: &str) -> String {
    format!(
        "nyc_building_energy_{year}_{}.csv",
        chrono::Utc::now().format("%Y-%m-%d")
    )
}
