//! Conversion of raw API rows into canonical [`Building`] records.
//!
//! Rows without coordinates, or with coordinates outside the NYC bounding
//! box, are dropped and counted. Everything else degrades field by field:
//! a bad numeric becomes `None`, a missing string becomes its default.

use benchmap_models::{Building, NOT_SPECIFIED};
use serde_json::Value;

use crate::parsing::{normalize_borough, parse_num};

/// NYC bounding box. Rows outside it are self-reported garbage
/// (geocoding failures, swapped coordinates).
const LAT_MIN: f64 = 40.4;
const LAT_MAX: f64 = 41.0;
const LNG_MIN: f64 = -74.3;
const LNG_MAX: f64 = -73.5;

fn num_field(row: &Value, key: &str) -> Option<f64> {
    row.get(key).and_then(parse_num)
}

fn str_field<'a>(row: &'a Value, key: &str) -> Option<&'a str> {
    row.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Renders an id-like or year-like field as a string, whether the source
/// sent it as a string or a bare number.
fn string_of(row: &Value, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn property_type(row: &Value) -> String {
    let raw = str_field(row, "primary_property_type_self")
        .or_else(|| str_field(row, "largest_property_use_type"));
    match raw {
        Some(t) if !t.eq_ignore_ascii_case("n/a") && !t.eq_ignore_ascii_case("not available") => {
            t.to_owned()
        }
        _ => NOT_SPECIFIED.to_owned(),
    }
}

/// Normalizes one raw row. Returns `None` when the row has no usable
/// coordinates; every other data-quality problem degrades to a default.
///
/// Deterministic and side-effect-free. `index` only seeds the synthetic id
/// fallback, scoped to the batch.
#[must_use]
pub fn normalize_row(row: &Value, index: usize) -> Option<Building> {
    let lat = num_field(row, "latitude")?;
    let lng = num_field(row, "longitude")?;
    if !(LAT_MIN..=LAT_MAX).contains(&lat) || !(LNG_MIN..=LNG_MAX).contains(&lng) {
        return None;
    }

    // Self-reported GFA preferred; a zero there is as good as missing.
    let self_reported = num_field(row, "property_gfa_self_reported");
    let floor_area = match self_reported {
        Some(v) if v != 0.0 => Some(v),
        _ => num_field(row, "property_gfa_calculated"),
    };

    let wui = match (num_field(row, "water_use_all_water_sources"), floor_area) {
        (Some(water_use), Some(area)) if area > 0.0 => Some(water_use * 1000.0 / area),
        _ => None,
    };

    Some(Building {
        id: string_of(row, "property_id").unwrap_or_else(|| format!("bldg-{index}")),
        name: str_field(row, "property_name")
            .unwrap_or("Unknown Building")
            .to_owned(),
        address: str_field(row, "address_1").unwrap_or_default().to_owned(),
        borough: normalize_borough(str_field(row, "borough")),
        bbl: str_field(row, "nyc_borough_block_and_lot")
            .unwrap_or_default()
            .to_owned(),
        bin: str_field(row, "nyc_building_identification")
            .unwrap_or_default()
            .to_owned(),
        lat,
        lng,
        year_built: num_field(row, "year_built"),
        property_type: property_type(row),
        floor_area,
        site_eui: num_field(row, "site_eui_kbtu_ft"),
        source_eui: num_field(row, "source_eui_kbtu_ft"),
        wui,
        ghg_intensity: num_field(row, "total_location_based_ghg_1"),
        energy_star_score: num_field(row, "energy_star_score"),
        data_year: string_of(row, "report_year").unwrap_or_default(),
    })
}

/// Normalizes a whole raw batch, returning the retained buildings in source
/// order plus the count of rows excluded for missing or invalid
/// coordinates.
#[must_use]
pub fn normalize_batch(rows: &[Value]) -> (Vec<Building>, u64) {
    let mut buildings = Vec::with_capacity(rows.len());
    let mut excluded: u64 = 0;

    for (index, row) in rows.iter().enumerate() {
        match normalize_row(row, index) {
            Some(building) => buildings.push(building),
            None => excluded += 1,
        }
    }

    (buildings, excluded)
}
