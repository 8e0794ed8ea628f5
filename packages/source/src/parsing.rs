//! Tolerant field parsing for raw benchmarking rows.
//!
//! The source data mixes native JSON numbers with formatted strings
//! (`"1,234.5"`), sentinel strings (`"Not Available"`, `"N/A"`), and plain
//! garbage. Absence is the uniform failure mode: nothing here returns an
//! error.

use benchmap_models::Borough;
use serde_json::Value;

/// Coerces a raw JSON value to a finite number.
///
/// Accepts native numbers and numeric strings (thousands separators
/// stripped). Empty strings, `"n/a"`, `"not available"` (case-insensitive),
/// and anything unparseable map to `None`.
#[must_use]
pub fn parse_num(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty()
                || s.eq_ignore_ascii_case("not available")
                || s.eq_ignore_ascii_case("n/a")
            {
                return None;
            }
            s.replace(',', "").parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

/// Normalizes the many borough spellings in the source data.
///
/// Unrecognized or missing values map to [`Borough::Unknown`].
#[must_use]
pub fn normalize_borough(raw: Option<&str>) -> Borough {
    let Some(raw) = raw else {
        return Borough::Unknown;
    };
    match raw.trim().to_uppercase().as_str() {
        "MANHATTAN" | "MN" | "NEW YORK" | "NY" => Borough::Manhattan,
        "BROOKLYN" | "BK" | "KINGS" => Borough::Brooklyn,
        "QUEENS" | "QN" | "QNS" => Borough::Queens,
        "BRONX" | "THE BRONX" | "BX" => Borough::Bronx,
        "STATEN ISLAND" | "SI" | "RICHMOND" | "STATEN IS" | "STATEN IS." => Borough::StatenIsland,
        _ => Borough::Unknown,
    }
}
