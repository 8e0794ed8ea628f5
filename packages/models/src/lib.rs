#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Canonical data model for the building energy benchmarking map.
//!
//! This crate defines the validated [`Building`] record that every raw API
//! row is normalized into, the [`MetricKey`] registry of scored quantities
//! with their classification thresholds, and the filter criteria types
//! shared by the engine and the server.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// NYC borough, normalized from the many spellings the source data uses.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(serialize_all = "title_case")]
pub enum Borough {
    /// Manhattan (also "MN", "NEW YORK", "NY" in source data)
    Manhattan,
    /// Brooklyn (also "BK", "KINGS")
    Brooklyn,
    /// Queens (also "QN", "QNS")
    Queens,
    /// The Bronx (also "BX", "THE BRONX")
    Bronx,
    /// Staten Island (also "SI", "RICHMOND", "STATEN IS")
    #[serde(rename = "Staten Island")]
    StatenIsland,
    /// Borough missing or unrecognized
    Unknown,
}

/// A validated building benchmarking record for one reporting year.
///
/// Produced by the normalizer and immutable afterwards. Every retained
/// record has finite coordinates inside the NYC bounding box, and every
/// numeric field is either a finite value or `None` (never NaN, never a
/// string).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    /// Stable identifier from the source, or a synthetic `bldg-{index}`
    /// token scoped to the ingested batch. Not unique across years.
    pub id: String,
    /// Property name ("Unknown Building" when absent).
    pub name: String,
    /// Street address (empty when absent).
    pub address: String,
    /// Normalized borough.
    pub borough: Borough,
    /// NYC borough-block-and-lot identifier (empty when absent).
    pub bbl: String,
    /// NYC building identification number (empty when absent).
    pub bin: String,
    /// Latitude (WGS84), inside [40.4, 41.0].
    pub lat: f64,
    /// Longitude (WGS84), inside [-74.3, -73.5].
    pub lng: f64,
    /// Year the building was constructed.
    pub year_built: Option<f64>,
    /// Primary property type, or the "Not Specified" sentinel.
    pub property_type: String,
    /// Gross floor area in square feet. Self-reported value preferred,
    /// calculated value used when self-reported is absent or zero.
    pub floor_area: Option<f64>,
    /// Site Energy Use Intensity (kBtu/ft²).
    pub site_eui: Option<f64>,
    /// Source Energy Use Intensity (kBtu/ft²).
    pub source_eui: Option<f64>,
    /// Water Use Intensity (gal/ft²), derived as
    /// `water_use * 1000 / floor_area` at normalization time.
    pub wui: Option<f64>,
    /// Location-based greenhouse gas intensity (kgCO₂e/ft²).
    pub ghg_intensity: Option<f64>,
    /// ENERGY STAR score (1-100).
    pub energy_star_score: Option<f64>,
    /// Reporting year, canonically a string (e.g. `"2024"`).
    pub data_year: String,
}

/// The property type sentinel used when the source omits one.
pub const NOT_SPECIFIED: &str = "Not Specified";

/// One of the four scored metrics shown on the map.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MetricKey {
    /// Source Energy Use Intensity
    Eui,
    /// Water Use Intensity (derived)
    Wui,
    /// Greenhouse gas intensity
    Ghg,
    /// ENERGY STAR score (higher is better)
    Star,
}

/// Static description of a metric: legend text plus the thresholds that
/// drive classification and marker coloring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDescriptor {
    /// Legend label.
    pub label: &'static str,
    /// Display unit.
    pub unit: &'static str,
    /// Values at or past this threshold (in the good direction) are "good".
    pub good_threshold: f64,
    /// Values at or past this threshold (in the bad direction) are "danger".
    pub bad_threshold: f64,
    /// Whether smaller values are better. `false` only for the star score.
    pub lower_is_better: bool,
}

const EUI_DESCRIPTOR: MetricDescriptor = MetricDescriptor {
    label: "Source EUI (kBtu/ft²)",
    unit: "kBtu/ft²",
    good_threshold: 100.0,
    bad_threshold: 200.0,
    lower_is_better: true,
};

const WUI_DESCRIPTOR: MetricDescriptor = MetricDescriptor {
    label: "Water Use Intensity (gal/ft²)",
    unit: "gal/ft²",
    good_threshold: 30.0,
    bad_threshold: 80.0,
    lower_is_better: true,
};

const GHG_DESCRIPTOR: MetricDescriptor = MetricDescriptor {
    label: "GHG Intensity (kgCO₂e/ft²)",
    unit: "kgCO₂e/ft²",
    good_threshold: 5.0,
    bad_threshold: 10.0,
    lower_is_better: true,
};

const STAR_DESCRIPTOR: MetricDescriptor = MetricDescriptor {
    label: "ENERGY STAR® Rating (1-100)",
    unit: "1-100",
    good_threshold: 75.0,
    bad_threshold: 50.0,
    lower_is_better: false,
};

impl MetricKey {
    /// Returns all metrics in display order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Eui, Self::Wui, Self::Ghg, Self::Star]
    }

    /// Returns the static descriptor for this metric.
    #[must_use]
    pub const fn descriptor(self) -> &'static MetricDescriptor {
        match self {
            Self::Eui => &EUI_DESCRIPTOR,
            Self::Wui => &WUI_DESCRIPTOR,
            Self::Ghg => &GHG_DESCRIPTOR,
            Self::Star => &STAR_DESCRIPTOR,
        }
    }

    /// Reads this metric's value from a building record.
    #[must_use]
    pub fn value_of(self, building: &Building) -> Option<f64> {
        match self {
            Self::Eui => building.source_eui,
            Self::Wui => building.wui,
            Self::Ghg => building.ghg_intensity,
            Self::Star => building.energy_star_score,
        }
    }

    /// Whether a value is inside this metric's plausibility band and may
    /// contribute to summary means. Self-reported data contains wild
    /// outliers (EUI in the millions), which would dominate an average.
    #[must_use]
    pub fn plausible(self, value: f64) -> bool {
        match self {
            Self::Eui => value > 0.0 && value < 10_000.0,
            Self::Wui => value > 0.0 && value < 1_000.0,
            Self::Ghg => value > 0.0 && value < 100.0,
            Self::Star => (1.0..=100.0).contains(&value),
        }
    }
}

/// An inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

/// Dataset-wide natural bounds for the range filters, computed once after
/// ingestion and never mutated by filtering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRanges {
    /// Exact min/max over present `year_built` values.
    pub year_built: MinMax,
    /// 0 to the true max floor area rounded up to the next whole million.
    pub floor_area: MinMax,
}

impl Default for DataRanges {
    fn default() -> Self {
        Self {
            year_built: MinMax {
                min: 1700.0,
                max: 2025.0,
            },
            floor_area: MinMax {
                min: 0.0,
                max: 15_000_000.0,
            },
        }
    }
}

/// Property type selection: all types, no types, or an explicit set.
///
/// Replaces the (select-all flag, selected list) pair with a tagged variant
/// so "no types selected" is a real state instead of an implicit invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "types")]
pub enum TypeSelection {
    /// Every property type passes.
    All,
    /// No property type passes.
    None,
    /// Only the named property types pass.
    Selected(BTreeSet<String>),
}

impl Default for TypeSelection {
    fn default() -> Self {
        Self::All
    }
}

impl TypeSelection {
    /// Whether a building with this property type passes the selection.
    #[must_use]
    pub fn matches(&self, property_type: &str) -> bool {
        match self {
            Self::All => true,
            Self::None => false,
            Self::Selected(types) => types.contains(property_type),
        }
    }

    /// Toggles the select-all control: from [`Self::All`] everything is
    /// deselected; from any other state everything is selected.
    pub fn toggle_all(&mut self) {
        *self = match self {
            Self::All => Self::None,
            Self::None | Self::Selected(_) => Self::All,
        };
    }

    /// Toggles a single property type. From [`Self::All`], the clicked type
    /// becomes the only selected one. Deselecting the last remaining type
    /// collapses back to [`Self::All`].
    pub fn toggle(&mut self, property_type: &str) {
        match self {
            Self::All | Self::None => {
                *self = Self::Selected(BTreeSet::from([property_type.to_owned()]));
            }
            Self::Selected(types) => {
                if !types.remove(property_type) {
                    types.insert(property_type.to_owned());
                }
                if types.is_empty() {
                    *self = Self::All;
                }
            }
        }
    }
}

/// The full set of active user-selected constraints.
///
/// Seeded from [`DataRanges`] and the default year once ingestion completes,
/// then merged per interaction. Range bounds are inclusive; buildings with
/// an absent value always pass the corresponding range predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Restrict to one borough, or `None` for all.
    pub borough: Option<Borough>,
    /// Reporting year partition (mandatory, canonical string).
    pub year: String,
    /// Inclusive lower bound on `year_built`.
    pub year_built_min: f64,
    /// Inclusive upper bound on `year_built`.
    pub year_built_max: f64,
    /// Inclusive lower bound on `floor_area`.
    pub floor_area_min: f64,
    /// Inclusive upper bound on `floor_area`.
    pub floor_area_max: f64,
    /// Inclusive lower bound on `energy_star_score`.
    pub star_min: f64,
    /// Inclusive upper bound on `energy_star_score`.
    pub star_max: f64,
    /// Exclude buildings without an ENERGY STAR score.
    pub energy_star_only: bool,
    /// Case-insensitive substring match over name, address, and BBL.
    pub search: String,
    /// Property type selection.
    pub types: TypeSelection,
}

impl FilterCriteria {
    /// Returns the criteria as seeded right after ingestion: no borough, no
    /// search, all types, ranges at the dataset's natural bounds.
    #[must_use]
    pub fn defaults(ranges: &DataRanges, year: &str) -> Self {
        Self {
            borough: None,
            year: year.to_owned(),
            year_built_min: ranges.year_built.min,
            year_built_max: ranges.year_built.max,
            floor_area_min: ranges.floor_area.min,
            floor_area_max: ranges.floor_area.max,
            star_min: 1.0,
            star_max: 100.0,
            energy_star_only: false,
            search: String::new(),
            types: TypeSelection::All,
        }
    }
}

/// Mean and sample size for one metric over a filtered subset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricStat {
    /// Arithmetic mean over plausible present values, or `None` when no
    /// value qualified.
    pub mean: Option<f64>,
    /// Number of values that contributed to the mean.
    pub sample_count: usize,
}

/// Summary statistics over a filtered subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Per-metric mean and sample size.
    pub metrics: BTreeMap<MetricKey, MetricStat>,
    /// Size of the filtered subset.
    pub filtered_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borough_displays_with_spaces() {
        assert_eq!(Borough::StatenIsland.to_string(), "Staten Island");
        assert_eq!(Borough::Manhattan.to_string(), "Manhattan");
    }

    #[test]
    fn borough_parses_display_form() {
        assert_eq!(
            "Staten Island".parse::<Borough>().unwrap(),
            Borough::StatenIsland
        );
        assert_eq!("Bronx".parse::<Borough>().unwrap(), Borough::Bronx);
    }

    #[test]
    fn metric_key_round_trips_as_string() {
        for key in MetricKey::all() {
            assert_eq!(key.to_string().parse::<MetricKey>().unwrap(), key);
        }
        assert_eq!("star".parse::<MetricKey>().unwrap(), MetricKey::Star);
    }

    #[test]
    fn star_plausibility_band_is_inclusive() {
        assert!(MetricKey::Star.plausible(1.0));
        assert!(MetricKey::Star.plausible(100.0));
        assert!(!MetricKey::Star.plausible(0.0));
        assert!(!MetricKey::Star.plausible(101.0));
    }

    #[test]
    fn eui_plausibility_band_is_exclusive() {
        assert!(!MetricKey::Eui.plausible(0.0));
        assert!(MetricKey::Eui.plausible(9_999.9));
        assert!(!MetricKey::Eui.plausible(10_000.0));
    }

    #[test]
    fn type_selection_defaults_to_all() {
        let selection = TypeSelection::default();
        assert!(selection.matches("Office"));
        assert!(selection.matches("Not Specified"));
    }

    #[test]
    fn toggle_from_all_selects_only_that_type() {
        let mut selection = TypeSelection::All;
        selection.toggle("Office");
        assert!(selection.matches("Office"));
        assert!(!selection.matches("Hotel"));
    }

    #[test]
    fn deselecting_last_type_collapses_to_all() {
        let mut selection = TypeSelection::All;
        selection.toggle("Office");
        selection.toggle("Office");
        assert_eq!(selection, TypeSelection::All);
    }

    #[test]
    fn toggle_all_cycles_all_and_none() {
        let mut selection = TypeSelection::All;
        selection.toggle_all();
        assert_eq!(selection, TypeSelection::None);
        assert!(!selection.matches("Office"));
        selection.toggle_all();
        assert_eq!(selection, TypeSelection::All);
    }

    #[test]
    fn toggle_from_none_selects_that_type() {
        let mut selection = TypeSelection::None;
        selection.toggle("Hotel");
        assert!(selection.matches("Hotel"));
        assert!(!selection.matches("Office"));
    }

    #[test]
    fn toggling_second_type_keeps_first() {
        let mut selection = TypeSelection::All;
        selection.toggle("Office");
        selection.toggle("Hotel");
        assert!(selection.matches("Office"));
        assert!(selection.matches("Hotel"));
        assert!(!selection.matches("Retail"));
    }

    #[test]
    fn default_criteria_use_dataset_ranges() {
        let ranges = DataRanges::default();
        let criteria = FilterCriteria::defaults(&ranges, "2024");
        assert_eq!(criteria.year, "2024");
        assert!((criteria.year_built_min - 1700.0).abs() < f64::EPSILON);
        assert!((criteria.floor_area_max - 15_000_000.0).abs() < f64::EPSILON);
        assert!((criteria.star_min - 1.0).abs() < f64::EPSILON);
        assert!(!criteria.energy_star_only);
    }
}
