//! Dataset-wide derivations computed once after ingestion: natural bounds
//! for the range filters, the distinct property types and reporting years,
//! and per-type counts for the type list.

use std::collections::{BTreeMap, BTreeSet};

use benchmap_models::{Building, DataRanges, MinMax};

/// Scans the full dataset for the natural year-built and floor-area
/// bounds used to seed the range filters.
///
/// Year-built is the exact min/max over present values. Floor-area runs
/// from 0 to the true maximum rounded up to the next whole million, so the
/// slider gets round bounds. When a field has no present values, the
/// default bounds are kept.
#[must_use]
pub fn compute_ranges(dataset: &[Building]) -> DataRanges {
    let mut ranges = DataRanges::default();

    let year_builts = dataset.iter().filter_map(|b| b.year_built);
    if let Some(bounds) = min_max(year_builts) {
        ranges.year_built = bounds;
    }

    let floor_areas = dataset
        .iter()
        .filter_map(|b| b.floor_area)
        .filter(|&v| v >= 0.0);
    if let Some(bounds) = min_max(floor_areas) {
        ranges.floor_area = MinMax {
            min: 0.0,
            max: (bounds.max / 1_000_000.0).ceil() * 1_000_000.0,
        };
    }

    ranges
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<MinMax> {
    values.fold(None, |acc: Option<MinMax>, value| {
        Some(acc.map_or(
            MinMax {
                min: value,
                max: value,
            },
            |bounds| MinMax {
                min: bounds.min.min(value),
                max: bounds.max.max(value),
            },
        ))
    })
}

/// The sorted distinct property types present in the dataset.
#[must_use]
pub fn property_types(dataset: &[Building]) -> Vec<String> {
    dataset
        .iter()
        .map(|b| b.property_type.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The distinct reporting years, newest first. The first entry is the
/// default year for the year dropdown.
#[must_use]
pub fn available_years(dataset: &[Building]) -> Vec<String> {
    let mut years: Vec<String> = dataset
        .iter()
        .map(|b| b.data_year.clone())
        .filter(|y| !y.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    years.reverse();
    years
}

/// Per-type building counts over a year partition, most common first.
/// Computed before the other filters so every type stays visible in the
/// type list while filtering.
#[must_use]
pub fn property_type_counts(subset: &[&Building]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for building in subset {
        *counts.entry(building.property_type.as_str()).or_default() += 1;
    }
    let mut counted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_owned(), count))
        .collect();
    counted.sort_by(|a, b| b.1.cmp(&a.1));
    counted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::building;

    #[test]
    fn year_built_bounds_are_exact() {
        let mut a = building("a", "2024");
        a.year_built = Some(1890.0);
        let mut b = building("b", "2024");
        b.year_built = Some(2010.0);
        let c = building("c", "2024");

        let ranges = compute_ranges(&[a, b, c]);
        assert!((ranges.year_built.min - 1890.0).abs() < f64::EPSILON);
        assert!((ranges.year_built.max - 2010.0).abs() < f64::EPSILON);
    }

    #[test]
    fn floor_area_max_rounds_up_to_next_million() {
        let mut a = building("a", "2024");
        a.floor_area = Some(2_300_000.0);
        let mut b = building("b", "2024");
        b.floor_area = Some(40_000.0);

        let ranges = compute_ranges(&[a, b]);
        assert!((ranges.floor_area.min).abs() < f64::EPSILON);
        assert!((ranges.floor_area.max - 3_000_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn exact_million_maximum_is_kept() {
        let mut a = building("a", "2024");
        a.floor_area = Some(2_000_000.0);
        let ranges = compute_ranges(&[a]);
        assert!((ranges.floor_area.max - 2_000_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_dataset_keeps_default_bounds() {
        let ranges = compute_ranges(&[]);
        assert_eq!(ranges, DataRanges::default());

        // Present buildings but no values: still the defaults.
        let ranges = compute_ranges(&[building("a", "2024")]);
        assert_eq!(ranges, DataRanges::default());
    }

    #[test]
    fn property_types_are_sorted_and_distinct() {
        let mut a = building("a", "2024");
        a.property_type = "Hotel".to_owned();
        let b = building("b", "2024");
        let c = building("c", "2024");

        assert_eq!(property_types(&[a, b, c]), ["Hotel", "Office"]);
    }

    #[test]
    fn available_years_are_newest_first() {
        let data = vec![
            building("a", "2023"),
            building("b", "2024"),
            building("c", "2023"),
            building("d", ""),
        ];
        assert_eq!(available_years(&data), ["2024", "2023"]);
    }

    #[test]
    fn type_counts_are_most_common_first() {
        let mut a = building("a", "2024");
        a.property_type = "Hotel".to_owned();
        let b = building("b", "2024");
        let c = building("c", "2024");
        let data = vec![a, b, c];
        let refs: Vec<&benchmap_models::Building> = data.iter().collect();

        assert_eq!(
            property_type_counts(&refs),
            [("Office".to_owned(), 2), ("Hotel".to_owned(), 1)]
        );
    }
}
