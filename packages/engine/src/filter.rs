//! The filter engine: year partition plus a conjunctive predicate chain.
//!
//! Pure over its two inputs and order-preserving. Called in full on every
//! interaction; the dataset tops out in the low tens of thousands of rows,
//! so a full rescan is cheaper than maintaining indexes.

use benchmap_models::{Building, FilterCriteria};

/// Canonical-string year comparison. Years are normalized to trimmed
/// decimal strings at the ingestion boundary, so `"2024"` matches a source
/// value that arrived as the number `2024`.
fn year_matches(data_year: &str, filter_year: &str) -> bool {
    data_year.trim() == filter_year.trim()
}

/// Restricts the dataset to one reporting year, preserving order.
///
/// This is the mandatory first step of every filter pass, and also feeds
/// the "filtered of total" display and the property type list.
#[must_use]
pub fn year_partition<'a>(dataset: &'a [Building], year: &str) -> Vec<&'a Building> {
    dataset
        .iter()
        .filter(|building| year_matches(&building.data_year, year))
        .collect()
}

fn passes(building: &Building, criteria: &FilterCriteria) -> bool {
    if let Some(borough) = criteria.borough
        && building.borough != borough
    {
        return false;
    }

    // Range predicates: an absent value is "unknown, don't exclude".
    if let Some(year_built) = building.year_built
        && !(criteria.year_built_min..=criteria.year_built_max).contains(&year_built)
    {
        return false;
    }

    if let Some(floor_area) = building.floor_area
        && !(criteria.floor_area_min..=criteria.floor_area_max).contains(&floor_area)
    {
        return false;
    }

    if let Some(score) = building.energy_star_score
        && !(criteria.star_min..=criteria.star_max).contains(&score)
    {
        return false;
    }

    // Unlike the range predicate, this one treats absence as failing.
    if criteria.energy_star_only && building.energy_star_score.is_none() {
        return false;
    }

    if !criteria.types.matches(&building.property_type) {
        return false;
    }

    if !criteria.search.is_empty() {
        let query = criteria.search.to_lowercase();
        let haystack = [
            building.name.as_str(),
            building.address.as_str(),
            building.bbl.as_str(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
        if !haystack.contains(&query) {
            return false;
        }
    }

    true
}

/// Applies the full criteria to the dataset: year partition first, then
/// every other predicate as an independent AND-condition. Stable and
/// deterministic; calling it twice with the same inputs yields the same
/// subset in the same order.
#[must_use]
pub fn apply<'a>(dataset: &'a [Building], criteria: &FilterCriteria) -> Vec<&'a Building> {
    dataset
        .iter()
        .filter(|building| year_matches(&building.data_year, &criteria.year))
        .filter(|building| passes(building, criteria))
        .collect()
}

#[cfg(test)]
mod tests {
    use benchmap_models::{Borough, Building, DataRanges, FilterCriteria, TypeSelection};

    use super::*;
    use crate::testing::building;

    fn criteria(year: &str) -> FilterCriteria {
        FilterCriteria::defaults(&DataRanges::default(), year)
    }

    fn dataset() -> Vec<Building> {
        let mut a = building("a", "2023");
        a.name = "Empire State Building".to_owned();
        a.year_built = Some(1931.0);
        a.energy_star_score = Some(80.0);

        let mut b = building("b", "2023");
        b.borough = Borough::Brooklyn;
        b.address = "620 Atlantic Ave".to_owned();
        b.property_type = "Hotel".to_owned();
        b.floor_area = Some(250_000.0);

        let c = building("c", "2024");
        vec![a, b, c]
    }

    #[test]
    fn year_partition_is_mandatory_and_exact() {
        let data = dataset();
        let filtered = apply(&data, &criteria("2024"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "c");
    }

    #[test]
    fn year_matches_ignores_surrounding_whitespace() {
        let data = dataset();
        let filtered = apply(&data, &criteria(" 2023 "));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn preserves_dataset_order() {
        let data = dataset();
        let filtered = apply(&data, &criteria("2023"));
        let ids: Vec<&str> = filtered.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn identical_inputs_yield_identical_results() {
        let data = dataset();
        let c = criteria("2023");
        assert_eq!(apply(&data, &c), apply(&data, &c));
    }

    #[test]
    fn borough_filter_matches_exactly() {
        let data = dataset();
        let mut c = criteria("2023");
        c.borough = Some(Borough::Brooklyn);
        let filtered = apply(&data, &c);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "b");
    }

    #[test]
    fn absent_year_built_passes_every_range() {
        let mut b = building("x", "2023");
        b.year_built = None;
        let data = vec![b];

        for (min, max) in [(1700.0, 2025.0), (1900.0, 1901.0), (2025.0, 1700.0)] {
            let mut c = criteria("2023");
            c.year_built_min = min;
            c.year_built_max = max;
            assert_eq!(apply(&data, &c).len(), 1, "min={min} max={max}");
        }
    }

    #[test]
    fn year_built_range_is_inclusive() {
        let data = dataset();
        let mut c = criteria("2023");
        c.year_built_min = 1931.0;
        c.year_built_max = 1931.0;
        let filtered = apply(&data, &c);
        // "a" sits exactly on the bounds; "b" has no year_built and passes.
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn floor_area_range_excludes_out_of_range_values() {
        let data = dataset();
        let mut c = criteria("2023");
        c.floor_area_max = 100_000.0;
        let filtered = apply(&data, &c);
        // "b" (250k ft²) drops; "a" has no floor area and passes.
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "a");
    }

    #[test]
    fn star_range_excludes_but_absence_passes() {
        let data = dataset();
        let mut c = criteria("2023");
        c.star_min = 90.0;
        let filtered = apply(&data, &c);
        // "a" (score 80) drops; "b" (no score) passes.
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "b");
    }

    #[test]
    fn energy_star_only_excludes_absent_scores() {
        let data = dataset();
        let mut c = criteria("2023");
        c.energy_star_only = true;
        let filtered = apply(&data, &c);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "a");
    }

    #[test]
    fn type_selection_none_passes_nothing() {
        let data = dataset();
        let mut c = criteria("2023");
        c.types = TypeSelection::None;
        assert!(apply(&data, &c).is_empty());
    }

    #[test]
    fn type_selection_restricts_to_members() {
        let data = dataset();
        let mut c = criteria("2023");
        c.types = TypeSelection::Selected(["Hotel".to_owned()].into());
        let filtered = apply(&data, &c);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "b");
    }

    #[test]
    fn search_is_case_insensitive_over_name_address_bbl() {
        let data = dataset();

        let mut c = criteria("2023");
        c.search = "empire state".to_owned();
        let filtered = apply(&data, &c);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "a");

        c.search = "ATLANTIC".to_owned();
        let filtered = apply(&data, &c);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "b");

        c.search = "nowhere".to_owned();
        assert!(apply(&data, &c).is_empty());
    }

    #[test]
    fn predicates_compose_conjunctively() {
        let data = dataset();
        let mut c = criteria("2023");
        c.borough = Some(Borough::Brooklyn);
        c.types = TypeSelection::Selected(["Office".to_owned()].into());
        // "b" is Brooklyn but a Hotel; nothing satisfies both.
        assert!(apply(&data, &c).is_empty());
    }

    #[test]
    fn year_partition_matches_apply_with_defaults() {
        let data = dataset();
        assert_eq!(
            year_partition(&data, "2023").len(),
            apply(&data, &criteria("2023")).len()
        );
    }
}
