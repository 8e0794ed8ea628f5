//! Summary statistics over a filtered subset.

use std::collections::BTreeMap;

use benchmap_models::{Building, MetricKey, MetricStat, Summary};

/// Computes per-metric means over a filtered subset.
///
/// Each metric's sample is restricted to present values inside its
/// plausibility band; a metric with no qualifying samples reports an
/// absent mean rather than dividing by zero.
#[must_use]
pub fn summarize(subset: &[&Building]) -> Summary {
    let mut metrics = BTreeMap::new();

    for key in MetricKey::all() {
        let mut sum = 0.0;
        let mut count: usize = 0;
        for building in subset {
            if let Some(value) = key.value_of(building)
                && key.plausible(value)
            {
                sum += value;
                count += 1;
            }
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = (count > 0).then(|| sum / count as f64);
        metrics.insert(
            key,
            MetricStat {
                mean,
                sample_count: count,
            },
        );
    }

    Summary {
        metrics,
        filtered_count: subset.len(),
    }
}

#[cfg(test)]
mod tests {
    use benchmap_models::Building;

    use super::*;
    use crate::testing::building;

    fn refs(data: &[Building]) -> Vec<&Building> {
        data.iter().collect()
    }

    #[test]
    fn mean_is_over_present_plausible_values() {
        let mut a = building("a", "2024");
        a.source_eui = Some(100.0);
        let mut b = building("b", "2024");
        b.source_eui = Some(200.0);
        let c = building("c", "2024");
        let data = vec![a, b, c];

        let summary = summarize(&refs(&data));
        let eui = &summary.metrics[&MetricKey::Eui];
        assert!((eui.mean.unwrap() - 150.0).abs() < f64::EPSILON);
        assert_eq!(eui.sample_count, 2);
        assert_eq!(summary.filtered_count, 3);
    }

    #[test]
    fn implausible_outliers_are_excluded() {
        let mut a = building("a", "2024");
        a.source_eui = Some(100.0);
        let mut b = building("b", "2024");
        b.source_eui = Some(2_000_000.0);
        let mut c = building("c", "2024");
        c.source_eui = Some(0.0);
        let data = vec![a, b, c];

        let eui = summarize(&refs(&data)).metrics[&MetricKey::Eui];
        assert!((eui.mean.unwrap() - 100.0).abs() < f64::EPSILON);
        assert_eq!(eui.sample_count, 1);
    }

    #[test]
    fn no_qualifying_samples_reports_absent_mean() {
        let data = vec![building("a", "2024")];
        let summary = summarize(&refs(&data));
        for key in MetricKey::all() {
            let stat = summary.metrics[&key];
            assert!(stat.mean.is_none());
            assert_eq!(stat.sample_count, 0);
        }
    }

    #[test]
    fn empty_subset_is_fine() {
        let summary = summarize(&[]);
        assert_eq!(summary.filtered_count, 0);
        assert!(summary.metrics[&MetricKey::Star].mean.is_none());
    }

    #[test]
    fn star_scores_use_the_inclusive_band() {
        let mut a = building("a", "2024");
        a.energy_star_score = Some(1.0);
        let mut b = building("b", "2024");
        b.energy_star_score = Some(100.0);
        let data = vec![a, b];

        let star = summarize(&refs(&data)).metrics[&MetricKey::Star];
        assert_eq!(star.sample_count, 2);
        assert!((star.mean.unwrap() - 50.5).abs() < f64::EPSILON);
    }
}
