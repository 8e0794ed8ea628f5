//! Metric value classification and color encoding.
//!
//! The single implementation behind both the map markers and the stats
//! panel: a value maps to a three-level class and a CSS color, driven by
//! the thresholds in the metric registry.

use benchmap_models::MetricKey;
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

/// Solid color for values at or past the good threshold.
pub const GOOD_COLOR: &str = "#10b981";
/// Solid color for values at or past the bad threshold.
pub const DANGER_COLOR: &str = "#ef4444";
/// Color for absent values.
pub const NEUTRAL_COLOR: &str = "#6b7280";

/// Warning gradient endpoints: amber at the good edge, orange-red at the
/// bad edge.
const WARN_GOOD_EDGE: [f64; 3] = [245.0, 158.0, 11.0];
const WARN_BAD_EDGE: [f64; 3] = [234.0, 88.0, 12.0];

/// Qualitative classification of a metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ValueClass {
    /// At or past the good threshold.
    Good,
    /// Between the thresholds.
    Warning,
    /// At or past the bad threshold.
    Danger,
}

/// Classifies a metric value. Absent values have no class.
#[must_use]
pub fn value_class(value: Option<f64>, metric: MetricKey) -> Option<ValueClass> {
    let value = value?;
    let descriptor = metric.descriptor();
    let class = if descriptor.lower_is_better {
        if value <= descriptor.good_threshold {
            ValueClass::Good
        } else if value >= descriptor.bad_threshold {
            ValueClass::Danger
        } else {
            ValueClass::Warning
        }
    } else if value >= descriptor.good_threshold {
        ValueClass::Good
    } else if value <= descriptor.bad_threshold {
        ValueClass::Danger
    } else {
        ValueClass::Warning
    };
    Some(class)
}

/// How far a warning-range value sits toward the bad threshold, in (0, 1).
fn badness(value: f64, metric: MetricKey) -> f64 {
    let d = metric.descriptor();
    if d.lower_is_better {
        (value - d.good_threshold) / (d.bad_threshold - d.good_threshold)
    } else {
        (d.good_threshold - value) / (d.good_threshold - d.bad_threshold)
    }
}

/// Maps a metric value to its marker color: solid good/danger past the
/// thresholds, a linear RGB blend across the warning band, neutral gray
/// when absent.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn marker_color(value: Option<f64>, metric: MetricKey) -> String {
    let Some(value) = value else {
        return NEUTRAL_COLOR.to_owned();
    };
    match value_class(Some(value), metric) {
        Some(ValueClass::Good) => GOOD_COLOR.to_owned(),
        Some(ValueClass::Danger) => DANGER_COLOR.to_owned(),
        _ => {
            let t = badness(value, metric);
            let channel = |i: usize| {
                (WARN_GOOD_EDGE[i] + t * (WARN_BAD_EDGE[i] - WARN_GOOD_EDGE[i])).round() as u8
            };
            format!("rgb({},{},{})", channel(0), channel(1), channel(2))
        }
    }
}

/// Display color for a marker cluster: the classification of the mean of
/// the members' metric values, absent values excluded. A cluster with no
/// present values is neutral.
#[must_use]
pub fn cluster_color<I>(values: I, metric: MetricKey) -> String
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut sum = 0.0;
    let mut count: usize = 0;
    for value in values.into_iter().flatten() {
        sum += value;
        count += 1;
    }
    if count == 0 {
        marker_color(None, metric)
    } else {
        #[allow(clippy::cast_precision_loss)]
        marker_color(Some(sum / count as f64), metric)
    }
}
