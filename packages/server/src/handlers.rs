//! HTTP handler functions for the benchmarking map API.
//!
//! Filter criteria are decoded from query parameters on every request,
//! merged over defaults seeded from the dataset ranges. A malformed
//! numeric parameter is ignored and its seeded default kept, so a bad
//! input can narrow nothing but never fail a request.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, web};
use benchmap_engine::classify::{ValueClass, marker_color, value_class};
use benchmap_engine::{filter, ranges, stats};
use benchmap_export::{csv_string, export_filename};
use benchmap_models::{
    Borough, Building, DataRanges, FilterCriteria, MetricDescriptor, MetricKey, TypeSelection,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Filter and metric selection as it arrives on the query string.
///
/// Numeric fields are strings here so a malformed value degrades to the
/// seeded default instead of rejecting the whole request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    /// Reporting year partition.
    pub year: Option<String>,
    /// Borough display name (e.g. `"Staten Island"`).
    pub borough: Option<String>,
    /// Inclusive year-built bounds.
    pub year_built_min: Option<String>,
    /// Inclusive year-built bounds.
    pub year_built_max: Option<String>,
    /// Inclusive floor-area bounds.
    pub floor_area_min: Option<String>,
    /// Inclusive floor-area bounds.
    pub floor_area_max: Option<String>,
    /// Inclusive ENERGY STAR bounds.
    pub star_min: Option<String>,
    /// Inclusive ENERGY STAR bounds.
    pub star_max: Option<String>,
    /// `"true"`/`"1"` to exclude buildings without a score.
    pub energy_star_only: Option<String>,
    /// Free-text search over name, address, and BBL.
    pub search: Option<String>,
    /// Comma-separated property types. Absent means all types; present but
    /// empty means no types.
    pub types: Option<String>,
    /// Metric for coloring (`eui`, `wui`, `ghg`, `star`).
    pub metric: Option<String>,
}

fn parse_bound(raw: Option<&String>) -> Option<f64> {
    raw?.trim().replace(',', "").parse::<f64>().ok()
}

fn parse_flag(raw: Option<&String>) -> Option<bool> {
    let raw = raw?.trim();
    Some(raw.eq_ignore_ascii_case("true") || raw == "1")
}

/// Merges the request's parameters over the seeded defaults.
#[must_use]
pub fn criteria_from(params: &FilterParams, ranges: &DataRanges, default_year: &str) -> FilterCriteria {
    let mut criteria = FilterCriteria::defaults(ranges, default_year);

    if let Some(year) = params.year.as_deref().map(str::trim).filter(|y| !y.is_empty()) {
        criteria.year = year.to_owned();
    }
    criteria.borough = params
        .borough
        .as_deref()
        .and_then(|raw| raw.trim().parse::<Borough>().ok());

    if let Some(v) = parse_bound(params.year_built_min.as_ref()) {
        criteria.year_built_min = v;
    }
    if let Some(v) = parse_bound(params.year_built_max.as_ref()) {
        criteria.year_built_max = v;
    }
    if let Some(v) = parse_bound(params.floor_area_min.as_ref()) {
        criteria.floor_area_min = v;
    }
    if let Some(v) = parse_bound(params.floor_area_max.as_ref()) {
        criteria.floor_area_max = v;
    }
    if let Some(v) = parse_bound(params.star_min.as_ref()) {
        criteria.star_min = v;
    }
    if let Some(v) = parse_bound(params.star_max.as_ref()) {
        criteria.star_max = v;
    }
    if let Some(flag) = parse_flag(params.energy_star_only.as_ref()) {
        criteria.energy_star_only = flag;
    }
    if let Some(search) = &params.search {
        criteria.search = search.trim().to_owned();
    }

    criteria.types = match params.types.as_deref() {
        None => TypeSelection::All,
        Some(raw) => {
            let types: std::collections::BTreeSet<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned)
                .collect();
            if types.is_empty() {
                TypeSelection::None
            } else {
                TypeSelection::Selected(types)
            }
        }
    };

    criteria
}

fn metric_from(params: &FilterParams) -> MetricKey {
    params
        .metric
        .as_deref()
        .and_then(|raw| raw.trim().parse::<MetricKey>().ok())
        .unwrap_or(MetricKey::Eui)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiHealth {
    healthy: bool,
    version: String,
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiTypeCount {
    name: String,
    count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiMeta<'a> {
    years: &'a [String],
    default_year: &'a str,
    ranges: DataRanges,
    property_types: &'a [String],
    type_counts: Vec<ApiTypeCount>,
    metrics: BTreeMap<MetricKey, &'static MetricDescriptor>,
    excluded_count: u64,
    total_count: usize,
}

/// `GET /api/meta`
///
/// Everything the frontend needs to build its controls: available years,
/// slider bounds, property types with per-year counts, the metric legend
/// descriptors, and the excluded-row count.
pub async fn meta(state: web::Data<AppState>, params: web::Query<FilterParams>) -> HttpResponse {
    let year = params
        .year
        .as_deref()
        .map(str::trim)
        .filter(|y| !y.is_empty())
        .unwrap_or(&state.default_year);
    let partition = filter::year_partition(&state.buildings, year);

    let type_counts = ranges::property_type_counts(&partition)
        .into_iter()
        .map(|(name, count)| ApiTypeCount { name, count })
        .collect();

    let metrics = MetricKey::all()
        .into_iter()
        .map(|key| (key, key.descriptor()))
        .collect();

    HttpResponse::Ok().json(ApiMeta {
        years: &state.years,
        default_year: &state.default_year,
        ranges: state.ranges,
        property_types: &state.property_types,
        type_counts,
        metrics,
        excluded_count: state.excluded_count,
        total_count: state.buildings.len(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiBuilding<'a> {
    #[serde(flatten)]
    building: &'a Building,
    color: String,
    class: Option<ValueClass>,
}

/// `GET /api/buildings`
///
/// The filtered subset, each building carrying its marker color and class
/// for the requested metric.
pub async fn buildings(
    state: web::Data<AppState>,
    params: web::Query<FilterParams>,
) -> HttpResponse {
    let criteria = criteria_from(&params, &state.ranges, &state.default_year);
    let metric = metric_from(&params);

    let filtered = filter::apply(&state.buildings, &criteria);
    let payload: Vec<ApiBuilding<'_>> = filtered
        .into_iter()
        .map(|building| {
            let value = metric.value_of(building);
            ApiBuilding {
                building,
                color: marker_color(value, metric),
                class: value_class(value, metric),
            }
        })
        .collect();

    HttpResponse::Ok().json(payload)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiMetricStat {
    mean: Option<f64>,
    sample_count: usize,
    class: Option<ValueClass>,
    color: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiStats {
    metrics: BTreeMap<MetricKey, ApiMetricStat>,
    filtered_count: usize,
    year_total: usize,
}

/// `GET /api/stats`
///
/// Summary statistics over the filtered subset, plus the size of the
/// year partition for the "filtered of total" display.
pub async fn summary(state: web::Data<AppState>, params: web::Query<FilterParams>) -> HttpResponse {
    let criteria = criteria_from(&params, &state.ranges, &state.default_year);

    let filtered = filter::apply(&state.buildings, &criteria);
    let year_total = filter::year_partition(&state.buildings, &criteria.year).len();
    let summary = stats::summarize(&filtered);

    let metrics = summary
        .metrics
        .into_iter()
        .map(|(key, stat)| {
            let api_stat = ApiMetricStat {
                mean: stat.mean,
                sample_count: stat.sample_count,
                class: value_class(stat.mean, key),
                color: marker_color(stat.mean, key),
            };
            (key, api_stat)
        })
        .collect();

    HttpResponse::Ok().json(ApiStats {
        metrics,
        filtered_count: summary.filtered_count,
        year_total,
    })
}

/// `GET /api/export.csv`
///
/// The filtered subset as a CSV attachment.
pub async fn export(state: web::Data<AppState>, params: web::Query<FilterParams>) -> HttpResponse {
    let criteria = criteria_from(&params, &state.ranges, &state.default_year);
    let filtered = filter::apply(&state.buildings, &criteria);

    match csv_string(&filtered) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!(
                    "attachment; filename=\"{}\"",
                    export_filename(&criteria.year)
                ),
            ))
            .body(body),
        Err(err) => {
            log::error!("CSV export failed: {err}");
            HttpResponse::InternalServerError().body(format!("Export failed: {err}"))
        }
    }
}
