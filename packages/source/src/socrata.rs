//! Paginated fetching from the NYC Open Data query API (Socrata v3).
//!
//! Pages are requested sequentially with a 1-based page number; a short or
//! empty page terminates the sequence. A failed page aborts the whole
//! ingestion with no partial dataset and no retry.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::normalize::normalize_batch;
use crate::{IngestResult, PageFetcher, SourceError};

const API_URL: &str = "https://data.cityofnewyork.us/api/v3/views/5zyy-y8am/query.json";
const APP_TOKEN: &str = "5U3PdX83pjEizBSCi3g28npTj";
const PAGE_SIZE: usize = 25_000;
const PAGE_DELAY_MS: u64 = 50;

const SELECT_FIELDS: [&str; 19] = [
    "property_id",
    "property_name",
    "address_1",
    "borough",
    "nyc_borough_block_and_lot",
    "nyc_building_identification",
    "latitude",
    "longitude",
    "year_built",
    "primary_property_type_self",
    "largest_property_use_type",
    "property_gfa_self_reported",
    "property_gfa_calculated",
    "site_eui_kbtu_ft",
    "source_eui_kbtu_ft",
    "energy_star_score",
    "total_location_based_ghg_1",
    "water_use_all_water_sources",
    "report_year",
];

/// Client for the benchmarking dataset on the NYC Open Data portal.
pub struct SocrataClient {
    client: reqwest::Client,
    api_url: String,
    page_size: usize,
}

impl SocrataClient {
    /// Creates a client for the live benchmarking dataset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: API_URL.to_owned(),
            page_size: PAGE_SIZE,
        }
    }
}

impl Default for SocrataClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for SocrataClient {
    async fn fetch_page(&self, page_number: u32) -> Result<Value, SourceError> {
        let body = json!({
            "query": format!("SELECT {}", SELECT_FIELDS.join(", ")),
            "page": {
                "pageNumber": page_number,
                "pageSize": self.page_size,
            },
            "includeSynthetic": false,
        });

        let response = self
            .client
            .post(&self.api_url)
            .header("X-App-Token", APP_TOKEN)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            log::error!("API error response: {text}");
            return Err(SourceError::Status {
                status: status.as_u16(),
                body: status.canonical_reason().unwrap_or_default().to_owned(),
            });
        }

        if text.trim().is_empty() {
            return Err(SourceError::EmptyResponse);
        }

        Ok(serde_json::from_str(&text)?)
    }

    fn page_size(&self) -> usize {
        self.page_size
    }
}

/// Extracts the row payload from a page response. The API has returned a
/// bare array, `{"data": [...]}`, and `{"rows": [...]}` at various times;
/// anything else falls back to the first array-valued property, or no rows.
#[must_use]
pub fn extract_rows(response: Value) -> Vec<Value> {
    match response {
        Value::Array(rows) => rows,
        Value::Object(mut map) => {
            for key in ["data", "rows"] {
                if matches!(map.get(key), Some(Value::Array(_)))
                    && let Some(Value::Array(rows)) = map.remove(key)
                {
                    return rows;
                }
            }
            // Map iteration is key-ordered, so with several array-valued
            // properties the alphabetically first one wins. Real responses
            // carry at most one.
            map.into_iter()
                .find_map(|(_, value)| match value {
                    Value::Array(rows) => Some(rows),
                    _ => None,
                })
                .unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

/// Fetches every page from the source, then normalizes the whole batch in
/// one pass.
///
/// Pages are requested strictly sequentially, with a short sleep between
/// pages so a shared runtime is not starved.
///
/// # Errors
///
/// Returns [`SourceError`] if any page fetch fails; nothing is returned
/// from the pages already collected.
pub async fn ingest_all<F: PageFetcher + ?Sized>(fetcher: &F) -> Result<IngestResult, SourceError> {
    let page_size = fetcher.page_size();
    let mut raw_rows: Vec<Value> = Vec::new();
    let mut page_number: u32 = 1;

    loop {
        log::info!(
            "Fetching page {page_number} ({} rows so far)",
            raw_rows.len()
        );
        let response = fetcher.fetch_page(page_number).await?;
        let rows = extract_rows(response);
        let count = rows.len();

        if count == 0 {
            break;
        }

        raw_rows.extend(rows);

        if count < page_size {
            break;
        }

        page_number += 1;
        tokio::time::sleep(Duration::from_millis(PAGE_DELAY_MS)).await;
    }

    let (buildings, excluded_count) = normalize_batch(&raw_rows);

    if excluded_count > 0 {
        log::warn!("{excluded_count} rows excluded (missing or invalid coordinates)");
    }
    log::info!(
        "Ingested {} buildings from {} raw rows",
        buildings.len(),
        raw_rows.len()
    );

    Ok(IngestResult {
        buildings,
        excluded_count,
    })
}
