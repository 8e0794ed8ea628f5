#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Ingestion and normalization of NYC building energy benchmarking data.
//!
//! The [`socrata`] module pages through the NYC Open Data query API behind
//! the [`PageFetcher`] seam, and the [`normalize`] module turns the raw
//! rows into canonical [`Building`](benchmap_models::Building) records,
//! dropping rows without usable coordinates.

pub mod normalize;
pub mod parsing;
pub mod socrata;

use std::path::Path;

use async_trait::async_trait;
use benchmap_models::Building;
use serde::{Deserialize, Serialize};

/// Errors that can occur during ingestion.
///
/// Any of these aborts the whole load; no partial dataset is published.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (snapshot read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The API returned a non-success status.
    #[error("API error: {status} {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for the error display.
        body: String,
    },

    /// The API returned an empty response body.
    #[error("Empty response from API")]
    EmptyResponse,
}

/// The outcome of a full ingestion pass: every valid building plus the
/// count of rows dropped for missing or out-of-bounds coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResult {
    /// All normalized buildings, in source order.
    pub buildings: Vec<Building>,
    /// Rows rejected at normalization time.
    pub excluded_count: u64,
}

/// A paginated row source. Implemented by [`socrata::SocrataClient`] for
/// the live API and by in-memory fakes in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches one page of rows. Page numbers are 1-based.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails, the response status is
    /// not a success, or the body is empty or unparseable.
    async fn fetch_page(&self, page_number: u32) -> Result<serde_json::Value, SourceError>;

    /// The page size this fetcher requests. A page with fewer rows than
    /// this signals the last page.
    fn page_size(&self) -> usize;
}

/// Writes an ingest result to a JSON snapshot file so later runs can skip
/// the API.
///
/// # Errors
///
/// Returns [`SourceError`] if serialization or the write fails.
pub fn save_snapshot(path: &Path, result: &IngestResult) -> Result<(), SourceError> {
    let json = serde_json::to_string(result)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Loads a previously saved ingest snapshot.
///
/// # Errors
///
/// Returns [`SourceError`] if the read or parse fails.
pub fn load_snapshot(path: &Path) -> Result<IngestResult, SourceError> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
