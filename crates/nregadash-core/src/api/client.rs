//! API client for the data.gov.in open-data portal.
//!
//! The MGNREGA district-wise monthly performance dataset is published as a
//! resource on the portal and queried with `filters[...]` parameters. An
//! API key is required; without one the client fails fast so the caller
//! can fall back to cached or offline data.

use std::time::Duration;

use reqwest::{header, Client};
use tracing::{debug, warn};

use super::payload::ApiResponse;
use super::{ApiError, RemoteSource};
use crate::models::RawMetric;

// ============================================================================
// Constants
// ============================================================================

/// Base URL for resource endpoints
const API_BASE_URL: &str = "https://api.data.gov.in/resource";

/// District-wise MGNREGA data at a glance
pub const DEFAULT_RESOURCE_ID: &str = "ee03643a-ee4c-48c2-ac30-9f2ff26ab722";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Rows requested per call. A district has at most a few years of months.
const PAGE_LIMIT: u32 = 500;

/// API client for data.gov.in.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    api_key: Option<String>,
    resource_id: String,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client without credentials
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: None,
            resource_id: DEFAULT_RESOURCE_ID.to_string(),
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Set the portal API key. Blank keys are treated as absent.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = resource_id.into();
        self
    }

    /// Point the client at a different host, e.g. a portal mirror.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn resource_url(&self) -> String {
        format!("{}/{}", self.base_url, self.resource_id)
    }

    /// Query parameters for one district. The key is passed separately so
    /// it never ends up in logs.
    fn district_query(region: &str, sub_region: &str) -> Vec<(&'static str, String)> {
        vec![
            ("format", "json".to_string()),
            ("limit", PAGE_LIMIT.to_string()),
            ("filters[state_name]", region.to_uppercase()),
            ("filters[district_name]", sub_region.to_uppercase()),
        ]
    }

    /// Fetch all monthly rows for a district
    pub async fn fetch_district(
        &self,
        region: &str,
        sub_region: &str,
    ) -> Result<Vec<RawMetric>, ApiError> {
        let api_key = self.api_key.as_deref().ok_or(ApiError::MissingApiKey)?;
        let url = self.resource_url();

        debug!(url = %url, region, sub_region, "Fetching district metrics");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(&[("api-key", api_key)])
            .query(&Self::district_query(region, sub_region))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let text = response.text().await?;
        let parsed: ApiResponse = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse records: {}", e)))?;

        let total = parsed.records.len();
        let records: Vec<RawMetric> = parsed
            .records
            .iter()
            .filter_map(|r| r.to_raw(region, sub_region))
            .collect();

        if records.len() < total {
            warn!(
                skipped = total - records.len(),
                total,
                "Skipped API rows that could not be normalized"
            );
        }
        debug!(count = records.len(), "Fetched district metrics");

        Ok(records)
    }
}

impl RemoteSource for ApiClient {
    async fn fetch_metrics(
        &self,
        region: &str,
        sub_region: &str,
    ) -> Result<Vec<RawMetric>, ApiError> {
        self.fetch_district(region, sub_region).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_api_key_is_absent() {
        let client = ApiClient::new().unwrap().with_api_key(Some("   ".to_string()));
        assert!(!client.has_api_key());

        let client = client.with_api_key(Some("abc".to_string()));
        assert!(client.has_api_key());
    }

    #[test]
    fn test_resource_url() {
        let client = ApiClient::new()
            .unwrap()
            .with_base_url("http://localhost:9000/resource/")
            .with_resource_id("abc-123");
        assert_eq!(client.resource_url(), "http://localhost:9000/resource/abc-123");
    }

    #[test]
    fn test_district_query_uppercases_names() {
        let query = ApiClient::district_query("Uttar Pradesh", "Lucknow");
        assert!(query.contains(&("filters[state_name]", "UTTAR PRADESH".to_string())));
        assert!(query.contains(&("filters[district_name]", "LUCKNOW".to_string())));
        assert!(query.iter().all(|(k, _)| *k != "api-key"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = ApiClient::new().unwrap();
        let result = client.fetch_metrics("Bihar", "Patna").await;
        assert!(matches!(result, Err(ApiError::MissingApiKey)));
    }
}
