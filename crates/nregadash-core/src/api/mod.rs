//! Remote data source for district metrics.
//!
//! This module provides the `RemoteSource` seam used by the retrieval
//! policy and `ApiClient`, its implementation against the data.gov.in
//! open-data resource API.

pub mod client;
pub mod error;
pub mod payload;

use std::future::Future;

pub use client::ApiClient;
pub use error::ApiError;

use crate::models::RawMetric;

/// Anything that can supply metric rows for a district.
///
/// Implementations report failures as `ApiError`; the retrieval policy
/// treats every error the same as an empty answer.
pub trait RemoteSource {
    fn fetch_metrics(
        &self,
        region: &str,
        sub_region: &str,
    ) -> impl Future<Output = Result<Vec<RawMetric>, ApiError>> + Send;
}
