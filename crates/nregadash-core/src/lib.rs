//! Core library for nregadash.
//!
//! Everything the dashboard needs that isn't terminal rendering lives here:
//!
//! - `models`: `MetricRecord` and the retrieval result types
//! - `api`: data.gov.in client behind the `RemoteSource` trait
//! - `cache`: SQLite-backed `MetricStore`
//! - `offline`: bundled fallback dataset
//! - `retrieval`: `DataService`, the API → cache → offline policy
//! - `metrics`: deltas, averages and year-over-year arithmetic
//! - `i18n`, `summary`, `report`, `suggest`, `utils`: text output helpers
//! - `config`, `credentials`: user configuration and API key storage

pub mod api;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod i18n;
pub mod metrics;
pub mod models;
pub mod offline;
pub mod report;
pub mod retrieval;
pub mod suggest;
pub mod summary;
pub mod utils;

pub use api::{ApiClient, ApiError, RemoteSource};
pub use cache::{MetricStore, StoreError};
pub use config::Config;
pub use i18n::{Label, Language};
pub use models::{DistrictData, MetricRecord, Provenance, RawMetric};
pub use offline::OfflineDataset;
pub use retrieval::DataService;
