//! Data models for district employment metrics.
//!
//! - `MetricRecord`, `RawMetric`: one month of scheme activity
//!   for one district, with and without its cache timestamp
//! - `DistrictData`, `Provenance`: what the retrieval policy hands back

pub mod district;
pub mod metric;

pub use district::{DistrictData, Provenance, FRESHNESS_WINDOW_HOURS};
pub use metric::{sort_newest_first, MetricRecord, RawMetric};
