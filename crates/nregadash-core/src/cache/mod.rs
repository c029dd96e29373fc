//! Local metric store for offline data access.
//!
//! This module provides the `MetricStore`, a durable SQLite table of
//! district metrics keyed by (region, sub_region, year, month). Writes are
//! upserts, so the most recent write for a key wins. Rows are never
//! evicted; staleness is judged by the retrieval policy from `updated_at`.

pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::MetricStore;
