//! Tiered retrieval: local store, then the remote API, then the offline
//! dataset.
//!
//! `DataService::fetch` is the one call the presentation layer makes. It
//! walks a fixed decision sequence and always returns a `DistrictData`;
//! every failure below it is logged and downgraded to "no rows".

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::api::RemoteSource;
use crate::cache::MetricStore;
use crate::metrics::{group_average, GroupAverage};
use crate::models::{
    sort_newest_first, DistrictData, MetricRecord, Provenance, RawMetric, FRESHNESS_WINDOW_HOURS,
};
use crate::offline::OfflineDataset;

/// Regions offered when neither the store nor the offline dataset knows any.
pub const DEFAULT_REGIONS: [&str; 6] = [
    "Uttar Pradesh",
    "Maharashtra",
    "Karnataka",
    "Tamil Nadu",
    "Bihar",
    "Rajasthan",
];

pub struct DataService<R> {
    store: MetricStore,
    offline: OfflineDataset,
    remote: R,
}

impl<R: RemoteSource> DataService<R> {
    pub fn new(store: MetricStore, offline: OfflineDataset, remote: R) -> Self {
        Self {
            store,
            offline,
            remote,
        }
    }

    pub fn store(&self) -> &MetricStore {
        &self.store
    }

    pub fn offline(&self) -> &OfflineDataset {
        &self.offline
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Best available records for one district.
    ///
    /// Blank input returns an empty result without touching any source.
    /// The remote source is called at most once.
    pub async fn fetch(&self, region: &str, sub_region: &str) -> DistrictData {
        let region = region.trim();
        let sub_region = sub_region.trim();
        if region.is_empty() || sub_region.is_empty() {
            debug!("Blank region or sub-region, nothing to fetch");
            return DistrictData::empty();
        }

        let now = Utc::now();

        // Valid cache
        let cached = self.cached_records(region, sub_region);
        if let Some(updated) = newest_update(&cached) {
            if now - updated < Duration::hours(FRESHNESS_WINDOW_HOURS) {
                debug!(region, sub_region, "Serving from cache");
                return DistrictData {
                    records: cached,
                    provenance: Provenance::Cached,
                    last_updated: Some(updated),
                };
            }
        }

        // Remote
        match self.remote.fetch_metrics(region, sub_region).await {
            Ok(rows) => {
                let records = matching_rows(rows, region, sub_region, now);
                if !records.is_empty() {
                    info!(region, sub_region, count = records.len(), "Fetched from API");
                    self.persist(&records);
                    return DistrictData {
                        records: sorted(records),
                        provenance: Provenance::Fresh,
                        last_updated: Some(now),
                    };
                }
                debug!(region, sub_region, "API returned no rows");
            }
            Err(e) => {
                warn!(region, sub_region, error = %e, "API fetch failed, falling back");
            }
        }

        // Stale cache
        let cached = self.cached_records(region, sub_region);
        if let Some(updated) = newest_update(&cached) {
            debug!(region, sub_region, "Serving stale cache");
            return DistrictData {
                records: cached,
                provenance: Provenance::Cached,
                last_updated: Some(updated),
            };
        }

        // Offline
        let records: Vec<MetricRecord> = self
            .offline
            .records_for(region, sub_region)
            .into_iter()
            .map(|raw| raw.stamp(now))
            .collect();
        if !records.is_empty() {
            info!(region, sub_region, count = records.len(), "Using offline dataset");
            self.persist(&records);
            return DistrictData {
                records: sorted(records),
                provenance: Provenance::Offline,
                last_updated: Some(now),
            };
        }

        info!(region, sub_region, "No data available from any source");
        DistrictData::empty()
    }

    /// `fetch` for each sub-region in turn, in the given order.
    pub async fn fetch_many(
        &self,
        region: &str,
        sub_regions: &[String],
    ) -> Vec<(String, DistrictData)> {
        let mut results = Vec::with_capacity(sub_regions.len());
        for sub_region in sub_regions {
            let data = self.fetch(region, sub_region).await;
            results.push((sub_region.clone(), data));
        }
        results
    }

    /// Regions for the picker.
    pub fn regions(&self) -> Vec<String> {
        let stored = self.store.regions().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to list stored regions");
            Vec::new()
        });
        if !stored.is_empty() {
            return stored;
        }
        let offline = self.offline.regions();
        if !offline.is_empty() {
            return offline;
        }
        DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect()
    }

    /// Sub-regions of `region` for the picker.
    pub fn sub_regions(&self, region: &str) -> Vec<String> {
        let stored = self.store.sub_regions(region).unwrap_or_else(|e| {
            warn!(region, error = %e, "Failed to list stored sub-regions");
            Vec::new()
        });
        if !stored.is_empty() {
            return stored;
        }
        self.offline.sub_regions(region)
    }

    /// Mean of every stored district of `region` for one month.
    pub fn region_average(&self, region: &str, year: i32, month: u32) -> Option<GroupAverage> {
        let records = self
            .store
            .records_for_period(region, year, month)
            .unwrap_or_else(|e| {
                warn!(region, year, month, error = %e, "Failed to read region period");
                Vec::new()
            });
        group_average(&records, region, year, month)
    }

    fn cached_records(&self, region: &str, sub_region: &str) -> Vec<MetricRecord> {
        self.store
            .records_for(region, sub_region)
            .unwrap_or_else(|e| {
                warn!(region, sub_region, error = %e, "Failed to read metric store");
                Vec::new()
            })
    }

    fn persist(&self, records: &[MetricRecord]) {
        if let Err(e) = self.store.upsert(records) {
            warn!(count = records.len(), error = %e, "Failed to persist records");
        }
    }
}

fn newest_update(records: &[MetricRecord]) -> Option<DateTime<Utc>> {
    records.iter().map(|r| r.updated_at).max()
}

fn sorted(mut records: Vec<MetricRecord>) -> Vec<MetricRecord> {
    sort_newest_first(&mut records);
    records
}

/// Keep remote rows for the requested district and store them under the
/// caller's spelling. The API upper-cases names in its filters and
/// responses.
fn matching_rows(
    rows: Vec<RawMetric>,
    region: &str,
    sub_region: &str,
    now: DateTime<Utc>,
) -> Vec<MetricRecord> {
    let total = rows.len();
    let records: Vec<MetricRecord> = rows
        .into_iter()
        .filter(|raw| {
            raw.is_valid()
                && raw.region.trim().eq_ignore_ascii_case(region)
                && raw.sub_region.trim().eq_ignore_ascii_case(sub_region)
        })
        .map(|raw| {
            RawMetric {
                region: region.to_string(),
                sub_region: sub_region.to_string(),
                ..raw
            }
            .stamp(now)
        })
        .collect();
    if records.len() < total {
        debug!(
            skipped = total - records.len(),
            "Ignored API rows for other districts or with invalid values"
        );
    }
    records
}
