use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::MetricRecord;

/// Cached data younger than this is served without asking the API.
pub const FRESHNESS_WINDOW_HOURS: i64 = 24;

/// Which tier of the retrieval policy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Just fetched from the remote API.
    Fresh,
    /// Served from the local store, possibly stale.
    Cached,
    /// Loaded from the bundled offline dataset.
    Offline,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Fresh => "fresh",
            Provenance::Cached => "cached",
            Provenance::Offline => "offline",
        }
    }
}

/// Result of one retrieval: records (newest first), where they came from,
/// and when they were last updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistrictData {
    pub records: Vec<MetricRecord>,
    pub provenance: Provenance,
    pub last_updated: Option<DateTime<Utc>>,
}

impl DistrictData {
    /// The "no data available" result.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            provenance: Provenance::Offline,
            last_updated: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&MetricRecord> {
        self.records.first()
    }

    /// True when the data is older than the freshness window.
    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Utc::now())
    }

    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        match self.last_updated {
            Some(updated) => now - updated >= Duration::hours(FRESHNESS_WINDOW_HOURS),
            None => true,
        }
    }

    /// Cached and offline results get a "showing cached data" banner.
    pub fn needs_banner(&self) -> bool {
        !self.is_empty() && self.provenance != Provenance::Fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_stale_and_has_no_banner() {
        let data = DistrictData::empty();
        assert!(data.is_empty());
        assert!(data.is_stale());
        assert!(!data.needs_banner());
        assert!(data.latest().is_none());
    }

    #[test]
    fn test_staleness_boundary() {
        let now = Utc::now();
        let mut data = DistrictData::empty();

        data.last_updated = Some(now - Duration::hours(23));
        assert!(!data.is_stale_at(now));

        data.last_updated = Some(now - Duration::hours(FRESHNESS_WINDOW_HOURS));
        assert!(data.is_stale_at(now));
    }

    #[test]
    fn test_provenance_serializes_lowercase() {
        let json = serde_json::to_string(&Provenance::Cached).unwrap();
        assert_eq!(json, "\"cached\"");
        assert_eq!(Provenance::Offline.as_str(), "offline");
    }
}
