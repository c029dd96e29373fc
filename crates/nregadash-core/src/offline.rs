//! Bundled offline dataset.
//!
//! A static JSON array of `RawMetric` rows compiled into the binary. It is
//! the last resort of the retrieval policy and the fallback source for the
//! region/district pickers when the local store is empty. A file on disk
//! can replace it.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::models::RawMetric;

/// Dataset embedded at build time.
const BUNDLED: &str = include_str!("../../../data/offline_data.json");

#[derive(Debug, Clone, Default)]
pub struct OfflineDataset {
    records: Vec<RawMetric>,
}

impl OfflineDataset {
    pub fn from_records(records: Vec<RawMetric>) -> Self {
        Self { records }
    }

    /// Parse a dataset from JSON text. Invalid rows are dropped.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<RawMetric> =
            serde_json::from_str(json).context("Failed to parse offline dataset")?;
        let total = records.len();
        let records: Vec<RawMetric> = records.into_iter().filter(RawMetric::is_valid).collect();
        if records.len() < total {
            warn!(
                dropped = total - records.len(),
                "Dropped invalid rows from offline dataset"
            );
        }
        Ok(Self { records })
    }

    /// Load the dataset from disk. A missing or unreadable file is an
    /// empty dataset, not an error.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(dataset) => {
                debug!(path = %path.display(), count = dataset.len(), "Loaded offline dataset");
                dataset
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Offline dataset unavailable");
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read offline dataset: {}", path.display()))?;
        Self::from_json(&contents)
    }

    /// The dataset compiled into the binary.
    pub fn bundled() -> Self {
        match Self::from_json(BUNDLED) {
            Ok(dataset) => dataset,
            Err(e) => {
                warn!(error = %e, "Bundled offline dataset is unreadable");
                Self::default()
            }
        }
    }

    /// `path` when given and non-empty, otherwise the bundled dataset.
    pub fn resolve(path: Option<&Path>) -> Self {
        if let Some(path) = path {
            let dataset = Self::load(path);
            if !dataset.is_empty() {
                return dataset;
            }
            warn!(path = %path.display(), "Falling back to bundled offline dataset");
        }
        Self::bundled()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows for one district.
    pub fn records_for(&self, region: &str, sub_region: &str) -> Vec<RawMetric> {
        self.records
            .iter()
            .filter(|r| r.region == region && r.sub_region == sub_region)
            .cloned()
            .collect()
    }

    /// Distinct regions, sorted.
    pub fn regions(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.records.iter().map(|r| r.region.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Distinct sub-regions of `region`, sorted.
    pub fn sub_regions(&self, region: &str) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .records
            .iter()
            .filter(|r| r.region == region)
            .map(|r| r.sub_region.as_str())
            .collect();
        set.into_iter().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"state": "Uttar Pradesh", "district": "Lucknow", "year": 2024, "month": 6,
         "households": 23450, "person_days": 420000, "expenditure": 58000000.0, "avg_wage": 235.5},
        {"state": "Uttar Pradesh", "district": "Agra", "year": 2024, "month": 6,
         "households": 18000, "person_days": 310000, "expenditure": 41000000.0, "avg_wage": 231.0},
        {"state": "Bihar", "district": "Patna", "year": 2024, "month": 6,
         "households": 30000, "person_days": 500000, "expenditure": 70000000.0, "avg_wage": 228.0},
        {"state": "Bihar", "district": "Gaya", "year": 2024, "month": 13,
         "households": 1, "person_days": 1, "expenditure": 1.0, "avg_wage": 1.0}
    ]"#;

    #[test]
    fn test_filters_by_district() {
        let dataset = OfflineDataset::from_json(SAMPLE).unwrap();
        let rows = dataset.records_for("Uttar Pradesh", "Lucknow");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].households, 23_450);
        assert!(dataset.records_for("Uttar Pradesh", "Kanpur").is_empty());
    }

    #[test]
    fn test_invalid_rows_dropped() {
        let dataset = OfflineDataset::from_json(SAMPLE).unwrap();
        assert_eq!(dataset.len(), 3);
        assert!(dataset.sub_regions("Bihar").iter().all(|d| d != "Gaya"));
    }

    #[test]
    fn test_region_listing() {
        let dataset = OfflineDataset::from_json(SAMPLE).unwrap();
        assert_eq!(dataset.regions(), vec!["Bihar", "Uttar Pradesh"]);
        assert_eq!(dataset.sub_regions("Uttar Pradesh"), vec!["Agra", "Lucknow"]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = OfflineDataset::load(&dir.path().join("nope.json"));
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_bundled_dataset_covers_default_regions() {
        let dataset = OfflineDataset::bundled();
        assert!(!dataset.is_empty());
        assert!(dataset.regions().iter().any(|r| r == "Uttar Pradesh"));
        assert!(!dataset.records_for("Uttar Pradesh", "Lucknow").is_empty());
    }

    #[test]
    fn test_resolve_prefers_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("override.json");
        std::fs::write(&path, SAMPLE).unwrap();
        let dataset = OfflineDataset::resolve(Some(&path));
        assert_eq!(dataset.len(), 3);
    }

    #[test]
    fn test_resolve_falls_back_to_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let bundled_len = OfflineDataset::bundled().len();
        assert_eq!(OfflineDataset::resolve(Some(&missing)).len(), bundled_len);
        assert_eq!(OfflineDataset::resolve(None).len(), bundled_len);
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(OfflineDataset::load(&path).is_empty());
    }
}
