//! Application state management for nregadash.
//!
//! This module contains the core `App` struct that holds UI state, the
//! current selection and the data last returned by the retrieval policy.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use nregadash_core::api::ApiClient;
use nregadash_core::metrics::{comparison_rows, ComparisonRow, GroupAverage};
use nregadash_core::report::write_report;
use nregadash_core::suggest::suggest_sub_regions;
use nregadash_core::{
    Config, DataService, DistrictData, Label, Language, MetricStore, OfflineDataset, RemoteSource,
};

// ============================================================================
// Constants
// ============================================================================

/// Number of rows to scroll on page up/down in the Data tab.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Directory reports are written to, relative to the working directory.
const REPORT_DIR: &str = "reports";

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Trends,
    Compare,
    Data,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Trends, Tab::Compare, Tab::Data];

    /// Translated tab title.
    pub fn label(&self) -> Label {
        match self {
            Tab::Overview => Label::PerformanceSummary,
            Tab::Trends => Label::YearOverYear,
            Tab::Compare => Label::CompareDistricts,
            Tab::Data => Label::MonthlyData,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Overview => Tab::Trends,
            Tab::Trends => Tab::Compare,
            Tab::Compare => Tab::Data,
            Tab::Data => Tab::Overview,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Tab::Overview => Tab::Data,
            Tab::Trends => Tab::Overview,
            Tab::Compare => Tab::Trends,
            Tab::Data => Tab::Compare,
        }
    }
}

/// Which picker has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Region,
    SubRegion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    Searching,
    Quitting,
}

// ============================================================================
// App
// ============================================================================

pub struct App<R = ApiClient> {
    pub config: Config,
    pub service: DataService<R>,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub focus: Focus,
    pub language: Language,

    // Pickers
    pub regions: Vec<String>,
    pub region_selection: usize,
    pub sub_regions: Vec<String>,
    pub sub_region_selection: usize,

    // Loaded data
    pub data: Option<DistrictData>,
    /// (region, sub_region) that `data` belongs to
    pub loaded_for: Option<(String, String)>,
    pub region_average: Option<GroupAverage>,
    pub comparison: Vec<ComparisonRow>,
    pub data_scroll: usize,

    /// Place name typed after `/`
    pub search_query: String,

    pub report_dir: PathBuf,
    pub status_message: Option<String>,
    pub status_is_error: bool,
}

/// Open the store and offline dataset and wire them to the API client.
pub fn open_service(config: &Config) -> Result<DataService<ApiClient>> {
    let db_path = config.database_path()?;
    let store = MetricStore::open(&db_path)
        .with_context(|| format!("Failed to open metric store at {}", db_path.display()))?;

    let offline = offline_dataset(config);

    let mut api = ApiClient::new()?.with_api_key(config.resolve_api_key());
    if let Some(ref resource_id) = config.resource_id {
        api = api.with_resource_id(resource_id.clone());
    }
    debug!(has_api_key = api.has_api_key(), "API client configured");

    Ok(DataService::new(store, offline, api))
}

/// The configured dataset file, or the one compiled into the binary.
fn offline_dataset(config: &Config) -> OfflineDataset {
    let offline = OfflineDataset::resolve(config.resolve_offline_path().as_deref());
    debug!(rows = offline.len(), "Offline dataset ready");
    offline
}

impl App<ApiClient> {
    /// Create a new application instance backed by the real API client
    pub fn new(config: Config) -> Result<Self> {
        let service = open_service(&config)?;
        Ok(Self::with_service(config, service))
    }
}

impl<R: RemoteSource> App<R> {
    pub fn with_service(config: Config, service: DataService<R>) -> Self {
        let language = config.language;
        let mut app = Self {
            config,
            service,
            state: AppState::Normal,
            current_tab: Tab::Overview,
            focus: Focus::Region,
            language,
            regions: Vec::new(),
            region_selection: 0,
            sub_regions: Vec::new(),
            sub_region_selection: 0,
            data: None,
            loaded_for: None,
            region_average: None,
            comparison: Vec::new(),
            data_scroll: 0,
            search_query: String::new(),
            report_dir: PathBuf::from(REPORT_DIR),
            status_message: None,
            status_is_error: false,
        };
        app.reload_regions();
        app
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selected_region(&self) -> Option<&str> {
        self.regions.get(self.region_selection).map(String::as_str)
    }

    pub fn selected_sub_region(&self) -> Option<&str> {
        self.sub_regions
            .get(self.sub_region_selection)
            .map(String::as_str)
    }

    /// Refresh the region picker, restoring the last used selection.
    pub fn reload_regions(&mut self) {
        self.regions = self.service.regions();
        self.region_selection = self
            .config
            .last_region
            .as_ref()
            .and_then(|last| self.regions.iter().position(|r| r == last))
            .unwrap_or(0);
        self.reload_sub_regions();
    }

    /// Refresh the district picker for the selected region.
    pub fn reload_sub_regions(&mut self) {
        self.sub_regions = match self.selected_region() {
            Some(region) => self.service.sub_regions(region),
            None => Vec::new(),
        };
        self.sub_region_selection = self
            .config
            .last_sub_region
            .as_ref()
            .and_then(|last| self.sub_regions.iter().position(|s| s == last))
            .unwrap_or(0);
    }

    pub fn move_selection(&mut self, down: bool) {
        match self.focus {
            Focus::Region => {
                let next = step(self.region_selection, self.regions.len(), down);
                if next != self.region_selection {
                    self.region_selection = next;
                    self.sub_region_selection = 0;
                    self.sub_regions = self
                        .selected_region()
                        .map(|region| self.service.sub_regions(region))
                        .unwrap_or_default();
                }
            }
            Focus::SubRegion => {
                self.sub_region_selection =
                    step(self.sub_region_selection, self.sub_regions.len(), down);
            }
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Region => Focus::SubRegion,
            Focus::SubRegion => Focus::Region,
        };
    }

    pub fn toggle_language(&mut self) {
        self.language = self.language.toggle();
        self.config.language = self.language;
        info!(language = self.language.code(), "Language changed");
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = true;
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_is_error = false;
    }

    /// Jump the district picker to the first district matching the typed
    /// place name and list every suggestion in the status bar.
    pub fn apply_search(&mut self) {
        let suggestions = suggest_sub_regions(&self.search_query, &self.sub_regions);
        let Some(first) = suggestions.first() else {
            self.set_status(format!(
                "{}: {}",
                Label::NoMatchingDistrict.text(self.language),
                self.search_query.trim()
            ));
            return;
        };

        if let Some(index) = self.sub_regions.iter().position(|s| s == first) {
            self.sub_region_selection = index;
            self.focus = Focus::SubRegion;
        }
        debug!(query = %self.search_query, ?suggestions, "District search");
        self.set_status(format!(
            "{}: {}",
            Label::SuggestedDistricts.text(self.language),
            suggestions.join(", ")
        ));
    }

    pub fn scroll_data(&mut self, down: bool, amount: usize) {
        let max = self
            .data
            .as_ref()
            .map(|d| d.records.len().saturating_sub(1))
            .unwrap_or(0);
        self.data_scroll = if down {
            (self.data_scroll + amount).min(max)
        } else {
            self.data_scroll.saturating_sub(amount)
        };
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Run the retrieval policy for the selected district.
    pub async fn fetch_selected(&mut self) {
        let (Some(region), Some(sub_region)) = (
            self.selected_region().map(str::to_string),
            self.selected_sub_region().map(str::to_string),
        ) else {
            self.set_status(Label::SelectDistrict.text(self.language).to_string());
            return;
        };

        let data = self.service.fetch(&region, &sub_region).await;
        self.region_average = data
            .latest()
            .and_then(|latest| self.service.region_average(&region, latest.year, latest.month));
        self.set_status(if data.is_empty() {
            Label::NoData.text(self.language).to_string()
        } else {
            format!(
                "{}, {}: {} ({})",
                sub_region,
                region,
                data.records.len(),
                data.provenance.as_str()
            )
        });

        self.data_scroll = 0;
        self.data = Some(data);
        self.config.last_region = Some(region.clone());
        self.config.last_sub_region = Some(sub_region.clone());
        self.loaded_for = Some((region, sub_region));
    }

    /// Latest record for every district of the selected region.
    pub async fn fetch_comparison(&mut self) {
        let Some(region) = self.selected_region().map(str::to_string) else {
            self.set_status(Label::SelectState.text(self.language).to_string());
            return;
        };

        let results = self.service.fetch_many(&region, &self.sub_regions).await;
        self.comparison = comparison_rows(
            results
                .iter()
                .map(|(name, data)| (name.as_str(), data.records.as_slice())),
        );
        self.set_status(format!(
            "{}: {}/{}",
            Label::CompareDistricts.text(self.language),
            self.comparison.len(),
            self.sub_regions.len()
        ));
    }

    /// Write the report for the loaded district.
    pub fn export_report(&mut self) {
        let (Some(data), Some((region, sub_region))) = (&self.data, &self.loaded_for) else {
            self.set_status(Label::NoData.text(self.language).to_string());
            return;
        };

        match write_report(
            &self.report_dir,
            region,
            sub_region,
            &data.records,
            self.language,
        ) {
            Ok(Some(path)) => {
                info!(path = %path.display(), "Report written");
                self.set_status(format!(
                    "{}: {}",
                    Label::ReportSaved.text(self.language),
                    path.display()
                ));
            }
            Ok(None) => {
                self.set_status(Label::NoData.text(self.language).to_string());
            }
            Err(e) => {
                warn!(error = %e, "Report export failed");
                self.set_error(format!("Error: {}", e));
            }
        }
    }
}

fn step(current: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        0
    } else if down {
        (current + 1).min(len - 1)
    } else {
        current.saturating_sub(1)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use nregadash_core::{ApiError, Provenance, RawMetric};

    /// Remote that is always down.
    pub struct Unreachable;

    impl RemoteSource for Unreachable {
        async fn fetch_metrics(
            &self,
            _region: &str,
            _sub_region: &str,
        ) -> Result<Vec<RawMetric>, ApiError> {
            Err(ApiError::MissingApiKey)
        }
    }

    fn raw(region: &str, sub_region: &str, month: u32) -> RawMetric {
        RawMetric {
            region: region.to_string(),
            sub_region: sub_region.to_string(),
            year: 2024,
            month,
            households: 1_000 + month as u64,
            person_days: 20_000,
            expenditure: 5_000_000.0,
            avg_wage: 237.0,
        }
    }

    pub fn test_app() -> App<Unreachable> {
        let offline = OfflineDataset::from_records(vec![
            raw("Bihar", "Gaya", 6),
            raw("Uttar Pradesh", "Agra", 5),
            raw("Uttar Pradesh", "Agra", 6),
            raw("Uttar Pradesh", "Lucknow", 6),
        ]);
        let service = DataService::new(
            MetricStore::open_in_memory().unwrap(),
            offline,
            Unreachable,
        );
        App::with_service(Config::default(), service)
    }

    #[test]
    fn test_initial_selection() {
        let app = test_app();
        assert_eq!(app.regions, vec!["Bihar", "Uttar Pradesh"]);
        assert_eq!(app.selected_region(), Some("Bihar"));
        assert_eq!(app.selected_sub_region(), Some("Gaya"));
    }

    #[test]
    fn test_restores_last_selection() {
        let config = Config {
            last_region: Some("Uttar Pradesh".to_string()),
            last_sub_region: Some("Lucknow".to_string()),
            language: Language::Hindi,
            ..Default::default()
        };
        let app = test_app();
        let app = App::with_service(config, app.service);
        assert_eq!(app.selected_sub_region(), Some("Lucknow"));
        assert_eq!(app.language, Language::Hindi);
    }

    #[test]
    fn test_region_change_resets_districts() {
        let mut app = test_app();
        app.move_selection(true);
        assert_eq!(app.selected_region(), Some("Uttar Pradesh"));
        assert_eq!(app.sub_regions, vec!["Agra", "Lucknow"]);

        // Clamped at the end of the list
        app.move_selection(true);
        assert_eq!(app.selected_region(), Some("Uttar Pradesh"));

        app.toggle_focus();
        app.move_selection(true);
        assert_eq!(app.selected_sub_region(), Some("Lucknow"));
    }

    #[tokio::test]
    async fn test_fetch_selected_records_state() {
        let mut app = test_app();
        app.move_selection(true);
        app.fetch_selected().await;

        let data = app.data.as_ref().unwrap();
        assert_eq!(data.provenance, Provenance::Offline);
        assert_eq!(data.records.len(), 2);
        assert_eq!(
            app.loaded_for,
            Some(("Uttar Pradesh".to_string(), "Agra".to_string()))
        );
        assert_eq!(app.config.last_sub_region.as_deref(), Some("Agra"));
        assert_eq!(app.region_average.unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_comparison_covers_region() {
        let mut app = test_app();
        app.move_selection(true);
        app.fetch_comparison().await;
        let names: Vec<&str> = app
            .comparison
            .iter()
            .map(|row| row.sub_region.as_str())
            .collect();
        assert_eq!(names, vec!["Agra", "Lucknow"]);
    }

    #[tokio::test]
    async fn test_export_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app();
        app.report_dir = dir.path().to_path_buf();

        app.export_report();
        assert_eq!(
            app.status_message.as_deref(),
            Some(Label::NoData.text(Language::English))
        );

        app.fetch_selected().await;
        app.export_report();
        let message = app.status_message.clone().unwrap();
        assert!(message.starts_with("Report saved: "));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_search_jumps_to_suggested_district() {
        let mut app = test_app();
        app.move_selection(true);
        assert_eq!(app.selected_sub_region(), Some("Agra"));

        app.search_query = "Hazratganj market".to_string();
        app.apply_search();
        assert_eq!(app.selected_sub_region(), Some("Lucknow"));
        assert_eq!(app.focus, Focus::SubRegion);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Suggested district(s): Lucknow")
        );
    }

    #[test]
    fn test_search_without_match_keeps_selection() {
        let mut app = test_app();
        app.move_selection(true);
        app.search_query = "Atlantis".to_string();
        app.apply_search();
        assert_eq!(app.selected_sub_region(), Some("Agra"));
        assert_eq!(
            app.status_message.as_deref(),
            Some("No matching district found: Atlantis")
        );
        assert!(!app.status_is_error);
    }

    #[tokio::test]
    async fn test_export_failure_is_flagged_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let mut app = test_app();
        app.report_dir = blocker.join("reports");
        app.fetch_selected().await;
        app.export_report();
        assert!(app.status_is_error);
        assert!(app.status_message.as_ref().unwrap().starts_with("Error: "));

        app.fetch_selected().await;
        assert!(!app.status_is_error);
    }

    #[test]
    fn test_offline_dataset_without_configured_path() {
        let dataset = offline_dataset(&Config::default());
        assert!(!dataset.is_empty());
        assert!(!dataset.records_for("Uttar Pradesh", "Lucknow").is_empty());
    }

    #[test]
    fn test_offline_dataset_missing_file_uses_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            offline_data_path: Some(dir.path().join("gone.json")),
            ..Default::default()
        };
        assert!(!offline_dataset(&config).is_empty());
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut app = test_app();
        app.scroll_data(true, PAGE_SCROLL_SIZE);
        assert_eq!(app.data_scroll, 0);
        app.scroll_data(false, 1);
        assert_eq!(app.data_scroll, 0);
    }
}
