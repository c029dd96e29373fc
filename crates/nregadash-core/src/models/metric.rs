use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One month of scheme activity for one district, as delivered by the
/// remote API or the offline dataset. Carries no cache timestamp.
///
/// The offline file predates the region/sub-region naming, so `state` and
/// `district` are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMetric {
    #[serde(alias = "state")]
    pub region: String,
    #[serde(alias = "district")]
    pub sub_region: String,
    pub year: i32,
    pub month: u32,
    pub households: u64,
    pub person_days: u64,
    pub expenditure: f64,
    pub avg_wage: f64,
}

impl RawMetric {
    /// Attach a cache timestamp, producing a storable record.
    pub fn stamp(self, updated_at: DateTime<Utc>) -> MetricRecord {
        MetricRecord {
            region: self.region,
            sub_region: self.sub_region,
            year: self.year,
            month: self.month,
            households: self.households,
            person_days: self.person_days,
            expenditure: self.expenditure,
            avg_wage: self.avg_wage,
            updated_at,
        }
    }

    /// True when the month is in range and no decimal field is negative
    /// or NaN.
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && self.expenditure.is_finite()
            && self.expenditure >= 0.0
            && self.avg_wage.is_finite()
            && self.avg_wage >= 0.0
    }
}

/// A stored metric row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub region: String,
    pub sub_region: String,
    pub year: i32,
    pub month: u32,
    pub households: u64,
    pub person_days: u64,
    pub expenditure: f64,
    pub avg_wage: f64,
    pub updated_at: DateTime<Utc>,
}

impl MetricRecord {
    /// Sortable period index (`year * 12 + month`), so consecutive months
    /// differ by exactly one even across a year boundary.
    pub fn period(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month)
    }

    /// "March 2024"
    pub fn period_label(&self) -> String {
        format!(
            "{} {}",
            crate::utils::month_name(self.month),
            self.year
        )
    }
}

/// Sort newest period first (year DESC, month DESC).
pub fn sort_newest_first(records: &mut [MetricRecord]) {
    records.sort_by(|a, b| b.period().cmp(&a.period()));
}
