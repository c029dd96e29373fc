//! Derived metrics over records already in memory.
//!
//! Everything here is pure arithmetic: period-over-period deltas, group
//! averages used as a regional baseline, year-over-year totals and the
//! seasonal profile. No function performs I/O.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::models::MetricRecord;

/// Months compared year over year (May through October, the main
/// working season).
pub const SEASON_MONTHS: RangeInclusive<u32> = 5..=10;

/// Records shown in trend charts and the report trend table.
pub const TREND_WINDOW: usize = 6;

/// A numeric field of `MetricRecord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricField {
    Households,
    PersonDays,
    Expenditure,
    AvgWage,
}

impl MetricField {
    pub fn value(&self, record: &MetricRecord) -> f64 {
        match self {
            MetricField::Households => record.households as f64,
            MetricField::PersonDays => record.person_days as f64,
            MetricField::Expenditure => record.expenditure,
            MetricField::AvgWage => record.avg_wage,
        }
    }
}

/// Latest period minus the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodDelta {
    pub households: i64,
    pub person_days: i64,
    pub expenditure: f64,
    pub avg_wage: f64,
}

/// Mean of each field across a group of records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupAverage {
    pub households: u64,
    pub person_days: u64,
    pub expenditure: f64,
    pub avg_wage: f64,
    pub count: usize,
}

/// Seasonal totals of one field per year plus the change between the two
/// most recent years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearOverYear {
    /// (year, total), oldest year first.
    pub totals: Vec<(i32, f64)>,
    pub latest: Option<(i32, f64)>,
    pub previous: Option<(i32, f64)>,
    /// Undefined when fewer than two years exist or the previous total is 0.
    pub percent_change: Option<f64>,
}

/// Mean of each field for one calendar month across years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyAverage {
    pub month: u32,
    pub households: f64,
    pub person_days: f64,
    pub expenditure: f64,
    pub avg_wage: f64,
    pub years: usize,
}

/// One district's latest record, for side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub sub_region: String,
    pub record: MetricRecord,
}

/// `(current - previous) / previous * 100`, undefined when previous is 0.
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some((current - previous) / previous * 100.0)
    }
}

fn newest_first(records: &[MetricRecord]) -> Vec<&MetricRecord> {
    let mut sorted: Vec<&MetricRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.period().cmp(&a.period()));
    sorted
}

/// Latest minus immediately preceding period. `None` with fewer than two
/// records.
pub fn period_delta(records: &[MetricRecord]) -> Option<PeriodDelta> {
    let sorted = newest_first(records);
    let (latest, previous) = match sorted.as_slice() {
        [latest, previous, ..] => (*latest, *previous),
        _ => return None,
    };

    Some(PeriodDelta {
        households: latest.households as i64 - previous.households as i64,
        person_days: latest.person_days as i64 - previous.person_days as i64,
        expenditure: latest.expenditure - previous.expenditure,
        avg_wage: latest.avg_wage - previous.avg_wage,
    })
}

/// Arithmetic mean of every field over records matching (region, year,
/// month). Integer means are truncated, decimal means rounded to two
/// places. `None` when nothing matches.
pub fn group_average(
    records: &[MetricRecord],
    region: &str,
    year: i32,
    month: u32,
) -> Option<GroupAverage> {
    let group: Vec<&MetricRecord> = records
        .iter()
        .filter(|r| r.region == region && r.year == year && r.month == month)
        .collect();
    if group.is_empty() {
        return None;
    }

    let n = group.len() as f64;
    let mean = |field: MetricField| group.iter().map(|r| field.value(r)).sum::<f64>() / n;

    Some(GroupAverage {
        households: mean(MetricField::Households) as u64,
        person_days: mean(MetricField::PersonDays) as u64,
        expenditure: round2(mean(MetricField::Expenditure)),
        avg_wage: round2(mean(MetricField::AvgWage)),
        count: group.len(),
    })
}

/// Sum `field` over `months` per year and compare the two latest years.
pub fn year_over_year(
    records: &[MetricRecord],
    field: MetricField,
    months: RangeInclusive<u32>,
) -> YearOverYear {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for record in records.iter().filter(|r| months.contains(&r.month)) {
        *by_year.entry(record.year).or_insert(0.0) += field.value(record);
    }

    let totals: Vec<(i32, f64)> = by_year.into_iter().collect();
    let latest = totals.last().copied();
    let previous = totals.len().checked_sub(2).map(|i| totals[i]);
    let percent_change = match (latest, previous) {
        (Some((_, current)), Some((_, prior))) => percent_change(current, prior),
        _ => None,
    };

    YearOverYear {
        totals,
        latest,
        previous,
        percent_change,
    }
}

/// Mean of each field per month within `months`, across all years,
/// ordered by month. Months with no data are omitted.
pub fn seasonal_pattern(
    records: &[MetricRecord],
    months: RangeInclusive<u32>,
) -> Vec<MonthlyAverage> {
    months
        .filter_map(|month| {
            let group: Vec<&MetricRecord> = records.iter().filter(|r| r.month == month).collect();
            if group.is_empty() {
                return None;
            }
            let n = group.len() as f64;
            let mean = |field: MetricField| group.iter().map(|r| field.value(r)).sum::<f64>() / n;
            Some(MonthlyAverage {
                month,
                households: mean(MetricField::Households),
                person_days: mean(MetricField::PersonDays),
                expenditure: mean(MetricField::Expenditure),
                avg_wage: mean(MetricField::AvgWage),
                years: group.len(),
            })
        })
        .collect()
}

/// The latest `window` records in chronological order.
pub fn trend_window(records: &[MetricRecord], window: usize) -> Vec<MetricRecord> {
    let mut recent: Vec<MetricRecord> = newest_first(records)
        .into_iter()
        .take(window)
        .cloned()
        .collect();
    recent.reverse();
    recent
}

/// Latest record of each district, in input order. Districts without
/// records are skipped.
pub fn comparison_rows<'a, I>(districts: I) -> Vec<ComparisonRow>
where
    I: IntoIterator<Item = (&'a str, &'a [MetricRecord])>,
{
    districts
        .into_iter()
        .filter_map(|(sub_region, records)| {
            newest_first(records).first().map(|latest| ComparisonRow {
                sub_region: sub_region.to_string(),
                record: (*latest).clone(),
            })
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
