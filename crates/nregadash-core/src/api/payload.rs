//! Response shapes for the data.gov.in resource API and their
//! normalization into `RawMetric`.
//!
//! The portal serves every value as a string and names fields after the
//! MGNREGA MIS columns; other mirrors use the canonical snake_case names.
//! Both are accepted.

use serde::Deserialize;
use serde_json::Value;

use crate::models::RawMetric;
use crate::utils::month_from_name;

/// Expenditure on the portal is reported in lakhs of rupees.
const LAKH: f64 = 100_000.0;

#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub records: Vec<ApiRecord>,
    #[serde(default)]
    pub total: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiRecord {
    #[serde(default, alias = "state_name")]
    region: Option<Value>,
    #[serde(default, alias = "district_name")]
    sub_region: Option<Value>,
    #[serde(default)]
    year: Option<Value>,
    #[serde(default)]
    fin_year: Option<Value>,
    #[serde(default)]
    month: Option<Value>,
    #[serde(default, alias = "Total_Households_Worked")]
    households: Option<Value>,
    #[serde(default, alias = "Persondays_of_Central_Liability_so_far")]
    person_days: Option<Value>,
    #[serde(default)]
    expenditure: Option<Value>,
    #[serde(default, rename = "Total_Exp")]
    expenditure_lakhs: Option<Value>,
    #[serde(default, alias = "Average_Wage_rate_per_day_per_person")]
    avg_wage: Option<Value>,
}

impl ApiRecord {
    /// Normalize into a `RawMetric`. Region names fall back to the ones the
    /// caller asked for, since some resources omit them once filtered.
    /// Returns `None` for rows missing a period or any metric.
    pub fn to_raw(&self, region: &str, sub_region: &str) -> Option<RawMetric> {
        let month = self.month.as_ref().and_then(value_as_month)?;
        let year = match self.year.as_ref().and_then(value_as_f64) {
            Some(year) => year as i32,
            None => {
                let fin_year = self.fin_year.as_ref().and_then(value_as_string)?;
                calendar_year(&fin_year, month)?
            }
        };

        let expenditure = match self.expenditure.as_ref().and_then(value_as_f64) {
            Some(rupees) => rupees,
            None => self.expenditure_lakhs.as_ref().and_then(value_as_f64)? * LAKH,
        };

        let raw = RawMetric {
            region: self
                .region
                .as_ref()
                .and_then(value_as_string)
                .unwrap_or_else(|| region.to_string()),
            sub_region: self
                .sub_region
                .as_ref()
                .and_then(value_as_string)
                .unwrap_or_else(|| sub_region.to_string()),
            year,
            month,
            households: self.households.as_ref().and_then(value_as_u64)?,
            person_days: self.person_days.as_ref().and_then(value_as_u64)?,
            expenditure,
            avg_wage: self.avg_wage.as_ref().and_then(value_as_f64)?,
        };
        raw.is_valid().then_some(raw)
    }
}

/// Map a financial year ("2024-2025", "2024-25") and month to a calendar
/// year. April-December belong to the first year, January-March to the
/// second.
pub fn calendar_year(fin_year: &str, month: u32) -> Option<i32> {
    let start: i32 = fin_year.split('-').next()?.trim().parse().ok()?;
    if month <= 3 {
        Some(start + 1)
    } else {
        Some(start)
    }
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

fn value_as_u64(value: &Value) -> Option<u64> {
    let parsed = value_as_f64(value)?;
    (parsed >= 0.0).then(|| parsed.round() as u64)
}

fn value_as_month(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|m| u32::try_from(m).ok()),
        Value::String(s) => month_from_name(s),
        _ => None,
    }
    .filter(|m| (1..=12).contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portal_shaped_record() {
        let json = r#"{
            "records": [{
                "fin_year": "2024-2025",
                "month": "Jan",
                "state_name": "UTTAR PRADESH",
                "district_name": "LUCKNOW",
                "Total_Households_Worked": "23450",
                "Persondays_of_Central_Liability_so_far": "420000",
                "Total_Exp": "580.5",
                "Average_Wage_rate_per_day_per_person": "235.50"
            }]
        }"#;
        let response: ApiResponse = serde_json::from_str(json).unwrap();
        let raw = response.records[0]
            .to_raw("Uttar Pradesh", "Lucknow")
            .expect("normalized");

        assert_eq!(raw.region, "UTTAR PRADESH");
        assert_eq!(raw.year, 2025);
        assert_eq!(raw.month, 1);
        assert_eq!(raw.households, 23_450);
        assert_eq!(raw.person_days, 420_000);
        assert!((raw.expenditure - 58_050_000.0).abs() < 1e-6);
        assert!((raw.avg_wage - 235.5).abs() < 1e-9);
    }

    #[test]
    fn test_canonical_record_with_numbers() {
        let json = r#"{
            "year": 2024, "month": 7,
            "households": 1200, "person_days": 30000,
            "expenditure": 7100000.0, "avg_wage": 240
        }"#;
        let record: ApiRecord = serde_json::from_str(json).unwrap();
        let raw = record.to_raw("Bihar", "Patna").expect("normalized");

        assert_eq!(raw.region, "Bihar");
        assert_eq!(raw.sub_region, "Patna");
        assert_eq!(raw.year, 2024);
        assert_eq!(raw.expenditure, 7_100_000.0);
    }

    #[test]
    fn test_incomplete_record_rejected() {
        let json = r#"{"year": 2024, "month": "Jul", "households": "12"}"#;
        let record: ApiRecord = serde_json::from_str(json).unwrap();
        assert!(record.to_raw("Bihar", "Patna").is_none());

        let bad_month = r#"{"year": 2024, "month": "Smarch", "households": 1,
            "person_days": 1, "expenditure": 1, "avg_wage": 1}"#;
        let record: ApiRecord = serde_json::from_str(bad_month).unwrap();
        assert!(record.to_raw("Bihar", "Patna").is_none());
    }

    #[test]
    fn test_calendar_year() {
        assert_eq!(calendar_year("2024-2025", 4), Some(2024));
        assert_eq!(calendar_year("2024-2025", 12), Some(2024));
        assert_eq!(calendar_year("2024-25", 3), Some(2025));
        assert_eq!(calendar_year("garbage", 3), None);
    }

    #[test]
    fn test_missing_records_field_is_empty() {
        let response: ApiResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(response.records.is_empty());
    }
}
