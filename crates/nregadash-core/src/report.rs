//! Downloadable district report.
//!
//! Renders a record set as a Markdown document: title, generation date, a
//! key-metrics table for the latest month, a trend table for recent
//! months and a data-source footer.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::i18n::{Label, Language};
use crate::metrics::{trend_window, TREND_WINDOW};
use crate::models::{sort_newest_first, MetricRecord};
use crate::utils::{format_grouped, format_indian_number, format_rupees, month_name};

/// Report file name for a district on a given day.
pub fn report_file_name(sub_region: &str, generated_at: DateTime<Utc>) -> String {
    let safe: String = sub_region
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("MGNREGA_{}_{}.md", safe, generated_at.format("%Y%m%d"))
}

/// Render the report. `None` when there are no records.
pub fn render_report(
    region: &str,
    sub_region: &str,
    records: &[MetricRecord],
    lang: Language,
    generated_at: DateTime<Utc>,
) -> Option<String> {
    if records.is_empty() {
        return None;
    }
    let mut sorted = records.to_vec();
    sort_newest_first(&mut sorted);

    let generated = match lang {
        Language::English => generated_at.format("%B %d, %Y").to_string(),
        Language::Hindi => generated_at.format("%d/%m/%Y").to_string(),
    };

    let mut out = String::new();
    write_body(&mut out, region, sub_region, &sorted, lang, &generated).ok()?;
    Some(out)
}

/// Markdown body for newest-first `sorted`.
fn write_body(
    out: &mut String,
    region: &str,
    sub_region: &str,
    sorted: &[MetricRecord],
    lang: Language,
    generated: &str,
) -> std::fmt::Result {
    writeln!(out, "# {}", Label::ReportTitle.text(lang))?;
    writeln!(out, "## {}, {}", sub_region, region)?;
    writeln!(out)?;
    writeln!(out, "{}: {}", Label::ReportGenerated.text(lang), generated)?;
    writeln!(out)?;

    if let Some(latest) = sorted.first() {
        writeln!(out, "### {}", Label::KeyMetrics.text(lang))?;
        writeln!(out)?;
        writeln!(
            out,
            "| {} | {} |",
            Label::Metric.text(lang),
            Label::Value.text(lang)
        )?;
        writeln!(out, "|---|---|")?;
        let rows = [
            (Label::LatestMonth, latest.period_label()),
            (Label::Households, format_grouped(latest.households as i64)),
            (Label::PersonDays, format_grouped(latest.person_days as i64)),
            (Label::Expenditure, format_indian_number(latest.expenditure)),
            (Label::AvgWage, format_rupees(latest.avg_wage)),
        ];
        for (label, value) in rows {
            writeln!(out, "| {} | {} |", label.text(lang), value)?;
        }
        writeln!(out)?;
    }

    if sorted.len() > 1 {
        writeln!(out, "### {}", Label::MonthlyTrend.text(lang))?;
        writeln!(out)?;
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} |",
            Label::Month.text(lang),
            Label::Year.text(lang),
            Label::Households.text(lang),
            Label::PersonDays.text(lang),
            Label::Expenditure.text(lang),
            Label::AvgWage.text(lang)
        )?;
        writeln!(out, "|---|---|---:|---:|---:|---:|")?;
        // Newest first, like the dashboard's monthly table
        for record in trend_window(sorted, TREND_WINDOW).iter().rev() {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} |",
                month_name(record.month),
                record.year,
                format_grouped(record.households as i64),
                format_grouped(record.person_days as i64),
                format_indian_number(record.expenditure),
                format_rupees(record.avg_wage)
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "---")?;
    writeln!(out)?;
    writeln!(out, "{}  ", Label::DataSource.text(lang))?;
    writeln!(out, "{}", Label::Disclaimer.text(lang))
}

/// Render and write the report into `dir`. Returns the written path, or
/// `None` when there was nothing to report.
pub fn write_report(
    dir: &Path,
    region: &str,
    sub_region: &str,
    records: &[MetricRecord],
    lang: Language,
) -> Result<Option<PathBuf>> {
    let now = Utc::now();
    let Some(contents) = render_report(region, sub_region, records, lang, now) else {
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory: {}", dir.display()))?;
    let path = dir.join(report_file_name(sub_region, now));
    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(year: i32, month: u32) -> MetricRecord {
        MetricRecord {
            region: "Uttar Pradesh".to_string(),
            sub_region: "Lucknow".to_string(),
            year,
            month,
            households: 23_450,
            person_days: 420_000,
            expenditure: 58_000_000.0,
            avg_wage: 235.5,
            updated_at: Utc::now(),
        }
    }

    fn fixed_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 5, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            report_file_name("Sant Kabir Nagar", fixed_date()),
            "MGNREGA_Sant_Kabir_Nagar_20241105.md"
        );
    }

    #[test]
    fn test_empty_records_produce_no_report() {
        assert!(render_report("Uttar Pradesh", "Lucknow", &[], Language::English, fixed_date())
            .is_none());
    }

    #[test]
    fn test_single_record_has_metrics_but_no_trend() {
        let report = render_report(
            "Uttar Pradesh",
            "Lucknow",
            &[record(2024, 6)],
            Language::English,
            fixed_date(),
        )
        .unwrap();
        assert!(report.contains("## Lucknow, Uttar Pradesh"));
        assert!(report.contains("Report Generated: November 05, 2024"));
        assert!(report.contains("| Latest Month | June 2024 |"));
        assert!(report.contains("| Households Worked | 23,450 |"));
        assert!(report.contains("| Total Expenditure | ₹5.80 Cr |"));
        assert!(report.contains("| Average Wage | ₹235.50 |"));
        assert!(!report.contains("Monthly Trend Data"));
        assert!(report.contains("data.gov.in"));
    }

    #[test]
    fn test_trend_table_limited_to_window_newest_first() {
        let records: Vec<MetricRecord> = (1..=9).map(|m| record(2024, m)).collect();
        let report = render_report(
            "Uttar Pradesh",
            "Lucknow",
            &records,
            Language::English,
            fixed_date(),
        )
        .unwrap();

        let trend = report.split("### Monthly Trend Data").nth(1).unwrap();
        let rows: Vec<&str> = trend
            .lines()
            .filter(|l| l.starts_with("| ") && l.contains("2024"))
            .collect();
        assert_eq!(rows.len(), TREND_WINDOW);
        assert!(rows[0].starts_with("| September |"));
        assert!(rows[5].starts_with("| April |"));
    }

    #[test]
    fn test_sections_in_order() {
        let report = render_report(
            "Uttar Pradesh",
            "Lucknow",
            &[record(2024, 5), record(2024, 6)],
            Language::English,
            fixed_date(),
        )
        .unwrap();
        let position = |needle: &str| report.find(needle).unwrap();
        assert!(position("# MGNREGA Performance Report") < position("### Key Metrics Summary"));
        assert!(position("### Key Metrics Summary") < position("### Monthly Trend Data"));
        assert!(position("### Monthly Trend Data") < position("---\n"));
        assert!(report.ends_with("informational purposes only.\n"));
    }

    #[test]
    fn test_hindi_report() {
        let report = render_report(
            "Uttar Pradesh",
            "Lucknow",
            &[record(2024, 6), record(2024, 5)],
            Language::Hindi,
            fixed_date(),
        )
        .unwrap();
        assert!(report.starts_with("# मनरेगा प्रदर्शन रिपोर्ट"));
        assert!(report.contains("रिपोर्ट तैयार: 05/11/2024"));
        assert!(report.contains("### मासिक रुझान डेटा"));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(
            dir.path(),
            "Uttar Pradesh",
            "Lucknow",
            &[record(2024, 6)],
            Language::English,
        )
        .unwrap()
        .expect("path");
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("MGNREGA_Lucknow_"));

        assert!(write_report(dir.path(), "Uttar Pradesh", "Lucknow", &[], Language::English)
            .unwrap()
            .is_none());
    }
}
