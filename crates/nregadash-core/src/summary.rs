//! Plain-language performance summaries in English and Hindi.

use crate::i18n::{Label, Language};
use crate::metrics::{percent_change, YearOverYear};
use crate::models::{sort_newest_first, MetricRecord};
use crate::utils::{format_grouped, format_indian_number, month_name};

/// Indian-format amount that always carries a rupee sign.
fn rupee_amount(amount: f64) -> String {
    let formatted = format_indian_number(amount);
    if formatted.starts_with('₹') {
        formatted
    } else {
        format!("₹{}", formatted)
    }
}

/// Narrative for the latest month of `records`. The English form also
/// reports the person-days change against the previous month when that
/// month had any person-days.
pub fn performance_summary(sub_region: &str, records: &[MetricRecord], lang: Language) -> String {
    let mut sorted = records.to_vec();
    sort_newest_first(&mut sorted);

    let Some(latest) = sorted.first() else {
        return match lang {
            Language::English => "No data available".to_string(),
            Language::Hindi => "कोई डेटा उपलब्ध नहीं है".to_string(),
        };
    };

    let month = month_name(latest.month);
    let households = format_grouped(latest.households as i64);
    let person_days = format_indian_number(latest.person_days as f64);
    let expenditure = rupee_amount(latest.expenditure);

    match lang {
        Language::English => {
            let mut summary = format!(
                "In {} {}, {} households in {} district worked under MGNREGA, \
                 generating {} person-days and {} expenditure. \
                 The average wage was ₹{:.2} per day.",
                month, latest.year, households, sub_region, person_days, expenditure, latest.avg_wage
            );

            let change = sorted.get(1).and_then(|previous| {
                percent_change(latest.person_days as f64, previous.person_days as f64)
            });
            if let Some(change) = change {
                if change > 0.0 {
                    summary.push_str(&format!(
                        " This is a {:.1}% increase from the previous month.",
                        change
                    ));
                } else if change < 0.0 {
                    summary.push_str(&format!(
                        " This is a {:.1}% decrease from the previous month.",
                        change.abs()
                    ));
                }
            }
            summary
        }
        Language::Hindi => format!(
            "{} {} में, {} जिले में {} परिवारों ने मनरेगा के तहत काम किया, \
             जिससे {} कार्य दिवस और {} खर्च हुए। औसत वेतन ₹{:.2} प्रति दिन था।",
            month, latest.year, sub_region, households, person_days, expenditure, latest.avg_wage
        ),
    }
}

/// Narrative for a person-days year-over-year comparison. `None` unless
/// both years exist and the change is defined.
pub fn year_over_year_summary(yoy: &YearOverYear, lang: Language) -> Option<String> {
    let (latest_year, latest_total) = yoy.latest?;
    let (prev_year, prev_total) = yoy.previous?;
    let change = yoy.percent_change?;

    let latest_fmt = format_indian_number(latest_total);
    let prev_fmt = format_indian_number(prev_total);

    let text = match lang {
        Language::English => {
            let direction = if change > 0.0 { "increase" } else { "decrease" };
            format!(
                "{}: In {}, total person-days were {}, compared to {} in {}. \
                 This represents a {:.1}% {}.",
                Label::YearOverYear.text(lang),
                latest_year,
                latest_fmt,
                prev_fmt,
                prev_year,
                change.abs(),
                direction
            )
        }
        Language::Hindi => {
            let direction = if change > 0.0 { "वृद्धि" } else { "कमी" };
            format!(
                "{}: {} में, कुल कार्य दिवस {} थे, {} में {} की तुलना में। \
                 यह {:.1}% {} को दर्शाता है।",
                Label::YearOverYear.text(lang),
                latest_year,
                latest_fmt,
                prev_year,
                prev_fmt,
                change.abs(),
                direction
            )
        }
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{year_over_year, MetricField, SEASON_MONTHS};
    use chrono::Utc;

    fn record(year: i32, month: u32, person_days: u64) -> MetricRecord {
        MetricRecord {
            region: "Uttar Pradesh".to_string(),
            sub_region: "Lucknow".to_string(),
            year,
            month,
            households: 23_450,
            person_days,
            expenditure: 58_000_000.0,
            avg_wage: 235.5,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_english_summary_with_increase() {
        let records = vec![record(2024, 5, 400_000), record(2024, 6, 420_000)];
        let text = performance_summary("Lucknow", &records, Language::English);
        assert!(text.starts_with("In June 2024, 23,450 households in Lucknow district"));
        assert!(text.contains("4.20 L person-days"));
        assert!(text.contains("₹5.80 Cr expenditure"));
        assert!(!text.contains("₹₹"));
        assert!(text.contains("₹235.50 per day"));
        assert!(text.ends_with("This is a 5.0% increase from the previous month."));
    }

    #[test]
    fn test_english_summary_with_decrease() {
        let records = vec![record(2024, 6, 300), record(2024, 5, 400)];
        let text = performance_summary("Lucknow", &records, Language::English);
        assert!(text.ends_with("This is a 25.0% decrease from the previous month."));
    }

    #[test]
    fn test_no_change_sentence_when_previous_is_zero() {
        let records = vec![record(2024, 6, 300), record(2024, 5, 0)];
        let text = performance_summary("Lucknow", &records, Language::English);
        assert!(!text.contains("previous month"));
    }

    #[test]
    fn test_hindi_summary() {
        let text = performance_summary("Lucknow", &[record(2024, 6, 420_000)], Language::Hindi);
        assert!(text.contains("Lucknow जिले में"));
        assert!(text.contains("प्रति दिन था"));
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(
            performance_summary("Lucknow", &[], Language::English),
            "No data available"
        );
        assert_eq!(
            performance_summary("Lucknow", &[], Language::Hindi),
            "कोई डेटा उपलब्ध नहीं है"
        );
    }

    #[test]
    fn test_year_over_year_summary() {
        let records = vec![record(2023, 6, 200_000), record(2024, 6, 300_000)];
        let yoy = year_over_year(&records, MetricField::PersonDays, SEASON_MONTHS);
        let text = year_over_year_summary(&yoy, Language::English).expect("summary");
        assert!(text.contains("In 2024, total person-days were 3.00 L"));
        assert!(text.contains("2.00 L in 2023"));
        assert!(text.ends_with("50.0% increase."));

        let single = year_over_year(&records[..1], MetricField::PersonDays, SEASON_MONTHS);
        assert!(year_over_year_summary(&single, Language::English).is_none());
    }
}
