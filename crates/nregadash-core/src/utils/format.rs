use chrono::{DateTime, Utc};

/// One lakh (1,00,000).
const LAKH: f64 = 100_000.0;

/// One crore (1,00,00,000).
const CRORE: f64 = 10_000_000.0;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English month name for 1-12, empty string otherwise.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[(month - 1) as usize],
        _ => "",
    }
}

/// Parse a month from its name or a three-letter abbreviation
/// ("Dec", "december", "SEPT"). Also accepts "1".."12".
pub fn month_from_name(name: &str) -> Option<u32> {
    let trimmed = name.trim();
    if let Ok(number) = trimmed.parse::<u32>() {
        return (1..=12).contains(&number).then_some(number);
    }

    let prefix: String = trimmed.to_lowercase().chars().take(3).collect();
    if prefix.chars().count() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|m| m.to_lowercase().starts_with(&prefix))
        .map(|i| i as u32 + 1)
}

/// Format a number in the Indian system: crores get a rupee sign and "Cr",
/// lakhs get "L", anything smaller is grouped by thousands.
pub fn format_indian_number(num: f64) -> String {
    if num >= CRORE {
        format!("₹{:.2} Cr", num / CRORE)
    } else if num >= LAKH {
        format!("{:.2} L", num / LAKH)
    } else {
        format_grouped(num.round() as i64)
    }
}

/// Group an integer by thousands: 1234567 -> "1,234,567".
pub fn format_grouped(num: i64) -> String {
    let digits = num.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if num < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// "₹235.50"
pub fn format_rupees(amount: f64) -> String {
    format!("₹{:.2}", amount)
}

/// Signed delta for metric cards: "+1,200", "-35", "0".
pub fn format_delta(delta: i64) -> String {
    if delta > 0 {
        format!("+{}", format_grouped(delta))
    } else {
        format_grouped(delta)
    }
}

/// Signed decimal delta: "+12.50", "-3.25".
pub fn format_delta_decimal(delta: f64) -> String {
    if delta > 0.0 {
        format!("+{:.2}", delta)
    } else {
        format!("{:.2}", delta)
    }
}

/// Human readable age of a timestamp, relative to `now`.
pub fn age_display(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - updated_at).num_minutes();
    if minutes < 1 {
        // Includes clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_indian_number() {
        assert_eq!(format_indian_number(58_000_000.0), "₹5.80 Cr");
        assert_eq!(format_indian_number(10_000_000.0), "₹1.00 Cr");
        assert_eq!(format_indian_number(420_000.0), "4.20 L");
        assert_eq!(format_indian_number(100_000.0), "1.00 L");
        assert_eq!(format_indian_number(99_999.0), "99,999");
        assert_eq!(format_indian_number(23_450.0), "23,450");
        assert_eq!(format_indian_number(0.0), "0");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0), "0");
        assert_eq!(format_grouped(999), "999");
        assert_eq!(format_grouped(1_000), "1,000");
        assert_eq!(format_grouped(1_234_567), "1,234,567");
        assert_eq!(format_grouped(-45_000), "-45,000");
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "");
        assert_eq!(month_name(13), "");

        assert_eq!(month_from_name("Dec"), Some(12));
        assert_eq!(month_from_name("september"), Some(9));
        assert_eq!(month_from_name("4"), Some(4));
        assert_eq!(month_from_name("13"), None);
        assert_eq!(month_from_name("xx"), None);
    }

    #[test]
    fn test_deltas_and_rupees() {
        assert_eq!(format_delta(1_200), "+1,200");
        assert_eq!(format_delta(-35), "-35");
        assert_eq!(format_delta(0), "0");
        assert_eq!(format_delta_decimal(12.5), "+12.50");
        assert_eq!(format_rupees(235.5), "₹235.50");
    }

    #[test]
    fn test_age_display() {
        let now = Utc::now();
        assert_eq!(age_display(now, now), "just now");
        assert_eq!(age_display(now + Duration::minutes(5), now), "just now");
        assert_eq!(age_display(now - Duration::minutes(42), now), "42m ago");
        assert_eq!(age_display(now - Duration::minutes(95), now), "2h ago");
        assert_eq!(age_display(now - Duration::hours(25), now), "1d ago");
        assert_eq!(age_display(now - Duration::hours(36), now), "2d ago");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Lucknow", 10), "Lucknow");
        assert_eq!(truncate("Sant Kabir Nagar", 10), "Sant Ka...");
        assert_eq!(truncate("Agra", 2), "Ag");
    }
}
