//! Display formatting for money, ratios and report dates.
//!
//! Formatting follows en-US conventions: `,` thousands separators and
//! `M/D/YYYY` short dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Placeholder shown for any value that is missing or cannot be displayed.
pub const UNAVAILABLE: &str = "—";

/// Formats a dollar amount as a grouped integer, e.g. `1,234,567`.
#[must_use]
pub fn format_money(value: Option<f64>) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return UNAVAILABLE.to_string();
    };

    let rounded = v.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats a ratio as a percentage with two decimals, e.g. `0.1234` -> `12.34%`.
#[must_use]
pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Formats an FDIC report date for display.
///
/// `YYYYMMDD` strings are read as calendar dates. Other inputs get a best-effort
/// parse and are echoed back unchanged if that fails.
#[must_use]
pub fn format_report_date(report_date: Option<&str>) -> String {
    let Some(s) = report_date.filter(|s| !s.is_empty()) else {
        return UNAVAILABLE.to_string();
    };

    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        return compact_date(s).map_or_else(|| s.to_string(), short_date);
    }

    parse_loose_date(s).map_or_else(|| s.to_string(), short_date)
}

fn compact_date(s: &str) -> Option<NaiveDate> {
    let year = s.get(0..4)?.parse().ok()?;
    let month = s.get(4..6)?.parse().ok()?;
    let day = s.get(6..8)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_loose_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    ["%Y-%m-%d", "%m/%d/%Y"]
        .into_iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn short_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_grouping() {
        assert_eq!(format_money(Some(1_234_567.0)), "1,234,567");
        assert_eq!(format_money(Some(999.0)), "999");
        assert_eq!(format_money(Some(1000.0)), "1,000");
        assert_eq!(format_money(Some(0.0)), "0");
        assert_eq!(format_money(Some(-45_678.0)), "-45,678");
    }

    #[test]
    fn test_money_rounds_fraction() {
        assert_eq!(format_money(Some(1234.6)), "1,235");
        assert_eq!(format_money(Some(1234.4)), "1,234");
    }

    #[test]
    fn test_money_unavailable() {
        assert_eq!(format_money(None), UNAVAILABLE);
        assert_eq!(format_money(Some(f64::NAN)), UNAVAILABLE);
        assert_eq!(format_money(Some(f64::INFINITY)), UNAVAILABLE);
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(0.123_456), "12.35%");
        assert_eq!(format_percent(1.5), "150.00%");
    }

    #[test]
    fn test_report_date_compact() {
        assert_eq!(format_report_date(Some("20230630")), "6/30/2023");
        assert_eq!(format_report_date(Some("20241231")), "12/31/2024");
    }

    #[test]
    fn test_report_date_invalid_compact_is_echoed() {
        assert_eq!(format_report_date(Some("20231345")), "20231345");
    }

    #[test]
    fn test_report_date_other_formats() {
        assert_eq!(format_report_date(Some("2023-06-30")), "6/30/2023");
        assert_eq!(format_report_date(Some("2023-06-30T00:00:00Z")), "6/30/2023");
        assert_eq!(format_report_date(Some("06/30/2023")), "6/30/2023");
    }

    #[test]
    fn test_report_date_fallbacks() {
        assert_eq!(format_report_date(None), UNAVAILABLE);
        assert_eq!(format_report_date(Some("")), UNAVAILABLE);
        assert_eq!(format_report_date(Some("not-a-date")), "not-a-date");
    }
}
