//! Session date parsing and display
//!
//! Curated sessions, PubMed exports and hand-edited JSON all spell dates
//! differently. Everything funnels through [`parse_session_date`] so the
//! normalizer and the harvest tooling agree on what counts as a valid date.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Full-date layouts tried in order
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",  // 2025-10-31
    "%Y-%b-%d",  // 2025-Oct-31 (PubMed export style)
    "%Y/%m/%d",  // 2025/10/31
    "%B %d, %Y", // October 31, 2025 (also accepts "Oct 31, 2025")
];

/// Month-only layouts; the day is pinned to the first of the month
const MONTH_FORMATS: &[&str] = &[
    "%Y-%m-%d", // 2025-10
    "%Y-%b-%d", // 2025-Oct
];

/// Timestamp layouts without an offset
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Month names used for labels, indexed by zero-based month
pub const MONTH_NAMES: [&str; 12] = [
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

/// Parse a session date string into a calendar date.
///
/// Accepts ISO dates, `YYYY-Mon-DD`, month-only `YYYY-MM` / `YYYY-Mon`,
/// RFC 3339 and naive ISO timestamps (date part kept), `YYYY/MM/DD` and
/// `Month D, YYYY`. Surrounding whitespace is ignored.
///
/// Returns `None` for anything that is not a real calendar date.
///
/// # Examples
///
/// ```
/// use jc_common::date::parse_session_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(parse_session_date("2025-Oct-31"), NaiveDate::from_ymd_opt(2025, 10, 31));
/// assert_eq!(parse_session_date("2025-10"), NaiveDate::from_ymd_opt(2025, 10, 1));
/// assert_eq!(parse_session_date("not-a-date"), None);
/// assert_eq!(parse_session_date("2024-02-30"), None);
/// ```
pub fn parse_session_date(input: &str) -> Option<NaiveDate> {
    let text = input.trim();
    if text.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    let first_of_month = format!("{text}-01");
    for format in MONTH_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&first_of_month, format) {
            return Some(date);
        }
    }

    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|stamp| stamp.date())
}

/// Normalize a date string to ISO `YYYY-MM-DD`.
///
/// Unparsable input is passed through trimmed so curated values are never
/// silently lost; blank input yields an empty string.
pub fn normalize_date_string(input: &str) -> String {
    match parse_session_date(input) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => input.trim().to_string(),
    }
}

/// Long-form label used by the timeline, e.g. `March 5, 2025`
pub fn long_form(date: NaiveDate) -> String {
    format!("{} {}, {}", month_name(date.month0()), date.day(), date.year())
}

/// Short label used on cards, e.g. `Mar 5, 2025`
pub fn short_form(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Month name for a zero-based month index
pub fn month_name(month_index: u32) -> &'static str {
    MONTH_NAMES
        .get(month_index as usize)
        .copied()
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_session_date("2025-01-01"), ymd(2025, 1, 1));
        assert_eq!(parse_session_date("  2024-06-01 "), ymd(2024, 6, 1));
    }

    #[test]
    fn test_parse_export_style() {
        assert_eq!(parse_session_date("2025-Oct-31"), ymd(2025, 10, 31));
        assert_eq!(parse_session_date("2025-oct-31"), ymd(2025, 10, 31));
    }

    #[test]
    fn test_parse_month_only() {
        assert_eq!(parse_session_date("2025-10"), ymd(2025, 10, 1));
        assert_eq!(parse_session_date("2025-Oct"), ymd(2025, 10, 1));
    }

    #[test]
    fn test_parse_timestamps() {
        assert_eq!(parse_session_date("2025-03-05T18:30:00Z"), ymd(2025, 3, 5));
        assert_eq!(parse_session_date("2025-03-05T18:30:00+02:00"), ymd(2025, 3, 5));
        assert_eq!(parse_session_date("2025-03-05T18:30:00"), ymd(2025, 3, 5));
        assert_eq!(parse_session_date("2025-03-05T18:30"), ymd(2025, 3, 5));
    }

    #[test]
    fn test_parse_written_forms() {
        assert_eq!(parse_session_date("March 5, 2025"), ymd(2025, 3, 5));
        assert_eq!(parse_session_date("2025/03/05"), ymd(2025, 3, 5));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_session_date("not-a-date"), None);
        assert_eq!(parse_session_date(""), None);
        assert_eq!(parse_session_date("   "), None);
        assert_eq!(parse_session_date("2024-13-01"), None);
        assert_eq!(parse_session_date("2024-02-30"), None);
    }

    #[test]
    fn test_normalize_date_string_passthrough() {
        assert_eq!(normalize_date_string("2025-Oct-31"), "2025-10-31");
        assert_eq!(normalize_date_string(" Spring 2025 "), "Spring 2025");
        assert_eq!(normalize_date_string(""), "");
    }

    #[test]
    fn test_labels() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert_eq!(long_form(date), "March 5, 2025");
        assert_eq!(short_form(date), "Mar 5, 2025");
        assert_eq!(month_name(11), "December");
        assert_eq!(month_name(12), "Unknown");
    }
}
