//! Best-effort parsing of human/LLM-supplied date strings.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Formats we accept beyond canonical `YYYY-MM-DD`, in the order they are
/// tried. Numeric month/day fields tolerate missing zero-padding.
const DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%m/%d/%y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a loosely formatted date string into a calendar date.
///
/// Empty and unparseable inputs yield `None`; ingestion must never fail
/// solely because a date did not parse.
pub fn parse_flexible(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    // Canonical form first; this also rejects impossible dates like
    // 2024-13-40 instead of passing them through.
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Some(date);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.date_naive());
    }

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(input, format) {
            return Some(ts.date());
        }
    }

    None
}

/// Canonical `YYYY-MM-DD` rendering used everywhere a date leaves the
/// typed domain (storage text, API messages, templates).
pub fn to_canonical(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_passes_through() {
        let parsed = parse_flexible("2024-03-01").unwrap();
        assert_eq!(to_canonical(parsed), "2024-03-01");
    }

    #[test]
    fn human_formats_normalize() {
        assert_eq!(to_canonical(parse_flexible("March 1, 2024").unwrap()), "2024-03-01");
        assert_eq!(to_canonical(parse_flexible("Mar 1, 2024").unwrap()), "2024-03-01");
        assert_eq!(to_canonical(parse_flexible("1 March 2024").unwrap()), "2024-03-01");
        assert_eq!(to_canonical(parse_flexible("3/1/2024").unwrap()), "2024-03-01");
        assert_eq!(to_canonical(parse_flexible("2024/03/01").unwrap()), "2024-03-01");
    }

    #[test]
    fn datetime_inputs_keep_the_date() {
        assert_eq!(
            to_canonical(parse_flexible("2024-03-01T09:30:00Z").unwrap()),
            "2024-03-01"
        );
        assert_eq!(
            to_canonical(parse_flexible("2024-03-01 09:30:00").unwrap()),
            "2024-03-01"
        );
    }

    #[test]
    fn garbage_and_empty_yield_none() {
        assert_eq!(parse_flexible("not a date"), None);
        assert_eq!(parse_flexible(""), None);
        assert_eq!(parse_flexible("   "), None);
        assert_eq!(parse_flexible("2024-13-40"), None);
    }
}
