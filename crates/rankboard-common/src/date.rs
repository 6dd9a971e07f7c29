//! Best-effort parsing of the date layouts commonly found in exported sheets.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Date-only layouts, tried in order. Day-first wins over month-first for
/// ambiguous inputs such as `03/04/2024`.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y", "%d.%m.%Y", "%Y%m%d",
];

pub const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Parse `s` as a calendar date or date-time under any supported layout.
pub fn parse_date_like(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    // Cheap rejection: every layout needs at least 6 chars and a leading digit.
    if s.len() < 6 || !s.as_bytes()[0].is_ascii_digit() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    // "%Y%m%d" would also accept plain integers; require exactly 8 digits.
    for fmt in DATE_FORMATS {
        if *fmt == "%Y%m%d" && (s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit())) {
            continue;
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_iso_and_day_first_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        for s in ["2024-02-15", "15/02/2024", "2024/02/15", "15.02.2024"] {
            assert_eq!(parse_date_like(s).map(|d| d.date()), Some(expected), "{s}");
        }
    }

    #[test]
    fn accepts_datetimes() {
        let dt = parse_date_like("2024-02-15T10:30:00").unwrap();
        assert_eq!(dt.format("%H:%M").to_string(), "10:30");
        assert!(parse_date_like("2024-02-15T10:30:00Z").is_some());
    }

    #[test]
    fn rejects_text_and_bare_numbers() {
        assert_eq!(parse_date_like("Notícias"), None);
        assert_eq!(parse_date_like("1234567"), None);
        assert_eq!(parse_date_like("2024-13-45"), None);
    }
}
