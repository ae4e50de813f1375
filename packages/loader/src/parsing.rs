//! Field coercion for incident rows.
//!
//! Dates are read day-first and coordinates accept a comma as decimal
//! separator. Both parsers return `None` instead of failing so a bad cell
//! only nulls that value.

use chrono::{DateTime, Datelike as _, NaiveDate, NaiveDateTime};

/// Day-first date-time layouts, tried in order. Two-digit years come first
/// because `%Y` would also accept them as years 0-99; `%y` never matches a
/// four-digit year. `%.f` takes optional fractional seconds. ISO layouts
/// come last since they are unambiguous.
const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%y %H:%M:%S%.f",
    "%d/%m/%y %H:%M",
    "%d-%m-%y %H:%M:%S%.f",
    "%d-%m-%y %H:%M",
    "%d.%m.%y %H:%M:%S%.f",
    "%d.%m.%y %H:%M",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S%.f",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Day-first date-only layouts, two-digit years first.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%y", "%d-%m-%y", "%d.%m.%y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d",
];

/// Earliest year accepted. Anything below is a truncated year that no
/// layout could place.
const MIN_YEAR: i32 = 100;

fn plausible(dt: NaiveDateTime) -> Option<NaiveDateTime> {
    (dt.year() >= MIN_YEAR).then_some(dt)
}

/// Parses a day-first timestamp such as `"15/01/2025 14:30"`,
/// `"15/01/25"` or `"15/01/2025"`. Date-only values are placed at midnight.
/// ISO timestamps with an offset (`2025-06-20T22:10:00Z`) keep their
/// wall-clock time.
#[must_use]
pub fn parse_day_first(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return plausible(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0).and_then(plausible);
        }
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .and_then(|dt| plausible(dt.naive_local()))
}

/// Parses a decimal number that may use `,` as the decimal separator.
/// Returns `None` for empty, unparseable or non-finite values.
#[must_use]
pub fn parse_decimal(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_first_with_time() {
        let dt = parse_day_first("05/03/2025 14:30").unwrap();
        assert_eq!(dt.to_string(), "2025-03-05 14:30:00");
    }

    #[test]
    fn parses_day_first_date_only() {
        let dt = parse_day_first("30/06/2025").unwrap();
        assert_eq!(dt.to_string(), "2025-06-30 00:00:00");
    }

    #[test]
    fn day_first_beats_month_first() {
        // 02/01 is the 2nd of January, never February 1st.
        let dt = parse_day_first("02/01/2025").unwrap();
        assert_eq!(dt.date().to_string(), "2025-01-02");
    }

    #[test]
    fn accepts_iso_dates() {
        let dt = parse_day_first("2025-06-30 08:15:00").unwrap();
        assert_eq!(dt.to_string(), "2025-06-30 08:15:00");
        assert!(parse_day_first("2025-06-30").is_some());
    }

    #[test]
    fn two_digit_years_land_in_this_century() {
        let dt = parse_day_first("20/06/25").unwrap();
        assert_eq!(dt.date().to_string(), "2025-06-20");

        let dt = parse_day_first("20/06/25 22:10").unwrap();
        assert_eq!(dt.to_string(), "2025-06-20 22:10:00");

        let dt = parse_day_first("01.02.24").unwrap();
        assert_eq!(dt.date().to_string(), "2024-02-01");
    }

    #[test]
    fn four_digit_years_are_not_read_as_two() {
        let dt = parse_day_first("20/06/2025").unwrap();
        assert_eq!(dt.date().to_string(), "2025-06-20");
    }

    #[test]
    fn rejects_truncated_iso_years() {
        assert!(parse_day_first("0025-06-20").is_none());
    }

    #[test]
    fn accepts_fractional_seconds() {
        let dt = parse_day_first("20/06/2025 22:10:05.000").unwrap();
        assert_eq!(dt.to_string(), "2025-06-20 22:10:05");

        let dt = parse_day_first("2025-06-20 22:10:05.123").unwrap();
        assert_eq!(dt.to_string(), "2025-06-20 22:10:05.123");
    }

    #[test]
    fn accepts_rfc3339_timestamps() {
        let dt = parse_day_first("2025-06-20T22:10:00Z").unwrap();
        assert_eq!(dt.to_string(), "2025-06-20 22:10:00");

        let dt = parse_day_first("2025-06-20T22:10:00-03:00").unwrap();
        assert_eq!(dt.to_string(), "2025-06-20 22:10:00");
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(parse_day_first("").is_none());
        assert!(parse_day_first("sem data").is_none());
        assert!(parse_day_first("31/02/2025").is_none());
    }

    #[test]
    fn parses_comma_decimal() {
        let v = parse_decimal("-19,912345").unwrap();
        assert!((v - -19.912_345).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_dot_decimal() {
        let v = parse_decimal(" -43.9401 ").unwrap();
        assert!((v - -43.9401).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_bad_decimals() {
        assert!(parse_decimal("").is_none());
        assert!(parse_decimal("abc").is_none());
        assert!(parse_decimal("1.234,5").is_none());
        assert!(parse_decimal("NaN").is_none());
        assert!(parse_decimal("inf").is_none());
    }
}
