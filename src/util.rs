// Parsing helpers for the raw CSV values.
//
// All of the "dirty" value handling lives here so the loader can assume
// clean, typed values. Every function is lenient: bad input yields `None`,
// never an error.
use chrono::{NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

// The published dataset mixes day-first timestamps ("6/03/2020 0:00:00"),
// plain day-first dates, and ISO exports. Day-first variants are tried
// before ISO so ambiguous values resolve day-first.
const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d"];

/// Parse one textual date value, preferring day-first formats.
/// Returns `None` for blank or unparsable input.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

pub fn parse_i64_safe(s: Option<&str>) -> Option<i64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>().ok()
}

/// Parse a non-negative integer, accepting float spellings like "25.0"
/// that show up in re-exported CSVs.
pub fn parse_u32_safe(s: Option<&str>) -> Option<u32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }
    match s.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Some(f as u32),
        _ => None,
    }
}

/// Thousands-separated rendering for counts in console messages
/// (e.g. `1,048,576 rows loaded`).
pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_parse_day_first() {
        let d = parse_date_safe(Some("6/03/2020 0:00:00")).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2020, 3, 6).unwrap());
        let d = parse_date_safe(Some("31/12/2020")).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2020, 12, 31).unwrap());
    }

    #[test]
    fn iso_dates_accepted() {
        let d = parse_date_safe(Some("2020-03-06T00:00:00.000")).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2020, 3, 6).unwrap());
    }

    #[test]
    fn bad_dates_become_none() {
        assert_eq!(parse_date_safe(Some("sin dato")), None);
        assert_eq!(parse_date_safe(Some("  ")), None);
        assert_eq!(parse_date_safe(None), None);
    }

    #[test]
    fn age_accepts_float_spelling() {
        assert_eq!(parse_u32_safe(Some("25")), Some(25));
        assert_eq!(parse_u32_safe(Some("25.0")), Some(25));
        assert_eq!(parse_u32_safe(Some("25.5")), None);
        assert_eq!(parse_u32_safe(Some("-3")), None);
    }
}
