//! Wire-date normalization.
//!
//! Every date crosses the wire as `YYYY-MM-DD`. Anything that is not a
//! recognisable date (unset, `null`, numbers, garbage text) becomes `""`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Format used on the wire for every date field.
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Render an optional calendar date for the wire.
pub fn format_wire_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(WIRE_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Best-effort parse of the date shapes the booking API and users produce.
///
/// Accepted: `2024-03-05`, `2024-03-05T10:00:00`, RFC 3339 timestamps
/// (the calendar date as written, offset ignored), `05-03-2024`,
/// `05/03/2024`.
pub fn parse_loose_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, WIRE_DATE_FORMAT) {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local().date());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in ["%d-%m-%Y", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Normalize an arbitrary JSON value to a wire date string.
pub fn normalize_date_value(value: &Value) -> String {
    match value {
        Value::String(s) => format_wire_date(parse_loose_date(s)),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn unset_date_is_empty_string() {
        assert_eq!(format_wire_date(None), "");
    }

    #[test]
    fn date_is_zero_padded() {
        assert_eq!(format_wire_date(Some(ymd(2024, 3, 5))), "2024-03-05");
    }

    #[test]
    fn loose_shapes_parse() {
        assert_eq!(parse_loose_date("2024-03-05"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_loose_date("2024-03-05T23:30:00+05:30"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_loose_date("2024-03-05T08:00:00"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_loose_date("05/03/2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_loose_date("not a date"), None);
        assert_eq!(parse_loose_date(""), None);
    }

    #[test]
    fn non_string_values_normalize_to_empty() {
        assert_eq!(normalize_date_value(&json!(null)), "");
        assert_eq!(normalize_date_value(&json!(20240305)), "");
        assert_eq!(normalize_date_value(&json!({"d": 1})), "");
        assert_eq!(normalize_date_value(&json!("2024-12-31")), "2024-12-31");
    }
}
