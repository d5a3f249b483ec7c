//! Lenient numeric parsing for form fields.
//!
//! Form state keeps what the user typed. Numbers are only extracted when a
//! value is computed or serialized, using prefix parsing: leading whitespace
//! is skipped and the longest numeric prefix wins (`"12kg"` is `12`,
//! `"kg"` is absent).

/// Parse the longest decimal prefix of `input` as `f64`.
///
/// Returns `None` when no digits lead the string.
pub fn parse_decimal(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Optional exponent, only consumed when complete.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse the longest base-10 integer prefix of `input`.
///
/// A fractional part is ignored (`"2.9"` is `2`).
pub fn parse_integer(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse::<i64>().ok()
}

/// `parse_decimal`, or `default` when absent.
pub fn decimal_or(input: &str, default: f64) -> f64 {
    parse_decimal(input).unwrap_or(default)
}

/// `parse_integer`, or `default` when absent.
pub fn integer_or(input: &str, default: i64) -> i64 {
    parse_integer(input).unwrap_or(default)
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid rendering "-0.00".
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Render `value` rounded to exactly two decimal places.
pub fn fixed2(value: f64) -> String {
    format!("{:.2}", round2(value))
}

/// Render a number the way a user would type it back (no trailing `.0`).
pub fn plain(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
