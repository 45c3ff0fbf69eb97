//! Polars `AnyValue` conversion helpers.
//!
//! Every cell read out of a `DataFrame` goes through these functions, so the
//! rules for what counts as an absent value live in one place: nulls, blank
//! text, unparseable text and non-finite numbers all come back as `None`.

use chrono::NaiveDate;
use polars::prelude::AnyValue;

/// Canonical text format for the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null`, and formats floats without trailing
/// zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use covid_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Float64(0.25)), "0.25");
/// assert_eq!(any_to_string(AnyValue::String("Kenya")), "Kenya");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Converts `AnyValue` to trimmed text, returning `None` when nothing is left.
pub fn any_to_string_non_empty(value: AnyValue<'_>) -> Option<String> {
    let text = any_to_string(value);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Formats a floating-point number without trailing fractional zeros.
///
/// # Examples
///
/// ```
/// use covid_common::format_numeric;
///
/// assert_eq!(format_numeric(100.0), "100");
/// assert_eq!(format_numeric(0.050), "0.05");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Whether a cell holds a usable value.
///
/// Nulls, blank text and non-finite floats count as absent.
pub fn is_present(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => false,
        AnyValue::Float32(v) => v.is_finite(),
        AnyValue::Float64(v) => v.is_finite(),
        AnyValue::String(s) => !s.trim().is_empty(),
        AnyValue::StringOwned(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Converts an `AnyValue` to `f64`.
///
/// Integer and float cells convert directly; text cells are parsed. Nulls,
/// unparseable text and non-finite results are absent.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    let number = match value {
        AnyValue::Null => None,
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Parses text as a finite `f64`, returning `None` for blank or invalid input.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses an ISO calendar date.
///
/// Accepts `YYYY-MM-DD`, optionally followed by a `T` or space separated time
/// part which is ignored.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let date_part = match trimmed.char_indices().nth(10) {
        Some((idx, 'T' | ' ')) => &trimmed[..idx],
        _ => trimmed,
    };
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

/// Converts an `AnyValue` to a calendar date via its text form.
pub fn any_to_date(value: AnyValue<'_>) -> Option<NaiveDate> {
    any_to_string_non_empty(value).and_then(|text| parse_date(&text))
}

/// Formats a date in the canonical column format.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
