//! Format-list parsing and formatting shared by the date handlers.
//!
//! Stored date values are either canonical `%Y-%m-%dT%H:%M:%S%.f` strings
//! or integer Unix timestamps.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Format preference when serializing, least precise first.
pub(super) const SERIALIZE_FORMATS: [&str; 3] =
    ["%Y-%m-%d", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Format preference when deserializing, most precise first.
pub(super) const DESERIALIZE_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d"];

/// Canonical storage format for date values.
pub(super) const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse `text` with the first matching format in `formats`.
///
/// Date-only formats parse to midnight.
pub(super) fn parse_with_formats(text: &str, formats: &[String]) -> Option<NaiveDateTime> {
    formats.iter().find_map(|format| parse_one(text, format))
}

fn parse_one(text: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, format)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Interpret a stored date value: a canonical (or near-canonical) string or
/// an integer Unix timestamp.
pub(super) fn parse_stored(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(text) => DESERIALIZE_FORMATS
            .iter()
            .find_map(|format| parse_one(text, format)),
        Value::Number(number) => number.as_i64().and_then(from_timestamp),
        _ => None,
    }
}

/// Convert integer Unix seconds to a naive UTC datetime.
pub(super) fn from_timestamp(seconds: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(seconds, 0).map(|stamp| stamp.naive_utc())
}

/// Render `moment` with `format`, failing on unsupported format items
/// instead of panicking.
pub(super) fn format_datetime(moment: NaiveDateTime, format: &str) -> Option<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", moment.format(format)).ok()?;
    Some(rendered)
}

/// Render `moment` in canonical storage form.
pub(super) fn canonical(moment: NaiveDateTime) -> Option<String> {
    format_datetime(moment, CANONICAL_FORMAT)
}

/// Pick the first format in `formats` whose rendering round-trips back to
/// `moment`. Falls back to the last format, flagging the loss.
///
/// Returns `(rendered, format, lossless)`.
pub(super) fn to_formatted<'a>(
    moment: NaiveDateTime,
    formats: &'a [String],
) -> Option<(String, &'a str, bool)> {
    let mut last: Option<(String, &'a str)> = None;
    for format in formats {
        let rendered = format_datetime(moment, format)?;
        if parse_one(&rendered, format) == Some(moment) {
            return Some((rendered, format, true));
        }
        last = Some((rendered, format));
    }
    last.map(|(rendered, format)| (rendered, format, false))
}
