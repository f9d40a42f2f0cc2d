//! Coercion of raw command-line field values into request bodies.
//!
//! Fields behave like the inputs of an edit form: a missing flag reads as an
//! empty field, numbers are parsed leniently, and the server stays the only
//! judge of whether a value is acceptable.

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Number;

const LOCAL_INPUT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

// Integers above this lose precision as f64 and are kept as floats.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Numeric field: blank is `0`, integer and decimal text parse as such, and
/// anything else becomes `None` (serialised as `null`).
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn coerce_number(raw: Option<&str>) -> Option<Number> {
    let text = raw.unwrap_or_default().trim();
    if text.is_empty() {
        return Some(Number::from(0));
    }
    if let Ok(int) = text.parse::<i64>() {
        return Some(Number::from(int));
    }
    let value = text.parse::<f64>().ok().filter(|value| value.is_finite())?;
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        return Some(Number::from(value as i64));
    }
    Number::from_f64(value)
}

/// Optional text field: blank is `None`.
#[must_use]
pub(crate) fn optional_text(raw: Option<&str>) -> Option<String> {
    let text = raw.unwrap_or_default().trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Required text field, trimmed. Emptiness is left for the server to reject.
#[must_use]
pub(crate) fn required_text(raw: Option<&str>) -> String {
    raw.unwrap_or_default().trim().to_string()
}

/// Record id typed into an id field; blank means none was given.
#[must_use]
pub(crate) fn target_id(raw: Option<&str>) -> Option<String> {
    optional_text(raw)
}

/// Normalise a screening start to UTC ISO-8601 with millisecond precision.
///
/// Accepts RFC 3339 or a local `YYYY-MM-DDTHH:MM[:SS]` value.
pub(crate) fn parse_start_time(raw: &str) -> Result<String, String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err("Start time is required.".to_string());
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(to_utc_string(parsed.with_timezone(&Utc)));
    }

    let naive = LOCAL_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .ok_or_else(|| format!("Invalid start time '{text}'."))?;
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| format!("Start time '{text}' does not exist in the local time zone."))?;
    Ok(to_utc_string(local.with_timezone(&Utc)))
}

fn to_utc_string(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
