//! Recursive decoder for marker-tagged snapshot values.
//!
//! The strategy engine serializes non-primitive values (timestamps, sets,
//! dataframes, tagged records) as small JSON objects carrying a reserved
//! marker key. `resolve` walks an arbitrary payload depth-first and rewrites
//! every tagged node into its plain JSON form, so the rest of the pipeline
//! only ever sees plain objects, arrays and scalars.

use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};

/// Output format for every timestamp the pipeline emits: seconds precision,
/// no timezone suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const MARKER_DATAFRAME: &str = "dataframe";
const MARKER_DATETIME: &str = "datetime";
const MARKER_DATE: &str = "date";
const MARKER_ENUM: &str = "enum";
const MARKER_SET: &str = "set";
const MARKER_DATACLASS: &str = "dataclass";

/// Resolves a tagged value into its plain JSON form.
///
/// Total function: every input produces some output. Unknown marker keys are
/// kept as ordinary fields rather than rejected. Marker precedence for an
/// object is fixed: `dataframe`, `datetime`, `date`, `enum`, `set`,
/// `dataclass`, then plain-map fallback.
///
/// # Arguments
///
/// * `value` - The raw (possibly tagged) JSON value.
///
/// # Returns
///
/// A new value containing no marker keys at any depth; every leaf is a JSON
/// primitive and every container a plain object or array.
pub fn resolve(value: &Value) -> Value {
    match value {
        Value::Object(map) => resolve_object(map),
        Value::Array(items) => Value::Array(items.iter().map(resolve).collect()),
        other => other.clone(),
    }
}

fn resolve_object(map: &Map<String, Value>) -> Value {
    if map.contains_key(MARKER_DATAFRAME) {
        // Tabular data: the payload lives in `records`, one object per row.
        return resolve_elements(map.get("records"));
    }
    if let Some(raw) = map.get(MARKER_DATETIME) {
        return resolve_datetime(raw);
    }
    if let Some(raw) = map.get(MARKER_DATE) {
        // Dates are already plain strings; passed through without reformatting.
        return raw.clone();
    }
    if let Some(raw) = map.get(MARKER_ENUM) {
        // Expected shape "ClassName.MEMBER"; not validated.
        return raw.clone();
    }
    if map.contains_key(MARKER_SET) {
        return resolve_elements(map.get("values"));
    }
    if map.contains_key(MARKER_DATACLASS) {
        let fields = map
            .iter()
            .filter(|(key, _)| key.as_str() != MARKER_DATACLASS)
            .map(|(key, value)| (key.clone(), resolve(value)))
            .collect();
        return Value::Object(fields);
    }
    // Plain mapping: keep every key, resolve every value.
    Value::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), resolve(value)))
            .collect(),
    )
}

/// Resolves the element list of a `dataframe` or `set` marker. A missing or
/// non-array payload yields an empty list.
fn resolve_elements(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Array(items)) => Value::Array(items.iter().map(resolve).collect()),
        _ => Value::Array(Vec::new()),
    }
}

fn resolve_datetime(raw: &Value) -> Value {
    match raw.as_str() {
        Some(text) => match format_timestamp(text) {
            Some(formatted) => Value::String(formatted),
            // Unparseable timestamps pass through untouched.
            None => Value::String(text.to_string()),
        },
        None => raw.clone(),
    }
}

/// Parses an ISO-8601 timestamp and reformats it as `YYYY-MM-DD HH:MM:SS`.
///
/// A timezone offset, if present, is parsed and then discarded: the output is
/// the wall-clock time as written. Returns `None` when the input does not
/// parse under any accepted form.
pub fn format_timestamp(raw: &str) -> Option<String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local().format(TIMESTAMP_FORMAT).to_string());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(parsed.format(TIMESTAMP_FORMAT).to_string());
        }
    }
    None
}
