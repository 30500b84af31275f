//! Conversion between JSON and the document model
//!
//! Plain JSON maps onto `RawValue` directly. Objects that are exactly one of
//! the extended-JSON wrappers are unwrapped into the typed scalar they
//! describe; a wrapper with an unparseable payload is kept as an ordinary
//! document.

use super::types::{RawNumber, RawValue};
use crate::error::Result;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Value};

/// Parse a JSON text into a record
pub fn parse_json_record(text: &str) -> Result<RawValue> {
    let value: Value = serde_json::from_str(text)?;
    Ok(RawValue::from(value))
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        RawValue::from(&value)
    }
}

impl From<&Value> for RawValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(b) => RawValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    RawValue::int(i)
                } else {
                    RawValue::double(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => RawValue::Text(s.clone()),
            Value::Array(items) => RawValue::Array(items.iter().map(RawValue::from).collect()),
            Value::Object(map) => unwrap_extended(map).unwrap_or_else(|| {
                RawValue::Document(
                    map.iter()
                        .map(|(k, v)| (k.clone(), RawValue::from(v)))
                        .collect(),
                )
            }),
        }
    }
}

/// Recognise an extended-JSON wrapper object
fn unwrap_extended(map: &Map<String, Value>) -> Option<RawValue> {
    if map.len() == 2 && map.contains_key("$type") {
        return map
            .get("$binary")
            .and_then(Value::as_str)
            .and_then(decode_base64)
            .map(RawValue::Bytes);
    }

    let first = map.keys().next()?;
    if !first.starts_with('$') {
        return None;
    }

    match (map.len(), first.as_str()) {
        (1, "$oid") => map[first].as_str().map(RawValue::text),
        (1, "$date") => parse_date(&map[first]).map(RawValue::DateTime),
        (1, "$numberLong" | "$numberInt") => map[first]
            .as_str()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .map(RawValue::int),
        (1, "$numberDouble") => map[first]
            .as_str()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .map(RawValue::double),
        (1, "$numberDecimal") => map[first]
            .as_str()
            .map(|s| RawValue::Number(RawNumber::Decimal(s.to_string()))),
        (1, "$undefined") => Some(RawValue::Null),
        (1, "$binary") => map[first]
            .get("base64")
            .and_then(Value::as_str)
            .and_then(decode_base64)
            .map(RawValue::Bytes),
        _ => None,
    }
}

fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(millis_to_datetime),
        Value::Object(inner) => inner
            .get("$numberLong")
            .and_then(Value::as_str)
            .and_then(|s| s.trim().parse::<i64>().ok())
            .and_then(millis_to_datetime),
        _ => None,
    }
}

fn decode_base64(text: &str) -> Option<Vec<u8>> {
    base64::engine::general_purpose::STANDARD.decode(text).ok()
}

/// Convert epoch milliseconds into a UTC timestamp
pub(crate) fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Render a timestamp the way it is stringified in output columns
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl RawValue {
    /// Convert back into (relaxed extended) JSON
    pub fn to_json(&self) -> Value {
        match self {
            RawValue::Null => Value::Null,
            RawValue::Bool(b) => Value::Bool(*b),
            RawValue::Number(RawNumber::Integer(i)) => Value::from(*i),
            RawValue::Number(RawNumber::Double(d)) => {
                serde_json::Number::from_f64(*d).map_or_else(
                    || serde_json::json!({ "$numberDouble": d.to_string() }),
                    Value::Number,
                )
            }
            RawValue::Number(RawNumber::Decimal(s)) => serde_json::json!({ "$numberDecimal": s }),
            RawValue::Text(s) => Value::String(s.clone()),
            RawValue::DateTime(dt) => serde_json::json!({ "$date": format_datetime(dt) }),
            RawValue::Bytes(bytes) => serde_json::json!({
                "$binary": {
                    "base64": base64::engine::general_purpose::STANDARD.encode(bytes),
                    "subType": "00"
                }
            }),
            RawValue::Document(pairs) => Value::Object(
                pairs
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            RawValue::Array(items) => Value::Array(items.iter().map(RawValue::to_json).collect()),
        }
    }
}
