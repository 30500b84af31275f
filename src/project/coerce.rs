//! Leaf value coercion to a declared type

use super::types::ProjectedValue;
use crate::document::{format_datetime, millis_to_datetime, RawNumber, RawValue};
use crate::error::{Error, Result};
use crate::types::FieldType;
use regex::Regex;
use std::sync::LazyLock;

/// Plain or scientific decimal notation
static DECIMAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").unwrap());

/// Coerce a leaf to `field_type`.
///
/// A null leaf is null for every type. Conversions that cannot succeed are
/// reported against `field`.
pub fn coerce(value: &RawValue, field_type: FieldType, field: &str) -> Result<ProjectedValue> {
    if value.is_null() {
        return Ok(ProjectedValue::Null);
    }

    match field_type {
        FieldType::String => Ok(ProjectedValue::String(stringify(value))),
        FieldType::Integer => to_integer(value, field).map(ProjectedValue::Integer),
        FieldType::Number => to_number(value, field).map(ProjectedValue::Number),
        FieldType::BigNumber => to_big_number(value, field).map(ProjectedValue::BigNumber),
        FieldType::Boolean => to_boolean(value, field).map(ProjectedValue::Boolean),
        FieldType::Date => to_date(value, field).map(ProjectedValue::Date),
        FieldType::Binary => Ok(ProjectedValue::Binary(to_binary(value))),
    }
}

/// Text form of any leaf
fn stringify(value: &RawValue) -> String {
    match value {
        RawValue::Null => String::new(),
        RawValue::Bool(b) => b.to_string(),
        RawValue::Number(n) => n.to_string(),
        RawValue::Text(s) => s.clone(),
        RawValue::DateTime(dt) => format_datetime(dt),
        RawValue::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        RawValue::Document(_) | RawValue::Array(_) => value.to_json().to_string(),
    }
}

fn unsupported(value: &RawValue, field_type: FieldType, field: &str) -> Error {
    Error::conversion(
        field,
        format!("{} value cannot be converted to {field_type}", value.kind()),
    )
}

fn unparseable(value: &RawValue, text: &str, field_type: FieldType, field: &str) -> Error {
    Error::conversion(
        field,
        format!("{} value '{text}' is not a valid {field_type}", value.kind()),
    )
}

fn to_integer(value: &RawValue, field: &str) -> Result<i64> {
    match value {
        RawValue::Number(n) => n
            .as_i64()
            .ok_or_else(|| unparseable(value, &n.to_string(), FieldType::Integer, field)),
        RawValue::DateTime(_) => Err(unsupported(value, FieldType::Integer, field)),
        _ => {
            let text = stringify(value);
            text.trim()
                .parse::<i64>()
                .map_err(|_| unparseable(value, &text, FieldType::Integer, field))
        }
    }
}

fn to_number(value: &RawValue, field: &str) -> Result<f64> {
    match value {
        RawValue::Number(n) => n
            .as_f64()
            .ok_or_else(|| unparseable(value, &n.to_string(), FieldType::Number, field)),
        RawValue::DateTime(_) => Err(unsupported(value, FieldType::Number, field)),
        _ => {
            let text = stringify(value);
            text.trim()
                .parse::<f64>()
                .map_err(|_| unparseable(value, &text, FieldType::Number, field))
        }
    }
}

fn to_big_number(value: &RawValue, field: &str) -> Result<String> {
    match value {
        // Decimal leaves keep their exact text
        RawValue::Number(RawNumber::Decimal(s)) if DECIMAL_REGEX.is_match(s.trim()) => {
            Ok(s.trim().to_string())
        }
        RawValue::Number(RawNumber::Integer(i)) => Ok(i.to_string()),
        RawValue::Number(n) => n
            .as_f64()
            .filter(|d| d.is_finite())
            .map(|d| d.to_string())
            .ok_or_else(|| unparseable(value, &n.to_string(), FieldType::BigNumber, field)),
        RawValue::DateTime(dt) => Ok(dt.timestamp_millis().to_string()),
        _ => {
            let text = stringify(value);
            let trimmed = text.trim();
            if DECIMAL_REGEX.is_match(trimmed) {
                Ok(trimmed.to_string())
            } else {
                Err(unparseable(value, &text, FieldType::BigNumber, field))
            }
        }
    }
}

fn to_boolean(value: &RawValue, field: &str) -> Result<bool> {
    match value {
        RawValue::Bool(b) => Ok(*b),
        RawValue::Number(n) => Ok(!n.is_zero()),
        RawValue::DateTime(dt) => Ok(dt.timestamp_millis() != 0),
        RawValue::Text(s) => {
            let s = s.trim();
            Ok(["Y", "T", "1"].iter().any(|t| s.eq_ignore_ascii_case(t)))
        }
        _ => Err(unsupported(value, FieldType::Boolean, field)),
    }
}

fn to_date(value: &RawValue, field: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    match value {
        RawValue::DateTime(dt) => Ok(*dt),
        RawValue::Number(n) => n
            .as_i64()
            .and_then(millis_to_datetime)
            .ok_or_else(|| unparseable(value, &n.to_string(), FieldType::Date, field)),
        _ => Err(unsupported(value, FieldType::Date, field)),
    }
}

fn to_binary(value: &RawValue) -> Vec<u8> {
    match value {
        RawValue::Bytes(bytes) => bytes.clone(),
        _ => stringify(value).into_bytes(),
    }
}
