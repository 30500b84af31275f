//! Document value types

use crate::types::FieldType;
use chrono::{DateTime, Utc};
use std::fmt;

/// Numeric leaf of a document
#[derive(Debug, Clone, PartialEq)]
pub enum RawNumber {
    /// 32/64-bit integer
    Integer(i64),
    /// IEEE-754 double
    Double(f64),
    /// Arbitrary precision decimal, kept as its textual form
    Decimal(String),
}

impl RawNumber {
    /// Numeric value as a double
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawNumber::Integer(i) => Some(*i as f64),
            RawNumber::Double(d) => Some(*d),
            RawNumber::Decimal(s) => s.trim().parse().ok(),
        }
    }

    /// Numeric value truncated towards zero
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RawNumber::Integer(i) => Some(*i),
            RawNumber::Double(d) => truncate_to_i64(*d),
            RawNumber::Decimal(s) => s
                .trim()
                .parse::<i64>()
                .ok()
                .or_else(|| self.as_f64().and_then(truncate_to_i64)),
        }
    }

    /// Whether the value is numerically zero
    pub fn is_zero(&self) -> bool {
        match self {
            RawNumber::Integer(i) => *i == 0,
            RawNumber::Double(d) => *d == 0.0,
            RawNumber::Decimal(_) => self.as_f64().is_some_and(|d| d == 0.0),
        }
    }
}

/// Truncate towards zero; None when non-finite or outside the i64 range
fn truncate_to_i64(d: f64) -> Option<i64> {
    // 2^63, exactly representable as f64 unlike i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let truncated = d.trunc();
    (truncated.is_finite() && (-LIMIT..LIMIT).contains(&truncated)).then(|| truncated as i64)
}

impl fmt::Display for RawNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawNumber::Integer(i) => write!(f, "{i}"),
            RawNumber::Double(d) => write!(f, "{d}"),
            RawNumber::Decimal(s) => write!(f, "{s}"),
        }
    }
}

/// One node of a sampled record tree
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Explicit null (or the `undefined` marker)
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Numeric scalar
    Number(RawNumber),
    /// Text scalar
    Text(String),
    /// Timestamp scalar (millisecond precision in practice)
    DateTime(DateTime<Utc>),
    /// Binary payload
    Bytes(Vec<u8>),
    /// Nested document, keys in insertion order
    Document(Vec<(String, RawValue)>),
    /// Ordered list of values
    Array(Vec<RawValue>),
}

impl RawValue {
    /// Build a document from key/value pairs
    pub fn document<K: Into<String>>(pairs: impl IntoIterator<Item = (K, RawValue)>) -> Self {
        RawValue::Document(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build an integer leaf
    pub fn int(value: i64) -> Self {
        RawValue::Number(RawNumber::Integer(value))
    }

    /// Build a double leaf
    pub fn double(value: f64) -> Self {
        RawValue::Number(RawNumber::Double(value))
    }

    /// Build a text leaf
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }

    /// Check for null
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Look up a key in a document. Returns None for non-documents.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        match self {
            RawValue::Document(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Array elements, if this is an array
    pub fn as_array(&self) -> Option<&[RawValue]> {
        match self {
            RawValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "boolean",
            RawValue::Number(RawNumber::Integer(_)) => "integer",
            RawValue::Number(RawNumber::Double(_)) => "double",
            RawValue::Number(RawNumber::Decimal(_)) => "decimal",
            RawValue::Text(_) => "text",
            RawValue::DateTime(_) => "datetime",
            RawValue::Bytes(_) => "binary",
            RawValue::Document(_) => "document",
            RawValue::Array(_) => "array",
        }
    }

    /// Output type inferred for a leaf of this kind.
    ///
    /// Null leaves are typed as String, matching how an unknown value is
    /// rendered.
    pub fn inferred_type(&self) -> FieldType {
        match self {
            RawValue::Bool(_) => FieldType::Boolean,
            RawValue::Number(RawNumber::Integer(_)) => FieldType::Integer,
            RawValue::Number(RawNumber::Double(_)) => FieldType::Number,
            RawValue::Number(RawNumber::Decimal(_)) => FieldType::BigNumber,
            RawValue::DateTime(_) => FieldType::Date,
            RawValue::Bytes(_) => FieldType::Binary,
            RawValue::Null | RawValue::Text(_) | RawValue::Document(_) | RawValue::Array(_) => {
                FieldType::String
            }
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::int(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::double(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::text(value)
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<DateTime<Utc>> for RawValue {
    fn from(value: DateTime<Utc>) -> Self {
        RawValue::DateTime(value)
    }
}

impl From<Vec<RawValue>> for RawValue {
    fn from(items: Vec<RawValue>) -> Self {
        RawValue::Array(items)
    }
}
