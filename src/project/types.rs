//! Projection types

use super::projector::ValueProjector;
use crate::document::{format_datetime, RawValue};
use crate::error::Result;
use crate::path::CompiledPath;
use crate::schema::FieldDescriptor;
use crate::types::FieldType;
use crate::variables::NameResolver;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// One typed cell of a projected row
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectedValue {
    Null,
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    /// Decimal kept in its textual form
    BigNumber(String),
    Binary(Vec<u8>),
}

impl ProjectedValue {
    /// Check for null
    pub fn is_null(&self) -> bool {
        matches!(self, ProjectedValue::Null)
    }

    /// Declared type this value belongs to, None for null
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            ProjectedValue::Null => None,
            ProjectedValue::String(_) => Some(FieldType::String),
            ProjectedValue::Integer(_) => Some(FieldType::Integer),
            ProjectedValue::Number(_) => Some(FieldType::Number),
            ProjectedValue::Boolean(_) => Some(FieldType::Boolean),
            ProjectedValue::Date(_) => Some(FieldType::Date),
            ProjectedValue::BigNumber(_) => Some(FieldType::BigNumber),
            ProjectedValue::Binary(_) => Some(FieldType::Binary),
        }
    }

    /// Render as JSON.
    ///
    /// Dates become RFC 3339 text, big numbers stay strings so no precision
    /// is lost, and binary is base64 encoded. Non-finite doubles become null.
    pub fn to_json(&self) -> Value {
        match self {
            ProjectedValue::Null => Value::Null,
            ProjectedValue::String(s) | ProjectedValue::BigNumber(s) => Value::String(s.clone()),
            ProjectedValue::Integer(i) => Value::from(*i),
            ProjectedValue::Number(d) => serde_json::Number::from_f64(*d)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ProjectedValue::Boolean(b) => Value::Bool(*b),
            ProjectedValue::Date(dt) => Value::String(format_datetime(dt)),
            ProjectedValue::Binary(bytes) => {
                Value::String(base64::engine::general_purpose::STANDARD.encode(bytes))
            }
        }
    }
}

/// A projected row, one value per output field
pub type Row = Vec<ProjectedValue>;

/// One output column: a compiled path plus its declared type
#[derive(Debug, Clone, PartialEq)]
pub struct OutputField {
    name: String,
    path: CompiledPath,
    field_type: FieldType,
    indexed_values: Option<Vec<String>>,
}

impl OutputField {
    /// Create an output field from an already compiled path
    pub fn new(name: impl Into<String>, path: CompiledPath, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            path,
            field_type,
            indexed_values: None,
        }
    }

    /// Compile a descriptor's path, resolving variables through `resolver`
    pub fn compile(descriptor: &FieldDescriptor, resolver: &dyn NameResolver) -> Result<Self> {
        let path = CompiledPath::compile(descriptor.path(), resolver)?;
        let mut field = Self::new(descriptor.name(), path, descriptor.field_type());
        if let Some(values) = descriptor.indexed_values() {
            field = field.with_indexed_values(values.to_vec());
        }
        Ok(field)
    }

    /// Project this field out of `record`
    pub fn project(&self, record: &RawValue) -> Result<ProjectedValue> {
        ValueProjector::new().project(self, record)
    }

    /// Restrict a String field to a fixed set of values
    #[must_use]
    pub fn with_indexed_values(mut self, values: Vec<String>) -> Self {
        self.indexed_values = Some(values);
        self
    }

    /// Column name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiled path
    pub fn path(&self) -> &CompiledPath {
        &self.path
    }

    /// Declared type
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Allowed values, if the field has an indexed domain
    pub fn indexed_values(&self) -> Option<&[String]> {
        self.indexed_values.as_deref()
    }
}
