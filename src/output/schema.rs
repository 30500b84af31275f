//! Arrow schema and RecordBatch assembly for projected rows
//!
//! Every output field becomes one nullable column whose Arrow type follows
//! the field's declared type.

use crate::error::{Error, Result};
use crate::project::{OutputField, ProjectedValue, Row};
use crate::types::FieldType;
use arrow::array::{
    ArrayRef, BinaryArray, BooleanArray, Float64Array, Int64Array, StringArray,
    TimestampMillisecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Timezone attached to Date columns
const UTC: &str = "UTC";

/// Arrow type of a column with the given declared type.
///
/// BigNumber columns are Utf8 so decimal text keeps its precision.
pub fn arrow_type(field_type: FieldType) -> DataType {
    match field_type {
        FieldType::String | FieldType::BigNumber => DataType::Utf8,
        FieldType::Integer => DataType::Int64,
        FieldType::Number => DataType::Float64,
        FieldType::Boolean => DataType::Boolean,
        FieldType::Date => DataType::Timestamp(TimeUnit::Millisecond, Some(UTC.into())),
        FieldType::Binary => DataType::Binary,
    }
}

/// Arrow schema for a list of output fields, all nullable
pub fn fields_to_schema(fields: &[OutputField]) -> Schema {
    Schema::new(
        fields
            .iter()
            .map(|f| Field::new(f.name(), arrow_type(f.field_type()), true))
            .collect::<Vec<_>>(),
    )
}

/// Convert projected rows to an Arrow RecordBatch
pub fn rows_to_batch(fields: &[OutputField], rows: &[Row]) -> Result<RecordBatch> {
    let schema = Arc::new(fields_to_schema(fields));

    if let Some(bad) = rows.iter().position(|row| row.len() != fields.len()) {
        return Err(Error::output(format!(
            "Row {bad} has {} values, expected {}",
            rows[bad].len(),
            fields.len()
        )));
    }

    if fields.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }

    let columns: Vec<ArrayRef> = fields
        .iter()
        .enumerate()
        .map(|(col, field)| {
            let values: Vec<&ProjectedValue> = rows.iter().map(|row| &row[col]).collect();
            build_array(&values, field.field_type())
        })
        .collect();

    RecordBatch::try_new(schema, columns)
        .map_err(|e| Error::output(format!("Failed to create RecordBatch: {e}")))
}

/// Build one column. Values of a different type than declared become null.
fn build_array(values: &[&ProjectedValue], field_type: FieldType) -> ArrayRef {
    match field_type {
        FieldType::String => {
            let arr: StringArray = values
                .iter()
                .map(|v| match v {
                    ProjectedValue::String(s) => Some(s.as_str()),
                    _ => None,
                })
                .collect();
            Arc::new(arr)
        }

        FieldType::BigNumber => {
            let arr: StringArray = values
                .iter()
                .map(|v| match v {
                    ProjectedValue::BigNumber(s) => Some(s.as_str()),
                    _ => None,
                })
                .collect();
            Arc::new(arr)
        }

        FieldType::Integer => {
            let arr: Int64Array = values
                .iter()
                .map(|v| match v {
                    ProjectedValue::Integer(i) => Some(*i),
                    _ => None,
                })
                .collect();
            Arc::new(arr)
        }

        FieldType::Number => {
            let arr: Float64Array = values
                .iter()
                .map(|v| match v {
                    ProjectedValue::Number(d) => Some(*d),
                    _ => None,
                })
                .collect();
            Arc::new(arr)
        }

        FieldType::Boolean => {
            let arr: BooleanArray = values
                .iter()
                .map(|v| match v {
                    ProjectedValue::Boolean(b) => Some(*b),
                    _ => None,
                })
                .collect();
            Arc::new(arr)
        }

        FieldType::Date => {
            let arr: TimestampMillisecondArray = values
                .iter()
                .map(|v| match v {
                    ProjectedValue::Date(dt) => Some(dt.timestamp_millis()),
                    _ => None,
                })
                .collect();
            Arc::new(arr.with_timezone(UTC))
        }

        FieldType::Binary => {
            let arr: BinaryArray = values
                .iter()
                .map(|v| match v {
                    ProjectedValue::Binary(b) => Some(b.as_slice()),
                    _ => None,
                })
                .collect();
            Arc::new(arr)
        }
    }
}

/// Convert projected rows to JSON objects keyed by field name
pub fn rows_to_json(fields: &[OutputField], rows: &[Row]) -> Vec<Value> {
    rows.iter()
        .map(|row| {
            let record: Map<String, Value> = fields
                .iter()
                .zip(row)
                .map(|(field, value)| (field.name().to_string(), value.to_json()))
                .collect();
            Value::Object(record)
        })
        .collect()
}
