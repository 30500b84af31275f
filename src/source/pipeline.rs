//! Filter and aggregation pipeline handling
//!
//! Pipeline text is a comma separated sequence of stage objects. It is read
//! with a YAML parser so the relaxed notation document stores accept
//! (`{$match: {status: A}}`, unquoted keys) parses as well as strict JSON.

use super::types::RecordCursor;
use crate::document::RawValue;
use crate::error::{Error, Result};
use serde_json::{json, Map, Value};

/// Parse pipeline text into stages, appending `{"$limit": limit}`
pub fn parse_pipeline(text: &str, limit: usize) -> Result<Vec<Value>> {
    let trimmed = text.trim();
    let mut stages = if trimmed.is_empty() {
        Vec::new()
    } else {
        let wrapped = if trimmed.starts_with('[') {
            trimmed.to_string()
        } else {
            format!("[{trimmed}]")
        };

        let value: Value = serde_yaml::from_str(&wrapped)
            .map_err(|e| Error::config(format!("Malformed pipeline '{trimmed}': {e}")))?;
        match value {
            Value::Array(stages) => stages,
            _ => return Err(Error::config(format!("Malformed pipeline '{trimmed}'"))),
        }
    };

    for stage in &stages {
        parse_stage(stage)?;
    }

    stages.push(json!({ "$limit": limit }));
    Ok(stages)
}

/// Parse filter text (relaxed JSON) into a query document
pub fn parse_filter(text: &str) -> Result<Option<Value>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_yaml::from_str(trimmed)
        .map_err(|e| Error::config(format!("Malformed filter '{trimmed}': {e}")))?;
    validate_filter(&value)?;
    Ok(Some(value))
}

/// Apply pipeline stages to a cursor.
///
/// Every stage is validated before the returned cursor yields anything.
pub(crate) fn apply_stages<'a>(
    mut cursor: RecordCursor<'a>,
    stages: &[Value],
) -> Result<RecordCursor<'a>> {
    for stage in stages {
        cursor = match parse_stage(stage)? {
            Stage::Match(filter) => match_filter(cursor, filter)?,
            Stage::Skip(n) => Box::new(cursor.skip(n)),
            Stage::Limit(n) => Box::new(cursor.take(n)),
        };
    }
    Ok(cursor)
}

/// Keep only records equal to `filter` on every listed path
pub(crate) fn match_filter<'a>(
    cursor: RecordCursor<'a>,
    filter: &Value,
) -> Result<RecordCursor<'a>> {
    let conditions: Vec<(String, RawValue)> = validate_filter(filter)?
        .iter()
        .map(|(k, v)| (k.clone(), RawValue::from(v)))
        .collect();

    if conditions.is_empty() {
        return Ok(cursor);
    }

    Ok(Box::new(cursor.filter(move |record| match record {
        Ok(record) => conditions
            .iter()
            .all(|(path, expected)| matches_condition(record, path, expected)),
        // Errors always reach the consumer
        Err(_) => true,
    })))
}

fn validate_filter(filter: &Value) -> Result<&Map<String, Value>> {
    let map = filter
        .as_object()
        .ok_or_else(|| Error::config(format!("Filter must be a document, got '{filter}'")))?;

    if let Some(op) = map.keys().find(|k| k.starts_with('$')) {
        return Err(Error::config(format!("Unsupported filter operator '{op}'")));
    }
    Ok(map)
}

/// One supported pipeline stage
enum Stage<'v> {
    Match(&'v Value),
    Skip(usize),
    Limit(usize),
}

fn parse_stage(stage: &Value) -> Result<Stage<'_>> {
    let (name, arg) = stage
        .as_object()
        .filter(|m| m.len() == 1)
        .and_then(|m| m.iter().next())
        .ok_or_else(|| {
            Error::config(format!(
                "Pipeline stage must be a single-key document, got '{stage}'"
            ))
        })?;

    match name.as_str() {
        "$match" => Ok(Stage::Match(arg)),
        "$skip" => stage_count(name, arg).map(Stage::Skip),
        "$limit" => stage_count(name, arg).map(Stage::Limit),
        _ => Err(Error::config(format!("Unsupported pipeline stage '{name}'"))),
    }
}

fn stage_count(name: &str, arg: &Value) -> Result<usize> {
    arg.as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            Error::config(format!(
                "Stage '{name}' needs a non-negative integer, got '{arg}'"
            ))
        })
}

/// Equality on a dotted path; arrays match when any element is equal
fn matches_condition(record: &RawValue, path: &str, expected: &RawValue) -> bool {
    let mut node = Some(record);
    for part in path.split('.') {
        node = node.and_then(|n| match n {
            RawValue::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => n.get(part),
        });
    }

    match node {
        None => expected.is_null(),
        Some(RawValue::Array(items)) if !matches!(expected, RawValue::Array(_)) => {
            items.iter().any(|item| item == expected)
        }
        Some(value) => value == expected,
    }
}
