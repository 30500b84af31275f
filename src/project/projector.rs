//! Record navigation along a compiled path

use super::coerce::coerce;
use super::types::{OutputField, ProjectedValue};
use crate::document::RawValue;
use crate::error::Result;
use crate::path::{CompiledPath, PathSegment};
use tracing::debug;

/// Walks records along output field paths
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueProjector;

impl ValueProjector {
    /// Create a projector
    pub fn new() -> Self {
        Self
    }

    /// Extract and coerce the value `field` addresses in `record`.
    ///
    /// Any shape mismatch along the way yields null.
    pub fn project(&self, field: &OutputField, record: &RawValue) -> Result<ProjectedValue> {
        let Some(leaf) = self.locate(field.path(), record) else {
            return Ok(ProjectedValue::Null);
        };

        let value = coerce(leaf, field.field_type(), field.name())?;

        if let (Some(domain), ProjectedValue::String(s)) = (field.indexed_values(), &value) {
            if !domain.iter().any(|allowed| allowed == s) {
                debug!(field = field.name(), value = %s, "Value outside indexed domain");
                return Ok(ProjectedValue::Null);
            }
        }

        Ok(value)
    }

    /// Node addressed by `path`, if the record has one
    pub fn locate<'r>(&self, path: &CompiledPath, record: &'r RawValue) -> Option<&'r RawValue> {
        descend(path, 0, record)
    }
}

fn descend<'r>(path: &CompiledPath, cursor: usize, node: &'r RawValue) -> Option<&'r RawValue> {
    let Some(segment) = path.segment(cursor) else {
        return Some(node);
    };

    match (segment, node) {
        (PathSegment::Field(name), RawValue::Document(_)) => {
            descend(path, cursor + 1, node.get(name)?)
        }
        (PathSegment::Index(index), RawValue::Array(items)) => {
            let item = usize::try_from(*index).ok().and_then(|i| items.get(i))?;
            descend(path, cursor + 1, item)
        }
        _ => None,
    }
}
