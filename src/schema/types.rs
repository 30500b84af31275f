//! Schema types

use crate::types::FieldType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What to do with an array that has no elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyArrayPolicy {
    /// Register a String field at the array's own path
    #[default]
    Register,
    /// Nothing can be inferred from an empty array; register nothing
    Skip,
}

/// Running state for one canonical path during a discovery run
#[derive(Debug, Clone, PartialEq)]
pub struct PathAccumulator {
    /// Canonical path key (`[-]` for nested array levels)
    pub path: String,
    /// Path with the `[min:max]` index range seen at every array level
    pub name: String,
    /// Inferred leaf type
    pub field_type: FieldType,
    /// Number of leaves seen at this path
    pub occurrences: usize,
    /// Leaves at this path had differing inferred types
    pub disparate_types: bool,
}

/// Registry of every path seen during one discovery run.
///
/// Keys iterate in ordinal order, which fixes the order in which display
/// name collisions are numbered.
#[derive(Debug, Clone, Default)]
pub struct PathRegistry {
    entries: BTreeMap<String, PathAccumulator>,
}

impl PathRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct paths
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the accumulator for a canonical path
    pub fn get(&self, path: &str) -> Option<&PathAccumulator> {
        self.entries.get(path)
    }

    /// Iterate accumulators in key order
    pub fn iter(&self) -> impl Iterator<Item = &PathAccumulator> {
        self.entries.values()
    }

    pub(crate) fn get_mut(&mut self, path: &str) -> Option<&mut PathAccumulator> {
        self.entries.get_mut(path)
    }

    pub(crate) fn insert(&mut self, acc: PathAccumulator) {
        self.entries.insert(acc.path.clone(), acc);
    }

    pub(crate) fn into_accumulators(self) -> impl Iterator<Item = PathAccumulator> {
        self.entries.into_values()
    }
}

/// One discovered (or configured) output field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Output column name
    name: String,

    /// Minimized path used for projection
    path: String,

    /// Declared output type
    #[serde(rename = "type", default)]
    field_type: FieldType,

    /// Canonical path key the field was discovered under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    canonical_path: Option<String>,

    /// Fixed domain of allowed values (String fields only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    indexed_values: Option<Vec<String>>,

    /// Uncollapsed `[min:max]` path, kept when the path crosses an array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    array_index_info: Option<String>,

    /// Leaves seen at this path during sampling
    #[serde(default, skip_serializing_if = "is_zero")]
    occurrences: usize,

    /// Literal `observed/sampled` text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    occurrence_fraction: Option<String>,

    /// Leaves had differing types across samples
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    disparate_types: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl FieldDescriptor {
    /// Create a user-declared field
    pub fn new(name: impl Into<String>, path: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            field_type,
            canonical_path: None,
            indexed_values: None,
            array_index_info: None,
            occurrences: 0,
            occurrence_fraction: None,
            disparate_types: false,
        }
    }

    /// Build a descriptor from a finished accumulator
    pub(crate) fn discovered(
        acc: &PathAccumulator,
        name: String,
        path: String,
        sample_count: usize,
        array_index_info: Option<String>,
    ) -> Self {
        Self {
            name,
            path,
            field_type: acc.field_type,
            canonical_path: Some(acc.path.clone()),
            indexed_values: None,
            array_index_info,
            occurrences: acc.occurrences,
            occurrence_fraction: Some(format!("{}/{sample_count}", acc.occurrences)),
            disparate_types: acc.disparate_types,
        }
    }

    /// Restrict a String field to a fixed value domain
    #[must_use]
    pub fn with_indexed_values(mut self, values: Vec<String>) -> Self {
        self.indexed_values = Some(values);
        self
    }

    /// Output column name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Minimized path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Declared type
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Canonical path key, for discovered fields
    pub fn canonical_path(&self) -> Option<&str> {
        self.canonical_path.as_deref()
    }

    /// Fixed value domain
    pub fn indexed_values(&self) -> Option<&[String]> {
        self.indexed_values.as_deref()
    }

    /// Uncollapsed array range path
    pub fn array_index_info(&self) -> Option<&str> {
        self.array_index_info.as_deref()
    }

    /// Leaves seen at this path during sampling
    pub fn occurrences(&self) -> usize {
        self.occurrences
    }

    /// Literal `observed/sampled` text
    pub fn occurrence_fraction(&self) -> Option<&str> {
        self.occurrence_fraction.as_deref()
    }

    /// Whether leaves had differing types across samples
    pub fn has_disparate_types(&self) -> bool {
        self.disparate_types
    }
}
