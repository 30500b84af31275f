//! Path discovery over sampled records

use super::types::{EmptyArrayPolicy, PathAccumulator, PathRegistry};
use crate::document::RawValue;
use crate::error::{Error, Result};
use crate::types::FieldType;
use tracing::{trace, warn};

/// Root marker of every canonical path
pub const ROOT: &str = "$";

/// Walks sampled records and merges their leaf paths into a registry
#[derive(Debug, Clone, Copy, Default)]
pub struct PathDiscoverer {
    empty_arrays: EmptyArrayPolicy,
}

impl PathDiscoverer {
    /// Create a discoverer with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how empty arrays are treated
    #[must_use]
    pub fn with_empty_arrays(mut self, policy: EmptyArrayPolicy) -> Self {
        self.empty_arrays = policy;
        self
    }

    /// Walk one record, merging every leaf path into `registry`
    pub fn discover(&self, record: &RawValue, registry: &mut PathRegistry) -> Result<()> {
        match record {
            RawValue::Document(pairs) => self.walk_document(pairs, ROOT, ROOT, registry),
            RawValue::Array(items) => self.walk_array(items, ROOT, ROOT, registry),
            leaf => merge_leaf(registry, ROOT.to_string(), ROOT.to_string(), leaf),
        }
    }

    fn walk_document(
        &self,
        pairs: &[(String, RawValue)],
        path: &str,
        name: &str,
        registry: &mut PathRegistry,
    ) -> Result<()> {
        for (key, value) in pairs {
            if !is_addressable(key) {
                warn!(path = %path, key = %key, "Skipping key that no field path can address");
                continue;
            }
            let child_path = format!("{path}.{key}");
            let child_name = format!("{name}.{key}");
            match value {
                RawValue::Document(inner) => {
                    self.walk_document(inner, &child_path, &child_name, registry)?;
                }
                RawValue::Array(items) => {
                    self.walk_array(items, &child_path, &child_name, registry)?;
                }
                leaf => merge_leaf(registry, child_path, child_name, leaf)?,
            }
        }
        Ok(())
    }

    fn walk_array(
        &self,
        items: &[RawValue],
        path: &str,
        name: &str,
        registry: &mut PathRegistry,
    ) -> Result<()> {
        if items.is_empty() {
            return match self.empty_arrays {
                EmptyArrayPolicy::Register => {
                    merge_leaf(registry, path.to_string(), name.to_string(), &RawValue::Null)
                }
                EmptyArrayPolicy::Skip => Ok(()),
            };
        }

        // Nested containers share one `[-]` key; scalars keep their index
        let nested_path = format!("{path}[-]");
        for (i, item) in items.iter().enumerate() {
            match item {
                RawValue::Document(inner) => {
                    let nested_name = format!("{name}[{i}:{i}]");
                    self.walk_document(inner, &nested_path, &nested_name, registry)?;
                }
                RawValue::Array(inner) => {
                    let nested_name = format!("{name}[{i}:{i}]");
                    self.walk_array(inner, &nested_path, &nested_name, registry)?;
                }
                leaf => merge_leaf(
                    registry,
                    format!("{path}[{i}]"),
                    format!("{name}[{i}]"),
                    leaf,
                )?,
            }
        }
        Ok(())
    }
}

/// Whether a document key survives compilation as a path field name
fn is_addressable(key: &str) -> bool {
    !key.is_empty()
        && !key.contains(|c| matches!(c, '.' | '[' | ']'))
        && !key.contains("${")
        && key.trim_end() == key
}

/// Merge one leaf observation into the registry
fn merge_leaf(
    registry: &mut PathRegistry,
    path: String,
    name: String,
    value: &RawValue,
) -> Result<()> {
    let inferred = value.inferred_type();

    if let Some(acc) = registry.get_mut(&path) {
        if acc.field_type != inferred && !acc.disparate_types {
            trace!(path = %path, from = %acc.field_type, to = %inferred, "Disparate leaf types");
            acc.disparate_types = true;
        }
        if acc.disparate_types {
            acc.field_type = FieldType::String;
        }
        acc.occurrences += 1;
        acc.name = update_min_max_array_indexes(&acc.name, &name)?;
        return Ok(());
    }

    registry.insert(PathAccumulator {
        path,
        name,
        field_type: inferred,
        occurrences: 1,
        disparate_types: false,
    });
    Ok(())
}

/// Widen the `[min:max]` ranges of `current` with those observed in `update`.
///
/// Exact (scalar) indexes are left untouched. Both paths must cross the
/// same number of array levels.
pub fn update_min_max_array_indexes(current: &str, update: &str) -> Result<String> {
    if !current.contains('[') {
        return Ok(current.to_string());
    }
    if current.matches('[').count() != update.matches('[').count() {
        return Err(Error::discovery(format!(
            "'{current}' and '{update}' do not contain the same array levels"
        )));
    }

    let mut merged = String::with_capacity(current.len());
    let mut rest = current;
    let mut rest_update = update;

    while let Some((open, close)) = next_bracket(rest) {
        let (u_open, u_close) = next_bracket(rest_update).ok_or_else(|| {
            Error::discovery(format!("Unbalanced array brackets in '{update}'"))
        })?;

        merged.push_str(&rest[..open]);
        match (
            parse_range(&rest[open + 1..close]),
            parse_range(&rest_update[u_open + 1..u_close]),
        ) {
            (Some((min, max)), Some((u_min, u_max))) => {
                merged.push_str(&format!("[{}:{}]", min.min(u_min), max.max(u_max)));
            }
            _ => merged.push_str(&rest[open..=close]),
        }

        rest = &rest[close + 1..];
        rest_update = &rest_update[u_close + 1..];
    }
    merged.push_str(rest);

    Ok(merged)
}

/// Byte offsets of the next `[` and its matching `]`
pub(crate) fn next_bracket(s: &str) -> Option<(usize, usize)> {
    let open = s.find('[')?;
    let close = s[open..].find(']')? + open;
    Some((open, close))
}

/// Parse `min:max` bracket contents
pub(crate) fn parse_range(inner: &str) -> Option<(usize, usize)> {
    let (min, max) = inner.split_once(':')?;
    Some((min.trim().parse().ok()?, max.trim().parse().ok()?))
}
