//! Loader types
//!
//! Declarative job definition types for YAML parsing.

use crate::engine::{DiscoveryEngine, DiscoveryOptions};
use crate::output::OutputFormat;
use crate::schema::FieldDescriptor;
use crate::source::{FileSource, SourceFormat};
use crate::types::{ErrorStrategy, StringMap};
use crate::variables::VariableSpace;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// Job Definition
// ============================================================================

/// Top-level job definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JobDefinition {
    /// Job name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Where records come from
    pub source: SourceDefinition,
    /// Sampling settings
    #[serde(default)]
    pub discovery: DiscoveryOptions,
    /// Variables available to `${NAME}` references
    #[serde(default, skip_serializing_if = "StringMap::is_empty")]
    pub variables: StringMap,
    /// Output fields; discovered on demand when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDescriptor>,
    /// Where projected rows go
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputDefinition>,
}

impl JobDefinition {
    /// Create a job reading from a file source
    pub fn new(source: SourceDefinition) -> Self {
        Self {
            name: None,
            source,
            discovery: DiscoveryOptions::default(),
            variables: StringMap::new(),
            fields: Vec::new(),
            output: None,
        }
    }

    /// Variables of this job, falling back to the process environment
    pub fn variable_space(&self) -> VariableSpace {
        VariableSpace::with_vars(self.variables.clone())
    }

    /// Discovery engine configured for this job
    pub fn discovery_engine(&self) -> DiscoveryEngine {
        DiscoveryEngine::new(self.discovery.clone()).with_variables(self.variable_space())
    }

    /// Replace the configured fields
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<FieldDescriptor>) -> Self {
        self.fields = fields;
        self
    }
}

// ============================================================================
// Source Definition
// ============================================================================

/// File source definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SourceDefinition {
    /// Path to the records file
    pub path: PathBuf,
    /// File format; guessed from the extension when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<SourceFormat>,
}

impl SourceDefinition {
    /// Create a source definition for a path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
        }
    }

    /// Open the source. Relative paths resolve against `base_dir`.
    pub fn open(&self, base_dir: Option<&Path>) -> FileSource {
        let path = match base_dir {
            Some(dir) if self.path.is_relative() => dir.join(&self.path),
            _ => self.path.clone(),
        };
        match self.format {
            Some(format) => FileSource::new(path, format),
            None => FileSource::from_path(path),
        }
    }
}

// ============================================================================
// Output Definition
// ============================================================================

/// Output file definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OutputDefinition {
    /// Output file path
    pub path: PathBuf,
    /// File format; guessed from the extension when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    /// What to do with records whose values fail to convert
    #[serde(default)]
    pub error_strategy: ErrorStrategy,
}

impl OutputDefinition {
    /// Effective output format
    pub fn resolved_format(&self) -> OutputFormat {
        self.format
            .unwrap_or_else(|| OutputFormat::from_extension(&self.path))
    }
}
