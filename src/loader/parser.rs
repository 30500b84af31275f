//! YAML parser for job definitions
//!
//! Parses and validates job files. JSON job files load through the same
//! path.

use crate::error::{Error, Result};
use crate::loader::types::JobDefinition;
use crate::path::CompiledPath;
use crate::source::{parse_filter, parse_pipeline};
use crate::types::{FieldType, OptionStringExt};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load a job definition from a file
pub fn load_job(path: impl AsRef<Path>) -> Result<JobDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read job file '{}': {e}", path.display()))
    })?;
    load_job_from_str(&content)
}

/// Load a job definition from a YAML (or JSON) string
pub fn load_job_from_str(yaml: &str) -> Result<JobDefinition> {
    let job: JobDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse job YAML: {e}")))?;

    validate_job(&job)?;
    Ok(job)
}

/// Serialize a job definition back to YAML
pub fn job_to_yaml(job: &JobDefinition) -> Result<String> {
    Ok(serde_yaml::to_string(job)?)
}

/// Write a job definition to a file
pub fn save_job(path: impl AsRef<Path>, job: &JobDefinition) -> Result<()> {
    fs::write(path, job_to_yaml(job)?)?;
    Ok(())
}

/// Validate a job definition
pub fn validate_job(job: &JobDefinition) -> Result<()> {
    if job.source.path.as_os_str().is_empty() {
        return Err(Error::invalid_value("source.path", "cannot be empty"));
    }

    if job.discovery.sample_size == 0 {
        return Err(Error::invalid_value(
            "discovery.sample_size",
            "must be greater than zero",
        ));
    }

    let vars = job.variable_space();

    if let Some(pipeline) = job.discovery.pipeline.clone().none_if_blank() {
        parse_pipeline(&vars.render(&pipeline), job.discovery.sample_size)?;
    } else if let Some(filter) = job.discovery.filter.clone().none_if_blank() {
        parse_filter(&vars.render(&filter))?;
    }

    let mut names = HashSet::new();
    for field in &job.fields {
        if field.name().trim().is_empty() {
            return Err(Error::config("Field name cannot be empty"));
        }
        if !names.insert(field.name()) {
            return Err(Error::config(format!(
                "Duplicate field name '{}'",
                field.name()
            )));
        }

        CompiledPath::compile(field.path(), &vars)?;

        if field.indexed_values().is_some() && field.field_type() != FieldType::String {
            return Err(Error::invalid_value(
                format!("fields.{}.indexed_values", field.name()),
                "only String fields may declare indexed values",
            ));
        }
    }

    if let Some(output) = &job.output {
        if output.path.as_os_str().is_empty() {
            return Err(Error::invalid_value("output.path", "cannot be empty"));
        }
    }

    Ok(())
}
