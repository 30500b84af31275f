//! YAML Loader module
//!
//! Parse job definitions from YAML files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `JobDefinition` - source, discovery settings, variables, fields and output
//! - YAML parsing with validation
//! - Saving a job back to YAML, so discovered fields can be stored with it

mod parser;
mod types;

pub use parser::{job_to_yaml, load_job, load_job_from_str, save_job, validate_job};
pub use types::{JobDefinition, OutputDefinition, SourceDefinition};
