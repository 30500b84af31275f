//! CLI module
//!
//! Command-line interface for discovery and projection jobs.
//!
//! # Commands
//!
//! - `discover` - Sample records and print the discovered fields
//! - `project` - Project records into typed rows (printed or written to a file)
//! - `compile` - Compile a field path and print its segments
//! - `validate` - Validate a job definition

mod commands;
mod runner;

pub use commands::{Cli, Commands, FileFormatArg, InputFormat, OutputFormat, SamplingArgs, SourceArgs};
pub use runner::Runner;
