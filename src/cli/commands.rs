//! CLI commands and argument parsing

use crate::engine::DiscoveryOptions;
use crate::output::OutputFormat as FileFormat;
use crate::schema::EmptyArrayPolicy;
use crate::source::SourceFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Document schema discovery and projection CLI
#[derive(Parser, Debug)]
#[command(name = "docschema")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Job definition file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub job: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sample records and print the discovered fields
    Discover {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        sampling: SamplingArgs,

        /// Store the discovered fields in the job file
        #[arg(long)]
        save: bool,
    },

    /// Project every record into typed rows
    Project {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        sampling: SamplingArgs,

        /// Output file (rows are printed when absent)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file format (guessed from the extension when absent)
        #[arg(long, value_enum)]
        output_format: Option<FileFormatArg>,

        /// Skip records whose values fail to convert
        #[arg(long)]
        skip_errors: bool,
    },

    /// Compile a field path and print its segments
    Compile {
        /// Path to compile, e.g. `$.parent.list[1].name`
        #[arg(short, long)]
        path: String,

        /// Variable for `${NAME}` references (KEY=VALUE, repeatable)
        #[arg(long = "var")]
        vars: Vec<String>,
    },

    /// Validate a job definition
    Validate,
}

/// Record source arguments
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Records file (overrides the job's source)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Records file format (guessed from the extension when absent)
    #[arg(long, value_enum)]
    pub input_format: Option<InputFormat>,
}

/// Sampling arguments, overriding the job's discovery settings
#[derive(Args, Debug, Clone, Default)]
pub struct SamplingArgs {
    /// Number of records to sample
    #[arg(long)]
    pub sample: Option<usize>,

    /// Query filter, e.g. `{status: A}`
    #[arg(long)]
    pub filter: Option<String>,

    /// Aggregation pipeline, e.g. `{$match: {status: A}}, {$skip: 10}`
    #[arg(long)]
    pub pipeline: Option<String>,

    /// Do not register empty arrays as fields
    #[arg(long)]
    pub skip_empty_arrays: bool,
}

impl SamplingArgs {
    /// Apply the given overrides to discovery options
    pub fn apply(&self, options: &mut DiscoveryOptions) {
        if let Some(sample) = self.sample {
            options.sample_size = sample;
        }
        if let Some(filter) = &self.filter {
            options.filter = Some(filter.clone());
        }
        if let Some(pipeline) = &self.pipeline {
            options.pipeline = Some(pipeline.clone());
        }
        if self.skip_empty_arrays {
            options.empty_arrays = EmptyArrayPolicy::Skip;
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

/// Records file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    /// JSON array or single record
    Json,
    /// JSON Lines
    Jsonl,
}

impl From<InputFormat> for SourceFormat {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Json => SourceFormat::Json,
            InputFormat::Jsonl => SourceFormat::Jsonl,
        }
    }
}

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FileFormatArg {
    /// Apache Parquet
    Parquet,
    /// JSON Lines
    Jsonl,
}

impl From<FileFormatArg> for FileFormat {
    fn from(format: FileFormatArg) -> Self {
        match format {
            FileFormatArg::Parquet => FileFormat::Parquet,
            FileFormatArg::Jsonl => FileFormat::Jsonl,
        }
    }
}
