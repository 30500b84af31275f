//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, FileFormatArg, OutputFormat, SamplingArgs, SourceArgs};
use crate::engine::RowProjector;
use crate::error::{Error, Result, ResultExt};
use crate::loader::{load_job, save_job, validate_job, JobDefinition, SourceDefinition};
use crate::output::{rows_to_json, write_rows, OutputFormat as FileFormat};
use crate::path::{CompiledPath, PathSegment};
use crate::source::{DocumentSource, FileSource};
use crate::types::ErrorStrategy;
use crate::variables::VariableSpace;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Discover {
                source,
                sampling,
                save,
            } => self.discover(source, sampling, *save),
            Commands::Project {
                source,
                sampling,
                output,
                output_format,
                skip_errors,
            } => self.project(
                source,
                sampling,
                output.as_deref(),
                *output_format,
                *skip_errors,
            ),
            Commands::Compile { path, vars } => self.compile(path, vars),
            Commands::Validate => self.validate(),
        }
    }

    /// Load the job file given with `--job`
    fn load_job(&self) -> Result<JobDefinition> {
        let path = self
            .cli
            .job
            .as_ref()
            .ok_or_else(|| Error::config("Job file not specified (use -j flag)"))?;
        load_job(path)
    }

    /// Build the job for a run: the job file when given, with `--input`
    /// replacing its source.
    fn open_job(&self, args: &SourceArgs) -> Result<(JobDefinition, FileSource)> {
        let mut job = match (&self.cli.job, &args.input) {
            (Some(_), _) => self.load_job()?,
            (None, Some(input)) => JobDefinition::new(SourceDefinition::new(input)),
            (None, None) => {
                return Err(Error::config(
                    "No records file specified (use --input or -j)",
                ))
            }
        };

        // Relative job sources resolve against the job file's directory,
        // --input against the working directory.
        let base_dir: Option<PathBuf> = match (&args.input, &self.cli.job) {
            (Some(input), _) => {
                job.source = SourceDefinition::new(input);
                None
            }
            (None, Some(path)) => path.parent().map(Path::to_path_buf),
            (None, None) => None,
        };
        if let Some(format) = args.input_format {
            job.source.format = Some(format.into());
        }

        let source = job.source.open(base_dir.as_deref());
        Ok((job, source))
    }

    /// Sample records and print the discovered fields
    fn discover(&self, args: &SourceArgs, sampling: &SamplingArgs, save: bool) -> Result<()> {
        let (mut job, source) = self.open_job(args)?;
        sampling.apply(&mut job.discovery);
        validate_job(&job)?;

        let fields = job.discovery_engine().discover(&source)?;

        self.output_message(&json!({
            "type": "FIELDS",
            "source": source.describe(),
            "fields": fields,
        }));

        if save {
            let path = self
                .cli
                .job
                .as_ref()
                .ok_or_else(|| Error::config("--save needs a job file (use -j flag)"))?;
            let count = fields.len();
            save_job(path, &job.with_fields(fields))
                .with_context(|| format!("Failed to save fields to '{}'", path.display()))?;
            info!(path = %path.display(), fields = count, "Saved discovered fields");
        }

        Ok(())
    }

    /// Project every record and print or write the rows
    fn project(
        &self,
        args: &SourceArgs,
        sampling: &SamplingArgs,
        output: Option<&Path>,
        output_format: Option<FileFormatArg>,
        skip_errors: bool,
    ) -> Result<()> {
        let (mut job, source) = self.open_job(args)?;
        sampling.apply(&mut job.discovery);
        validate_job(&job)?;

        let descriptors = if job.fields.is_empty() {
            info!("No fields configured, discovering");
            job.discovery_engine().discover(&source)?
        } else {
            job.fields.clone()
        };

        if descriptors.is_empty() {
            self.log_message("No fields to project");
            return Ok(());
        }

        let projector = RowProjector::compile(&descriptors, &job.variable_space())?;
        let strategy = if skip_errors {
            ErrorStrategy::Skip
        } else {
            job.output
                .as_ref()
                .map_or(ErrorStrategy::Fail, |o| o.error_strategy)
        };

        let (rows, stats) = projector.project_all(source.scan(None, None)?, strategy)?;

        let target: Option<(PathBuf, FileFormat)> = match (output, &job.output) {
            (Some(path), _) => {
                let format = output_format
                    .map_or_else(|| FileFormat::from_extension(path), FileFormat::from);
                Some((path.to_path_buf(), format))
            }
            (None, Some(def)) => {
                let format = output_format.map_or_else(|| def.resolved_format(), FileFormat::from);
                Some((def.path.clone(), format))
            }
            (None, None) => None,
        };

        match target {
            Some((path, format)) => {
                let written = write_rows(&path, format, projector.fields(), &rows)?;
                self.log_message(&format!("Wrote {written} rows to {}", path.display()));
            }
            None => {
                for record in rows_to_json(projector.fields(), &rows) {
                    self.output_message(&json!({
                        "type": "RECORD",
                        "record": record,
                    }));
                }
            }
        }

        self.output_message(&json!({
            "type": "STATS",
            "stats": {
                "records_read": stats.records_read,
                "rows_projected": stats.rows_projected,
                "records_skipped": stats.records_skipped,
                "duration_ms": stats.duration_ms,
            }
        }));

        Ok(())
    }

    /// Compile a field path and print its segments
    fn compile(&self, path: &str, vars: &[String]) -> Result<()> {
        let mut space = match &self.cli.job {
            Some(_) => self.load_job()?.variable_space(),
            None => VariableSpace::new(),
        };

        for pair in vars {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                Error::invalid_value("--var", format!("expected KEY=VALUE, got '{pair}'"))
            })?;
            space.set(key.trim(), value);
        }

        let compiled = CompiledPath::compile(path, &space)?;
        let segments: Vec<Value> = compiled
            .segments()
            .iter()
            .map(|segment| match segment {
                PathSegment::Field(name) => json!({ "field": name }),
                PathSegment::Index(index) => json!({ "index": index }),
            })
            .collect();

        self.output_message(&json!({
            "type": "PATH",
            "path": compiled.to_string(),
            "segments": segments,
        }));

        Ok(())
    }

    /// Validate the job definition
    fn validate(&self) -> Result<()> {
        let job = self.load_job()?;

        self.log_message(&format!(
            "Job '{}' is valid with {} fields",
            job.name.as_deref().unwrap_or("unnamed"),
            job.fields.len()
        ));

        Ok(())
    }

    /// Output an INFO log message
    fn log_message(&self, message: &str) {
        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": message,
            }
        }));
    }

    /// Output a message in the configured format
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
