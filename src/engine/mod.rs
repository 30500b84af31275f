//! Execution engine module
//!
//! Orchestrates discovery and row projection over a document source.
//!
//! # Overview
//!
//! The engine module provides:
//! - `DiscoveryEngine` - samples a source and produces the field list
//! - `RowProjector` - compiles a field list once and turns records into rows
//! - `DiscoveryOptions` / `ProjectionStats` - run configuration and counters

mod types;

pub use types::{DiscoveryOptions, ProjectionStats, DEFAULT_SAMPLE_SIZE};

use crate::document::RawValue;
use crate::error::{Error, Result};
use crate::project::{OutputField, Row, ValueProjector};
use crate::schema::{post_process, FieldDescriptor, PathDiscoverer, PathRegistry};
use crate::source::{parse_filter, parse_pipeline, DocumentSource, RecordCursor};
use crate::types::{ErrorStrategy, OptionStringExt};
use crate::variables::{NameResolver, VariableSpace};
use std::time::Instant;
use tracing::{debug, info, warn};

// ============================================================================
// Discovery
// ============================================================================

/// Samples a document source and infers its field list
#[derive(Debug, Clone, Default)]
pub struct DiscoveryEngine {
    /// Discovery options
    options: DiscoveryOptions,
    /// Variables substituted into filter and pipeline text
    variables: VariableSpace,
}

impl DiscoveryEngine {
    /// Create a new discovery engine
    pub fn new(options: DiscoveryOptions) -> Self {
        Self {
            options,
            variables: VariableSpace::new(),
        }
    }

    /// Set the variable space
    #[must_use]
    pub fn with_variables(mut self, variables: VariableSpace) -> Self {
        self.variables = variables;
        self
    }

    /// Get the options
    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    /// Sample `source` and return the discovered fields.
    ///
    /// Any failure while sampling aborts the run; a partial field list is
    /// never returned.
    pub fn discover(&self, source: &dyn DocumentSource) -> Result<Vec<FieldDescriptor>> {
        let start = Instant::now();
        let limit = self.options.sample_size;
        if limit == 0 {
            return Err(Error::invalid_value(
                "sample_size",
                "must be greater than zero",
            ));
        }

        info!(source = %source.describe(), limit, "Sampling records");
        let cursor = self.open_cursor(source, limit)?;

        let discoverer = PathDiscoverer::new().with_empty_arrays(self.options.empty_arrays);
        let mut registry = PathRegistry::new();
        let mut sampled = 0;

        for record in cursor {
            let record = record?;
            sampled += 1;
            debug!(record = sampled, "Walking sampled record");
            discoverer.discover(&record, &mut registry)?;
        }

        if sampled == 0 {
            info!(source = %source.describe(), "No records sampled, no fields discovered");
            return Ok(Vec::new());
        }

        let fields = post_process(registry, sampled);

        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            records = sampled,
            fields = fields.len(),
            duration_ms,
            "Discovery complete"
        );

        Ok(fields)
    }

    /// Pipeline scan when a pipeline is configured, plain scan otherwise
    fn open_cursor<'s>(
        &self,
        source: &'s dyn DocumentSource,
        limit: usize,
    ) -> Result<RecordCursor<'s>> {
        if let Some(pipeline) = self.options.pipeline.clone().none_if_blank() {
            let rendered = self.variables.render(&pipeline);
            let stages = parse_pipeline(&rendered, limit)?;
            debug!(stages = stages.len(), "Running aggregation pipeline");
            return source.aggregate(&stages, Some(limit));
        }

        let filter = match self.options.filter.clone().none_if_blank() {
            Some(text) => parse_filter(&self.variables.render(&text))?,
            None => None,
        };
        source.scan(filter.as_ref(), Some(limit))
    }
}

// ============================================================================
// Projection
// ============================================================================

/// Projects records into rows of typed values
#[derive(Debug, Clone)]
pub struct RowProjector {
    /// Output fields in column order
    fields: Vec<OutputField>,
    /// Record walker
    projector: ValueProjector,
}

impl RowProjector {
    /// Compile every descriptor's path once
    pub fn compile(descriptors: &[FieldDescriptor], resolver: &dyn NameResolver) -> Result<Self> {
        let fields = descriptors
            .iter()
            .map(|d| OutputField::compile(d, resolver))
            .collect::<Result<Vec<_>>>()?;
        debug!(fields = fields.len(), "Compiled output fields");
        Ok(Self::from_fields(fields))
    }

    /// Create a projector from already compiled fields
    pub fn from_fields(fields: Vec<OutputField>) -> Self {
        Self {
            fields,
            projector: ValueProjector::new(),
        }
    }

    /// Output fields in column order
    pub fn fields(&self) -> &[OutputField] {
        &self.fields
    }

    /// Project one record into a row
    pub fn project_row(&self, record: &RawValue) -> Result<Row> {
        self.fields
            .iter()
            .map(|field| self.projector.project(field, record))
            .collect()
    }

    /// Project every record a cursor yields.
    ///
    /// Source failures always abort. Conversion failures abort under
    /// `ErrorStrategy::Fail` and drop the record under `ErrorStrategy::Skip`.
    pub fn project_all(
        &self,
        cursor: RecordCursor<'_>,
        strategy: ErrorStrategy,
    ) -> Result<(Vec<Row>, ProjectionStats)> {
        let start = Instant::now();
        let mut stats = ProjectionStats::new();
        let mut rows = Vec::new();

        for record in cursor {
            let record = record?;
            stats.add_read();

            match self.project_row(&record) {
                Ok(row) => {
                    rows.push(row);
                    stats.add_row();
                }
                Err(e) if e.is_record_level() && strategy == ErrorStrategy::Skip => {
                    warn!(record = stats.records_read, error = %e, "Skipping record");
                    stats.add_skipped();
                }
                Err(e) => return Err(e),
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            records = stats.records_read,
            rows = stats.rows_projected,
            skipped = stats.records_skipped,
            "Projection complete"
        );

        Ok((rows, stats))
    }
}
