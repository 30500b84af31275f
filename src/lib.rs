// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # docschema
//!
//! Field discovery and typed projection for schemaless document collections.
//!
//! ## Features
//!
//! - **Field Discovery**: Sample records and infer one typed field per leaf path
//! - **Array Handling**: Canonical `[-]` keys with the observed index range
//! - **Path Compilation**: `$.a.b[2].c` paths with `${NAME}` variables
//! - **Typed Projection**: Records to rows of declared types, with coercion
//! - **Arrow Output**: Rows as Arrow `RecordBatch`, Parquet or JSON Lines files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docschema::engine::{DiscoveryEngine, RowProjector};
//! use docschema::source::{DocumentSource, FileSource};
//! use docschema::variables::VariableSpace;
//! use docschema::ErrorStrategy;
//!
//! fn main() -> docschema::Result<()> {
//!     let source = FileSource::from_path("orders.jsonl");
//!
//!     // Sample the first 100 records
//!     let fields = DiscoveryEngine::default().discover(&source)?;
//!
//!     // Project every record into typed rows
//!     let projector = RowProjector::compile(&fields, &VariableSpace::new())?;
//!     let (rows, stats) = projector.project_all(source.scan(None, None)?, ErrorStrategy::Fail)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      Engine / CLI                          │
//! │  discover(source) → fields    project_all(cursor) → rows   │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────┬───────────┬─────┴──────┬───────────┬───────────┐
//! │  Source  │ Document  │   Schema   │  Project  │  Output   │
//! ├──────────┼───────────┼────────────┼───────────┼───────────┤
//! │ JSON     │ RawValue  │ Discoverer │ Paths     │ Arrow     │
//! │ JSONL    │ Extended  │ Registry   │ Coercion  │ Parquet   │
//! │ Pipeline │ JSON      │ Naming     │ Domains   │ JSONL     │
//! └──────────┴───────────┴────────────┴───────────┴───────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// `${NAME}` variable substitution
pub mod variables;

/// Document value model
pub mod document;

/// Field discovery and naming
pub mod schema;

/// Field path compilation
pub mod path;

/// Typed value projection
pub mod project;

/// Document sources and query pipelines
pub mod source;

/// Discovery and projection engine
pub mod engine;

/// Arrow/Parquet output
pub mod output;

/// YAML loader for job definitions
pub mod loader;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use engine::{DiscoveryEngine, RowProjector};
pub use loader::{load_job, load_job_from_str, JobDefinition};
pub use schema::FieldDescriptor;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
