//! Document source module
//!
//! Sources hand out lazy record cursors for sampling and projection.
//!
//! # Overview
//!
//! - `DocumentSource` - plain scan (optional equality filter) or aggregation
//!   pipeline scan
//! - `MemorySource` - records held in memory
//! - `FileSource` - JSON array / single record or JSON Lines file
//! - Pipeline support is limited to `$match` (equality on dotted paths),
//!   `$skip` and `$limit`

mod file;
mod memory;
mod pipeline;
mod types;

pub use file::FileSource;
pub use memory::MemorySource;
pub use pipeline::{parse_filter, parse_pipeline};
pub use types::{DocumentSource, RecordCursor, SourceFormat};

#[cfg(test)]
mod tests;
