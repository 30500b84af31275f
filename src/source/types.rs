//! Document source abstractions

use super::pipeline::{apply_stages, match_filter};
use crate::document::RawValue;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lazy stream of records pulled from a source
pub type RecordCursor<'a> = Box<dyn Iterator<Item = Result<RawValue>> + 'a>;

/// On-disk layout of a file source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// A JSON array of records, or one JSON record
    #[default]
    Json,
    /// JSON Lines (one record per line)
    Jsonl,
}

impl SourceFormat {
    /// Guess the format from a file extension
    pub fn from_extension(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jsonl") || ext.eq_ignore_ascii_case("ndjson") => {
                SourceFormat::Jsonl
            }
            _ => SourceFormat::Json,
        }
    }
}

/// A collection of records that can be sampled or scanned
pub trait DocumentSource {
    /// Short description used in logs
    fn describe(&self) -> String;

    /// Every record, in source order
    fn records(&self) -> Result<RecordCursor<'_>>;

    /// Plain scan with an optional equality filter
    fn scan(&self, filter: Option<&Value>, limit: Option<usize>) -> Result<RecordCursor<'_>> {
        let mut cursor = self.records()?;
        if let Some(filter) = filter {
            cursor = match_filter(cursor, filter)?;
        }
        Ok(match limit {
            Some(limit) => Box::new(cursor.take(limit)),
            None => cursor,
        })
    }

    /// Scan through an aggregation pipeline
    fn aggregate(&self, stages: &[Value], limit: Option<usize>) -> Result<RecordCursor<'_>> {
        let cursor = apply_stages(self.records()?, stages)?;
        Ok(match limit {
            Some(limit) => Box::new(cursor.take(limit)),
            None => cursor,
        })
    }
}
