//! In-memory document source

use super::types::{DocumentSource, RecordCursor};
use crate::document::RawValue;
use crate::error::Result;
use serde_json::Value;

/// Records held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<RawValue>,
}

impl MemorySource {
    /// Create a source over the given records
    pub fn new(records: Vec<RawValue>) -> Self {
        Self { records }
    }

    /// Create a source from JSON records
    pub fn from_json(records: impl IntoIterator<Item = Value>) -> Self {
        Self::new(records.into_iter().map(RawValue::from).collect())
    }

    /// Append a record
    pub fn push(&mut self, record: RawValue) {
        self.records.push(record);
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the source holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DocumentSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }

    fn records(&self) -> Result<RecordCursor<'_>> {
        Ok(Box::new(self.records.iter().cloned().map(Ok)))
    }
}
