//! Engine types
//!
//! Options for discovery runs and statistics for projection runs.

use crate::schema::EmptyArrayPolicy;
use serde::{Deserialize, Serialize};

/// Default number of records sampled during discovery
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Configuration for a discovery run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryOptions {
    /// Maximum number of records to sample
    pub sample_size: usize,
    /// Query filter text (relaxed JSON)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Aggregation pipeline text; takes precedence over `filter`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<String>,
    /// Handling of empty arrays
    pub empty_arrays: EmptyArrayPolicy,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            filter: None,
            pipeline: None,
            empty_arrays: EmptyArrayPolicy::default(),
        }
    }
}

impl DiscoveryOptions {
    /// Create options with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set sample size
    #[must_use]
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size;
        self
    }

    /// Set query filter text
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set aggregation pipeline text
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: impl Into<String>) -> Self {
        self.pipeline = Some(pipeline.into());
        self
    }

    /// Set empty array handling
    #[must_use]
    pub fn with_empty_arrays(mut self, policy: EmptyArrayPolicy) -> Self {
        self.empty_arrays = policy;
        self
    }
}

/// Statistics from a projection run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionStats {
    /// Records pulled from the source
    pub records_read: usize,
    /// Rows produced
    pub rows_projected: usize,
    /// Records dropped because a value failed to convert
    pub records_skipped: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl ProjectionStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a record read
    pub fn add_read(&mut self) {
        self.records_read += 1;
    }

    /// Count a projected row
    pub fn add_row(&mut self) {
        self.rows_projected += 1;
    }

    /// Count a skipped record
    pub fn add_skipped(&mut self) {
        self.records_skipped += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
