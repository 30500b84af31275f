//! Output file writers
//!
//! Writes projected rows to Parquet (through Arrow RecordBatches) or to
//! JSON Lines.

use super::schema::{fields_to_schema, rows_to_batch, rows_to_json};
use crate::error::{Error, Result};
use crate::project::{OutputField, Row};
use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Apache Parquet
    #[default]
    Parquet,
    /// JSON Lines (one object per row)
    Jsonl,
}

impl OutputFormat {
    /// Guess the format from a file extension
    pub fn from_extension(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jsonl") || ext.eq_ignore_ascii_case("ndjson") => {
                OutputFormat::Jsonl
            }
            _ => OutputFormat::Parquet,
        }
    }
}

// ============================================================================
// Parquet
// ============================================================================

/// Configuration for Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
    dictionary_enabled: bool,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024,
            dictionary_enabled: true,
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Enable or disable dictionary encoding
    #[must_use]
    pub fn with_dictionary(mut self, enabled: bool) -> Self {
        self.dictionary_enabled = enabled;
        self
    }

    /// Use no compression
    #[must_use]
    pub fn uncompressed(mut self) -> Self {
        self.compression = Compression::UNCOMPRESSED;
        self
    }

    /// Use ZSTD compression
    #[must_use]
    pub fn zstd(mut self) -> Self {
        self.compression = Compression::ZSTD(parquet::basic::ZstdLevel::default());
        self
    }

    /// Get row group size
    #[must_use]
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    fn build_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .set_dictionary_enabled(self.dictionary_enabled)
            .build()
    }
}

/// Parquet file writer
pub struct ParquetWriter {
    /// Arrow writer
    writer: ArrowWriter<File>,
    /// Number of rows written
    rows_written: usize,
}

impl ParquetWriter {
    /// Create a Parquet file with the given schema
    pub fn new(path: impl AsRef<Path>, schema: &Schema, config: &ParquetWriterConfig) -> Result<Self> {
        let file = File::create(path.as_ref())
            .map_err(|e| Error::output(format!("Failed to create file: {e}")))?;

        let writer = ArrowWriter::try_new(
            file,
            Arc::new(schema.clone()),
            Some(config.build_properties()),
        )
        .map_err(|e| Error::output(format!("Failed to create Parquet writer: {e}")))?;

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Create a Parquet file with one column per output field
    pub fn for_fields(
        path: impl AsRef<Path>,
        fields: &[OutputField],
        config: &ParquetWriterConfig,
    ) -> Result<Self> {
        Self::new(path, &fields_to_schema(fields), config)
    }

    /// Write a RecordBatch
    pub fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        self.writer
            .write(batch)
            .map_err(|e| Error::output(format!("Failed to write batch: {e}")))?;
        self.rows_written += batch.num_rows();
        Ok(())
    }

    /// Write projected rows as one batch
    pub fn write_rows(&mut self, fields: &[OutputField], rows: &[Row]) -> Result<()> {
        self.write(&rows_to_batch(fields, rows)?)
    }

    /// Number of rows written so far
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Close the writer and finalize the file
    pub fn close(self) -> Result<usize> {
        let rows = self.rows_written;
        self.writer
            .close()
            .map_err(|e| Error::output(format!("Failed to close Parquet writer: {e}")))?;
        Ok(rows)
    }
}

// ============================================================================
// JSON Lines
// ============================================================================

/// JSON Lines file writer
pub struct JsonlWriter {
    writer: BufWriter<File>,
    rows_written: usize,
}

impl JsonlWriter {
    /// Create a JSON Lines file
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path.as_ref())
            .map_err(|e| Error::output(format!("Failed to create file: {e}")))?;
        Ok(Self {
            writer: BufWriter::new(file),
            rows_written: 0,
        })
    }

    /// Write projected rows, one object per line
    pub fn write_rows(&mut self, fields: &[OutputField], rows: &[Row]) -> Result<()> {
        for record in rows_to_json(fields, rows) {
            serde_json::to_writer(&mut self.writer, &record)?;
            self.writer.write_all(b"\n")?;
            self.rows_written += 1;
        }
        Ok(())
    }

    /// Number of rows written so far
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush and close the file
    pub fn close(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.rows_written)
    }
}

/// Write projected rows to `path` in the given format
pub fn write_rows(
    path: impl AsRef<Path>,
    format: OutputFormat,
    fields: &[OutputField],
    rows: &[Row],
) -> Result<usize> {
    let path = path.as_ref();
    debug!(path = %path.display(), ?format, rows = rows.len(), "Writing output");

    match format {
        OutputFormat::Parquet => {
            let mut writer = ParquetWriter::for_fields(path, fields, &ParquetWriterConfig::default())?;
            writer.write_rows(fields, rows)?;
            writer.close()
        }
        OutputFormat::Jsonl => {
            let mut writer = JsonlWriter::new(path)?;
            writer.write_rows(fields, rows)?;
            writer.close()
        }
    }
}
