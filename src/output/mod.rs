//! Output module
//!
//! Handles Arrow RecordBatch creation and output file writing.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Mapping declared field types to Arrow column types
//! - Assembling projected rows into Arrow RecordBatches
//! - Writing Parquet or JSON Lines files

mod schema;
mod writer;

pub use schema::{arrow_type, fields_to_schema, rows_to_batch, rows_to_json};
pub use writer::{
    write_rows, JsonlWriter, OutputFormat, ParquetWriter, ParquetWriterConfig,
};
