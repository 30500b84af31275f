//! File backed document source

use super::types::{DocumentSource, RecordCursor, SourceFormat};
use crate::document::{parse_json_record, RawValue};
use crate::error::{Error, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Records read from a JSON or JSON Lines file.
///
/// The file is reopened for every scan. JSON Lines files are read one line
/// at a time, so only the records actually pulled are parsed.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: SourceFormat,
}

impl FileSource {
    /// Create a source with an explicit format
    pub fn new(path: impl Into<PathBuf>, format: SourceFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// Create a source, guessing the format from the file extension
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = SourceFormat::from_extension(&path);
        Self { path, format }
    }

    /// File path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File format
    pub fn format(&self) -> SourceFormat {
        self.format
    }

    fn open(&self) -> Result<File> {
        File::open(&self.path).map_err(|e| {
            Error::source_unavailable(format!("Failed to open {}: {e}", self.path.display()))
        })
    }
}

impl DocumentSource for FileSource {
    fn describe(&self) -> String {
        let format = match self.format {
            SourceFormat::Json => "json",
            SourceFormat::Jsonl => "jsonl",
        };
        format!("{format} file {}", self.path.display())
    }

    fn records(&self) -> Result<RecordCursor<'_>> {
        let file = self.open()?;

        match self.format {
            SourceFormat::Json => {
                let value: Value = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                    Error::source_unavailable(format!(
                        "Failed to parse JSON in {}: {e}",
                        self.path.display()
                    ))
                })?;
                let records = match value {
                    Value::Array(items) => items,
                    other => vec![other],
                };
                Ok(Box::new(records.into_iter().map(|v| Ok(RawValue::from(v)))))
            }
            SourceFormat::Jsonl => Ok(Box::new(JsonlLines {
                lines: BufReader::new(file).lines().enumerate(),
                path: &self.path,
            })),
        }
    }
}

/// Lazy JSON Lines reader
struct JsonlLines<'a> {
    lines: std::iter::Enumerate<std::io::Lines<BufReader<File>>>,
    path: &'a Path,
}

impl Iterator for JsonlLines<'_> {
    type Item = Result<RawValue>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (line_num, line) = self.lines.next()?;
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(Error::source_unavailable(format!(
                        "Failed to read {}: {e}",
                        self.path.display()
                    ))))
                }
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            return Some(parse_json_record(line).map_err(|e| {
                Error::source_unavailable(format!(
                    "Failed to parse JSONL at line {} of {}: {e}",
                    line_num + 1,
                    self.path.display()
                ))
            }));
        }
    }
}
