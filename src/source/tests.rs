//! Document source tests

use super::*;
use crate::document::RawValue;
use crate::error::Error;
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;

fn collect(cursor: RecordCursor<'_>) -> Vec<Value> {
    cursor.map(|r| r.unwrap().to_json()).collect()
}

fn people() -> MemorySource {
    MemorySource::from_json(vec![
        json!({"name": "a", "status": "A", "tags": ["x", "y"], "addr": {"city": "Oslo"}}),
        json!({"name": "b", "status": "B", "tags": ["y"], "addr": {"city": "Rome"}}),
        json!({"name": "c", "status": "A", "tags": [], "addr": {"city": "Oslo"}}),
        json!({"name": "d", "status": "A"}),
    ])
}

fn names(cursor: RecordCursor<'_>) -> Vec<String> {
    collect(cursor)
        .into_iter()
        .map(|v| v["name"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Pipeline parsing
// ============================================================================

#[test]
fn test_pipeline_appends_limit() {
    let stages = parse_pipeline(r#"{"$match": {"status": "A"}}"#, 50).unwrap();
    assert_eq!(
        stages,
        vec![json!({"$match": {"status": "A"}}), json!({"$limit": 50})]
    );
}

#[test]
fn test_pipeline_relaxed_syntax() {
    let stages = parse_pipeline("{$match: {status: A}}, {$skip: 1}", 10).unwrap();
    assert_eq!(
        stages,
        vec![
            json!({"$match": {"status": "A"}}),
            json!({"$skip": 1}),
            json!({"$limit": 10})
        ]
    );
}

#[test]
fn test_pipeline_bracketed_and_empty() {
    let stages = parse_pipeline("[{$limit: 3}]", 10).unwrap();
    assert_eq!(stages, vec![json!({"$limit": 3}), json!({"$limit": 10})]);

    let stages = parse_pipeline("   ", 10).unwrap();
    assert_eq!(stages, vec![json!({"$limit": 10})]);
}

#[test]
fn test_pipeline_rejects_malformed_text() {
    let err = parse_pipeline("{$match: {status: A}", 10).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[test]
fn test_pipeline_rejects_unsupported_stage() {
    let err = parse_pipeline("{$group: {_id: $status}}", 10).unwrap_err();
    assert!(err.to_string().contains("$group"));

    let err = parse_pipeline("{$skip: -1}", 10).unwrap_err();
    assert!(err.to_string().contains("$skip"));

    let err = parse_pipeline("{$skip: 1, $limit: 2}", 10).unwrap_err();
    assert!(err.to_string().contains("single-key"));
}

#[test]
fn test_filter_parsing() {
    assert_eq!(parse_filter("").unwrap(), None);
    assert_eq!(
        parse_filter("{status: A}").unwrap(),
        Some(json!({"status": "A"}))
    );
    assert!(parse_filter("[1, 2]").is_err());
    assert!(parse_filter("{$or: []}").is_err());
}

// ============================================================================
// Scanning
// ============================================================================

#[test]
fn test_scan_with_limit() {
    let source = people();
    assert_eq!(names(source.scan(None, Some(2)).unwrap()), vec!["a", "b"]);
    assert_eq!(source.scan(None, None).unwrap().count(), 4);
}

#[test]
fn test_scan_with_filter() {
    let source = people();

    let filter = json!({"status": "A"});
    assert_eq!(
        names(source.scan(Some(&filter), Some(2)).unwrap()),
        vec!["a", "c"]
    );

    let filter = json!({"addr.city": "Oslo"});
    assert_eq!(
        names(source.scan(Some(&filter), None).unwrap()),
        vec!["a", "c"]
    );

    // Array fields match on any element
    let filter = json!({"tags": "y"});
    assert_eq!(
        names(source.scan(Some(&filter), None).unwrap()),
        vec!["a", "b"]
    );

    let filter = json!({"tags.0": "x"});
    assert_eq!(names(source.scan(Some(&filter), None).unwrap()), vec!["a"]);

    // Absent fields match null
    let filter = json!({"addr": null});
    assert_eq!(names(source.scan(Some(&filter), None).unwrap()), vec!["d"]);
}

#[test]
fn test_aggregate_stages() {
    let source = people();
    let stages = parse_pipeline("{$match: {status: A}}, {$skip: 1}", 10).unwrap();
    assert_eq!(names(source.aggregate(&stages, None).unwrap()), vec!["c", "d"]);

    let stages = parse_pipeline("", 1).unwrap();
    assert_eq!(names(source.aggregate(&stages, None).unwrap()), vec!["a"]);
}

#[test]
fn test_aggregate_validates_before_reading() {
    let source = people();
    let stages = vec![json!({"$sort": {"name": 1}})];
    assert!(source.aggregate(&stages, None).is_err());
}

#[test]
fn test_memory_source() {
    let mut source = MemorySource::default();
    assert!(source.is_empty());
    source.push(RawValue::document([("a", RawValue::int(1))]));
    assert_eq!(source.len(), 1);
    assert!(source.describe().contains("1 records"));
}

// ============================================================================
// File sources
// ============================================================================

fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_jsonl_file_source() {
    let file = temp_file(
        ".jsonl",
        "{\"name\": \"a\", \"n\": 1}\n\n{\"name\": \"b\", \"when\": {\"$date\": 0}}\n",
    );

    let source = FileSource::from_path(file.path());
    assert_eq!(source.format(), SourceFormat::Jsonl);

    let records = collect(source.scan(None, None).unwrap());
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["when"], json!({"$date": "1970-01-01T00:00:00.000Z"}));
}

#[test]
fn test_jsonl_is_lazy() {
    let file = temp_file(".jsonl", "{\"name\": \"a\"}\nnot json\n");
    let source = FileSource::new(file.path(), SourceFormat::Jsonl);

    // The malformed second line is never read
    assert_eq!(names(source.scan(None, Some(1)).unwrap()), vec!["a"]);

    let results: Vec<_> = source.scan(None, None).unwrap().collect();
    assert!(results[0].is_ok());
    let err = results[1].as_ref().unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable { .. }));
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_json_file_source() {
    let file = temp_file(".json", r#"[{"name": "a"}, {"name": "b"}]"#);
    let source = FileSource::from_path(file.path());
    assert_eq!(source.format(), SourceFormat::Json);
    assert_eq!(names(source.scan(None, None).unwrap()), vec!["a", "b"]);

    let single = temp_file(".json", r#"{"name": "only"}"#);
    let source = FileSource::from_path(single.path());
    assert_eq!(names(source.scan(None, None).unwrap()), vec!["only"]);
}

#[test]
fn test_missing_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let source = FileSource::from_path(dir.path().join("nope.jsonl"));

    let err = source.scan(None, Some(10)).err().unwrap();
    assert!(matches!(err, Error::SourceUnavailable { .. }));
}

#[test]
fn test_format_from_extension() {
    use std::path::Path;
    assert_eq!(
        SourceFormat::from_extension(Path::new("a.NDJSON")),
        SourceFormat::Jsonl
    );
    assert_eq!(
        SourceFormat::from_extension(Path::new("a.json")),
        SourceFormat::Json
    );
    assert_eq!(
        SourceFormat::from_extension(Path::new("data")),
        SourceFormat::Json
    );
}
