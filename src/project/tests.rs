//! Value projection tests

use super::*;
use crate::document::{RawNumber, RawValue};
use crate::path::CompiledPath;
use crate::schema::FieldDescriptor;
use crate::types::FieldType;
use crate::variables::VariableSpace;
use chrono::{TimeZone, Utc};
use serde_json::json;
use test_case::test_case;

fn output_field(path: &str, field_type: FieldType) -> OutputField {
    let compiled = CompiledPath::compile(path, &VariableSpace::isolated()).unwrap();
    OutputField::new("f", compiled, field_type)
}

fn project(path: &str, field_type: FieldType, record: serde_json::Value) -> ProjectedValue {
    output_field(path, field_type)
        .project(&RawValue::from(record))
        .unwrap()
}

fn sample_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn test_project_nested_array_element() {
    let value = project(
        "$.parent.fieldName[1]",
        FieldType::String,
        json!({"parent": {"fieldName": ["valA", "valB"]}}),
    );
    assert_eq!(value, ProjectedValue::String("valB".to_string()));
}

#[test]
fn test_project_root_array() {
    let value = project("$[1]", FieldType::Integer, json!([10, 20]));
    assert_eq!(value, ProjectedValue::Integer(20));
}

#[test]
fn test_project_document_inside_array() {
    let value = project(
        "$.items[1].sku",
        FieldType::String,
        json!({"items": [{"sku": "a"}, {"sku": "b"}]}),
    );
    assert_eq!(value, ProjectedValue::String("b".to_string()));
}

#[test_case("$.a.b", json!({"a": 5}); "field on scalar")]
#[test_case("$.a[0]", json!({"a": "x"}); "index on scalar")]
#[test_case("$.a[0]", json!({"a": {"0": 1}}); "index on document")]
#[test_case("$.a[5]", json!({"a": [1]}); "index past end")]
#[test_case("$.a[-1]", json!({"a": [1]}); "negative index")]
#[test_case("$.missing", json!({"a": 1}); "absent key")]
#[test_case("$.a.b", json!([{"a": {"b": 1}}]); "field on root array")]
fn test_shape_mismatch_is_null(path: &str, record: serde_json::Value) {
    for field_type in FieldType::ALL {
        assert_eq!(project(path, field_type, record.clone()), ProjectedValue::Null);
    }
}

#[test]
fn test_null_and_undefined_leaves_are_null() {
    for field_type in FieldType::ALL {
        assert_eq!(
            project("$.a", field_type, json!({"a": null})),
            ProjectedValue::Null
        );
        assert_eq!(
            project("$.a", field_type, json!({"a": {"$undefined": true}})),
            ProjectedValue::Null
        );
    }
}

#[test]
fn test_locate_returns_subtree() {
    let record = RawValue::from(json!({"a": {"b": [1, 2]}}));
    let path = CompiledPath::compile("$.a.b", &VariableSpace::isolated()).unwrap();

    let node = ValueProjector::new().locate(&path, &record).unwrap();
    assert_eq!(node.as_array().map(<[RawValue]>::len), Some(2));

    let root = CompiledPath::compile("$", &VariableSpace::isolated()).unwrap();
    assert_eq!(ValueProjector::new().locate(&root, &record), Some(&record));
}

// ============================================================================
// Coercion
// ============================================================================

#[test_case(RawValue::int(42), FieldType::String => ProjectedValue::String("42".into()); "integer to string")]
#[test_case(RawValue::double(1.5), FieldType::String => ProjectedValue::String("1.5".into()); "double to string")]
#[test_case(RawValue::Bool(true), FieldType::String => ProjectedValue::String("true".into()); "bool to string")]
#[test_case(RawValue::DateTime(sample_time()), FieldType::String => ProjectedValue::String("2024-01-15T10:30:00.000Z".into()); "date to string")]
#[test_case(RawValue::Bytes(b"hi".to_vec()), FieldType::String => ProjectedValue::String("hi".into()); "bytes to string")]
#[test_case(RawValue::document([("k", RawValue::int(1))]), FieldType::String => ProjectedValue::String("{\"k\":1}".into()); "document to string")]
#[test_case(RawValue::double(3.9), FieldType::Integer => ProjectedValue::Integer(3); "double truncates")]
#[test_case(RawValue::double(-3.9), FieldType::Integer => ProjectedValue::Integer(-3); "negative double truncates")]
#[test_case(RawValue::text(" 12 "), FieldType::Integer => ProjectedValue::Integer(12); "text to integer")]
#[test_case(RawValue::Bytes(b"7".to_vec()), FieldType::Integer => ProjectedValue::Integer(7); "bytes to integer")]
#[test_case(RawValue::int(2), FieldType::Number => ProjectedValue::Number(2.0); "integer to number")]
#[test_case(RawValue::text("2.5"), FieldType::Number => ProjectedValue::Number(2.5); "text to number")]
#[test_case(RawValue::Number(RawNumber::Decimal("1.10".into())), FieldType::BigNumber => ProjectedValue::BigNumber("1.10".into()); "decimal keeps text")]
#[test_case(RawValue::int(7), FieldType::BigNumber => ProjectedValue::BigNumber("7".into()); "integer to big number")]
#[test_case(RawValue::double(1.5), FieldType::BigNumber => ProjectedValue::BigNumber("1.5".into()); "double to big number")]
#[test_case(RawValue::text("12.50"), FieldType::BigNumber => ProjectedValue::BigNumber("12.50".into()); "text to big number")]
#[test_case(RawValue::DateTime(sample_time()), FieldType::BigNumber => ProjectedValue::BigNumber("1705314600000".into()); "date to big number")]
#[test_case(RawValue::text("Y"), FieldType::Boolean => ProjectedValue::Boolean(true); "text y")]
#[test_case(RawValue::text("t"), FieldType::Boolean => ProjectedValue::Boolean(true); "text t lowercase")]
#[test_case(RawValue::text("1"), FieldType::Boolean => ProjectedValue::Boolean(true); "text one")]
#[test_case(RawValue::text("yes"), FieldType::Boolean => ProjectedValue::Boolean(false); "text yes")]
#[test_case(RawValue::int(0), FieldType::Boolean => ProjectedValue::Boolean(false); "zero")]
#[test_case(RawValue::double(0.5), FieldType::Boolean => ProjectedValue::Boolean(true); "fraction is nonzero")]
#[test_case(RawValue::Bool(false), FieldType::Boolean => ProjectedValue::Boolean(false); "bool passthrough")]
#[test_case(RawValue::int(1_705_314_600_000), FieldType::Date => ProjectedValue::Date(sample_time()); "millis to date")]
#[test_case(RawValue::DateTime(sample_time()), FieldType::Date => ProjectedValue::Date(sample_time()); "date identity")]
#[test_case(RawValue::text("ab"), FieldType::Binary => ProjectedValue::Binary(b"ab".to_vec()); "text to binary")]
#[test_case(RawValue::int(5), FieldType::Binary => ProjectedValue::Binary(b"5".to_vec()); "integer to binary")]
#[test_case(RawValue::Bytes(vec![0, 255]), FieldType::Binary => ProjectedValue::Binary(vec![0, 255]); "bytes identity")]
fn test_coerce(value: RawValue, field_type: FieldType) -> ProjectedValue {
    coerce(&value, field_type, "f").unwrap()
}

#[test_case(RawValue::text("2024-01-15"), FieldType::Date; "text to date")]
#[test_case(RawValue::Bytes(vec![1]), FieldType::Date; "bytes to date")]
#[test_case(RawValue::text("abc"), FieldType::Integer; "text to integer")]
#[test_case(RawValue::text("1.5"), FieldType::Integer; "fraction text to integer")]
#[test_case(RawValue::DateTime(sample_time()), FieldType::Integer; "date to integer")]
#[test_case(RawValue::double(1e20), FieldType::Integer; "double above integer range")]
#[test_case(RawValue::double(-1e20), FieldType::Integer; "double below integer range")]
#[test_case(RawValue::Number(RawNumber::Decimal("12345678901234567890123".into())), FieldType::Integer; "decimal above integer range")]
#[test_case(RawValue::DateTime(sample_time()), FieldType::Number; "date to number")]
#[test_case(RawValue::Bool(true), FieldType::Number; "bool to number")]
#[test_case(RawValue::Bytes(vec![1]), FieldType::Boolean; "bytes to boolean")]
#[test_case(RawValue::text("1.2.3"), FieldType::BigNumber; "malformed decimal")]
fn test_coerce_rejects(value: RawValue, field_type: FieldType) {
    let err = coerce(&value, field_type, "price").unwrap_err();
    assert!(err.is_record_level());
    assert!(err.to_string().contains("'price'"), "unexpected error: {err}");
}

#[test]
fn test_projected_type_matches_declared_type() {
    let records = [
        json!({"v": 1}),
        json!({"v": 2.5}),
        json!({"v": "1"}),
        json!({"v": true}),
        json!({"v": null}),
        json!({"v": {"$date": "2024-01-15T10:30:00Z"}}),
        json!({"v": {"$numberDecimal": "9.99"}}),
        json!({"v": [1, 2]}),
        json!({}),
    ];

    for field_type in FieldType::ALL {
        for record in &records {
            // Conversion failures are errors, never a mistyped value
            if let Ok(value) = output_field("$.v", field_type).project(&RawValue::from(record)) {
                assert!(
                    value.is_null() || value.field_type() == Some(field_type),
                    "{field_type} projected {value:?} from {record}"
                );
            }
        }
    }
}

// ============================================================================
// Output fields
// ============================================================================

#[test]
fn test_indexed_domain() {
    let field = output_field("$.s", FieldType::String)
        .with_indexed_values(vec!["A".to_string(), "B".to_string()]);

    let inside = field.project(&RawValue::from(json!({"s": "A"}))).unwrap();
    assert_eq!(inside, ProjectedValue::String("A".to_string()));

    let outside = field.project(&RawValue::from(json!({"s": "C"}))).unwrap();
    assert_eq!(outside, ProjectedValue::Null);
}

#[test]
fn test_compile_from_descriptor() {
    let mut vars = VariableSpace::isolated();
    vars.set("ROOT", "parent");

    let descriptor = FieldDescriptor::new("x", "$.${ROOT}.x", FieldType::Integer)
        .with_indexed_values(vec!["1".to_string()]);
    let field = OutputField::compile(&descriptor, &vars).unwrap();

    assert_eq!(field.name(), "x");
    assert_eq!(field.path().to_string(), "$.parent.x");
    assert_eq!(field.field_type(), FieldType::Integer);
    assert_eq!(field.indexed_values(), Some(&["1".to_string()][..]));

    let value = field
        .project(&RawValue::from(json!({"parent": {"x": "41"}})))
        .unwrap();
    assert_eq!(value, ProjectedValue::Integer(41));
}

#[test]
fn test_projected_value_to_json() {
    assert_eq!(ProjectedValue::Null.to_json(), json!(null));
    assert_eq!(ProjectedValue::Integer(3).to_json(), json!(3));
    assert_eq!(ProjectedValue::Number(f64::NAN).to_json(), json!(null));
    assert_eq!(
        ProjectedValue::Date(sample_time()).to_json(),
        json!("2024-01-15T10:30:00.000Z")
    );
    assert_eq!(
        ProjectedValue::BigNumber("1.10".into()).to_json(),
        json!("1.10")
    );
    assert_eq!(
        ProjectedValue::Binary(b"hello".to_vec()).to_json(),
        json!("aGVsbG8=")
    );
}

#[test]
fn test_output_field_shared_across_threads() {
    let field = std::sync::Arc::new(output_field("$.a[0]", FieldType::Integer));
    let handles: Vec<_> = (0..4_i64)
        .map(|i| {
            let field = std::sync::Arc::clone(&field);
            std::thread::spawn(move || {
                field
                    .project(&RawValue::from(json!({"a": [i]})))
                    .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), ProjectedValue::Integer(i as i64));
    }
}
