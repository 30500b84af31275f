//! Document model tests

use super::*;
use crate::types::FieldType;
use chrono::{TimeZone, Utc};
use serde_json::json;

#[test]
fn test_plain_json_conversion() {
    let value = RawValue::from(json!({
        "name": "John",
        "age": 30,
        "score": 1.5,
        "active": true,
        "tags": ["a", "b"],
        "nothing": null
    }));

    assert_eq!(value.get("name"), Some(&RawValue::text("John")));
    assert_eq!(value.get("age"), Some(&RawValue::int(30)));
    assert_eq!(value.get("score"), Some(&RawValue::double(1.5)));
    assert_eq!(value.get("active"), Some(&RawValue::Bool(true)));
    assert_eq!(value.get("tags").and_then(RawValue::as_array).map(<[_]>::len), Some(2));
    assert_eq!(value.get("nothing"), Some(&RawValue::Null));
    assert_eq!(value.get("missing"), None);
}

#[test]
fn test_document_preserves_key_order() {
    let value = parse_json_record(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
    let RawValue::Document(pairs) = value else {
        panic!("expected document");
    };
    let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_extended_date() {
    let expected = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();

    let iso = RawValue::from(json!({"$date": "2024-01-15T10:30:00Z"}));
    assert_eq!(iso, RawValue::DateTime(expected));

    let millis = RawValue::from(json!({"$date": expected.timestamp_millis()}));
    assert_eq!(millis, RawValue::DateTime(expected));

    let canonical = RawValue::from(json!({
        "$date": {"$numberLong": expected.timestamp_millis().to_string()}
    }));
    assert_eq!(canonical, RawValue::DateTime(expected));
}

#[test]
fn test_extended_numbers() {
    assert_eq!(
        RawValue::from(json!({"$numberLong": "9007199254740993"})),
        RawValue::int(9_007_199_254_740_993)
    );
    assert_eq!(RawValue::from(json!({"$numberInt": "7"})), RawValue::int(7));
    assert_eq!(
        RawValue::from(json!({"$numberDouble": "2.5"})),
        RawValue::double(2.5)
    );
    assert_eq!(
        RawValue::from(json!({"$numberDecimal": "12345.678901234567890"})),
        RawValue::Number(RawNumber::Decimal("12345.678901234567890".to_string()))
    );
}

#[test]
fn test_extended_binary() {
    let canonical = RawValue::from(json!({"$binary": {"base64": "aGVsbG8=", "subType": "00"}}));
    assert_eq!(canonical, RawValue::Bytes(b"hello".to_vec()));

    let legacy = RawValue::from(json!({"$type": "00", "$binary": "aGVsbG8="}));
    assert_eq!(legacy, RawValue::Bytes(b"hello".to_vec()));
}

#[test]
fn test_extended_oid_and_undefined() {
    assert_eq!(
        RawValue::from(json!({"$oid": "507f1f77bcf86cd799439011"})),
        RawValue::text("507f1f77bcf86cd799439011")
    );
    assert_eq!(RawValue::from(json!({"$undefined": true})), RawValue::Null);
}

#[test]
fn test_malformed_wrapper_stays_document() {
    let value = RawValue::from(json!({"$date": "not a date"}));
    assert!(matches!(value, RawValue::Document(_)));
    assert_eq!(value.get("$date"), Some(&RawValue::text("not a date")));
}

#[test]
fn test_inferred_type() {
    assert_eq!(RawValue::Null.inferred_type(), FieldType::String);
    assert_eq!(RawValue::text("x").inferred_type(), FieldType::String);
    assert_eq!(RawValue::int(1).inferred_type(), FieldType::Integer);
    assert_eq!(RawValue::double(1.0).inferred_type(), FieldType::Number);
    assert_eq!(
        RawValue::Number(RawNumber::Decimal("1".into())).inferred_type(),
        FieldType::BigNumber
    );
    assert_eq!(RawValue::Bool(false).inferred_type(), FieldType::Boolean);
    assert_eq!(
        RawValue::DateTime(Utc.timestamp_millis_opt(0).unwrap()).inferred_type(),
        FieldType::Date
    );
    assert_eq!(RawValue::Bytes(vec![1]).inferred_type(), FieldType::Binary);
}

#[test]
fn test_raw_number_helpers() {
    assert_eq!(RawNumber::Double(3.9).as_i64(), Some(3));
    assert_eq!(RawNumber::Double(-3.9).as_i64(), Some(-3));
    assert_eq!(RawNumber::Double(f64::NAN).as_i64(), None);
    assert_eq!(RawNumber::Double(1e20).as_i64(), None);
    assert_eq!(RawNumber::Double(9_223_372_036_854_775_808.0).as_i64(), None);
    assert_eq!(RawNumber::Double(-9_223_372_036_854_775_808.0).as_i64(), Some(i64::MIN));
    assert_eq!(
        RawNumber::Decimal("9223372036854775807".into()).as_i64(),
        Some(i64::MAX)
    );
    assert_eq!(RawNumber::Decimal("-7.9".into()).as_i64(), Some(-7));
    assert_eq!(RawNumber::Decimal("1e30".into()).as_i64(), None);
    assert_eq!(RawNumber::Decimal("2.50".into()).as_f64(), Some(2.5));
    assert!(RawNumber::Integer(0).is_zero());
    assert!(!RawNumber::Double(0.1).is_zero());
}

#[test]
fn test_to_json_round_trips_typed_leaves() {
    let original = json!({
        "when": {"$date": "2024-01-15T10:30:00.000Z"},
        "blob": {"$binary": {"base64": "aGVsbG8=", "subType": "00"}},
        "n": 5
    });
    let value = RawValue::from(&original);
    assert_eq!(value.to_json(), original);
}
