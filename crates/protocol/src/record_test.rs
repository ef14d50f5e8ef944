//! Record and Value tests

use crate::{Record, RecordError, Value};
use bytes::BytesMut;

// ============================================================================
// Value Tests
// ============================================================================

#[test]
fn test_value_as_bytes_textual() {
    let bytes = Value::from(&b"boom"[..]);
    assert_eq!(bytes.as_bytes(), Some(&b"boom"[..]));

    let string = Value::from("boom");
    assert_eq!(string.as_bytes(), Some(&b"boom"[..]));
}

#[test]
fn test_value_as_bytes_scalars() {
    assert_eq!(Value::Int(7).as_bytes(), None);
    assert_eq!(Value::Float(1.5).as_bytes(), None);
    assert_eq!(Value::Bool(true).as_bytes(), None);
    assert_eq!(Value::Null.as_bytes(), None);
}

#[test]
fn test_value_len() {
    assert_eq!(Value::from("abcd").len(), 4);
    assert_eq!(Value::from(&b""[..]).len(), 0);
    assert_eq!(Value::Int(123456).len(), 0);
    assert!(Value::Null.is_empty());
    assert!(!Value::from("x").is_empty());
}

#[test]
fn test_value_type_names() {
    assert_eq!(Value::from(&b"x"[..]).type_name(), "bytes");
    assert_eq!(Value::from("x").type_name(), "string");
    assert_eq!(Value::Int(1).type_name(), "int");
    assert_eq!(Value::Float(1.0).type_name(), "float");
    assert_eq!(Value::Bool(false).type_name(), "bool");
    assert_eq!(Value::Null.type_name(), "null");
}

#[test]
fn test_value_from_bytesmut() {
    let buf = BytesMut::from(&b"raw"[..]);
    let value = Value::from(buf);
    assert_eq!(value.as_bytes(), Some(&b"raw"[..]));
}

// ============================================================================
// Record Tests
// ============================================================================

#[test]
fn test_record_new() {
    let record = Record::new("app", 42);
    assert_eq!(record.tag(), "app");
    assert_eq!(record.id(), 42);
    assert!(record.ext_ids().is_empty());
    assert!(record.payload().is_empty());
}

#[test]
fn test_record_payload_access() {
    let mut record = Record::new("app", 1);
    record.insert("log", "hello");
    record.insert("container_id", &b"abc123"[..]);

    assert!(record.contains_key("log"));
    assert!(!record.contains_key("missing"));
    assert_eq!(record.get("log").and_then(Value::as_bytes), Some(&b"hello"[..]));
    assert_eq!(record.payload_len("log"), 5);
    assert_eq!(record.payload_len("missing"), 0);
}

#[test]
fn test_append_to_bytes() {
    let mut record = Record::new("app", 1);
    record.insert("log", &b"2024-01-01 head"[..]);

    record.append_to("log", b"  at foo()").unwrap();
    record.append_to("log", b"  at bar()").unwrap();

    assert_eq!(
        record.get("log").and_then(Value::as_bytes),
        Some(&b"2024-01-01 head\n  at foo()\n  at bar()"[..])
    );
    // 15 head + 1 newline + 10 + 1 newline + 10
    assert_eq!(record.payload_len("log"), 37);
}

#[test]
fn test_append_to_converts_string_in_place() {
    let mut record = Record::new("app", 1);
    record.insert("log", "first line");

    record.append_to("log", b"second line").unwrap();

    let value = record.get("log").unwrap();
    assert_eq!(value.type_name(), "bytes");
    assert_eq!(value.as_bytes(), Some(&b"first line\nsecond line"[..]));
}

#[test]
fn test_append_to_missing_key() {
    let mut record = Record::new("app", 1);

    let err = record.append_to("log", b"fragment").unwrap_err();
    assert_eq!(err, RecordError::missing_field("log"));
}

#[test]
fn test_append_to_scalar_value() {
    let mut record = Record::new("app", 1);
    record.insert("log", Value::Int(7));

    let err = record.append_to("log", b"fragment").unwrap_err();
    assert_eq!(err, RecordError::unexpected_type("log", "int"));
    // Record left untouched
    assert_eq!(record.get("log"), Some(&Value::Int(7)));
}

#[test]
fn test_ext_ids_accumulate_in_order() {
    let mut record = Record::new("app", 1);
    record.push_ext_id(2);
    record.push_ext_id(3);
    record.push_ext_id(5);

    assert_eq!(record.ext_ids(), &[2, 3, 5]);
}

#[test]
fn test_recycle_clears_everything() {
    let mut record = Record::new("app", 9);
    record.insert("log", "text");
    record.push_ext_id(10);

    record.recycle();

    assert_eq!(record.tag(), "");
    assert_eq!(record.id(), 0);
    assert!(record.ext_ids().is_empty());
    assert!(record.payload().is_empty());
}

#[test]
fn test_set_tag_and_id() {
    let mut record = Record::default();
    record.set_tag("nginx");
    record.set_id(100);

    assert_eq!(record.tag(), "nginx");
    assert_eq!(record.id(), 100);
}
