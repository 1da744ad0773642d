//! Bit-exact wire format checks through the public API.

use chrono::{TimeZone, Utc};
use dataframe_core::{
    CodecConfig, CodecError, DataField, DataFrame, DecodeErrorKind, FieldType, NameEncoding,
    SharedFrame, Value,
};
use url::Url;

fn value_bytes(value: impl Into<Value>) -> Vec<u8> {
    DataField::new(None, value).unwrap().value().unwrap().to_vec()
}

#[test]
fn scalar_encodings_match_reference_vectors() {
    assert_eq!(value_bytes(i32::MIN), vec![0x80, 0x00, 0x00, 0x00]);
    assert_eq!(value_bytes(u64::MAX), vec![0xFF; 8]);
    assert_eq!(value_bytes(-1.0f64), vec![0xBF, 0xF0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(value_bytes(-1i8), vec![0xFF]);
    assert_eq!(value_bytes(0x0102u16), vec![0x01, 0x02]);
    assert_eq!(value_bytes(true), vec![1]);
    assert_eq!(
        value_bytes(Utc.timestamp_millis_opt(1).unwrap()),
        vec![0, 0, 0, 0, 0, 0, 0, 1]
    );
}

#[test]
fn every_type_round_trips_through_a_frame() {
    let mut child = DataFrame::new();
    child.add(Some("inner"), 5u32).unwrap();

    let values: Vec<Value> = vec![
        Value::Frame(child),
        Value::Null,
        Value::Bytes(vec![0, 1, 2, 255]),
        Value::from("text"),
        Value::S8(i8::MIN),
        Value::U8(u8::MAX),
        Value::S16(i16::MIN),
        Value::U16(u16::MAX),
        Value::S32(-1),
        Value::U32(u32::MAX),
        Value::S64(i64::MIN),
        Value::U64(u64::MAX),
        Value::Float(f32::MIN_POSITIVE),
        Value::Double(-123.456),
        Value::Boolean(false),
        Value::Date(Utc.timestamp_millis_opt(-62_135_596_800_000).unwrap()),
        Value::Uri(Url::parse("urn:example:thing").unwrap()),
        Value::Array(vec![Value::from("a"), Value::S16(-32768), Value::U8(255)]),
    ];

    let mut frame = DataFrame::new();
    for (i, value) in values.iter().enumerate() {
        frame.add(Some(&format!("f{i}")), value.clone()).unwrap();
    }

    let decoded = DataFrame::from_bytes(&frame.to_wire_bytes()).unwrap();
    assert_eq!(decoded.field_count(), FieldType::ALL.len());
    for (i, value) in values.iter().enumerate() {
        let field = decoded.field_at(i).unwrap();
        assert_eq!(field.field_type(), FieldType::ALL[i]);
        assert_eq!(field.type_code() as usize, i);
        assert_eq!(&field.object_value().unwrap(), value, "field {i}");
    }
}

#[test]
fn nested_frame_bytes_are_length_prefixed() {
    let mut child = DataFrame::new();
    child.add(Some("b"), 1u8).unwrap();
    let mut outer = DataFrame::new();
    outer.add(Some("a"), child).unwrap();

    assert_eq!(
        outer.to_wire_bytes(),
        vec![1, b'a', 0, 0, 0, 0, 4, 1, b'b', 5, 1]
    );
}

#[test]
fn empty_frame_field_is_not_null() {
    let mut outer = DataFrame::new();
    outer.add(Some("e"), DataFrame::new()).unwrap();
    let bytes = outer.to_wire_bytes();
    assert_eq!(bytes, vec![1, b'e', 0, 0, 0, 0, 0]);

    let decoded = DataFrame::from_bytes(&bytes).unwrap();
    let field = decoded.field("e").unwrap();
    assert!(!field.is_null());
    assert_eq!(field.object_value().unwrap(), Value::Frame(DataFrame::new()));
}

#[test]
fn put_versus_add() {
    let mut frame = DataFrame::new();
    frame.add(Some("x"), 1i64).unwrap();
    frame.add(Some("y"), 2i64).unwrap();

    frame.put(Some("x"), 10i64).unwrap();
    assert_eq!(frame.field_count(), 2);
    assert_eq!(frame.field_at(0).unwrap().name(), Some("x"));
    assert_eq!(frame.object_at(0).unwrap(), Value::S64(10));

    frame.add(Some("x"), 11i64).unwrap();
    assert_eq!(frame.field_count(), 3);
}

#[test]
fn truncated_stream_reports_failing_field() {
    let mut frame = DataFrame::new();
    frame.add(Some("ok"), 1u8).unwrap();
    frame.add(Some("cut"), "abcdef").unwrap();
    let bytes = frame.to_wire_bytes();

    let err = DataFrame::from_bytes(&bytes[..bytes.len() - 2]).unwrap_err();
    let CodecError::Decode(err) = err else {
        panic!("expected decode error");
    };
    assert_eq!(err.kind, DecodeErrorKind::Underflow);
    assert_eq!(err.field_index, Some(1));
    assert_eq!(err.position, 5);
    assert_eq!(err.previous, Some(0));
    assert_eq!(err.last_field.as_ref().unwrap().name(), Some("ok"));
}

#[test]
fn ascii_name_encoding_replaces_non_ascii() {
    let config = CodecConfig {
        name_encoding: NameEncoding::Ascii,
        ..CodecConfig::default()
    };
    let frame = DataFrame::with_value(Some("caf\u{e9}"), 1u8).unwrap();
    let bytes = frame.to_wire_bytes_with(&config);
    assert_eq!(bytes, vec![4, b'c', b'a', b'f', b'?', 5, 1]);

    let decoded = DataFrame::from_bytes_with(&bytes, &config).unwrap();
    assert_eq!(decoded.field_at(0).unwrap().name(), Some("caf?"));
}

#[test]
fn ascii_name_encoding_applies_to_nested_frames() {
    let config = CodecConfig {
        name_encoding: NameEncoding::Ascii,
        ..CodecConfig::default()
    };
    let child = DataFrame::with_value(Some("caf\u{e9}"), 1u8).unwrap();
    let frame = DataFrame::with_value(Some("caf\u{e9}"), child).unwrap();
    let bytes = frame.to_wire_bytes_with(&config);
    assert_eq!(
        bytes,
        vec![4, b'c', b'a', b'f', b'?', 0, 0, 0, 0, 7, 4, b'c', b'a', b'f', b'?', 5, 1]
    );

    let decoded = DataFrame::from_bytes_with(&bytes, &config).unwrap();
    let Some(Value::Frame(nested)) = decoded.object("caf?").unwrap() else {
        panic!("expected nested frame");
    };
    assert_eq!(nested.field_at(0).unwrap().name(), Some("caf?"));
}

#[test]
fn shared_frame_serializes_consistently() {
    let shared = SharedFrame::from(DataFrame::new());
    shared.add(Some("n"), 1u16).unwrap();
    let snapshot = shared.snapshot();
    assert_eq!(shared.to_wire_bytes(), snapshot.to_wire_bytes());
    assert_eq!(snapshot.digest_string().len(), 64);
}
