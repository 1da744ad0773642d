//! JSON conversion through the public API.

use dataframe_core::{DataFrame, FieldType, Value};
use dataframe_json::{
    marshal, marshal_frame, to_formatted_string, JsonFrameParser, ParserConfig, DEFAULT_MAX_DEPTH,
};

const DOCUMENT: &str = r#"
{
  "name": "sensor-7",
  "enabled": true,
  "reading": -12.5,
  "count": 42,
  "tags": ["a", "b\n\"c\""],
  "location": {"lat": 1e3, "lon": null},
  "empty": {}
}
"#;

#[test]
fn document_maps_onto_field_types() {
    let frame = marshal(DOCUMENT).unwrap().remove(0);
    assert_eq!(frame.field_count(), 7);
    assert!(!frame.is_modified());

    let types: Vec<FieldType> = frame.iter().map(|f| f.field_type()).collect();
    assert_eq!(
        types,
        vec![
            FieldType::String,
            FieldType::Boolean,
            FieldType::Double,
            FieldType::S64,
            FieldType::Frame,
            FieldType::Frame,
            FieldType::Frame,
        ]
    );

    let Value::Frame(location) = frame.object("location").unwrap().unwrap() else {
        panic!("location should be a frame");
    };
    assert_eq!(location.object("lat").unwrap(), Some(Value::Double(1000.0)));
    assert!(location.field("lon").unwrap().is_undefined());

    let Value::Frame(tags) = frame.object("tags").unwrap().unwrap() else {
        panic!("tags should be a frame");
    };
    assert!(tags.is_array());
    assert_eq!(tags.object_at(1).unwrap(), Value::from("b\n\"c\""));
}

#[test]
fn writer_output_is_valid_json() {
    let frame = marshal(DOCUMENT).unwrap().remove(0);
    for text in [marshal_frame(&frame), to_formatted_string(&frame)] {
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["name"], "sensor-7");
        assert_eq!(parsed["enabled"], true);
        assert_eq!(parsed["reading"], -12.5);
        assert_eq!(parsed["count"], 42);
        assert_eq!(parsed["tags"][1], "b\n\"c\"");
        assert_eq!(parsed["location"]["lat"], 1000.0);
        assert!(parsed["location"]["lon"].is_null());
        assert!(parsed["empty"].as_object().unwrap().is_empty());
    }
}

#[test]
fn json_round_trip_preserves_wire_bytes() {
    let frame = marshal(DOCUMENT).unwrap().remove(0);
    let again = marshal(&marshal_frame(&frame)).unwrap().remove(0);
    assert_eq!(again.to_wire_bytes(), frame.to_wire_bytes());
    assert_eq!(again.digest(), frame.digest());
}

#[test]
fn binary_then_json_round_trip() {
    let frame = marshal(DOCUMENT).unwrap().remove(0);
    let decoded = DataFrame::from_bytes(&frame.to_wire_bytes()).unwrap();
    assert_eq!(marshal_frame(&decoded), marshal_frame(&frame));
}

#[test]
fn strict_parser_rejects_what_lenient_accepts() {
    let lenient = JsonFrameParser::from_text("[1,,3]").parse().unwrap();
    assert_eq!(marshal_frame(&lenient[0]), "[1,null,3]");

    let err = JsonFrameParser::from_text_with("[1,,3]", ParserConfig::strict())
        .parse()
        .unwrap_err();
    let parse = err.parse_error().unwrap();
    assert_eq!(parse.offset, 3);
    assert_eq!(parse.character, Some(','));
}

#[test]
fn scalar_roots_need_parse_root() {
    assert!(marshal("\"x\"").is_err());
    let frame = JsonFrameParser::from_text("\"x\"").parse_root().unwrap();
    assert_eq!(frame.field_count(), 1);
    assert_eq!(frame.field_at(0).unwrap().name(), None);
    assert_eq!(marshal_frame(&frame), r#"["x"]"#);
}

#[test]
fn runaway_nesting_is_a_parse_error() {
    let err = marshal(&"[".repeat(100_000)).unwrap_err();
    let parse = err.parse_error().unwrap();
    assert_eq!(parse.message, "Nesting too deep");
    assert_eq!(parse.offset, DEFAULT_MAX_DEPTH);

    let err = marshal(&"{\"a\":".repeat(100_000)).unwrap_err();
    assert_eq!(err.parse_error().unwrap().message, "Nesting too deep");
}
