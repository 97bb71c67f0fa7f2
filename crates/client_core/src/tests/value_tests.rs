use super::*;
use chrono::{Duration, TimeZone};

#[test]
fn scalar_values_round_trip() {
    let cases = [
        (TypedValue::Bool(true), TypeTag::Boolean),
        (TypedValue::Bool(false), TypeTag::Boolean),
        (TypedValue::Int(40), TypeTag::Integer),
        (TypedValue::Int(-7), TypeTag::Long),
        (TypedValue::Double(0.015), TypeTag::Double),
        (TypedValue::Text("STOP_MODE_AT_TIME".to_owned()), TypeTag::String),
    ];
    for (value, tag) in cases {
        let decoded = TypedValue::decode(&value.encode(), &tag).expect("decode");
        assert_eq!(decoded, value);
    }
}

#[test]
fn whole_doubles_encode_without_fraction_and_still_round_trip() {
    let value = TypedValue::Double(40.0);
    assert_eq!(value.encode(), "40");
    let decoded = TypedValue::decode("40", &TypeTag::Double).expect("decode");
    assert_eq!(decoded, TypedValue::Double(40.0));
}

#[test]
fn date_time_encoding_truncates_to_whole_seconds() {
    let instant = Utc.with_ymd_and_hms(2020, 2, 24, 10, 30, 15).single().expect("timestamp")
        + Duration::milliseconds(250);
    let value = TypedValue::DateTime(instant);
    assert_eq!(value.encode(), "2020-02-24T10:30:15");

    let decoded = TypedValue::decode(&value.encode(), &TypeTag::DateTime).expect("decode");
    let truncated = Utc.with_ymd_and_hms(2020, 2, 24, 10, 30, 15).single().expect("timestamp");
    assert_eq!(decoded.as_date_time(), Some(truncated));
}

#[test]
fn date_time_decoding_accepts_rfc3339() {
    let decoded =
        TypedValue::decode("2020-02-24T10:30:15Z", &TypeTag::DateTime).expect("decode");
    let expected = Utc.with_ymd_and_hms(2020, 2, 24, 10, 30, 15).single().expect("timestamp");
    assert_eq!(decoded.as_date_time(), Some(expected));
}

#[test]
fn string_values_pass_through_unparsed() {
    let decoded = TypedValue::decode("not json {", &TypeTag::String).expect("decode");
    assert_eq!(decoded.as_str(), Some("not json {"));
}

#[test]
fn fractional_text_under_an_integer_tag_decodes_as_double() {
    // The server rounds such values itself; decoding must not reject them.
    let decoded = TypedValue::decode("1024.1111", &TypeTag::Integer).expect("decode");
    assert_eq!(decoded, TypedValue::Double(1024.1111));
}

#[test]
fn fixed_range_values_decode_as_raw_json() {
    let decoded = TypedValue::decode(
        r#"{"min":20,"max":40,"step":19}"#,
        &TypeTag::FixedRangeInteger,
    )
    .expect("decode");
    let json = decoded.as_json().expect("json payload");
    assert_eq!(json["max"], 40);
}

#[test]
fn opaque_tags_decode_as_raw_json() {
    let decoded = TypedValue::decode(
        "[[0.0,1.5],[1.0,2.5]]",
        &TypeTag::Other("DATA_SET".to_owned()),
    )
    .expect("decode");
    assert!(decoded.as_json().expect("json payload").is_array());
}

#[test]
fn structured_values_encode_as_json_text() {
    let value = TypedValue::Json(serde_json::json!({"min": 1, "max": 2, "step": 1}));
    assert_eq!(value.encode(), r#"{"max":2,"min":1,"step":1}"#);
}
