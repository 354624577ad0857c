use chrono::FixedOffset;
use chrono::TimeZone;
use chrono::Utc;
use gqlforge_scalars::ast::LiteralKind;
use gqlforge_scalars::ast::Value;
use gqlforge_scalars::name;
use gqlforge_scalars::serde_json_bytes::json;
use gqlforge_scalars::ScalarCoercion;
use gqlforge_scalars::ScalarError;
use gqlforge_scalars::ScalarValue;
use gqlforge_scalars::Scalars;
use gqlforge_scalars::ValueKind;
use pretty_assertions::assert_eq;

fn literal(source: &str) -> Value {
    Value::parse(source).unwrap()
}

#[test]
fn int_rejects_other_literal_kinds() {
    let scalars = Scalars::default();
    let int = scalars.get("Int").unwrap();
    assert_eq!(
        int.parse_literal(&literal(r#""1""#)),
        Err(ScalarError::InvalidLiteral {
            scalar: name!(Int),
            literal_kind: LiteralKind::String,
        })
    );
    assert!(int.parse_literal(&literal("1.0")).is_err());
    assert!(int.parse_literal(&literal("2147483648")).is_err());
    assert_eq!(
        int.parse_literal(&literal("-2147483648")),
        Ok(ScalarValue::Int(i32::MIN))
    );
}

#[test]
fn float_accepts_int_literal() {
    let scalars = Scalars::default();
    let float = scalars.get("Float").unwrap();
    assert_eq!(
        float.parse_literal(&literal("42")),
        Ok(ScalarValue::Float(42.0))
    );
    assert_eq!(float.try_deserialize(&json!(42)), Some(ScalarValue::Float(42.0)));
}

#[test]
fn value_type_mismatch_names_the_runtime_type() {
    let scalars = Scalars::default();
    let string = scalars.get("String").unwrap();
    let err = string.serialize(&ScalarValue::Int(1)).unwrap_err();
    assert_eq!(
        err,
        ScalarError::InvalidValue {
            scalar: name!(String),
            value_type: "Int".into(),
        }
    );
    assert_eq!(err.code(), "SCALAR_INVALID_VALUE");
    assert_eq!(string.try_serialize(&ScalarValue::Int(1)), None);
}

#[test]
fn deserialize_reports_the_wire_kind() {
    let scalars = Scalars::default();
    let boolean = scalars.get("Boolean").unwrap();
    assert_eq!(boolean.try_deserialize(&json!("true")), None);
    let err = boolean.deserialize(&json!("true")).unwrap_err();
    assert_eq!(
        err,
        ScalarError::Deserialize {
            scalar: name!(Boolean),
            found: ValueKind::String,
        }
    );
    assert_eq!(err.code(), "SCALAR_CANNOT_DESERIALIZE");
}

#[test]
fn date_time_wire_formats() {
    let scalars = Scalars::default();
    let date_time = scalars.get("DateTime").unwrap();
    let utc = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap().fixed_offset();
    assert_eq!(
        date_time.serialize(&ScalarValue::DateTime(utc)),
        Ok(json!("2020-01-01T00:00:00.000Z"))
    );
    let plus_two = FixedOffset::east_opt(7200)
        .unwrap()
        .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
        .unwrap();
    assert_eq!(
        date_time.serialize(&ScalarValue::DateTime(plus_two)),
        Ok(json!("2020-01-01T00:00:00.000+02:00"))
    );
    assert!(!date_time.is_instance_of(&literal(r#""yesterday""#)));
}

#[test]
fn uuid_wire_format_has_no_hyphens() {
    let scalars = Scalars::default();
    let uuid = scalars.get("Uuid").unwrap();
    let value = uuid
        .parse_literal(&literal(r#""00000000-0000-0000-0000-000000000001""#))
        .unwrap();
    assert_eq!(
        uuid.serialize(&value),
        Ok(json!("00000000000000000000000000000001"))
    );
}

#[test]
fn long_is_a_string_on_the_wire() {
    let scalars = Scalars::default();
    let long = scalars.get("Long").unwrap();
    let value = long.parse_literal(&literal(r#""-9223372036854775808""#)).unwrap();
    assert_eq!(long.serialize(&value), Ok(json!("-9223372036854775808")));
    assert!(!long.is_instance_of(&literal("1")));
}

#[test]
fn upload_accepts_only_null_literals() {
    let scalars = Scalars::default();
    let upload = scalars.get("Upload").unwrap();
    assert!(upload.is_instance_of(&literal("null")));
    assert_eq!(upload.parse_literal(&literal("null")), Ok(ScalarValue::Null));
    assert!(!upload.is_instance_of(&literal("\"avatar.png\"")));
    assert_eq!(
        upload.parse_literal(&literal("\"avatar.png\"")),
        Err(ScalarError::NotSupported {
            scalar: name!(Upload),
            operation: "parsing literals",
        })
    );
    assert_eq!(upload.try_deserialize(&json!("file")), None);
    assert_eq!(upload.try_deserialize(&json!(null)), Some(ScalarValue::Null));
}
