use gqlforge_scalars::ast::Value;
use gqlforge_scalars::name;
use gqlforge_scalars::serde_json_bytes::json;
use gqlforge_scalars::value::AnyList;
use gqlforge_scalars::value::AnyObject;
use gqlforge_scalars::AnyValue;
use gqlforge_scalars::ScalarCoercion;
use gqlforge_scalars::ScalarError;
use gqlforge_scalars::ScalarValue;
use gqlforge_scalars::Scalars;
use pretty_assertions::assert_eq;

#[test]
fn indirect_cycle_is_detected() {
    let scalars = Scalars::default();
    let any = scalars.get("Any").unwrap();

    let parent = AnyObject::default();
    let children = AnyList::default();
    let child = AnyObject::default();
    child.insert("parent", AnyValue::Object(parent.clone()));
    children.push(AnyValue::Object(child));
    parent.insert("children", AnyValue::List(children));

    let value = ScalarValue::Any(AnyValue::Object(parent));
    let expected = Err(ScalarError::CycleDetected { scalar: name!(Any) });
    assert_eq!(any.serialize(&value), expected);
    assert_eq!(any.try_serialize(&value), None);
    assert_eq!(
        any.parse_value(&value).map(|_| ()),
        Err(ScalarError::CycleDetected { scalar: name!(Any) })
    );
    assert_eq!(
        any.serialize(&value).unwrap_err().code(),
        "SCALAR_CYCLE_DETECTED"
    );
}

#[test]
fn json_structure_is_preserved() {
    let scalars = Scalars::default();
    let any = scalars.get("Any").unwrap();
    let json = json!({
        "id": 1,
        "tags": ["a", "b"],
        "nested": { "ok": true, "ratio": 0.5, "missing": null },
    });
    let value = any.deserialize(&json).unwrap();
    assert_eq!(any.serialize(&value).unwrap(), json);
    let ScalarValue::Any(AnyValue::Object(object)) = &value else {
        panic!("expected an object")
    };
    assert_eq!(
        object.entries().keys().collect::<Vec<_>>(),
        ["id", "tags", "nested"]
    );
}

#[test]
fn object_keys_must_be_names_for_literals() {
    let scalars = Scalars::default();
    let any = scalars.get("Any").unwrap();
    let value = any.deserialize(&json!({ "not a name": 1 })).unwrap();
    assert!(matches!(
        any.parse_value(&value),
        Err(ScalarError::InvalidValue { .. })
    ));
    // The wire form has no such restriction
    assert!(any.serialize(&value).is_ok());
}

#[test]
fn literals_convert_recursively() {
    let scalars = Scalars::default();
    let any = scalars.get("Any").unwrap();
    let literal = Value::parse(r#"{ a: [1, 2.5, "x", true, null], b: { c: ENUM } }"#).unwrap();
    let value = any.parse_literal(&literal).unwrap();
    assert_eq!(
        any.serialize(&value).unwrap(),
        json!({ "a": [1, 2.5, "x", true, null], "b": { "c": "ENUM" } })
    );
    assert!(!any.is_instance_of(&Value::File(gqlforge_scalars::FileHandle::new("f"))));
}
