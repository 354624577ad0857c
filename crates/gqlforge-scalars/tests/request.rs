use gqlforge_scalars::ast::Type;
use gqlforge_scalars::ast::Value;
use gqlforge_scalars::name;
use gqlforge_scalars::request::coerce_variable_values;
use gqlforge_scalars::request::coerce_variable_values_with_files;
use gqlforge_scalars::request::serialize_value;
use gqlforge_scalars::request::CoercedValue;
use gqlforge_scalars::request::ExecutionResult;
use gqlforge_scalars::request::GraphQLRequest;
use gqlforge_scalars::request::PathSegment;
use gqlforge_scalars::request::RequestError;
use gqlforge_scalars::request::SerializeError;
use gqlforge_scalars::request::VariableDefinition;
use gqlforge_scalars::serde_json_bytes::json;
use gqlforge_scalars::FileHandle;
use gqlforge_scalars::JsonMap;
use gqlforge_scalars::JsonValue;
use gqlforge_scalars::ScalarError;
use gqlforge_scalars::ScalarValue;
use gqlforge_scalars::Scalars;
use indexmap::IndexMap;
use pretty_assertions::assert_eq;

fn variables(json: JsonValue) -> JsonMap {
    match json {
        JsonValue::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

fn definition(name: &str, ty: &str) -> VariableDefinition {
    VariableDefinition::new(
        gqlforge_scalars::Name::new(name).unwrap(),
        Type::parse(ty).unwrap(),
    )
}

#[test]
fn request_body_is_parsed() {
    let request = GraphQLRequest::from_json_str(
        r#"{
            "operationName": "Hero",
            "variables": {"episode": "JEDI"},
            "extensions": {"persistedQuery": {"version": 1, "sha256Hash": "abc123"}}
        }"#,
    )
    .unwrap();
    assert_eq!(request.query, None);
    assert_eq!(request.operation_name.as_deref(), Some("Hero"));
    assert_eq!(request.variables.get("episode"), Some(&json!("JEDI")));
    assert_eq!(request.persisted_query_hash(), Some("abc123"));
    assert_eq!(GraphQLRequest::new("{ hero }").persisted_query_hash(), None);
}

#[test]
fn variables_are_deserialized_by_their_scalars() {
    let scalars = Scalars::default();
    let definitions = [
        definition("id", "ID!"),
        definition("first", "Int"),
        definition("since", "Date"),
        definition("tags", "[String!]"),
    ];
    let coerced = coerce_variable_values(
        &scalars,
        &definitions,
        &variables(json!({
            "id": 7,
            "since": "2024-02-29",
            "tags": "single",
        })),
    )
    .unwrap();
    assert_eq!(
        coerced["id"],
        CoercedValue::Scalar(ScalarValue::String("7".into()))
    );
    // Absent nullable variables are not coerced to null
    assert!(!coerced.contains_key("first"));
    assert!(matches!(
        coerced["since"],
        CoercedValue::Scalar(ScalarValue::Date(_))
    ));
    // A single value is coerced to a list of one
    assert_eq!(
        coerced["tags"],
        CoercedValue::List(vec![CoercedValue::Scalar(ScalarValue::String(
            "single".into()
        ))])
    );
}

#[test]
fn defaults_are_parsed_as_literals() {
    let scalars = Scalars::default();
    let definitions = [
        definition("first", "Int").default_value(Value::from(10)),
        definition("ids", "[Int]").default_value(Value::parse("[1, null]").unwrap()),
    ];
    let coerced = coerce_variable_values(&scalars, &definitions, &JsonMap::new()).unwrap();
    assert_eq!(coerced["first"], CoercedValue::Scalar(ScalarValue::Int(10)));
    assert_eq!(
        coerced["ids"],
        CoercedValue::List(vec![
            CoercedValue::Scalar(ScalarValue::Int(1)),
            CoercedValue::null(),
        ])
    );

    let definitions = [definition("first", "Int").default_value(Value::from("ten"))];
    let err = coerce_variable_values(&scalars, &definitions, &JsonMap::new()).unwrap_err();
    assert_eq!(err.code(), "SCALAR_INVALID_LITERAL");
}

#[test]
fn non_null_variables_are_enforced() {
    let scalars = Scalars::default();
    let definitions = [definition("id", "ID!")];
    assert_eq!(
        coerce_variable_values(&scalars, &definitions, &JsonMap::new()),
        Err(RequestError::MissingVariable { name: name!(id) })
    );
    let err = coerce_variable_values(&scalars, &definitions, &variables(json!({"id": null})))
        .unwrap_err();
    assert_eq!(err, RequestError::NullForNonNull { name: name!(id) });

    let result = ExecutionResult::from_request_error(&err);
    assert!(!result.is_ok());
    assert_eq!(result.data, None);
    assert_eq!(result.errors[0].code(), Some("BAD_USER_INPUT"));
}

#[test]
fn invalid_and_unknown_variables() {
    let scalars = Scalars::default();
    let err = coerce_variable_values(
        &scalars,
        &[definition("first", "Int")],
        &variables(json!({"first": 3_000_000_000_i64})),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        RequestError::InvalidValue {
            source: ScalarError::Deserialize { .. },
            ..
        }
    ));
    assert_eq!(err.code(), "SCALAR_CANNOT_DESERIALIZE");

    let err = coerce_variable_values(
        &scalars,
        &[definition("color", "Color")],
        &variables(json!({"color": "red"})),
    )
    .unwrap_err();
    assert_eq!(err.code(), "UNKNOWN_SCALAR");
}

#[test]
fn uploaded_files_are_bound_to_variables() {
    let scalars = Scalars::default();
    let avatar = FileHandle::new("avatar.png");
    let mut files = IndexMap::new();
    files.insert(name!(avatar), avatar.clone());
    files.insert(name!(attachments), FileHandle::new("notes.txt"));
    let coerced = coerce_variable_values_with_files(
        &scalars,
        &[
            definition("avatar", "Upload!"),
            definition("attachments", "[Upload!]"),
        ],
        // Multipart requests carry null placeholders for files
        &variables(json!({"avatar": null, "attachments": null})),
        &files,
    )
    .unwrap();
    assert_eq!(
        coerced["avatar"],
        CoercedValue::Scalar(ScalarValue::Upload(avatar))
    );
    assert_eq!(
        coerced["attachments"],
        CoercedValue::List(vec![CoercedValue::Scalar(ScalarValue::Upload(
            FileHandle::new("notes.txt")
        ))])
    );

    let err = coerce_variable_values_with_files(
        &scalars,
        &[definition("avatar", "String")],
        &JsonMap::new(),
        &files,
    )
    .unwrap_err();
    assert_eq!(err.code(), "SCALAR_CANNOT_DESERIALIZE");
}

#[test]
fn results_are_serialized_by_their_scalars() {
    let scalars = Scalars::default();
    let ty = Type::parse("[Long!]!").unwrap();
    let value = CoercedValue::List(vec![CoercedValue::Scalar(ScalarValue::Long(
        9_007_199_254_740_993,
    ))]);
    assert_eq!(
        serialize_value(&scalars, &ty, &value),
        Ok(json!(["9007199254740993"]))
    );

    let value = CoercedValue::List(vec![CoercedValue::null()]);
    let err = serialize_value(&scalars, &ty, &value).unwrap_err();
    assert_eq!(
        err,
        SerializeError::NullForNonNull {
            ty: Type::parse("Long!").unwrap()
        }
    );
    assert_eq!(err.code(), "NON_NULL_VIOLATION");

    let err = serialize_value(
        &scalars,
        &ty,
        &CoercedValue::Scalar(ScalarValue::Long(1)),
    )
    .unwrap_err();
    assert_eq!(err.code(), "UNEXPECTED_SHAPE");

    let err = serialize_value(
        &scalars,
        &Type::parse("Int").unwrap(),
        &CoercedValue::Scalar(ScalarValue::String("1".into())),
    )
    .unwrap_err();
    assert_eq!(err.code(), "SCALAR_INVALID_VALUE");
}

#[test]
fn field_errors_serialize_with_path_and_code() {
    let error = gqlforge_scalars::request::GraphQLError::new("boom")
        .with_code("SCALAR_INVALID_VALUE")
        .with_path(vec![
            PathSegment::Field("hero".into()),
            PathSegment::ListIndex(0),
        ]);
    let json = serde_json::to_value(&error).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "message": "boom",
            "path": ["hero", 0],
            "extensions": {"code": "SCALAR_INVALID_VALUE"},
        })
    );
}
