use crate::star_wars;
use expect_test::expect;
use gqlforge_codegen::descriptors::ClientModel;
use gqlforge_codegen::descriptors::FieldDescriptor;
use gqlforge_codegen::descriptors::PossibleTypeDescriptor;
use gqlforge_codegen::descriptors::ResultParserDescriptor;
use gqlforge_codegen::result_parser::ParsedValue;
use gqlforge_codegen::result_parser::ResultParseError;
use gqlforge_codegen::result_parser::ResultParserGenerator;
use gqlforge_codegen::result_parser::ResultParserPlan;
use gqlforge_codegen::CodeGenerator;
use gqlforge_codegen::CodegenError;
use gqlforge_codegen::CodegenOptions;
use gqlforge_codegen::TypeLookup;
use gqlforge_scalars::ast::Type;
use gqlforge_scalars::name;
use gqlforge_scalars::request::PathSegment;
use gqlforge_scalars::serde_json_bytes::json;
use gqlforge_scalars::ScalarValue;
use gqlforge_scalars::Scalars;
use pretty_assertions::assert_eq;

fn parser<'a>(model: &'a ClientModel, name: &str) -> &'a ResultParserDescriptor {
    model
        .result_parsers
        .iter()
        .find(|parser| parser.name == name)
        .unwrap()
}

fn plan(model: &ClientModel, scalars: &Scalars, name: &str) -> ResultParserPlan {
    let lookup = TypeLookup::new(scalars, &model.schema_types, &model.generated_types);
    ResultParserPlan::build(parser(model, name), &lookup).unwrap()
}

fn path(segments: &[&str]) -> Vec<PathSegment> {
    segments
        .iter()
        .map(|segment| match segment.parse() {
            Ok(index) => PathSegment::ListIndex(index),
            Err(_) => PathSegment::Field((*segment).to_owned()),
        })
        .collect()
}

#[test]
fn methods_are_shared_between_possible_types() {
    let model = star_wars();
    let scalars = Scalars::default();
    let plan = plan(&model, &scalars, "GetHeroResultParser");

    let parse_methods: Vec<_> = plan.parse_methods().map(|method| method.name.as_str()).collect();
    assert_eq!(parse_methods, ["ParseGetHeroHero", "ParseGetHeroHeroFriends"]);
    let deserializers: Vec<_> = plan.deserializers().map(|method| method.name.as_str()).collect();
    assert_eq!(
        deserializers,
        [
            "DeserializeString",
            "DeserializeListOfNullableEpisode",
            "DeserializeNullableString",
            "DeserializeNullableFloat",
        ]
    );
    let serializers: Vec<_> = plan
        .serializers()
        .map(|serializer| serializer.field_name.as_str())
        .collect();
    assert_eq!(
        serializers,
        ["_stringSerializer", "_episodeSerializer", "_floatSerializer"]
    );

    let hero = plan.parse_method("ParseGetHeroHero").unwrap();
    assert!(hero.is_abstract());
    assert_eq!(hero.return_type, "IGetHero_Hero");
    let friends = plan.parse_method("ParseGetHeroHeroFriends").unwrap();
    assert_eq!(friends.return_type, "IReadOnlyList<IGetHero_Hero_Friends>");
    assert_eq!(
        plan.serializer("Episode").unwrap().enum_values,
        Some(vec![name!(NEW_HOPE), name!(EMPIRE), name!(JEDI)])
    );
}

#[test]
fn leaf_types_seed_serializers() {
    let model = star_wars();
    let scalars = Scalars::default();
    let plan = plan(&model, &scalars, "CreateReviewResultParser");
    let serializers: Vec<_> = plan
        .serializers()
        .map(|serializer| serializer.type_name.as_str())
        .collect();
    assert_eq!(serializers, ["Episode", "Int", "String"]);
}

#[test]
fn emitted_parser() {
    let model = star_wars();
    let scalars = Scalars::default();
    let lookup = TypeLookup::new(&scalars, &model.schema_types, &model.generated_types);
    let source = ResultParserGenerator
        .generate_to_string(
            parser(&model, "CreateReviewResultParser"),
            &lookup,
            &CodegenOptions::default(),
        )
        .unwrap();
    expect![[r#"
        public partial class CreateReviewResultParser : JsonResultParserBase<ICreateReview>
        {
            private readonly IValueSerializer _episodeSerializer;
            private readonly IValueSerializer _intSerializer;
            private readonly IValueSerializer _stringSerializer;

            public CreateReviewResultParser(IValueSerializerCollection serializerResolver)
            {
                if (serializerResolver is null)
                {
                    throw new ArgumentNullException(nameof(serializerResolver));
                }

                _episodeSerializer = serializerResolver.Get("Episode")
                    ?? throw new InvalidOperationException("No serializer is registered for the type `Episode`.");
                _intSerializer = serializerResolver.Get("Int")
                    ?? throw new InvalidOperationException("No serializer is registered for the type `Int`.");
                _stringSerializer = serializerResolver.Get("String")
                    ?? throw new InvalidOperationException("No serializer is registered for the type `String`.");
            }

            protected override ICreateReview ParserData(JsonElement data)
            {
                return new CreateReview(
                    ParseCreateReviewCreateReview(data, "createReview"));
            }

            private ICreateReview_CreateReview ParseCreateReviewCreateReview(JsonElement parent, string field)
            {
                if (!parent.TryGetProperty(field, out JsonElement obj))
                {
                    return null;
                }

                if (obj.ValueKind == JsonValueKind.Null)
                {
                    return null;
                }

                return new CreateReview_CreateReview_Review(
                    DeserializeInt(obj, "stars"),
                    DeserializeNullableString(obj, "commentary"));
            }

            private int DeserializeInt(JsonElement parent, string field)
            {
                if (!parent.TryGetProperty(field, out JsonElement value)
                    || value.ValueKind == JsonValueKind.Null)
                {
                    throw new InvalidOperationException("The non-null field `" + field + "` is null or missing.");
                }

                return (int)_intSerializer.Deserialize(value.GetInt32())!;
            }

            private string DeserializeNullableString(JsonElement parent, string field)
            {
                if (!parent.TryGetProperty(field, out JsonElement value))
                {
                    return null;
                }

                if (value.ValueKind == JsonValueKind.Null)
                {
                    return null;
                }

                return (string)_stringSerializer.Deserialize(value.GetString()!)!;
            }
        }
    "#]]
    .assert_eq(&source);
}

#[test]
fn emitted_control_flow_for_abstract_lists() {
    let model = star_wars();
    let scalars = Scalars::default();
    let lookup = TypeLookup::new(&scalars, &model.schema_types, &model.generated_types);
    let source = ResultParserGenerator
        .generate_to_string(
            parser(&model, "GetHeroResultParser"),
            &lookup,
            &CodegenOptions::default(),
        )
        .unwrap();
    let expected = [
        "private IReadOnlyList<IGetHero_Hero_Friends> ParseGetHeroHeroFriends(JsonElement parent, string field)",
        "int objLength = obj.GetArrayLength();",
        "var list = new IGetHero_Hero_Friends[objLength];",
        "for (int objIndex = 0; objIndex < objLength; objIndex++)",
        "JsonElement element = obj[objIndex];",
        "list[objIndex] = null;",
        "string elementType = element.GetProperty(\"__typename\").GetString()!;",
        "switch (elementType)",
        "case \"Droid\":",
        "list[objIndex] = new GetHero_Hero_Friends_Droid(",
        "break;",
        "throw new UnknownSchemaTypeException(elementType);",
        "return list;",
        "private IReadOnlyList<Episode?> DeserializeListOfNullableEpisode(JsonElement parent, string field)",
        "var list = new Episode?[valueLength];",
        "list[valueIndex] = (Episode)_episodeSerializer.Deserialize(element.GetString()!)!;",
        "private double? DeserializeNullableFloat(JsonElement parent, string field)",
        "return (double)_floatSerializer.Deserialize(value.GetDouble())!;",
    ];
    for line in expected {
        assert!(
            source.lines().any(|actual| actual.trim() == line),
            "missing line `{line}` in:\n{source}"
        );
    }
}

#[test]
fn interprets_a_response() {
    let model = star_wars();
    let scalars = Scalars::default();
    let plan = plan(&model, &scalars, "GetHeroResultParser");
    let data = json!({
        "hero": {
            "__typename": "Droid",
            "name": "R2-D2",
            "appearsIn": ["NEW_HOPE", null, "JEDI"],
            "friends": [
                { "__typename": "Human", "name": "Luke Skywalker" },
                null
            ],
            "primaryFunction": "Astromech"
        }
    });
    let parsed = plan.parse(&scalars, &data).unwrap();
    let root = parsed.as_object().unwrap();
    assert_eq!(root.class_name, "GetHero");

    let hero = root.get("hero").unwrap().as_object().unwrap();
    assert_eq!(hero.class_name, "GetHero_Hero_Droid");
    assert_eq!(
        hero.get("name"),
        Some(&ParsedValue::Scalar(ScalarValue::String("R2-D2".to_owned())))
    );
    assert_eq!(
        hero.get("appearsIn"),
        Some(&ParsedValue::List(vec![
            ParsedValue::Enum(name!(NEW_HOPE)),
            ParsedValue::Null,
            ParsedValue::Enum(name!(JEDI)),
        ]))
    );
    let friends = hero.get("friends").unwrap().as_list().unwrap();
    assert_eq!(friends.len(), 2);
    let luke = friends[0].as_object().unwrap();
    assert_eq!(luke.class_name, "GetHero_Hero_Friends_Human");
    assert_eq!(luke.type_name, "Human");
    assert!(friends[1].is_null());
    // Selected on Droid only, so a Droid has no height
    assert_eq!(hero.get("height"), None);
}

#[test]
fn missing_nullable_fields_are_null() {
    let model = star_wars();
    let scalars = Scalars::default();
    let plan = plan(&model, &scalars, "GetHeroResultParser");
    let parsed = plan.parse(&scalars, &json!({})).unwrap();
    assert_eq!(parsed.as_object().unwrap().get("hero"), Some(&ParsedValue::Null));

    let parsed = plan
        .parse(
            &scalars,
            &json!({ "hero": { "__typename": "Human", "name": "Leia", "appearsIn": [] } }),
        )
        .unwrap();
    let leia = parsed.as_object().unwrap().get("hero").unwrap().as_object().unwrap();
    assert_eq!(leia.get("friends"), Some(&ParsedValue::Null));
    assert_eq!(leia.get("height"), Some(&ParsedValue::Null));
}

#[test]
fn unknown_discriminator() {
    let model = star_wars();
    let scalars = Scalars::default();
    let plan = plan(&model, &scalars, "GetHeroResultParser");
    let error = plan
        .parse(
            &scalars,
            &json!({ "hero": { "__typename": "Wookiee", "name": "Chewbacca" } }),
        )
        .unwrap_err();
    assert_eq!(
        error,
        ResultParseError::UnknownSchemaType {
            path: path(&["hero"]),
            type_name: "Wookiee".to_owned(),
        }
    );
    assert_eq!(error.to_string(), "unknown schema type `Wookiee` at `hero`");

    let error = plan
        .parse(&scalars, &json!({ "hero": { "name": "Chewbacca" } }))
        .unwrap_err();
    assert_eq!(
        error,
        ResultParseError::MissingTypeName {
            path: path(&["hero"])
        }
    );
}

#[test]
fn null_for_non_null() {
    let model = star_wars();
    let scalars = Scalars::default();
    let plan = plan(&model, &scalars, "GetHeroResultParser");
    let error = plan
        .parse(
            &scalars,
            &json!({
                "hero": {
                    "__typename": "Human",
                    "name": "Luke Skywalker",
                    "appearsIn": ["NEW_HOPE"],
                    "friends": [{ "__typename": "Droid", "name": null }]
                }
            }),
        )
        .unwrap_err();
    assert_eq!(
        error,
        ResultParseError::NonNullFieldMissing {
            path: path(&["hero", "friends", "0", "name"])
        }
    );
    let graphql_error = error.to_graphql_error();
    assert_eq!(graphql_error.code(), Some("NON_NULL_VIOLATION"));
    assert_eq!(
        graphql_error.message,
        "the non-null field `hero.friends[0].name` is null or missing"
    );
    assert_eq!(
        serde_json::to_string(&graphql_error.path).unwrap(),
        r#"["hero","friends",0,"name"]"#
    );
}

#[test]
fn leaf_errors() {
    let model = star_wars();
    let scalars = Scalars::default();
    let plan = plan(&model, &scalars, "GetHeroResultParser");
    let error = plan
        .parse(
            &scalars,
            &json!({ "hero": { "__typename": "Droid", "name": "R2-D2", "appearsIn": ["PHANTOM"] } }),
        )
        .unwrap_err();
    assert_eq!(
        error,
        ResultParseError::UnknownEnumValue {
            path: path(&["hero", "appearsIn", "0"]),
            enum_type: name!(Episode),
            value: "PHANTOM".to_owned(),
        }
    );

    let error = plan
        .parse(
            &scalars,
            &json!({ "hero": { "__typename": "Droid", "name": 42, "appearsIn": [] } }),
        )
        .unwrap_err();
    assert!(matches!(error, ResultParseError::Scalar { .. }));
    assert_eq!(error.path(), path(&["hero", "name"]));
    assert_eq!(error.code(), "SCALAR_CANNOT_DESERIALIZE");

    let error = plan
        .parse(&scalars, &json!({ "hero": { "__typename": "Droid", "name": "R2-D2", "appearsIn": "NEW_HOPE" } }))
        .unwrap_err();
    assert!(matches!(
        error,
        ResultParseError::UnexpectedShape { expected: "a list", .. }
    ));
}

fn single_field_parser(ty: &str) -> ResultParserDescriptor {
    ResultParserDescriptor {
        name: "GetMatrixResultParser".to_owned(),
        result_type: "IGetMatrix".to_owned(),
        root: PossibleTypeDescriptor {
            type_name: name!(Query),
            class_name: "GetMatrix".to_owned(),
            fields: vec![FieldDescriptor::new(
                name!(matrix),
                Type::parse(ty).unwrap(),
                "GetMatrix.matrix",
            )],
        },
        parse_methods: Vec::new(),
        leaf_types: Vec::new(),
    }
}

#[test]
fn nested_leaf_lists_are_rejected() {
    let model = star_wars();
    let scalars = Scalars::default();
    let lookup = TypeLookup::new(&scalars, &model.schema_types, &model.generated_types);
    let error = ResultParserPlan::build(&single_field_parser("[[Int!]!]"), &lookup).unwrap_err();
    assert_eq!(
        error.to_string(),
        "the field `GetMatrix.matrix` has type `[[Int!]!]`: lists of lists of leaf values are not supported"
    );
    assert!(ResultParserPlan::build(&single_field_parser("[Int!]!"), &lookup).is_ok());
}

#[test]
fn every_selection_needs_a_parse_method() {
    let mut model = star_wars();
    let scalars = Scalars::default();
    model.result_parsers[0]
        .parse_methods
        .retain(|method| method.path.as_str() != "GetHero.hero.friends");
    let lookup = TypeLookup::new(&scalars, &model.schema_types, &model.generated_types);
    let error = ResultParserPlan::build(&model.result_parsers[0], &lookup).unwrap_err();
    assert!(matches!(
        error,
        CodegenError::MissingParseMethod { ref parser, ref path }
            if parser == "GetHeroResultParser" && path == "GetHero.hero.friends"
    ));
}

#[test]
fn parse_methods_must_match_their_field() {
    let mut model = star_wars();
    let scalars = Scalars::default();
    model.result_parsers[0].parse_methods[1].field_type = Type::parse("[Character!]!").unwrap();
    let lookup = TypeLookup::new(&scalars, &model.schema_types, &model.generated_types);
    let error = ResultParserPlan::build(&model.result_parsers[0], &lookup).unwrap_err();
    assert!(matches!(error, CodegenError::InvalidDescriptor { .. }));

    model.result_parsers[0].parse_methods[1].field_type = Type::parse("[Character]").unwrap();
    model.result_parsers[0].parse_methods[1].possible_types.clear();
    let error = ResultParserPlan::build(&model.result_parsers[0], &lookup).unwrap_err();
    assert!(matches!(error, CodegenError::InvalidDescriptor { .. }));
}
