use super::enums::write_null_guard;
use super::property_name;
use super::serializer_field;
use super::CodeGenerator;
use crate::descriptors::input_serializer_name;
use crate::descriptors::InputClassDescriptor;
use crate::type_lookup::shape_name;
use crate::writer::quote;
use crate::CodeWriter;
use crate::CodegenError;
use crate::TypeLookup;
use gqlforge_scalars::ast::Type;
use gqlforge_scalars::Name;
use indexmap::IndexMap;
use indexmap::IndexSet;

/// A mutable input class. Every property is `Optional<T>`,
/// so that an omitted field and an explicit null stay distinct.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputClassGenerator;

/// Serializes input objects to string-keyed maps.
///
/// The constructor resolves the serializer of every field type and throws
/// if one is missing. Deserializing is not supported: inputs are write-only.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputClassSerializerGenerator;

impl CodeGenerator<InputClassDescriptor> for InputClassGenerator {
    fn file_name(&self, descriptor: &InputClassDescriptor) -> String {
        format!("{}.cs", descriptor.name)
    }

    fn generate(
        &self,
        writer: &mut CodeWriter,
        descriptor: &InputClassDescriptor,
        lookup: &TypeLookup<'_>,
    ) -> Result<(), CodegenError> {
        writer.block(format_args!("public partial class {}", descriptor.name), |writer| {
            for (i, field) in descriptor.fields.iter().enumerate() {
                if i > 0 {
                    writer.blank_line()?;
                }
                let ty = lookup.get_type_name(&field.ty, &field.name, None, false)?;
                writer.write_line(format_args!(
                    "public Optional<{ty}> {} {{ get; set; }}",
                    property_name(&field.name)
                ))?;
            }
            Ok(())
        })
    }
}

impl CodeGenerator<InputClassDescriptor> for InputClassSerializerGenerator {
    fn file_name(&self, descriptor: &InputClassDescriptor) -> String {
        format!("{}.cs", input_serializer_name(&descriptor.name))
    }

    fn usings(&self) -> &'static [&'static str] {
        &["System.Collections"]
    }

    fn generate(
        &self,
        writer: &mut CodeWriter,
        descriptor: &InputClassDescriptor,
        lookup: &TypeLookup<'_>,
    ) -> Result<(), CodegenError> {
        // Types are checked before anything is written
        for field in &descriptor.fields {
            lookup.get_type_name(&field.ty, &field.name, None, false)?;
        }
        let serializers: IndexSet<&Name> = descriptor
            .fields
            .iter()
            .map(|field| field.ty.inner_named_type())
            .collect();
        let mut shapes = IndexMap::new();
        for field in &descriptor.fields {
            collect_shapes(&field.ty, &mut shapes);
        }
        let class_name = input_serializer_name(&descriptor.name);

        writer.block(
            format_args!("public partial class {class_name} : IValueSerializer"),
            |writer| {
                for type_name in &serializers {
                    writer.write_line(format_args!(
                        "private readonly IValueSerializer {};",
                        serializer_field(type_name)
                    ))?;
                }
                if !serializers.is_empty() {
                    writer.blank_line()?;
                }

                writer.block(
                    format_args!(
                        "public {class_name}(IValueSerializerCollection serializerResolver)"
                    ),
                    |writer| {
                        writer.block("if (serializerResolver is null)", |writer| {
                            writer.write_line(
                                "throw new ArgumentNullException(nameof(serializerResolver));",
                            )
                        })?;
                        for type_name in &serializers {
                            writer.blank_line()?;
                            writer.write_line(format_args!(
                                "{} = serializerResolver.Get({})",
                                serializer_field(type_name),
                                quote(type_name)
                            ))?;
                            writer.indent(|writer| {
                                writer.write_line(format_args!(
                                    "?? throw new InvalidOperationException({});",
                                    quote(&format!(
                                        "No serializer is registered for the type `{type_name}`."
                                    ))
                                ))
                            })?;
                        }
                        Ok::<_, std::fmt::Error>(())
                    },
                )?;
                writer.blank_line()?;

                writer.write_line(format_args!(
                    "public string Name => {};",
                    quote(&descriptor.graphql_name)
                ))?;
                writer.blank_line()?;
                writer.write_line("public ValueKind Kind => ValueKind.InputObject;")?;
                writer.blank_line()?;
                writer.write_line(format_args!(
                    "public Type ClrType => typeof({});",
                    descriptor.name
                ))?;
                writer.blank_line()?;
                writer.write_line(
                    "public Type SerializationType => typeof(IReadOnlyDictionary<string, object?>);",
                )?;
                writer.blank_line()?;

                writer.block("public object? Serialize(object? value)", |writer| {
                    write_null_guard(writer, "value")?;
                    writer.write_line(format_args!("var input = ({})value;", descriptor.name))?;
                    writer.write_line("var map = new Dictionary<string, object?>();")?;
                    for field in &descriptor.fields {
                        let property = property_name(&field.name);
                        writer.blank_line()?;
                        writer.block(format_args!("if (input.{property}.HasValue)"), |writer| {
                            writer.write_line(format_args!(
                                "map.Add({}, Serialize{}(input.{property}.Value));",
                                quote(&field.name),
                                shape_name(&field.ty)
                            ))
                        })?;
                    }
                    writer.blank_line()?;
                    writer.write_line("return map;")
                })?;

                for (name, ty) in &shapes {
                    writer.blank_line()?;
                    write_shape_method(writer, name, ty)?;
                }
                writer.blank_line()?;

                writer.block("public object? Deserialize(object? serialized)", |writer| {
                    writer.write_line(
                        "throw new NotSupportedException(\"Deserializing input values is not supported.\");",
                    )
                })?;
                Ok(())
            },
        )
    }
}

/// One serialize method per distinct shape, items before lists
fn collect_shapes<'a>(ty: &'a Type, shapes: &mut IndexMap<String, &'a Type>) {
    let name = shape_name(ty);
    if shapes.contains_key(&name) {
        tracing::trace!(shape = %name, "reusing serialize method");
        return;
    }
    if let Some(item) = ty.item_type() {
        collect_shapes(item, shapes);
    }
    shapes.insert(name, ty);
}

fn write_shape_method(writer: &mut CodeWriter, name: &str, ty: &Type) -> std::fmt::Result {
    writer.block(
        format_args!("private object? Serialize{name}(object? value)"),
        |writer| {
            writer.block("if (value is null)", |writer| {
                if ty.is_non_null() {
                    writer.write_line("throw new ArgumentNullException(nameof(value));")
                } else {
                    writer.write_line("return null;")
                }
            })?;
            writer.blank_line()?;
            match ty.item_type() {
                Some(item) => {
                    writer.write_line("var result = new List<object?>();")?;
                    writer.blank_line()?;
                    writer.block("foreach (var element in (IEnumerable)value)", |writer| {
                        writer.write_line(format_args!(
                            "result.Add(Serialize{}(element));",
                            shape_name(item)
                        ))
                    })?;
                    writer.blank_line()?;
                    writer.write_line("return result;")
                }
                None => writer.write_line(format_args!(
                    "return {}.Serialize(value);",
                    serializer_field(ty.inner_named_type())
                )),
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::InputFieldDescriptor;
    use crate::schema::GeneratedTypeMap;
    use crate::schema::SchemaType;
    use crate::schema::SchemaTypes;
    use crate::CodegenOptions;
    use expect_test::expect;
    use gqlforge_scalars::name;
    use gqlforge_scalars::Scalars;

    fn review_input() -> InputClassDescriptor {
        InputClassDescriptor {
            name: "ReviewInput".to_owned(),
            graphql_name: name!(ReviewInput),
            fields: vec![
                InputFieldDescriptor {
                    name: name!(stars),
                    ty: Type::parse("Int!").unwrap(),
                },
                InputFieldDescriptor {
                    name: name!(tags),
                    ty: Type::parse("[Int!]").unwrap(),
                },
                InputFieldDescriptor {
                    name: name!(episode),
                    ty: Type::parse("Episode").unwrap(),
                },
            ],
        }
    }

    fn lookup_parts() -> (Scalars, SchemaTypes, GeneratedTypeMap) {
        let schema = SchemaTypes::new().with(
            name!(Episode),
            SchemaType::Enum {
                values: vec![name!(JEDI)],
            },
        );
        let mut generated = GeneratedTypeMap::new();
        generated.insert_named(name!(Episode), "Episode");
        (Scalars::default(), schema, generated)
    }

    #[test]
    fn input_class() {
        let (scalars, schema, generated) = lookup_parts();
        let lookup = TypeLookup::new(&scalars, &schema, &generated);
        let source = InputClassGenerator
            .generate_to_string(&review_input(), &lookup, &CodegenOptions::default())
            .unwrap();
        expect![[r#"
            public partial class ReviewInput
            {
                public Optional<int> Stars { get; set; }

                public Optional<List<int>> Tags { get; set; }

                public Optional<Episode?> Episode { get; set; }
            }
        "#]]
        .assert_eq(&source);
    }

    #[test]
    fn input_serializer() {
        let (scalars, schema, generated) = lookup_parts();
        let lookup = TypeLookup::new(&scalars, &schema, &generated);
        let source = InputClassSerializerGenerator
            .generate_to_string(&review_input(), &lookup, &CodegenOptions::default())
            .unwrap();
        expect![[r#"
            public partial class ReviewInputSerializer : IValueSerializer
            {
                private readonly IValueSerializer _intSerializer;
                private readonly IValueSerializer _episodeSerializer;

                public ReviewInputSerializer(IValueSerializerCollection serializerResolver)
                {
                    if (serializerResolver is null)
                    {
                        throw new ArgumentNullException(nameof(serializerResolver));
                    }

                    _intSerializer = serializerResolver.Get("Int")
                        ?? throw new InvalidOperationException("No serializer is registered for the type `Int`.");

                    _episodeSerializer = serializerResolver.Get("Episode")
                        ?? throw new InvalidOperationException("No serializer is registered for the type `Episode`.");
                }

                public string Name => "ReviewInput";

                public ValueKind Kind => ValueKind.InputObject;

                public Type ClrType => typeof(ReviewInput);

                public Type SerializationType => typeof(IReadOnlyDictionary<string, object?>);

                public object? Serialize(object? value)
                {
                    if (value is null)
                    {
                        return null;
                    }

                    var input = (ReviewInput)value;
                    var map = new Dictionary<string, object?>();

                    if (input.Stars.HasValue)
                    {
                        map.Add("stars", SerializeInt(input.Stars.Value));
                    }

                    if (input.Tags.HasValue)
                    {
                        map.Add("tags", SerializeNullableListOfInt(input.Tags.Value));
                    }

                    if (input.Episode.HasValue)
                    {
                        map.Add("episode", SerializeNullableEpisode(input.Episode.Value));
                    }

                    return map;
                }

                private object? SerializeInt(object? value)
                {
                    if (value is null)
                    {
                        throw new ArgumentNullException(nameof(value));
                    }

                    return _intSerializer.Serialize(value);
                }

                private object? SerializeNullableListOfInt(object? value)
                {
                    if (value is null)
                    {
                        return null;
                    }

                    var result = new List<object?>();

                    foreach (var element in (IEnumerable)value)
                    {
                        result.Add(SerializeInt(element));
                    }

                    return result;
                }

                private object? SerializeNullableEpisode(object? value)
                {
                    if (value is null)
                    {
                        return null;
                    }

                    return _episodeSerializer.Serialize(value);
                }

                public object? Deserialize(object? serialized)
                {
                    throw new NotSupportedException("Deserializing input values is not supported.");
                }
            }
        "#]]
        .assert_eq(&source);
    }

    #[test]
    fn unknown_field_types_fail_before_writing() {
        let (scalars, schema, generated) = lookup_parts();
        let lookup = TypeLookup::new(&scalars, &schema, &generated);
        let mut input = review_input();
        input.fields.push(InputFieldDescriptor {
            name: name!(author),
            ty: Type::parse("AuthorInput!").unwrap(),
        });
        let mut writer = CodeWriter::new("    ");
        let err = InputClassSerializerGenerator
            .generate(&mut writer, &input, &lookup)
            .unwrap_err();
        assert!(matches!(err, CodegenError::UnresolvedType { field, .. } if field == "author"));
        assert_eq!(writer.as_str(), "");
    }
}
