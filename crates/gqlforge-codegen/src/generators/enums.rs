use super::CodeGenerator;
use crate::descriptors::enum_serializer_name;
use crate::descriptors::EnumDescriptor;
use crate::writer::quote;
use crate::CodeWriter;
use crate::CodegenError;
use crate::TypeLookup;

#[derive(Clone, Copy, Debug, Default)]
pub struct EnumGenerator;

/// Maps enum members to their wire values and back.
///
/// Both directions switch over every member. Unknown values throw.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnumValueSerializerGenerator;

impl CodeGenerator<EnumDescriptor> for EnumGenerator {
    fn file_name(&self, descriptor: &EnumDescriptor) -> String {
        format!("{}.cs", descriptor.name)
    }

    fn generate(
        &self,
        writer: &mut CodeWriter,
        descriptor: &EnumDescriptor,
        _lookup: &TypeLookup<'_>,
    ) -> Result<(), CodegenError> {
        writer.block(format_args!("public enum {}", descriptor.name), |writer| {
            for (i, value) in descriptor.values.iter().enumerate() {
                let separator = if i + 1 < descriptor.values.len() { "," } else { "" };
                writer.write_line(format_args!("{}{separator}", value.name))?;
            }
            Ok(())
        })
    }
}

impl CodeGenerator<EnumDescriptor> for EnumValueSerializerGenerator {
    fn file_name(&self, descriptor: &EnumDescriptor) -> String {
        format!("{}.cs", enum_serializer_name(&descriptor.name))
    }

    fn generate(
        &self,
        writer: &mut CodeWriter,
        descriptor: &EnumDescriptor,
        _lookup: &TypeLookup<'_>,
    ) -> Result<(), CodegenError> {
        let enum_name = &descriptor.name;
        let header = format!(
            "public partial class {} : IValueSerializer",
            enum_serializer_name(enum_name)
        );
        writer.block(header, |writer| {
            writer.write_line(format_args!(
                "public string Name => {};",
                quote(&descriptor.graphql_name)
            ))?;
            writer.blank_line()?;
            writer.write_line("public ValueKind Kind => ValueKind.Enum;")?;
            writer.blank_line()?;
            writer.write_line(format_args!("public Type ClrType => typeof({enum_name});"))?;
            writer.blank_line()?;
            writer.write_line("public Type SerializationType => typeof(string);")?;
            writer.blank_line()?;

            writer.block("public object? Serialize(object? value)", |writer| {
                write_null_guard(writer, "value")?;
                writer.write_line(format_args!("var enumValue = ({enum_name})value;"))?;
                writer.blank_line()?;
                writer.block("switch (enumValue)", |writer| {
                    for value in &descriptor.values {
                        writer.write_line(format_args!("case {enum_name}.{}:", value.name))?;
                        writer.indent(|writer| {
                            writer.write_line(format_args!("return {};", quote(&value.value)))
                        })?;
                    }
                    write_default_throw(writer)
                })
            })?;
            writer.blank_line()?;

            writer.block("public object? Deserialize(object? serialized)", |writer| {
                write_null_guard(writer, "serialized")?;
                writer.write_line("var stringValue = (string)serialized;")?;
                writer.blank_line()?;
                writer.block("switch (stringValue)", |writer| {
                    for value in &descriptor.values {
                        writer.write_line(format_args!("case {}:", quote(&value.value)))?;
                        writer.indent(|writer| {
                            writer.write_line(format_args!("return {enum_name}.{};", value.name))
                        })?;
                    }
                    write_default_throw(writer)
                })
            })?;
            Ok(())
        })
    }
}

pub(crate) fn write_null_guard(writer: &mut CodeWriter, variable: &str) -> std::fmt::Result {
    writer.block(format_args!("if ({variable} is null)"), |writer| {
        writer.write_line("return null;")
    })?;
    writer.blank_line()
}

fn write_default_throw(writer: &mut CodeWriter) -> std::fmt::Result {
    writer.write_line("default:")?;
    writer.indent(|writer| writer.write_line("throw new NotSupportedException();"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::EnumValueDescriptor;
    use crate::schema::GeneratedTypeMap;
    use crate::schema::SchemaTypes;
    use crate::CodegenOptions;
    use expect_test::expect;
    use gqlforge_scalars::name;
    use gqlforge_scalars::Scalars;

    fn episode() -> EnumDescriptor {
        EnumDescriptor {
            name: "Episode".to_owned(),
            graphql_name: name!(Episode),
            values: vec![
                EnumValueDescriptor::new(name!(NEW_HOPE)),
                EnumValueDescriptor::new(name!(EMPIRE)),
            ],
        }
    }

    #[test]
    fn enum_and_serializer() {
        let scalars = Scalars::default();
        let schema = SchemaTypes::new();
        let generated = GeneratedTypeMap::new();
        let lookup = TypeLookup::new(&scalars, &schema, &generated);
        let options = CodegenOptions::new().indent_prefix("  ");

        let source = EnumGenerator
            .generate_to_string(&episode(), &lookup, &options)
            .unwrap();
        expect![[r#"
            public enum Episode
            {
              NewHope,
              Empire
            }
        "#]]
        .assert_eq(&source);

        let source = EnumValueSerializerGenerator
            .generate_to_string(&episode(), &lookup, &options)
            .unwrap();
        expect![[r#"
            public partial class EpisodeValueSerializer : IValueSerializer
            {
              public string Name => "Episode";

              public ValueKind Kind => ValueKind.Enum;

              public Type ClrType => typeof(Episode);

              public Type SerializationType => typeof(string);

              public object? Serialize(object? value)
              {
                if (value is null)
                {
                  return null;
                }

                var enumValue = (Episode)value;

                switch (enumValue)
                {
                  case Episode.NewHope:
                    return "NEW_HOPE";
                  case Episode.Empire:
                    return "EMPIRE";
                  default:
                    throw new NotSupportedException();
                }
              }

              public object? Deserialize(object? serialized)
              {
                if (serialized is null)
                {
                  return null;
                }

                var stringValue = (string)serialized;

                switch (stringValue)
                {
                  case "NEW_HOPE":
                    return Episode.NewHope;
                  case "EMPIRE":
                    return Episode.Empire;
                  default:
                    throw new NotSupportedException();
                }
              }
            }
        "#]]
        .assert_eq(&source);
    }
}
