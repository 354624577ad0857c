use super::plan::DeserializeMethod;
use super::plan::FieldParser;
use super::plan::ObjectConstruction;
use super::plan::ParseMethod;
use super::plan::ResultParserPlan;
use crate::generators::write_parameters;
use crate::type_lookup::wrap_type_name;
use crate::writer::quote;
use crate::CodeWriter;
use gqlforge_scalars::ast::Type;
use std::fmt;

/// Where a computed value goes
enum Target {
    Return,
    Assign(String),
}

impl Target {
    fn prefix(&self) -> String {
        match self {
            Target::Return => "return ".to_owned(),
            Target::Assign(lhs) => format!("{lhs} = "),
        }
    }
}

/// What sits below the list levels of a method
enum Leaf<'a> {
    Object(&'a ParseMethod),
    Scalar(&'a DeserializeMethod),
}

impl Leaf<'_> {
    fn item_type_name(&self, item: &Type) -> String {
        match self {
            Leaf::Object(method) => wrap_type_name(item, &method.element_type, false, true),
            Leaf::Scalar(method) => wrap_type_name(
                item,
                &method.info.element_type_name,
                method.info.is_value_type,
                true,
            ),
        }
    }
}

pub(super) fn write_class(writer: &mut CodeWriter, plan: &ResultParserPlan) -> fmt::Result {
    writer.block(
        format_args!(
            "public partial class {} : JsonResultParserBase<{}>",
            plan.class_name(),
            plan.result_type()
        ),
        |writer| {
            for serializer in plan.serializers() {
                writer.write_line(format_args!(
                    "private readonly IValueSerializer {};",
                    serializer.field_name
                ))?;
            }
            if plan.serializers().next().is_some() {
                writer.blank_line()?;
            }
            write_constructor(writer, plan)?;
            writer.blank_line()?;
            writer.block(
                format_args!(
                    "protected override {} ParserData(JsonElement data)",
                    plan.result_type()
                ),
                |writer| write_construction(writer, plan.root(), "data", &Target::Return),
            )?;
            for method in plan.parse_methods() {
                writer.blank_line()?;
                write_parse_method(writer, method)?;
            }
            for method in plan.deserializers() {
                writer.blank_line()?;
                write_deserializer(writer, method)?;
            }
            Ok(())
        },
    )
}

fn write_constructor(writer: &mut CodeWriter, plan: &ResultParserPlan) -> fmt::Result {
    writer.block(
        format_args!(
            "public {}(IValueSerializerCollection serializerResolver)",
            plan.class_name()
        ),
        |writer| {
            writer.block("if (serializerResolver is null)", |writer| {
                writer.write_line("throw new ArgumentNullException(nameof(serializerResolver));")
            })?;
            if plan.serializers().next().is_some() {
                writer.blank_line()?;
            }
            for serializer in plan.serializers() {
                writer.write_line(format_args!(
                    "{} = serializerResolver.Get({})",
                    serializer.field_name,
                    quote(&serializer.type_name)
                ))?;
                writer.indent(|writer| {
                    writer.write_line(format_args!(
                        "?? throw new InvalidOperationException({});",
                        quote(&format!(
                            "No serializer is registered for the type `{}`.",
                            serializer.type_name
                        ))
                    ))
                })?;
            }
            Ok(())
        },
    )
}

fn write_parse_method(writer: &mut CodeWriter, method: &ParseMethod) -> fmt::Result {
    writer.block(
        format_args!(
            "private {} {}(JsonElement parent, string field)",
            method.return_type, method.name
        ),
        |writer| {
            write_field_guard(writer, "obj", method.ty.is_non_null())?;
            write_value(writer, &method.ty, "obj", &Target::Return, 0, &Leaf::Object(method))
        },
    )
}

fn write_deserializer(writer: &mut CodeWriter, method: &DeserializeMethod) -> fmt::Result {
    writer.block(
        format_args!(
            "private {} {}(JsonElement parent, string field)",
            method.info.clr_type_name, method.name
        ),
        |writer| {
            write_field_guard(writer, "value", method.ty.is_non_null())?;
            write_value(writer, &method.ty, "value", &Target::Return, 0, &Leaf::Scalar(method))
        },
    )
}

/// Reads `parent[field]` into `var`, returning null or throwing when it is null or missing
fn write_field_guard(writer: &mut CodeWriter, var: &str, non_null: bool) -> fmt::Result {
    if non_null {
        writer.write_line(format_args!(
            "if (!parent.TryGetProperty(field, out JsonElement {var})"
        ))?;
        writer.indent(|writer| {
            writer.write_line(format_args!("|| {var}.ValueKind == JsonValueKind.Null)"))
        })?;
        writer.braces(|writer| {
            writer.write_line(
                "throw new InvalidOperationException(\"The non-null field `\" + field + \"` is null or missing.\");",
            )
        })?;
    } else {
        writer.block(
            format_args!("if (!parent.TryGetProperty(field, out JsonElement {var}))"),
            |writer| writer.write_line("return null;"),
        )?;
        writer.blank_line()?;
        writer.block(
            format_args!("if ({var}.ValueKind == JsonValueKind.Null)"),
            |writer| writer.write_line("return null;"),
        )?;
    }
    writer.blank_line()
}

/// Converts the non-null JSON element `source` of type `ty` and hands it to `target`
fn write_value(
    writer: &mut CodeWriter,
    ty: &Type,
    source: &str,
    target: &Target,
    depth: usize,
    leaf: &Leaf<'_>,
) -> fmt::Result {
    let Some(item) = ty.item_type() else {
        return match leaf {
            Leaf::Object(method) => write_object(writer, method, source, target),
            Leaf::Scalar(method) => write_scalar(writer, method, source, target),
        };
    };
    let suffix = if depth == 0 { String::new() } else { depth.to_string() };
    let list = format!("list{suffix}");
    let element = format!("element{suffix}");
    let length = format!("{source}Length");
    let index = format!("{source}Index");
    writer.write_line(format_args!("int {length} = {source}.GetArrayLength();"))?;
    writer.write_line(format_args!(
        "var {list} = new {}[{length}];",
        leaf.item_type_name(item)
    ))?;
    writer.block(
        format_args!("for (int {index} = 0; {index} < {length}; {index}++)"),
        |writer| {
            writer.write_line(format_args!("JsonElement {element} = {source}[{index}];"))?;
            let item_target = Target::Assign(format!("{list}[{index}]"));
            if item.is_non_null() {
                writer.block(
                    format_args!("if ({element}.ValueKind == JsonValueKind.Null)"),
                    |writer| {
                        writer.write_line(format_args!(
                            "throw new InvalidOperationException(\"The list element \" + {index} + \" of the field `\" + field + \"` is null.\");"
                        ))
                    },
                )?;
                writer.blank_line()?;
                write_value(writer, item, &element, &item_target, depth + 1, leaf)
            } else {
                writer.block(
                    format_args!("if ({element}.ValueKind == JsonValueKind.Null)"),
                    |writer| writer.write_line(format_args!("{list}[{index}] = null;")),
                )?;
                writer.block("else", |writer| {
                    write_value(writer, item, &element, &item_target, depth + 1, leaf)
                })
            }
        },
    )?;
    match target {
        Target::Return => writer.write_line(format_args!("return {list};")),
        Target::Assign(lhs) => writer.write_line(format_args!("{lhs} = {list};")),
    }
}

fn write_object(
    writer: &mut CodeWriter,
    method: &ParseMethod,
    source: &str,
    target: &Target,
) -> fmt::Result {
    match method.possible_types.as_slice() {
        [construction] => write_construction(writer, construction, source, target),
        possible_types => {
            let discriminator = format!("{source}Type");
            writer.write_line(format_args!(
                "string {discriminator} = {source}.GetProperty(\"__typename\").GetString()!;"
            ))?;
            writer.blank_line()?;
            writer.block(format_args!("switch ({discriminator})"), |writer| {
                for construction in possible_types {
                    writer.write_line(format_args!("case {}:", quote(&construction.type_name)))?;
                    writer.indent(|writer| {
                        write_construction(writer, construction, source, target)?;
                        match target {
                            Target::Return => Ok(()),
                            Target::Assign(_) => writer.write_line("break;"),
                        }
                    })?;
                    writer.blank_line()?;
                }
                writer.write_line("default:")?;
                writer.indent(|writer| {
                    writer.write_line(format_args!(
                        "throw new UnknownSchemaTypeException({discriminator});"
                    ))
                })
            })
        }
    }
}

fn write_construction(
    writer: &mut CodeWriter,
    construction: &ObjectConstruction,
    source: &str,
    target: &Target,
) -> fmt::Result {
    let arguments: Vec<String> = construction
        .arguments
        .iter()
        .map(|argument| call(argument, source))
        .collect();
    write_parameters(
        writer,
        &format!("{}new {}", target.prefix(), construction.class_name),
        &arguments,
        ";",
    )
}

fn call(argument: &FieldParser, source: &str) -> String {
    format!(
        "{}({source}, {})",
        argument.method,
        quote(&argument.response_name)
    )
}

fn write_scalar(
    writer: &mut CodeWriter,
    method: &DeserializeMethod,
    source: &str,
    target: &Target,
) -> fmt::Result {
    let wire_value = match method.info.json_accessor {
        Some(accessor @ "GetString") => format!("{source}.{accessor}()!"),
        Some(accessor) => format!("{source}.{accessor}()"),
        None => source.to_owned(),
    };
    writer.write_line(format_args!(
        "{}({}){}.Deserialize({wire_value})!;",
        target.prefix(),
        method.info.element_type_name,
        method.serializer
    ))
}
