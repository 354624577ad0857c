//! One generator per kind of artifact, and [`generate_client`] driving them all.

mod class;
mod client;
mod dependency_injection;
mod enums;
mod input;
mod operation;
mod query;

pub use self::class::ClassGenerator;
pub use self::class::InterfaceGenerator;
pub use self::client::ClientClassGenerator;
pub use self::client::ClientInterfaceGenerator;
pub use self::dependency_injection::DependencyInjectionGenerator;
pub use self::enums::EnumGenerator;
pub use self::enums::EnumValueSerializerGenerator;
pub use self::input::InputClassGenerator;
pub use self::input::InputClassSerializerGenerator;
pub use self::operation::OperationGenerator;
pub use self::query::normalize_document;
pub use self::query::query_hash;
pub use self::query::QueryGenerator;
use crate::descriptors::ClientModel;
use crate::descriptors::DependencyInjectionDescriptor;
use crate::result_parser::ResultParserGenerator;
use crate::CodeWriter;
use crate::CodegenError;
use crate::CodegenOptions;
use crate::TypeLookup;
use gqlforge_scalars::Scalars;
use heck::ToLowerCamelCase;
use heck::ToUpperCamelCase;
use serde::Serialize;

/// Emits the source of one artifact from its descriptor.
///
/// Generators hold no state: each call writes to its own [`CodeWriter`],
/// so independent artifacts can be generated in any order.
pub trait CodeGenerator<D> {
    fn file_name(&self, descriptor: &D) -> String;

    /// Writes the type declaration, without `using` directives or namespace
    fn generate(
        &self,
        writer: &mut CodeWriter,
        descriptor: &D,
        lookup: &TypeLookup<'_>,
    ) -> Result<(), CodegenError>;

    /// Namespaces used by the generated code, in addition to the default ones
    fn usings(&self) -> &'static [&'static str] {
        &[]
    }

    /// Generates the type declaration into a string
    fn generate_to_string(
        &self,
        descriptor: &D,
        lookup: &TypeLookup<'_>,
        options: &CodegenOptions,
    ) -> Result<String, CodegenError> {
        let mut writer = CodeWriter::new(options.indent_prefix.as_str());
        self.generate(&mut writer, descriptor, lookup)?;
        Ok(writer.into_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ArtifactKind {
    Class,
    Interface,
    Enum,
    EnumValueSerializer,
    InputClass,
    InputClassSerializer,
    Operation,
    Query,
    ResultParser,
    ClientInterface,
    ClientClass,
    DependencyInjection,
}

/// A complete source file
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFile {
    pub file_name: String,
    pub kind: ArtifactKind,
    pub source: String,
}

/// Generates every artifact of a client, one file each.
///
/// Files come in a fixed order: data types, enums, inputs, queries, operations,
/// result parsers, then the client and its service registration.
pub fn generate_client(
    model: &ClientModel,
    scalars: &Scalars,
    options: &CodegenOptions,
) -> Result<Vec<GeneratedFile>, CodegenError> {
    model.validate()?;
    let lookup = TypeLookup::new(scalars, &model.schema_types, &model.generated_types);
    let mut files = Vec::new();
    for interface in &model.interfaces {
        files.push(generate_file(&InterfaceGenerator, ArtifactKind::Interface, interface, &lookup, options)?);
    }
    for class in &model.classes {
        files.push(generate_file(&ClassGenerator, ArtifactKind::Class, class, &lookup, options)?);
    }
    for descriptor in &model.enums {
        files.push(generate_file(&EnumGenerator, ArtifactKind::Enum, descriptor, &lookup, options)?);
        files.push(generate_file(
            &EnumValueSerializerGenerator,
            ArtifactKind::EnumValueSerializer,
            descriptor,
            &lookup,
            options,
        )?);
    }
    for input in &model.input_classes {
        files.push(generate_file(&InputClassGenerator, ArtifactKind::InputClass, input, &lookup, options)?);
        files.push(generate_file(
            &InputClassSerializerGenerator,
            ArtifactKind::InputClassSerializer,
            input,
            &lookup,
            options,
        )?);
    }
    for query in &model.queries {
        files.push(generate_file(&QueryGenerator, ArtifactKind::Query, query, &lookup, options)?);
    }
    for operation in &model.client.operations {
        files.push(generate_file(&OperationGenerator, ArtifactKind::Operation, operation, &lookup, options)?);
    }
    for parser in &model.result_parsers {
        files.push(generate_file(&ResultParserGenerator, ArtifactKind::ResultParser, parser, &lookup, options)?);
    }
    files.push(generate_file(
        &ClientInterfaceGenerator,
        ArtifactKind::ClientInterface,
        &model.client,
        &lookup,
        options,
    )?);
    files.push(generate_file(
        &ClientClassGenerator,
        ArtifactKind::ClientClass,
        &model.client,
        &lookup,
        options,
    )?);
    files.push(generate_file(
        &DependencyInjectionGenerator,
        ArtifactKind::DependencyInjection,
        &DependencyInjectionDescriptor::from_model(model),
        &lookup,
        options,
    )?);
    tracing::debug!(client = %model.client.name, files = files.len(), "generated client");
    Ok(files)
}

/// Generates one artifact wrapped in its file header, `using` directives and namespace
pub fn generate_file<D>(
    generator: &impl CodeGenerator<D>,
    kind: ArtifactKind,
    descriptor: &D,
    lookup: &TypeLookup<'_>,
    options: &CodegenOptions,
) -> Result<GeneratedFile, CodegenError> {
    let mut writer = CodeWriter::new(options.indent_prefix.as_str());
    match &options.file_header {
        Some(header) => {
            for line in header.lines() {
                writer.write_line(format!("// {line}").trim_end())?;
            }
        }
        None => writer.write_line("// <auto-generated/>")?,
    }
    writer.write_line("#nullable enable")?;
    writer.blank_line()?;
    let mut usings = options.all_usings();
    for using in generator.usings() {
        if !usings.contains(using) {
            usings.push(*using);
        }
    }
    for using in usings {
        writer.write_line(format_args!("using {using};"))?;
    }
    writer.blank_line()?;
    writer.block(format_args!("namespace {}", options.namespace), |writer| {
        generator.generate(writer, descriptor, lookup)
    })?;
    let file = GeneratedFile {
        file_name: generator.file_name(descriptor),
        kind,
        source: writer.into_string(),
    };
    tracing::debug!(file = %file.file_name, ?kind, "generated artifact");
    Ok(file)
}

/// C# property name of a GraphQL field: `appearsIn` becomes `AppearsIn`
pub(crate) fn property_name(field: &str) -> String {
    field.to_upper_camel_case()
}

/// C# parameter or local name of a GraphQL field or argument
pub(crate) fn parameter_name(field: &str) -> String {
    let name = field.to_lower_camel_case();
    if CSHARP_KEYWORDS.contains(&name.as_str()) {
        format!("@{name}")
    } else {
        name
    }
}

/// Field holding the serializer of a scalar, enum or input type
pub(crate) fn serializer_field(type_name: &str) -> String {
    format!("_{}Serializer", type_name.to_lower_camel_case())
}

/// Writes `{prefix}(` and one parameter per line, or `{prefix}()`, followed by `suffix`
pub(crate) fn write_parameters(
    writer: &mut CodeWriter,
    prefix: &str,
    parameters: &[String],
    suffix: &str,
) -> std::fmt::Result {
    if parameters.is_empty() {
        return writer.write_line(format_args!("{prefix}(){suffix}"));
    }
    writer.write_line(format_args!("{prefix}("))?;
    writer.indent(|writer| {
        for (i, parameter) in parameters.iter().enumerate() {
            if i + 1 == parameters.len() {
                writer.write_line(format_args!("{parameter}){suffix}"))?;
            } else {
                writer.write_line(format_args!("{parameter},"))?;
            }
        }
        Ok(())
    })
}

const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];
