use super::property_name;
use super::CodeGenerator;
use crate::descriptors::ArgumentDescriptor;
use crate::descriptors::OperationDescriptor;
use crate::writer::quote;
use crate::CodeWriter;
use crate::CodegenError;
use crate::TypeLookup;

/// An `IOperation<T>`: the document, the result type and the variables of one operation.
///
/// Non-null arguments are plain properties and always sent.
/// Nullable arguments are `Optional<T>` and only sent when set.
#[derive(Clone, Copy, Debug, Default)]
pub struct OperationGenerator;

/// Members of `IOperation<T>` that arguments must not shadow
const RESERVED_MEMBERS: &[&str] = &["Name", "Document", "Kind", "ResultType", "GetVariableValues"];

/// Property holding the value of an argument
pub(crate) fn argument_property(argument: &ArgumentDescriptor) -> String {
    let name = property_name(&argument.name);
    if RESERVED_MEMBERS.contains(&name.as_str()) {
        format!("{name}Argument")
    } else {
        name
    }
}

impl CodeGenerator<OperationDescriptor> for OperationGenerator {
    fn file_name(&self, descriptor: &OperationDescriptor) -> String {
        format!("{}.cs", descriptor.name)
    }

    fn generate(
        &self,
        writer: &mut CodeWriter,
        descriptor: &OperationDescriptor,
        lookup: &TypeLookup<'_>,
    ) -> Result<(), CodegenError> {
        let types = descriptor
            .arguments
            .iter()
            .map(|argument| lookup.get_type_name(&argument.ty, &argument.name, None, false))
            .collect::<Result<Vec<_>, _>>()?;
        let header = format!(
            "public partial class {} : IOperation<{}>",
            descriptor.name, descriptor.result_type
        );
        writer.block(header, |writer| {
            writer.write_line(format_args!(
                "public string Name => {};",
                quote(&descriptor.graphql_name)
            ))?;
            writer.blank_line()?;
            writer.write_line(format_args!(
                "public IDocument Document => {}.Default;",
                descriptor.query
            ))?;
            writer.blank_line()?;
            writer.write_line(format_args!(
                "public OperationKind Kind => OperationKind.{};",
                descriptor.kind.as_str()
            ))?;
            writer.blank_line()?;
            writer.write_line(format_args!(
                "public Type ResultType => typeof({});",
                descriptor.result_type
            ))?;

            for (argument, ty) in descriptor.arguments.iter().zip(&types) {
                writer.blank_line()?;
                let property = argument_property(argument);
                if argument.ty.is_non_null() {
                    writer.write_line(format_args!(
                        "public {ty} {property} {{ get; set; }} = default!;"
                    ))?;
                } else {
                    writer.write_line(format_args!(
                        "public Optional<{ty}> {property} {{ get; set; }}"
                    ))?;
                }
            }
            writer.blank_line()?;

            writer.block(
                "public IReadOnlyList<VariableValue> GetVariableValues()",
                |writer| {
                    writer.write_line("var variables = new List<VariableValue>();")?;
                    for argument in &descriptor.arguments {
                        writer.blank_line()?;
                        let property = argument_property(argument);
                        let add = |value: &str| {
                            format!(
                                "variables.Add(new VariableValue({}, {}, {value}));",
                                quote(&argument.name),
                                quote(argument.ty.inner_named_type())
                            )
                        };
                        if argument.ty.is_non_null() {
                            writer.write_line(add(&property))?;
                        } else {
                            writer.block(format_args!("if ({property}.HasValue)"), |writer| {
                                writer.write_line(add(&format!("{property}.Value")))
                            })?;
                        }
                    }
                    writer.blank_line()?;
                    writer.write_line("return variables;")
                },
            )?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::OperationKind;
    use crate::schema::GeneratedTypeMap;
    use crate::schema::SchemaTypes;
    use crate::CodegenOptions;
    use expect_test::expect;
    use gqlforge_scalars::ast::Type;
    use gqlforge_scalars::name;
    use gqlforge_scalars::Scalars;

    #[test]
    fn variables_of_an_operation() {
        let scalars = Scalars::default();
        let schema = SchemaTypes::new();
        let generated = GeneratedTypeMap::new();
        let lookup = TypeLookup::new(&scalars, &schema, &generated);
        let operation = OperationDescriptor {
            name: "SearchOperation".to_owned(),
            graphql_name: name!(Search),
            kind: OperationKind::Query,
            result_type: "ISearch".to_owned(),
            arguments: vec![
                ArgumentDescriptor {
                    name: name!(text),
                    ty: Type::parse("String!").unwrap(),
                },
                ArgumentDescriptor {
                    name: name!(name),
                    ty: Type::parse("[ID!]").unwrap(),
                },
            ],
            query: "SearchQuery".to_owned(),
        };
        let source = OperationGenerator
            .generate_to_string(&operation, &lookup, &CodegenOptions::default())
            .unwrap();
        expect![[r#"
            public partial class SearchOperation : IOperation<ISearch>
            {
                public string Name => "Search";

                public IDocument Document => SearchQuery.Default;

                public OperationKind Kind => OperationKind.Query;

                public Type ResultType => typeof(ISearch);

                public string Text { get; set; } = default!;

                public Optional<List<string>> NameArgument { get; set; }

                public IReadOnlyList<VariableValue> GetVariableValues()
                {
                    var variables = new List<VariableValue>();

                    variables.Add(new VariableValue("text", "String", Text));

                    if (NameArgument.HasValue)
                    {
                        variables.Add(new VariableValue("name", "ID", NameArgument.Value));
                    }

                    return variables;
                }
            }
        "#]]
        .assert_eq(&source);
    }
}
