use super::operation::argument_property;
use super::parameter_name;
use super::property_name;
use super::write_parameters;
use super::CodeGenerator;
use crate::descriptors::ClientDescriptor;
use crate::descriptors::OperationDescriptor;
use crate::descriptors::OperationKind;
use crate::writer::quote;
use crate::CodeWriter;
use crate::CodegenError;
use crate::TypeLookup;

/// The client facade interface: two `*Async` methods per operation,
/// one taking the arguments and one taking a prepared operation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClientInterfaceGenerator;

/// The client facade, executing operations through the runtime executors
#[derive(Clone, Copy, Debug, Default)]
pub struct ClientClassGenerator;

const CANCELLATION: &str = "CancellationToken cancellationToken = default";

struct Method {
    name: String,
    return_type: String,
    /// Required parameters first: C# wants optional ones last
    parameters: Vec<String>,
    /// `(property, parameter)` pairs of the operation initializer
    assignments: Vec<(String, String)>,
    /// Parameters to check for null
    null_checks: Vec<String>,
}

impl Method {
    fn new(operation: &OperationDescriptor, lookup: &TypeLookup<'_>) -> Result<Self, CodegenError> {
        let mut required = Vec::new();
        let mut optional = Vec::new();
        let mut assignments = Vec::new();
        let mut null_checks = Vec::new();
        for argument in &operation.arguments {
            let ty = lookup.get_type_name(&argument.ty, &argument.name, None, false)?;
            let parameter = parameter_name(&argument.name);
            if argument.ty.is_non_null() {
                if lookup.is_reference_type(&argument.ty, &argument.name, None)? {
                    null_checks.push(parameter.clone());
                }
                required.push(format!("{ty} {parameter}"));
            } else {
                optional.push(format!("Optional<{ty}> {parameter} = default"));
            }
            assignments.push((argument_property(argument), parameter));
        }
        let mut parameters = required;
        parameters.append(&mut optional);
        parameters.push(CANCELLATION.to_owned());
        Ok(Self {
            name: format!("{}Async", property_name(&operation.graphql_name)),
            return_type: return_type(operation),
            parameters,
            assignments,
            null_checks,
        })
    }

    fn operation_parameters(operation: &OperationDescriptor) -> Vec<String> {
        vec![
            format!("{} operation", operation.name),
            CANCELLATION.to_owned(),
        ]
    }
}

fn return_type(operation: &OperationDescriptor) -> String {
    match operation.kind {
        OperationKind::Subscription => format!("Task<IResponseStream<{}>>", operation.result_type),
        OperationKind::Query | OperationKind::Mutation => {
            format!("Task<IOperationResult<{}>>", operation.result_type)
        }
    }
}

fn executor(operation: &OperationDescriptor) -> &'static str {
    match operation.kind {
        OperationKind::Subscription => "_streamExecutor",
        OperationKind::Query | OperationKind::Mutation => "_executor",
    }
}

fn write_null_check(writer: &mut CodeWriter, parameter: &str) -> std::fmt::Result {
    writer.block(format_args!("if ({parameter} is null)"), |writer| {
        writer.write_line(format_args!(
            "throw new ArgumentNullException(nameof({parameter}));"
        ))
    })?;
    writer.blank_line()
}

impl CodeGenerator<ClientDescriptor> for ClientInterfaceGenerator {
    fn file_name(&self, descriptor: &ClientDescriptor) -> String {
        format!("{}.cs", descriptor.interface_name())
    }

    fn generate(
        &self,
        writer: &mut CodeWriter,
        descriptor: &ClientDescriptor,
        lookup: &TypeLookup<'_>,
    ) -> Result<(), CodegenError> {
        let methods = descriptor
            .operations
            .iter()
            .map(|operation| Method::new(operation, lookup))
            .collect::<Result<Vec<_>, _>>()?;
        writer.block(
            format_args!("public partial interface {}", descriptor.interface_name()),
            |writer| {
                for (i, (operation, method)) in descriptor.operations.iter().zip(&methods).enumerate() {
                    if i > 0 {
                        writer.blank_line()?;
                    }
                    let prefix = format!("{} {}", method.return_type, method.name);
                    write_parameters(writer, &prefix, &method.parameters, ";")?;
                    writer.blank_line()?;
                    write_parameters(writer, &prefix, &Method::operation_parameters(operation), ";")?;
                }
                Ok(())
            },
        )
    }
}

impl CodeGenerator<ClientDescriptor> for ClientClassGenerator {
    fn file_name(&self, descriptor: &ClientDescriptor) -> String {
        format!("{}.cs", descriptor.name)
    }

    fn generate(
        &self,
        writer: &mut CodeWriter,
        descriptor: &ClientDescriptor,
        lookup: &TypeLookup<'_>,
    ) -> Result<(), CodegenError> {
        let methods = descriptor
            .operations
            .iter()
            .map(|operation| Method::new(operation, lookup))
            .collect::<Result<Vec<_>, _>>()?;
        let streams = descriptor
            .operations
            .iter()
            .any(|operation| operation.kind == OperationKind::Subscription);
        let header = format!(
            "public partial class {} : {}",
            descriptor.name,
            descriptor.interface_name()
        );
        writer.block(header, |writer| {
            writer.write_line(format_args!(
                "private const string _clientName = {};",
                quote(&descriptor.name)
            ))?;
            writer.write_line("private readonly IOperationExecutor _executor;")?;
            if streams {
                writer.write_line("private readonly IOperationStreamExecutor _streamExecutor;")?;
            }
            writer.blank_line()?;

            let mut parameters = vec!["IOperationExecutorPool executorPool".to_owned()];
            if streams {
                parameters.push("IOperationStreamExecutorPool streamExecutorPool".to_owned());
            }
            write_parameters(writer, &format!("public {}", descriptor.name), &parameters, "")?;
            writer.braces(|writer| {
                writer.write_line("_executor = executorPool.CreateExecutor(_clientName);")?;
                if streams {
                    writer.write_line(
                        "_streamExecutor = streamExecutorPool.CreateStreamExecutor(_clientName);",
                    )?;
                }
                Ok::<_, std::fmt::Error>(())
            })?;

            for (operation, method) in descriptor.operations.iter().zip(&methods) {
                writer.blank_line()?;
                let prefix = format!("public {} {}", method.return_type, method.name);
                write_parameters(writer, &prefix, &method.parameters, "")?;
                writer.braces(|writer| {
                    for parameter in &method.null_checks {
                        write_null_check(writer, parameter)?;
                    }
                    writer.write_line(format_args!("return {}.ExecuteAsync(", executor(operation)))?;
                    writer.indent(|writer| {
                        if method.assignments.is_empty() {
                            writer.write_line(format_args!("new {}(),", operation.name))?;
                        } else {
                            writer.write_line(format_args!("new {}", operation.name))?;
                            writer.write_line("{")?;
                            writer.indent(|writer| {
                                for (i, (property, parameter)) in method.assignments.iter().enumerate() {
                                    let separator = if i + 1 < method.assignments.len() { "," } else { "" };
                                    writer.write_line(format_args!("{property} = {parameter}{separator}"))?;
                                }
                                Ok::<_, std::fmt::Error>(())
                            })?;
                            writer.write_line("},")?;
                        }
                        writer.write_line("cancellationToken);")
                    })
                })?;

                writer.blank_line()?;
                write_parameters(writer, &prefix, &Method::operation_parameters(operation), "")?;
                writer.braces(|writer| {
                    write_null_check(writer, "operation")?;
                    writer.write_line(format_args!(
                        "return {}.ExecuteAsync(operation, cancellationToken);",
                        executor(operation)
                    ))
                })?;
            }
            Ok(())
        })
    }
}
