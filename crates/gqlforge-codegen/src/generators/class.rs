use super::parameter_name;
use super::property_name;
use super::write_parameters;
use super::CodeGenerator;
use crate::descriptors::ClassDescriptor;
use crate::descriptors::FieldDescriptor;
use crate::descriptors::InterfaceDescriptor;
use crate::CodeWriter;
use crate::CodegenError;
use crate::TypeLookup;

/// An immutable data class: a constructor assigning every field,
/// and one read-only property per field.
///
/// Constructor parameters follow the order of the descriptor fields:
/// result parsers call the constructor positionally.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassGenerator;

/// An interface with one read-only property per field
#[derive(Clone, Copy, Debug, Default)]
pub struct InterfaceGenerator;

fn base_list(implements: &[String]) -> String {
    if implements.is_empty() {
        String::new()
    } else {
        format!(" : {}", implements.join(", "))
    }
}

fn property_type(field: &FieldDescriptor, lookup: &TypeLookup<'_>) -> Result<String, CodegenError> {
    lookup.get_type_name(&field.ty, &field.name, Some(&field.path), true)
}

impl CodeGenerator<ClassDescriptor> for ClassGenerator {
    fn file_name(&self, descriptor: &ClassDescriptor) -> String {
        format!("{}.cs", descriptor.name)
    }

    fn generate(
        &self,
        writer: &mut CodeWriter,
        descriptor: &ClassDescriptor,
        lookup: &TypeLookup<'_>,
    ) -> Result<(), CodegenError> {
        let types = descriptor
            .fields
            .iter()
            .map(|field| property_type(field, lookup))
            .collect::<Result<Vec<_>, _>>()?;
        let header = format!(
            "public partial class {}{}",
            descriptor.name,
            base_list(&descriptor.implements)
        );
        writer.block(header, |writer| {
            let parameters: Vec<String> = descriptor
                .fields
                .iter()
                .zip(&types)
                .map(|(field, ty)| format!("{ty} {}", parameter_name(&field.name)))
                .collect();
            write_parameters(writer, &format!("public {}", descriptor.name), &parameters, "")?;
            writer.braces(|writer| {
                for field in &descriptor.fields {
                    writer.write_line(format_args!(
                        "{} = {};",
                        property_name(&field.name),
                        parameter_name(&field.name)
                    ))?;
                }
                Ok::<_, CodegenError>(())
            })?;
            for (field, ty) in descriptor.fields.iter().zip(&types) {
                writer.blank_line()?;
                writer.write_line(format_args!(
                    "public {ty} {} {{ get; }}",
                    property_name(&field.name)
                ))?;
            }
            Ok(())
        })
    }
}

impl CodeGenerator<InterfaceDescriptor> for InterfaceGenerator {
    fn file_name(&self, descriptor: &InterfaceDescriptor) -> String {
        format!("{}.cs", descriptor.name)
    }

    fn generate(
        &self,
        writer: &mut CodeWriter,
        descriptor: &InterfaceDescriptor,
        lookup: &TypeLookup<'_>,
    ) -> Result<(), CodegenError> {
        let header = format!(
            "public partial interface {}{}",
            descriptor.name,
            base_list(&descriptor.implements)
        );
        writer.block(header, |writer| {
            for (i, field) in descriptor.fields.iter().enumerate() {
                if i > 0 {
                    writer.blank_line()?;
                }
                let ty = property_type(field, lookup)?;
                writer.write_line(format_args!("{ty} {} {{ get; }}", property_name(&field.name)))?;
            }
            Ok(())
        })
    }
}
