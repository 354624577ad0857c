//! Parsers turning the JSON `data` of a response into generated result types.
//!
//! A [`ResultParserPlan`] resolves every method a parser needs. The plan is emitted as a
//! `JsonResultParserBase<T>` subclass by [`ResultParserGenerator`], and can be run directly
//! with [`ResultParserPlan::parse`] to check what the emitted code accepts.

mod emit;
mod interpret;
mod plan;

pub use self::interpret::ParsedObject;
pub use self::interpret::ParsedValue;
pub use self::interpret::ResultParseError;
pub use self::plan::parse_method_name;
pub use self::plan::DeserializeMethod;
pub use self::plan::FieldParser;
pub use self::plan::FieldParserKind;
pub use self::plan::ObjectConstruction;
pub use self::plan::ParseMethod;
pub use self::plan::ResultParserPlan;
pub use self::plan::SerializerField;
use crate::descriptors::ResultParserDescriptor;
use crate::generators::CodeGenerator;
use crate::CodeWriter;
use crate::CodegenError;
use crate::TypeLookup;

pub struct ResultParserGenerator;

impl CodeGenerator<ResultParserDescriptor> for ResultParserGenerator {
    fn file_name(&self, descriptor: &ResultParserDescriptor) -> String {
        format!("{}.cs", descriptor.name)
    }

    fn generate(
        &self,
        writer: &mut CodeWriter,
        descriptor: &ResultParserDescriptor,
        lookup: &TypeLookup<'_>,
    ) -> Result<(), CodegenError> {
        let plan = ResultParserPlan::build(descriptor, lookup)?;
        emit::write_class(writer, &plan)?;
        Ok(())
    }
}
