use super::impl_rename;
use super::scalar_info;
use super::ScalarCoercion;
use super::ScalarInfo;
use crate::ast::Value;
use crate::error::ScalarError;
use crate::name;
use crate::value::FileHandle;
use crate::value::RuntimeType;
use crate::value::ScalarValue;
use crate::value::SerializationType;
use crate::JsonValue;

/// A file uploaded alongside the request, such as a multipart form part.
///
/// Files never appear in literal or wire form:
/// they are bound out of band through [`ScalarCoercion::deserialize_file`].
#[derive(Clone, Debug)]
pub struct UploadType {
    info: ScalarInfo,
}

impl Default for UploadType {
    fn default() -> Self {
        Self {
            info: ScalarInfo::new(
                name!(Upload),
                "The `Upload` scalar type represents a file upload.",
            ),
        }
    }
}

impl_rename!(UploadType);

impl ScalarCoercion for UploadType {
    scalar_info!();

    fn runtime_type(&self) -> RuntimeType {
        RuntimeType::Upload
    }

    fn serialization_type(&self) -> SerializationType {
        SerializationType::File
    }

    fn is_instance_of(&self, literal: &Value) -> bool {
        literal.is_null()
    }

    fn is_instance_of_value(&self, value: &ScalarValue) -> bool {
        matches!(value, ScalarValue::Null | ScalarValue::Upload(_))
    }

    fn parse_literal(&self, literal: &Value) -> Result<ScalarValue, ScalarError> {
        match literal {
            Value::Null => Ok(ScalarValue::Null),
            _ => Err(ScalarError::not_supported(self.name(), "parsing literals")),
        }
    }

    fn parse_value(&self, value: &ScalarValue) -> Result<Value, ScalarError> {
        match value {
            ScalarValue::Null => Ok(Value::Null),
            _ => Err(ScalarError::not_supported(self.name(), "parsing values")),
        }
    }

    fn serialize(&self, value: &ScalarValue) -> Result<JsonValue, ScalarError> {
        match value {
            ScalarValue::Null => Ok(JsonValue::Null),
            _ => Err(ScalarError::not_supported(self.name(), "serialization")),
        }
    }

    fn try_deserialize(&self, json: &JsonValue) -> Option<ScalarValue> {
        json.is_null().then_some(ScalarValue::Null)
    }

    fn deserialize(&self, json: &JsonValue) -> Result<ScalarValue, ScalarError> {
        self.try_deserialize(json)
            .ok_or_else(|| ScalarError::not_supported(self.name(), "deserializing wire values"))
    }

    fn deserialize_file(&self, file: &FileHandle) -> Option<ScalarValue> {
        Some(ScalarValue::Upload(file.clone()))
    }
}
