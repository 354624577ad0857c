use super::impl_rename;
use super::json_string;
use super::scalar_info;
use super::ScalarCoercion;
use super::ScalarInfo;
use crate::ast::Value;
use crate::error::ScalarError;
use crate::name;
use crate::value::RuntimeType;
use crate::value::ScalarValue;
use crate::value::SerializationType;
use crate::JsonValue;
use url::Url;
use uuid::Uuid;

/// An absolute URL.
#[derive(Clone, Debug)]
pub struct UrlType {
    info: ScalarInfo,
}

/// A UUID. Serializes as 32 lowercase hex digits without hyphens,
/// and accepts any of the usual textual forms on input.
#[derive(Clone, Debug)]
pub struct UuidType {
    info: ScalarInfo,
}

impl Default for UrlType {
    fn default() -> Self {
        Self {
            info: ScalarInfo::new(name!(Url), "The `Url` scalar represents an absolute URL."),
        }
    }
}

impl Default for UuidType {
    fn default() -> Self {
        Self {
            info: ScalarInfo::new(name!(Uuid), "The `Uuid` scalar represents a UUID."),
        }
    }
}

impl_rename!(UrlType);
impl_rename!(UuidType);

fn format_uuid(uuid: &Uuid) -> String {
    uuid.simple().to_string()
}

impl ScalarCoercion for UrlType {
    scalar_info!();

    fn runtime_type(&self) -> RuntimeType {
        RuntimeType::Url
    }

    fn serialization_type(&self) -> SerializationType {
        SerializationType::String
    }

    fn is_instance_of(&self, literal: &Value) -> bool {
        match literal {
            Value::Null => true,
            Value::String(text) => Url::parse(text).is_ok(),
            _ => false,
        }
    }

    fn is_instance_of_value(&self, value: &ScalarValue) -> bool {
        matches!(value, ScalarValue::Null | ScalarValue::Url(_))
    }

    fn parse_literal(&self, literal: &Value) -> Result<ScalarValue, ScalarError> {
        match literal {
            Value::Null => Ok(ScalarValue::Null),
            Value::String(text) => Url::parse(text)
                .map(ScalarValue::Url)
                .map_err(|_| ScalarError::invalid_literal(self.name(), literal)),
            _ => Err(ScalarError::invalid_literal(self.name(), literal)),
        }
    }

    fn parse_value(&self, value: &ScalarValue) -> Result<Value, ScalarError> {
        match value {
            ScalarValue::Null => Ok(Value::Null),
            ScalarValue::Url(url) => Ok(Value::String(url.as_str().to_owned())),
            _ => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn serialize(&self, value: &ScalarValue) -> Result<JsonValue, ScalarError> {
        match value {
            ScalarValue::Null => Ok(JsonValue::Null),
            ScalarValue::Url(url) => Ok(json_string(url.as_str())),
            _ => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn try_deserialize(&self, json: &JsonValue) -> Option<ScalarValue> {
        match json {
            JsonValue::Null => Some(ScalarValue::Null),
            JsonValue::String(text) => Url::parse(text.as_str()).ok().map(ScalarValue::Url),
            _ => None,
        }
    }
}

impl ScalarCoercion for UuidType {
    scalar_info!();

    fn runtime_type(&self) -> RuntimeType {
        RuntimeType::Uuid
    }

    fn serialization_type(&self) -> SerializationType {
        SerializationType::String
    }

    fn is_instance_of(&self, literal: &Value) -> bool {
        match literal {
            Value::Null => true,
            Value::String(text) => Uuid::parse_str(text).is_ok(),
            _ => false,
        }
    }

    fn is_instance_of_value(&self, value: &ScalarValue) -> bool {
        matches!(value, ScalarValue::Null | ScalarValue::Uuid(_))
    }

    fn parse_literal(&self, literal: &Value) -> Result<ScalarValue, ScalarError> {
        match literal {
            Value::Null => Ok(ScalarValue::Null),
            Value::String(text) => Uuid::parse_str(text)
                .map(ScalarValue::Uuid)
                .map_err(|_| ScalarError::invalid_literal(self.name(), literal)),
            _ => Err(ScalarError::invalid_literal(self.name(), literal)),
        }
    }

    fn parse_value(&self, value: &ScalarValue) -> Result<Value, ScalarError> {
        match value {
            ScalarValue::Null => Ok(Value::Null),
            ScalarValue::Uuid(uuid) => Ok(Value::String(format_uuid(uuid))),
            _ => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn serialize(&self, value: &ScalarValue) -> Result<JsonValue, ScalarError> {
        match value {
            ScalarValue::Null => Ok(JsonValue::Null),
            ScalarValue::Uuid(uuid) => Ok(json_string(format_uuid(uuid))),
            _ => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn try_deserialize(&self, json: &JsonValue) -> Option<ScalarValue> {
        match json {
            JsonValue::Null => Some(ScalarValue::Null),
            JsonValue::String(text) => Uuid::parse_str(text.as_str()).ok().map(ScalarValue::Uuid),
            _ => None,
        }
    }
}
