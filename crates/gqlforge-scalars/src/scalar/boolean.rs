use super::impl_rename;
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

#[derive(Clone, Debug)]
pub struct BooleanType {
    info: ScalarInfo,
}

impl Default for BooleanType {
    fn default() -> Self {
        Self {
            info: ScalarInfo::new(
                name!(Boolean),
                "The `Boolean` scalar type represents `true` or `false`.",
            ),
        }
    }
}

impl_rename!(BooleanType);

impl ScalarCoercion for BooleanType {
    scalar_info!();

    fn runtime_type(&self) -> RuntimeType {
        RuntimeType::Boolean
    }

    fn serialization_type(&self) -> SerializationType {
        SerializationType::Boolean
    }

    fn is_instance_of(&self, literal: &Value) -> bool {
        matches!(literal, Value::Null | Value::Boolean(_))
    }

    fn is_instance_of_value(&self, value: &ScalarValue) -> bool {
        matches!(value, ScalarValue::Null | ScalarValue::Boolean(_))
    }

    fn parse_literal(&self, literal: &Value) -> Result<ScalarValue, ScalarError> {
        match literal {
            Value::Null => Ok(ScalarValue::Null),
            Value::Boolean(value) => Ok(ScalarValue::Boolean(*value)),
            _ => Err(ScalarError::invalid_literal(self.name(), literal)),
        }
    }

    fn parse_value(&self, value: &ScalarValue) -> Result<Value, ScalarError> {
        match value {
            ScalarValue::Null => Ok(Value::Null),
            ScalarValue::Boolean(value) => Ok(Value::Boolean(*value)),
            _ => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn serialize(&self, value: &ScalarValue) -> Result<JsonValue, ScalarError> {
        match value {
            ScalarValue::Null => Ok(JsonValue::Null),
            ScalarValue::Boolean(value) => Ok(JsonValue::Bool(*value)),
            _ => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn try_deserialize(&self, json: &JsonValue) -> Option<ScalarValue> {
        match json {
            JsonValue::Null => Some(ScalarValue::Null),
            JsonValue::Bool(value) => Some(ScalarValue::Boolean(*value)),
            _ => None,
        }
    }
}
