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

/// A signed 64-bit integer, carried as a string literal and a JSON string
/// so that transports that read JSON numbers as doubles keep full precision.
#[derive(Clone, Debug)]
pub struct LongType {
    info: ScalarInfo,
}

impl Default for LongType {
    fn default() -> Self {
        Self {
            info: ScalarInfo::new(
                name!(Long),
                "The `Long` scalar type represents a signed 64-bit integer, serialized as a string.",
            ),
        }
    }
}

impl_rename!(LongType);

fn parse_long(text: &str) -> Option<i64> {
    // `i64::from_str` accepts a leading `+`, which is not base-10 GraphQL syntax
    if text.starts_with('+') {
        return None;
    }
    text.parse().ok()
}

impl ScalarCoercion for LongType {
    scalar_info!();

    fn runtime_type(&self) -> RuntimeType {
        RuntimeType::Long
    }

    fn serialization_type(&self) -> SerializationType {
        SerializationType::String
    }

    fn is_instance_of(&self, literal: &Value) -> bool {
        match literal {
            Value::Null => true,
            Value::String(text) => parse_long(text).is_some(),
            _ => false,
        }
    }

    fn is_instance_of_value(&self, value: &ScalarValue) -> bool {
        matches!(value, ScalarValue::Null | ScalarValue::Long(_))
    }

    fn parse_literal(&self, literal: &Value) -> Result<ScalarValue, ScalarError> {
        match literal {
            Value::Null => Ok(ScalarValue::Null),
            Value::String(text) => parse_long(text)
                .map(ScalarValue::Long)
                .ok_or_else(|| ScalarError::invalid_literal(self.name(), literal)),
            _ => Err(ScalarError::invalid_literal(self.name(), literal)),
        }
    }

    fn parse_value(&self, value: &ScalarValue) -> Result<Value, ScalarError> {
        match value {
            ScalarValue::Null => Ok(Value::Null),
            ScalarValue::Long(long) => Ok(Value::String(long.to_string())),
            _ => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn serialize(&self, value: &ScalarValue) -> Result<JsonValue, ScalarError> {
        match value {
            ScalarValue::Null => Ok(JsonValue::Null),
            ScalarValue::Long(long) => Ok(json_string(long.to_string())),
            _ => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn try_deserialize(&self, json: &JsonValue) -> Option<ScalarValue> {
        match json {
            JsonValue::Null => Some(ScalarValue::Null),
            JsonValue::String(text) => parse_long(text.as_str()).map(ScalarValue::Long),
            JsonValue::Number(number) => number.as_i64().map(ScalarValue::Long),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_string_literals() {
        let long = LongType::default();
        assert_eq!(
            long.parse_literal(&Value::from("9007199254740993")),
            Ok(ScalarValue::Long(9_007_199_254_740_993))
        );
        assert!(long.parse_literal(&Value::from(1)).is_err());
        assert!(long.parse_literal(&Value::from("+1")).is_err());
        assert!(!long.is_instance_of(&Value::from("1.5")));
    }

    #[test]
    fn deserializes_strings_and_integral_numbers() {
        let long = LongType::default();
        assert_eq!(
            long.try_deserialize(&json_string("-42")),
            Some(ScalarValue::Long(-42))
        );
        assert_eq!(
            long.try_deserialize(&super::super::json_int(7)),
            Some(ScalarValue::Long(7))
        );
        assert_eq!(long.try_deserialize(&JsonValue::Bool(true)), None);
    }
}
