use super::impl_rename;
use super::json_float;
use super::scalar_info;
use super::ScalarCoercion;
use super::ScalarInfo;
use crate::ast::FloatValue;
use crate::ast::IntValue;
use crate::ast::Value;
use crate::error::ScalarError;
use crate::name;
use crate::value::RuntimeType;
use crate::value::ScalarValue;
use crate::value::SerializationType;
use crate::JsonValue;
use rust_decimal::Decimal;
use serde_json_bytes::serde_json::Number;
use std::str::FromStr;

/// A double-precision float.
///
/// Both `Float` and `Int` literals are accepted.
/// Literals produced by [`parse_value`][ScalarCoercion::parse_value] use scientific notation.
#[derive(Clone, Debug)]
pub struct FloatType {
    info: ScalarInfo,
    min: f64,
    max: f64,
}

/// A fixed-point decimal number, `Float` or `Int` literal, JSON number on the wire.
#[derive(Clone, Debug)]
pub struct DecimalType {
    info: ScalarInfo,
}

impl Default for FloatType {
    fn default() -> Self {
        Self {
            info: ScalarInfo::new(
                name!(Float),
                "The `Float` scalar type represents signed double-precision fractional values.",
            ),
            min: f64::MIN,
            max: f64::MAX,
        }
    }
}

impl FloatType {
    /// A custom float scalar that only accepts `min..=max`
    pub fn bounded(name: crate::Name, min: f64, max: f64) -> Self {
        Self {
            info: ScalarInfo {
                name,
                description: None,
            },
            min,
            max,
        }
    }

    fn check(&self, value: f64) -> Option<f64> {
        (value.is_finite() && (self.min..=self.max).contains(&value)).then_some(value)
    }

    fn from_runtime(&self, value: &ScalarValue) -> Option<f64> {
        match value {
            ScalarValue::Float(float) => self.check(*float),
            _ => None,
        }
    }
}

impl_rename!(FloatType);

impl ScalarCoercion for FloatType {
    scalar_info!();

    fn runtime_type(&self) -> RuntimeType {
        RuntimeType::Float
    }

    fn serialization_type(&self) -> SerializationType {
        SerializationType::Float
    }

    fn is_instance_of(&self, literal: &Value) -> bool {
        match literal {
            Value::Null => true,
            Value::Int(_) | Value::Float(_) => literal.to_f64().and_then(|f| self.check(f)).is_some(),
            _ => false,
        }
    }

    fn is_instance_of_value(&self, value: &ScalarValue) -> bool {
        value.is_null() || self.from_runtime(value).is_some()
    }

    fn parse_literal(&self, literal: &Value) -> Result<ScalarValue, ScalarError> {
        match literal {
            Value::Null => Ok(ScalarValue::Null),
            Value::Int(_) | Value::Float(_) => literal
                .to_f64()
                .and_then(|float| self.check(float))
                .map(ScalarValue::Float)
                .ok_or_else(|| ScalarError::invalid_literal(self.name(), literal)),
            _ => Err(ScalarError::invalid_literal(self.name(), literal)),
        }
    }

    fn parse_value(&self, value: &ScalarValue) -> Result<Value, ScalarError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        match self.from_runtime(value) {
            Some(float) => Ok(Value::Float(FloatValue::from(float))),
            None => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn serialize(&self, value: &ScalarValue) -> Result<JsonValue, ScalarError> {
        if value.is_null() {
            return Ok(JsonValue::Null);
        }
        self.from_runtime(value)
            .and_then(json_float)
            .ok_or_else(|| ScalarError::invalid_value(self.name(), value))
    }

    fn try_deserialize(&self, json: &JsonValue) -> Option<ScalarValue> {
        match json {
            JsonValue::Null => Some(ScalarValue::Null),
            JsonValue::Number(number) => self.check(number.as_f64()?).map(ScalarValue::Float),
            _ => None,
        }
    }
}

impl Default for DecimalType {
    fn default() -> Self {
        Self {
            info: ScalarInfo::new(
                name!(Decimal),
                "The `Decimal` scalar type represents a decimal floating-point number.",
            ),
        }
    }
}

impl_rename!(DecimalType);

/// Parses decimal text, with or without an exponent
fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.contains(['e', 'E']) {
        Decimal::from_scientific(text).ok()
    } else {
        Decimal::from_str(text).ok()
    }
}

impl ScalarCoercion for DecimalType {
    scalar_info!();

    fn runtime_type(&self) -> RuntimeType {
        RuntimeType::Decimal
    }

    fn serialization_type(&self) -> SerializationType {
        SerializationType::Decimal
    }

    fn is_instance_of(&self, literal: &Value) -> bool {
        match literal {
            Value::Null => true,
            Value::Int(value) => parse_decimal(value.as_str()).is_some(),
            Value::Float(value) => parse_decimal(value.as_str()).is_some(),
            _ => false,
        }
    }

    fn is_instance_of_value(&self, value: &ScalarValue) -> bool {
        matches!(value, ScalarValue::Null | ScalarValue::Decimal(_))
    }

    fn parse_literal(&self, literal: &Value) -> Result<ScalarValue, ScalarError> {
        let text = match literal {
            Value::Null => return Ok(ScalarValue::Null),
            Value::Int(value) => value.as_str(),
            Value::Float(value) => value.as_str(),
            _ => return Err(ScalarError::invalid_literal(self.name(), literal)),
        };
        parse_decimal(text)
            .map(ScalarValue::Decimal)
            .ok_or_else(|| ScalarError::invalid_literal(self.name(), literal))
    }

    fn parse_value(&self, value: &ScalarValue) -> Result<Value, ScalarError> {
        match value {
            ScalarValue::Null => Ok(Value::Null),
            ScalarValue::Decimal(decimal) => {
                let text = decimal.to_string();
                if decimal.scale() == 0 {
                    Ok(Value::Int(IntValue::new_parsed(&text)))
                } else {
                    Ok(Value::Float(FloatValue::new_parsed(&text)))
                }
            }
            _ => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn serialize(&self, value: &ScalarValue) -> Result<JsonValue, ScalarError> {
        match value {
            ScalarValue::Null => Ok(JsonValue::Null),
            // Exact digits, not an `f64` approximation
            ScalarValue::Decimal(decimal) => Number::from_str(&decimal.to_string())
                .map(JsonValue::Number)
                .map_err(|_| ScalarError::invalid_value(self.name(), value)),
            _ => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn try_deserialize(&self, json: &JsonValue) -> Option<ScalarValue> {
        match json {
            JsonValue::Null => Some(ScalarValue::Null),
            // The number keeps its source text, so no digits are lost here
            JsonValue::Number(number) => parse_decimal(&number.to_string()).map(ScalarValue::Decimal),
            _ => None,
        }
    }
}
