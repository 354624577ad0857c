use super::impl_rename;
use super::json_int;
use super::scalar_info;
use super::ScalarCoercion;
use super::ScalarInfo;
use crate::ast::IntValue;
use crate::ast::Value;
use crate::error::ScalarError;
use crate::name;
use crate::value::RuntimeType;
use crate::value::ScalarValue;
use crate::value::SerializationType;
use crate::JsonValue;

/// An integer scalar bounded by `min..=max`.
///
/// Covers `Int`, `Byte`, `Short` and `PaginationAmount`.
/// Only base-10 `Int` literals are accepted; out-of-range values are rejected
/// by every operation.
#[derive(Clone, Debug)]
pub struct IntType {
    info: ScalarInfo,
    min: i64,
    max: i64,
    repr: IntRepr,
}

/// Which [`ScalarValue`] variant an [`IntType`] produces.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IntRepr {
    Byte,
    Short,
    Int,
}

impl IntType {
    pub fn int() -> Self {
        Self {
            info: ScalarInfo::new(
                name!(Int),
                "The `Int` scalar type represents non-fractional signed whole numeric values.",
            ),
            min: i32::MIN.into(),
            max: i32::MAX.into(),
            repr: IntRepr::Int,
        }
    }

    pub fn byte() -> Self {
        Self {
            info: ScalarInfo::new(name!(Byte), "The `Byte` scalar type represents an unsigned 8-bit integer."),
            min: u8::MIN.into(),
            max: u8::MAX.into(),
            repr: IntRepr::Byte,
        }
    }

    pub fn short() -> Self {
        Self {
            info: ScalarInfo::new(name!(Short), "The `Short` scalar type represents a signed 16-bit integer."),
            min: i16::MIN.into(),
            max: i16::MAX.into(),
            repr: IntRepr::Short,
        }
    }

    /// Page sizes for paginated fields: a non-negative `Int`
    pub fn pagination_amount() -> Self {
        Self::bounded(name!(PaginationAmount), 0, i32::MAX)
    }

    /// A custom `Int` scalar that only accepts `min..=max`
    pub fn bounded(name: crate::Name, min: i32, max: i32) -> Self {
        Self {
            info: ScalarInfo {
                name,
                description: None,
            },
            min: min.into(),
            max: max.into(),
            repr: IntRepr::Int,
        }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn repr(&self) -> IntRepr {
        self.repr
    }

    fn in_range(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn to_runtime(&self, value: i64) -> Option<ScalarValue> {
        if !self.in_range(value) {
            return None;
        }
        Some(match self.repr {
            IntRepr::Byte => ScalarValue::Byte(u8::try_from(value).ok()?),
            IntRepr::Short => ScalarValue::Short(i16::try_from(value).ok()?),
            IntRepr::Int => ScalarValue::Int(i32::try_from(value).ok()?),
        })
    }

    fn from_runtime(&self, value: &ScalarValue) -> Option<i64> {
        let int = match (self.repr, value) {
            (IntRepr::Byte, ScalarValue::Byte(value)) => i64::from(*value),
            (IntRepr::Short, ScalarValue::Short(value)) => i64::from(*value),
            (IntRepr::Int, ScalarValue::Int(value)) => i64::from(*value),
            _ => return None,
        };
        self.in_range(int).then_some(int)
    }
}

impl_rename!(IntType);

impl ScalarCoercion for IntType {
    scalar_info!();

    fn runtime_type(&self) -> RuntimeType {
        match self.repr {
            IntRepr::Byte => RuntimeType::Byte,
            IntRepr::Short => RuntimeType::Short,
            IntRepr::Int => RuntimeType::Int,
        }
    }

    fn serialization_type(&self) -> SerializationType {
        match self.repr {
            IntRepr::Byte => SerializationType::Byte,
            IntRepr::Short => SerializationType::Short,
            IntRepr::Int => SerializationType::Int,
        }
    }

    fn is_instance_of(&self, literal: &Value) -> bool {
        match literal {
            Value::Null => true,
            Value::Int(value) => value
                .try_to_i64()
                .is_ok_and(|value| self.in_range(value)),
            _ => false,
        }
    }

    fn is_instance_of_value(&self, value: &ScalarValue) -> bool {
        value.is_null() || self.from_runtime(value).is_some()
    }

    fn parse_literal(&self, literal: &Value) -> Result<ScalarValue, ScalarError> {
        match literal {
            Value::Null => Ok(ScalarValue::Null),
            Value::Int(value) => value
                .try_to_i64()
                .ok()
                .and_then(|value| self.to_runtime(value))
                .ok_or_else(|| ScalarError::invalid_literal(self.name(), literal)),
            _ => Err(ScalarError::invalid_literal(self.name(), literal)),
        }
    }

    fn parse_value(&self, value: &ScalarValue) -> Result<Value, ScalarError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        match self.from_runtime(value) {
            Some(int) => Ok(Value::Int(IntValue::from(int))),
            None => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn serialize(&self, value: &ScalarValue) -> Result<JsonValue, ScalarError> {
        if value.is_null() {
            return Ok(JsonValue::Null);
        }
        match self.from_runtime(value) {
            Some(int) => Ok(json_int(int)),
            None => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn try_deserialize(&self, json: &JsonValue) -> Option<ScalarValue> {
        match json {
            JsonValue::Null => Some(ScalarValue::Null),
            JsonValue::Number(number) => self.to_runtime(number.as_i64()?),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_literals() {
        let byte = IntType::byte();
        assert!(byte.is_instance_of(&Value::from(255)));
        assert!(!byte.is_instance_of(&Value::from(256)));
        assert!(!byte.is_instance_of(&Value::from(-1)));
        assert!(byte.parse_literal(&Value::from(256)).is_err());
        assert!(byte.serialize(&ScalarValue::Int(1)).is_err());
    }

    #[test]
    fn pagination_amount_is_non_negative() {
        let amount = IntType::pagination_amount();
        assert_eq!(amount.name(), "PaginationAmount");
        assert_eq!(
            amount.parse_literal(&Value::from(10)),
            Ok(ScalarValue::Int(10))
        );
        assert!(amount.parse_literal(&Value::from(-1)).is_err());
        assert_eq!(amount.try_deserialize(&json_int(-5)), None);
    }
}
