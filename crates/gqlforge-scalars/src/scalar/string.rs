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
use crate::Name;

/// A scalar whose runtime value is a [`ScalarValue::String`].
#[derive(Clone, Debug)]
pub struct StringType {
    info: ScalarInfo,
    kind: StringKind,
}

/// Which strings a [`StringType`] accepts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StringKind {
    /// Any UTF-8 text
    String,
    /// An opaque identifier. An `Int` literal or JSON integer is also accepted.
    Id,
    /// A GraphQL name: `[_A-Za-z][_0-9A-Za-z]*`
    Name,
    /// Dot-separated GraphQL names, such as `a.b.c`
    MultiplierPath,
}

impl StringType {
    pub fn new(kind: StringKind) -> Self {
        let info = match kind {
            StringKind::String => ScalarInfo::new(
                name!(String),
                "The `String` scalar type represents textual data, represented as UTF-8 character sequences.",
            ),
            StringKind::Id => ScalarInfo::new(
                name!(ID),
                "The `ID` scalar type represents a unique identifier.",
            ),
            StringKind::Name => ScalarInfo::new(
                name!(Name),
                "The `Name` scalar type represents a valid GraphQL name.",
            ),
            StringKind::MultiplierPath => ScalarInfo::new(
                name!(MultiplierPath),
                "The `MultiplierPath` scalar type represents a dot-separated path of field names.",
            ),
        };
        Self { info, kind }
    }

    pub fn kind(&self) -> StringKind {
        self.kind
    }

    fn accepts(&self, text: &str) -> bool {
        match self.kind {
            StringKind::String | StringKind::Id => true,
            StringKind::Name => Name::valid_syntax(text),
            StringKind::MultiplierPath => text.split('.').all(Name::valid_syntax),
        }
    }

    fn from_runtime<'a>(&self, value: &'a ScalarValue) -> Option<&'a str> {
        match value {
            ScalarValue::String(text) if self.accepts(text) => Some(text),
            _ => None,
        }
    }
}

impl_rename!(StringType);

impl ScalarCoercion for StringType {
    scalar_info!();

    fn runtime_type(&self) -> RuntimeType {
        RuntimeType::String
    }

    fn serialization_type(&self) -> SerializationType {
        SerializationType::String
    }

    fn is_instance_of(&self, literal: &Value) -> bool {
        match literal {
            Value::Null => true,
            Value::String(text) => self.accepts(text),
            Value::Int(_) => self.kind == StringKind::Id,
            _ => false,
        }
    }

    fn is_instance_of_value(&self, value: &ScalarValue) -> bool {
        value.is_null() || self.from_runtime(value).is_some()
    }

    fn parse_literal(&self, literal: &Value) -> Result<ScalarValue, ScalarError> {
        match literal {
            Value::Null => Ok(ScalarValue::Null),
            Value::String(text) if self.accepts(text) => Ok(ScalarValue::String(text.clone())),
            Value::Int(int) if self.kind == StringKind::Id => {
                Ok(ScalarValue::String(int.as_str().to_owned()))
            }
            _ => Err(ScalarError::invalid_literal(self.name(), literal)),
        }
    }

    fn parse_value(&self, value: &ScalarValue) -> Result<Value, ScalarError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        match self.from_runtime(value) {
            Some(text) => Ok(Value::String(text.to_owned())),
            None => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn serialize(&self, value: &ScalarValue) -> Result<JsonValue, ScalarError> {
        if value.is_null() {
            return Ok(JsonValue::Null);
        }
        match self.from_runtime(value) {
            Some(text) => Ok(json_string(text)),
            None => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn try_deserialize(&self, json: &JsonValue) -> Option<ScalarValue> {
        match json {
            JsonValue::Null => Some(ScalarValue::Null),
            JsonValue::String(text) if self.accepts(text.as_str()) => {
                Some(ScalarValue::String(text.as_str().to_owned()))
            }
            JsonValue::Number(number) if self.kind == StringKind::Id => {
                number.as_i64().map(|int| ScalarValue::String(int.to_string()))
            }
            _ => None,
        }
    }
}
