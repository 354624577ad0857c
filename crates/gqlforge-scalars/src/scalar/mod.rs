//! Scalar type descriptors.
//!
//! Each scalar converts between three representations:
//!
//! * a [literal][crate::ast::Value] as written in a GraphQL document,
//! * a [runtime value][ScalarValue] as seen by resolvers,
//! * a [wire value][JsonValue] as found in variables and responses.
//!
//! The conversions are consistent: for every valid runtime value `v`,
//! `parse_literal(parse_value(v)) == v` and `deserialize(serialize(v)) == v`.
//!
//! Null is always an instance of a scalar.
//! Whether null is allowed is decided by the wrapping [`Type`][crate::ast::Type].

use crate::ast::Value;
use crate::error::ScalarError;
use crate::value::FileHandle;
use crate::value::RuntimeType;
use crate::value::ScalarValue;
use crate::value::SerializationType;
use crate::value::ValueKind;
use crate::JsonValue;
use crate::Name;
use serde_json_bytes::serde_json::Number;
use std::fmt;
use std::sync::Arc;

/// Name and description shared by all built-in scalars.
#[derive(Clone, Debug)]
pub(crate) struct ScalarInfo {
    pub(crate) name: Name,
    pub(crate) description: Option<String>,
}

impl ScalarInfo {
    pub(crate) fn new(name: Name, description: &str) -> Self {
        Self {
            name,
            description: Some(description.to_owned()),
        }
    }
}

/// Implements the accessors of [`ScalarCoercion`] backed by a `ScalarInfo` field
macro_rules! scalar_info {
    () => {
        fn name(&self) -> &$crate::Name {
            &self.info.name
        }

        fn description(&self) -> Option<&str> {
            self.info.description.as_deref()
        }
    };
}

/// Builder-style methods to rename a built-in scalar
macro_rules! impl_rename {
    ($ty: ty) => {
        impl $ty {
            /// Registers this scalar under another name
            pub fn with_name(mut self, name: $crate::Name) -> Self {
                self.info.name = name;
                self
            }

            pub fn with_description(mut self, description: impl Into<String>) -> Self {
                self.info.description = Some(description.into());
                self
            }
        }
    };
}

pub(crate) use impl_rename;
pub(crate) use scalar_info;

mod any;
mod boolean;
mod date;
mod float;
mod identifiers;
mod int;
mod long;
mod string;
mod time_span;
mod upload;

pub use self::any::AnyType;
pub use self::boolean::BooleanType;
pub use self::date::DateTimeType;
pub use self::date::DateType;
pub use self::float::DecimalType;
pub use self::float::FloatType;
pub use self::identifiers::UrlType;
pub use self::identifiers::UuidType;
pub use self::int::IntRepr;
pub use self::int::IntType;
pub use self::long::LongType;
pub use self::string::StringKind;
pub use self::string::StringType;
pub use self::time_span::TimeSpanFormat;
pub use self::time_span::TimeSpanType;
pub use self::upload::UploadType;

/// The coercion contract every scalar implements.
///
/// Custom scalars implement this trait and are registered with
/// [`ScalarsBuilder::register`][crate::ScalarsBuilder::register].
pub trait ScalarCoercion: fmt::Debug {
    fn name(&self) -> &Name;

    fn description(&self) -> Option<&str> {
        None
    }

    /// The [`ScalarValue`] variant this scalar produces
    fn runtime_type(&self) -> RuntimeType;

    /// The primitive used on the wire
    fn serialization_type(&self) -> SerializationType;

    /// Whether `literal` can be parsed by [`parse_literal`][Self::parse_literal]
    fn is_instance_of(&self, literal: &Value) -> bool;

    /// Whether `value` can be handled by [`parse_value`][Self::parse_value]
    /// and [`serialize`][Self::serialize]
    fn is_instance_of_value(&self, value: &ScalarValue) -> bool;

    fn parse_literal(&self, literal: &Value) -> Result<ScalarValue, ScalarError>;

    fn parse_value(&self, value: &ScalarValue) -> Result<Value, ScalarError>;

    fn serialize(&self, value: &ScalarValue) -> Result<JsonValue, ScalarError>;

    fn try_serialize(&self, value: &ScalarValue) -> Option<JsonValue> {
        self.serialize(value).ok()
    }

    /// Converts a wire value back to a runtime value. Returns `None` on shape mismatch.
    fn try_deserialize(&self, json: &JsonValue) -> Option<ScalarValue>;

    fn deserialize(&self, json: &JsonValue) -> Result<ScalarValue, ScalarError> {
        self.try_deserialize(json)
            .ok_or_else(|| ScalarError::Deserialize {
                scalar: self.name().clone(),
                found: ValueKind::of_json(json),
            })
    }

    /// Binds a file uploaded out of band. Only `Upload` accepts files.
    fn deserialize_file(&self, file: &FileHandle) -> Option<ScalarValue> {
        let _ = file;
        None
    }
}

/// A registered scalar: one of the built-in kinds, or a custom implementation.
#[derive(Clone, Debug)]
pub enum ScalarType {
    Int(IntType),
    Long(LongType),
    Float(FloatType),
    Decimal(DecimalType),
    Boolean(BooleanType),
    String(StringType),
    Date(DateType),
    DateTime(DateTimeType),
    TimeSpan(TimeSpanType),
    Url(UrlType),
    Uuid(UuidType),
    Any(AnyType),
    Upload(UploadType),
    Custom(Arc<dyn ScalarCoercion + Send + Sync>),
}

macro_rules! delegate {
    ($self: ident, $scalar: ident => $body: expr) => {
        match $self {
            ScalarType::Int($scalar) => $body,
            ScalarType::Long($scalar) => $body,
            ScalarType::Float($scalar) => $body,
            ScalarType::Decimal($scalar) => $body,
            ScalarType::Boolean($scalar) => $body,
            ScalarType::String($scalar) => $body,
            ScalarType::Date($scalar) => $body,
            ScalarType::DateTime($scalar) => $body,
            ScalarType::TimeSpan($scalar) => $body,
            ScalarType::Url($scalar) => $body,
            ScalarType::Uuid($scalar) => $body,
            ScalarType::Any($scalar) => $body,
            ScalarType::Upload($scalar) => $body,
            ScalarType::Custom($scalar) => $body,
        }
    };
}

impl ScalarType {
    /// The built-in scalars, in registration order
    pub fn builtins() -> Vec<ScalarType> {
        vec![
            ScalarType::Int(IntType::int()),
            ScalarType::Float(FloatType::default()),
            ScalarType::String(StringType::new(StringKind::String)),
            ScalarType::Boolean(BooleanType::default()),
            ScalarType::String(StringType::new(StringKind::Id)),
            ScalarType::Decimal(DecimalType::default()),
            ScalarType::Long(LongType::default()),
            ScalarType::Int(IntType::byte()),
            ScalarType::Int(IntType::short()),
            ScalarType::Date(DateType::default()),
            ScalarType::DateTime(DateTimeType::default()),
            ScalarType::TimeSpan(TimeSpanType::default()),
            ScalarType::Url(UrlType::default()),
            ScalarType::Uuid(UuidType::default()),
            ScalarType::String(StringType::new(StringKind::Name)),
            ScalarType::String(StringType::new(StringKind::MultiplierPath)),
            ScalarType::Any(AnyType::default()),
            ScalarType::Upload(UploadType::default()),
            ScalarType::Int(IntType::pagination_amount()),
        ]
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ScalarType::Custom(_))
    }
}

impl ScalarCoercion for ScalarType {
    fn name(&self) -> &Name {
        delegate!(self, scalar => scalar.name())
    }

    fn description(&self) -> Option<&str> {
        delegate!(self, scalar => scalar.description())
    }

    fn runtime_type(&self) -> RuntimeType {
        delegate!(self, scalar => scalar.runtime_type())
    }

    fn serialization_type(&self) -> SerializationType {
        delegate!(self, scalar => scalar.serialization_type())
    }

    fn is_instance_of(&self, literal: &Value) -> bool {
        delegate!(self, scalar => scalar.is_instance_of(literal))
    }

    fn is_instance_of_value(&self, value: &ScalarValue) -> bool {
        delegate!(self, scalar => scalar.is_instance_of_value(value))
    }

    fn parse_literal(&self, literal: &Value) -> Result<ScalarValue, ScalarError> {
        delegate!(self, scalar => scalar.parse_literal(literal))
    }

    fn parse_value(&self, value: &ScalarValue) -> Result<Value, ScalarError> {
        delegate!(self, scalar => scalar.parse_value(value))
    }

    fn serialize(&self, value: &ScalarValue) -> Result<JsonValue, ScalarError> {
        delegate!(self, scalar => scalar.serialize(value))
    }

    fn try_serialize(&self, value: &ScalarValue) -> Option<JsonValue> {
        delegate!(self, scalar => scalar.try_serialize(value))
    }

    fn try_deserialize(&self, json: &JsonValue) -> Option<ScalarValue> {
        delegate!(self, scalar => scalar.try_deserialize(json))
    }

    fn deserialize(&self, json: &JsonValue) -> Result<ScalarValue, ScalarError> {
        delegate!(self, scalar => scalar.deserialize(json))
    }

    fn deserialize_file(&self, file: &FileHandle) -> Option<ScalarValue> {
        delegate!(self, scalar => scalar.deserialize_file(file))
    }
}

pub(crate) fn json_string(value: impl Into<String>) -> JsonValue {
    JsonValue::String(value.into().into())
}

pub(crate) fn json_int(value: i64) -> JsonValue {
    JsonValue::Number(Number::from(value))
}

/// Returns `None` for NaN and infinities, which JSON cannot represent
pub(crate) fn json_float(value: f64) -> Option<JsonValue> {
    Number::from_f64(value).map(JsonValue::Number)
}
