//! Literal syntax nodes for GraphQL values and type references.
//!
//! A [`Value`] represents a value as written in GraphQL source text,
//! before any [scalar coercion][crate::ScalarCoercion] takes place.
//! Numbers keep their source text so that no precision is lost
//! until a scalar decides how to interpret them.
//!
//! ## Parsing
//!
//! [`Value::parse`] and [`Type::parse`] accept const values and type references
//! in [GraphQL syntax](https://spec.graphql.org/October2021/#sec-Input-Values).
//!
//! ## Serialization
//!
//! [`Value`] and [`Type`] implement [`Display`][std::fmt::Display]
//! by serializing back to GraphQL syntax.

use crate::value::FileHandle;
use crate::Name;
use serde::Deserialize;

mod parse;
mod serialize;

pub use self::parse::LiteralParser;
pub use self::parse::SyntaxError;
pub use self::parse::DEFAULT_RECURSION_LIMIT;

/// A const GraphQL input value literal.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(IntValue),
    Float(FloatValue),
    String(
        /// The value after escape sequences are resolved
        String,
    ),
    Enum(Name),
    List(Vec<Value>),
    Object(Vec<(Name, Value)>),
    /// A file bound to the request out of band, e.g. by a multipart upload.
    File(FileHandle),
}

/// Source text of an integer literal, such as `42` or `-7`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct IntValue(String);

/// Source text of a float literal, such as `1.5` or `6.02E23`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FloatValue(String);

/// Names the tag of a [`Value`], for error messages.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LiteralKind {
    Null,
    Boolean,
    Int,
    Float,
    String,
    Enum,
    List,
    Object,
    File,
}

/// A GraphQL type reference, with optional list and non-null wrappers.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Type {
    Named(Name),
    NonNullNamed(Name),
    List(Box<Type>),
    NonNullList(Box<Type>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn kind(&self) -> LiteralKind {
        match self {
            Value::Null => LiteralKind::Null,
            Value::Boolean(_) => LiteralKind::Boolean,
            Value::Int(_) => LiteralKind::Int,
            Value::Float(_) => LiteralKind::Float,
            Value::String(_) => LiteralKind::String,
            Value::Enum(_) => LiteralKind::Enum,
            Value::List(_) => LiteralKind::List,
            Value::Object(_) => LiteralKind::Object,
            Value::File(_) => LiteralKind::File,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(value) = self {
            Some(value)
        } else {
            None
        }
    }

    pub fn as_enum(&self) -> Option<&Name> {
        if let Value::Enum(name) = self {
            Some(name)
        } else {
            None
        }
    }

    /// Converts an `Int` or `Float` literal to `f64`, if it is finite.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Float(value) => value.try_to_f64().ok(),
            Value::Int(value) => value.try_to_f64().ok(),
            _ => None,
        }
    }

    pub fn to_i32(&self) -> Option<i32> {
        if let Value::Int(value) = self {
            value.try_to_i32().ok()
        } else {
            None
        }
    }

    pub fn to_bool(&self) -> Option<bool> {
        if let Value::Boolean(value) = *self {
            Some(value)
        } else {
            None
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        if let Value::List(value) = self {
            Some(value)
        } else {
            None
        }
    }

    pub fn as_object(&self) -> Option<&[(Name, Value)]> {
        if let Value::Object(value) = self {
            Some(value)
        } else {
            None
        }
    }
}

impl IntValue {
    /// Constructs from a string matching the [`IntValue`
    /// grammar specification](https://spec.graphql.org/October2021/#IntValue)
    ///
    /// To convert an `i32`, use `from` or `into` instead.
    pub fn new_parsed(text: &str) -> Self {
        debug_assert!(IntValue::valid_syntax(text), "{text:?}");
        Self(text.into())
    }

    fn valid_syntax(text: &str) -> bool {
        match text.strip_prefix('-').unwrap_or(text).as_bytes() {
            [b'0'..=b'9'] => true,
            [b'1'..=b'9', rest @ ..] => rest.iter().all(|b| b.is_ascii_digit()),
            _ => false,
        }
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts to `i32`, returning an error on overflow
    pub fn try_to_i32(&self) -> Result<i32, std::num::ParseIntError> {
        self.0.parse()
    }

    /// Converts to `i64`, returning an error on overflow
    pub fn try_to_i64(&self) -> Result<i64, std::num::ParseIntError> {
        self.0.parse()
    }

    /// Converts to a finite `f64`, returning an error on overflow to infinity
    pub fn try_to_f64(&self) -> Result<f64, FloatOverflowError> {
        try_to_f64(&self.0)
    }
}

impl FloatValue {
    /// Constructs from a string matching the [`FloatValue`
    /// grammar specification](https://spec.graphql.org/October2021/#FloatValue)
    ///
    /// To convert an `f64`, use `from` or `into` instead.
    pub fn new_parsed(text: &str) -> Self {
        Self(text.into())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts to a finite `f64`, returning an error on overflow to infinity
    pub fn try_to_f64(&self) -> Result<f64, FloatOverflowError> {
        try_to_f64(&self.0)
    }
}

/// `IntValue` or `FloatValue` magnitude too large to be converted to `f64`.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("value magnitude too large to be converted to a 64-bit float")]
#[non_exhaustive]
pub struct FloatOverflowError {}

fn try_to_f64(text: &str) -> Result<f64, FloatOverflowError> {
    let Ok(float) = text.parse::<f64>() else {
        return Err(FloatOverflowError {});
    };
    if float.is_finite() {
        Ok(float)
    } else {
        Err(FloatOverflowError {})
    }
}

impl From<i32> for IntValue {
    fn from(value: i32) -> Self {
        let text = value.to_string();
        debug_assert!(IntValue::valid_syntax(&text), "{text:?}");
        Self(text)
    }
}

impl From<i64> for IntValue {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<f64> for FloatValue {
    /// Formats in scientific notation (`1.5E0`), which always matches the
    /// `FloatValue` grammar and converts back to the same `f64`.
    fn from(value: f64) -> Self {
        Self(format!("{value:E}"))
    }
}

impl From<()> for Value {
    fn from(_value: ()) -> Self {
        Value::Null
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl Type {
    /// Returns this type made non-null, if it isn’t already.
    pub fn non_null(self) -> Self {
        match self {
            Type::Named(name) => Type::NonNullNamed(name),
            Type::List(inner) => Type::NonNullList(inner),
            Type::NonNullNamed(_) => self,
            Type::NonNullList(_) => self,
        }
    }

    /// Returns this type made nullable, if it isn’t already.
    pub fn nullable(self) -> Self {
        match self {
            Type::NonNullNamed(name) => Type::Named(name),
            Type::NonNullList(inner) => Type::List(inner),
            Type::Named(_) => self,
            Type::List(_) => self,
        }
    }

    /// Returns a list type whose items are this type.
    pub fn list(self) -> Self {
        Type::List(Box::new(self))
    }

    /// Returns the inner named type, after unwrapping any non-null or list markers.
    pub fn inner_named_type(&self) -> &Name {
        match self {
            Type::Named(name) | Type::NonNullNamed(name) => name,
            Type::List(inner) | Type::NonNullList(inner) => inner.inner_named_type(),
        }
    }

    /// If this is a list type, returns the type of its items.
    pub fn item_type(&self) -> Option<&Type> {
        match self {
            Type::List(inner) | Type::NonNullList(inner) => Some(inner),
            Type::Named(_) | Type::NonNullNamed(_) => None,
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNullNamed(_) | Type::NonNullList(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Type::List(_) | Type::NonNullList(_))
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Type::Named(_) | Type::NonNullNamed(_))
    }

    /// Number of list wrappers around the inner named type.
    pub fn list_depth(&self) -> usize {
        match self {
            Type::Named(_) | Type::NonNullNamed(_) => 0,
            Type::List(inner) | Type::NonNullList(inner) => 1 + inner.list_depth(),
        }
    }
}

impl serde::Serialize for Type {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Type {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Type::parse(&text).map_err(serde::de::Error::custom)
    }
}
