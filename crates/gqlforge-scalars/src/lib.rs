//! GraphQL scalar coercion.
//!
//! Scalars convert values between three forms:
//! [literals][ast::Value] found in documents, [runtime values][ScalarValue]
//! seen by resolvers, and [wire values][JsonValue] found in requests and responses.
//!
//! ```
//! use gqlforge_scalars::ast::Value;
//! use gqlforge_scalars::ScalarCoercion;
//! use gqlforge_scalars::ScalarValue;
//! use gqlforge_scalars::Scalars;
//!
//! let scalars = Scalars::default();
//! let float = scalars.get("Float").unwrap();
//! let value = float.parse_literal(&Value::parse("42").unwrap()).unwrap();
//! assert_eq!(value, ScalarValue::Float(42.0));
//! ```

pub mod ast;
mod error;
mod name;
mod registry;
pub mod request;
pub mod scalar;
pub mod value;

pub use self::error::RegistryError;
pub use self::error::ScalarError;
pub use self::name::InvalidNameError;
pub use self::name::Name;
pub use self::registry::Scalars;
pub use self::registry::ScalarsBuilder;
pub use self::scalar::ScalarCoercion;
pub use self::scalar::ScalarType;
pub use self::value::AnyValue;
pub use self::value::FileHandle;
pub use self::value::RuntimeType;
pub use self::value::ScalarValue;
pub use self::value::SerializationType;
pub use self::value::ValueKind;
/// Re-export of the version of the `serde_json_bytes` crate used for [`JsonValue`] and [`JsonMap`]
pub use serde_json_bytes;

/// A JSON-compatible dynamically-typed value.
pub type JsonValue = serde_json_bytes::Value;

/// A JSON-compatible object/map with string keys and dynamically-typed values.
pub type JsonMap = serde_json_bytes::Map<serde_json_bytes::ByteString, JsonValue>;
