use crate::ast::LiteralKind;
use crate::ast::Value;
use crate::value::ScalarValue;
use crate::value::ValueKind;
use crate::Name;

/// A coercion failure, raised synchronously by a scalar.
///
/// Errors carry the scalar name and the offending literal or value type.
/// They are never retried or replaced with a default.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScalarError {
    #[error("{scalar} cannot parse the given literal of type `{literal_kind:?}`")]
    InvalidLiteral {
        scalar: Name,
        literal_kind: LiteralKind,
    },

    #[error("{scalar} cannot parse the given value of type `{value_type}`")]
    InvalidValue { scalar: Name, value_type: String },

    #[error("{scalar} cannot deserialize the given value of kind `{found}`")]
    Deserialize { scalar: Name, found: ValueKind },

    #[error("{scalar} serialization failed: cycle detected")]
    CycleDetected { scalar: Name },

    #[error("{scalar} does not support {operation}")]
    NotSupported {
        scalar: Name,
        operation: &'static str,
    },
}

impl ScalarError {
    pub(crate) fn invalid_literal(scalar: &Name, literal: &Value) -> Self {
        ScalarError::InvalidLiteral {
            scalar: scalar.clone(),
            literal_kind: literal.kind(),
        }
    }

    pub(crate) fn invalid_value(scalar: &Name, value: &ScalarValue) -> Self {
        ScalarError::InvalidValue {
            scalar: scalar.clone(),
            value_type: value.type_name().to_owned(),
        }
    }

    pub(crate) fn not_supported(scalar: &Name, operation: &'static str) -> Self {
        ScalarError::NotSupported {
            scalar: scalar.clone(),
            operation,
        }
    }

    /// A machine-readable code, suitable for `extensions.code` in a GraphQL error
    pub fn code(&self) -> &'static str {
        match self {
            ScalarError::InvalidLiteral { .. } => "SCALAR_INVALID_LITERAL",
            ScalarError::InvalidValue { .. } => "SCALAR_INVALID_VALUE",
            ScalarError::Deserialize { .. } => "SCALAR_CANNOT_DESERIALIZE",
            ScalarError::CycleDetected { .. } => "SCALAR_CYCLE_DETECTED",
            ScalarError::NotSupported { .. } => "SCALAR_NOT_SUPPORTED",
        }
    }

    /// Name of the scalar that raised the error
    pub fn scalar(&self) -> &Name {
        match self {
            ScalarError::InvalidLiteral { scalar, .. }
            | ScalarError::InvalidValue { scalar, .. }
            | ScalarError::Deserialize { scalar, .. }
            | ScalarError::CycleDetected { scalar }
            | ScalarError::NotSupported { scalar, .. } => scalar,
        }
    }
}

/// Failure to build a [`Scalars`][crate::Scalars] registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("the scalar `{name}` is registered more than once")]
    DuplicateScalar { name: Name },
}
