//! Request variables in, result values out.
//!
//! The transport hands over a [`GraphQLRequest`]. Its variables are coerced with
//! [`coerce_variable_values`] before execution, and leaf results are turned back into
//! wire values with [`serialize_value`]. Failures become [`GraphQLError`]s in an
//! [`ExecutionResult`].

use crate::ast::Type;
use crate::ast::Value;
use crate::error::ScalarError;
use crate::scalar::ScalarCoercion;
use crate::value::FileHandle;
use crate::value::ScalarValue;
use crate::JsonMap;
use crate::JsonValue;
use crate::Name;
use crate::Scalars;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

/// A GraphQL request as received from the transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    /// Document text. May be absent when the request refers to a persisted query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,

    #[serde(default, skip_serializing_if = "JsonMap::is_empty")]
    pub variables: JsonMap,

    #[serde(default, skip_serializing_if = "JsonMap::is_empty")]
    pub extensions: JsonMap,
}

impl GraphQLRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    /// Parses a request from its JSON body
    pub fn from_json_str(json: &str) -> Result<Self, serde_json_bytes::serde_json::Error> {
        serde_json_bytes::serde_json::from_str(json)
    }

    /// The document hash of an `extensions.persistedQuery` entry, if any
    pub fn persisted_query_hash(&self) -> Option<&str> {
        self.extensions
            .get("persistedQuery")?
            .as_object()?
            .get("sha256Hash")?
            .as_str()
    }
}

/// A variable declared by an operation, such as `$first: Int = 10`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub name: Name,
    pub ty: Type,
    pub default_value: Option<Value>,
}

impl VariableDefinition {
    pub fn new(name: Name, ty: Type) -> Self {
        Self {
            name,
            ty,
            default_value: None,
        }
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// A coerced input value: a scalar, or a list of coerced values.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercedValue {
    Scalar(ScalarValue),
    List(Vec<CoercedValue>),
}

impl CoercedValue {
    pub fn null() -> Self {
        CoercedValue::Scalar(ScalarValue::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CoercedValue::Scalar(ScalarValue::Null))
    }

    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            CoercedValue::Scalar(value) => Some(value),
            CoercedValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[CoercedValue]> {
        match self {
            CoercedValue::List(items) => Some(items),
            CoercedValue::Scalar(_) => None,
        }
    }
}

impl From<ScalarValue> for CoercedValue {
    fn from(value: ScalarValue) -> Self {
        CoercedValue::Scalar(value)
    }
}

/// A [request error](https://spec.graphql.org/draft/#sec-Errors.Request-Errors):
/// the request must not be executed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("missing value for non-null variable '{name}'")]
    MissingVariable { name: Name },

    #[error("null value for non-null variable '{name}'")]
    NullForNonNull { name: Name },

    #[error("variable '{name}' has type {ty} whose scalar is not registered")]
    UnknownScalar { name: Name, ty: Type },

    #[error("invalid value for variable '{name}': {source}")]
    InvalidValue { name: Name, source: ScalarError },

    #[error("invalid default value for variable '{name}': {source}")]
    InvalidDefault { name: Name, source: ScalarError },
}

impl RequestError {
    /// A machine-readable code, suitable for `extensions.code`
    pub fn code(&self) -> &'static str {
        match self {
            RequestError::MissingVariable { .. } | RequestError::NullForNonNull { .. } => {
                "BAD_USER_INPUT"
            }
            RequestError::UnknownScalar { .. } => "UNKNOWN_SCALAR",
            RequestError::InvalidValue { source, .. }
            | RequestError::InvalidDefault { source, .. } => source.code(),
        }
    }

    pub fn to_graphql_error(&self) -> GraphQLError {
        GraphQLError::new(self.to_string()).with_code(self.code())
    }
}

/// A leaf value that could not be serialized into a response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SerializeError {
    #[error("null value for non-null type {ty}")]
    NullForNonNull { ty: Type },

    #[error("expected a list for type {ty}")]
    ExpectedList { ty: Type },

    #[error("expected a single value for type {ty}")]
    UnexpectedList { ty: Type },

    #[error("type {ty} has no registered scalar")]
    UnknownScalar { ty: Type },

    #[error(transparent)]
    Scalar(#[from] ScalarError),
}

impl SerializeError {
    pub fn code(&self) -> &'static str {
        match self {
            SerializeError::NullForNonNull { .. } => "NON_NULL_VIOLATION",
            SerializeError::ExpectedList { .. } | SerializeError::UnexpectedList { .. } => {
                "UNEXPECTED_SHAPE"
            }
            SerializeError::UnknownScalar { .. } => "UNKNOWN_SCALAR",
            SerializeError::Scalar(error) => error.code(),
        }
    }

    pub fn to_graphql_error(&self) -> GraphQLError {
        GraphQLError::new(self.to_string()).with_code(self.code())
    }
}

/// Coerces the variable values of a request against the operation's variable definitions.
///
/// Provided values are deserialized from their wire form. Missing values use the default
/// value literal when there is one. Files uploaded out of band are bound by
/// [`coerce_variable_values_with_files`].
///
/// This is [CoerceVariableValues()](https://spec.graphql.org/October2021/#CoerceVariableValues())
/// restricted to scalar and list types.
pub fn coerce_variable_values(
    scalars: &Scalars,
    definitions: &[VariableDefinition],
    values: &JsonMap,
) -> Result<IndexMap<Name, CoercedValue>, RequestError> {
    coerce_variable_values_with_files(scalars, definitions, values, &IndexMap::new())
}

/// Like [`coerce_variable_values`], with files keyed by variable name
/// taking precedence over the JSON value.
pub fn coerce_variable_values_with_files(
    scalars: &Scalars,
    definitions: &[VariableDefinition],
    values: &JsonMap,
    files: &IndexMap<Name, FileHandle>,
) -> Result<IndexMap<Name, CoercedValue>, RequestError> {
    let mut coerced_values = IndexMap::new();
    for definition in definitions {
        let name = &definition.name;
        if let Some(file) = files.get(name) {
            let value = coerce_file(scalars, name, &definition.ty, file)?;
            coerced_values.insert(name.clone(), value);
        } else if let Some(value) = values.get(name.as_str()) {
            let value = coerce_variable_value(scalars, name, &definition.ty, value)?;
            coerced_values.insert(name.clone(), value);
        } else if let Some(default) = &definition.default_value {
            let value = coerce_default_value(scalars, name, &definition.ty, default)?;
            coerced_values.insert(name.clone(), value);
        } else if definition.ty.is_non_null() {
            return Err(RequestError::MissingVariable { name: name.clone() });
        } else {
            // Absent nullable variables stay absent: this differs from an explicit null
        }
    }
    tracing::trace!(variables = coerced_values.len(), "coerced variable values");
    Ok(coerced_values)
}

fn scalar_for<'a>(
    scalars: &'a Scalars,
    name: &Name,
    ty: &Type,
) -> Result<&'a crate::ScalarType, RequestError> {
    scalars
        .try_get_scalar(ty)
        .ok_or_else(|| RequestError::UnknownScalar {
            name: name.clone(),
            ty: ty.clone(),
        })
}

fn coerce_variable_value(
    scalars: &Scalars,
    name: &Name,
    ty: &Type,
    value: &JsonValue,
) -> Result<CoercedValue, RequestError> {
    if value.is_null() {
        if ty.is_non_null() {
            return Err(RequestError::NullForNonNull { name: name.clone() });
        }
        return Ok(CoercedValue::null());
    }
    if let Some(item_ty) = ty.item_type() {
        // https://spec.graphql.org/October2021/#sec-List.Input-Coercion
        return value
            .as_array()
            .map(Vec::as_slice)
            // If not an array, treat the value as an array of size one:
            .unwrap_or(std::slice::from_ref(value))
            .iter()
            .map(|item| coerce_variable_value(scalars, name, item_ty, item))
            .collect::<Result<Vec<_>, _>>()
            .map(CoercedValue::List);
    }
    let scalar = scalar_for(scalars, name, ty)?;
    scalar
        .deserialize(value)
        .map(CoercedValue::Scalar)
        .map_err(|source| RequestError::InvalidValue {
            name: name.clone(),
            source,
        })
}

fn coerce_default_value(
    scalars: &Scalars,
    name: &Name,
    ty: &Type,
    value: &Value,
) -> Result<CoercedValue, RequestError> {
    if value.is_null() {
        if ty.is_non_null() {
            return Err(RequestError::NullForNonNull { name: name.clone() });
        }
        return Ok(CoercedValue::null());
    }
    if let Some(item_ty) = ty.item_type() {
        return value
            .as_list()
            .unwrap_or(std::slice::from_ref(value))
            .iter()
            .map(|item| coerce_default_value(scalars, name, item_ty, item))
            .collect::<Result<Vec<_>, _>>()
            .map(CoercedValue::List);
    }
    let scalar = scalar_for(scalars, name, ty)?;
    scalar
        .parse_literal(value)
        .map(CoercedValue::Scalar)
        .map_err(|source| RequestError::InvalidDefault {
            name: name.clone(),
            source,
        })
}

fn coerce_file(
    scalars: &Scalars,
    name: &Name,
    ty: &Type,
    file: &FileHandle,
) -> Result<CoercedValue, RequestError> {
    let scalar = scalar_for(scalars, name, ty)?;
    let value = scalar
        .deserialize_file(file)
        .ok_or_else(|| RequestError::InvalidValue {
            name: name.clone(),
            source: ScalarError::Deserialize {
                scalar: scalar.name().clone(),
                found: crate::ValueKind::Unknown,
            },
        })?;
    // A single file may be given for a list of files
    Ok(wrap_in_lists(ty, CoercedValue::Scalar(value)))
}

fn wrap_in_lists(ty: &Type, value: CoercedValue) -> CoercedValue {
    match ty.item_type() {
        Some(item_ty) => CoercedValue::List(vec![wrap_in_lists(item_ty, value)]),
        None => value,
    }
}

/// Serializes a leaf result value of type `ty` to its wire form,
/// enforcing non-null wrappers at every list level.
pub fn serialize_value(
    scalars: &Scalars,
    ty: &Type,
    value: &CoercedValue,
) -> Result<JsonValue, SerializeError> {
    if value.is_null() {
        if ty.is_non_null() {
            return Err(SerializeError::NullForNonNull { ty: ty.clone() });
        }
        return Ok(JsonValue::Null);
    }
    match (ty.item_type(), value) {
        (Some(item_ty), CoercedValue::List(items)) => items
            .iter()
            .map(|item| serialize_value(scalars, item_ty, item))
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array),
        (Some(_), CoercedValue::Scalar(_)) => Err(SerializeError::ExpectedList { ty: ty.clone() }),
        (None, CoercedValue::List(_)) => Err(SerializeError::UnexpectedList { ty: ty.clone() }),
        (None, CoercedValue::Scalar(scalar_value)) => {
            let scalar = scalars
                .try_get_scalar(ty)
                .ok_or_else(|| SerializeError::UnknownScalar { ty: ty.clone() })?;
            Ok(scalar.serialize(scalar_value)?)
        }
    }
}

/// The outcome of executing a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    // <https://spec.graphql.org/October2021/#note-6f005> suggests serializing this first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub errors: Vec<GraphQLError>,

    #[serde(default)]
    pub data: Option<JsonMap>,
}

impl ExecutionResult {
    pub fn from_data(data: JsonMap) -> Self {
        Self {
            errors: Vec::new(),
            data: Some(data),
        }
    }

    /// A response for a request error: no `data` at all
    pub fn from_request_error(error: &RequestError) -> Self {
        Self {
            errors: vec![error.to_graphql_error()],
            data: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A serializable [error](https://spec.graphql.org/October2021/#sec-Errors.Error-result-format),
/// as found in a GraphQL response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,

    /// If non-empty, the error is a field error at this path in [`ExecutionResult::data`]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub path: Vec<PathSegment>,

    /// Reserved for any additional information
    #[serde(skip_serializing_if = "JsonMap::is_empty")]
    #[serde(default)]
    pub extensions: JsonMap,
}

/// An element of [`GraphQLError::path`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    ListIndex(usize),
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Vec::new(),
            extensions: JsonMap::new(),
        }
    }

    /// Sets `extensions.code`
    pub fn with_code(mut self, code: &str) -> Self {
        self.extensions.insert("code", code.into());
        self
    }

    pub fn with_path(mut self, path: Vec<PathSegment>) -> Self {
        self.path = path;
        self
    }

    pub fn code(&self) -> Option<&str> {
        self.extensions.get("code")?.as_str()
    }
}

impl From<ScalarError> for GraphQLError {
    fn from(error: ScalarError) -> Self {
        GraphQLError::new(error.to_string()).with_code(error.code())
    }
}
