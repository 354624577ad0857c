use super::plan::DeserializeMethod;
use super::plan::FieldParser;
use super::plan::FieldParserKind;
use super::plan::ObjectConstruction;
use super::plan::ParseMethod;
use super::plan::ResultParserPlan;
use gqlforge_scalars::ast::Type;
use gqlforge_scalars::request::GraphQLError;
use gqlforge_scalars::request::PathSegment;
use gqlforge_scalars::JsonMap;
use gqlforge_scalars::JsonValue;
use gqlforge_scalars::Name;
use gqlforge_scalars::ScalarCoercion;
use gqlforge_scalars::ScalarError;
use gqlforge_scalars::ScalarValue;
use gqlforge_scalars::Scalars;
use gqlforge_scalars::ValueKind;
use std::fmt::Write;

/// A response value as the generated parser would construct it.
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedValue {
    Null,
    Scalar(ScalarValue),
    Enum(Name),
    List(Vec<ParsedValue>),
    Object(ParsedObject),
}

/// An instance of a generated class.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedObject {
    /// The concrete schema type, from `__typename` for abstract selections
    pub type_name: Name,
    pub class_name: String,
    /// Constructor arguments in order, with the response name they were read from
    pub fields: Vec<(Name, ParsedValue)>,
}

impl ParsedObject {
    pub fn get(&self, response_name: &str) -> Option<&ParsedValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == response_name)
            .map(|(_, value)| value)
    }
}

impl ParsedValue {
    pub fn as_object(&self) -> Option<&ParsedObject> {
        match self {
            ParsedValue::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ParsedValue]> {
        match self {
            ParsedValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParsedValue::Null)
    }
}

/// A response the generated parser would reject, with the path of the offending value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResultParseError {
    #[error("the non-null field `{}` is null or missing", format_path(path))]
    NonNullFieldMissing { path: Vec<PathSegment> },

    #[error("the list element `{}` of a list of non-null values is null", format_path(path))]
    NullListElement { path: Vec<PathSegment> },

    #[error("unknown schema type `{type_name}` at `{}`", format_path(path))]
    UnknownSchemaType {
        path: Vec<PathSegment>,
        type_name: String,
    },

    #[error("the object at `{}` has no `__typename`", format_path(path))]
    MissingTypeName { path: Vec<PathSegment> },

    #[error("expected {expected} at `{}`, found {found}", format_path(path))]
    UnexpectedShape {
        path: Vec<PathSegment>,
        expected: &'static str,
        found: ValueKind,
    },

    #[error("`{value}` at `{}` is not a value of the enum `{enum_type}`", format_path(path))]
    UnknownEnumValue {
        path: Vec<PathSegment>,
        enum_type: Name,
        value: String,
    },

    #[error("the scalar `{name}` at `{}` is not registered", format_path(path))]
    UnknownScalar { path: Vec<PathSegment>, name: Name },

    #[error("invalid value at `{}`: {source}", format_path(path))]
    Scalar {
        path: Vec<PathSegment>,
        source: ScalarError,
    },

    #[error("the parser has no method `{method}`")]
    MissingMethod { method: String },
}

impl ResultParseError {
    pub fn path(&self) -> &[PathSegment] {
        match self {
            ResultParseError::NonNullFieldMissing { path }
            | ResultParseError::NullListElement { path }
            | ResultParseError::UnknownSchemaType { path, .. }
            | ResultParseError::MissingTypeName { path }
            | ResultParseError::UnexpectedShape { path, .. }
            | ResultParseError::UnknownEnumValue { path, .. }
            | ResultParseError::UnknownScalar { path, .. }
            | ResultParseError::Scalar { path, .. } => path,
            ResultParseError::MissingMethod { .. } => &[],
        }
    }

    /// A machine-readable code, suitable for `extensions.code`
    pub fn code(&self) -> &'static str {
        match self {
            ResultParseError::NonNullFieldMissing { .. }
            | ResultParseError::NullListElement { .. } => "NON_NULL_VIOLATION",
            ResultParseError::UnknownSchemaType { .. } => "UNKNOWN_SCHEMA_TYPE",
            ResultParseError::MissingTypeName { .. }
            | ResultParseError::UnexpectedShape { .. } => "UNEXPECTED_SHAPE",
            ResultParseError::UnknownEnumValue { .. } => "UNKNOWN_ENUM_VALUE",
            ResultParseError::UnknownScalar { .. } => "UNKNOWN_SCALAR",
            ResultParseError::Scalar { source, .. } => source.code(),
            ResultParseError::MissingMethod { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn to_graphql_error(&self) -> GraphQLError {
        GraphQLError::new(self.to_string())
            .with_code(self.code())
            .with_path(self.path().to_vec())
    }
}

/// `hero.friends[0].name`
fn format_path(path: &[PathSegment]) -> String {
    let mut formatted = String::new();
    for segment in path {
        match segment {
            PathSegment::Field(name) if formatted.is_empty() => formatted.push_str(name),
            PathSegment::Field(name) => {
                formatted.push('.');
                formatted.push_str(name);
            }
            PathSegment::ListIndex(index) => {
                let _ = write!(formatted, "[{index}]");
            }
        }
    }
    formatted
}

impl ResultParserPlan {
    /// Parses the `data` of a response the way the generated parser does.
    ///
    /// Fields are read in constructor order and the first failure is returned.
    /// Wire values of scalars are converted by the scalars of `scalars`,
    /// enum values are checked against the members of their enum type.
    pub fn parse(&self, scalars: &Scalars, data: &JsonValue) -> Result<ParsedValue, ResultParseError> {
        let mut path = Vec::new();
        let object = data
            .as_object()
            .ok_or_else(|| unexpected(&path, "an object", data))?;
        let interpreter = Interpreter {
            plan: self,
            scalars,
        };
        interpreter
            .construct(self.root(), object, &mut path)
            .map(ParsedValue::Object)
    }
}

struct Interpreter<'a> {
    plan: &'a ResultParserPlan,
    scalars: &'a Scalars,
}

type LeafParser<'p> =
    dyn Fn(&JsonValue, &mut Vec<PathSegment>) -> Result<ParsedValue, ResultParseError> + 'p;

impl Interpreter<'_> {
    fn construct(
        &self,
        construction: &ObjectConstruction,
        object: &JsonMap,
        path: &mut Vec<PathSegment>,
    ) -> Result<ParsedObject, ResultParseError> {
        let mut fields = Vec::with_capacity(construction.arguments.len());
        for argument in &construction.arguments {
            path.push(PathSegment::Field(argument.response_name.to_string()));
            let value = self.field(argument, object.get(argument.response_name.as_str()), path)?;
            path.pop();
            fields.push((argument.response_name.clone(), value));
        }
        Ok(ParsedObject {
            type_name: construction.type_name.clone(),
            class_name: construction.class_name.clone(),
            fields,
        })
    }

    fn field(
        &self,
        argument: &FieldParser,
        json: Option<&JsonValue>,
        path: &mut Vec<PathSegment>,
    ) -> Result<ParsedValue, ResultParseError> {
        let missing = || ResultParseError::MissingMethod {
            method: argument.method.clone(),
        };
        match argument.kind {
            FieldParserKind::Object => {
                let method = self.plan.parse_method(&argument.method).ok_or_else(missing)?;
                self.value(&method.ty, json, path, &|json, path| {
                    self.object(method, json, path)
                })
            }
            FieldParserKind::Leaf => {
                let method = self.plan.deserializer(&argument.method).ok_or_else(missing)?;
                self.value(&method.ty, json, path, &|json, path| {
                    self.leaf(method, json, path)
                })
            }
        }
    }

    /// A field value: null or missing fields are only allowed for nullable types
    fn value(
        &self,
        ty: &Type,
        json: Option<&JsonValue>,
        path: &mut Vec<PathSegment>,
        leaf: &LeafParser<'_>,
    ) -> Result<ParsedValue, ResultParseError> {
        match json {
            None | Some(JsonValue::Null) if ty.is_non_null() => {
                Err(ResultParseError::NonNullFieldMissing { path: path.clone() })
            }
            None | Some(JsonValue::Null) => Ok(ParsedValue::Null),
            Some(json) => self.non_null_value(ty, json, path, leaf),
        }
    }

    fn non_null_value(
        &self,
        ty: &Type,
        json: &JsonValue,
        path: &mut Vec<PathSegment>,
        leaf: &LeafParser<'_>,
    ) -> Result<ParsedValue, ResultParseError> {
        let Some(item) = ty.item_type() else {
            return leaf(json, path);
        };
        let elements = json
            .as_array()
            .ok_or_else(|| unexpected(path, "a list", json))?;
        let mut items = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            path.push(PathSegment::ListIndex(index));
            let value = if element.is_null() {
                if item.is_non_null() {
                    return Err(ResultParseError::NullListElement { path: path.clone() });
                }
                ParsedValue::Null
            } else {
                self.non_null_value(item, element, path, leaf)?
            };
            path.pop();
            items.push(value);
        }
        Ok(ParsedValue::List(items))
    }

    fn object(
        &self,
        method: &ParseMethod,
        json: &JsonValue,
        path: &mut Vec<PathSegment>,
    ) -> Result<ParsedValue, ResultParseError> {
        let object = json
            .as_object()
            .ok_or_else(|| unexpected(path, "an object", json))?;
        let construction = match method.possible_types.as_slice() {
            [construction] => construction,
            possible_types => {
                let type_name = object
                    .get("__typename")
                    .and_then(JsonValue::as_str)
                    .ok_or_else(|| ResultParseError::MissingTypeName { path: path.clone() })?;
                possible_types
                    .iter()
                    .find(|construction| construction.type_name == type_name)
                    .ok_or_else(|| ResultParseError::UnknownSchemaType {
                        path: path.clone(),
                        type_name: type_name.to_owned(),
                    })?
            }
        };
        self.construct(construction, object, path)
            .map(ParsedValue::Object)
    }

    fn leaf(
        &self,
        method: &DeserializeMethod,
        json: &JsonValue,
        path: &mut Vec<PathSegment>,
    ) -> Result<ParsedValue, ResultParseError> {
        let type_name = &method.info.schema_type_name;
        let serializer = self
            .plan
            .serializer(type_name)
            .ok_or_else(|| ResultParseError::MissingMethod {
                method: method.serializer.clone(),
            })?;
        if let Some(members) = &serializer.enum_values {
            let value = json
                .as_str()
                .ok_or_else(|| unexpected(path, "an enum value", json))?;
            let unknown = || ResultParseError::UnknownEnumValue {
                path: path.clone(),
                enum_type: type_name.clone(),
                value: value.to_owned(),
            };
            // Without known members any name is accepted
            let member = if members.is_empty() {
                Name::new(value).map_err(|_| unknown())?
            } else {
                members
                    .iter()
                    .find(|member| member.as_str() == value)
                    .cloned()
                    .ok_or_else(unknown)?
            };
            return Ok(ParsedValue::Enum(member));
        }
        let scalar = self
            .scalars
            .get(type_name)
            .ok_or_else(|| ResultParseError::UnknownScalar {
                path: path.clone(),
                name: type_name.clone(),
            })?;
        scalar
            .deserialize(json)
            .map(ParsedValue::Scalar)
            .map_err(|source| ResultParseError::Scalar {
                path: path.clone(),
                source,
            })
    }
}

fn unexpected(path: &[PathSegment], expected: &'static str, found: &JsonValue) -> ResultParseError {
    ResultParseError::UnexpectedShape {
        path: path.to_vec(),
        expected,
        found: ValueKind::of_json(found),
    }
}
