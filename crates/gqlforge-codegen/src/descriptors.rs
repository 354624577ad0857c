//! The input of code generation.
//!
//! Descriptors are produced by the analysis of a schema and its operation documents,
//! which happens before generation. They are read-only here and can be handed over as JSON.

use crate::schema::FieldPath;
use crate::schema::GeneratedTypeMap;
use crate::schema::SchemaTypes;
use crate::CodegenError;
use gqlforge_scalars::ast::Type;
use gqlforge_scalars::Name;
use heck::ToUpperCamelCase;
use serde::Deserialize;
use serde::Serialize;

/// A selected field: of a generated class or interface, or of a result object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Response name
    pub name: Name,
    #[serde(rename = "type")]
    pub ty: Type,
    pub path: FieldPath,
}

impl FieldDescriptor {
    pub fn new(name: Name, ty: Type, path: impl Into<FieldPath>) -> Self {
        Self {
            name,
            ty,
            path: path.into(),
        }
    }
}

/// An immutable data class
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: String,
    #[serde(default)]
    pub implements: Vec<String>,
    /// Constructor parameters and properties, in this order
    pub fields: Vec<FieldDescriptor>,
}

/// A read-only interface, implemented by the classes of each possible type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    pub name: String,
    #[serde(default)]
    pub implements: Vec<String>,
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDescriptor {
    pub name: String,
    pub graphql_name: Name,
    pub values: Vec<EnumValueDescriptor>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumValueDescriptor {
    /// Member name in generated code
    pub name: String,
    /// Value on the wire
    pub value: Name,
}

impl EnumValueDescriptor {
    /// Names the member after the wire value: `NEW_HOPE` becomes `NewHope`
    pub fn new(value: Name) -> Self {
        Self {
            name: value.to_upper_camel_case(),
            value,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputClassDescriptor {
    pub name: String,
    pub graphql_name: Name,
    pub fields: Vec<InputFieldDescriptor>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputFieldDescriptor {
    pub name: Name,
    #[serde(rename = "type")]
    pub ty: Type,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
            OperationKind::Subscription => "Subscription",
        }
    }
}

/// A variable of an operation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDescriptor {
    pub name: Name,
    #[serde(rename = "type")]
    pub ty: Type,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    /// Generated class name, such as `GetHeroOperation`
    pub name: String,
    /// Operation name in the document
    pub graphql_name: Name,
    pub kind: OperationKind,
    pub result_type: String,
    #[serde(default)]
    pub arguments: Vec<ArgumentDescriptor>,
    /// Name of the [`QueryDescriptor`] holding the document
    pub query: String,
}

/// An operation document, embedded in a generated class
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    pub name: String,
    pub document: String,
    #[serde(default = "default_hash_name")]
    pub hash_name: String,
}

fn default_hash_name() -> String {
    "sha256Hash".to_owned()
}

impl QueryDescriptor {
    pub fn new(name: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document: document.into(),
            hash_name: default_hash_name(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientDescriptor {
    pub name: String,
    pub operations: Vec<OperationDescriptor>,
}

impl ClientDescriptor {
    pub fn interface_name(&self) -> String {
        format!("I{}", self.name)
    }
}

/// Parses the `data` of the response to one operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultParserDescriptor {
    /// Generated class name, such as `GetHeroResultParser`
    pub name: String,
    pub result_type: String,
    /// The object constructed from `data`
    pub root: PossibleTypeDescriptor,
    /// One per selection of an object, interface or union type
    #[serde(default)]
    pub parse_methods: Vec<ResultParserMethodDescriptor>,
    /// Scalars and enums whose serializers the parser needs,
    /// in addition to those found in the fields
    #[serde(default)]
    pub leaf_types: Vec<Name>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultParserMethodDescriptor {
    pub path: FieldPath,
    pub field_type: Type,
    /// Generated type of the parsed objects, without list or nullability
    pub result_type: String,
    /// More than one for interfaces and unions
    pub possible_types: Vec<PossibleTypeDescriptor>,
}

/// A concrete schema type that a selection may resolve to,
/// and the class constructed for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PossibleTypeDescriptor {
    pub type_name: Name,
    pub class_name: String,
    pub fields: Vec<FieldDescriptor>,
}

/// Registrations of the generated client with a service collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyInjectionDescriptor {
    pub client_name: String,
    pub value_serializers: Vec<String>,
    pub result_parsers: Vec<String>,
}

impl DependencyInjectionDescriptor {
    pub fn from_model(model: &ClientModel) -> Self {
        let value_serializers = model
            .enums
            .iter()
            .map(|descriptor| enum_serializer_name(&descriptor.name))
            .chain(
                model
                    .input_classes
                    .iter()
                    .map(|descriptor| input_serializer_name(&descriptor.name)),
            )
            .collect();
        Self {
            client_name: model.client.name.clone(),
            value_serializers,
            result_parsers: model
                .result_parsers
                .iter()
                .map(|parser| parser.name.clone())
                .collect(),
        }
    }

    pub fn class_name(&self) -> String {
        format!("{}ServiceCollectionExtensions", self.client_name)
    }
}

pub(crate) fn enum_serializer_name(enum_name: &str) -> String {
    format!("{enum_name}ValueSerializer")
}

pub(crate) fn input_serializer_name(input_name: &str) -> String {
    format!("{input_name}Serializer")
}

/// Everything needed to generate one client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientModel {
    #[serde(default)]
    pub schema_types: SchemaTypes,
    #[serde(default)]
    pub generated_types: GeneratedTypeMap,
    pub client: ClientDescriptor,
    #[serde(default)]
    pub classes: Vec<ClassDescriptor>,
    #[serde(default)]
    pub interfaces: Vec<InterfaceDescriptor>,
    #[serde(default)]
    pub enums: Vec<EnumDescriptor>,
    #[serde(default)]
    pub input_classes: Vec<InputClassDescriptor>,
    #[serde(default)]
    pub queries: Vec<QueryDescriptor>,
    #[serde(default)]
    pub result_parsers: Vec<ResultParserDescriptor>,
}

impl ClientModel {
    pub fn from_json_str(json: &str) -> Result<Self, CodegenError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn query(&self, name: &str) -> Option<&QueryDescriptor> {
        self.queries.iter().find(|query| query.name == name)
    }

    /// Checks references between descriptors
    pub fn validate(&self) -> Result<(), CodegenError> {
        for operation in &self.client.operations {
            if self.query(&operation.query).is_none() {
                return Err(CodegenError::invalid(format!(
                    "operation `{}` refers to unknown query `{}`",
                    operation.name, operation.query
                )));
            }
        }
        let mut names = std::collections::HashSet::new();
        let generated = self
            .classes
            .iter()
            .map(|class| &class.name)
            .chain(self.interfaces.iter().map(|interface| &interface.name))
            .chain(self.enums.iter().map(|descriptor| &descriptor.name))
            .chain(self.input_classes.iter().map(|input| &input.name))
            .chain(self.queries.iter().map(|query| &query.name))
            .chain(self.client.operations.iter().map(|operation| &operation.name))
            .chain(self.result_parsers.iter().map(|parser| &parser.name));
        for name in generated {
            if !names.insert(name) {
                return Err(CodegenError::invalid(format!(
                    "the type name `{name}` is generated more than once"
                )));
            }
        }
        Ok(())
    }
}
