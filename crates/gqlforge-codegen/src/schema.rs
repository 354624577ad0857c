//! What generation knows about the schema: the kind of each named type,
//! and the generated type chosen for each selection.

use gqlforge_scalars::Name;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// Identity of a field within the selection sets of one operation,
/// such as `GetHero.hero.friends`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// The path of `field` selected under this one
    pub fn child(&self, field: &str) -> Self {
        Self(format!("{}.{field}", self.0))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// The kind of a named schema type
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SchemaType {
    Scalar,
    Enum { values: Vec<Name> },
    Object,
    Interface,
    Union,
    InputObject,
}

impl SchemaType {
    /// Scalars and enums: the types of result leaves
    pub fn is_leaf(&self) -> bool {
        matches!(self, SchemaType::Scalar | SchemaType::Enum { .. })
    }

    /// Interfaces and unions, whose values have one of several concrete types
    pub fn is_abstract(&self) -> bool {
        matches!(self, SchemaType::Interface | SchemaType::Union)
    }
}

/// Named types of the schema, in definition order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaTypes {
    types: IndexMap<Name, SchemaType>,
}

impl SchemaTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a type
    pub fn with(mut self, name: Name, ty: SchemaType) -> Self {
        self.insert(name, ty);
        self
    }

    pub fn insert(&mut self, name: Name, ty: SchemaType) {
        self.types.insert(name, ty);
    }

    pub fn get(&self, name: &str) -> Option<&SchemaType> {
        self.types.get(name)
    }

    pub fn enum_values(&self, name: &str) -> Option<&[Name]> {
        match self.types.get(name)? {
            SchemaType::Enum { values } => Some(values),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &SchemaType)> {
        self.types.iter()
    }
}

/// Generated type names, chosen by the analysis that runs before generation.
///
/// Object, interface and union types are mapped per selection, since two selections
/// on the same schema type generally produce two different generated types.
/// Enums and input objects have one generated type each.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedTypeMap {
    fields: IndexMap<FieldPath, String>,
    named: IndexMap<Name, String>,
}

impl GeneratedTypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_field(&mut self, path: FieldPath, type_name: impl Into<String>) {
        self.fields.insert(path, type_name.into());
    }

    pub fn insert_named(&mut self, name: Name, type_name: impl Into<String>) {
        self.named.insert(name, type_name.into());
    }

    pub fn field_type(&self, path: &FieldPath) -> Option<&str> {
        self.fields.get(path).map(String::as_str)
    }

    pub fn named_type(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlforge_scalars::name;

    #[test]
    fn schema_types_from_json() {
        let types: SchemaTypes = serde_json::from_str(
            r#"{
                "Episode": {"kind": "enum", "values": ["NEWHOPE", "EMPIRE"]},
                "Character": {"kind": "interface"},
                "ReviewInput": {"kind": "inputObject"}
            }"#,
        )
        .unwrap();
        assert_eq!(
            types.enum_values("Episode"),
            Some(&[name!(NEWHOPE), name!(EMPIRE)][..])
        );
        assert!(types.get("Character").unwrap().is_abstract());
        assert!(!types.get("ReviewInput").unwrap().is_leaf());
        assert_eq!(types.get("Droid"), None);
    }

    #[test]
    fn field_paths() {
        let path = FieldPath::new("GetHero.hero");
        let friends = path.child("friends");
        assert_eq!(friends.as_str(), "GetHero.hero.friends");
        assert_eq!(
            friends.segments().collect::<Vec<_>>(),
            ["GetHero", "hero", "friends"]
        );
    }
}
