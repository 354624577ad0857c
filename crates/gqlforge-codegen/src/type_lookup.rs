//! Resolution of GraphQL type references to C# type names.

use crate::schema::FieldPath;
use crate::schema::GeneratedTypeMap;
use crate::schema::SchemaType;
use crate::schema::SchemaTypes;
use crate::CodegenError;
use gqlforge_scalars::ast::Type;
use gqlforge_scalars::Name;
use gqlforge_scalars::RuntimeType;
use gqlforge_scalars::ScalarCoercion;
use gqlforge_scalars::Scalars;
use gqlforge_scalars::SerializationType;

/// Details of a leaf field, used to generate the code that reads it from a response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeInfo {
    /// Full C# type, such as `IReadOnlyList<int?>`
    pub clr_type_name: String,
    /// C# type of the leaf values, without list or nullability
    pub element_type_name: String,
    pub schema_type_name: Name,
    pub serialization_type: SerializationType,
    pub list_depth: usize,
    pub is_nullable: bool,
    pub is_value_type: bool,
    pub is_enum: bool,
    /// `JsonElement` method extracting the wire value,
    /// or `None` when the element itself is passed to the serializer
    pub json_accessor: Option<&'static str>,
}

/// A C# type without list or nullability
#[derive(Clone, Debug, PartialEq, Eq)]
struct ClrType {
    name: String,
    is_value_type: bool,
}

impl ClrType {
    fn value(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_value_type: true,
        }
    }

    fn reference(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_value_type: false,
        }
    }
}

/// Maps field types to the C# types of generated code.
///
/// Scalars map through their runtime type, enums and input objects through
/// their generated type, and selections of object, interface and union types
/// through the generated type of their field path.
/// Anything else is an error: a type is never defaulted.
#[derive(Clone, Copy, Debug)]
pub struct TypeLookup<'a> {
    scalars: &'a Scalars,
    schema: &'a SchemaTypes,
    generated: &'a GeneratedTypeMap,
}

impl<'a> TypeLookup<'a> {
    pub fn new(
        scalars: &'a Scalars,
        schema: &'a SchemaTypes,
        generated: &'a GeneratedTypeMap,
    ) -> Self {
        Self {
            scalars,
            schema,
            generated,
        }
    }

    pub fn scalars(&self) -> &'a Scalars {
        self.scalars
    }

    pub fn schema(&self) -> &'a SchemaTypes {
        self.schema
    }

    /// Returns the C# type of a field.
    ///
    /// Nullable value types get a `?`, nullable reference types are left as is.
    /// Lists become `IReadOnlyList<T>` when `read_only`, `List<T>` otherwise.
    /// `path` is needed for selections of object, interface and union types.
    pub fn get_type_name(
        &self,
        ty: &Type,
        field: &str,
        path: Option<&FieldPath>,
        read_only: bool,
    ) -> Result<String, CodegenError> {
        let leaf = self.resolve_named(ty, field, path)?;
        Ok(wrap_type_name(ty, &leaf.name, leaf.is_value_type, read_only))
    }

    /// Like [`get_type_name`][Self::get_type_name] for the items of a list,
    /// or for the type itself when it is not a list
    pub fn element_type_name(
        &self,
        ty: &Type,
        field: &str,
        path: Option<&FieldPath>,
        read_only: bool,
    ) -> Result<String, CodegenError> {
        self.get_type_name(ty.item_type().unwrap_or(ty), field, path, read_only)
    }

    /// Lists, and named types that map to C# classes or interfaces.
    /// A null check is needed before using values of these types.
    pub fn is_reference_type(
        &self,
        ty: &Type,
        field: &str,
        path: Option<&FieldPath>,
    ) -> Result<bool, CodegenError> {
        Ok(ty.is_list() || !self.resolve_named(ty, field, path)?.is_value_type)
    }

    /// Scalars and enums
    pub fn is_leaf(&self, ty: &Type) -> bool {
        let name = ty.inner_named_type();
        match self.schema.get(name) {
            Some(schema_type) => schema_type.is_leaf(),
            None => self.scalars.contains(name),
        }
    }

    /// Returns the details of a scalar or enum field
    pub fn get_type_info(&self, ty: &Type, field: &str) -> Result<TypeInfo, CodegenError> {
        let name = ty.inner_named_type();
        let (clr_type, serialization_type, is_enum) = match self.schema.get(name) {
            Some(SchemaType::Enum { .. }) => (self.generated_named(ty, field)?, SerializationType::String, true),
            Some(SchemaType::Scalar) => {
                let (clr_type, serialization_type) = self.scalar(name)?;
                (clr_type, serialization_type, false)
            }
            None if self.scalars.contains(name) => {
                let (clr_type, serialization_type) = self.scalar(name)?;
                (clr_type, serialization_type, false)
            }
            _ => {
                return Err(CodegenError::NotALeafType {
                    field: field.to_owned(),
                    ty: ty.clone(),
                })
            }
        };
        Ok(TypeInfo {
            clr_type_name: wrap_type_name(ty, &clr_type.name, clr_type.is_value_type, true),
            element_type_name: clr_type.name,
            schema_type_name: name.clone(),
            serialization_type,
            list_depth: ty.list_depth(),
            is_nullable: !ty.is_non_null(),
            is_value_type: clr_type.is_value_type,
            is_enum,
            json_accessor: json_accessor(serialization_type),
        })
    }

    fn resolve_named(
        &self,
        ty: &Type,
        field: &str,
        path: Option<&FieldPath>,
    ) -> Result<ClrType, CodegenError> {
        let name = ty.inner_named_type();
        match self.schema.get(name) {
            Some(SchemaType::Scalar) => Ok(self.scalar(name)?.0),
            Some(SchemaType::Enum { .. }) => self.generated_named(ty, field),
            Some(SchemaType::InputObject) => self
                .generated_named(ty, field)
                .map(|clr_type| ClrType::reference(clr_type.name)),
            Some(SchemaType::Object | SchemaType::Interface | SchemaType::Union) => path
                .and_then(|path| self.generated.field_type(path))
                .map(ClrType::reference)
                .ok_or_else(|| unresolved(ty, field)),
            None if self.scalars.contains(name) => Ok(self.scalar(name)?.0),
            None => self
                .generated
                .named_type(name)
                .map(ClrType::reference)
                .ok_or_else(|| unresolved(ty, field)),
        }
    }

    fn generated_named(&self, ty: &Type, field: &str) -> Result<ClrType, CodegenError> {
        self.generated
            .named_type(ty.inner_named_type())
            .map(ClrType::value)
            .ok_or_else(|| unresolved(ty, field))
    }

    fn scalar(&self, name: &Name) -> Result<(ClrType, SerializationType), CodegenError> {
        let scalar = self
            .scalars
            .get(name)
            .ok_or_else(|| CodegenError::UnsupportedScalar { name: name.clone() })?;
        Ok((
            clr_scalar_type(scalar.runtime_type()),
            scalar.serialization_type(),
        ))
    }
}

fn unresolved(ty: &Type, field: &str) -> CodegenError {
    CodegenError::UnresolvedType {
        field: field.to_owned(),
        ty: ty.clone(),
    }
}

fn clr_scalar_type(runtime_type: RuntimeType) -> ClrType {
    match runtime_type {
        RuntimeType::Boolean => ClrType::value("bool"),
        RuntimeType::Byte => ClrType::value("byte"),
        RuntimeType::Short => ClrType::value("short"),
        RuntimeType::Int => ClrType::value("int"),
        RuntimeType::Long => ClrType::value("long"),
        RuntimeType::Float => ClrType::value("double"),
        RuntimeType::Decimal => ClrType::value("decimal"),
        RuntimeType::String => ClrType::reference("string"),
        RuntimeType::Date => ClrType::value("DateTime"),
        RuntimeType::DateTime => ClrType::value("DateTimeOffset"),
        RuntimeType::TimeSpan => ClrType::value("TimeSpan"),
        RuntimeType::Url => ClrType::reference("Uri"),
        RuntimeType::Uuid => ClrType::value("Guid"),
        RuntimeType::Any => ClrType::value("JsonElement"),
        RuntimeType::Upload => ClrType::value("Upload"),
    }
}

fn json_accessor(serialization_type: SerializationType) -> Option<&'static str> {
    Some(match serialization_type {
        SerializationType::Boolean => "GetBoolean",
        SerializationType::Byte => "GetByte",
        SerializationType::Short => "GetInt16",
        SerializationType::Int => "GetInt32",
        SerializationType::Float => "GetDouble",
        SerializationType::Decimal => "GetDecimal",
        SerializationType::String => "GetString",
        SerializationType::Any | SerializationType::File => return None,
    })
}

/// Wraps the C# type of a leaf in the list and nullability wrappers of `ty`
pub fn wrap_type_name(ty: &Type, element: &str, is_value_type: bool, read_only: bool) -> String {
    match ty {
        Type::Named(_) if is_value_type => format!("{element}?"),
        Type::Named(_) | Type::NonNullNamed(_) => element.to_owned(),
        Type::List(item) | Type::NonNullList(item) => {
            let item = wrap_type_name(item, element, is_value_type, read_only);
            if read_only {
                format!("IReadOnlyList<{item}>")
            } else {
                format!("List<{item}>")
            }
        }
    }
}

/// A deterministic name for the shape of a type.
///
/// Built innermost-first: the named type, then for each wrapping level
/// `ListOf` for a list and `Nullable` when the level is not non-null.
/// `[Int]!` is `ListOfNullableInt` and `[Int!]` is `NullableListOfInt`.
pub fn shape_name(ty: &Type) -> String {
    let mut name = match ty {
        Type::Named(name) | Type::NonNullNamed(name) => name.to_string(),
        Type::List(item) | Type::NonNullList(item) => format!("ListOf{}", shape_name(item)),
    };
    if !ty.is_non_null() {
        name.insert_str(0, "Nullable");
    }
    name
}
