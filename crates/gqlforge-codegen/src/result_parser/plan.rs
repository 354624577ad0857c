use crate::descriptors::FieldDescriptor;
use crate::descriptors::PossibleTypeDescriptor;
use crate::descriptors::ResultParserDescriptor;
use crate::descriptors::ResultParserMethodDescriptor;
use crate::generators::serializer_field;
use crate::schema::FieldPath;
use crate::type_lookup::shape_name;
use crate::type_lookup::wrap_type_name;
use crate::CodegenError;
use crate::TypeInfo;
use crate::TypeLookup;
use gqlforge_scalars::ast::Type;
use gqlforge_scalars::Name;
use heck::ToUpperCamelCase;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Every method of a result parser, resolved and deduplicated.
///
/// Built once from a [`ResultParserDescriptor`] with [`build`][Self::build].
/// Each call target named in the plan is one of its own methods,
/// so the emitted class is complete and [`parse`][Self::parse] never
/// meets an unknown method.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultParserPlan {
    pub(super) class_name: String,
    pub(super) result_type: String,
    pub(super) root: ObjectConstruction,
    pub(super) parse_methods: IndexMap<String, ParseMethod>,
    pub(super) deserializers: IndexMap<String, DeserializeMethod>,
    pub(super) serializers: IndexMap<Name, SerializerField>,
}

/// A `new Class(...)` expression for one concrete schema type
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectConstruction {
    pub type_name: Name,
    pub class_name: String,
    /// Constructor arguments in field order
    pub arguments: Vec<FieldParser>,
}

/// A constructor argument: the call reading one field of the response object
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldParser {
    pub response_name: Name,
    pub method: String,
    pub kind: FieldParserKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldParserKind {
    /// Calls a [`ParseMethod`]
    Object,
    /// Calls a [`DeserializeMethod`]
    Leaf,
}

/// Reads a selection of an object, interface or union type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseMethod {
    pub name: String,
    pub path: FieldPath,
    pub ty: Type,
    /// C# type returned, lists and nullability included
    pub return_type: String,
    /// Generated type of the objects, such as `IHero`
    pub element_type: String,
    pub possible_types: Vec<ObjectConstruction>,
}

impl ParseMethod {
    /// Whether the concrete type is picked at runtime from `__typename`
    pub fn is_abstract(&self) -> bool {
        self.possible_types.len() > 1
    }
}

/// Reads a scalar or enum field of one shape, such as `NullableListOfInt`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeserializeMethod {
    pub name: String,
    pub ty: Type,
    pub info: TypeInfo,
    /// Field holding the serializer that converts the wire value
    pub serializer: String,
}

/// A value serializer the parser resolves in its constructor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializerField {
    pub field_name: String,
    pub type_name: Name,
    /// Members of an enum type, `None` for scalars
    pub enum_values: Option<Vec<Name>>,
}

/// Methods planned so far, shared by the whole recursion
#[derive(Default)]
struct Memo {
    parse_methods: IndexMap<String, ParseMethod>,
    deserializers: IndexMap<String, DeserializeMethod>,
    serializers: IndexMap<Name, SerializerField>,
}

struct Context<'a> {
    parser: &'a str,
    methods: HashMap<&'a FieldPath, &'a ResultParserMethodDescriptor>,
    lookup: &'a TypeLookup<'a>,
}

impl ResultParserPlan {
    /// Plans the methods of a result parser.
    ///
    /// Parse methods are named after their field path and reused when the same path is
    /// selected again. Deserializers are named after the shape of their type and reused
    /// by every field of that shape.
    pub fn build(
        descriptor: &ResultParserDescriptor,
        lookup: &TypeLookup<'_>,
    ) -> Result<Self, CodegenError> {
        let mut methods = HashMap::new();
        for method in &descriptor.parse_methods {
            if methods.insert(&method.path, method).is_some() {
                return Err(CodegenError::invalid(format!(
                    "result parser `{}` has two parse methods for field path `{}`",
                    descriptor.name, method.path
                )));
            }
        }
        let context = Context {
            parser: &descriptor.name,
            methods,
            lookup,
        };
        let mut memo = Memo::default();
        for leaf in &descriptor.leaf_types {
            let info = lookup.get_type_info(&Type::NonNullNamed(leaf.clone()), leaf)?;
            plan_serializer(&info, &context, &mut memo);
        }
        let root = construct(&descriptor.root, &context, &mut memo)?;
        let plan = Self {
            class_name: descriptor.name.clone(),
            result_type: descriptor.result_type.clone(),
            root,
            parse_methods: memo.parse_methods,
            deserializers: memo.deserializers,
            serializers: memo.serializers,
        };
        tracing::debug!(
            parser = %plan.class_name,
            parse_methods = plan.parse_methods.len(),
            deserializers = plan.deserializers.len(),
            serializers = plan.serializers.len(),
            "planned result parser"
        );
        Ok(plan)
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn result_type(&self) -> &str {
        &self.result_type
    }

    /// The object constructed from `data`
    pub fn root(&self) -> &ObjectConstruction {
        &self.root
    }

    /// In the order they are emitted, parents before children
    pub fn parse_methods(&self) -> impl Iterator<Item = &ParseMethod> {
        self.parse_methods.values()
    }

    pub fn parse_method(&self, name: &str) -> Option<&ParseMethod> {
        self.parse_methods.get(name)
    }

    pub fn deserializers(&self) -> impl Iterator<Item = &DeserializeMethod> {
        self.deserializers.values()
    }

    pub fn deserializer(&self, name: &str) -> Option<&DeserializeMethod> {
        self.deserializers.get(name)
    }

    pub fn serializers(&self) -> impl Iterator<Item = &SerializerField> {
        self.serializers.values()
    }

    pub fn serializer(&self, type_name: &str) -> Option<&SerializerField> {
        self.serializers.get(type_name)
    }
}

/// `Parse` followed by the path segments: `hero.friends` is `ParseHeroFriends`
pub fn parse_method_name(path: &FieldPath) -> String {
    let mut name = String::from("Parse");
    for segment in path.segments() {
        name.push_str(&segment.to_upper_camel_case());
    }
    name
}

fn construct(
    possible_type: &PossibleTypeDescriptor,
    context: &Context<'_>,
    memo: &mut Memo,
) -> Result<ObjectConstruction, CodegenError> {
    let mut arguments = Vec::with_capacity(possible_type.fields.len());
    for field in &possible_type.fields {
        let argument = if context.lookup.is_leaf(&field.ty) {
            FieldParser {
                response_name: field.name.clone(),
                method: plan_deserializer(field, context, memo)?,
                kind: FieldParserKind::Leaf,
            }
        } else {
            FieldParser {
                response_name: field.name.clone(),
                method: plan_parse_method(field, context, memo)?,
                kind: FieldParserKind::Object,
            }
        };
        arguments.push(argument);
    }
    Ok(ObjectConstruction {
        type_name: possible_type.type_name.clone(),
        class_name: possible_type.class_name.clone(),
        arguments,
    })
}

fn plan_parse_method(
    field: &FieldDescriptor,
    context: &Context<'_>,
    memo: &mut Memo,
) -> Result<String, CodegenError> {
    let name = parse_method_name(&field.path);
    if let Some(existing) = memo.parse_methods.get(&name) {
        if existing.path != field.path {
            return Err(CodegenError::invalid(format!(
                "field paths `{}` and `{}` both produce the parse method name `{name}`",
                existing.path, field.path
            )));
        }
        if existing.ty != field.ty {
            return Err(CodegenError::invalid(format!(
                "field path `{}` is selected with types `{}` and `{}`",
                field.path, existing.ty, field.ty
            )));
        }
        tracing::trace!(method = %name, "reusing parse method");
        return Ok(name);
    }
    let descriptor = context.methods.get(&field.path).ok_or_else(|| {
        CodegenError::MissingParseMethod {
            parser: context.parser.to_owned(),
            path: field.path.to_string(),
        }
    })?;
    if descriptor.field_type != field.ty {
        return Err(CodegenError::invalid(format!(
            "parse method for `{}` has type `{}` but the field has type `{}`",
            field.path, descriptor.field_type, field.ty
        )));
    }
    if descriptor.possible_types.is_empty() {
        return Err(CodegenError::invalid(format!(
            "parse method for `{}` has no possible types",
            field.path
        )));
    }
    // Registered before the children so that parents come first
    memo.parse_methods.insert(
        name.clone(),
        ParseMethod {
            name: name.clone(),
            path: field.path.clone(),
            ty: field.ty.clone(),
            return_type: wrap_type_name(&field.ty, &descriptor.result_type, false, true),
            element_type: descriptor.result_type.clone(),
            possible_types: Vec::new(),
        },
    );
    let possible_types = descriptor
        .possible_types
        .iter()
        .map(|possible_type| construct(possible_type, context, memo))
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(method) = memo.parse_methods.get_mut(&name) {
        method.possible_types = possible_types;
    }
    Ok(name)
}

fn plan_deserializer(
    field: &FieldDescriptor,
    context: &Context<'_>,
    memo: &mut Memo,
) -> Result<String, CodegenError> {
    let info = context.lookup.get_type_info(&field.ty, &field.name)?;
    if info.list_depth > 1 {
        return Err(CodegenError::NestedLeafList {
            field: field.path.to_string(),
            ty: field.ty.clone(),
        });
    }
    let name = format!("Deserialize{}", shape_name(&field.ty));
    if memo.deserializers.contains_key(&name) {
        tracing::trace!(method = %name, "reusing deserializer");
        return Ok(name);
    }
    let serializer = plan_serializer(&info, context, memo);
    memo.deserializers.insert(
        name.clone(),
        DeserializeMethod {
            name: name.clone(),
            ty: field.ty.clone(),
            info,
            serializer,
        },
    );
    Ok(name)
}

fn plan_serializer(info: &TypeInfo, context: &Context<'_>, memo: &mut Memo) -> String {
    let type_name = &info.schema_type_name;
    memo.serializers
        .entry(type_name.clone())
        .or_insert_with(|| SerializerField {
            field_name: serializer_field(type_name),
            type_name: type_name.clone(),
            enum_values: info.is_enum.then(|| {
                context
                    .lookup
                    .schema()
                    .enum_values(type_name)
                    .map(<[Name]>::to_vec)
                    .unwrap_or_default()
            }),
        })
        .field_name
        .clone()
}
