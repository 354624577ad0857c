use gqlforge_scalars::ast::Type;
use gqlforge_scalars::Name;

/// A failure to generate client code.
///
/// Most variants point at a bug in the analysis that produced the descriptors:
/// generation never guesses a type or skips a field.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("the scalar `{name}` is not registered")]
    UnsupportedScalar { name: Name },

    #[error("the type `{ty}` of field `{field}` is neither a scalar nor a generated type")]
    UnresolvedType { field: String, ty: Type },

    #[error("the type `{ty}` of field `{field}` is not a scalar or enum type")]
    NotALeafType { field: String, ty: Type },

    #[error("the field `{field}` has type `{ty}`: lists of lists of leaf values are not supported")]
    NestedLeafList { field: String, ty: Type },

    #[error("result parser `{parser}` has no parse method for field path `{path}`")]
    MissingParseMethod { parser: String, path: String },

    #[error("invalid descriptor: {message}")]
    InvalidDescriptor { message: String },

    #[error("invalid codegen configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("formatting error")]
    Fmt(#[from] std::fmt::Error),
}

impl CodegenError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        CodegenError::InvalidDescriptor {
            message: message.into(),
        }
    }
}
