//! The immutable table of scalars known to a schema.

use crate::ast::Type;
use crate::error::RegistryError;
use crate::scalar::ScalarCoercion;
use crate::scalar::ScalarType;
use crate::scalar::TimeSpanFormat;
use crate::value::RuntimeType;
use crate::Name;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Scalars by schema name, and a default scalar per runtime type.
///
/// Built once with [`ScalarsBuilder`] and shared read-only afterwards.
/// Lookups return `Option` so that callers handle unknown scalars explicitly.
#[derive(Clone, Debug)]
pub struct Scalars {
    by_name: IndexMap<Name, ScalarType>,
    by_runtime_type: HashMap<RuntimeType, Name>,
}

/// Configures and builds a [`Scalars`] registry.
#[derive(Clone, Debug, Default)]
pub struct ScalarsBuilder {
    scalars: IndexMap<Name, ScalarType>,
    time_span_format: Option<TimeSpanFormat>,
}

impl Scalars {
    pub fn builder() -> ScalarsBuilder {
        ScalarsBuilder::default()
    }

    /// Returns the scalar registered under `name`
    pub fn get(&self, name: &str) -> Option<&ScalarType> {
        self.by_name.get(name)
    }

    /// Returns the scalar for the inner named type of a type reference,
    /// such as `Int` for `[Int!]!`
    pub fn try_get_scalar(&self, ty: &Type) -> Option<&ScalarType> {
        self.get(ty.inner_named_type())
    }

    /// Returns the default scalar producing values of `runtime_type`,
    /// which is the first one registered
    pub fn get_for_runtime_type(&self, runtime_type: RuntimeType) -> Option<&ScalarType> {
        let name = self.by_runtime_type.get(&runtime_type)?;
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Iterates in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &ScalarType)> {
        self.by_name.iter()
    }
}

impl Default for Scalars {
    /// The built-in scalars with default settings
    fn default() -> Self {
        ScalarsBuilder::default().with_defaults().build()
    }
}

impl ScalarsBuilder {
    /// Adds the built-in scalars.
    ///
    /// A built-in scalar whose name was already registered is skipped,
    /// so registering first is the way to override one.
    pub fn with_defaults(mut self) -> Self {
        for scalar in ScalarType::builtins() {
            if let Entry::Vacant(entry) = self.scalars.entry(scalar.name().clone()) {
                entry.insert(scalar);
            }
        }
        self
    }

    /// Adds a custom scalar. Fails if a scalar with the same name is already registered.
    pub fn register(
        self,
        scalar: impl ScalarCoercion + Send + Sync + 'static,
    ) -> Result<Self, RegistryError> {
        self.register_type(ScalarType::Custom(Arc::new(scalar)))
    }

    /// Adds a scalar, built-in kind or custom.
    /// Fails if a scalar with the same name is already registered.
    pub fn register_type(mut self, scalar: ScalarType) -> Result<Self, RegistryError> {
        match self.scalars.entry(scalar.name().clone()) {
            Entry::Occupied(entry) => Err(RegistryError::DuplicateScalar {
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(scalar);
                Ok(self)
            }
        }
    }

    /// Sets the text format of every `TimeSpan` scalar
    pub fn time_span_format(mut self, format: TimeSpanFormat) -> Self {
        self.time_span_format = Some(format);
        self
    }

    pub fn build(self) -> Scalars {
        let mut by_name = self.scalars;
        if let Some(format) = self.time_span_format {
            for scalar in by_name.values_mut() {
                if let ScalarType::TimeSpan(time_span) = scalar {
                    *time_span = time_span.clone().with_format(format);
                }
            }
        }
        let mut by_runtime_type = HashMap::new();
        for (name, scalar) in &by_name {
            by_runtime_type
                .entry(scalar.runtime_type())
                .or_insert_with(|| name.clone());
        }
        tracing::debug!(
            scalars = by_name.len(),
            custom = by_name.values().filter(|scalar| scalar.is_custom()).count(),
            "built scalar registry"
        );
        Scalars {
            by_name,
            by_runtime_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name;
    use crate::scalar::IntType;

    #[test]
    fn defaults_cover_every_runtime_type() {
        let scalars = Scalars::default();
        assert_eq!(scalars.len(), 19);
        assert_eq!(
            scalars.get_for_runtime_type(RuntimeType::Int).unwrap().name(),
            "Int"
        );
        assert_eq!(
            scalars.get_for_runtime_type(RuntimeType::String).unwrap().name(),
            "String"
        );
        assert!(scalars.get("Unknown").is_none());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let result = Scalars::builder()
            .with_defaults()
            .register_type(ScalarType::Int(IntType::bounded(name!(Int), 0, 10)));
        assert_eq!(
            result.unwrap_err(),
            RegistryError::DuplicateScalar { name: name!(Int) }
        );
    }

    #[test]
    fn registering_first_overrides_a_default() {
        let scalars = Scalars::builder()
            .register_type(ScalarType::Int(IntType::bounded(name!(Int), 0, 10)))
            .unwrap()
            .with_defaults()
            .build();
        let ScalarType::Int(int) = scalars.get("Int").unwrap() else {
            panic!("expected Int")
        };
        assert_eq!(int.max(), 10);
    }
}
