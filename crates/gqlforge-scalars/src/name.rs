use serde::Deserialize;
use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::ops::Deref;
use std::sync::Arc;

/// Create a [`Name`] from a string literal or identifier, checked for validity at compile time.
///
/// # Examples
///
/// ```
/// use gqlforge_scalars::name;
///
/// assert_eq!(name!("Query").as_str(), "Query");
/// assert_eq!(name!(Query).as_str(), "Query");
/// ```
///
/// ```compile_fail
/// # use gqlforge_scalars::name;
/// let invalid = name!("è_é");
/// ```
#[macro_export]
macro_rules! name {
    ($value: ident) => {
        $crate::name!(stringify!($value))
    };
    ($value: expr) => {{
        const _: () = { assert!($crate::Name::valid_syntax($value)) };
        $crate::Name::new_static_unchecked($value)
    }};
}

/// A GraphQL identifier.
///
/// Cloning is cheap: the string is either a `&'static str`
/// or an atomically reference-counted `Arc<str>`.
#[derive(Clone)]
pub struct Name(Repr);

#[derive(Clone)]
enum Repr {
    Static(&'static str),
    Heap(Arc<str>),
}

/// Tried to create a [`Name`] from a string that is not in valid
/// [GraphQL name](https://spec.graphql.org/October2021/#Name) syntax.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("`{name}` is not a valid GraphQL name")]
pub struct InvalidNameError {
    pub name: String,
}

impl Name {
    /// Create a new `Name`, checking its syntax.
    pub fn new(value: &str) -> Result<Self, InvalidNameError> {
        if Self::valid_syntax(value) {
            Ok(Self(Repr::Heap(value.into())))
        } else {
            Err(InvalidNameError {
                name: value.to_owned(),
            })
        }
    }

    /// Create a new static `Name` without validity checking.
    ///
    /// Prefer the [`name!`][crate::name!] macro, which checks at compile time.
    pub const fn new_static_unchecked(value: &'static str) -> Self {
        Self(Repr::Static(value))
    }

    pub fn as_str(&self) -> &str {
        match &self.0 {
            Repr::Static(s) => s,
            Repr::Heap(s) => s,
        }
    }

    /// Returns whether the given string is a valid GraphQL name:
    /// `[_A-Za-z][_0-9A-Za-z]*`
    pub const fn valid_syntax(value: &str) -> bool {
        let bytes = value.as_bytes();
        let Some(&first) = bytes.first() else {
            return false;
        };
        if !is_name_start(first) {
            return false;
        }
        let mut i = 1;
        while i < bytes.len() {
            if !is_name_continue(bytes[i]) {
                return false;
            }
            i += 1
        }
        true
    }
}

const fn is_name_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

const fn is_name_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

impl Deref for Name {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Name {}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

// Must match `str`'s hash so that `Borrow<str>` lookups work in hash maps
impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl TryFrom<&str> for Name {
    type Error = InvalidNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Name {
    type Error = InvalidNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl Serialize for Name {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_name_syntax() {
        assert!(Name::valid_syntax("Query"));
        assert!(Name::valid_syntax("_typename"));
        assert!(Name::valid_syntax("a1_b2"));
        assert!(!Name::valid_syntax(""));
        assert!(!Name::valid_syntax("1abc"));
        assert!(!Name::valid_syntax("foo-bar"));
        assert!(!Name::valid_syntax("è_é"));
    }

    #[test]
    fn static_and_heap_names_compare_equal() {
        let heap = Name::new("Droid").unwrap();
        assert_eq!(heap, name!(Droid));
        assert_eq!(heap, "Droid");
        assert_eq!(
            Name::new("not valid").unwrap_err().to_string(),
            "`not valid` is not a valid GraphQL name"
        );
    }
}
