//! Runtime representations of scalar values.

use crate::ast;
use crate::JsonValue;
use chrono::DateTime;
use chrono::FixedOffset;
use chrono::NaiveDate;
use chrono::TimeDelta;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

/// A scalar value after coercion, as seen by resolvers and result serialization.
#[derive(Clone, Debug, PartialEq)]
pub enum ScalarValue {
    Null,
    Boolean(bool),
    Byte(u8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    TimeSpan(TimeDelta),
    Url(url::Url),
    Uuid(uuid::Uuid),
    Any(AnyValue),
    Upload(FileHandle),
}

/// Tag of a [`ScalarValue`].
///
/// Each scalar declares the runtime type it produces,
/// and [`Scalars::get_for_runtime_type`][crate::Scalars::get_for_runtime_type]
/// maps it back to a default scalar.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RuntimeType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Decimal,
    String,
    Date,
    DateTime,
    TimeSpan,
    Url,
    Uuid,
    Any,
    Upload,
}

/// The primitive a scalar uses on the wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SerializationType {
    Boolean,
    Byte,
    Short,
    Int,
    Float,
    Decimal,
    String,
    Any,
    File,
}

/// Coarse classification of a value, for generic serialization paths and diagnostics.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ValueKind {
    Null,
    String,
    Integer,
    Float,
    Boolean,
    Enum,
    Object,
    List,
    Unknown,
}

/// A file bound to a request out of band.
///
/// Only the metadata is kept here: reading the content belongs to the transport.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,
    pub content_type: Option<String>,
    pub length: Option<u64>,
}

/// Dynamically-typed value of the `Any` scalar.
///
/// Lists and objects are shared and interior-mutable, so a caller may build a graph
/// that contains itself. Equality is structural and terminates on cyclic graphs.
#[derive(Clone)]
pub enum AnyValue {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(AnyList),
    Object(AnyObject),
}

/// A shared list of [`AnyValue`]s. Clones point to the same list.
#[derive(Clone, Default)]
pub struct AnyList(Arc<RwLock<Vec<AnyValue>>>);

/// A shared map of [`AnyValue`]s. Clones point to the same map.
#[derive(Clone, Default)]
pub struct AnyObject(Arc<RwLock<IndexMap<String, AnyValue>>>);

impl ScalarValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    /// Returns the runtime type tag, or `None` for `Null`
    pub fn runtime_type(&self) -> Option<RuntimeType> {
        Some(match self {
            ScalarValue::Null => return None,
            ScalarValue::Boolean(_) => RuntimeType::Boolean,
            ScalarValue::Byte(_) => RuntimeType::Byte,
            ScalarValue::Short(_) => RuntimeType::Short,
            ScalarValue::Int(_) => RuntimeType::Int,
            ScalarValue::Long(_) => RuntimeType::Long,
            ScalarValue::Float(_) => RuntimeType::Float,
            ScalarValue::Decimal(_) => RuntimeType::Decimal,
            ScalarValue::String(_) => RuntimeType::String,
            ScalarValue::Date(_) => RuntimeType::Date,
            ScalarValue::DateTime(_) => RuntimeType::DateTime,
            ScalarValue::TimeSpan(_) => RuntimeType::TimeSpan,
            ScalarValue::Url(_) => RuntimeType::Url,
            ScalarValue::Uuid(_) => RuntimeType::Uuid,
            ScalarValue::Any(_) => RuntimeType::Any,
            ScalarValue::Upload(_) => RuntimeType::Upload,
        })
    }

    /// Name of the runtime type, for error messages
    pub fn type_name(&self) -> &'static str {
        match self.runtime_type() {
            Some(ty) => ty.as_str(),
            None => "Null",
        }
    }
}

impl RuntimeType {
    pub fn as_str(self) -> &'static str {
        match self {
            RuntimeType::Boolean => "Boolean",
            RuntimeType::Byte => "Byte",
            RuntimeType::Short => "Short",
            RuntimeType::Int => "Int",
            RuntimeType::Long => "Long",
            RuntimeType::Float => "Float",
            RuntimeType::Decimal => "Decimal",
            RuntimeType::String => "String",
            RuntimeType::Date => "Date",
            RuntimeType::DateTime => "DateTime",
            RuntimeType::TimeSpan => "TimeSpan",
            RuntimeType::Url => "Url",
            RuntimeType::Uuid => "Uuid",
            RuntimeType::Any => "Any",
            RuntimeType::Upload => "Upload",
        }
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ValueKind {
    pub fn of_literal(value: &ast::Value) -> Self {
        match value {
            ast::Value::Null => ValueKind::Null,
            ast::Value::Boolean(_) => ValueKind::Boolean,
            ast::Value::Int(_) => ValueKind::Integer,
            ast::Value::Float(_) => ValueKind::Float,
            ast::Value::String(_) => ValueKind::String,
            ast::Value::Enum(_) => ValueKind::Enum,
            ast::Value::List(_) => ValueKind::List,
            ast::Value::Object(_) => ValueKind::Object,
            ast::Value::File(_) => ValueKind::Unknown,
        }
    }

    pub fn of_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => ValueKind::Null,
            JsonValue::Bool(_) => ValueKind::Boolean,
            JsonValue::Number(number) if number.is_f64() => ValueKind::Float,
            JsonValue::Number(_) => ValueKind::Integer,
            JsonValue::String(_) => ValueKind::String,
            JsonValue::Array(_) => ValueKind::List,
            JsonValue::Object(_) => ValueKind::Object,
        }
    }

    pub fn of_value(value: &ScalarValue) -> Self {
        match value {
            ScalarValue::Null => ValueKind::Null,
            ScalarValue::Boolean(_) => ValueKind::Boolean,
            ScalarValue::Byte(_)
            | ScalarValue::Short(_)
            | ScalarValue::Int(_)
            | ScalarValue::Long(_) => ValueKind::Integer,
            ScalarValue::Float(_) | ScalarValue::Decimal(_) => ValueKind::Float,
            ScalarValue::String(_)
            | ScalarValue::Date(_)
            | ScalarValue::DateTime(_)
            | ScalarValue::TimeSpan(_)
            | ScalarValue::Url(_)
            | ScalarValue::Uuid(_) => ValueKind::String,
            ScalarValue::Any(any) => match any {
                AnyValue::Null => ValueKind::Null,
                AnyValue::Boolean(_) => ValueKind::Boolean,
                AnyValue::Int(_) => ValueKind::Integer,
                AnyValue::Float(_) => ValueKind::Float,
                AnyValue::String(_) => ValueKind::String,
                AnyValue::List(_) => ValueKind::List,
                AnyValue::Object(_) => ValueKind::Object,
            },
            ScalarValue::Upload(_) => ValueKind::Unknown,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::Null => "Null",
            ValueKind::String => "String",
            ValueKind::Integer => "Integer",
            ValueKind::Float => "Float",
            ValueKind::Boolean => "Boolean",
            ValueKind::Enum => "Enum",
            ValueKind::Object => "Object",
            ValueKind::List => "List",
            ValueKind::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

impl FileHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            length: None,
        }
    }
}

impl AnyList {
    pub fn new(items: Vec<AnyValue>) -> Self {
        Self(Arc::new(RwLock::new(items)))
    }

    pub fn push(&self, item: AnyValue) {
        self.write().push(item)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns a copy of the current items. Nested lists and objects stay shared.
    pub fn items(&self) -> Vec<AnyValue> {
        self.read().clone()
    }

    /// Whether both handles point to the same list
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<AnyValue>> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<AnyValue>> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AnyObject {
    pub fn new(entries: IndexMap<String, AnyValue>) -> Self {
        Self(Arc::new(RwLock::new(entries)))
    }

    /// Inserts or replaces an entry, keeping the original position of an existing key
    pub fn insert(&self, key: impl Into<String>, value: AnyValue) {
        self.write().insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<AnyValue> {
        self.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns a copy of the current entries. Nested lists and objects stay shared.
    pub fn entries(&self) -> IndexMap<String, AnyValue> {
        self.read().clone()
    }

    /// Whether both handles point to the same object
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, AnyValue>> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, AnyValue>> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PartialEq for AnyValue {
    fn eq(&self, other: &Self) -> bool {
        GraphEq::default().values(self, other)
    }
}

impl PartialEq for AnyList {
    fn eq(&self, other: &Self) -> bool {
        GraphEq::default().lists(self, other)
    }
}

impl PartialEq for AnyObject {
    fn eq(&self, other: &Self) -> bool {
        GraphEq::default().objects(self, other)
    }
}

/// Structural comparison of two `Any` graphs.
///
/// A pair of containers met a second time is taken as equal: any difference below it
/// is already being checked by the first visit.
#[derive(Default)]
struct GraphEq {
    visited: HashSet<(usize, usize)>,
}

impl GraphEq {
    fn values(&mut self, a: &AnyValue, b: &AnyValue) -> bool {
        match (a, b) {
            (AnyValue::Null, AnyValue::Null) => true,
            (AnyValue::Boolean(a), AnyValue::Boolean(b)) => a == b,
            (AnyValue::Int(a), AnyValue::Int(b)) => a == b,
            (AnyValue::Float(a), AnyValue::Float(b)) => a == b,
            (AnyValue::String(a), AnyValue::String(b)) => a == b,
            (AnyValue::List(a), AnyValue::List(b)) => self.lists(a, b),
            (AnyValue::Object(a), AnyValue::Object(b)) => self.objects(a, b),
            _ => false,
        }
    }

    fn lists(&mut self, a: &AnyList, b: &AnyList) -> bool {
        if a.ptr_eq(b) || !self.visited.insert((a.addr(), b.addr())) {
            return true;
        }
        let (a, b) = (a.items(), b.items());
        a.len() == b.len() && a.iter().zip(&b).all(|(a, b)| self.values(a, b))
    }

    fn objects(&mut self, a: &AnyObject, b: &AnyObject) -> bool {
        if a.ptr_eq(b) || !self.visited.insert((a.addr(), b.addr())) {
            return true;
        }
        let (a, b) = (a.entries(), b.entries());
        a.len() == b.len()
            && a
                .iter()
                .all(|(key, a)| b.get(key).is_some_and(|b| self.values(a, b)))
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyValue::Null => f.write_str("Null"),
            AnyValue::Boolean(value) => f.debug_tuple("Boolean").field(value).finish(),
            AnyValue::Int(value) => f.debug_tuple("Int").field(value).finish(),
            AnyValue::Float(value) => f.debug_tuple("Float").field(value).finish(),
            AnyValue::String(value) => f.debug_tuple("String").field(value).finish(),
            AnyValue::List(list) => list.fmt(f),
            AnyValue::Object(object) => object.fmt(f),
        }
    }
}

// Shallow, so that printing a cyclic graph terminates
impl fmt::Debug for AnyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyList@{:#x}(len = {})", self.addr(), self.len())
    }
}

impl fmt::Debug for AnyObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self.read().keys().cloned().collect();
        write!(f, "AnyObject@{:#x}{keys:?}", self.addr())
    }
}

impl From<bool> for AnyValue {
    fn from(value: bool) -> Self {
        AnyValue::Boolean(value)
    }
}

impl From<i64> for AnyValue {
    fn from(value: i64) -> Self {
        AnyValue::Int(value)
    }
}

impl From<f64> for AnyValue {
    fn from(value: f64) -> Self {
        AnyValue::Float(value)
    }
}

impl From<&str> for AnyValue {
    fn from(value: &str) -> Self {
        AnyValue::String(value.to_owned())
    }
}

impl From<String> for AnyValue {
    fn from(value: String) -> Self {
        AnyValue::String(value)
    }
}

impl From<AnyList> for AnyValue {
    fn from(value: AnyList) -> Self {
        AnyValue::List(value)
    }
}

impl From<AnyObject> for AnyValue {
    fn from(value: AnyObject) -> Self {
        AnyValue::Object(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_equality_is_structural() {
        let a = AnyObject::default();
        a.insert("x", AnyValue::Int(1));
        let b = AnyObject::default();
        b.insert("x", AnyValue::Int(1));
        assert_eq!(AnyValue::from(a.clone()), AnyValue::from(b.clone()));
        b.insert("y", AnyValue::Null);
        assert_ne!(AnyValue::from(a), AnyValue::from(b));
    }

    #[test]
    fn any_clones_share_storage() {
        let list = AnyList::default();
        let alias = list.clone();
        alias.push(AnyValue::from("item"));
        assert_eq!(list.len(), 1);
        assert!(list.ptr_eq(&alias));
    }

    #[test]
    fn equality_of_cyclic_graphs_terminates() {
        let a = AnyObject::default();
        a.insert("me", AnyValue::Object(a.clone()));
        let b = AnyObject::default();
        b.insert("me", AnyValue::Object(b.clone()));
        assert_eq!(AnyValue::Object(a.clone()), AnyValue::Object(b.clone()));

        // Two steps around the loop on one side, one on the other
        let c = AnyObject::default();
        let d = AnyObject::default();
        c.insert("me", AnyValue::Object(d.clone()));
        d.insert("me", AnyValue::Object(c.clone()));
        assert_eq!(a, c);

        let list = AnyList::default();
        list.push(AnyValue::List(list.clone()));
        list.push(AnyValue::Int(1));
        let other = AnyList::default();
        other.push(AnyValue::List(other.clone()));
        other.push(AnyValue::Int(2));
        assert_ne!(list, other);

        b.insert("extra", AnyValue::Null);
        assert_ne!(AnyValue::Object(a), AnyValue::Object(b));
    }

    #[test]
    fn debug_of_cyclic_graph_terminates() {
        let object = AnyObject::default();
        object.insert("self", AnyValue::Object(object.clone()));
        assert!(format!("{:?}", AnyValue::Object(object)).contains("[\"self\"]"));
    }

    #[test]
    fn classifies_values() {
        assert_eq!(ValueKind::of_value(&ScalarValue::Long(1)), ValueKind::Integer);
        let float = serde_json_bytes::serde_json::Number::from_f64(1.5).unwrap();
        assert_eq!(ValueKind::of_json(&JsonValue::Number(float)), ValueKind::Float);
        assert_eq!(
            ValueKind::of_literal(&ast::Value::Enum(crate::name!(RED))),
            ValueKind::Enum
        );
        assert_eq!(ScalarValue::Null.runtime_type(), None);
    }
}
