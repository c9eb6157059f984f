//! Mapped values and objects

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Number};

use crate::case::to_snake_case;
use crate::error::{MapError, MapResult};

/// A JSON value after mapping.
///
/// Objects and arrays are wrapped recursively; scalars pass through. The
/// `DateTime` variant only appears after a view has coerced a timestamp field.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    DateTime(DateTime<Utc>),
    Object(MappedObject),
    Array(MappedArray),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "a boolean",
            Self::Number(_) => "a number",
            Self::String(_) => "a string",
            Self::DateTime(_) => "a timestamp",
            Self::Object(_) => "an object",
            Self::Array(_) => "an array",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&MappedObject> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&MappedArray> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        map_value(json)
    }
}

/// Recursively wrap a JSON value: objects and arrays are mapped, scalars pass
/// through unchanged.
pub fn map_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => Value::Number(n),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Array(MappedArray::new(items)),
        serde_json::Value::Object(map) => Value::Object(MappedObject::from_map(map)),
    }
}

/// A JSON array whose elements are wrapped on read.
#[derive(Debug, Clone, Default)]
pub struct MappedArray {
    items: Vec<serde_json::Value>,
}

impl MappedArray {
    pub fn new(items: Vec<serde_json::Value>) -> Self {
        Self { items }
    }

    /// Wrap and return the element at `index`.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.get(index).cloned().map(map_value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        self.items.iter().cloned().map(map_value)
    }

    /// The undecorated JSON elements.
    pub fn raw(&self) -> &[serde_json::Value] {
        &self.items
    }
}

/// Structural, except that numbers compare by value: `1` equals `1.0`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => numbers_equal(a, b),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            _ => false,
        }
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a == b;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

impl PartialEq for MappedArray {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

#[derive(Debug, Clone)]
enum Repr {
    Fields(BTreeMap<String, Value>),
    Sequence(MappedArray),
}

impl Default for Repr {
    fn default() -> Self {
        Self::Fields(BTreeMap::new())
    }
}

/// An attribute-addressable view over a JSON object (or a JSON array root).
///
/// Attribute names are the snake_case form of the original keys. Instances are
/// immutable once built; views only touch them during construction.
#[derive(Debug, Clone, Default)]
pub struct MappedObject {
    repr: Repr,
}

impl MappedObject {
    /// Map a decoded JSON payload. Scalars are rejected since they carry no
    /// attributes.
    pub fn from_json(json: serde_json::Value) -> MapResult<Self> {
        match json {
            serde_json::Value::Object(map) => Ok(Self::from_map(map)),
            serde_json::Value::Array(items) => Ok(Self {
                repr: Repr::Sequence(MappedArray::new(items)),
            }),
            other => Err(MapError::NotAContainer(map_value(other).type_name())),
        }
    }

    pub(crate) fn from_map(map: Map<String, serde_json::Value>) -> Self {
        let fields = map
            .into_iter()
            .map(|(key, value)| (to_snake_case(&key), map_value(value)))
            .collect();
        Self {
            repr: Repr::Fields(fields),
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.repr, Repr::Sequence(_))
    }

    /// Look up an attribute, returning `None` when it is absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match &self.repr {
            Repr::Fields(fields) => fields.get(name),
            Repr::Sequence(_) => None,
        }
    }

    /// Look up an attribute, failing when it is absent.
    pub fn attr(&self, name: &str) -> MapResult<&Value> {
        self.get(name)
            .ok_or_else(|| MapError::MissingAttribute(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn str(&self, name: &str) -> MapResult<&str> {
        self.attr(name)?
            .as_str()
            .ok_or_else(|| unexpected(name, "a string"))
    }

    pub fn i64(&self, name: &str) -> MapResult<i64> {
        self.attr(name)?
            .as_i64()
            .ok_or_else(|| unexpected(name, "an integer"))
    }

    pub fn bool(&self, name: &str) -> MapResult<bool> {
        self.attr(name)?
            .as_bool()
            .ok_or_else(|| unexpected(name, "a boolean"))
    }

    pub fn object(&self, name: &str) -> MapResult<&MappedObject> {
        self.attr(name)?
            .as_object()
            .ok_or_else(|| unexpected(name, "an object"))
    }

    pub fn array(&self, name: &str) -> MapResult<&MappedArray> {
        self.attr(name)?
            .as_array()
            .ok_or_else(|| unexpected(name, "an array"))
    }

    pub fn datetime(&self, name: &str) -> MapResult<DateTime<Utc>> {
        self.attr(name)?
            .as_datetime()
            .ok_or_else(|| unexpected(name, "a timestamp"))
    }

    /// Wrap and return the element at `index` of an array root.
    pub fn index(&self, index: usize) -> Option<Value> {
        match &self.repr {
            Repr::Sequence(items) => items.get(index),
            Repr::Fields(_) => None,
        }
    }

    /// Number of attributes, or of elements for an array root.
    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Fields(fields) => fields.len(),
            Repr::Sequence(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_> {
        match &self.repr {
            Repr::Fields(fields) => Box::new(fields.iter().map(|(k, v)| (k.as_str(), v))),
            Repr::Sequence(_) => Box::new(std::iter::empty()),
        }
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        match &mut self.repr {
            Repr::Fields(fields) => fields.get_mut(name),
            Repr::Sequence(_) => None,
        }
    }

    pub(crate) fn values_mut(&mut self) -> Box<dyn Iterator<Item = (&str, &mut Value)> + '_> {
        match &mut self.repr {
            Repr::Fields(fields) => Box::new(fields.iter_mut().map(|(k, v)| (k.as_str(), v))),
            Repr::Sequence(_) => Box::new(std::iter::empty()),
        }
    }
}

fn unexpected(name: &str, expected: &'static str) -> MapError {
    MapError::UnexpectedType {
        name: name.to_string(),
        expected,
    }
}

/// Structural equality over public attributes.
///
/// Attributes whose name starts with `_` are ignored, and an attribute missing
/// on one side compares equal to `null` on the other.
impl PartialEq for MappedObject {
    fn eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Fields(lhs), Repr::Fields(rhs)) => lhs
                .keys()
                .chain(rhs.keys())
                .filter(|name| !name.starts_with('_'))
                .all(|name| match (lhs.get(name), rhs.get(name)) {
                    (Some(a), Some(b)) => a == b,
                    (Some(v), None) | (None, Some(v)) => v.is_null(),
                    (None, None) => true,
                }),
            (Repr::Sequence(lhs), Repr::Sequence(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}
