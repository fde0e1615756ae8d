//! # Value Model
//!
//! The dynamic values the engine conforms and the generator produces.
//!
//! ## Key Kinds
//!
//! A [`Key`] is either a string key or a symbolic key. The two never
//! compare equal and are never coerced into one another: a schema declared
//! over `Key::symbol("name")` does not match an input map keyed by
//! `Key::string("name")`. The variant survives into violation paths.
//!
//! ## Structs
//!
//! Structs are nominal. A [`StructValue`] carries its tag, and a
//! [`StructDef`] describes a struct type by tag plus ordered field defaults.
//! Matching a struct against a closed schema is a tag-equality check, never
//! a structural one.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A map or struct key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A string key, e.g. a JSON object key.
    String(String),
    /// A symbolic, atom-like key.
    Symbol(String),
}

impl Key {
    /// Build a string key.
    pub fn string(name: impl Into<String>) -> Self {
        Self::String(name.into())
    }

    /// Build a symbolic key.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// The key's name without its kind.
    pub fn name(&self) -> &str {
        match self {
            Self::String(s) | Self::Symbol(s) => s,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Symbol(s) => write!(f, ":{s}"),
        }
    }
}

/// An instance of a nominal struct type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructValue {
    /// Fully-qualified struct tag.
    pub tag: String,
    /// Field values by key.
    pub fields: BTreeMap<Key, Value>,
}

impl StructValue {
    /// Set a field, returning the updated struct.
    pub fn with(mut self, key: Key, value: impl Into<Value>) -> Self {
        self.fields.insert(key, value.into());
        self
    }
}

/// Descriptor of a nominal struct type: its tag and default field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDef {
    tag: String,
    fields: Vec<(Key, Value)>,
}

impl StructDef {
    /// Define a struct type with no fields yet.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            fields: Vec::new(),
        }
    }

    /// Declare a field with its default value.
    pub fn field(mut self, key: Key, default: impl Into<Value>) -> Self {
        self.fields.push((key, default.into()));
        self
    }

    /// The fully-qualified struct tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Declared fields with their defaults, in declaration order.
    pub fn fields(&self) -> &[(Key, Value)] {
        &self.fields
    }

    /// Build an instance populated with every field's default.
    pub fn instantiate(&self) -> StructValue {
        StructValue {
            tag: self.tag.clone(),
            fields: self.fields.iter().cloned().collect(),
        }
    }
}

/// A dynamic value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    /// A UTF-8 string (binary).
    String(String),
    /// A symbolic atom.
    Symbol(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Map(BTreeMap<Key, Value>),
    Struct(StructValue),
}

impl Value {
    /// Build a map value from key/value pairs.
    pub fn map<I, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Key, V)>,
        V: Into<Value>,
    {
        Self::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
    }

    /// Build a symbol value.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// The `(tag, value)` pair an alternative produces for its matching branch.
    pub fn tagged(tag: impl Into<String>, value: Value) -> Self {
        Self::Tuple(vec![Self::Symbol(tag.into()), value])
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "binary",
            Self::Symbol(_) => "atom",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Map(_) => "map",
            Self::Struct(_) => "struct",
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<Key, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a key in a map or struct value.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        match self {
            Self::Map(m) => m.get(key),
            Self::Struct(s) => s.fields.get(key),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<StructValue> for Value {
    fn from(s: StructValue) -> Self {
        Self::Struct(s)
    }
}

/// JSON objects become maps with string keys; arrays become lists.
/// Unsigned integers beyond `i64::MAX` fall back to floats.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Nil,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(xs) => Self::List(xs.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(obj) => Self::Map(
                obj.into_iter()
                    .map(|(k, v)| (Key::String(k), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_entries(f: &mut fmt::Formatter<'_>, entries: &BTreeMap<Key, Value>) -> fmt::Result {
    for (i, (k, v)) in entries.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{k} => {v}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Symbol(s) => write!(f, ":{s}"),
            Self::List(xs) => {
                write!(f, "[")?;
                write_seq(f, xs)?;
                write!(f, "]")
            }
            Self::Tuple(xs) => {
                write!(f, "{{")?;
                write_seq(f, xs)?;
                write!(f, "}}")
            }
            Self::Map(m) => {
                write!(f, "%{{")?;
                write_entries(f, m)?;
                write!(f, "}}")
            }
            Self::Struct(s) => {
                write!(f, "%{}{{", s.tag)?;
                write_entries(f, &s.fields)?;
                write!(f, "}}")
            }
        }
    }
}
