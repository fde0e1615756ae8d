//! # Spec Nodes
//!
//! The spec algebra: [`Spec::Predicate`] leaves, [`Spec::Conjunction`]
//! refinements, keyed [`Schema`]s and tagged [`Alternative`]s.
//!
//! A spec is immutable once built. Child nodes sit behind `Arc`, so a spec
//! can be reused inside any number of larger specs and shared across
//! threads; neither conforming nor generating ever mutates it.
//!
//! ## Source Text
//!
//! Every predicate carries the literal text it was authored as. That text
//! is copied verbatim into violations and generator errors, and the
//! generator recognises the built-in shape predicates by it (see
//! [`source`]).

use std::fmt;
use std::sync::Arc;

use crate::value::{Key, StructDef, Value};

/// Canonical source texts of the built-in shape predicates.
pub mod source {
    pub const BINARY: &str = "is_binary()";
    pub const INTEGER: &str = "is_integer()";
    pub const FLOAT: &str = "is_float()";
    pub const BOOLEAN: &str = "is_boolean()";
    pub const NIL: &str = "is_nil()";
    pub const ATOM: &str = "is_atom()";
}

/// Boolean test applied by a predicate leaf.
pub type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;

/// A leaf check: an opaque test plus its literal source text.
#[derive(Clone)]
pub struct Predicate {
    source_text: String,
    test: Arc<PredicateFn>,
}

impl Predicate {
    pub fn new<F>(source_text: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            source_text: source_text.into(),
            test: Arc::new(test),
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn test(&self, value: &Value) -> bool {
        (self.test)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.source_text).finish()
    }
}

/// How a [`Schema`] treats its input container.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaShape {
    /// Any map; undeclared keys are dropped from the conformed result.
    OpenMap,
    /// A struct with exactly this tag; returned untrimmed on success.
    ClosedStruct(StructDef),
}

/// Keyed schema: every declared key is required and checked against its spec.
#[derive(Debug, Clone)]
pub struct Schema {
    keys: Vec<(Key, Arc<Spec>)>,
    shape: SchemaShape,
}

impl Schema {
    /// An open-map schema with no keys yet.
    pub fn map() -> Self {
        Self {
            keys: Vec::new(),
            shape: SchemaShape::OpenMap,
        }
    }

    /// A closed-struct schema for the given struct type.
    pub fn closed(def: StructDef) -> Self {
        Self {
            keys: Vec::new(),
            shape: SchemaShape::ClosedStruct(def),
        }
    }

    /// Declare a required key. Declaration order is preserved.
    pub fn key(mut self, key: Key, spec: impl Into<Spec>) -> Self {
        self.keys.push((key, Arc::new(spec.into())));
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = (&Key, &Spec)> {
        self.keys.iter().map(|(k, s)| (k, s.as_ref()))
    }

    pub fn shape(&self) -> &SchemaShape {
        &self.shape
    }
}

/// Tagged alternative: the first branch, in declaration order, that matches wins.
#[derive(Debug, Clone, Default)]
pub struct Alternative {
    branches: Vec<(String, Arc<Spec>)>,
}

impl Alternative {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a branch under `tag`.
    pub fn branch(mut self, tag: impl Into<String>, spec: impl Into<Spec>) -> Self {
        self.branches.push((tag.into(), Arc::new(spec.into())));
        self
    }

    pub fn branches(&self) -> impl Iterator<Item = (&str, &Spec)> {
        self.branches.iter().map(|(t, s)| (t.as_str(), s.as_ref()))
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

/// A node of the spec algebra.
#[derive(Debug, Clone)]
pub enum Spec {
    Predicate(Predicate),
    /// Both sides must hold; `right` is checked against `left`'s result.
    Conjunction { left: Arc<Spec>, right: Arc<Spec> },
    Schema(Schema),
    Alternative(Alternative),
}

impl Spec {
    /// A predicate leaf with the given literal source text.
    pub fn predicate<F>(source_text: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Predicate::new(source_text, test))
    }

    /// Conjunction of `left` and `right`.
    pub fn and(left: impl Into<Spec>, right: impl Into<Spec>) -> Self {
        Self::Conjunction {
            left: Arc::new(left.into()),
            right: Arc::new(right.into()),
        }
    }

    /// Wrap a built [`Schema`].
    pub fn schema(schema: Schema) -> Self {
        Self::Schema(schema)
    }

    /// Alternative over `(tag, spec)` branches, in iteration order.
    pub fn one_of<I, T, S>(branches: I) -> Self
    where
        I: IntoIterator<Item = (T, S)>,
        T: Into<String>,
        S: Into<Spec>,
    {
        Self::Alternative(
            branches
                .into_iter()
                .fold(Alternative::new(), |alt, (tag, spec)| alt.branch(tag, spec)),
        )
    }

    pub fn binary() -> Self {
        Self::predicate(source::BINARY, |v| matches!(v, Value::String(_)))
    }

    pub fn integer() -> Self {
        Self::predicate(source::INTEGER, |v| matches!(v, Value::Integer(_)))
    }

    pub fn float() -> Self {
        Self::predicate(source::FLOAT, |v| matches!(v, Value::Float(_)))
    }

    pub fn boolean() -> Self {
        Self::predicate(source::BOOLEAN, |v| matches!(v, Value::Bool(_)))
    }

    pub fn nil() -> Self {
        Self::predicate(source::NIL, |v| matches!(v, Value::Nil))
    }

    pub fn atom() -> Self {
        Self::predicate(source::ATOM, |v| matches!(v, Value::Symbol(_)))
    }

    /// Node kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Predicate(_) => "predicate",
            Self::Conjunction { .. } => "conjunction",
            Self::Schema(_) => "schema",
            Self::Alternative(_) => "alternative",
        }
    }

    /// Human-readable rendering of the node, used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Predicate(p) => p.source_text().to_string(),
            Self::Conjunction { left, right } => {
                format!("{} and {}", left.describe(), right.describe())
            }
            Self::Schema(s) => match s.shape() {
                SchemaShape::OpenMap => {
                    let keys: Vec<String> = s.keys().map(|(k, _)| k.to_string()).collect();
                    format!("schema(%{{{}}})", keys.join(", "))
                }
                SchemaShape::ClosedStruct(def) => format!("schema(%{}{{}})", def.tag()),
            },
            Self::Alternative(a) => {
                let tags: Vec<String> = a.branches().map(|(t, _)| format!(":{t}")).collect();
                format!("one_of([{}])", tags.join(", "))
            }
        }
    }
}

impl From<Predicate> for Spec {
    fn from(p: Predicate) -> Self {
        Self::Predicate(p)
    }
}

impl From<Schema> for Spec {
    fn from(s: Schema) -> Self {
        Self::Schema(s)
    }
}

impl From<Alternative> for Spec {
    fn from(a: Alternative) -> Self {
        Self::Alternative(a)
    }
}
