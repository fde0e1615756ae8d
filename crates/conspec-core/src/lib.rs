//! # conspec-core — Spec Algebra & Conformance Engine
//!
//! Decides whether a dynamic [`Value`] satisfies a composable [`Spec`], and
//! when it does not, reports a precise, path-addressed list of
//! [`Violation`]s.
//!
//! ## Spec Algebra (`spec`)
//!
//! - **Predicate**: an opaque boolean test plus its literal source text.
//! - **Conjunction**: a shape check refined by a second spec.
//! - **Schema**: required keys over an open map, or over a closed struct
//!   identified by tag.
//! - **Alternative**: tagged branches; the first matching branch wins.
//!
//! ## Engine (`conform`)
//!
//! - [`conform`] / [`conform_at`]: return `Ok(conformed)` or `Err(violations)`.
//! - [`must_conform`]: aborts the caller with a [`ConformError`] payload.
//! - [`is_valid`], [`explain`]: convenience wrappers.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `conspec-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - Specs are immutable and `Send + Sync`; conforming never mutates them.
//! - No coercion: the only transformation is trimming undeclared keys from
//!   open-map schemas and tagging alternative results.

pub mod conform;
pub mod error;
pub mod path;
pub mod spec;
pub mod value;

pub use conform::{conform, conform_at, explain, is_valid, must_conform};
pub use error::{ConformError, Violation, Violations, NOT_A_MAP, REQUIRED};
pub use path::{Path, Segment};
pub use spec::{source, Alternative, Predicate, PredicateFn, Schema, SchemaShape, Spec};
pub use value::{Key, StructDef, StructValue, Value};
