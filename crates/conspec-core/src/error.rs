//! # Error Model
//!
//! Conformance failures are data, not exceptions: a failed check yields an
//! ordered, non-empty [`Violations`] list. Success is the `Ok` branch of the
//! result; an empty violation list is never used to signal failure.
//!
//! [`ConformError`] wraps a violation list for callers that want a
//! `std::error::Error`, and is the payload [`crate::must_conform`] aborts
//! with.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::Path;
use crate::value::Value;

/// Spec text recorded when a required key is absent.
pub const REQUIRED: &str = ":required";

/// Spec text recorded when a schema is applied to something that is not a map.
pub const NOT_A_MAP: &str = "is_map()";

/// A single mismatch between a value and a spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Predicate source text, [`REQUIRED`], [`NOT_A_MAP`], or a struct tag.
    pub spec: String,
    /// The value examined. For a missing key this is the container.
    pub input: Value,
    /// Where the check happened.
    pub path: Path,
}

impl Violation {
    pub fn new(spec: impl Into<String>, input: Value, path: Path) -> Self {
        Self {
            spec: spec.into(),
            input,
            path,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "val: {} fails: {}", self.input, self.spec)
        } else {
            write!(f, "val: {} in: {} fails: {}", self.input, self.path, self.spec)
        }
    }
}

/// Ordered, non-empty collection of violations from one conform call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    /// Wrap a list of violations. Returns `None` for an empty list.
    pub fn new(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    pub fn single(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Always false; kept for parity with `len`.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A value failed to conform.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("value does not conform:\n{violations}")]
pub struct ConformError {
    /// The ordered violations that caused the failure.
    pub violations: Violations,
}

impl From<Violations> for ConformError {
    fn from(violations: Violations) -> Self {
        Self { violations }
    }
}
