//! # Paths
//!
//! A [`Path`] locates a sub-check inside a composite input: the keys and
//! branch tags walked from the root to reach it. Paths are immutable; each
//! descent builds a fresh child with [`Path::child`], so sibling branches
//! never observe one another's segments.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Key;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    /// Descent into a map or struct key.
    Key(Key),
    /// Descent into a named alternative branch.
    Branch(String),
}

impl From<Key> for Segment {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => write!(f, "{k}"),
            Self::Branch(tag) => write!(f, ":{tag}"),
        }
    }
}

/// Ordered sequence of segments, empty at the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path(Vec<Segment>);

impl Path {
    /// The empty path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// A new path extending this one by a single segment.
    pub fn child(&self, segment: impl Into<Segment>) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend(self.0.iter().cloned());
        segments.push(segment.into());
        Self(segments)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_does_not_mutate_parent() {
        let parent = Path::root().child(Key::symbol("user"));
        let a = parent.child(Key::symbol("name"));
        let b = parent.child(Segment::Branch("int".into()));
        assert_eq!(parent.len(), 1);
        assert_eq!(a.segments()[1], Segment::Key(Key::symbol("name")));
        assert_eq!(b.segments()[1], Segment::Branch("int".into()));
    }

    #[test]
    fn test_display_joins_segments() {
        let p = Path::root()
            .child(Key::symbol("user"))
            .child(Key::string("email"))
            .child(Segment::Branch("ok".into()));
        assert_eq!(p.to_string(), r#":user/"email"/:ok"#);
        assert_eq!(Path::root().to_string(), "");
    }
}
