//! # Base Shapes
//!
//! The closed registry of shape predicates the generator can produce values
//! for. A predicate is recognised by its literal source text; anything
//! outside this set cannot be generated on its own.

use conspec_core::{source, Value};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::config::GeneratorConfig;

const MAX_ATOM_LEN: usize = 12;

/// A recognised shape with a built-in base generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseShape {
    Binary,
    Integer,
    Float,
    Boolean,
    Nil,
    Atom,
}

impl BaseShape {
    /// Every registered shape.
    pub const ALL: [BaseShape; 6] = [
        Self::Binary,
        Self::Integer,
        Self::Float,
        Self::Boolean,
        Self::Nil,
        Self::Atom,
    ];

    /// Look up the shape a predicate's source text denotes.
    pub fn from_source(source_text: &str) -> Option<Self> {
        match source_text {
            source::BINARY => Some(Self::Binary),
            source::INTEGER => Some(Self::Integer),
            source::FLOAT => Some(Self::Float),
            source::BOOLEAN => Some(Self::Boolean),
            source::NIL => Some(Self::Nil),
            source::ATOM => Some(Self::Atom),
            _ => None,
        }
    }

    /// The canonical source text of this shape's predicate.
    pub fn source_text(self) -> &'static str {
        match self {
            Self::Binary => source::BINARY,
            Self::Integer => source::INTEGER,
            Self::Float => source::FLOAT,
            Self::Boolean => source::BOOLEAN,
            Self::Nil => source::NIL,
            Self::Atom => source::ATOM,
        }
    }

    /// Draw one value of this shape.
    pub fn draw<R: Rng + ?Sized>(self, rng: &mut R, config: &GeneratorConfig) -> Value {
        match self {
            Self::Binary => {
                let len = rng.gen_range(0..=config.max_string_len);
                let s: String = (0..len)
                    .map(|_| char::from(rng.sample(Alphanumeric)))
                    .collect();
                Value::String(s)
            }
            Self::Integer => {
                let (lo, hi) = ordered(config.integer_min, config.integer_max);
                Value::Integer(rng.gen_range(lo..=hi))
            }
            Self::Float => {
                let (lo, hi) = if config.float_min <= config.float_max {
                    (config.float_min, config.float_max)
                } else {
                    (config.float_max, config.float_min)
                };
                Value::Float(rng.gen_range(lo..=hi))
            }
            Self::Boolean => Value::Bool(rng.gen()),
            Self::Nil => Value::Nil,
            Self::Atom => {
                let len = rng.gen_range(1..=MAX_ATOM_LEN);
                let name: String = (0..len)
                    .map(|_| char::from(b'a' + rng.gen_range(0..26u8)))
                    .collect();
                Value::Symbol(name)
            }
        }
    }
}

fn ordered(a: i64, b: i64) -> (i64, i64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
