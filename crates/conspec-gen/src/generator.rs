//! # Generator Synthesis
//!
//! Compiles a [`Spec`] into a [`Generator`] tree. Compilation is eager:
//! every reachable leaf is resolved before anything is drawn, so an
//! ungeneratable spec fails at [`build_generator`] and never partway
//! through a stream.
//!
//! ## Resolution Rules
//!
//! - A predicate resolves only if its source text names a [`BaseShape`].
//! - A conjunction's left side must be a shape predicate, directly or
//!   through nested conjunctions; the right side is kept as a refinement checked by rejection sampling, bounded by
//!   [`GeneratorConfig::max_filter_attempts`].
//! - An open-map schema draws every declared key independently.
//! - A closed-struct schema starts from the struct's defaults and
//!   overwrites only the declared keys.
//! - An alternative picks a branch uniformly and emits its tagged pair.

use std::sync::Arc;

use conspec_core::{is_valid, Key, SchemaShape, Spec, StructDef, Value};
use rand::Rng;
use tracing::{debug, warn};

use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use crate::shape::BaseShape;

/// A compiled, producible generator.
#[derive(Debug, Clone)]
pub enum Generator {
    /// Built-in base generator for a shape predicate.
    Base(BaseShape),
    /// Draws from `base` until `refinement` accepts.
    Filtered {
        base: Box<Generator>,
        refinement: Arc<Spec>,
    },
    /// Fresh map with exactly the declared keys.
    Map(Vec<(Key, Generator)>),
    /// Struct defaults with the declared keys overwritten.
    Struct {
        def: StructDef,
        fields: Vec<(Key, Generator)>,
    },
    /// Uniform choice between tagged branches.
    OneOf(Vec<(String, Generator)>),
}

/// Compile `spec` into a generator.
///
/// # Errors
///
/// Returns [`GeneratorError::Unresolvable`] for the first predicate leaf,
/// in declaration order, that is not a recognised shape.
pub fn build_generator(spec: &Spec) -> Result<Generator, GeneratorError> {
    let generator = resolve(spec)?;
    debug!(spec = %spec.describe(), "compiled generator");
    Ok(generator)
}

fn resolve(spec: &Spec) -> Result<Generator, GeneratorError> {
    match spec {
        Spec::Predicate(p) => BaseShape::from_source(p.source_text())
            .map(Generator::Base)
            .ok_or_else(|| GeneratorError::Unresolvable {
                source_text: p.source_text().to_string(),
            }),
        Spec::Conjunction { .. } => resolve_base(spec),
        Spec::Schema(schema) => {
            let fields = schema
                .keys()
                .map(|(key, spec)| Ok::<_, GeneratorError>((key.clone(), resolve(spec)?)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(match schema.shape() {
                SchemaShape::OpenMap => Generator::Map(fields),
                SchemaShape::ClosedStruct(def) => Generator::Struct {
                    def: def.clone(),
                    fields,
                },
            })
        }
        Spec::Alternative(alternative) => {
            let branches = alternative
                .branches()
                .map(|(tag, spec)| Ok::<_, GeneratorError>((tag.to_string(), resolve(spec)?)))
                .collect::<Result<Vec<_>, _>>()?;
            if branches.is_empty() {
                return Err(GeneratorError::Unresolvable {
                    source_text: spec.describe(),
                });
            }
            Ok(Generator::OneOf(branches))
        }
    }
}

/// Resolve the base of a refinement chain: a shape predicate, or a
/// conjunction whose own left side resolves the same way.
fn resolve_base(spec: &Spec) -> Result<Generator, GeneratorError> {
    match spec {
        Spec::Predicate(_) => resolve(spec),
        Spec::Conjunction { left, right } => Ok(Generator::Filtered {
            base: Box::new(resolve_base(left)?),
            refinement: Arc::clone(right),
        }),
        Spec::Schema(_) | Spec::Alternative(_) => Err(GeneratorError::Unresolvable {
            source_text: spec.describe(),
        }),
    }
}

impl Generator {
    /// Draw one value.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::FilterExhausted`] when a refinement rejects
    /// every candidate within the configured retry ceiling, and
    /// [`GeneratorError::Unresolvable`] for a hand-built `OneOf` with no
    /// branches.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        config: &GeneratorConfig,
    ) -> Result<Value, GeneratorError> {
        match self {
            Self::Base(shape) => Ok(shape.draw(rng, config)),
            Self::Filtered { base, refinement } => {
                for _ in 0..config.max_filter_attempts {
                    let candidate = base.draw(rng, config)?;
                    if is_valid(&candidate, refinement) {
                        return Ok(candidate);
                    }
                }
                let source_text = refinement.describe();
                warn!(
                    refinement = %source_text,
                    attempts = config.max_filter_attempts,
                    "refinement filter exhausted"
                );
                Err(GeneratorError::FilterExhausted {
                    source_text,
                    attempts: config.max_filter_attempts,
                })
            }
            Self::Map(fields) => {
                let mut entries = std::collections::BTreeMap::new();
                for (key, generator) in fields {
                    entries.insert(key.clone(), generator.draw(rng, config)?);
                }
                Ok(Value::Map(entries))
            }
            Self::Struct { def, fields } => {
                let mut instance = def.instantiate();
                for (key, generator) in fields {
                    instance.fields.insert(key.clone(), generator.draw(rng, config)?);
                }
                Ok(Value::Struct(instance))
            }
            Self::OneOf(branches) if branches.is_empty() => Err(GeneratorError::Unresolvable {
                source_text: "one_of([])".to_string(),
            }),
            Self::OneOf(branches) => {
                let (tag, generator) = &branches[rng.gen_range(0..branches.len())];
                Ok(Value::tagged(tag.as_str(), generator.draw(rng, config)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conspec_core::{Alternative, Schema};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn positive() -> Spec {
        Spec::predicate("&(&1 > 0)", |v| matches!(v, Value::Integer(n) if *n > 0))
    }

    #[test]
    fn test_unrecognised_predicate_fails() {
        let err = build_generator(&positive()).unwrap_err();
        assert_eq!(
            err,
            GeneratorError::Unresolvable {
                source_text: "&(&1 > 0)".into()
            }
        );
        assert_eq!(err.to_string(), "Unable to create a generator for: &(&1 > 0)");
    }

    #[test]
    fn test_nested_unresolvable_leaf_fails_whole_compile() {
        let spec: Spec = Schema::map()
            .key(Key::symbol("name"), Spec::binary())
            .key(
                Key::symbol("tags"),
                Spec::predicate("is_list(tags)", |v| matches!(v, Value::List(_))),
            )
            .into();
        let err = build_generator(&spec).unwrap_err();
        assert!(err.to_string().contains("is_list(tags)"));
    }

    #[test]
    fn test_conjunction_compiles_to_filter() {
        let spec = Spec::and(Spec::integer(), positive());
        assert!(matches!(
            build_generator(&spec).unwrap(),
            Generator::Filtered { base, .. } if matches!(*base, Generator::Base(BaseShape::Integer))
        ));
    }

    #[test]
    fn test_filtered_draws_satisfy_refinement() {
        let generator = build_generator(&Spec::and(Spec::integer(), positive())).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let config = GeneratorConfig::default();
        for _ in 0..100 {
            match generator.draw(&mut rng, &config).unwrap() {
                Value::Integer(n) => assert!(n > 0),
                other => panic!("expected integer, got {other}"),
            }
        }
    }

    #[test]
    fn test_impossible_refinement_exhausts() {
        let never = Spec::predicate("&(&1 == :never)", |_| false);
        let generator = build_generator(&Spec::and(Spec::integer(), never)).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let config = GeneratorConfig {
            max_filter_attempts: 5,
            ..GeneratorConfig::default()
        };
        assert_eq!(
            generator.draw(&mut rng, &config).unwrap_err(),
            GeneratorError::FilterExhausted {
                source_text: "&(&1 == :never)".into(),
                attempts: 5,
            }
        );
    }

    #[test]
    fn test_conjunction_over_schema_is_unresolvable() {
        let schema = Schema::map().key(Key::symbol("n"), Spec::integer());
        let spec = Spec::and(
            schema.clone(),
            Spec::predicate("is_map(x)", |v| matches!(v, Value::Map(_))),
        );
        assert_eq!(
            build_generator(&spec).unwrap_err(),
            GeneratorError::Unresolvable {
                source_text: Spec::from(schema).describe(),
            }
        );
    }

    #[test]
    fn test_conjunction_over_alternative_is_unresolvable() {
        let spec = Spec::and(
            Alternative::new().branch("int", Spec::integer()),
            Spec::predicate("is_tuple(x)", |v| matches!(v, Value::Tuple(_))),
        );
        assert!(matches!(
            build_generator(&spec),
            Err(GeneratorError::Unresolvable { source_text }) if source_text == "one_of([:int])"
        ));
    }

    #[test]
    fn test_nested_conjunction_resolves_to_chained_filters() {
        let even = Spec::predicate("&(rem(&1, 2) == 0)", |v| {
            matches!(v, Value::Integer(n) if n % 2 == 0)
        });
        let spec = Spec::and(Spec::and(Spec::integer(), positive()), even);
        let generator = build_generator(&spec).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let config = GeneratorConfig::default();
        for _ in 0..50 {
            match generator.draw(&mut rng, &config).unwrap() {
                Value::Integer(n) => assert!(n > 0 && n % 2 == 0),
                other => panic!("expected integer, got {other}"),
            }
        }
    }

    #[test]
    fn test_unresolvable_base_under_conjunction_reports_predicate() {
        let spec = Spec::and(positive(), Spec::integer());
        assert_eq!(
            build_generator(&spec).unwrap_err(),
            GeneratorError::Unresolvable {
                source_text: "&(&1 > 0)".into()
            }
        );
    }

    #[test]
    fn test_drawing_empty_one_of_errors() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = Generator::OneOf(Vec::new())
            .draw(&mut rng, &GeneratorConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            GeneratorError::Unresolvable {
                source_text: "one_of([])".into()
            }
        );
    }

    #[test]
    fn test_empty_alternative_is_unresolvable() {
        let spec: Spec = Alternative::new().into();
        assert!(matches!(
            build_generator(&spec),
            Err(GeneratorError::Unresolvable { .. })
        ));
    }
}
