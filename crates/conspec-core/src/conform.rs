//! # Conformance Engine
//!
//! Recursively checks a [`Value`] against a [`Spec`], threading a [`Path`]
//! through every descent. Success returns the conformed value; failure
//! returns the ordered [`Violations`].
//!
//! ## Ordering Contract
//!
//! - **Schema**: per-key violation groups are accumulated newest-first and
//!   the group order is reported as-is, so the observed order is the
//!   reverse of key declaration. Violations within one key's group keep
//!   their own order.
//! - **Alternative**: branch violation lists are concatenated in branch
//!   declaration order, without reversal.
//!
//! Both orders are observable by callers and are fixed.

use std::collections::BTreeMap;
use std::panic;

use tracing::{debug, trace};

use crate::error::{ConformError, Violation, Violations, NOT_A_MAP, REQUIRED};
use crate::path::{Path, Segment};
use crate::spec::{Alternative, Predicate, Schema, SchemaShape, Spec};
use crate::value::{Key, Value};

/// Conform `value` against `spec` from the root path.
///
/// # Errors
///
/// Returns the ordered violations if `value` does not satisfy `spec`.
pub fn conform(value: &Value, spec: &Spec) -> Result<Value, Violations> {
    conform_at(value, spec, &Path::root())
}

/// Conform `value` against `spec`, reporting violations relative to `path`.
///
/// # Errors
///
/// Returns the ordered violations if `value` does not satisfy `spec`.
pub fn conform_at(value: &Value, spec: &Spec, path: &Path) -> Result<Value, Violations> {
    trace!(path = %path, kind = spec.kind(), "conform");
    match spec {
        Spec::Predicate(p) => conform_predicate(value, p, path),
        Spec::Conjunction { left, right } => {
            let refined = conform_at(value, left, path)?;
            conform_at(&refined, right, path)
        }
        Spec::Schema(s) => conform_schema(value, s, path),
        Spec::Alternative(a) => conform_alternative(value, a, path),
    }
}

/// Like [`conform`], but aborts the caller on failure.
///
/// The panic payload is a [`ConformError`] carrying the violations, so a
/// supervising `catch_unwind` can downcast and inspect it.
pub fn must_conform(value: &Value, spec: &Spec) -> Value {
    match conform(value, spec) {
        Ok(v) => v,
        Err(violations) => panic::panic_any(ConformError { violations }),
    }
}

/// Whether `value` satisfies `spec`.
pub fn is_valid(value: &Value, spec: &Spec) -> bool {
    conform(value, spec).is_ok()
}

/// Render violations one per line for humans.
pub fn explain(violations: &Violations) -> String {
    violations.to_string()
}

fn conform_predicate(value: &Value, predicate: &Predicate, path: &Path) -> Result<Value, Violations> {
    if predicate.test(value) {
        Ok(value.clone())
    } else {
        Err(Violations::single(Violation::new(
            predicate.source_text(),
            value.clone(),
            path.clone(),
        )))
    }
}

fn conform_schema(value: &Value, schema: &Schema, path: &Path) -> Result<Value, Violations> {
    match schema.shape() {
        SchemaShape::OpenMap => {
            let Value::Map(entries) = value else {
                return Err(Violations::single(Violation::new(
                    NOT_A_MAP,
                    value.clone(),
                    path.clone(),
                )));
            };
            let conformed = conform_keys(value, schema, path, |k| entries.get(k))?;
            Ok(Value::Map(conformed))
        }
        SchemaShape::ClosedStruct(def) => match value {
            Value::Struct(s) if s.tag == def.tag() => {
                conform_keys(value, schema, path, |k| s.fields.get(k))?;
                Ok(value.clone())
            }
            _ => {
                debug!(path = %path, tag = def.tag(), found = value.kind(), "struct tag mismatch");
                Err(Violations::single(Violation::new(
                    def.tag(),
                    value.clone(),
                    path.clone(),
                )))
            }
        },
    }
}

/// Check every declared key of `schema` against `container`.
///
/// Returns the conformed values of the declared keys only.
fn conform_keys<'v, F>(
    container: &'v Value,
    schema: &Schema,
    path: &Path,
    lookup: F,
) -> Result<BTreeMap<Key, Value>, Violations>
where
    F: Fn(&Key) -> Option<&'v Value>,
{
    let mut conformed = BTreeMap::new();
    let mut groups: Vec<Vec<Violation>> = Vec::new();

    for (key, spec) in schema.keys() {
        let key_path = path.child(key.clone());
        match lookup(key) {
            None => groups.push(vec![Violation::new(REQUIRED, container.clone(), key_path)]),
            Some(v) => match conform_at(v, spec, &key_path) {
                Ok(c) => {
                    conformed.insert(key.clone(), c);
                }
                Err(violations) => groups.push(violations.into_inner()),
            },
        }
    }

    groups.reverse();
    match Violations::new(groups.into_iter().flatten().collect()) {
        None => Ok(conformed),
        Some(violations) => {
            debug!(path = %path, count = violations.len(), "schema rejected input");
            Err(violations)
        }
    }
}

fn conform_alternative(
    value: &Value,
    alternative: &Alternative,
    path: &Path,
) -> Result<Value, Violations> {
    let mut errors = Vec::new();
    for (tag, spec) in alternative.branches() {
        let branch_path = path.child(Segment::Branch(tag.to_string()));
        match conform_at(value, spec, &branch_path) {
            Ok(v) => return Ok(Value::tagged(tag, v)),
            Err(violations) => errors.extend(violations),
        }
    }

    debug!(path = %path, "no alternative branch matched");
    Err(Violations::new(errors).unwrap_or_else(|| {
        Violations::single(Violation::new(
            Spec::Alternative(alternative.clone()).describe(),
            value.clone(),
            path.clone(),
        ))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::StructDef;
    use serde_json::json;

    fn user_schema() -> Spec {
        Schema::map()
            .key(Key::string("name"), Spec::binary())
            .key(Key::string("age"), Spec::integer())
            .into()
    }

    fn positive() -> Spec {
        Spec::predicate("&(&1 > 0)", |v| matches!(v, Value::Integer(n) if *n > 0))
    }

    #[test]
    fn test_predicate_success_returns_value_unchanged() {
        let v = Value::from("chris");
        assert_eq!(conform(&v, &Spec::binary()).unwrap(), v);
    }

    #[test]
    fn test_predicate_failure_records_source_text() {
        let err = conform(&Value::Integer(1), &Spec::binary()).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.violations()[0].spec, "is_binary()");
        assert_eq!(err.violations()[0].input, Value::Integer(1));
        assert!(err.violations()[0].path.is_root());
    }

    #[test]
    fn test_conjunction_short_circuits_on_left_failure() {
        let spec = Spec::and(Spec::integer(), positive());
        let err = conform(&Value::from("x"), &spec).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.violations()[0].spec, "is_integer()");
    }

    #[test]
    fn test_conjunction_applies_refinement() {
        let spec = Spec::and(Spec::integer(), positive());
        assert_eq!(conform(&Value::Integer(4), &spec).unwrap(), Value::Integer(4));
        let err = conform(&Value::Integer(-4), &spec).unwrap_err();
        assert_eq!(err.violations()[0].spec, "&(&1 > 0)");
    }

    #[test]
    fn test_schema_trims_undeclared_keys() {
        let schema: Spec = Schema::map().key(Key::string("name"), Spec::binary()).into();
        let input = Value::from(json!({"name": "chris", "age": 31}));
        assert_eq!(
            conform(&input, &schema).unwrap(),
            Value::from(json!({"name": "chris"}))
        );
    }

    #[test]
    fn test_schema_missing_key_reports_container() {
        let input = Value::from(json!({"name": "chris"}));
        let err = conform(&input, &user_schema()).unwrap_err();
        assert_eq!(
            err.into_inner(),
            vec![Violation::new(
                REQUIRED,
                input,
                Path::root().child(Key::string("age"))
            )]
        );
    }

    #[test]
    fn test_schema_rejects_non_map_with_one_violation() {
        let err = conform(&Value::Integer(3), &user_schema()).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.violations()[0].spec, NOT_A_MAP);
        assert!(err.violations()[0].path.is_root());
    }

    #[test]
    fn test_schema_nested_paths() {
        let schema: Spec = Schema::map()
            .key(Key::symbol("user"), user_schema())
            .into();
        let input = Value::map([(Key::symbol("user"), Value::from(json!({"name": 1, "age": 2})))]);
        let err = conform(&input, &schema).unwrap_err();
        assert_eq!(err.len(), 1);
        let path: Vec<String> = err.violations()[0]
            .path
            .segments()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(path, [":user", "\"name\""]);
    }

    #[test]
    fn test_closed_struct_passes_other_fields_through() {
        let def = StructDef::new("App.User")
            .field(Key::symbol("name"), Value::Nil)
            .field(Key::symbol("age"), Value::Nil);
        let schema: Spec = Schema::closed(def.clone())
            .key(Key::symbol("name"), Spec::binary())
            .into();
        let user = Value::from(
            def.instantiate()
                .with(Key::symbol("name"), "chris")
                .with(Key::symbol("age"), "not an int"),
        );
        assert_eq!(conform(&user, &schema).unwrap(), user);
    }

    #[test]
    fn test_closed_struct_rejects_plain_map() {
        let schema: Spec = Schema::closed(StructDef::new("App.User"))
            .key(Key::symbol("name"), Spec::binary())
            .into();
        let input = Value::map([(Key::symbol("name"), "chris")]);
        let err = conform(&input, &schema).unwrap_err();
        assert_eq!(err.into_inner(), vec![Violation::new("App.User", input, Path::root())]);
    }

    #[test]
    fn test_alternative_returns_tagged_pair() {
        let spec: Spec = Alternative::new()
            .branch("bool", Spec::boolean())
            .branch("int", Spec::integer())
            .into();
        assert_eq!(
            conform(&Value::Integer(7), &spec).unwrap(),
            Value::tagged("int", Value::Integer(7))
        );
    }

    #[test]
    fn test_alternative_first_match_wins() {
        let spec: Spec = Alternative::new()
            .branch("any_int", Spec::integer())
            .branch("positive", Spec::and(Spec::integer(), positive()))
            .into();
        assert_eq!(
            conform(&Value::Integer(7), &spec).unwrap(),
            Value::tagged("any_int", Value::Integer(7))
        );
    }

    #[test]
    fn test_empty_alternative_still_fails_with_a_violation() {
        let spec: Spec = Alternative::new().into();
        let err = conform(&Value::Nil, &spec).unwrap_err();
        assert_eq!(err.violations()[0].spec, "one_of([])");
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid(&Value::from(json!({"name": "a", "age": 1})), &user_schema()));
        assert!(!is_valid(&Value::Nil, &user_schema()));
    }

    #[test]
    fn test_explain_one_line_per_violation() {
        let err = conform(&Value::from(json!({})), &user_schema()).unwrap_err();
        let text = explain(&err);
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().next().unwrap().contains("in: \"age\" fails: :required"));
    }
}
