//! Key reconciliation.
//!
//! A call partitions the input keys into verbatim field matches and the
//! rest, rewrites the rest with the configured transformations, builds the
//! record from the merged map and finally re-keys the residual with the
//! keys the caller supplied.

use std::collections::BTreeMap;

use keyfit_schema::{Record, RecordType, TextMap, TypeRegistry};

use crate::transform::Transformation;

/// Outcome of reconciling one input map.
///
/// `rest` holds every input entry that did not populate a field, keyed by
/// its original key.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Reconciliation {
    pub record: Record,
    pub rest: TextMap,
}

/// Original key to the key used for matching.
#[derive(Debug, Default)]
struct KeyTrace {
    traced: BTreeMap<String, String>,
}

impl KeyTrace {
    fn build(
        matching: &[String],
        non_matching: &[String],
        transformations: &[Transformation],
    ) -> Self {
        let mut traced = BTreeMap::new();
        for key in matching {
            traced.insert(key.clone(), key.clone());
        }
        for key in non_matching {
            let transformed = transformations
                .iter()
                .fold(key.clone(), |current, t| t.apply(&current));
            if transformed != *key {
                tracing::trace!(original = %key, transformed = %transformed, "Transformed key");
            }
            traced.insert(key.clone(), transformed);
        }
        Self { traced }
    }

    fn used_key<'a>(&'a self, original: &'a str) -> &'a str {
        self.traced.get(original).map_or(original, String::as_str)
    }

    fn is_changed(&self, original: &str) -> bool {
        self.used_key(original) != original
    }
}

/// Merged input plus the bookkeeping needed to undo the renaming.
#[derive(Debug, Default)]
struct Merged {
    fields: TextMap,
    /// Used key to the original key whose value it holds.
    owners: BTreeMap<String, String>,
    /// Entries overwritten by a colliding transformed key, by original key.
    displaced: TextMap,
}

/// Applies the trace to `source`.
///
/// Untouched entries go in first and transformed entries over them, each
/// group in key order, so a collision is always won by the transformed
/// entry with the greatest original key.
fn merge(source: TextMap, trace: &KeyTrace) -> Merged {
    let (untouched, transformed): (Vec<_>, Vec<_>) = source
        .into_iter()
        .partition(|(key, _)| !trace.is_changed(key));

    let mut merged = Merged::default();
    for (original, value) in untouched.into_iter().chain(transformed) {
        let used = trace.used_key(&original).to_string();
        if let Some(previous) = merged.owners.insert(used.clone(), original.clone())
            && let Some(previous_value) = merged.fields.remove(&used)
        {
            tracing::warn!(
                key = %used,
                kept = %original,
                displaced = %previous,
                "Transformed key collides with another input key"
            );
            merged.displaced.insert(previous, previous_value);
        }
        merged.fields.insert(used, value);
    }
    merged
}

/// Re-keys a residual map from used keys back to original keys.
fn dealias(residual: TextMap, owners: &BTreeMap<String, String>) -> TextMap {
    residual
        .into_iter()
        .map(|(used, value)| match owners.get(&used) {
            Some(original) if *original != used => {
                tracing::trace!(used = %used, original = %original, "Restored residual key");
                (original.clone(), value)
            }
            _ => (used, value),
        })
        .collect()
}

/// Reconciles `source` against `record_type`.
pub(crate) fn reconcile(
    registry: &TypeRegistry,
    record_type: &RecordType,
    source: TextMap,
    transformations: &[Transformation],
) -> Reconciliation {
    let (matching, non_matching): (Vec<String>, Vec<String>) = source
        .keys()
        .cloned()
        .partition(|key| record_type.has_field(key));
    tracing::debug!(
        record = %record_type.name(),
        matching = matching.len(),
        non_matching = non_matching.len(),
        "Partitioned input keys"
    );

    if non_matching.is_empty() || transformations.is_empty() {
        let (record, rest) = registry.build_record(record_type, source);
        return Reconciliation { record, rest };
    }

    let trace = KeyTrace::build(&matching, &non_matching, transformations);
    let Merged {
        fields,
        owners,
        displaced,
    } = merge(source, &trace);
    let (record, residual) = registry.build_record(record_type, fields);

    let mut rest = dealias(residual, &owners);
    rest.extend(displaced);
    Reconciliation { record, rest }
}

#[cfg(test)]
mod tests {
    use keyfit_schema::StaticSchema;
    use serde_json::{Value, json};

    use super::*;

    fn user_registry() -> (TypeRegistry, RecordType) {
        let mut registry = TypeRegistry::new();
        let user = registry
            .register_schema(
                "User",
                StaticSchema::with_fields(["first_name", "username", "password"]),
            )
            .unwrap();
        (registry, user)
    }

    fn text_map(entries: Value) -> TextMap {
        match entries {
            Value::Object(map) => map.into_iter().collect(),
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn trace_maps_matching_keys_to_themselves() {
        let trace = KeyTrace::build(
            &["password".to_string()],
            &["FirstName".to_string()],
            &[Transformation::SnakeCase],
        );
        assert_eq!(trace.used_key("password"), "password");
        assert_eq!(trace.used_key("FirstName"), "first_name");
        assert!(trace.is_changed("FirstName"));
        assert!(!trace.is_changed("password"));
    }

    #[test]
    fn transformed_match_populates_field() {
        let (registry, user) = user_registry();
        let outcome = reconcile(
            &registry,
            &user,
            text_map(json!({"FirstName": "John", "password": "pass"})),
            &[Transformation::SnakeCase],
        );
        assert_eq!(outcome.record.get("first_name"), Some(&json!("John")));
        assert!(outcome.rest.is_empty());
    }

    #[test]
    fn residual_keeps_original_spelling() {
        let (registry, user) = user_registry();
        let outcome = reconcile(
            &registry,
            &user,
            text_map(json!({"ShoeSize": 44, "username": "john"})),
            &[Transformation::SnakeCase],
        );
        assert_eq!(outcome.rest, text_map(json!({"ShoeSize": 44})));
    }

    #[test]
    fn transformed_key_wins_collision_and_loser_is_residual() {
        let (registry, user) = user_registry();
        let outcome = reconcile(
            &registry,
            &user,
            text_map(json!({"FirstName": "John", "first_name": "Jack"})),
            &[Transformation::SnakeCase],
        );
        assert_eq!(outcome.record.get("first_name"), Some(&json!("John")));
        assert_eq!(outcome.rest, text_map(json!({"first_name": "Jack"})));
    }

    #[test]
    fn collision_between_transformed_keys_is_deterministic() {
        let (registry, user) = user_registry();
        let outcome = reconcile(
            &registry,
            &user,
            text_map(json!({"FirstName": "upper", "firstName": "lower"})),
            &[Transformation::SnakeCase],
        );
        // "firstName" sorts after "FirstName" and is applied last.
        assert_eq!(outcome.record.get("first_name"), Some(&json!("lower")));
        assert_eq!(outcome.rest, text_map(json!({"FirstName": "upper"})));
    }

    #[test]
    fn no_transformations_means_exact_matching() {
        let (registry, user) = user_registry();
        let outcome = reconcile(
            &registry,
            &user,
            text_map(json!({"FirstName": "John", "password": "pass"})),
            &[],
        );
        assert_eq!(outcome.record.get("first_name"), Some(&Value::Null));
        assert_eq!(outcome.rest, text_map(json!({"FirstName": "John"})));
    }
}
