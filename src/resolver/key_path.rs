//! Dot-path utilities over JSON trees.
//!
//! Paths are `.`-separated segments (`persona.spec.description`). A segment
//! addresses an object key, or an element index when the current node is an
//! array (`process.0`). Arrays are never descended by [`flatten`]; they are
//! leaves like any other non-object value.

use serde_json::{Map, Value};

use crate::utilities::string_utils::coerce_for_append;

/// Result of applying a patch at a dot-path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The value at the path was amended or replaced.
    Applied,
    /// An intermediate segment does not exist; nothing was written.
    MissingParent { segment: String },
    /// The parent exists but has no own property named by the final segment.
    MissingTarget,
}

impl PatchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Flatten a nested object into dot-path keyed leaves, in source key order.
///
/// Nested objects are walked; everything else (arrays, strings, numbers,
/// booleans, `null`) is emitted as a leaf. Empty nested objects emit nothing.
pub fn flatten(object: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    flatten_into(object, None, &mut out);
    out
}

fn flatten_into(object: &Map<String, Value>, prefix: Option<&str>, out: &mut Map<String, Value>) {
    for (key, value) in object {
        let path = match prefix {
            Some(p) => format!("{}.{}", p, key),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) => flatten_into(nested, Some(path.as_str()), out),
            leaf => {
                out.insert(path, leaf.clone());
            }
        }
    }
}

/// Split a dot-path into its segments.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('.').collect()
}

/// Own child of `value` named by `segment`, if any.
fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => match segment.parse::<usize>() {
            Ok(index) => items.get(index),
            Err(_) => None,
        },
        _ => None,
    }
}

fn child_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => match segment.parse::<usize>() {
            Ok(index) => items.get_mut(index),
            Err(_) => None,
        },
        _ => None,
    }
}

/// Read the value at `path`, short-circuiting on the first missing segment.
pub fn get_by_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    get_by_segments(root, &segments(path))
}

/// Read the value addressed by pre-split segments.
pub fn get_by_segments<'a, S: AsRef<str>>(root: &'a Value, segments: &[S]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(root, |current, segment| child(current, segment.as_ref()))
}

/// Mutable counterpart of [`get_by_segments`].
pub fn get_mut_by_segments<'a, S: AsRef<str>>(
    root: &'a mut Value,
    segments: &[S],
) -> Option<&'a mut Value> {
    segments
        .iter()
        .try_fold(root, |current, segment| child_mut(current, segment.as_ref()))
}

/// Whether a value exists at `path`.
pub fn exists_by_path(root: &Value, path: &str) -> bool {
    get_by_path(root, path).is_some()
}

/// Descend to the existing target of `path`, reporting where the walk stopped.
fn locate_target<'a>(root: &'a mut Value, path: &str) -> Result<&'a mut Value, PatchOutcome> {
    let segments = segments(path);
    let (last, parents) = match segments.split_last() {
        Some(split) => split,
        None => return Err(PatchOutcome::MissingTarget),
    };

    let mut current = root;
    for segment in parents {
        current = match child_mut(current, segment) {
            Some(next) => next,
            None => {
                return Err(PatchOutcome::MissingParent {
                    segment: (*segment).to_string(),
                })
            }
        };
    }

    child_mut(current, last).ok_or(PatchOutcome::MissingTarget)
}

/// Append `value` onto the existing field at `path`.
///
/// - string target: `" "` plus the coerced value is concatenated;
/// - array target: an array value is concatenated, anything else is pushed;
/// - any other target is replaced by `value`.
///
/// Missing intermediate segments or a missing final property leave the tree
/// untouched.
pub fn apply_extension(root: &mut Value, path: &str, value: &Value) -> PatchOutcome {
    let target = match locate_target(root, path) {
        Ok(target) => target,
        Err(outcome) => return outcome,
    };

    match target {
        Value::String(current) => {
            current.push(' ');
            current.push_str(&coerce_for_append(value));
        }
        Value::Array(items) => match value {
            Value::Array(more) => items.extend(more.iter().cloned()),
            single => items.push(single.clone()),
        },
        // TODO: merge object targets key-wise instead of replacing them.
        other => *other = value.clone(),
    }
    PatchOutcome::Applied
}

/// Replace the existing field at `path` with `value`.
pub fn apply_override(root: &mut Value, path: &str, value: &Value) -> PatchOutcome {
    match locate_target(root, path) {
        Ok(target) => {
            *target = value.clone();
            PatchOutcome::Applied
        }
        Err(outcome) => outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> Value {
        json!({
            "persona": {
                "metadata": { "name": "Alice", "version": "1.0" },
                "spec": {
                    "description": "A teacher.",
                    "process": ["game"],
                    "age": 42,
                    "nested": { "deep": { "leaf": true } },
                    "empty": {}
                }
            }
        })
    }

    #[test]
    fn test_flatten_emits_leaves_in_source_order() {
        let root = fixture();
        let flat = flatten(root.as_object().unwrap());
        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "persona.metadata.name",
                "persona.metadata.version",
                "persona.spec.description",
                "persona.spec.process",
                "persona.spec.age",
                "persona.spec.nested.deep.leaf",
            ]
        );
        assert_eq!(flat["persona.spec.process"], json!(["game"]));
    }

    #[test]
    fn test_get_by_path_agrees_with_flatten() {
        let root = fixture();
        for (path, value) in flatten(root.as_object().unwrap()) {
            assert_eq!(get_by_path(&root, &path), Some(&value), "path {}", path);
        }
    }

    #[test]
    fn test_get_by_path_short_circuits() {
        let root = fixture();
        assert_eq!(get_by_path(&root, "persona.spec.missing.deeper"), None);
        assert_eq!(get_by_path(&root, "persona.spec.description.length"), None);
        assert_eq!(get_by_path(&root, "persona.spec.process.0"), Some(&json!("game")));
        assert_eq!(get_by_path(&root, "persona.spec.process.3"), None);
        assert!(exists_by_path(&root, "persona.metadata.name"));
        assert!(!exists_by_path(&root, "problem.spec"));
    }

    #[test]
    fn test_apply_extension_string_target() {
        let mut root = fixture();
        let outcome = apply_extension(&mut root, "persona.spec.description", &json!("Loves puzzles."));
        assert!(outcome.is_applied());
        assert_eq!(root["persona"]["spec"]["description"], "A teacher. Loves puzzles.");
    }

    #[test]
    fn test_apply_extension_string_target_with_array_value() {
        let mut root = fixture();
        apply_extension(&mut root, "persona.spec.description", &json!(["a", "b"]));
        assert_eq!(root["persona"]["spec"]["description"], "A teacher. a,b");
    }

    #[test]
    fn test_apply_extension_array_target() {
        let mut root = fixture();
        apply_extension(&mut root, "persona.spec.process", &json!("requirements-elicitation"));
        assert_eq!(
            root["persona"]["spec"]["process"],
            json!(["game", "requirements-elicitation"])
        );
        apply_extension(&mut root, "persona.spec.process", &json!(["a", "b"]));
        assert_eq!(
            root["persona"]["spec"]["process"],
            json!(["game", "requirements-elicitation", "a", "b"])
        );
    }

    #[test]
    fn test_apply_extension_other_target_is_set() {
        let mut root = fixture();
        apply_extension(&mut root, "persona.spec.age", &json!(43));
        assert_eq!(root["persona"]["spec"]["age"], 43);
    }

    #[test]
    fn test_apply_extension_missing_paths_leave_tree_untouched() {
        let mut root = fixture();
        let before = root.clone();
        assert_eq!(
            apply_extension(&mut root, "persona.spec.nonexistentField", &json!("x")),
            PatchOutcome::MissingTarget
        );
        assert_eq!(
            apply_extension(&mut root, "persona.nothere.field", &json!("x")),
            PatchOutcome::MissingParent {
                segment: "nothere".to_string()
            }
        );
        assert_eq!(root, before);
    }

    #[test]
    fn test_apply_override_replaces_wholesale() {
        let mut root = fixture();
        let outcome = apply_override(&mut root, "persona.spec.nested", &json!("flat now"));
        assert!(outcome.is_applied());
        assert_eq!(root["persona"]["spec"]["nested"], "flat now");
        assert_eq!(
            apply_override(&mut root, "persona.spec.unknown", &json!(1)),
            PatchOutcome::MissingTarget
        );
    }
}
