//! Problem control maps (`extends`, `overrides`, `constrainedTo`).
//!
//! The maps live under `problem.spec` and address fields anywhere in the
//! composition by nesting: `{ persona: { spec: { description: "…" } } }`
//! targets `persona.spec.description` once flattened.

use serde_json::{Map, Value};

use super::error::{value_kind, LeiaError};
use super::key_path::{flatten, get_by_path};

/// One of the three control maps carried by a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMap {
    Extends,
    Overrides,
    ConstrainedTo,
}

impl ControlMap {
    /// Key of the map inside `problem.spec`.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Extends => "extends",
            Self::Overrides => "overrides",
            Self::ConstrainedTo => "constrainedTo",
        }
    }

    /// Read and flatten this map from the composition root.
    ///
    /// An absent or falsy map yields `Ok(None)`; any other non-object value
    /// is rejected.
    pub fn flattened(&self, root: &Value) -> Result<Option<Map<String, Value>>, LeiaError> {
        let path = format!("problem.spec.{}", self.key());
        match get_by_path(root, &path) {
            None => Ok(None),
            Some(value) if is_falsy(value) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(flatten(map))),
            Some(other) => Err(LeiaError::MalformedControlMap {
                map: self.key(),
                found: value_kind(other),
            }),
        }
    }
}

/// Whether `path` has the shape `<entity>.spec.…`.
pub fn is_spec_path(path: &str) -> bool {
    path.split('.').nth(1) == Some("spec")
}

/// JavaScript-style falsiness: `null`, `false`, `0`, and `""`.
///
/// Empty arrays and objects are truthy.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0 || f.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flattened_absent_map_is_none() {
        let root = json!({ "problem": { "spec": {} } });
        assert!(ControlMap::Extends.flattened(&root).unwrap().is_none());
        let root = json!({ "problem": { "spec": { "overrides": null } } });
        assert!(ControlMap::Overrides.flattened(&root).unwrap().is_none());
        assert!(ControlMap::ConstrainedTo.flattened(&json!({})).unwrap().is_none());
    }

    #[test]
    fn test_flattened_rejects_non_object() {
        let root = json!({ "problem": { "spec": { "extends": ["persona.spec.description"] } } });
        let err = ControlMap::Extends.flattened(&root).unwrap_err();
        assert!(matches!(
            err,
            LeiaError::MalformedControlMap { map: "extends", found: "array" }
        ));
    }

    #[test]
    fn test_flattened_paths() {
        let root = json!({
            "problem": { "spec": { "constrainedTo": {
                "persona": { "spec": { "subjectPronoum": "she" } }
            } } }
        });
        let flat = ControlMap::ConstrainedTo.flattened(&root).unwrap().unwrap();
        assert_eq!(flat.get("persona.spec.subjectPronoum"), Some(&json!("she")));
    }

    #[test]
    fn test_is_spec_path() {
        assert!(is_spec_path("persona.spec.description"));
        assert!(!is_spec_path("persona.metadata.name"));
        assert!(!is_spec_path("persona"));
        assert!(!is_spec_path("spec.persona.description"));
    }

    #[test]
    fn test_is_falsy() {
        for v in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(is_falsy(&v), "{} should be falsy", v);
        }
        for v in [json!([]), json!({}), json!("0"), json!(1), json!(true)] {
            assert!(!is_falsy(&v), "{} should be truthy", v);
        }
    }
}
