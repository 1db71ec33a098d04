//! Placeholder resolver.
//!
//! String leaves inside each entity's `spec` may reference values from any
//! spec through `{{ entity.dotted.path }}` tokens. Entities are resolved in
//! the fixed order problem → persona → behaviour, against a view that holds
//! each entity's spec and is updated as resolution proceeds, so:
//!
//! - problem sees the raw persona and behaviour specs;
//! - persona sees the resolved problem spec;
//! - behaviour sees both resolved specs;
//! - within one entity, a field sees fields resolved before it (source order).

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

use super::diagnostics::{DiagnosticKind, Diagnostics, Stage};
use super::key_path::{get_by_path, get_by_segments, get_mut_by_segments};
use crate::utilities::string_utils::stringify_value;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.]+)\s*\}\}").unwrap());
static SOLO_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\{\{\s*([A-Za-z0-9_.]+)\s*\}\}\s*$").unwrap());

/// Entity resolution order.
pub const RESOLUTION_ORDER: [&str; 3] = ["problem", "persona", "behaviour"];

/// Entities contributing to the view.
const VIEW_ENTITIES: [&str; 3] = ["persona", "problem", "behaviour"];

/// Substitute placeholders in every entity spec of the composition.
pub fn resolve_placeholders(root: &mut Value, diagnostics: &mut Diagnostics) {
    let mut view = Map::new();
    for entity in VIEW_ENTITIES {
        if let Some(spec) = root.get(entity).and_then(|e| e.get("spec")) {
            view.insert(entity.to_string(), spec.clone());
        }
    }
    let mut view = Value::Object(view);

    for entity in RESOLUTION_ORDER {
        if root.get(entity).and_then(|e| e.get("spec")).is_none() {
            diagnostics.record(
                Stage::Placeholders,
                DiagnosticKind::MissingEntity,
                entity,
                "entity or its spec is missing; skipped",
            );
            continue;
        }

        resolve_entity(&mut view, entity, diagnostics);

        if let (Some(resolved), Some(target)) = (
            view.get(entity),
            root.get_mut(entity).and_then(|e| e.get_mut("spec")),
        ) {
            *target = resolved.clone();
        }
    }
}

/// Resolve the string leaves of `view[entity]` in place, one at a time, so
/// later leaves observe earlier substitutions.
fn resolve_entity(view: &mut Value, entity: &str, diagnostics: &mut Diagnostics) {
    let mut leaves = Vec::new();
    if let Some(spec) = view.get(entity) {
        collect_string_leaves(spec, &mut vec![entity.to_string()], &mut leaves);
    }

    for path in leaves {
        let text = match get_by_segments(view, &path) {
            Some(Value::String(s)) => s.clone(),
            _ => continue,
        };
        let resolved = replace_placeholders(&text, view, diagnostics);
        if let Some(slot) = get_mut_by_segments(view, &path) {
            *slot = resolved;
        }
    }
}

fn collect_string_leaves(value: &Value, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
    match value {
        Value::String(_) => out.push(prefix.clone()),
        Value::Object(map) => {
            for (key, child) in map {
                prefix.push(key.clone());
                collect_string_leaves(child, prefix, out);
                prefix.pop();
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                prefix.push(index.to_string());
                collect_string_leaves(child, prefix, out);
                prefix.pop();
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Substitute placeholders in a single string against `view`.
///
/// A string that is exactly one token (surrounding whitespace allowed)
/// yields the resolved value itself, whatever its type. Otherwise every
/// token is replaced by its stringified value (arrays and objects as JSON).
/// Unresolved tokens are kept verbatim.
pub fn replace_placeholders(text: &str, view: &Value, diagnostics: &mut Diagnostics) -> Value {
    if let Some(caps) = SOLO_PLACEHOLDER.captures(text) {
        let key = &caps[1];
        return match get_by_path(view, key) {
            Some(value) => value.clone(),
            None => {
                record_unresolved(key, diagnostics);
                Value::String(text.to_string())
            }
        };
    }

    if !text.contains("{{") {
        return Value::String(text.to_string());
    }

    let replaced = PLACEHOLDER.replace_all(text, |caps: &Captures| {
        let key = &caps[1];
        match get_by_path(view, key) {
            Some(value) => stringify_value(value),
            None => {
                record_unresolved(key, diagnostics);
                caps[0].to_string()
            }
        }
    });
    Value::String(replaced.into_owned())
}

fn record_unresolved(key: &str, diagnostics: &mut Diagnostics) {
    diagnostics.record(
        Stage::Placeholders,
        DiagnosticKind::UnresolvedPlaceholder,
        key,
        "placeholder key not found; left unchanged",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(mut root: Value) -> (Value, Diagnostics) {
        let mut diags = Diagnostics::new();
        resolve_placeholders(&mut root, &mut diags);
        (root, diags)
    }

    #[test]
    fn test_solo_placeholder_returns_raw_value() {
        let (root, _) = resolve(json!({
            "problem": { "spec": { "process": ["game", "design"] } },
            "persona": { "spec": { "description": "{{ problem.process }}" } },
            "behaviour": { "spec": {} }
        }));
        assert_eq!(root["persona"]["spec"]["description"], json!(["game", "design"]));
    }

    #[test]
    fn test_inline_placeholder_stringifies() {
        let (root, _) = resolve(json!({
            "problem": { "spec": { "process": ["game"] } },
            "persona": { "spec": { "description": "Process: {{ problem.process }}" } },
            "behaviour": { "spec": {} }
        }));
        assert_eq!(root["persona"]["spec"]["description"], "Process: [\"game\"]");
    }

    #[test]
    fn test_unresolved_placeholder_survives() {
        let (root, diags) = resolve(json!({
            "problem": { "spec": {} },
            "persona": { "spec": {
                "description": "{{ nonexistent.key }}",
                "personality": "Hi {{nonexistent.other}} and {{ problem.missing }}"
            } },
            "behaviour": { "spec": {} }
        }));
        assert_eq!(root["persona"]["spec"]["description"], "{{ nonexistent.key }}");
        assert_eq!(
            root["persona"]["spec"]["personality"],
            "Hi {{nonexistent.other}} and {{ problem.missing }}"
        );
        assert_eq!(diags.for_stage(Stage::Placeholders).count(), 3);
    }

    #[test]
    fn test_multiple_tokens_and_scalars() {
        let (root, _) = resolve(json!({
            "problem": { "spec": { "level": 3, "remote": false } },
            "persona": { "spec": {
                "description": "{{persona.firstName}} {{ persona.lastName }}",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "notes": "level={{ problem.level }} remote={{ problem.remote }}"
            } },
            "behaviour": { "spec": {} }
        }));
        assert_eq!(root["persona"]["spec"]["description"], "Ada Lovelace");
        assert_eq!(root["persona"]["spec"]["notes"], "level=3 remote=false");
    }

    #[test]
    fn test_view_propagation_order() {
        let (root, _) = resolve(json!({
            "persona": { "spec": {
                "fullName": "{{ persona.firstName }} Smith",
                "firstName": "Jane",
                "description": "Works on: {{ problem.description }}"
            } },
            "problem": { "spec": {
                "description": "Help {{ persona.fullName }} in {{ problem.area }}",
                "area": "databases"
            } },
            "behaviour": { "spec": {
                "description": "{{ persona.fullName }} / {{ problem.description }}"
            } }
        }));

        // problem sees persona's raw fullName
        assert_eq!(
            root["problem"]["spec"]["description"],
            "Help {{ persona.firstName }} Smith in databases"
        );
        // persona sees problem's resolved description
        assert_eq!(
            root["persona"]["spec"]["description"],
            "Works on: Help {{ persona.firstName }} Smith in databases"
        );
        assert_eq!(root["persona"]["spec"]["fullName"], "Jane Smith");
        // behaviour sees both resolved
        assert_eq!(
            root["behaviour"]["spec"]["description"],
            "Jane Smith / Help {{ persona.firstName }} Smith in databases"
        );
    }

    #[test]
    fn test_later_field_sees_earlier_resolution() {
        let (root, _) = resolve(json!({
            "problem": { "spec": {
                "details": "{{ problem.solution }}",
                "solution": "use {{ problem.details }}"
            } },
            "persona": { "spec": {} },
            "behaviour": { "spec": {} }
        }));
        // details resolves first to the raw solution; solution then sees it.
        assert_eq!(root["problem"]["spec"]["details"], "use {{ problem.details }}");
        assert_eq!(root["problem"]["spec"]["solution"], "use use {{ problem.details }}");
    }

    #[test]
    fn test_walks_nested_arrays_and_passes_scalars() {
        let (root, _) = resolve(json!({
            "problem": { "spec": { "area": "networks", "count": 2, "flag": null } },
            "persona": { "spec": {
                "tags": ["{{ problem.area }}", 7, { "inner": "on {{ problem.area }}" }]
            } },
            "behaviour": { "spec": {} }
        }));
        assert_eq!(
            root["persona"]["spec"]["tags"],
            json!(["networks", 7, { "inner": "on networks" }])
        );
        assert_eq!(root["problem"]["spec"]["count"], 2);
        assert_eq!(root["problem"]["spec"]["flag"], Value::Null);
    }

    #[test]
    fn test_missing_entity_is_skipped() {
        let (root, diags) = resolve(json!({
            "problem": { "spec": { "description": "{{ persona.firstName }}" } },
            "persona": { "metadata": { "name": "no spec" } }
        }));
        assert_eq!(root["problem"]["spec"]["description"], "{{ persona.firstName }}");
        let missing: Vec<&str> = diags
            .iter()
            .filter(|d| d.kind == DiagnosticKind::MissingEntity)
            .map(|d| d.path.as_str())
            .collect();
        assert_eq!(missing, vec!["persona", "behaviour"]);
    }

    #[test]
    fn test_only_spec_is_resolved() {
        let (root, _) = resolve(json!({
            "problem": {
                "metadata": { "name": "{{ problem.area }}" },
                "spec": { "area": "x" }
            },
            "persona": { "spec": {} },
            "behaviour": { "spec": {} }
        }));
        assert_eq!(root["problem"]["metadata"]["name"], "{{ problem.area }}");
    }

    #[test]
    fn test_token_grammar() {
        let view = json!({ "problem": { "a_b": { "c1": "ok" } } });
        let mut diags = Diagnostics::new();
        assert_eq!(
            replace_placeholders("  {{problem.a_b.c1}}  ", &view, &mut diags),
            json!("ok")
        );
        assert_eq!(
            replace_placeholders("{{ problem.a-b }}", &view, &mut diags),
            json!("{{ problem.a-b }}")
        );
        assert_eq!(
            replace_placeholders("{ problem.a_b.c1 }", &view, &mut diags),
            json!("{ problem.a_b.c1 }")
        );
        assert_eq!(
            replace_placeholders("{{ problem.a_b }}!", &view, &mut diags),
            json!(r#"{"c1":"ok"}!"#)
        );
    }
}
