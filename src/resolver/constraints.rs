//! Constraint checker.
//!
//! Runs against the composition exactly as selected, before any extension,
//! override, or placeholder substitution touches it.

use std::collections::HashSet;

use serde_json::Value;

use super::control::{is_falsy, ControlMap};
use super::error::LeiaError;
use super::key_path::get_by_path;

/// Final path segment that switches a constraint to set-intersection semantics.
const PROCESS_SEGMENT: &str = "process";

/// Verify every `problem.spec.constrainedTo` entry against the composition.
///
/// Fails on the first unmet constraint. A missing map is a no-op.
pub fn check_constraints(root: &Value) -> Result<(), LeiaError> {
    let constraints = match ControlMap::ConstrainedTo.flattened(root)? {
        Some(flat) => flat,
        None => return Ok(()),
    };

    for (path, expected) in &constraints {
        let actual = match get_by_path(root, path) {
            Some(value) if !is_falsy(value) => value,
            _ => return Err(LeiaError::MissingValue { path: path.clone() }),
        };

        if path.rsplit('.').next() == Some(PROCESS_SEGMENT) {
            if !is_process_compatible(actual, expected) {
                return Err(LeiaError::IncompatibleProcess {
                    path: path.clone(),
                    expected: expected.clone(),
                    actual: actual.clone(),
                });
            }
            continue;
        }

        if !strict_equals(actual, expected) {
            return Err(LeiaError::Mismatch {
                path: path.clone(),
                expected: expected.clone(),
                actual: actual.clone(),
            });
        }
        log::debug!("Constraint satisfied: {}", path);
    }

    Ok(())
}

/// Whether two process declarations share at least one tag.
///
/// Scalars are treated as single-element sets. The larger side is hashed and
/// the smaller side probed against it.
pub fn is_process_compatible(a: &Value, b: &Value) -> bool {
    let a = as_slice(a);
    let b = as_slice(b);
    let (larger, smaller) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    let set: HashSet<String> = larger.iter().map(process_key).collect();
    smaller.iter().any(|item| set.contains(&process_key(item)))
}

fn as_slice(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        scalar => std::slice::from_ref(scalar),
    }
}

// JSON encoding keeps "1" and 1 distinct.
fn process_key(value: &Value) -> String {
    value.to_string()
}

/// Equality with numbers compared by value (`1 == 1.0`).
fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}
