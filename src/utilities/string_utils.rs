//! String coercion helpers shared by the LEIA resolver stages.
//!
//! Control-map values and placeholder substitutions are authored by people
//! who think in terms of plain text, so coercion follows the familiar
//! JavaScript rules (`String(value)`, `array.join(",")`) rather than serde's
//! JSON encoding wherever a scalar ends up inside text.

use serde_json::{Number, Value};

/// Render a number the way JavaScript's `String(n)` would.
///
/// Integral floats drop their fractional part (`2.0` → `"2"`).
pub fn number_to_string(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        Some(f) => f.to_string(),
        None => number.to_string(),
    }
}

/// Stringify a scalar for inline placeholder substitution.
///
/// Arrays and objects are JSON-encoded.
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_to_string(n),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Coerce a value for appending onto an existing string field.
///
/// Arrays are comma-joined (nested arrays flatten, `null` elements become
/// empty), objects are JSON-encoded.
pub fn coerce_for_append(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_for_append(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        other => stringify_value(other),
    }
}
