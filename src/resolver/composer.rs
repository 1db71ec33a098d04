//! Top-level composition: clone, check, extend, override, substitute.
//!
//! ```text
//! persona + behaviour + problem
//!   ↓  deep copy into { persona, behaviour, problem }
//! check_constraints      (fails fast, reads the unpatched copy)
//!   ↓
//! resolve_extensions     (append)
//!   ↓
//! resolve_overrides      (replace)
//!   ↓
//! resolve_placeholders   (problem → persona → behaviour)
//!   ↓
//! Leia { spec: { persona, behaviour, problem } }
//! ```

use serde_json::{Map, Value};

use super::constraints::check_constraints;
use super::diagnostics::Diagnostics;
use super::document::{Behaviour, Leia, Persona, Problem};
use super::error::LeiaError;
use super::patches::{resolve_extensions, resolve_overrides};
use super::placeholders::resolve_placeholders;
use crate::utilities::config::ComposerConfig;

/// A composed LEIA together with the diagnostics raised while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Composed {
    pub leia: Leia,
    pub diagnostics: Diagnostics,
}

/// Compose a LEIA with default settings, discarding diagnostics.
///
/// Diagnostics are still emitted through the `log` facade.
pub fn generate_leia(
    persona: &Persona,
    behaviour: &Behaviour,
    problem: &Problem,
) -> Result<Leia, LeiaError> {
    LeiaComposer::default()
        .generate(persona, behaviour, problem)
        .map(|composed| composed.leia)
}

/// Run the four pipeline stages over a composition root in place.
pub fn run_pipeline(root: &mut Value, diagnostics: &mut Diagnostics) -> Result<(), LeiaError> {
    check_constraints(root)?;
    resolve_extensions(root, diagnostics)?;
    resolve_overrides(root, diagnostics)?;
    resolve_placeholders(root, diagnostics);
    Ok(())
}

/// Copy a JSON tree. Arrays and objects are copied element by element,
/// scalars by value.
pub fn deep_copy(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Bool(b) => Value::Bool(*b),
        Value::Number(n) => Value::Number(n.clone()),
        Value::String(s) => Value::String(s.clone()),
        Value::Array(items) => Value::Array(items.iter().map(deep_copy).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, child)| (key.clone(), deep_copy(child)))
                .collect(),
        ),
    }
}

fn composition_root(persona: Value, behaviour: Value, problem: Value) -> Value {
    let mut root = Map::new();
    root.insert("persona".to_string(), persona);
    root.insert("behaviour".to_string(), behaviour);
    root.insert("problem".to_string(), problem);
    Value::Object(root)
}

/// Composer carrying a [`ComposerConfig`].
#[derive(Debug, Clone, Default)]
pub struct LeiaComposer {
    config: ComposerConfig,
}

impl LeiaComposer {
    pub fn new(config: ComposerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Compose typed documents.
    pub fn generate(
        &self,
        persona: &Persona,
        behaviour: &Behaviour,
        problem: &Problem,
    ) -> Result<Composed, LeiaError> {
        self.generate_values(&persona.to_value()?, &behaviour.to_value()?, &problem.to_value()?)
    }

    /// Compose untyped documents. The inputs are deep-copied and never mutated.
    pub fn generate_values(
        &self,
        persona: &Value,
        behaviour: &Value,
        problem: &Value,
    ) -> Result<Composed, LeiaError> {
        let mut root = composition_root(deep_copy(persona), deep_copy(behaviour), deep_copy(problem));
        let mut diagnostics = Diagnostics::new();

        log::debug!(
            "Composing LEIA from persona={:?} behaviour={:?} problem={:?}",
            document_name(persona),
            document_name(behaviour),
            document_name(problem)
        );
        run_pipeline(&mut root, &mut diagnostics)?;

        if self.config.strict {
            if let Some(first) = diagnostics.first() {
                return Err(LeiaError::Strict {
                    count: diagnostics.len(),
                    first: first.to_string(),
                });
            }
        }

        Ok(Composed {
            leia: Leia::from_composition(root),
            diagnostics,
        })
    }

    /// Run only the constraint checker over typed documents.
    pub fn check(
        &self,
        persona: &Persona,
        behaviour: &Behaviour,
        problem: &Problem,
    ) -> Result<(), LeiaError> {
        let root = composition_root(persona.to_value()?, behaviour.to_value()?, problem.to_value()?);
        check_constraints(&root)
    }
}

fn document_name(document: &Value) -> Option<&str> {
    document.get("metadata")?.get("name")?.as_str()
}
