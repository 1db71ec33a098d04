//! Document types for the three LEIA building blocks and the composed result.
//!
//! Persona, problem, and behaviour documents share one envelope
//! ([`Document`]) and differ only in their `spec`. The composed [`Leia`]
//! stores each entity as a JSON tree, since placeholder substitution may
//! change a field's type (a string field can receive an array).
//!
//! # Example JSON
//!
//! ```json
//! {
//!   "id": "p-1",
//!   "apiVersion": "v1",
//!   "metadata": { "name": "alice", "version": "1.0.0" },
//!   "spec": { "fullName": "Alice Doe", "firstName": "Alice" }
//! }
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::LeiaError;

// ============================================================================
// Envelope
// ============================================================================

/// Name and version of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Envelope shared by persona, problem, and behaviour documents.
///
/// Every field is optional and absent fields stay absent on serialization,
/// so a composition built from a typed document holds exactly the fields its
/// author wrote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document<S> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    pub spec: S,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited: Option<bool>,
    /// Owner reference, opaque to the resolver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
    /// Tree the document was loaded from; gives [`Document::to_value`] its key order.
    #[serde(skip)]
    source: Option<Value>,
}

// `source` only carries key order.
impl<S: PartialEq> PartialEq for Document<S> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.api_version == other.api_version
            && self.metadata == other.metadata
            && self.spec == other.spec
            && self.created_at == other.created_at
            && self.updated_at == other.updated_at
            && self.edited == other.edited
            && self.user == other.user
    }
}

impl<S> Document<S> {
    /// Create a document carrying only a name and a spec.
    pub fn new(name: impl Into<String>, spec: S) -> Self {
        Self {
            id: None,
            api_version: None,
            metadata: Some(Metadata {
                name: Some(name.into()),
                version: None,
            }),
            spec,
            created_at: None,
            updated_at: None,
            edited: None,
            user: None,
            source: None,
        }
    }

    /// `metadata.name`, or `""` when unset.
    pub fn name(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.name.as_deref())
            .unwrap_or_default()
    }
}

impl<S: Serialize + DeserializeOwned> Document<S> {
    /// Build a document from a parsed JSON tree, remembering the tree's key order.
    pub fn from_value(value: Value) -> Result<Self, LeiaError> {
        let mut document = Self::deserialize(&value)?;
        document.source = Some(value);
        Ok(document)
    }

    /// Parse a document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, LeiaError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Parse a document from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, LeiaError> {
        Self::from_value(serde_yaml::from_str(yaml)?)
    }

    /// Load a document from disk; `.yaml`/`.yml` files are read as YAML,
    /// everything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LeiaError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        if is_yaml_path(path) {
            Self::from_yaml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Convert into an owned JSON tree.
    ///
    /// Loaded documents keep their source key order; keys added after
    /// loading follow in declaration order.
    pub fn to_value(&self) -> Result<Value, LeiaError> {
        let value = serde_json::to_value(self)?;
        Ok(match &self.source {
            Some(source) => order_like(source, value),
            None => value,
        })
    }
}

fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
}

/// Reorder the object keys of `value` to follow `template`, recursively.
/// Keys missing from `template` are appended in their current order.
fn order_like(template: &Value, value: Value) -> Value {
    match (template, value) {
        (Value::Object(template), Value::Object(map)) => {
            let mut rest: Vec<(String, Value)> = map.into_iter().collect();
            let mut ordered = Map::new();
            for (key, child_template) in template {
                if let Some(pos) = rest.iter().position(|(k, _)| k == key) {
                    let (key, child) = rest.remove(pos);
                    ordered.insert(key, order_like(child_template, child));
                }
            }
            ordered.extend(rest);
            Value::Object(ordered)
        }
        (Value::Array(template), Value::Array(items)) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match template.get(i) {
                    Some(child_template) => order_like(child_template, item),
                    None => item,
                })
                .collect(),
        ),
        (_, value) => value,
    }
}

// ============================================================================
// Specs
// ============================================================================

/// Persona spec: who the agent is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_pronoum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_pronoum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possessive_pronoum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possessive_adjective: Option<String>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Format of a problem's reference solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolutionFormat {
    #[default]
    Text,
    Mermaid,
    Yaml,
    Markdown,
    Html,
    Json,
    Xml,
}

/// Problem spec: what the learner works on, plus the control maps that
/// patch and constrain the rest of the composition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_format: Option<SolutionFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<Vec<String>>,
    /// Values appended onto existing fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<Value>,
    /// Values replacing existing fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<Value>,
    /// Values the composition must already hold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constrained_to: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Behaviour spec: how the agent conducts the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviourSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub type Persona = Document<PersonaSpec>;
pub type Problem = Document<ProblemSpec>;
pub type Behaviour = Document<BehaviourSpec>;

// ============================================================================
// Composed result
// ============================================================================

/// The composed entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeiaSpec {
    pub persona: Value,
    pub behaviour: Value,
    pub problem: Value,
}

/// A composed LEIA: `{ spec: { persona, behaviour, problem } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leia {
    pub spec: LeiaSpec,
}

impl Leia {
    /// Take the entities out of a composition root `{ persona, behaviour, problem }`.
    pub fn from_composition(mut root: Value) -> Self {
        let mut take = |key: &str| root.get_mut(key).map(Value::take).unwrap_or(Value::Null);
        let persona = take("persona");
        let behaviour = take("behaviour");
        let problem = take("problem");
        Self {
            spec: LeiaSpec {
                persona,
                behaviour,
                problem,
            },
        }
    }

    /// Read the composed persona back as a typed document.
    ///
    /// Fails if substitution changed a field to a type `PersonaSpec` cannot hold.
    pub fn persona_document(&self) -> Result<Persona, LeiaError> {
        Persona::from_value(self.spec.persona.clone())
    }

    pub fn behaviour_document(&self) -> Result<Behaviour, LeiaError> {
        Behaviour::from_value(self.spec.behaviour.clone())
    }

    pub fn problem_document(&self) -> Result<Problem, LeiaError> {
        Problem::from_value(self.spec.problem.clone())
    }
}
