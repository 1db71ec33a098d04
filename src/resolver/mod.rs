//! LEIA composition resolver.
//!
//! A LEIA (pedagogical agent) is assembled from three independently authored
//! documents: a **persona** (who the agent is), a **problem** (what the
//! learner works on), and a **behaviour** (how the session is run). The
//! problem may carry control maps that constrain and patch the other two:
//!
//! - `constrainedTo`: values the selected documents must already hold;
//! - `extends`: values appended onto existing fields;
//! - `overrides`: values replacing existing fields.
//!
//! After patching, `{{ entity.path }}` placeholders inside every spec are
//! substituted using the other specs as context.
//!
//! # Example
//!
//! ```rust
//! use leia::resolver::{generate_leia, Behaviour, Persona, Problem};
//!
//! let persona = Persona::from_json_str(r#"{ "spec": { "firstName": "Ada" } }"#).unwrap();
//! let behaviour = Behaviour::from_json_str(r#"{ "spec": { "role": "tutor" } }"#).unwrap();
//! let problem = Problem::from_json_str(
//!     r#"{ "spec": { "description": "Help {{ persona.firstName }}" } }"#,
//! )
//! .unwrap();
//!
//! let leia = generate_leia(&persona, &behaviour, &problem).unwrap();
//! assert_eq!(leia.spec.problem["spec"]["description"], "Help Ada");
//! ```
//!
//! The pipeline is synchronous and keeps no shared state; it can be called
//! concurrently from any number of threads.

pub mod composer;
pub mod constraints;
pub mod control;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod key_path;
pub mod patches;
pub mod placeholders;

// Re-exports
pub use composer::{deep_copy, generate_leia, run_pipeline, Composed, LeiaComposer};
pub use constraints::{check_constraints, is_process_compatible};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Stage};
pub use document::{
    Behaviour, BehaviourSpec, Document, Leia, LeiaSpec, Metadata, Persona, PersonaSpec, Problem,
    ProblemSpec, SolutionFormat,
};
pub use error::LeiaError;
pub use key_path::{
    apply_extension, apply_override, exists_by_path, flatten, get_by_path, PatchOutcome,
};
pub use patches::{resolve_extensions, resolve_overrides};
pub use placeholders::{replace_placeholders, resolve_placeholders, RESOLUTION_ORDER};
