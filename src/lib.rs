//! # LEIA
//!
//! Composition resolver for LEIA pedagogical agents.
//!
//! A LEIA is built from three composable documents (persona, problem,
//! behaviour). The [`resolver`] validates the problem's constraints against
//! the selection, applies its `extends`/`overrides` patches, and substitutes
//! `{{ placeholders }}` across the three specs, producing one composed
//! document. The pipeline is pure: no I/O, no shared state.

pub mod cli;
pub mod resolver;
pub mod utilities;

// Re-exports
pub use resolver::{
    generate_leia, Behaviour, Composed, Diagnostic, Diagnostics, Leia, LeiaComposer, LeiaError,
    Persona, Problem,
};
pub use utilities::config::ComposerConfig;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
