//! Structured diagnostics for recoverable composition conditions.
//!
//! Every stage receives a `&mut Diagnostics`. Recording a diagnostic also
//! mirrors it to the `log` facade, so hosts that only install a logger still
//! see skipped keys, while hosts that want to surface them (or fail on them,
//! see strict mode) can inspect the collected list.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pipeline stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Constraints,
    Extensions,
    Overrides,
    Placeholders,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constraints => write!(f, "constraints"),
            Self::Extensions => write!(f, "extensions"),
            Self::Overrides => write!(f, "overrides"),
            Self::Placeholders => write!(f, "placeholders"),
        }
    }
}

/// What kind of condition was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A control key does not address an `<entity>.spec.…` path.
    OutsideSpec,
    /// A control key names a property (or an intermediate segment) that does not exist.
    MissingTarget,
    /// A placeholder key did not resolve against the view.
    UnresolvedPlaceholder,
    /// An entity (or its `spec`) is absent from the composition.
    MissingEntity,
}

/// A single recoverable condition encountered during composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub stage: Stage,
    pub kind: DiagnosticKind,
    /// Dot-path (or placeholder key) the condition refers to.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.path, self.message)
    }
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and mirror it to the logger.
    pub fn record(
        &mut self,
        stage: Stage,
        kind: DiagnosticKind,
        path: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            stage,
            kind,
            path: path.into(),
            message: message.into(),
        };
        match kind {
            DiagnosticKind::UnresolvedPlaceholder => log::debug!("{}", diagnostic),
            _ => log::warn!("{}", diagnostic),
        }
        self.entries.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Diagnostics produced by one stage.
    pub fn for_stage(&self, stage: Stage) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.stage == stage)
    }

    pub fn first(&self) -> Option<&Diagnostic> {
        self.entries.first()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
