//! Extension and override resolvers.
//!
//! Both read a control map from `problem.spec`, flatten it, and apply each
//! leaf to the matching `<entity>.spec.…` field. Keys outside a spec, or
//! naming fields that do not exist, are skipped with a diagnostic; fields are
//! never created.

use serde_json::Value;

use super::control::{is_spec_path, ControlMap};
use super::diagnostics::{DiagnosticKind, Diagnostics, Stage};
use super::error::LeiaError;
use super::key_path::{apply_extension, apply_override, PatchOutcome};

/// Append `problem.spec.extends` values onto existing fields.
pub fn resolve_extensions(root: &mut Value, diagnostics: &mut Diagnostics) -> Result<(), LeiaError> {
    apply_control_map(
        root,
        ControlMap::Extends,
        Stage::Extensions,
        apply_extension,
        diagnostics,
    )
}

/// Replace existing fields with `problem.spec.overrides` values.
pub fn resolve_overrides(root: &mut Value, diagnostics: &mut Diagnostics) -> Result<(), LeiaError> {
    apply_control_map(
        root,
        ControlMap::Overrides,
        Stage::Overrides,
        apply_override,
        diagnostics,
    )
}

fn apply_control_map(
    root: &mut Value,
    map: ControlMap,
    stage: Stage,
    apply: fn(&mut Value, &str, &Value) -> PatchOutcome,
    diagnostics: &mut Diagnostics,
) -> Result<(), LeiaError> {
    let entries = match map.flattened(root)? {
        Some(flat) => flat,
        None => return Ok(()),
    };

    for (path, value) in &entries {
        if !is_spec_path(path) {
            diagnostics.record(
                stage,
                DiagnosticKind::OutsideSpec,
                path.as_str(),
                format!("'{}' keys may only target <entity>.spec paths", map.key()),
            );
            continue;
        }

        match apply(root, path, value) {
            PatchOutcome::Applied => log::debug!("Applied {} at {}", stage, path),
            PatchOutcome::MissingParent { segment } => diagnostics.record(
                stage,
                DiagnosticKind::MissingTarget,
                path.as_str(),
                format!("segment '{}' does not exist", segment),
            ),
            PatchOutcome::MissingTarget => diagnostics.record(
                stage,
                DiagnosticKind::MissingTarget,
                path.as_str(),
                "property does not exist",
            ),
        }
    }

    Ok(())
}
