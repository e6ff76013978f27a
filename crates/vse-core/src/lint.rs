//! Diagnostics for project snapshots.
//!
//! Reports structural issues without modifying anything. Live mutations
//! cannot create a dangling edge (node deletion cascades), but snapshots
//! produced outside the store can carry one — run this before `load` to
//! tell the user what a degraded load is about to drop.

use crate::id::ElementId;
use crate::snapshot::ProjectSnapshot;
use std::collections::HashSet;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Should be fixed — likely a mistake.
    Warning,
    /// Informational — style suggestion.
    Info,
}

/// A single diagnostic about one element of a snapshot.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// The node or edge this diagnostic refers to.
    pub subject: ElementId,
    /// Human-readable message.
    pub message: String,
    /// Severity level.
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "dangling-edge").
    pub rule: &'static str,
}

/// Run all rules over a snapshot and return diagnostics.
#[must_use]
pub fn lint_snapshot(snapshot: &ProjectSnapshot) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_dangling_edges(snapshot, &mut diags);
    lint_blank_names(snapshot, &mut diags);
    lint_unlabeled_animated_edges(snapshot, &mut diags);
    diags
}

/// Warn on edges whose endpoints do not resolve to a node in the snapshot.
fn lint_dangling_edges(snapshot: &ProjectSnapshot, diags: &mut Vec<LintDiagnostic>) {
    let node_ids: HashSet<ElementId> = snapshot.nodes.iter().map(|n| n.id).collect();
    for edge in &snapshot.edges {
        for endpoint in [edge.source, edge.target] {
            if !node_ids.contains(&endpoint) {
                diags.push(LintDiagnostic {
                    subject: edge.id,
                    message: format!(
                        "Edge `{}` references missing node `{endpoint}` — it will be dropped on load.",
                        edge.id
                    ),
                    severity: LintSeverity::Warning,
                    rule: "dangling-edge",
                });
            }
        }
    }
}

/// Warn on nodes with an empty display name.
fn lint_blank_names(snapshot: &ProjectSnapshot, diags: &mut Vec<LintDiagnostic>) {
    for node in &snapshot.nodes {
        if node.data.name.trim().is_empty() {
            diags.push(LintDiagnostic {
                subject: node.id,
                message: format!("Node `{}` has no name.", node.id),
                severity: LintSeverity::Warning,
                rule: "blank-name",
            });
        }
    }
}

/// Suggest labeling animated edges — a moving, unlabeled flow reads as noise.
fn lint_unlabeled_animated_edges(snapshot: &ProjectSnapshot, diags: &mut Vec<LintDiagnostic>) {
    for edge in &snapshot.edges {
        if edge.animated && edge.label.as_deref().is_none_or(|l| l.trim().is_empty()) {
            diags.push(LintDiagnostic {
                subject: edge.id,
                message: format!("Animated edge `{}` has no label.", edge.id),
                severity: LintSeverity::Info,
                rule: "unlabeled-animated-edge",
            });
        }
    }
}
