//! Edit operations — the wire format for assistant and remote diagram edits.
//!
//! The AI assistant edits a project by replying with a JSON array of
//! operations, each `{"op": ..., "payload": {...}}`. This module parses
//! that envelope into typed [`EditOp`] values and applies a batch to a
//! [`GraphStore`] in order.
//!
//! Operations referencing unknown elements, and edge requests the store
//! dedups away, are skipped rather than failing the batch; the caller gets
//! the counts in [`ApplyReport`] and decides what to surface.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use vse_core::{EdgePatch, ElementId, GraphStore, NodeDataPatch, Position};

/// One diagram edit operation, as sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "payload", rename_all = "snake_case")]
pub enum EditOp {
    AddNode {
        #[serde(rename = "type")]
        node_type: String,
        position: Position,
        /// Batch-local handle. The store assigns the real id, but the
        /// sender cannot know it in advance — later ops in the same batch
        /// may reference the created node by this handle.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<ElementId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<NodeDataPatch>,
    },
    UpdateNode {
        id: ElementId,
        data: NodeDataPatch,
    },
    MoveNode {
        id: ElementId,
        position: Position,
    },
    DeleteNode {
        id: ElementId,
    },
    AddEdge {
        source: ElementId,
        target: ElementId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    UpdateEdge {
        id: ElementId,
        #[serde(flatten)]
        patch: EdgePatch,
    },
    DeleteEdge {
        id: ElementId,
    },
}

/// Failure to parse an operations payload. A batch parses as a whole or
/// not at all — a half-applied reply is worse than a rejected one.
#[derive(Debug, Error)]
pub enum OpsError {
    #[error("malformed operations payload: {0}")]
    Malformed(String),
}

/// Outcome of applying a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyReport {
    /// Operations that changed the store.
    pub applied: usize,
    /// Operations dropped: unknown ids, duplicate edges, missing endpoints.
    pub skipped: usize,
}

/// Parse a JSON operations array.
///
/// Tolerates a wrapping Markdown code fence — assistants are told to reply
/// with bare JSON but do not always comply.
///
/// # Errors
/// [`OpsError::Malformed`] when the text is not a JSON array of known ops.
pub fn parse_ops(text: &str) -> Result<Vec<EditOp>, OpsError> {
    let text = strip_fence(text.trim());
    serde_json::from_str(text).map_err(|e| OpsError::Malformed(e.to_string()))
}

fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim().strip_suffix("```").unwrap_or(rest).trim()
}

/// Apply a batch of operations in order.
///
/// `AddNode` handles are tracked in a batch-local alias map, so an op later
/// in the batch can connect or edit a node created earlier in it.
pub fn apply_ops(store: &mut GraphStore, ops: Vec<EditOp>) -> ApplyReport {
    let mut report = ApplyReport::default();
    let mut aliases: HashMap<ElementId, ElementId> = HashMap::new();
    let resolve =
        |aliases: &HashMap<ElementId, ElementId>, id: ElementId| *aliases.get(&id).unwrap_or(&id);

    for op in ops {
        match op {
            EditOp::AddNode {
                node_type,
                position,
                id: handle,
                data,
            } => {
                let id = store.add_node(&node_type, position);
                if let Some(patch) = data {
                    store.update_node(id, patch);
                }
                if let Some(handle) = handle {
                    aliases.insert(handle, id);
                }
                report.applied += 1;
            }
            EditOp::UpdateNode { id, data } => {
                let id = resolve(&aliases, id);
                if store.node(id).is_some() {
                    store.update_node(id, data);
                    report.applied += 1;
                } else {
                    log::warn!("update_node: unknown node {id}, skipped");
                    report.skipped += 1;
                }
            }
            EditOp::MoveNode { id, position } => {
                let id = resolve(&aliases, id);
                if store.node(id).is_some() {
                    store.update_node_position(id, position);
                    report.applied += 1;
                } else {
                    log::warn!("move_node: unknown node {id}, skipped");
                    report.skipped += 1;
                }
            }
            EditOp::DeleteNode { id } => {
                let id = resolve(&aliases, id);
                if store.node(id).is_some() {
                    store.delete_node(id);
                    report.applied += 1;
                } else {
                    log::warn!("delete_node: unknown node {id}, skipped");
                    report.skipped += 1;
                }
            }
            EditOp::AddEdge {
                source,
                target,
                label,
            } => {
                let source = resolve(&aliases, source);
                let target = resolve(&aliases, target);
                let before = store.edge_count();
                match store.add_edge(source, target) {
                    Some(id) if store.edge_count() > before => {
                        if let Some(label) = label {
                            store.update_edge(
                                id,
                                EdgePatch {
                                    label: Some(label),
                                    ..EdgePatch::default()
                                },
                            );
                        }
                        report.applied += 1;
                    }
                    Some(_) => {
                        // Pair already connected; the existing edge stays as-is.
                        log::warn!("add_edge: {source} and {target} already connected, skipped");
                        report.skipped += 1;
                    }
                    None => {
                        log::warn!("add_edge: missing endpoint ({source} -> {target}), skipped");
                        report.skipped += 1;
                    }
                }
            }
            EditOp::UpdateEdge { id, patch } => {
                if store.edge(id).is_some() {
                    store.update_edge(id, patch);
                    report.applied += 1;
                } else {
                    log::warn!("update_edge: unknown edge {id}, skipped");
                    report.skipped += 1;
                }
            }
            EditOp::DeleteEdge { id } => {
                if store.edge(id).is_some() {
                    store.delete_edge(id);
                    report.applied += 1;
                } else {
                    log::warn!("delete_edge: unknown edge {id}, skipped");
                    report.skipped += 1;
                }
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_envelope() {
        let text = r#"[
            {"op": "add_node", "payload": {"type": "database", "position": {"x": 0, "y": 0}}},
            {"op": "delete_edge", "payload": {"id": "edge_3"}}
        ]"#;
        let ops = parse_ops(text).unwrap();
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], EditOp::AddNode { .. }));
        assert_eq!(
            ops[1],
            EditOp::DeleteEdge {
                id: ElementId::intern("edge_3")
            }
        );
    }

    #[test]
    fn parses_fenced_payload() {
        let text = "```json\n[{\"op\": \"delete_node\", \"payload\": {\"id\": \"node_1\"}}]\n```";
        let ops = parse_ops(text).unwrap();
        assert_eq!(ops.len(), 1);
    }

    #[test]
    fn unknown_op_tag_fails_the_whole_batch() {
        let text = r#"[{"op": "explode_node", "payload": {"id": "node_1"}}]"#;
        assert!(matches!(parse_ops(text), Err(OpsError::Malformed(_))));
    }

    #[test]
    fn add_node_alias_resolves_in_later_ops() {
        let mut store = GraphStore::new();
        let existing = store.add_node("api_gateway", Position::default());

        let ops = vec![
            EditOp::AddNode {
                node_type: "database".into(),
                position: Position::new(200.0, 0.0),
                id: Some(ElementId::intern("new_db")),
                data: None,
            },
            EditOp::AddEdge {
                source: ElementId::intern("new_db"),
                target: existing,
                label: Some("serves".into()),
            },
        ];
        let report = apply_ops(&mut store, ops);

        assert_eq!(report.applied, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(store.edge_count(), 1);
        let edge = store.edges().next().unwrap();
        assert_eq!(edge.target, existing);
        assert_eq!(edge.label.as_deref(), Some("serves"));
    }

    #[test]
    fn duplicate_edge_is_skipped_and_left_unchanged() {
        let mut store = GraphStore::new();
        let a = store.add_node("service", Position::default());
        let b = store.add_node("database", Position::default());
        let e = store.add_edge(a, b).unwrap();

        let report = apply_ops(
            &mut store,
            vec![EditOp::AddEdge {
                source: b,
                target: a,
                label: Some("should not land".into()),
            }],
        );

        assert_eq!(report.applied, 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(store.edge_count(), 1);
        assert_eq!(store.edge(e).unwrap().label, None);
    }

    #[test]
    fn unknown_ids_skip_without_aborting_the_batch() {
        let mut store = GraphStore::new();
        let ops = vec![
            EditOp::DeleteNode {
                id: ElementId::intern("ghost"),
            },
            EditOp::AddNode {
                node_type: "cache".into(),
                position: Position::default(),
                id: None,
                data: None,
            },
        ];
        let report = apply_ops(&mut store, ops);
        assert_eq!(report.applied, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn update_edge_payload_is_flat() {
        let text = r#"[{"op": "update_edge", "payload": {"id": "edge_0", "label": "reads", "animated": true}}]"#;
        let ops = parse_ops(text).unwrap();
        match &ops[0] {
            EditOp::UpdateEdge { id, patch } => {
                assert_eq!(*id, ElementId::intern("edge_0"));
                assert_eq!(patch.label.as_deref(), Some("reads"));
                assert_eq!(patch.animated, Some(true));
            }
            other => panic!("expected UpdateEdge, got {other:?}"),
        }
    }
}
