//! Core data model for a project diagram.
//!
//! A project is a flat graph: nodes are architecture elements (databases,
//! services, queues) placed on a canvas, edges are visual connections
//! between them. Field names and enum values follow the JSON wire shape the
//! canvas front-end persists, so a snapshot of this model is the document.

use crate::id::ElementId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Geometry ────────────────────────────────────────────────────────────

/// 2D canvas position, in canvas-space pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ─── Node payload ────────────────────────────────────────────────────────

/// User-editable payload of a node.
///
/// `attributes` is free-form per-element configuration (port numbers, engine
/// names, replica counts — whatever the node's template exposes). Keys are
/// unordered; values are arbitrary JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
}

/// Partial update for [`NodeData`].
///
/// The merge contract is shallow and per-field: a `Some` field overwrites
/// the target field wholesale, a `None` field leaves it untouched. In
/// particular `attributes: Some(map)` replaces the entire attribute map —
/// there is no key-level merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDataPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: Option<HashMap<String, serde_json::Value>>,
}

impl NodeData {
    /// Apply a patch field-by-field. Some overwrites, None leaves alone.
    pub fn apply(&mut self, patch: NodeDataPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(attributes) = patch.attributes {
            self.attributes = attributes;
        }
    }
}

/// A node on the project canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectNode {
    /// Unique within the project. Immutable after creation.
    pub id: ElementId,

    /// Template tag ("database", "service", "load_balancer", …).
    /// Immutable after creation; the canvas picks the node renderer from it.
    #[serde(rename = "type")]
    pub node_type: String,

    pub position: Position,

    pub data: NodeData,
}

impl ProjectNode {
    pub fn new(id: ElementId, node_type: &str, position: Position, name: String) -> Self {
        Self {
            id,
            node_type: node_type.to_string(),
            position,
            data: NodeData {
                name,
                ..NodeData::default()
            },
        }
    }
}

// ─── Edges ───────────────────────────────────────────────────────────────

/// How the edge path is routed between its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Smoothstep,
    Step,
    Straight,
    Bezier,
}

/// Stroke styling hint for an edge. Currently only a dash pattern:
/// alternating on/off lengths, e.g. `[5.0, 5.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyle {
    pub dash: SmallVec<[f32; 4]>,
}

/// A visual connection between two nodes.
///
/// `source`/`target` are directed for rendering (arrowheads), but the store
/// treats a node pair as connected regardless of direction when deduping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEdge {
    pub id: ElementId,
    pub source: ElementId,
    pub target: ElementId,
    #[serde(rename = "type", default)]
    pub kind: EdgeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub animated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<EdgeStyle>,
}

impl ProjectEdge {
    pub fn new(id: ElementId, source: ElementId, target: ElementId) -> Self {
        Self {
            id,
            source,
            target,
            kind: EdgeKind::default(),
            label: None,
            animated: false,
            style: None,
        }
    }

    /// Apply a patch field-by-field. Some overwrites, None leaves alone.
    /// A `label`/`style` already set cannot be cleared through a patch,
    /// only replaced.
    pub fn apply(&mut self, patch: EdgePatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(label) = patch.label {
            self.label = Some(label);
        }
        if let Some(animated) = patch.animated {
            self.animated = animated;
        }
        if let Some(style) = patch.style {
            self.style = Some(style);
        }
    }
}

/// Partial update for [`ProjectEdge`]. Same merge contract as
/// [`NodeDataPatch`]; `id`/`source`/`target` are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgePatch {
    #[serde(rename = "type", default)]
    pub kind: Option<EdgeKind>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub animated: Option<bool>,
    #[serde(default)]
    pub style: Option<EdgeStyle>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn node_patch_overwrites_only_provided_fields() {
        let mut data = NodeData {
            name: "Postgres".into(),
            description: "primary".into(),
            attributes: HashMap::from([("port".into(), serde_json::json!(5432))]),
        };

        data.apply(NodeDataPatch {
            description: Some("primary + replica".into()),
            ..NodeDataPatch::default()
        });

        assert_eq!(data.name, "Postgres");
        assert_eq!(data.description, "primary + replica");
        assert_eq!(data.attributes.len(), 1);
    }

    #[test]
    fn node_patch_replaces_attributes_wholesale() {
        let mut data = NodeData {
            name: "Cache".into(),
            description: String::new(),
            attributes: HashMap::from([
                ("engine".into(), serde_json::json!("redis")),
                ("ttl".into(), serde_json::json!(60)),
            ]),
        };

        data.apply(NodeDataPatch {
            attributes: Some(HashMap::from([(
                "engine".into(),
                serde_json::json!("memcached"),
            )])),
            ..NodeDataPatch::default()
        });

        // ttl is gone — attributes is replaced, not key-merged
        assert_eq!(data.attributes.len(), 1);
        assert_eq!(data.attributes["engine"], serde_json::json!("memcached"));
    }

    #[test]
    fn edge_patch_keeps_unpatched_fields() {
        let mut edge = ProjectEdge::new(
            ElementId::intern("e1"),
            ElementId::intern("a"),
            ElementId::intern("b"),
        );
        edge.label = Some("reads".into());

        edge.apply(EdgePatch {
            animated: Some(true),
            style: Some(EdgeStyle {
                dash: smallvec![4.0, 2.0],
            }),
            ..EdgePatch::default()
        });

        assert_eq!(edge.label.as_deref(), Some("reads"));
        assert_eq!(edge.kind, EdgeKind::Smoothstep);
        assert!(edge.animated);
        assert_eq!(edge.style.unwrap().dash.as_slice(), &[4.0, 2.0]);
    }

    #[test]
    fn edge_kind_serializes_lowercase() {
        let json = serde_json::to_string(&EdgeKind::Smoothstep).unwrap();
        assert_eq!(json, "\"smoothstep\"");
        let back: EdgeKind = serde_json::from_str("\"bezier\"").unwrap();
        assert_eq!(back, EdgeKind::Bezier);
    }

    #[test]
    fn node_wire_shape_uses_type_key() {
        let node = ProjectNode::new(
            ElementId::intern("node_7"),
            "service",
            Position::new(10.0, 20.0),
            "Service".into(),
        );
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "service");
        assert_eq!(value["position"]["x"], 10.0);
        assert_eq!(value["data"]["name"], "Service");
    }
}
