//! The project graph store.
//!
//! Owns the authoritative in-memory node/edge graph for one open project,
//! the selection state, and the snapshot conversion. One store per open
//! project, exclusively owned by whatever embeds it; every operation is a
//! synchronous `&mut self` transition, applied in call order.
//!
//! Failure modes degrade to no-ops rather than errors: mutating an unknown
//! id does nothing, a duplicate edge request returns the existing edge.
//! The UI layer wrapping the store decides what, if anything, to tell the
//! user.

use crate::id::{CounterIds, ElementId, IdGen};
use crate::model::{EdgePatch, NodeDataPatch, Position, ProjectEdge, ProjectNode};
use crate::naming::{NamePolicy, TitleCaseNames};
use crate::snapshot::{ProjectSnapshot, SNAPSHOT_VERSION};
use chrono::Utc;
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// In-memory project graph with selection state.
pub struct GraphStore {
    /// The underlying directed graph: node weights are the canvas nodes,
    /// edge weights the visual connections.
    graph: StableDiGraph<ProjectNode, ProjectEdge>,

    /// Index from element id → graph index, for both element classes.
    node_index: HashMap<ElementId, NodeIndex>,
    edge_index: HashMap<ElementId, EdgeIndex>,

    /// Insertion order of live elements. Stable indices get reused after
    /// removals, so snapshot ordering comes from here, not from petgraph.
    node_order: Vec<ElementId>,
    edge_order: Vec<ElementId>,

    /// Independent selection slots — selecting a node does not clear the
    /// edge selection, and vice versa.
    selected_node: Option<ElementId>,
    selected_edge: Option<ElementId>,

    ids: Box<dyn IdGen>,
    naming: Box<dyn NamePolicy>,
}

impl GraphStore {
    /// Create an empty store with the default id generator and naming policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policies(Box::new(CounterIds::default()), Box::new(TitleCaseNames))
    }

    /// Create an empty store with injected id generation and naming.
    pub fn with_policies(ids: Box<dyn IdGen>, naming: Box<dyn NamePolicy>) -> Self {
        Self {
            graph: StableDiGraph::new(),
            node_index: HashMap::new(),
            edge_index: HashMap::new(),
            node_order: Vec::new(),
            edge_order: Vec::new(),
            selected_node: None,
            selected_edge: None,
            ids,
            naming,
        }
    }

    /// Next generated id not already present in the graph. Guards against
    /// collisions with ids carried in from a loaded snapshot.
    fn fresh_id(&mut self, prefix: &str, taken: fn(&Self, ElementId) -> bool) -> ElementId {
        loop {
            let id = self.ids.fresh(prefix);
            if !taken(self, id) {
                return id;
            }
        }
    }

    // ─── Node operations ─────────────────────────────────────────────────

    /// Create a node of the given type at the given position and return its
    /// id. The initial name comes from the naming policy; description and
    /// attributes start empty. Always succeeds.
    pub fn add_node(&mut self, node_type: &str, position: Position) -> ElementId {
        let id = self.fresh_id("node", |s, id| s.node_index.contains_key(&id));
        let name = self.naming.default_node_name(node_type);
        let idx = self
            .graph
            .add_node(ProjectNode::new(id, node_type, position, name));
        self.node_index.insert(id, idx);
        self.node_order.push(id);
        log::trace!("add node {id} ({node_type})");
        id
    }

    /// Shallow-merge a patch into the node's `data`. No-op on unknown id.
    pub fn update_node(&mut self, id: ElementId, patch: NodeDataPatch) {
        if let Some(&idx) = self.node_index.get(&id) {
            self.graph[idx].data.apply(patch);
            log::trace!("update node {id}");
        }
    }

    /// Replace the node's position wholesale. No-op on unknown id.
    pub fn update_node_position(&mut self, id: ElementId, position: Position) {
        if let Some(&idx) = self.node_index.get(&id) {
            self.graph[idx].position = position;
        }
    }

    /// Remove a node and every edge touching it. Clears the node selection
    /// if it pointed at the node, and the edge selection if the selected
    /// edge had the node as an endpoint (checked before the cascade).
    /// No-op on unknown id.
    pub fn delete_node(&mut self, id: ElementId) {
        let Some(&idx) = self.node_index.get(&id) else {
            return;
        };

        // Selected-edge check runs against pre-cascade edge state.
        if let Some(sel) = self.selected_edge
            && self
                .edge(sel)
                .is_some_and(|e| e.source == id || e.target == id)
        {
            self.selected_edge = None;
        }

        let incident: Vec<ElementId> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.weight().id)
            .collect();
        for eid in &incident {
            self.edge_index.remove(eid);
        }
        self.edge_order.retain(|eid| !incident.contains(eid));

        self.graph.remove_node(idx);
        self.node_index.remove(&id);
        self.node_order.retain(|nid| *nid != id);

        if self.selected_node == Some(id) {
            self.selected_node = None;
        }
        log::trace!("delete node {id} (+{} edges)", incident.len());
    }

    // ─── Edge operations ─────────────────────────────────────────────────

    /// Connect two nodes. If the pair is already connected — in either
    /// direction — this returns the existing edge's id without mutating
    /// anything. A new edge starts as an unlabeled, non-animated
    /// smoothstep. Returns `None` when either endpoint is unknown.
    pub fn add_edge(&mut self, source: ElementId, target: ElementId) -> Option<ElementId> {
        let (&s, &t) = match (self.node_index.get(&source), self.node_index.get(&target)) {
            (Some(s), Some(t)) => (s, t),
            _ => return None,
        };
        if let Some((existing, _)) = self.graph.find_edge_undirected(s, t) {
            return Some(self.graph[existing].id);
        }

        let id = self.fresh_id("edge", |st, id| st.edge_index.contains_key(&id));
        let eidx = self.graph.add_edge(s, t, ProjectEdge::new(id, source, target));
        self.edge_index.insert(id, eidx);
        self.edge_order.push(id);
        log::trace!("add edge {id} ({source} -> {target})");
        Some(id)
    }

    /// Shallow-merge a patch into the edge. No-op on unknown id.
    pub fn update_edge(&mut self, id: ElementId, patch: EdgePatch) {
        if let Some(&eidx) = self.edge_index.get(&id)
            && let Some(edge) = self.graph.edge_weight_mut(eidx)
        {
            edge.apply(patch);
            log::trace!("update edge {id}");
        }
    }

    /// Remove an edge; clears the edge selection if it was selected.
    /// No-op on unknown id.
    pub fn delete_edge(&mut self, id: ElementId) {
        let Some(eidx) = self.edge_index.remove(&id) else {
            return;
        };
        self.graph.remove_edge(eidx);
        self.edge_order.retain(|eid| *eid != id);
        if self.selected_edge == Some(id) {
            self.selected_edge = None;
        }
        log::trace!("delete edge {id}");
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select_node(&mut self, id: Option<ElementId>) {
        self.selected_node = id;
    }

    pub fn select_edge(&mut self, id: Option<ElementId>) {
        self.selected_edge = id;
    }

    pub fn selected_node(&self) -> Option<ElementId> {
        self.selected_node
    }

    pub fn selected_edge(&self) -> Option<ElementId> {
        self.selected_edge
    }

    // ─── Snapshot conversion ─────────────────────────────────────────────

    /// Replace the whole graph with a snapshot's contents and clear both
    /// selections. The snapshot's `version` is not inspected here — bytes
    /// from storage go through the `snapshot` codecs, which enforce it.
    ///
    /// Degraded inputs are tolerated: nodes repeating an already-seen id
    /// and edges referencing missing endpoints are skipped with a warning
    /// instead of failing the load.
    pub fn load(&mut self, snapshot: ProjectSnapshot) {
        self.graph.clear();
        self.node_index.clear();
        self.edge_index.clear();
        self.node_order.clear();
        self.edge_order.clear();
        self.selected_node = None;
        self.selected_edge = None;

        for node in snapshot.nodes {
            let id = node.id;
            if self.node_index.contains_key(&id) {
                log::warn!("load: duplicate node id {id} skipped");
                continue;
            }
            let idx = self.graph.add_node(node);
            self.node_index.insert(id, idx);
            self.node_order.push(id);
        }

        for edge in snapshot.edges {
            let id = edge.id;
            if self.edge_index.contains_key(&id) {
                log::warn!("load: duplicate edge id {id} skipped");
                continue;
            }
            let (Some(&s), Some(&t)) = (
                self.node_index.get(&edge.source),
                self.node_index.get(&edge.target),
            ) else {
                log::warn!("load: edge {id} references a missing node, skipped");
                continue;
            };
            let eidx = self.graph.add_edge(s, t, edge);
            self.edge_index.insert(id, eidx);
            self.edge_order.push(id);
        }

        log::debug!(
            "loaded project: {} nodes, {} edges",
            self.node_order.len(),
            self.edge_order.len()
        );
    }

    /// Materialize the current state as a snapshot: current format version,
    /// nodes and edges in insertion order, creation timestamp now. A copy,
    /// not a live view.
    #[must_use]
    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            version: SNAPSHOT_VERSION,
            nodes: self.nodes().cloned().collect(),
            edges: self.edges().cloned().collect(),
            updated_at: Utc::now(),
        }
    }

    /// Empty the graph and clear both selections.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.node_index.clear();
        self.edge_index.clear();
        self.node_order.clear();
        self.edge_order.clear();
        self.selected_node = None;
        self.selected_edge = None;
        log::debug!("cleared project");
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn node(&self, id: ElementId) -> Option<&ProjectNode> {
        self.node_index.get(&id).map(|&idx| &self.graph[idx])
    }

    pub fn edge(&self, id: ElementId) -> Option<&ProjectEdge> {
        self.edge_index.get(&id).and_then(|&eidx| self.graph.edge_weight(eidx))
    }

    /// Live nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &ProjectNode> {
        self.node_order
            .iter()
            .filter_map(|id| self.node_index.get(id).map(|&idx| &self.graph[idx]))
    }

    /// Live edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &ProjectEdge> {
        self.edge_order
            .iter()
            .filter_map(|id| self.edge_index.get(id).and_then(|&e| self.graph.edge_weight(e)))
    }

    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_order.len()
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
