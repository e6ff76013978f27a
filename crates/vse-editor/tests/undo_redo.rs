//! Integration tests: undo/redo command stack (vse-editor).
//!
//! Exercises CommandStack + GraphStore across the crate boundary: single
//! mutations, cascade-heavy deletes, and whole op batches as one undo step.

use pretty_assertions::assert_eq;
use vse_core::{ElementId, GraphStore, NodeDataPatch, Position};
use vse_editor::commands::CommandStack;
use vse_editor::ops::{EditOp, apply_ops};

/// A project with an api → service → database chain.
fn make_store() -> (GraphStore, [ElementId; 3]) {
    let mut store = GraphStore::new();
    let api = store.add_node("api_gateway", Position::new(0.0, 0.0));
    let svc = store.add_node("service", Position::new(200.0, 0.0));
    let db = store.add_node("database", Position::new(400.0, 0.0));
    store.add_edge(api, svc);
    store.add_edge(svc, db);
    (store, [api, svc, db])
}

// ─── Basic undo/redo ─────────────────────────────────────────────────────

#[test]
fn undo_restores_previous_state() {
    let (mut store, [_, svc, _]) = make_store();
    let mut stack = CommandStack::new(100);

    stack.execute(&mut store, "Rename service", |s| {
        s.update_node(
            svc,
            NodeDataPatch {
                name: Some("Order Service".into()),
                ..NodeDataPatch::default()
            },
        );
    });
    assert_eq!(store.node(svc).unwrap().data.name, "Order Service");

    let desc = stack.undo(&mut store);
    assert_eq!(desc.as_deref(), Some("Rename service"));
    assert_eq!(store.node(svc).unwrap().data.name, "Service");
}

#[test]
fn undo_of_delete_restores_cascaded_edges() {
    let (mut store, [_, svc, _]) = make_store();
    let mut stack = CommandStack::new(100);

    stack.execute(&mut store, "Delete service", |s| s.delete_node(svc));
    assert_eq!(store.node_count(), 2);
    assert_eq!(store.edge_count(), 0);

    stack.undo(&mut store);
    assert_eq!(store.node_count(), 3);
    assert_eq!(store.edge_count(), 2, "cascaded edges must come back");
    assert!(store.node(svc).is_some());
}

#[test]
fn redo_reapplies_undone_edit() {
    let (mut store, [api, _, _]) = make_store();
    let mut stack = CommandStack::new(100);

    stack.execute(&mut store, "Move gateway", |s| {
        s.update_node_position(api, Position::new(50.0, 75.0));
    });
    stack.undo(&mut store);
    assert_eq!(store.node(api).unwrap().position, Position::new(0.0, 0.0));

    let desc = stack.redo(&mut store);
    assert_eq!(desc.as_deref(), Some("Move gateway"));
    assert_eq!(store.node(api).unwrap().position, Position::new(50.0, 75.0));
}

#[test]
fn undo_lands_in_deselected_state() {
    let (mut store, [api, _, _]) = make_store();
    let mut stack = CommandStack::new(100);

    stack.execute(&mut store, "Add cache", |s| {
        s.add_node("cache", Position::new(0.0, 200.0));
    });
    store.select_node(Some(api));

    stack.undo(&mut store);
    assert_eq!(store.selected_node(), None);
    assert_eq!(store.selected_edge(), None);
}

// ─── Batches ─────────────────────────────────────────────────────────────

#[test]
fn op_batch_is_one_undo_step() {
    let (mut store, [api, _, db]) = make_store();
    let mut stack = CommandStack::new(100);

    let ops = vec![
        EditOp::AddNode {
            node_type: "cache".into(),
            position: Position::new(400.0, 200.0),
            id: Some(ElementId::intern("cache_handle")),
            data: None,
        },
        EditOp::AddEdge {
            source: ElementId::intern("cache_handle"),
            target: db,
            label: None,
        },
        EditOp::DeleteNode { id: api },
    ];

    stack.begin_batch(&store);
    stack.execute(&mut store, "apply ops", |s| {
        apply_ops(s, ops);
    });
    stack.end_batch(&store, "Assistant edit");

    assert_eq!(store.node_count(), 3);
    assert_eq!(store.edge_count(), 2);

    let desc = stack.undo(&mut store);
    assert_eq!(desc.as_deref(), Some("Assistant edit"));
    assert_eq!(store.node_count(), 3);
    assert_eq!(store.edge_count(), 2);
    assert!(store.node(api).is_some(), "deleted gateway restored");
    assert!(!stack.can_undo(), "batch must be a single step");

    stack.redo(&mut store);
    assert!(store.node(api).is_none());
}
