//! Undo/Redo command stack.
//!
//! Every undoable action is captured as a pair of whole-project snapshots
//! (before/after); undo and redo restore through `GraphStore::load`.
//! Restoring clears both selections, the same way opening the project at
//! that point would.
//!
//! Batches group several store mutations — an assistant op batch, a
//! multi-step gesture — into one atomic undo step.

use vse_core::{GraphStore, ProjectSnapshot};

/// A reversible edit: the project before and after.
#[derive(Debug, Clone)]
pub struct Command {
    before: ProjectSnapshot,
    after: ProjectSnapshot,
    description: String,
}

/// Manages undo/redo stacks with batch grouping.
pub struct CommandStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Snapshot captured at the start of a batch.
    batch_snapshot: Option<ProjectSnapshot>,
    /// Whether any mutations ran during the current batch.
    batch_dirty: bool,
}

impl CommandStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::new(),
            max_depth,
            batch_depth: 0,
            batch_snapshot: None,
            batch_dirty: false,
        }
    }

    /// Start a batch group. Captures the current project as the undo
    /// snapshot; all mutations until `end_batch` are applied live but
    /// tracked as one atomic undo step.
    pub fn begin_batch(&mut self, store: &GraphStore) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(store.snapshot());
            self.batch_dirty = false;
        }
        self.batch_depth += 1;
    }

    /// End a batch group. When the outermost batch closes, if the graph
    /// actually changed, push one command covering the whole batch.
    pub fn end_batch(&mut self, store: &GraphStore, description: &str) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            if self.batch_dirty {
                let after = store.snapshot();
                let before = self.batch_snapshot.take().unwrap_or_else(ProjectSnapshot::empty);
                if !before.same_graph(&after) {
                    self.push(Command {
                        before,
                        after,
                        description: description.to_string(),
                    });
                }
            }
            self.batch_snapshot = None;
            self.batch_dirty = false;
        }
    }

    /// Run a mutation against the store and track it for undo. Inside a
    /// batch the mutation is applied live and folded into the batch's
    /// snapshot pair; outside, it becomes its own undo step (unless it
    /// changed nothing).
    pub fn execute(
        &mut self,
        store: &mut GraphStore,
        description: &str,
        edit: impl FnOnce(&mut GraphStore),
    ) {
        if self.batch_depth > 0 {
            edit(store);
            self.batch_dirty = true;
            return;
        }

        let before = store.snapshot();
        edit(store);
        let after = store.snapshot();
        if before.same_graph(&after) {
            return;
        }
        self.push(Command {
            before,
            after,
            description: description.to_string(),
        });
    }

    fn push(&mut self, cmd: Command) {
        self.undo_stack.push(cmd);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        // New action invalidates the redo history.
        self.redo_stack.clear();
    }

    /// Undo the last command. Returns its description.
    pub fn undo(&mut self, store: &mut GraphStore) -> Option<String> {
        let cmd = self.undo_stack.pop()?;
        store.load(cmd.before.clone());
        let desc = cmd.description.clone();
        self.redo_stack.push(cmd);
        Some(desc)
    }

    /// Redo the last undone command. Returns its description.
    pub fn redo(&mut self, store: &mut GraphStore) -> Option<String> {
        let cmd = self.redo_stack.pop()?;
        store.load(cmd.after.clone());
        let desc = cmd.description.clone();
        self.undo_stack.push(cmd);
        Some(desc)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}
