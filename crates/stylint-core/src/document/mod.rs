//! Documents: the tree-change source
//!
//! A [`Document`] owns one [`StyleTree`] and reports every change to its
//! subscribed [`TreeListener`]s:
//!
//! - [`Document::replace_tree`] fires `tree_replaced`
//! - [`Document::edit`] (and the single-operation wrappers) fires one
//!   `items_changed` per batch with the top-level inserted and deleted roots
//! - [`Document::set_validity`] and [`Document::force_revalidate`] fire
//!   `items_changed` with only `changed` nodes
//!
//! Removed subtrees stay readable until all listeners have been notified,
//! then they are freed and their ids stop resolving.

mod events;
mod registry;

pub use events::{ItemsChanged, SubscriptionId, TreeListener};
pub use registry::{BufferId, DocumentRegistry, SharedDocument};

use std::sync::Arc;

use slotmap::SlotMap;

use crate::error::StylintError;
use crate::result::Result;
use crate::tree::{Fragment, NodeId, StyleTree};

/// A stylesheet document and its change subscribers
pub struct Document {
    tree: StyleTree,
    listeners: SlotMap<SubscriptionId, Arc<dyn TreeListener>>,
}

impl Document {
    /// Document holding an empty stylesheet
    pub fn new() -> Self {
        Self::from_fragment(&Fragment::stylesheet([]))
    }

    pub fn from_fragment(fragment: &Fragment) -> Self {
        Self {
            tree: StyleTree::from_fragment(fragment),
            listeners: SlotMap::with_key(),
        }
    }

    pub fn tree(&self) -> &StyleTree {
        &self.tree
    }

    pub fn subscribe(&mut self, listener: Arc<dyn TreeListener>) -> SubscriptionId {
        let id = self.listeners.insert(listener);
        tracing::trace!(?id, "listener subscribed");
        id
    }

    /// Returns false when the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let removed = self.listeners.remove(id).is_some();
        tracing::trace!(?id, removed, "listener unsubscribed");
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Replace the whole tree, as after a full reparse
    pub fn replace_tree(&mut self, fragment: &Fragment) -> NodeId {
        let root = self.tree.replace_root(fragment);
        tracing::debug!(
            nodes = self.tree.len(),
            listeners = self.listeners.len(),
            "tree replaced"
        );
        for listener in self.listeners.values() {
            listener.tree_replaced(&self.tree, root);
        }
        root
    }

    /// Apply a batch of structural edits and report them as one notification
    ///
    /// Listeners are notified about every operation that succeeded, even
    /// when the closure returns an error part-way through.
    pub fn edit<T>(&mut self, apply: impl FnOnce(&mut TreeEdit<'_>) -> Result<T>) -> Result<T> {
        let mut edit = TreeEdit {
            tree: &mut self.tree,
            inserted: Vec::new(),
            deleted: Vec::new(),
        };
        let outcome = apply(&mut edit);
        let TreeEdit {
            inserted, deleted, ..
        } = edit;

        let change = ItemsChanged {
            inserted,
            deleted,
            changed: Vec::new(),
        };
        if !change.is_empty() {
            self.notify(&change);
        }
        for &root in &change.deleted {
            self.tree.free(root);
        }
        outcome
    }

    pub fn insert(&mut self, parent: NodeId, index: usize, fragment: &Fragment) -> Result<NodeId> {
        self.edit(|edit| edit.insert(parent, index, fragment))
    }

    pub fn append(&mut self, parent: NodeId, fragment: &Fragment) -> Result<NodeId> {
        self.edit(|edit| edit.append(parent, fragment))
    }

    pub fn remove(&mut self, node: NodeId) -> Result<()> {
        self.edit(|edit| edit.remove(node))
    }

    pub fn replace(&mut self, node: NodeId, fragment: &Fragment) -> Result<NodeId> {
        self.edit(|edit| edit.replace(node, fragment))
    }

    /// Re-flag a node's validity, as the parser does after re-checking syntax
    pub fn set_validity(&mut self, node: NodeId, valid: bool) -> Result<()> {
        if !self.tree.is_attached(node) {
            return Err(StylintError::UnknownNode { node });
        }
        self.tree.set_valid(node, valid)?;
        self.notify(&ItemsChanged::revalidate(vec![node]));
        Ok(())
    }

    /// Ask every listener to check `nodes` again without a text edit.
    ///
    /// This is a privileged entry point: it bypasses the edit-capture path
    /// that normally produces `items_changed`, and exists only so a
    /// listener can get a node re-validated after it learned (during an
    /// earlier notification) that the node's meaning changed. Callers must
    /// not invoke it from inside a notification; queue the request and run
    /// it once the current notification has returned.
    ///
    /// Nodes that were removed in the meantime are dropped. Returns the
    /// number of nodes that were actually re-announced.
    pub fn force_revalidate(&self, nodes: &[NodeId]) -> usize {
        let mut live: Vec<NodeId> = Vec::with_capacity(nodes.len());
        for &node in nodes {
            if !self.tree.is_attached(node) {
                tracing::trace!(?node, "skipping revalidation of a removed node");
                continue;
            }
            if !live.contains(&node) {
                live.push(node);
            }
        }
        if live.is_empty() {
            return 0;
        }
        let count = live.len();
        self.notify(&ItemsChanged::revalidate(live));
        count
    }

    fn notify(&self, change: &ItemsChanged) {
        tracing::debug!(
            inserted = change.inserted.len(),
            deleted = change.deleted.len(),
            changed = change.changed.len(),
            listeners = self.listeners.len(),
            "items changed"
        );
        for listener in self.listeners.values() {
            listener.items_changed(&self.tree, change);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.tree.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Edit batch handed to the closure of [`Document::edit`]
pub struct TreeEdit<'d> {
    tree: &'d mut StyleTree,
    inserted: Vec<NodeId>,
    deleted: Vec<NodeId>,
}

impl TreeEdit<'_> {
    /// Current state of the tree, including edits made earlier in this batch
    pub fn tree(&self) -> &StyleTree {
        self.tree
    }

    pub fn insert(&mut self, parent: NodeId, index: usize, fragment: &Fragment) -> Result<NodeId> {
        let id = self.tree.insert_fragment(parent, index, fragment)?;
        self.inserted.push(id);
        Ok(id)
    }

    pub fn append(&mut self, parent: NodeId, fragment: &Fragment) -> Result<NodeId> {
        let index = self.tree.children(parent).len();
        self.insert(parent, index, fragment)
    }

    pub fn remove(&mut self, node: NodeId) -> Result<()> {
        self.tree.detach(node)?;
        self.deleted.push(node);
        Ok(())
    }

    /// Swap `node` for a new subtree at the same position
    pub fn replace(&mut self, node: NodeId, fragment: &Fragment) -> Result<NodeId> {
        let parent = self
            .tree
            .parent(node)
            .ok_or_else(|| StylintError::tree_edit("cannot replace the stylesheet root"))?;
        let index = self
            .tree
            .children(parent)
            .iter()
            .position(|&child| child == node)
            .ok_or_else(|| StylintError::tree_edit("node was already removed"))?;
        self.remove(node)?;
        self.insert(parent, index, fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        replaced: Mutex<Vec<NodeId>>,
        changes: Mutex<Vec<ItemsChanged>>,
        live_deleted: Mutex<Vec<bool>>,
    }

    impl TreeListener for Recorder {
        fn tree_replaced(&self, _tree: &StyleTree, root: NodeId) {
            self.replaced.lock().push(root);
        }

        fn items_changed(&self, tree: &StyleTree, change: &ItemsChanged) {
            self.live_deleted
                .lock()
                .extend(change.deleted.iter().map(|&n| tree.contains(n)));
            self.changes.lock().push(change.clone());
        }
    }

    fn document() -> Document {
        Document::from_fragment(&Fragment::stylesheet([
            Fragment::rule("a", &[("display", "inline")]),
            Fragment::rule("b", &[("color", "red")]),
        ]))
    }

    #[test]
    fn test_edit_batch_is_one_notification() {
        let mut doc = document();
        let recorder = Arc::new(Recorder::default());
        doc.subscribe(recorder.clone());

        let root = doc.tree().root();
        let first = doc.tree().children(root)[0];
        let inserted = doc
            .edit(|edit| {
                edit.remove(first)?;
                edit.append(root, &Fragment::rule("c", &[]))
            })
            .unwrap();

        let changes = recorder.changes.lock();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].inserted, vec![inserted]);
        assert_eq!(changes[0].deleted, vec![first]);
        assert_eq!(*recorder.live_deleted.lock(), vec![true]);
        assert!(!doc.tree().contains(first));
    }

    #[test]
    fn test_failed_edit_still_reports_applied_operations() {
        let mut doc = document();
        let recorder = Arc::new(Recorder::default());
        doc.subscribe(recorder.clone());

        let root = doc.tree().root();
        let first = doc.tree().children(root)[0];
        let result = doc.edit(|edit| {
            edit.remove(first)?;
            edit.remove(root)
        });

        assert!(result.is_err());
        assert_eq!(recorder.changes.lock()[0].deleted, vec![first]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut doc = document();
        let root = doc.tree().root();
        let first = doc.tree().children(root)[0];
        let new = doc.replace(first, &Fragment::rule("z", &[])).unwrap();
        assert_eq!(doc.tree().children(root)[0], new);
        assert_eq!(doc.tree().children(root).len(), 2);
    }

    #[test]
    fn test_replace_tree_notifies() {
        let mut doc = document();
        let recorder = Arc::new(Recorder::default());
        doc.subscribe(recorder.clone());
        let root = doc.replace_tree(&Fragment::stylesheet([]));
        assert_eq!(*recorder.replaced.lock(), vec![root]);
        assert!(doc.tree().is_empty());
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut doc = document();
        let recorder = Arc::new(Recorder::default());
        let id = doc.subscribe(recorder.clone());
        assert!(doc.unsubscribe(id));
        assert!(!doc.unsubscribe(id));

        let root = doc.tree().root();
        doc.append(root, &Fragment::rule("c", &[])).unwrap();
        assert!(recorder.changes.lock().is_empty());
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_force_revalidate_skips_stale_nodes() {
        let mut doc = document();
        let recorder = Arc::new(Recorder::default());
        doc.subscribe(recorder.clone());

        let root = doc.tree().root();
        let first = doc.tree().children(root)[0];
        let second = doc.tree().children(root)[1];
        doc.remove(first).unwrap();
        recorder.changes.lock().clear();

        assert_eq!(doc.force_revalidate(&[first, second, second]), 1);
        let changes = recorder.changes.lock();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0], ItemsChanged::revalidate(vec![second]));
    }

    #[test]
    fn test_force_revalidate_nothing_live_is_silent() {
        let mut doc = document();
        let recorder = Arc::new(Recorder::default());
        let root = doc.tree().root();
        let first = doc.tree().children(root)[0];
        doc.remove(first).unwrap();
        doc.subscribe(recorder.clone());

        assert_eq!(doc.force_revalidate(&[first]), 0);
        assert!(recorder.changes.lock().is_empty());
    }

    #[test]
    fn test_set_validity_reports_changed() {
        let mut doc = document();
        let recorder = Arc::new(Recorder::default());
        doc.subscribe(recorder.clone());

        let block = doc.tree().collect(doc.tree().root(), crate::tree::NodeKind::RuleBlock)[0];
        doc.set_validity(block, false).unwrap();
        assert!(!doc.tree().is_valid(block));
        assert_eq!(recorder.changes.lock()[0].changed, vec![block]);
    }
}
