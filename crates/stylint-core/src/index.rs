//! Incremental index of `display: inline` declarations
//!
//! [`DeclarationIndex`] keeps the set of declarations whose property is
//! `display` and which carry an `inline` value token, for the whole tree of
//! one document. A full tree replacement rebuilds the set; incremental
//! notifications only walk the inserted and deleted subtrees, so the cost of
//! an edit is bounded by the size of the edit, not of the stylesheet.
//!
//! Whenever a batch adds a declaration to the set or removes one from it,
//! the rule block that owns the declaration is handed to the
//! [`RevalidationScheduler`] (once per rule block per batch), because every
//! check on that block may now have a different answer.
//!
//! Invariant: after each notification the set equals [`rescan`] of the
//! current tree.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::Mutex;

use crate::document::{ItemsChanged, TreeListener};
use crate::revalidation::RevalidationScheduler;
use crate::tree::{Declaration, NodeId, NodeKind, StyleTree};

pub const DISPLAY_PROPERTY: &str = "display";
pub const INLINE_VALUE: &str = "inline";

/// `display: inline`, with any other value tokens alongside
pub fn declares_display_inline(declaration: Declaration<'_>) -> bool {
    declaration.property() == Some(DISPLAY_PROPERTY) && declaration.has_value(INLINE_VALUE)
}

/// Matching declarations of the current tree, computed from scratch
pub fn rescan(tree: &StyleTree) -> HashSet<NodeId> {
    matching_declarations(tree, tree.root()).collect()
}

fn matching_declarations(tree: &StyleTree, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    tree.declarations(node).into_iter().filter(move |&id| is_match(tree, id))
}

fn is_match(tree: &StyleTree, id: NodeId) -> bool {
    Declaration::cast(tree, id).is_some_and(declares_display_inline)
}

/// Per-document set of `display: inline` declarations
pub struct DeclarationIndex {
    interesting: Mutex<HashSet<NodeId>>,
    scheduler: Arc<dyn RevalidationScheduler>,
}

impl DeclarationIndex {
    pub fn new(scheduler: Arc<dyn RevalidationScheduler>) -> Self {
        Self {
            interesting: Mutex::new(HashSet::new()),
            scheduler,
        }
    }

    /// Rebuild the set from `root`. Never requests re-validation: a
    /// replaced tree is checked in full by the host anyway.
    pub fn on_tree_replaced(&self, tree: &StyleTree, root: NodeId) {
        let mut interesting = self.interesting.lock();
        interesting.clear();
        interesting.extend(matching_declarations(tree, root));
        tracing::debug!(declarations = interesting.len(), "declaration index rebuilt");
    }

    /// Reconcile the set with one batch of inserted and deleted subtrees.
    ///
    /// Returns the rule blocks that were scheduled for re-validation, in
    /// the order they were first touched.
    pub fn on_items_changed(
        &self,
        tree: &StyleTree,
        inserted: &[NodeId],
        deleted: &[NodeId],
    ) -> Vec<NodeId> {
        let mut touched: IndexSet<NodeId> = IndexSet::new();
        {
            let mut interesting = self.interesting.lock();

            for &root in inserted {
                for declaration in matching_declarations(tree, root) {
                    if interesting.insert(declaration) {
                        tracing::trace!(?declaration, "declaration entered index");
                        touched.extend(tree.parent(declaration));
                    }
                }
            }

            for &root in deleted {
                for declaration in tree.declarations(root) {
                    if interesting.remove(&declaration) {
                        tracing::trace!(?declaration, "declaration left index");
                        touched.extend(tree.parent(declaration));
                    }
                }
            }

            // Edits below a declaration (a value token swapped, a property
            // name removed) change the match of a declaration that is
            // itself neither inserted nor deleted.
            for &root in inserted.iter().chain(deleted) {
                let Some(declaration) = enclosing_declaration(tree, root) else {
                    continue;
                };
                if !tree.is_attached(declaration) {
                    continue;
                }
                let flipped = if is_match(tree, declaration) {
                    interesting.insert(declaration)
                } else {
                    interesting.remove(&declaration)
                };
                if flipped {
                    tracing::trace!(?declaration, "declaration match changed in place");
                    touched.extend(tree.parent(declaration));
                }
            }

            tracing::debug!(
                inserted = inserted.len(),
                deleted = deleted.len(),
                declarations = interesting.len(),
                revalidations = touched.len(),
                "declaration index updated"
            );
        }

        for &rule_block in &touched {
            self.scheduler.schedule(rule_block);
        }
        touched.into_iter().collect()
    }

    pub fn contains(&self, declaration: NodeId) -> bool {
        self.interesting.lock().contains(&declaration)
    }

    pub fn len(&self) -> usize {
        self.interesting.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.interesting.lock().is_empty()
    }

    /// Copy of the current set
    pub fn snapshot(&self) -> HashSet<NodeId> {
        self.interesting.lock().clone()
    }
}

impl TreeListener for DeclarationIndex {
    fn tree_replaced(&self, tree: &StyleTree, root: NodeId) {
        self.on_tree_replaced(tree, root);
    }

    fn items_changed(&self, tree: &StyleTree, change: &ItemsChanged) {
        if change.inserted.is_empty() && change.deleted.is_empty() {
            return;
        }
        self.on_items_changed(tree, &change.inserted, &change.deleted);
    }
}

impl std::fmt::Debug for DeclarationIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeclarationIndex")
            .field("declarations", &self.len())
            .finish()
    }
}

fn enclosing_declaration(tree: &StyleTree, node: NodeId) -> Option<NodeId> {
    tree.ancestors(node)
        .find(|&ancestor| tree.kind(ancestor) == Some(NodeKind::Declaration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::revalidation::RevalidationQueue;
    use crate::tree::{Fragment, RuleBlock};

    struct Fixture {
        doc: Document,
        index: Arc<DeclarationIndex>,
        queue: RevalidationQueue,
    }

    impl Fixture {
        fn new(sheet: Fragment) -> Self {
            let mut doc = Document::from_fragment(&sheet);
            let (sender, queue) = RevalidationQueue::channel();
            let index = Arc::new(DeclarationIndex::new(Arc::new(sender)));
            index.on_tree_replaced(doc.tree(), doc.tree().root());
            doc.subscribe(index.clone());
            Self { doc, index, queue }
        }

        fn block(&self, n: usize) -> NodeId {
            self.doc
                .tree()
                .collect(self.doc.tree().root(), NodeKind::RuleBlock)[n]
        }

        fn assert_consistent(&self) {
            assert_eq!(self.index.snapshot(), rescan(self.doc.tree()));
        }
    }

    #[test]
    fn test_initial_scan() {
        let fx = Fixture::new(Fragment::stylesheet([
            Fragment::rule("a", &[("display", "inline"), ("width", "1px")]),
            Fragment::rule("b", &[("display", "block")]),
            Fragment::at_rule("media print", [Fragment::rule("c", &[("display", "inline")])]),
        ]));
        assert_eq!(fx.index.len(), 2);
        fx.assert_consistent();
    }

    #[test]
    fn test_empty_tree() {
        let fx = Fixture::new(Fragment::stylesheet([]));
        assert!(fx.index.is_empty());
    }

    #[test]
    fn test_insert_declaration_requests_one_revalidation() {
        let mut fx = Fixture::new(Fragment::stylesheet([Fragment::rule(
            "a",
            &[("margin-top", "4px")],
        )]));
        let block = fx.block(0);

        let decl = fx
            .doc
            .append(block, &Fragment::declaration("display", "inline"))
            .unwrap();

        assert!(fx.index.contains(decl));
        assert_eq!(fx.queue.drain(), vec![block]);
        fx.assert_consistent();
    }

    #[test]
    fn test_delete_declaration_requests_one_revalidation() {
        let mut fx = Fixture::new(Fragment::stylesheet([Fragment::rule(
            "a",
            &[("display", "inline"), ("height", "5px")],
        )]));
        let block = fx.block(0);
        let decl = fx.doc.tree().children(block)[0];
        assert!(fx.index.contains(decl));

        fx.doc.remove(decl).unwrap();

        assert!(!fx.index.contains(decl));
        assert_eq!(fx.queue.drain(), vec![block]);
        fx.assert_consistent();
    }

    #[test]
    fn test_requests_are_deduplicated_per_block() {
        let mut fx = Fixture::new(Fragment::stylesheet([Fragment::rule("a", &[])]));
        let block = fx.block(0);

        fx.doc
            .edit(|edit| {
                edit.append(block, &Fragment::declaration("display", "inline"))?;
                edit.append(block, &Fragment::declaration("display", "inline"))
            })
            .unwrap();

        assert_eq!(fx.index.len(), 2);
        assert_eq!(fx.queue.drain(), vec![block]);
    }

    #[test]
    fn test_non_matching_insert_is_silent() {
        let mut fx = Fixture::new(Fragment::stylesheet([Fragment::rule("a", &[])]));
        let block = fx.block(0);
        fx.doc
            .append(block, &Fragment::declaration("width", "10px"))
            .unwrap();
        fx.doc
            .append(block, &Fragment::declaration_without_name("inline"))
            .unwrap();
        assert!(fx.index.is_empty());
        assert!(fx.queue.drain().is_empty());
    }

    #[test]
    fn test_deleting_untracked_declaration_is_silent() {
        let mut fx = Fixture::new(Fragment::stylesheet([Fragment::rule(
            "a",
            &[("display", "inline"), ("width", "1px")],
        )]));
        let block = fx.block(0);
        let width = fx.doc.tree().children(block)[1];
        fx.doc.remove(width).unwrap();
        assert_eq!(fx.index.len(), 1);
        assert!(fx.queue.drain().is_empty());
    }

    #[test]
    fn test_removing_whole_rule_set() {
        let mut fx = Fixture::new(Fragment::stylesheet([
            Fragment::rule("a", &[("display", "inline")]),
            Fragment::rule("b", &[("display", "inline")]),
        ]));
        let root = fx.doc.tree().root();
        let first = fx.doc.tree().children(root)[0];
        let block = fx.block(0);

        fx.doc.remove(first).unwrap();

        assert_eq!(fx.index.len(), 1);
        // the former block is requested even though it is gone; the host drops it
        assert_eq!(fx.queue.drain(), vec![block]);
        assert_eq!(fx.doc.force_revalidate(&[block]), 0);
        fx.assert_consistent();
    }

    #[test]
    fn test_value_token_swap_inside_declaration() {
        let mut fx = Fixture::new(Fragment::stylesheet([Fragment::rule(
            "a",
            &[("display", "block")],
        )]));
        let block = fx.block(0);
        let decl = fx.doc.tree().children(block)[0];
        let value = fx.doc.tree().children(decl)[1];

        fx.doc.replace(value, &Fragment::value("inline")).unwrap();
        assert!(fx.index.contains(decl));
        assert_eq!(fx.queue.drain(), vec![block]);

        let value = fx.doc.tree().children(decl)[1];
        fx.doc.replace(value, &Fragment::value("flex")).unwrap();
        assert!(!fx.index.contains(decl));
        assert_eq!(fx.queue.drain(), vec![block]);
        fx.assert_consistent();
    }

    #[test]
    fn test_sibling_edit_does_not_retrigger() {
        let mut fx = Fixture::new(Fragment::stylesheet([Fragment::rule(
            "a",
            &[("display", "inline"), ("color", "red")],
        )]));
        let block = fx.block(0);
        let color = fx.doc.tree().children(block)[1];
        fx.doc
            .replace(color, &Fragment::declaration("color", "blue"))
            .unwrap();
        assert!(fx.queue.drain().is_empty());
    }

    #[test]
    fn test_replace_matching_declaration_with_identical_text() {
        let mut fx = Fixture::new(Fragment::stylesheet([Fragment::rule(
            "a",
            &[("display", "inline")],
        )]));
        let block = fx.block(0);
        let old = fx.doc.tree().children(block)[0];
        let new = fx
            .doc
            .replace(old, &Fragment::declaration("display", "inline"))
            .unwrap();

        assert!(!fx.index.contains(old));
        assert!(fx.index.contains(new));
        assert_eq!(fx.queue.drain(), vec![block]);
        fx.assert_consistent();
    }

    #[test]
    fn test_tree_replacement_rebuilds_without_revalidation() {
        let mut fx = Fixture::new(Fragment::stylesheet([Fragment::rule(
            "a",
            &[("display", "inline")],
        )]));
        fx.doc.replace_tree(&Fragment::stylesheet([
            Fragment::rule("x", &[("display", "inline")]),
            Fragment::rule("y", &[("display", "inline")]),
        ]));
        assert_eq!(fx.index.len(), 2);
        assert!(fx.queue.drain().is_empty());
        fx.assert_consistent();
    }

    #[test]
    fn test_revalidation_target_is_rule_block() {
        let mut fx = Fixture::new(Fragment::stylesheet([Fragment::rule("a", &[])]));
        let root = fx.doc.tree().root();
        fx.doc
            .append(root, &Fragment::rule("b", &[("display", "inline")]))
            .unwrap();
        let requested = fx.queue.drain();
        assert_eq!(requested.len(), 1);
        let block = RuleBlock::cast(fx.doc.tree(), requested[0]).unwrap();
        assert_eq!(block.selector(), Some("b"));
    }

    #[test]
    fn test_predicate() {
        let tree = StyleTree::from_fragment(&Fragment::stylesheet([Fragment::rule(
            "a",
            &[
                ("display", "inline"),
                ("display", "inline-block"),
                ("Display", "inline"),
                ("visibility", "inline"),
            ],
        )]));
        let matches: Vec<bool> = tree
            .declarations(tree.root())
            .into_iter()
            .map(|id| is_match(&tree, id))
            .collect();
        assert_eq!(matches, [true, false, false, false]);
    }
}
