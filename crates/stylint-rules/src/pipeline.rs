//! Validation pipeline
//!
//! [`ValidationPipeline`] subscribes to a document and keeps the
//! diagnostics of every item up to date:
//!
//! - a replaced tree is checked in full, items in parallel
//! - an incremental batch first forgets everything owned by or anchored in
//!   removed nodes, then re-checks each item inside the inserted and changed
//!   subtrees
//!
//! Items outside those subtrees keep their previous diagnostics. A checker
//! whose answer depends on siblings of the edited node must get its item
//! re-announced through `Document::force_revalidate`.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use parking_lot::Mutex;
use rayon::prelude::*;
use stylint_core::{
    Diagnostic, ItemsChanged, NodeId, NodeKind, Result, StyleTree, TreeListener,
};

use crate::checker::{CheckerContext, ItemCheckResult};
use crate::registry::{ActiveChecker, CheckerRegistry};

pub struct ValidationPipeline {
    checkers: Vec<ActiveChecker>,
    item_kinds: HashSet<NodeKind>,
    locale: String,
    results: Mutex<HashMap<NodeId, Vec<Diagnostic>>>,
}

impl ValidationPipeline {
    /// Pipeline running the enabled checkers of `registry` in resolved order
    pub fn new(registry: &CheckerRegistry, locale: impl Into<String>) -> Result<Self> {
        Ok(Self::from_checkers(registry.resolve()?, locale))
    }

    pub fn from_checkers(checkers: Vec<ActiveChecker>, locale: impl Into<String>) -> Self {
        let item_kinds = checkers
            .iter()
            .flat_map(|active| active.checker.item_kinds().iter().copied())
            .collect();
        Self {
            checkers,
            item_kinds,
            locale: locale.into(),
            results: Mutex::new(HashMap::new()),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Run every applicable checker on one item
    pub fn check_item(&self, tree: &StyleTree, item: NodeId) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let Some(kind) = tree.kind(item) else {
            return diagnostics;
        };
        for active in &self.checkers {
            if !active.checker.item_kinds().contains(&kind) {
                continue;
            }
            let mut ctx = CheckerContext::new(
                active.checker.rule_id(),
                active.severity,
                &self.locale,
                &mut diagnostics,
            );
            if active.checker.check_item(tree, item, &mut ctx) == ItemCheckResult::StopItem {
                tracing::trace!(?item, checker = active.checker.name(), "item check stopped");
                break;
            }
        }
        diagnostics
    }

    /// Forget all results and check every item below `root`
    pub fn check_tree(&self, tree: &StyleTree, root: NodeId) {
        let items = self.items_under(tree, root);
        let found: Vec<(NodeId, Vec<Diagnostic>)> = items
            .par_iter()
            .map(|&item| (item, self.check_item(tree, item)))
            .filter(|(_, diagnostics)| !diagnostics.is_empty())
            .collect();

        tracing::debug!(
            items = items.len(),
            flagged = found.len(),
            "checked full tree"
        );
        let mut results = self.results.lock();
        results.clear();
        results.extend(found);
    }

    /// Current diagnostics in document order
    pub fn diagnostics(&self, tree: &StyleTree) -> Vec<Diagnostic> {
        let results = self.results.lock();
        tree.descendants(tree.root())
            .filter_map(|node| results.get(&node))
            .flatten()
            .cloned()
            .collect()
    }

    pub fn diagnostics_for(&self, item: NodeId) -> Vec<Diagnostic> {
        self.results.lock().get(&item).cloned().unwrap_or_default()
    }

    pub fn diagnostic_count(&self) -> usize {
        self.results.lock().values().map(Vec::len).sum()
    }

    fn items_under(&self, tree: &StyleTree, root: NodeId) -> Vec<NodeId> {
        tree.descendants(root)
            .filter(|&node| tree.kind(node).is_some_and(|kind| self.item_kinds.contains(&kind)))
            .collect()
    }
}

impl TreeListener for ValidationPipeline {
    fn tree_replaced(&self, tree: &StyleTree, root: NodeId) {
        self.check_tree(tree, root);
    }

    fn items_changed(&self, tree: &StyleTree, change: &ItemsChanged) {
        let items: IndexSet<NodeId> = change
            .inserted
            .iter()
            .chain(&change.changed)
            .filter(|&&root| tree.is_attached(root))
            .flat_map(|&root| self.items_under(tree, root))
            .collect();
        let checked: Vec<(NodeId, Vec<Diagnostic>)> = items
            .iter()
            .map(|&item| (item, self.check_item(tree, item)))
            .collect();

        let mut results = self.results.lock();
        results.retain(|&item, diagnostics| {
            if !tree.is_attached(item) {
                return false;
            }
            diagnostics.retain(|diagnostic| tree.is_attached(diagnostic.anchor));
            !diagnostics.is_empty()
        });
        for (item, diagnostics) in checked {
            if diagnostics.is_empty() {
                results.remove(&item);
            } else {
                results.insert(item, diagnostics);
            }
        }
        tracing::debug!(
            rechecked = items.len(),
            flagged_items = results.len(),
            "incremental validation done"
        );
    }
}

impl std::fmt::Debug for ValidationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationPipeline")
            .field("checkers", &self.checkers)
            .field("locale", &self.locale)
            .field("diagnostics", &self.diagnostic_count())
            .finish()
    }
}
