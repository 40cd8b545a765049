//! Typed views over tree nodes
//!
//! Views are cheap `Copy` wrappers of `(&StyleTree, NodeId)` created with
//! `cast`, which checks the node kind. They always read the current
//! children, so a view observes edits made after it was created.

use super::{NodeId, NodeKind, StyleTree};

/// Text leaf of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'t> {
    id: NodeId,
    text: &'t str,
}

impl<'t> Token<'t> {
    pub(crate) fn new(id: NodeId, text: &'t str) -> Self {
        Self { id, text }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn text(&self) -> &'t str {
        self.text
    }
}

/// `property: value value;`
#[derive(Debug, Clone, Copy)]
pub struct Declaration<'t> {
    tree: &'t StyleTree,
    id: NodeId,
}

impl<'t> Declaration<'t> {
    pub fn cast(tree: &'t StyleTree, id: NodeId) -> Option<Self> {
        (tree.kind(id)? == NodeKind::Declaration).then_some(Self { tree, id })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Property name token, absent when the parser could not produce one
    pub fn property_name(&self) -> Option<Token<'t>> {
        let tree = self.tree;
        tree.children(self.id)
            .iter()
            .find_map(|&child| tree.token(child, NodeKind::PropertyName))
    }

    pub fn property(&self) -> Option<&'t str> {
        self.property_name().map(|token| token.text())
    }

    pub fn values(self) -> impl Iterator<Item = Token<'t>> {
        let tree = self.tree;
        tree.children(self.id)
            .iter()
            .filter_map(move |&child| tree.token(child, NodeKind::PropertyValue))
    }

    /// Whether some value token has exactly this text
    pub fn has_value(self, text: &str) -> bool {
        self.values().any(|value| value.text() == text)
    }

    /// Enclosing rule block
    pub fn rule_block(&self) -> Option<NodeId> {
        self.tree.parent(self.id)
    }
}

/// `{ ... }` declaration list
#[derive(Debug, Clone, Copy)]
pub struct RuleBlock<'t> {
    tree: &'t StyleTree,
    id: NodeId,
}

impl<'t> RuleBlock<'t> {
    pub fn cast(tree: &'t StyleTree, id: NodeId) -> Option<Self> {
        (tree.kind(id)? == NodeKind::RuleBlock).then_some(Self { tree, id })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn is_valid(&self) -> bool {
        self.tree.is_valid(self.id)
    }

    /// Direct child declarations in document order
    pub fn declarations(self) -> impl Iterator<Item = Declaration<'t>> {
        let tree = self.tree;
        tree.children(self.id)
            .iter()
            .filter_map(move |&child| Declaration::cast(tree, child))
    }

    /// Selector text of the owning rule set
    pub fn selector(&self) -> Option<&'t str> {
        let tree = self.tree;
        let rule_set = tree.parent(self.id)?;
        tree.children(rule_set)
            .iter()
            .find_map(|&child| tree.token(child, NodeKind::Selector))
            .map(|token| token.text())
    }
}
