//! Arena storage for the stylesheet tree
//!
//! Nodes live in a [`SlotMap`], so a [`NodeId`] is a generational handle:
//! once a node is freed its id never resolves again, even after the slot is
//! reused. Readers can hold ids across edits and detect staleness with
//! [`StyleTree::contains`] instead of dangling.

use slotmap::{SlotMap, new_key_type};

use super::{Fragment, NodeKind, Token};
use crate::error::StylintError;
use crate::result::Result;

new_key_type! {
    /// Identity of a node in a [`StyleTree`].
    ///
    /// Equality is identity: two declarations with identical text have
    /// different ids.
    pub struct NodeId;
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    text: Option<String>,
    valid: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Set on the root of a removed subtree until it is freed.
    detached: bool,
}

/// Stylesheet parse tree
#[derive(Debug, Clone)]
pub struct StyleTree {
    nodes: SlotMap<NodeId, NodeData>,
    root: NodeId,
}

impl StyleTree {
    /// Empty stylesheet
    pub fn new() -> Self {
        Self::from_fragment(&Fragment::stylesheet([]))
    }

    pub fn from_fragment(fragment: &Fragment) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = alloc_into(&mut nodes, fragment, None);
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether the id still resolves to a node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.nodes.get(id).map(|n| n.kind)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).and_then(|n| n.text.as_deref())
    }

    /// Parent node. Removed nodes keep the parent they had.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Parser validity flag; unknown nodes are never valid
    pub fn is_valid(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.valid)
    }

    /// Whether the node is reachable from the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            let Some(data) = self.nodes.get(current) else {
                return false;
            };
            if data.detached {
                return false;
            }
            if current == self.root {
                return true;
            }
            match data.parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Leaf view of a node if it has the given token kind
    pub fn token(&self, id: NodeId, kind: NodeKind) -> Option<Token<'_>> {
        let data = self.nodes.get(id)?;
        if data.kind != kind {
            return None;
        }
        data.text.as_deref().map(|text| Token::new(id, text))
    }

    /// Pre-order traversal of `id` and everything below it
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.contains(id) { vec![id] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    /// Parent chain of `id`, nearest first, excluding `id` itself
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&node| self.parent(node))
    }

    /// All nodes of `kind` reachable from `id` (including `id`), in document order
    pub fn collect(&self, id: NodeId, kind: NodeKind) -> Vec<NodeId> {
        self.descendants(id)
            .filter(|&node| self.kind(node) == Some(kind))
            .collect()
    }

    /// All declarations reachable from `id`
    pub fn declarations(&self, id: NodeId) -> Vec<NodeId> {
        self.collect(id, NodeKind::Declaration)
    }

    /// Number of live nodes, including removed subtrees not yet freed
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    pub(crate) fn insert_fragment(
        &mut self,
        parent: NodeId,
        index: usize,
        fragment: &Fragment,
    ) -> Result<NodeId> {
        let Some(parent_kind) = self.kind(parent) else {
            return Err(StylintError::UnknownNode { node: parent });
        };
        if parent_kind.is_token() {
            return Err(StylintError::tree_edit(format!(
                "cannot insert children under a {parent_kind} token"
            )));
        }
        if !self.is_attached(parent) {
            return Err(StylintError::tree_edit("cannot insert under a removed node"));
        }
        let len = self.children(parent).len();
        if index > len {
            return Err(StylintError::tree_edit(format!(
                "insertion index {index} out of range for {len} children"
            )));
        }

        let id = alloc_into(&mut self.nodes, fragment, Some(parent));
        self.nodes[parent].children.insert(index, id);
        Ok(id)
    }

    /// Unlink `id` from its parent, keeping its parent pointer and contents
    pub(crate) fn detach(&mut self, id: NodeId) -> Result<()> {
        if !self.contains(id) {
            return Err(StylintError::UnknownNode { node: id });
        }
        if id == self.root {
            return Err(StylintError::tree_edit("cannot remove the stylesheet root"));
        }
        if !self.is_attached(id) {
            return Err(StylintError::tree_edit("node was already removed"));
        }
        if let Some(parent) = self.nodes[id].parent {
            self.nodes[parent].children.retain(|&child| child != id);
        }
        self.nodes[id].detached = true;
        Ok(())
    }

    /// Drop `id` and its subtree from the arena
    pub(crate) fn free(&mut self, id: NodeId) {
        let doomed: Vec<NodeId> = self.descendants(id).collect();
        for node in doomed {
            self.nodes.remove(node);
        }
    }

    pub(crate) fn set_valid(&mut self, id: NodeId, valid: bool) -> Result<()> {
        let data = self
            .nodes
            .get_mut(id)
            .ok_or(StylintError::UnknownNode { node: id })?;
        data.valid = valid;
        Ok(())
    }

    /// Swap the whole tree for `fragment`, reusing the arena so old ids stay dead
    pub(crate) fn replace_root(&mut self, fragment: &Fragment) -> NodeId {
        self.nodes.clear();
        self.root = alloc_into(&mut self.nodes, fragment, None);
        self.root
    }
}

impl Default for StyleTree {
    fn default() -> Self {
        Self::new()
    }
}

fn alloc_into(
    nodes: &mut SlotMap<NodeId, NodeData>,
    fragment: &Fragment,
    parent: Option<NodeId>,
) -> NodeId {
    let id = nodes.insert(NodeData {
        kind: fragment.kind,
        text: fragment.text.clone(),
        valid: fragment.valid,
        parent,
        children: Vec::with_capacity(fragment.children.len()),
        detached: false,
    });
    for child in &fragment.children {
        let child_id = alloc_into(nodes, child, Some(id));
        nodes[id].children.push(child_id);
    }
    id
}

/// Pre-order iterator returned by [`StyleTree::descendants`]
pub struct Descendants<'t> {
    tree: &'t StyleTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(node).iter().rev().copied());
        Some(node)
    }
}
