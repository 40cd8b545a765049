//! Tree-change notifications

use slotmap::new_key_type;

use crate::tree::{NodeId, StyleTree};

new_key_type! {
    /// Handle returned by [`Document::subscribe`](super::Document::subscribe)
    pub struct SubscriptionId;
}

/// One batch of incremental changes
///
/// `inserted` and `deleted` hold the top-level roots of the changed
/// subtrees, which may be any node kind. Deleted roots are already unlinked
/// from their parents but still readable while listeners run. `changed`
/// lists nodes whose content did not move but must be checked again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemsChanged {
    pub inserted: Vec<NodeId>,
    pub deleted: Vec<NodeId>,
    pub changed: Vec<NodeId>,
}

impl ItemsChanged {
    /// A batch that only asks for `nodes` to be checked again
    pub fn revalidate(nodes: Vec<NodeId>) -> Self {
        Self {
            changed: nodes,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.deleted.is_empty() && self.changed.is_empty()
    }
}

/// Receiver of tree-change notifications
///
/// Listeners get a shared borrow of the tree, so they cannot mutate it
/// while a notification is being delivered. Work that needs to change the
/// document has to be deferred.
pub trait TreeListener: Send + Sync {
    /// The whole tree was rebuilt and `root` is the new root
    fn tree_replaced(&self, tree: &StyleTree, root: NodeId);

    /// Part of the tree changed
    fn items_changed(&self, tree: &StyleTree, change: &ItemsChanged);
}
