//! Detached subtree descriptions
//!
//! A [`Fragment`] is an owned, arena-free description of a subtree. The
//! document materializes fragments into its tree when they are inserted,
//! so every insertion produces fresh node identities.
//!
//! ```rust,ignore
//! let sheet = Fragment::stylesheet([
//!     Fragment::rule("a", &[("display", "inline"), ("margin-top", "4px")]),
//!     Fragment::at_rule("media print", [Fragment::rule("p", &[("width", "10px")])]),
//! ]);
//! ```

use super::NodeKind;

/// Owned description of a subtree that has not been inserted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub(crate) kind: NodeKind,
    pub(crate) text: Option<String>,
    pub(crate) valid: bool,
    pub(crate) children: Vec<Fragment>,
}

impl Fragment {
    /// Interior node with children
    pub fn node(kind: NodeKind, children: impl IntoIterator<Item = Fragment>) -> Self {
        Self {
            kind,
            text: None,
            valid: true,
            children: children.into_iter().collect(),
        }
    }

    /// Leaf node carrying text
    pub fn token(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: Some(text.into()),
            valid: true,
            children: Vec::new(),
        }
    }

    pub fn stylesheet(items: impl IntoIterator<Item = Fragment>) -> Self {
        Self::node(NodeKind::StyleSheet, items)
    }

    /// At-rule whose prelude (`media screen`) is kept as node text
    pub fn at_rule(prelude: impl Into<String>, items: impl IntoIterator<Item = Fragment>) -> Self {
        Self {
            text: Some(prelude.into()),
            ..Self::node(NodeKind::AtRule, items)
        }
    }

    pub fn rule_set(selector: impl Into<String>, block: Fragment) -> Self {
        Self::node(
            NodeKind::RuleSet,
            [Self::token(NodeKind::Selector, selector), block],
        )
    }

    pub fn rule_block(declarations: impl IntoIterator<Item = Fragment>) -> Self {
        Self::node(NodeKind::RuleBlock, declarations)
    }

    /// Rule set built from `(property, value)` pairs
    pub fn rule(selector: impl Into<String>, declarations: &[(&str, &str)]) -> Self {
        Self::rule_set(
            selector,
            Self::rule_block(
                declarations
                    .iter()
                    .map(|(property, value)| Self::declaration(property, value)),
            ),
        )
    }

    /// Declaration whose value string is split on whitespace into value tokens
    pub fn declaration(property: &str, value: &str) -> Self {
        let mut children = vec![Self::property_name(property)];
        children.extend(value.split_whitespace().map(Self::value));
        Self::node(NodeKind::Declaration, children)
    }

    /// Declaration the parser could not attach a property name to
    pub fn declaration_without_name(value: &str) -> Self {
        Self::node(
            NodeKind::Declaration,
            value.split_whitespace().map(Self::value),
        )
    }

    pub fn property_name(text: impl Into<String>) -> Self {
        Self::token(NodeKind::PropertyName, text)
    }

    pub fn value(text: impl Into<String>) -> Self {
        Self::token(NodeKind::PropertyValue, text)
    }

    /// Mark the node as flagged invalid by the parser.
    ///
    /// On a rule set this flags its rule block.
    pub fn invalid(mut self) -> Self {
        match self.kind {
            NodeKind::RuleSet => {
                for child in &mut self.children {
                    if child.kind == NodeKind::RuleBlock {
                        child.valid = false;
                    }
                }
            }
            _ => self.valid = false,
        }
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Fragment] {
        &self.children
    }

    /// Number of nodes this fragment materializes into
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Fragment::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_splits_values() {
        let decl = Fragment::declaration("margin", "0 auto");
        assert_eq!(decl.kind(), NodeKind::Declaration);
        let texts: Vec<_> = decl.children().iter().filter_map(Fragment::text).collect();
        assert_eq!(texts, ["margin", "0", "auto"]);
    }

    #[test]
    fn test_invalid_rule_set_flags_block() {
        let rule = Fragment::rule("a", &[("display", "inline")]).invalid();
        assert!(rule.valid);
        let block = &rule.children()[1];
        assert_eq!(block.kind(), NodeKind::RuleBlock);
        assert!(!block.valid);
    }

    #[test]
    fn test_node_count() {
        let rule = Fragment::rule("a", &[("display", "inline"), ("width", "1px")]);
        // rule set, selector, block, 2 x (declaration, name, value)
        assert_eq!(rule.node_count(), 9);
    }
}
