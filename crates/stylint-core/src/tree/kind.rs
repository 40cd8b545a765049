//! Node kinds of the stylesheet tree

use serde::{Deserialize, Serialize};

/// Kind of a node in a [`StyleTree`](super::StyleTree)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Root of a document: a list of rule sets and at-rules
    StyleSheet,
    /// `@media screen { ... }`; the prelude is stored as node text
    AtRule,
    /// Selector plus rule block
    RuleSet,
    /// Selector text token
    Selector,
    /// `{ ... }` declaration list of a rule set
    RuleBlock,
    /// `property: value value;`
    Declaration,
    /// Property name token of a declaration
    PropertyName,
    /// One value token of a declaration
    PropertyValue,
}

impl NodeKind {
    /// Whether nodes of this kind are leaves carrying text
    pub fn is_token(self) -> bool {
        matches!(
            self,
            NodeKind::Selector | NodeKind::PropertyName | NodeKind::PropertyValue
        )
    }

    /// Stable lowercase name used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::StyleSheet => "stylesheet",
            NodeKind::AtRule => "at-rule",
            NodeKind::RuleSet => "rule-set",
            NodeKind::Selector => "selector",
            NodeKind::RuleBlock => "rule-block",
            NodeKind::Declaration => "declaration",
            NodeKind::PropertyName => "property-name",
            NodeKind::PropertyValue => "property-value",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
