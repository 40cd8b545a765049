//! Properties that have no effect on `display: inline` elements
//!
//! Inline boxes ignore vertical margins and explicit dimensions, so a rule
//! block that declares `display: inline` next to `margin-top`,
//! `margin-bottom`, `height` or `width` almost certainly does not do what
//! its author expects. One diagnostic is reported per offending
//! declaration, anchored at its property name.

use stylint_core::index::declares_display_inline;
use stylint_core::messages::{BEST_PRACTICE_INLINE_INCOMPAT, MessageCatalog};
use stylint_core::{Diagnostic, NodeId, NodeKind, RuleBlock, Severity, StyleTree};

use crate::checker::{CheckerContext, CheckerOrder, ItemCheckResult, ItemChecker};

/// Rule ID for properties incompatible with `display: inline`
pub const DISPLAY_INLINE_INCOMPATIBLE: &str = "best-practice/display-inline-incompatible";

pub const CHECKER_NAME: &str = "Display Inline Compatibility";

/// Baseline declaration checker this one runs after
pub const BASELINE_CHECKER: &str = "Default Declaration";

pub const INCOMPATIBLE_PROPERTIES: [&str; 4] = ["margin-top", "margin-bottom", "height", "width"];

/// Check one rule block
///
/// Returns nothing for invalid blocks, for nodes that are not rule blocks,
/// and for blocks without `display: inline`. Declarations without a
/// property name are skipped. Diagnostics come out in document order.
pub fn check_rule_block(tree: &StyleTree, id: NodeId, locale: &str) -> Vec<Diagnostic> {
    let Some(block) = RuleBlock::cast(tree, id) else {
        return Vec::new();
    };
    if !block.is_valid() || !block.declarations().any(declares_display_inline) {
        return Vec::new();
    }

    let catalog = MessageCatalog::builtin();
    block
        .declarations()
        .filter_map(|declaration| declaration.property_name())
        .filter(|name| INCOMPATIBLE_PROPERTIES.contains(&name.text()))
        .map(|name| {
            let message = catalog.format(
                locale,
                BEST_PRACTICE_INLINE_INCOMPAT,
                &[("property", name.text())],
            );
            Diagnostic::new(DISPLAY_INLINE_INCOMPATIBLE, Severity::Warning, message, name.id())
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InlineCompatibilityChecker;

impl ItemChecker for InlineCompatibilityChecker {
    fn name(&self) -> &'static str {
        CHECKER_NAME
    }

    fn rule_id(&self) -> &'static str {
        DISPLAY_INLINE_INCOMPATIBLE
    }

    fn order(&self) -> CheckerOrder {
        CheckerOrder::After(BASELINE_CHECKER)
    }

    fn item_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::RuleBlock]
    }

    fn check_item(
        &self,
        tree: &StyleTree,
        item: NodeId,
        ctx: &mut CheckerContext<'_>,
    ) -> ItemCheckResult {
        for diagnostic in check_rule_block(tree, item, ctx.locale()) {
            ctx.add_error(diagnostic.anchor, diagnostic.message);
        }
        ItemCheckResult::Continue
    }
}
