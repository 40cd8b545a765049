//! Item checker contract
//!
//! An [`ItemChecker`] inspects one tree node ("item") of the kinds it asks
//! for and reports findings through a [`CheckerContext`]. Checkers hold no
//! per-document state, so one instance serves every document and may run
//! on several items at once.

use serde::Serialize;
use stylint_core::{Diagnostic, NodeId, NodeKind, Severity, StyleTree};

/// Where a checker runs relative to the others for the same item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckerOrder {
    /// No constraint
    Any,
    /// After the checker with this name, when it is registered
    After(&'static str),
}

/// Whether later checkers still see the item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCheckResult {
    Continue,
    StopItem,
}

pub trait ItemChecker: Send + Sync {
    /// Unique display name, referenced by [`CheckerOrder::After`]
    fn name(&self) -> &'static str;

    /// Rule id used in diagnostics and configuration
    fn rule_id(&self) -> &'static str;

    fn order(&self) -> CheckerOrder {
        CheckerOrder::Any
    }

    /// Node kinds this checker is invoked for
    fn item_kinds(&self) -> &'static [NodeKind];

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_item(
        &self,
        tree: &StyleTree,
        item: NodeId,
        ctx: &mut CheckerContext<'_>,
    ) -> ItemCheckResult;
}

/// Sink for the findings of one checker on one item
pub struct CheckerContext<'a> {
    rule_id: &'a str,
    severity: Severity,
    locale: &'a str,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> CheckerContext<'a> {
    pub fn new(
        rule_id: &'a str,
        severity: Severity,
        locale: &'a str,
        diagnostics: &'a mut Vec<Diagnostic>,
    ) -> Self {
        Self {
            rule_id,
            severity,
            locale,
            diagnostics,
        }
    }

    /// Report a finding anchored at `anchor`
    pub fn add_error(&mut self, anchor: NodeId, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(
            self.rule_id,
            self.severity,
            message,
            anchor,
        ));
    }

    /// Locale messages should be rendered in
    pub fn locale(&self) -> &str {
        self.locale
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}
