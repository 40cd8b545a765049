//! Diagnostic types produced by checkers

use serde::{Deserialize, Serialize};

use crate::tree::NodeId;

/// A single lint finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Identifier of the rule that produced this diagnostic
    pub rule_id: String,
    /// Severity level of the diagnostic
    pub severity: Severity,
    /// Localized, human-readable message
    pub message: String,
    /// Token the diagnostic is attached to
    pub anchor: NodeId,
}

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages
    Info,
    /// Hints for improvements
    Hint,
    /// Warnings that should be addressed
    Warning,
    /// Errors that must be fixed
    Error,
}

impl Diagnostic {
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        anchor: NodeId,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            anchor,
        }
    }

    /// Same diagnostic with a different severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Info => "info",
            Severity::Hint => "hint",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::StyleTree;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Hint);
        assert!(Severity::Hint > Severity::Info);
    }

    #[test]
    fn test_severity_serialization() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, r#""warning""#);
        assert_eq!(Severity::Error.to_string(), "error");
    }

    #[test]
    fn test_with_severity() {
        let tree = StyleTree::new();
        let diagnostic = Diagnostic::new("x/y", Severity::Warning, "msg", tree.root())
            .with_severity(Severity::Error);
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.anchor, tree.root());
    }
}
