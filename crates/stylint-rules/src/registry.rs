//! Checker registration, configuration and ordering

use std::collections::BTreeSet;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use stylint_core::{Result, ResultExt, Severity, StylintConfig, StylintError};

use crate::builtin::builtin_checkers;
use crate::checker::{CheckerOrder, ItemChecker};

#[derive(Clone)]
struct RegisteredChecker {
    checker: Arc<dyn ItemChecker>,
    /// `None` when switched off by configuration
    severity: Option<Severity>,
}

/// A checker together with the severity it reports at
#[derive(Clone)]
pub struct ActiveChecker {
    pub checker: Arc<dyn ItemChecker>,
    pub severity: Severity,
}

impl std::fmt::Debug for ActiveChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveChecker")
            .field("name", &self.checker.name())
            .field("severity", &self.severity)
            .finish()
    }
}

/// Summary of one registered checker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckerInfo {
    pub name: &'static str,
    pub rule_id: &'static str,
    pub order: CheckerOrder,
    pub severity: Option<Severity>,
}

/// Registry of item checkers, keyed by name in registration order
pub struct CheckerRegistry {
    checkers: IndexMap<&'static str, RegisteredChecker>,
    enabled: bool,
}

impl CheckerRegistry {
    pub fn new() -> Self {
        Self {
            checkers: IndexMap::new(),
            enabled: true,
        }
    }

    /// Registry holding every built-in checker
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for checker in builtin_checkers() {
            registry.register(checker).log_and_continue();
        }
        registry
    }

    pub fn register(&mut self, checker: Arc<dyn ItemChecker>) -> Result<()> {
        let name = checker.name();
        if self.checkers.contains_key(name) {
            return Err(StylintError::rule_engine(format!(
                "Checker '{name}' is already registered"
            )));
        }
        tracing::debug!(checker = name, rule = checker.rule_id(), "registered checker");
        let severity = Some(checker.default_severity());
        self.checkers
            .insert(name, RegisteredChecker { checker, severity });
        Ok(())
    }

    /// Apply the `linter` section: global switch and per-rule severities
    pub fn apply_config(&mut self, config: &StylintConfig) {
        self.enabled = config.linter_enabled();
        for entry in self.checkers.values_mut() {
            let rule_id = entry.checker.rule_id();
            entry.severity = match config.rule_severity(rule_id) {
                Some(configured) => configured.to_severity(),
                None => Some(entry.checker.default_severity()),
            };
        }
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn describe(&self) -> Vec<CheckerInfo> {
        self.checkers
            .values()
            .map(|entry| CheckerInfo {
                name: entry.checker.name(),
                rule_id: entry.checker.rule_id(),
                order: entry.checker.order(),
                severity: entry.severity,
            })
            .collect()
    }

    /// Enabled checkers in execution order
    ///
    /// `After` constraints are honoured; ties keep registration order.
    /// Constraints naming a checker that is not registered are ignored.
    /// A cycle is an error.
    pub fn resolve(&self) -> Result<Vec<ActiveChecker>> {
        if !self.enabled {
            return Ok(Vec::new());
        }

        let count = self.checkers.len();
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
        let mut pending = vec![0usize; count];

        for (index, entry) in self.checkers.values().enumerate() {
            let CheckerOrder::After(predecessor) = entry.checker.order() else {
                continue;
            };
            match self.checkers.get_index_of(predecessor) {
                Some(before) => {
                    dependents[before].push(index);
                    pending[index] += 1;
                }
                None => tracing::debug!(
                    checker = entry.checker.name(),
                    after = predecessor,
                    "ordering constraint on unregistered checker ignored"
                ),
            }
        }

        let mut ready: BTreeSet<usize> = (0..count).filter(|&i| pending[i] == 0).collect();
        let mut sorted = Vec::with_capacity(count);
        while let Some(index) = ready.pop_first() {
            sorted.push(index);
            for &next in &dependents[index] {
                pending[next] -= 1;
                if pending[next] == 0 {
                    ready.insert(next);
                }
            }
        }

        if sorted.len() < count {
            let stuck: Vec<&str> = (0..count)
                .filter(|&i| pending[i] > 0)
                .filter_map(|i| self.checkers.get_index(i).map(|(name, _)| *name))
                .collect();
            return Err(StylintError::rule_engine(format!(
                "Checker ordering cycle between: {}",
                stuck.join(", ")
            )));
        }

        Ok(sorted
            .into_iter()
            .filter_map(|index| self.checkers.get_index(index))
            .filter_map(|(_, entry)| {
                entry.severity.map(|severity| ActiveChecker {
                    checker: entry.checker.clone(),
                    severity,
                })
            })
            .collect())
    }
}

impl Default for CheckerRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for CheckerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckerRegistry")
            .field("checkers", &self.checkers.keys().collect::<Vec<_>>())
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::inline_compat::{CHECKER_NAME, DISPLAY_INLINE_INCOMPATIBLE};
    use crate::checker::{CheckerContext, ItemCheckResult};
    use stylint_core::{NodeId, NodeKind, RuleSeverity, StyleTree};

    struct Named {
        name: &'static str,
        order: CheckerOrder,
    }

    impl ItemChecker for Named {
        fn name(&self) -> &'static str {
            self.name
        }

        fn rule_id(&self) -> &'static str {
            "test/named"
        }

        fn order(&self) -> CheckerOrder {
            self.order
        }

        fn item_kinds(&self) -> &'static [NodeKind] {
            &[NodeKind::RuleBlock]
        }

        fn check_item(
            &self,
            _tree: &StyleTree,
            _item: NodeId,
            _ctx: &mut CheckerContext<'_>,
        ) -> ItemCheckResult {
            ItemCheckResult::Continue
        }
    }

    fn named(name: &'static str, order: CheckerOrder) -> Arc<dyn ItemChecker> {
        Arc::new(Named { name, order })
    }

    fn order_of(registry: &CheckerRegistry) -> Vec<&'static str> {
        registry
            .resolve()
            .unwrap()
            .iter()
            .map(|active| active.checker.name())
            .collect()
    }

    #[test]
    fn test_inline_checker_runs_after_baseline() {
        let mut registry = CheckerRegistry::with_builtins();
        registry
            .register(named("Default Declaration", CheckerOrder::Any))
            .unwrap();

        insta::assert_debug_snapshot!(order_of(&registry), @r###"
        [
            "Default Declaration",
            "Display Inline Compatibility",
        ]
        "###);
    }

    #[test]
    fn test_unregistered_predecessor_is_ignored() {
        let registry = CheckerRegistry::with_builtins();
        assert_eq!(order_of(&registry), vec![CHECKER_NAME]);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let mut registry = CheckerRegistry::new();
        registry.register(named("c", CheckerOrder::After("a"))).unwrap();
        registry.register(named("b", CheckerOrder::Any)).unwrap();
        registry.register(named("a", CheckerOrder::Any)).unwrap();
        assert_eq!(order_of(&registry), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_cycle_is_an_error() {
        let mut registry = CheckerRegistry::new();
        registry.register(named("a", CheckerOrder::After("b"))).unwrap();
        registry.register(named("b", CheckerOrder::After("a"))).unwrap();
        registry.register(named("free", CheckerOrder::Any)).unwrap();

        let err = registry.resolve().unwrap_err();
        assert_eq!(err.kind(), stylint_core::ErrorKind::RuleEngine);
        assert!(err.to_string().contains("a, b"));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = CheckerRegistry::new();
        registry.register(named("a", CheckerOrder::Any)).unwrap();
        assert!(registry.register(named("a", CheckerOrder::Any)).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_config_overrides_severity_and_disables() -> anyhow::Result<()> {
        let mut registry = CheckerRegistry::with_builtins();
        let config: StylintConfig = serde_json::from_str(&format!(
            r#"{{ "linter": {{ "rules": {{ "{DISPLAY_INLINE_INCOMPATIBLE}": "error" }} }} }}"#
        ))?;
        registry.apply_config(&config);
        let active = registry.resolve()?;
        assert_eq!(active[0].severity, Severity::Error);

        let config: StylintConfig = serde_json::from_str(&format!(
            r#"{{ "linter": {{ "rules": {{ "{DISPLAY_INLINE_INCOMPATIBLE}": "off" }} }} }}"#
        ))?;
        registry.apply_config(&config);
        assert!(registry.resolve()?.is_empty());
        assert_eq!(registry.describe()[0].severity, None);
        assert_eq!(
            config.rule_severity(DISPLAY_INLINE_INCOMPATIBLE),
            Some(RuleSeverity::Off)
        );
        Ok(())
    }

    #[test]
    fn test_linter_disabled() -> anyhow::Result<()> {
        let mut registry = CheckerRegistry::with_builtins();
        let config: StylintConfig = serde_json::from_str(r#"{ "linter": { "enabled": false } }"#)?;
        registry.apply_config(&config);
        assert!(!registry.is_enabled());
        assert!(registry.resolve()?.is_empty());
        Ok(())
    }
}
