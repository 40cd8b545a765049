//! Configuration types for stylint

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::diagnostics::Severity;
use crate::error::StylintError;
use crate::messages::DEFAULT_LOCALE;
use crate::result::Result;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StylintConfig {
    /// JSON schema reference, ignored when loading
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    #[schemars(description = "JSON schema reference")]
    pub schema: Option<String>,

    /// Stop configuration discovery at this file
    #[schemars(description = "Mark this as the root configuration")]
    pub root: Option<bool>,

    /// Locale used for diagnostic messages
    #[schemars(description = "Locale for diagnostic messages, e.g. 'en' or 'de-CH'")]
    pub locale: Option<String>,

    /// Linter configuration
    #[schemars(description = "Linter configuration")]
    pub linter: Option<LinterConfiguration>,
}

/// Linter configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinterConfiguration {
    /// Enable/disable linter
    #[schemars(description = "Enable or disable the linter")]
    pub enabled: Option<bool>,

    /// Per-rule severity, keyed by rule id
    #[schemars(description = "Rule severity overrides keyed by rule id")]
    pub rules: Option<HashMap<String, RuleSeverity>>,
}

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Disable the rule
    Off,
    /// Informational message
    Info,
    /// Warning
    Warn,
    /// Error
    Error,
}

impl RuleSeverity {
    /// Diagnostic severity, or `None` when the rule is switched off
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Off => None,
            RuleSeverity::Info => Some(Severity::Info),
            RuleSeverity::Warn => Some(Severity::Warning),
            RuleSeverity::Error => Some(Severity::Error),
        }
    }
}

impl Default for LinterConfiguration {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            rules: None,
        }
    }
}

impl StylintConfig {
    /// Load from a `.json`, `.toml`, `.yaml` or `.yml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| StylintError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        match ext {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| StylintError::config_error(e.to_string()))
            }
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| StylintError::config_error(e.to_string()))
            }
            Some("toml") => {
                toml::from_str(&content).map_err(|e| StylintError::config_error(e.to_string()))
            }
            _ => Err(StylintError::config_error(
                "Unsupported file extension (expected .json, .toml, .yaml, or .yml)",
            )),
        }
    }

    /// Get linter configuration with defaults
    pub fn linter_config(&self) -> LinterConfiguration {
        self.linter.clone().unwrap_or_default()
    }

    pub fn linter_enabled(&self) -> bool {
        self.linter_config().enabled.unwrap_or(true)
    }

    /// Locale for messages, `en` when unset
    pub fn locale(&self) -> &str {
        self.locale.as_deref().unwrap_or(DEFAULT_LOCALE)
    }

    /// Configured severity for a rule, if any
    pub fn rule_severity(&self, rule_id: &str) -> Option<RuleSeverity> {
        self.linter.as_ref()?.rules.as_ref()?.get(rule_id).copied()
    }

    /// JSON schema describing this configuration
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(StylintConfig)).unwrap_or_default()
    }
}
