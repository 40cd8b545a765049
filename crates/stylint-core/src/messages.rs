//! Localized message templates
//!
//! A [`MessageCatalog`] maps locale -> message key -> template. Lookups walk
//! from the most specific locale to its language (`de-CH` -> `de`) and then
//! to [`DEFAULT_LOCALE`]; when no template exists at all the key itself is
//! returned, so a missing translation never hides a diagnostic.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::StylintError;
use crate::result::Result;

pub const DEFAULT_LOCALE: &str = "en";

/// Template reported for properties that do nothing on inline elements
pub const BEST_PRACTICE_INLINE_INCOMPAT: &str = "BestPracticeInlineIncompat";

static BUILTIN: Lazy<MessageCatalog> = Lazy::new(|| {
    match MessageCatalog::from_toml(include_str!("../resources/messages.toml")) {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::error!("built-in message catalog is malformed: {err}");
            MessageCatalog::default()
        }
    }
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageCatalog {
    locales: HashMap<String, HashMap<String, String>>,
}

impl MessageCatalog {
    /// Catalog shipped with the crate
    pub fn builtin() -> &'static MessageCatalog {
        &BUILTIN
    }

    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source)
            .map_err(|e| StylintError::config_error(format!("Invalid message catalog: {e}")))
    }

    pub fn insert(
        &mut self,
        locale: impl Into<String>,
        key: impl Into<String>,
        template: impl Into<String>,
    ) {
        self.locales
            .entry(locale.into())
            .or_default()
            .insert(key.into(), template.into());
    }

    /// Raw template for `key`, following the locale fallback chain
    pub fn template(&self, locale: &str, key: &str) -> Option<&str> {
        fallback_chain(locale)
            .into_iter()
            .find_map(|candidate| self.locales.get(candidate)?.get(key))
            .map(String::as_str)
    }

    /// Template for `key` with every `{name}` replaced by its argument
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> String {
        let Some(template) = self.template(locale, key) else {
            tracing::warn!(locale, key, "no message template");
            return key.to_string();
        };
        let mut message = template.to_string();
        for (name, value) in args {
            message = message.replace(&format!("{{{name}}}"), value);
        }
        message
    }

    /// Locales with at least one template, sorted
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }
}

fn fallback_chain(locale: &str) -> Vec<&str> {
    let mut chain = vec![locale];
    let mut rest = locale;
    while let Some(cut) = rest.rfind(['-', '_']) {
        rest = &rest[..cut];
        chain.push(rest);
    }
    if !chain.contains(&DEFAULT_LOCALE) {
        chain.push(DEFAULT_LOCALE);
    }
    chain
}
