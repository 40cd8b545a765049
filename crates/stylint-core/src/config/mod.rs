//! Configuration system for stylint
//!
//! - JSON, TOML and YAML configuration files
//! - Auto-discovery by traversing up directories
//! - Strong typing with serde and JSON Schema generation via schemars
//!
//! ## Configuration Files
//!
//! Searched in each directory in this order: `.stylintrc.json`,
//! `.stylintrc.toml`, `stylint.yaml`, `stylint.yml`, `stylint.json`.
//!
//! ## Example Configuration
//!
//! ```json
//! {
//!   "locale": "de",
//!   "linter": {
//!     "enabled": true,
//!     "rules": {
//!       "best-practice/display-inline-incompatible": "error"
//!     }
//!   }
//! }
//! ```

mod loader;
mod stylint_config;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use stylint_config::{LinterConfiguration, RuleSeverity, StylintConfig};
