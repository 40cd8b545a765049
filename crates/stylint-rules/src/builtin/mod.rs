//! Built-in checkers

use std::sync::Arc;

use crate::checker::ItemChecker;

pub mod inline_compat;

pub use inline_compat::InlineCompatibilityChecker;

/// Every built-in checker, in registration order
pub fn builtin_checkers() -> Vec<Arc<dyn ItemChecker>> {
    vec![Arc::new(InlineCompatibilityChecker)]
}
