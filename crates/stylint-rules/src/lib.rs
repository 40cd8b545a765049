//! Stylint Rules
//!
//! Checker pipeline and built-in rules for stylint, plus the session type
//! that connects editor buffers to the declaration index and the pipeline.

pub mod builtin;
pub mod checker;
pub mod pipeline;
pub mod registry;
pub mod session;

// Re-export commonly used types
pub use builtin::{InlineCompatibilityChecker, builtin_checkers};
pub use builtin::inline_compat::{DISPLAY_INLINE_INCOMPATIBLE, check_rule_block};
pub use checker::{CheckerContext, CheckerOrder, ItemCheckResult, ItemChecker};
pub use pipeline::ValidationPipeline;
pub use registry::{ActiveChecker, CheckerInfo, CheckerRegistry};
pub use session::LintSession;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
