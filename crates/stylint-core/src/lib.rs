//! Stylint Core
//!
//! Incremental tracking of `display: inline` declarations in a stylesheet
//! parse tree. This crate provides the tree model, the document that reports
//! tree changes, the declaration index kept in sync with those changes, and
//! the revalidation queue the index uses to request re-checks.

pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod index;
pub mod messages;
pub mod result;
pub mod revalidation;
pub mod tree;

// Re-export commonly used types
pub use config::{ConfigLoader, LinterConfiguration, RuleSeverity, StylintConfig};
pub use diagnostics::{Diagnostic, Severity};
pub use document::{
    BufferId, Document, DocumentRegistry, ItemsChanged, SharedDocument, SubscriptionId, TreeEdit,
    TreeListener,
};
pub use error::{ErrorKind, StylintError};
pub use index::{DeclarationIndex, declares_display_inline, rescan};
pub use messages::MessageCatalog;
pub use result::{Result, ResultExt};
pub use revalidation::{RevalidationQueue, RevalidationScheduler, RevalidationSender};
pub use tree::{Declaration, Fragment, NodeId, NodeKind, RuleBlock, StyleTree, Token};

/// Initialize tracing for the application
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stylint=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
