//! Error types and handling for stylint operations

use std::path::PathBuf;
use thiserror::Error;

use crate::tree::NodeId;

/// Main error type for stylint operations
#[derive(Debug, Error)]
pub enum StylintError {
    /// A node id that does not (or no longer) exist in the tree
    #[error("Unknown node {node:?}")]
    UnknownNode { node: NodeId },

    /// A structural edit the tree cannot perform
    #[error("Invalid tree edit: {message}")]
    TreeEdit { message: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Checker registration or ordering errors
    #[error("Rule engine error: {message}")]
    RuleEngine { message: String },

    /// No document is bound to the buffer
    #[error("No document is open for buffer {buffer}")]
    UnknownBuffer { buffer: u64 },

    /// A document is already bound to the buffer
    #[error("Buffer {buffer} already has a document")]
    BufferInUse { buffer: u64 },

    /// The buffer already has a live lint connection
    #[error("Buffer {buffer} is already connected")]
    AlreadyConnected { buffer: u64 },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The host broke a contract the core relies on
    #[error("Host contract violation: {message}")]
    ContractViolation { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Tree,
    Config,
    RuleEngine,
    Session,
    Io,
    Contract,
    Internal,
}

impl StylintError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StylintError::UnknownNode { .. } | StylintError::TreeEdit { .. } => ErrorKind::Tree,
            StylintError::ConfigError { .. } => ErrorKind::Config,
            StylintError::RuleEngine { .. } => ErrorKind::RuleEngine,
            StylintError::UnknownBuffer { .. }
            | StylintError::BufferInUse { .. }
            | StylintError::AlreadyConnected { .. } => ErrorKind::Session,
            StylintError::IoError { .. } => ErrorKind::Io,
            StylintError::ContractViolation { .. } => ErrorKind::Contract,
            StylintError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (the document can keep being edited)
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Tree | ErrorKind::Session)
    }

    /// Create a tree edit error
    pub fn tree_edit(message: impl Into<String>) -> Self {
        Self::TreeEdit {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a rule engine error
    pub fn rule_engine(message: impl Into<String>) -> Self {
        Self::RuleEngine {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create a host contract violation
    pub fn contract_violation(message: impl Into<String>) -> Self {
        Self::ContractViolation {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for StylintError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(StylintError::tree_edit("x").kind(), ErrorKind::Tree);
        assert_eq!(StylintError::config_error("x").kind(), ErrorKind::Config);
        assert_eq!(
            StylintError::UnknownBuffer { buffer: 3 }.kind(),
            ErrorKind::Session
        );
        assert_eq!(
            StylintError::contract_violation("x").kind(),
            ErrorKind::Contract
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(StylintError::tree_edit("cannot remove root").is_recoverable());
        assert!(!StylintError::contract_violation("missing root").is_recoverable());
        assert!(!StylintError::internal_error("boom").is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = StylintError::AlreadyConnected { buffer: 7 };
        assert_eq!(err.to_string(), "Buffer 7 is already connected");
    }
}
