//! Result type alias for stylint operations

use crate::error::StylintError;

/// Standard Result type for stylint operations
pub type Result<T> = std::result::Result<T, StylintError>;

/// Extension trait for Result to provide additional convenience methods
pub trait ResultExt<T> {
    /// Convert an error to a recoverable error if possible
    fn recoverable(self) -> Result<Option<T>>;

    /// Log the error and continue with None
    fn log_and_continue(self) -> Option<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn recoverable(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() => {
                tracing::warn!("Recoverable error: {}", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn log_and_continue(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) if err.is_recoverable() => {
                tracing::warn!("Continuing after error: {}", err);
                None
            }
            Err(err) => {
                tracing::error!("Fatal error: {}", err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_swallows_tree_errors() {
        let result: Result<u32> = Err(StylintError::tree_edit("index out of range"));
        assert!(matches!(result.recoverable(), Ok(None)));
    }

    #[test]
    fn test_recoverable_propagates_contract_errors() {
        let result: Result<u32> = Err(StylintError::contract_violation("no root"));
        assert!(result.recoverable().is_err());
    }

    #[test]
    fn test_log_and_continue() {
        let ok: Result<u32> = Ok(4);
        assert_eq!(ok.log_and_continue(), Some(4));
        let err: Result<u32> = Err(StylintError::internal_error("x"));
        assert_eq!(err.log_and_continue(), None);
    }
}
