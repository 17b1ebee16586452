//! # Service Errors
//!
//! Business-level failures of document service operations. Every variant
//! maps to exactly one envelope response code.

use thiserror::Error;

use crate::ledger::LedgerError;
use crate::store::StoreError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Document service errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Malformed, missing or empty caller input
    #[error("{0}")]
    InvalidArgument(String),

    /// The document to create already exists
    #[error("{0}")]
    AlreadyExists(String),

    /// The document does not exist
    #[error("{0}")]
    NotFound(String),

    /// Storage, serialization or uniqueness failure
    #[error("{0}")]
    System(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        if err.is_argument_error() {
            ServiceError::InvalidArgument(err.message().to_string())
        } else {
            ServiceError::System(err.message().to_string())
        }
    }
}

impl From<LedgerError> for ServiceError {
    fn from(err: LedgerError) -> Self {
        ServiceError::System(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::System(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_by_kind() {
        assert!(matches!(
            ServiceError::from(StoreError::empty_key("docKey")),
            ServiceError::InvalidArgument(_)
        ));
        assert!(matches!(
            ServiceError::from(StoreError::not_unique("{}")),
            ServiceError::System(_)
        ));
    }

    #[test]
    fn test_message_is_display() {
        let err = ServiceError::NotFound("UserInfo does not exist: a@b.c".into());
        assert_eq!(err.to_string(), "UserInfo does not exist: a@b.c");
    }
}
