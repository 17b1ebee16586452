//! Store error types
//!
//! Error codes:
//! - STORE_EMPTY_KEY (argument error, raised before any host call)
//! - STORE_LEDGER_FAILURE (host failure, message passed through verbatim)
//! - STORE_NOT_UNIQUE (point lookup matched more than one document)
//! - STORE_SERIALIZATION (bytes could not be encoded or decoded)

use std::fmt;

use crate::ledger::LedgerError;

/// Store-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// A required key was empty
    EmptyKey,
    /// The host ledger reported a failure
    LedgerFailure,
    /// A uniqueness-assuming lookup found several matches
    NotUnique,
    /// JSON encoding or decoding failed
    Serialization,
}

impl StoreErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::EmptyKey => "STORE_EMPTY_KEY",
            StoreErrorCode::LedgerFailure => "STORE_LEDGER_FAILURE",
            StoreErrorCode::NotUnique => "STORE_NOT_UNIQUE",
            StoreErrorCode::Serialization => "STORE_SERIALIZATION",
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with code, message and optional host cause
#[derive(Debug)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    source: Option<LedgerError>,
}

impl StoreError {
    /// A required key was empty
    pub fn empty_key(what: &str) -> Self {
        Self {
            code: StoreErrorCode::EmptyKey,
            message: format!("{} should not be empty", what),
            source: None,
        }
    }

    /// Wrap a host failure; the message is the host's own text
    pub fn ledger(source: LedgerError) -> Self {
        Self {
            code: StoreErrorCode::LedgerFailure,
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// More than one document matched a point lookup
    pub fn not_unique(query: &str) -> Self {
        Self {
            code: StoreErrorCode::NotUnique,
            message: format!("Not the only doc returned for query {}", query),
            source: None,
        }
    }

    /// Encoding or decoding failed
    pub fn serialization(message: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::Serialization,
            message: message.into(),
            source: None,
        }
    }

    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the caller supplied bad input
    pub fn is_argument_error(&self) -> bool {
        self.code == StoreErrorCode::EmptyKey
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<LedgerError> for StoreError {
    fn from(err: LedgerError) -> Self {
        StoreError::ledger(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::serialization(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_codes() {
        assert_eq!(StoreErrorCode::EmptyKey.code(), "STORE_EMPTY_KEY");
        assert_eq!(StoreErrorCode::NotUnique.code(), "STORE_NOT_UNIQUE");
    }

    #[test]
    fn test_ledger_message_passes_through() {
        let err = StoreError::from(LedgerError::Io("quota exceeded".into()));
        assert_eq!(err.code(), StoreErrorCode::LedgerFailure);
        assert_eq!(err.message(), "ledger I/O failure: quota exceeded");
        assert!(err.source().is_some());
        assert!(!err.is_argument_error());
    }

    #[test]
    fn test_empty_key_is_argument_error() {
        let err = StoreError::empty_key("docKey");
        assert!(err.is_argument_error());
        assert_eq!(err.to_string(), "STORE_EMPTY_KEY: docKey should not be empty");
    }
}
