//! Document status codes shared by every document type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocStatus {
    #[serde(rename = "00")]
    Init,
    #[serde(rename = "01")]
    Approving,
    #[serde(rename = "02")]
    Approved,
    #[serde(rename = "03")]
    Rejected,
    /// Terminal; soft-deleted
    #[serde(rename = "99")]
    Niled,
}

impl DocStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocStatus::Init => "00",
            DocStatus::Approving => "01",
            DocStatus::Approved => "02",
            DocStatus::Rejected => "03",
            DocStatus::Niled => "99",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DocStatus::Niled)
    }
}

impl fmt::Display for DocStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
