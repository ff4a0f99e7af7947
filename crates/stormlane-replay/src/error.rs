//! Error types for stormlane-replay
//!
//! The engine itself is total — reducers and history operations degrade to
//! no-ops on bad input. Errors only arise at the document boundary, where a
//! collaborator hands us bytes to parse.

use thiserror::Error;

/// Replay/document error type
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed JSON in an imported document
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Parsed but structurally invalid document
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

impl Error {
    /// Create an invalid-document error
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }

    /// Stable error code for collaborator-side reporting
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Serialization(_) => "serialization",
            Self::InvalidDocument(_) => "invalid_document",
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
