//! # Errors
//!
//! One error type for the whole deck pipeline, writer and reader alike.

use std::io;

/// Result type for deck and report operations
pub type DeckResult<T> = Result<T, DeckError>;

/// Errors raised while writing a deck or reading a report
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    /// A model object is malformed (shape, range or enum violation)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The writer has no rendering for this kind
    #[error("Unsupported {what}: {kind}")]
    UnsupportedKind { what: &'static str, kind: String },

    /// Required metadata is missing from a report
    #[error("Not found: {0}")]
    NotFound(String),

    /// Degenerate, non-square or inconsistent matrix dimensions
    #[error("Dimension error: {0}")]
    Dimension(String),

    /// Sink or source could not be opened, written or read
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl DeckError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        DeckError::Validation(msg.into())
    }

    pub(crate) fn unsupported(what: &'static str, kind: impl Into<String>) -> Self {
        DeckError::UnsupportedKind {
            what,
            kind: kind.into(),
        }
    }
}

impl From<serde_json::Error> for DeckError {
    fn from(e: serde_json::Error) -> Self {
        DeckError::Validation(format!("malformed model description: {}", e))
    }
}
