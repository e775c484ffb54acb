//! Error types for the chat session.

use std::path::PathBuf;
use thiserror::Error;

/// Chat session errors.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Remote query failed (per-prompt; the session records and continues)
    #[error("Query failed: {0}")]
    Query(String),

    /// The history document on disk is malformed (fatal)
    #[error("malformed chat history {path}: {message}")]
    Document { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Cost ledger error
    #[error(transparent)]
    Cost(#[from] tuberag_cost::CostError),
}

impl ChatError {
    /// Check if this error should terminate the process.
    pub fn is_fatal(&self) -> bool {
        match self {
            ChatError::Document { .. } => true,
            ChatError::Cost(e) => e.is_fatal(),
            _ => false,
        }
    }

    /// Create a user-friendly message for this error.
    pub fn friendly_message(&self) -> String {
        match self {
            ChatError::Document { path, .. } => format!(
                "The chat history at {} is corrupt. Fix or move it aside; it will not be overwritten.",
                path.display()
            ),
            ChatError::Cost(e) => e.friendly_message(),
            _ => format!("Error: {}", self),
        }
    }
}

/// Result type for chat operations.
pub type Result<T> = std::result::Result<T, ChatError>;
