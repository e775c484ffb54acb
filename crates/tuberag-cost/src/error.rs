//! Error types for the cost ledger.

use std::path::PathBuf;
use thiserror::Error;

/// Cost ledger errors.
#[derive(Error, Debug)]
pub enum CostError {
    /// IO error (reading or rewriting the ledger document)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The ledger document on disk is malformed.
    ///
    /// Fatal: starting fresh would silently discard recorded costs.
    #[error("malformed cost ledger {path}: {message}")]
    Document { path: PathBuf, message: String },
}

impl CostError {
    /// Check if this error should terminate the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CostError::Document { .. })
    }

    /// Create a user-friendly message for this error.
    pub fn friendly_message(&self) -> String {
        match self {
            CostError::Document { path, .. } => format!(
                "The cost ledger at {} is corrupt. Fix or move it aside; it will not be overwritten.",
                path.display()
            ),
            _ => format!("Error: {}", self),
        }
    }
}

/// Result type for cost ledger operations.
pub type Result<T> = std::result::Result<T, CostError>;
