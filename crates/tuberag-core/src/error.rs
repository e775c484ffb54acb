//! Error types shared across TUBERAG crates.
//!
//! Errors here cover the concerns every crate touches: the data directory
//! and the JSON documents inside it. Anything scoped to one subsystem
//! (scraping, vendor calls, the ledger) lives in that crate's own error
//! enum. No silent failures: a malformed local document is surfaced to the
//! user rather than discarded.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the core data-directory and logging plumbing.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Generic I/O error with context
    #[error("I/O error {operation}: {path}")]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory creation failed
    #[error("Failed to create directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A local JSON document could not be parsed.
    ///
    /// Fatal by policy: starting fresh would silently discard cost or
    /// history data.
    #[error("Malformed local document {path}: {message}")]
    DocumentInvalid { path: PathBuf, message: String },

    /// Home directory could not be resolved
    #[error("Could not determine home directory (set HOME or pass --data-dir)")]
    NoHomeDirectory,

    /// Internal error (bug in TUBERAG)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CoreError {
    /// Create an I/O error.
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a DocumentInvalid error from a serde failure.
    pub fn document_invalid(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::DocumentInvalid {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error should terminate the process.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DocumentInvalid { .. } | Self::NoHomeDirectory | Self::Internal { .. }
        )
    }

    /// Returns actionable guidance for the user.
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Self::DocumentInvalid { .. } => Some(
                "The file is corrupt. Fix or move it aside; TUBERAG will not overwrite cost or history data.",
            ),
            Self::NoHomeDirectory => Some("Pass --data-dir to choose a location explicitly"),
            _ => None,
        }
    }
}
