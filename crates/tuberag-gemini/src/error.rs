//! Error types for the Gemini File Search client.

use std::path::PathBuf;
use thiserror::Error;

/// Gemini client errors.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// No usable credential (fatal, process exits)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// API request failed (permanent)
    #[error("API request failed: {0}")]
    Api(String),

    /// API request failed (transient, retryable)
    #[error("API request failed (transient): {0}")]
    ApiTransient(String),

    /// Upload of one document failed (per-video, caller skips and continues)
    #[error("Upload failed for {name}: {message}")]
    Upload { name: String, message: String },

    /// The store config document on disk is malformed (fatal)
    #[error("malformed store config {path}: {message}")]
    Document { path: PathBuf, message: String },

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeminiError {
    /// Check if this error is retryable (transient network/API issues).
    pub fn is_retryable(&self) -> bool {
        match self {
            GeminiError::ApiTransient(_) => true,
            GeminiError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Check if this error should terminate the process.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GeminiError::Authentication(_) | GeminiError::Document { .. }
        )
    }

    /// Get a user-friendly error message.
    pub fn friendly_message(&self) -> String {
        match self {
            GeminiError::Authentication(msg) => format!(
                "Authentication failed: {msg}\nPlease either:\n\
                 1. Set the GEMINI_API_KEY environment variable, or\n\
                 2. Configure gcloud CLI with: gcloud auth application-default login"
            ),
            GeminiError::ApiTransient(msg) => {
                format!("Temporary API issue: {msg}. Please try again.")
            }
            GeminiError::Document { path, .. } => format!(
                "The store config at {} is corrupt. Fix or move it aside; it will not be overwritten.",
                path.display()
            ),
            _ => format!("Error: {self}"),
        }
    }

    /// Classify an HTTP status code into the appropriate error type.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => {
                GeminiError::Api(format!("authentication rejected ({status}): {body}"))
            }
            408 | 429 | 500 | 502 | 503 | 504 => {
                GeminiError::ApiTransient(format!("server error ({status}): {body}"))
            }
            _ => GeminiError::Api(format!("HTTP {status}: {body}")),
        }
    }
}

/// Result type for Gemini operations.
pub type Result<T> = std::result::Result<T, GeminiError>;
