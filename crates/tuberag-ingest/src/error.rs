//! Error types for scraping and ingestion.

use thiserror::Error;

/// Ingestion errors.
#[derive(Debug, Error)]
pub enum IngestError {
    /// No transcript exists for a video (per-video, skip and continue)
    #[error("No transcript available for video {video_id}: {reason}")]
    TranscriptUnavailable { video_id: String, reason: String },

    /// Channel listing could not be fetched or parsed
    #[error("Failed to scrape channel: {0}")]
    Scrape(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote index error
    #[error(transparent)]
    Gemini(#[from] tuberag_gemini::GeminiError),

    /// Cost ledger error
    #[error(transparent)]
    Cost(#[from] tuberag_cost::CostError),
}

impl IngestError {
    /// Check if this error is scoped to a single video (skip, don't abort).
    pub fn is_per_video(&self) -> bool {
        matches!(self, IngestError::TranscriptUnavailable { .. })
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
