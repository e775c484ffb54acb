//! # tuberag-ingest
//!
//! Channel scraping and idempotent transcript ingestion for TUBERAG.
//!
//! This crate provides:
//! - [`ChannelScraper`] - the seam to the outside world, with
//!   [`YoutubeScraper`] as the HTTP implementation
//! - [`TranscriptStore`] - deterministic transcript artifacts on disk
//! - [`IngestionCoordinator`] - top-N-minus-cache ingestion with
//!   per-upload persistence
//!
//! The idempotence guarantee lives here: a video id present in the
//! upload cache is never re-fetched or re-uploaded, and the cache is
//! persisted after each upload rather than at the end of the run.

pub mod coordinator;
pub mod error;
pub mod scraper;
pub mod transcript;

// Re-export main types
pub use coordinator::{IngestOptions, IngestReport, IngestionCoordinator};
pub use error::{IngestError, Result};
pub use scraper::{ChannelScraper, VideoListing, YoutubeScraper};
pub use transcript::{TranscriptRecord, TranscriptStore};
