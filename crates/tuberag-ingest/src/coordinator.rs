//! The ingestion coordinator.
//!
//! Drives one channel ingestion end to end: list the top-N videos,
//! subtract what the upload cache already holds, and for each remaining
//! video fetch its transcript, write the artifact, upload it, and record
//! the cache entry and cost event. The cache and ledger are persisted
//! after every successful upload, never batched, so an interrupted run
//! resumes safely from the cache alone.

use chrono::Utc;
use tracing::{info, warn};

use tuberag_cost::{estimate_tokens, CostEvent, CostLedger, Pricing};
use tuberag_gemini::{ensure_store, FileSearchClient, StoreConfig};

use crate::error::{IngestError, Result};
use crate::scraper::ChannelScraper;
use crate::transcript::TranscriptStore;

/// Knobs for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Store key: the logical name the remote store is filed under
    pub store_key: String,

    /// Total upload attempts per video (first try included)
    pub max_upload_attempts: u32,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            store_key: "youtube_transcripts".to_string(),
            max_upload_attempts: 2,
        }
    }
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    /// Videos returned by the channel listing
    pub videos_found: usize,

    /// Videos skipped because the cache already held them
    pub already_indexed: usize,

    /// Videos skipped for lack of a transcript
    pub missing_transcript: usize,

    /// Videos whose upload failed (cache untouched, retried next run)
    pub failed_uploads: usize,

    /// Videos uploaded and recorded this run
    pub uploaded: usize,

    /// Estimated tokens across this run's uploads
    pub estimated_tokens: u64,

    /// Estimated one-time indexing cost for this run
    pub indexing_cost_usd: f64,
}

impl IngestReport {
    /// Multi-line rendering for the CLI.
    pub fn render(&self) -> String {
        format!(
            "Videos found: {}\nAlready indexed: {}\nUploaded: {}\nNo transcript: {}\nFailed uploads: {}\nEstimated tokens: {}\nEstimated indexing cost: ${:.6} USD",
            self.videos_found,
            self.already_indexed,
            self.uploaded,
            self.missing_transcript,
            self.failed_uploads,
            self.estimated_tokens,
            self.indexing_cost_usd,
        )
    }
}

/// Coordinates scraper, remote index, cache, and ledger for one run.
pub struct IngestionCoordinator<'a, S: ChannelScraper> {
    scraper: &'a S,
    client: &'a FileSearchClient,
    store_config: &'a mut StoreConfig,
    ledger: &'a mut CostLedger,
    transcripts: &'a TranscriptStore,
    pricing: Pricing,
    options: IngestOptions,
}

impl<'a, S: ChannelScraper> IngestionCoordinator<'a, S> {
    /// Wire up a coordinator with default options.
    pub fn new(
        scraper: &'a S,
        client: &'a FileSearchClient,
        store_config: &'a mut StoreConfig,
        ledger: &'a mut CostLedger,
        transcripts: &'a TranscriptStore,
    ) -> Self {
        Self {
            scraper,
            client,
            store_config,
            ledger,
            transcripts,
            pricing: Pricing::default(),
            options: IngestOptions::default(),
        }
    }

    /// Override the run options.
    pub fn with_options(mut self, options: IngestOptions) -> Self {
        self.options = options;
        self
    }

    /// Override the pricing table.
    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = pricing;
        self
    }

    /// Ingest up to `max_videos` of the channel's most recent videos.
    ///
    /// Idempotent: re-running with the same channel and count re-lists
    /// the whole top-N and filters by the cache, so nothing already
    /// uploaded is uploaded again.
    pub async fn ingest_channel(
        &mut self,
        channel_url: &str,
        max_videos: usize,
    ) -> Result<IngestReport> {
        let listings = self.scraper.list_videos(channel_url, max_videos).await?;

        let mut report = IngestReport {
            videos_found: listings.len(),
            ..IngestReport::default()
        };

        let pending: Vec<_> = listings
            .into_iter()
            .filter(|listing| {
                if self.store_config.is_indexed(&listing.video_id) {
                    info!(video_id = %listing.video_id, "already indexed, skipping");
                    report.already_indexed += 1;
                    false
                } else {
                    true
                }
            })
            .collect();

        if pending.is_empty() {
            info!(
                found = report.videos_found,
                "nothing new to ingest for this channel"
            );
            return Ok(report);
        }

        let store_id = ensure_store(self.client, self.store_config, &self.options.store_key).await?;

        for listing in pending {
            let transcript = match self.scraper.fetch_transcript(&listing.video_id).await {
                Ok(text) => text,
                Err(e) if e.is_per_video() => {
                    warn!(video_id = %listing.video_id, error = %e, "skipping video without transcript");
                    report.missing_transcript += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let record = self.transcripts.save(&listing, &transcript)?;
            let file_name = record
                .local_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(&listing.video_id)
                .to_string();
            let artifact = std::fs::read_to_string(&record.local_path)?;

            let Some(resource_id) = self
                .upload_with_retry(&store_id, &file_name, &artifact)
                .await
            else {
                report.failed_uploads += 1;
                continue;
            };

            // Persist cache and ledger before moving to the next video, so
            // a crash here costs at most one in-flight upload.
            self.store_config
                .record_document(&listing.video_id, &resource_id)?;

            let tokens = estimate_tokens(&transcript);
            let cost = self.pricing.indexing_cost(tokens);
            self.ledger.record(
                CostEvent::index(Utc::now(), tokens, cost)
                    .with_meta("file_name", &file_name)
                    .with_meta("store_name", &self.options.store_key),
            )?;

            info!(video_id = %listing.video_id, tokens, cost_usd = cost, "video ingested");
            report.uploaded += 1;
            report.estimated_tokens += tokens;
        }

        report.indexing_cost_usd = self.pricing.indexing_cost(report.estimated_tokens);
        Ok(report)
    }

    /// Upload one artifact, re-attempting transient failures immediately
    /// up to the configured bound. Returns `None` when every attempt
    /// failed; the caller leaves the cache untouched so the next run
    /// retries the video.
    async fn upload_with_retry(
        &self,
        store_id: &str,
        file_name: &str,
        artifact: &str,
    ) -> Option<String> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .client
                .upload_document(store_id, file_name, artifact)
                .await
            {
                Ok(resource_id) => return Some(resource_id),
                Err(e) if e.is_retryable() && attempt < self.options.max_upload_attempts => {
                    warn!(file_name, attempt, error = %e, "upload failed, retrying");
                }
                Err(e) => {
                    warn!(file_name, attempt, error = %e, "upload failed, giving up on this video");
                    return None;
                }
            }
        }
    }
}

// Tests live in tests/integration_tests.rs: the coordinator's interesting
// behavior spans the cache, the ledger, and the HTTP client, which the
// integration suite wires together against a mock server.
