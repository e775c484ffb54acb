//! JSON-backed cost ledger.
//!
//! The ledger is one document, `costs.json`, read fully at startup and
//! rewritten fully after each recorded event. A single process with one
//! logical thread of control is the only writer, so there is no locking
//! discipline.
//!
//! ## File Format
//!
//! ```json
//! {
//!   "transactions": [
//!     {"timestamp":"2026-08-06T10:30:00Z","kind":"index","tokens":12000,"cost_usd":0.0018,
//!      "metadata":{"file_name":"dQw4w9WgXcQ_Some_Title.txt","store_name":"youtube_transcripts"}}
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CostError, Result};
use crate::models::CostEvent;

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerDocument {
    transactions: Vec<CostEvent>,
}

/// Append-only cost ledger held in memory, persisted after each mutation.
#[derive(Debug)]
pub struct CostLedger {
    path: PathBuf,
    doc: LedgerDocument,
}

impl CostLedger {
    /// Load the ledger from `path`.
    ///
    /// A missing file is an empty ledger. A malformed file is a fatal
    /// [`CostError::Document`]: starting fresh would silently discard
    /// recorded costs.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let doc = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(|e| CostError::Document {
                path: path.clone(),
                message: e.to_string(),
            })?
        } else {
            debug!(path = %path.display(), "no cost ledger yet, starting empty");
            LedgerDocument::default()
        };

        info!(path = %path.display(), events = doc.transactions.len(), "cost ledger loaded");
        Ok(Self { path, doc })
    }

    /// Append an event and rewrite the document.
    pub fn record(&mut self, event: CostEvent) -> Result<()> {
        debug!(
            kind = event.kind.as_str(),
            tokens = event.tokens,
            cost_usd = event.cost_usd,
            "recording cost event"
        );
        self.doc.transactions.push(event);
        self.save()
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.doc)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Snapshot of all recorded events in insertion order.
    pub fn events(&self) -> &[CostEvent] {
        &self.doc.transactions
    }

    /// Total cost across all events.
    pub fn total_cost(&self) -> f64 {
        self.doc.transactions.iter().map(|e| e.cost_usd).sum()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.doc.transactions.len()
    }

    /// Whether the ledger has no events.
    pub fn is_empty(&self) -> bool {
        self.doc.transactions.is_empty()
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_ledger() {
        let tmp = TempDir::new().unwrap();
        let ledger = CostLedger::load(tmp.path().join("costs.json")).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_cost(), 0.0);
    }

    #[test]
    fn test_record_persists_immediately() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("costs.json");

        let mut ledger = CostLedger::load(&path).unwrap();
        ledger
            .record(CostEvent::index(Utc::now(), 1_000, 0.00015))
            .unwrap();

        // A fresh load sees the event: persistence is per-mutation, not batched.
        let reloaded = CostLedger::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!((reloaded.total_cost() - 0.00015).abs() < 1e-12);
    }

    #[test]
    fn test_malformed_document_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("costs.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = CostLedger::load(&path).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, CostError::Document { .. }));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("costs.json");

        let mut ledger = CostLedger::load(&path).unwrap();
        ledger
            .record(CostEvent::index(Utc::now(), 10, 0.1).with_meta("file_name", "first"))
            .unwrap();
        ledger
            .record(CostEvent::query(Utc::now(), 20, 0.2).with_meta("prompt_preview", "second"))
            .unwrap();

        let reloaded = CostLedger::load(&path).unwrap();
        assert_eq!(reloaded.events()[0].metadata["file_name"], "first");
        assert_eq!(reloaded.events()[1].metadata["prompt_preview"], "second");
    }
}
