//! Data models for cost tracking.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a cost event paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostKind {
    /// Uploading a transcript into the remote index
    Index,
    /// A question answered by the remote index
    Query,
}

impl CostKind {
    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CostKind::Index => "index",
            CostKind::Query => "query",
        }
    }
}

/// A single billable operation against the vendor API.
///
/// Events are append-only; insertion order is chronological (assumed, not
/// enforced).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostEvent {
    /// When the operation happened
    pub timestamp: DateTime<Utc>,

    /// Operation kind
    pub kind: CostKind,

    /// Estimated or reported token count
    pub tokens: u64,

    /// Cost in USD
    pub cost_usd: f64,

    /// Free-form context (file name, prompt preview, token split)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl CostEvent {
    /// Create an indexing event.
    pub fn index(timestamp: DateTime<Utc>, tokens: u64, cost_usd: f64) -> Self {
        Self::new(timestamp, CostKind::Index, tokens, cost_usd)
    }

    /// Create a query event.
    pub fn query(timestamp: DateTime<Utc>, tokens: u64, cost_usd: f64) -> Self {
        Self::new(timestamp, CostKind::Query, tokens, cost_usd)
    }

    fn new(timestamp: DateTime<Utc>, kind: CostKind, tokens: u64, cost_usd: f64) -> Self {
        Self {
            timestamp,
            kind,
            tokens,
            cost_usd,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata entry.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
