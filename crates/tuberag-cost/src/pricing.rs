//! Vendor pricing for Gemini File Search.
//!
//! Published per-token rates as of November 2025. Storage is currently
//! free for File Search; the field stays so a price change is a config
//! edit, not a code change.

use serde::{Deserialize, Serialize};

/// Per-token pricing in USD.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pricing {
    /// One-time indexing cost per token uploaded
    pub indexing_per_token: f64,

    /// Storage cost per token (currently free)
    pub storage_per_token: f64,

    /// Query context/input cost per token
    pub input_per_token: f64,

    /// Query output cost per token
    pub output_per_token: f64,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            indexing_per_token: 0.15 / 1_000_000.0,
            storage_per_token: 0.0,
            input_per_token: 0.075 / 1_000_000.0,
            output_per_token: 0.30 / 1_000_000.0,
        }
    }
}

impl Pricing {
    /// Cost of indexing `tokens` tokens.
    pub fn indexing_cost(&self, tokens: u64) -> f64 {
        tokens as f64 * self.indexing_per_token
    }

    /// Cost of one query from its token split.
    pub fn query_cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        input_tokens as f64 * self.input_per_token + output_tokens as f64 * self.output_per_token
    }

    /// Estimate the one-time indexing plus storage cost for a corpus.
    pub fn storage_estimate(&self, total_tokens: u64) -> StorageEstimate {
        StorageEstimate {
            total_tokens,
            indexing_cost_usd: self.indexing_cost(total_tokens),
            storage_cost_usd: total_tokens as f64 * self.storage_per_token,
        }
    }
}

/// Indexing/storage cost breakdown for a batch of uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageEstimate {
    /// Total tokens uploaded
    pub total_tokens: u64,

    /// One-time indexing cost in USD
    pub indexing_cost_usd: f64,

    /// Recurring storage cost in USD (currently zero)
    pub storage_cost_usd: f64,
}

/// Estimate the token count of a transcript.
///
/// Word count times 4/3: English prose averages roughly three words per
/// four tokens.
pub fn estimate_tokens(text: &str) -> u64 {
    let words = text.split_whitespace().count() as u64;
    words * 4 / 3
}
