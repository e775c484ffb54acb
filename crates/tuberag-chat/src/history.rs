//! Chat history persistence.
//!
//! One JSON document, `history.json`, read fully at startup and rewritten
//! fully after each recorded turn. Same ownership rules as the cost
//! ledger: one process, one writer, no locking.
//!
//! ## File Format
//!
//! ```json
//! {
//!   "conversations": [
//!     {"timestamp":"2026-08-06T10:31:00Z","prompt":"What topics come up?",
//!      "response":"Mostly Rust.","cost_usd":0.000123,"model":"gemini-2.0-flash-exp",
//!      "tokens":{"input":1400,"output":60,"total":1460},
//!      "channel":"https://youtube.com/@chan","is_error":false,
//!      "metadata":{"hostname":"devbox","user":"alex"}}
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ChatError, Result};

/// Token split for one turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenCounts {
    pub input: u64,
    pub output: u64,
    pub total: u64,
}

impl TokenCounts {
    /// Build from an input/output split.
    pub fn new(input: u64, output: u64) -> Self {
        Self {
            input,
            output,
            total: input + output,
        }
    }
}

/// One prompt/response exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// When the turn completed
    pub timestamp: DateTime<Utc>,

    /// User's prompt
    pub prompt: String,

    /// Model response, or the error message when `is_error`
    pub response: String,

    /// Cost of the turn in USD (zero for failed turns)
    pub cost_usd: f64,

    /// Model that served the turn
    pub model: String,

    /// Token split
    #[serde(default)]
    pub tokens: TokenCounts,

    /// Channel the session was opened against, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    /// Whether the response field holds an error marker
    #[serde(default)]
    pub is_error: bool,

    /// Actor metadata (hostname, user)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl ChatTurn {
    /// A successful turn.
    pub fn new(
        prompt: impl Into<String>,
        response: impl Into<String>,
        cost_usd: f64,
        model: impl Into<String>,
        tokens: TokenCounts,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            prompt: prompt.into(),
            response: response.into(),
            cost_usd,
            model: model.into(),
            tokens,
            channel: None,
            is_error: false,
            metadata: BTreeMap::new(),
        }
    }

    /// A failed turn: error message in place of the response, zero cost.
    pub fn error(
        prompt: impl Into<String>,
        message: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            prompt: prompt.into(),
            response: message.into(),
            cost_usd: 0.0,
            model: model.into(),
            tokens: TokenCounts::default(),
            channel: None,
            is_error: true,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach the channel.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryDocument {
    conversations: Vec<ChatTurn>,
}

/// Append-only chat history held in memory, persisted after each turn.
#[derive(Debug)]
pub struct ChatHistory {
    path: PathBuf,
    doc: HistoryDocument,
}

impl ChatHistory {
    /// Load the history from `path`.
    ///
    /// A missing file is an empty history. A malformed file is a fatal
    /// [`ChatError::Document`].
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let doc = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(|e| ChatError::Document {
                path: path.clone(),
                message: e.to_string(),
            })?
        } else {
            debug!(path = %path.display(), "no chat history yet, starting empty");
            HistoryDocument::default()
        };

        info!(path = %path.display(), turns = doc.conversations.len(), "chat history loaded");
        Ok(Self { path, doc })
    }

    /// Append a turn (stamped with actor metadata) and rewrite the document.
    pub fn record(&mut self, mut turn: ChatTurn) -> Result<()> {
        if let Ok(hostname) = std::env::var("HOSTNAME") {
            turn.metadata.insert("hostname".to_string(), hostname);
        }
        if let Ok(user) = std::env::var("USER").or_else(|_| std::env::var("USERNAME")) {
            turn.metadata.insert("user".to_string(), user);
        }

        self.doc.conversations.push(turn);
        self.save()
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.doc)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// The last `limit` turns, oldest first.
    pub fn recent(&self, limit: usize) -> &[ChatTurn] {
        let start = self.doc.conversations.len().saturating_sub(limit);
        &self.doc.conversations[start..]
    }

    /// Number of recorded turns.
    pub fn len(&self) -> usize {
        self.doc.conversations.len()
    }

    /// Whether the history has no turns.
    pub fn is_empty(&self) -> bool {
        self.doc.conversations.is_empty()
    }

    /// Render the last `limit` turns for the `history` control word.
    pub fn render_recent(&self, limit: usize) -> String {
        let turns = self.recent(limit);
        let rule = "=".repeat(60);

        let mut out = String::new();
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "RECENT CONVERSATIONS (Last {limit})");
        let _ = writeln!(out, "{rule}");

        if turns.is_empty() {
            let _ = writeln!(out, "No conversations found.");
            let _ = writeln!(out, "{rule}");
            return out;
        }

        for (i, turn) in turns.iter().enumerate() {
            let _ = writeln!(
                out,
                "\n[{}] {}{}",
                i + 1,
                turn.timestamp.format("%Y-%m-%d %H:%M:%S"),
                if turn.is_error { " (error)" } else { "" }
            );
            let _ = writeln!(out, "Model: {}", turn.model);
            let _ = writeln!(out, "Cost: ${:.6}", turn.cost_usd);
            let _ = writeln!(out, "Tokens: {}", turn.tokens.total);
            let _ = writeln!(out, "Prompt: {}", preview(&turn.prompt, 100));
            let _ = writeln!(out, "Response: {}", preview(&turn.response, 200));
        }
        let _ = writeln!(out, "{rule}");

        out
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// First `limit` characters of `text`, with an ellipsis when truncated.
pub fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let cut: String = text.chars().take(limit).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_history() {
        let tmp = TempDir::new().unwrap();
        let history = ChatHistory::load(tmp.path().join("history.json")).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_record_persists_and_reloads() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("history.json");

        {
            let mut history = ChatHistory::load(&path).unwrap();
            history
                .record(
                    ChatTurn::new(
                        "What topics?",
                        "Rust, mostly.",
                        0.0001,
                        "gemini-2.0-flash-exp",
                        TokenCounts::new(100, 20),
                    )
                    .with_channel("https://youtube.com/@chan"),
                )
                .unwrap();
        }

        let history = ChatHistory::load(&path).unwrap();
        assert_eq!(history.len(), 1);
        let turn = &history.recent(5)[0];
        assert_eq!(turn.prompt, "What topics?");
        assert_eq!(turn.tokens.total, 120);
        assert_eq!(turn.channel.as_deref(), Some("https://youtube.com/@chan"));
        assert!(!turn.is_error);
    }

    #[test]
    fn test_error_turn_has_zero_cost() {
        let turn = ChatTurn::error("prompt", "connection refused", "gemini-2.0-flash-exp");
        assert!(turn.is_error);
        assert_eq!(turn.cost_usd, 0.0);
        assert_eq!(turn.tokens.total, 0);
    }

    #[test]
    fn test_recent_returns_last_n_in_order() {
        let tmp = TempDir::new().unwrap();
        let mut history = ChatHistory::load(tmp.path().join("history.json")).unwrap();

        for i in 0..10 {
            history
                .record(ChatTurn::new(
                    format!("q{i}"),
                    format!("a{i}"),
                    0.0,
                    "m",
                    TokenCounts::default(),
                ))
                .unwrap();
        }

        let recent = history.recent(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].prompt, "q7");
        assert_eq!(recent[2].prompt, "q9");
    }

    #[test]
    fn test_malformed_document_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("history.json");
        std::fs::write(&path, "{\"conversations\": 42}").unwrap();

        let err = ChatHistory::load(&path).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_render_recent_empty_and_nonempty() {
        let tmp = TempDir::new().unwrap();
        let mut history = ChatHistory::load(tmp.path().join("history.json")).unwrap();

        assert!(history.render_recent(5).contains("No conversations found."));

        history
            .record(ChatTurn::new(
                "hello",
                "world",
                0.0,
                "m",
                TokenCounts::default(),
            ))
            .unwrap();
        let out = history.render_recent(5);
        assert!(out.contains("Prompt: hello"));
        assert!(out.contains("Response: world"));
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdefghij", 5), "abcde...");
    }
}
