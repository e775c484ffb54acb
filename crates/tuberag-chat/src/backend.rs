//! Query backends.
//!
//! [`QueryBackend`] is the seam between the session loop and the remote
//! index: one prompt in, text plus token counts out. [`GeminiBackend`]
//! dispatches to the File Search client; [`MockBackend`] returns scripted
//! replies for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use tuberag_gemini::FileSearchClient;

use crate::error::{ChatError, Result};

/// Reply from one dispatched prompt.
#[derive(Debug, Clone)]
pub struct QueryReply {
    /// Response text
    pub text: String,

    /// Prompt/context tokens billed
    pub input_tokens: u64,

    /// Output tokens billed
    pub output_tokens: u64,
}

/// Something that can answer a prompt.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Dispatch one prompt with the given model.
    async fn query(&self, prompt: &str, model: &str) -> Result<QueryReply>;

    /// Backend name, for logging.
    fn name(&self) -> &str;
}

/// Backend dispatching to a Gemini File Search store.
pub struct GeminiBackend {
    client: FileSearchClient,
    store_id: String,
}

impl GeminiBackend {
    /// Wrap a client bound to one store.
    pub fn new(client: FileSearchClient, store_id: impl Into<String>) -> Self {
        Self {
            client,
            store_id: store_id.into(),
        }
    }
}

#[async_trait]
impl QueryBackend for GeminiBackend {
    async fn query(&self, prompt: &str, model: &str) -> Result<QueryReply> {
        debug!(store_id = %self.store_id, model, "dispatching prompt");
        let outcome = self
            .client
            .generate(model, prompt, &self.store_id)
            .await
            .map_err(|e| ChatError::Query(e.to_string()))?;

        Ok(QueryReply {
            text: outcome.text,
            input_tokens: outcome.input_tokens,
            output_tokens: outcome.output_tokens,
        })
    }

    fn name(&self) -> &str {
        "gemini-file-search"
    }
}

/// Scripted backend for tests: pops queued replies, counts calls.
pub struct MockBackend {
    replies: Mutex<VecDeque<std::result::Result<QueryReply, String>>>,
    calls: AtomicUsize,
}

impl MockBackend {
    /// Empty mock; unqueued calls get a default reply.
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a successful reply.
    pub fn push_reply(&self, text: impl Into<String>, input_tokens: u64, output_tokens: u64) {
        self.replies
            .lock()
            .expect("mock lock")
            .push_back(Ok(QueryReply {
                text: text.into(),
                input_tokens,
                output_tokens,
            }));
    }

    /// Queue a failure.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.replies
            .lock()
            .expect("mock lock")
            .push_back(Err(message.into()));
    }

    /// Number of prompts dispatched so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryBackend for MockBackend {
    async fn query(&self, _prompt: &str, _model: &str) -> Result<QueryReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.replies.lock().expect("mock lock").pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(ChatError::Query(message)),
            None => Ok(QueryReply {
                text: "mock response".to_string(),
                input_tokens: 10,
                output_tokens: 5,
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend_pops_in_order() {
        let backend = MockBackend::new();
        backend.push_reply("first", 1, 2);
        backend.push_failure("boom");

        let reply = backend.query("q1", "m").await.unwrap();
        assert_eq!(reply.text, "first");

        let err = backend.query("q2", "m").await.unwrap_err();
        assert!(matches!(err, ChatError::Query(_)));

        // Queue drained: default reply.
        let reply = backend.query("q3", "m").await.unwrap();
        assert_eq!(reply.text, "mock response");
        assert_eq!(backend.call_count(), 3);
    }
}
