//! # tuberag-chat
//!
//! Chat history and the interactive session loop for TUBERAG.
//!
//! This crate provides:
//! - [`ChatHistory`] - JSON-backed append-only conversation history
//! - [`SessionLoop`] - the prompt loop state machine with control words
//! - [`QueryBackend`] - the dispatch seam, with [`GeminiBackend`] for the
//!   real service and [`MockBackend`] for tests
//!
//! ## Example
//!
//! ```no_run
//! use tuberag_chat::{ChatHistory, MockBackend, SessionConfig, SessionLoop};
//! use tuberag_cost::CostLedger;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = MockBackend::new();
//!     let mut history = ChatHistory::load("history.json")?;
//!     let mut ledger = CostLedger::load("costs.json")?;
//!
//!     let mut session = SessionLoop::new(
//!         &backend,
//!         &mut history,
//!         &mut ledger,
//!         SessionConfig::new("gemini-2.0-flash-exp"),
//!     );
//!     let mut out = std::io::stdout();
//!     session.handle_input("What topics come up?", &mut out).await?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod error;
pub mod history;
pub mod session;

// Re-export main types
pub use backend::{GeminiBackend, MockBackend, QueryBackend, QueryReply};
pub use error::{ChatError, Result};
pub use history::{preview, ChatHistory, ChatTurn, TokenCounts};
pub use session::{ControlWord, SessionConfig, SessionLoop, SessionState};
