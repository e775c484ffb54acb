//! # tuberag-core
//!
//! Shared plumbing for TUBERAG:
//!
//! - [`CoreError`] - errors for the data directory and its JSON documents
//! - [`logging`] - tracing-based logging bootstrap
//! - [`DataDir`] - resolved data-directory layout (`~/.tuberag` by default)
//!
//! Domain logic lives in the sibling crates; this one only holds what all
//! of them need.

pub mod error;
pub mod logging;
pub mod paths;

// Re-export main types
pub use error::{CoreError, Result};
pub use logging::{init_logging, init_test_logging, LogGuard};
pub use paths::DataDir;
