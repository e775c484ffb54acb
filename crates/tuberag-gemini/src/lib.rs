//! # tuberag-gemini
//!
//! Gemini File Search client and credential handling for TUBERAG.
//!
//! This crate provides:
//! - [`CredentialProvider`] - API key env var with gcloud CLI fallback
//! - [`FileSearchClient`] - store creation, document upload, grounded queries
//! - [`StoreConfig`] - the persistent store-id + uploaded-document cache
//!
//! The vendor API is treated as an opaque capability: upload a document,
//! get back a resource id; send a prompt, get back text and token counts.
//! Everything else (chunking, embedding, ranking) happens on the vendor
//! side.
//!
//! ## Example
//!
//! ```no_run
//! use tuberag_gemini::{
//!     auth::CredentialProvider,
//!     client::{FileSearchClient, GeminiConfig},
//!     store::{ensure_store, StoreConfig},
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let credential = CredentialProvider::new().authenticate().await?;
//!     let client = FileSearchClient::new(GeminiConfig::default(), credential)?;
//!
//!     let mut config = StoreConfig::load("store_config.json")?;
//!     let store_id = ensure_store(&client, &mut config, "youtube_transcripts").await?;
//!     println!("store: {store_id}");
//!     Ok(())
//! }
//! ```

pub mod api_types;
pub mod auth;
pub mod client;
pub mod error;
pub mod store;

// Re-export main types
pub use auth::{Credential, CredentialProvider, API_KEY_ENV};
pub use client::{FileSearchClient, GeminiConfig, QueryOutcome};
pub use error::{GeminiError, Result};
pub use store::{ensure_store, StoreConfig, StoreEntry};
