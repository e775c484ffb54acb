//! Gemini File Search client using direct HTTP requests.
//!
//! This module provides [`FileSearchClient`], which makes the three calls
//! TUBERAG needs against the Gemini API with the reqwest HTTP client:
//! store creation, document upload, and grounded generation.
//!
//! ## Example
//!
//! ```no_run
//! use tuberag_gemini::{auth::CredentialProvider, client::{FileSearchClient, GeminiConfig}};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let credential = CredentialProvider::new().authenticate().await?;
//! let client = FileSearchClient::new(GeminiConfig::default(), credential)?;
//!
//! let store = client.create_store("youtube_transcripts").await?;
//! let outcome = client.generate("gemini-2.0-flash-exp", "What topics come up?", &store.name).await?;
//! println!("{}", outcome.text);
//! # Ok(())
//! # }
//! ```

use tokio::time::Duration;
use tracing::debug;

use crate::api_types::{
    Content, CreateStoreRequest, FileSearchTool, GenerateRequest, GenerateResponse, Part,
    StoreResource, Tool, UploadResponse,
};
use crate::auth::Credential;
use crate::error::{GeminiError, Result};

/// Client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API base URL (overridden in tests to point at a mock server)
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 120,
        }
    }
}

impl GeminiConfig {
    /// Set a custom API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Result of one grounded query.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// Response text
    pub text: String,

    /// Prompt/context tokens billed
    pub input_tokens: u64,

    /// Output tokens billed
    pub output_tokens: u64,
}

/// Gemini File Search client.
pub struct FileSearchClient {
    config: GeminiConfig,
    http: reqwest::Client,
    credential: Credential,
}

impl FileSearchClient {
    /// Create a client from config and a resolved credential.
    pub fn new(config: GeminiConfig, credential: Credential) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            http,
            credential,
        })
    }

    /// Create a new File Search store.
    pub async fn create_store(&self, display_name: &str) -> Result<StoreResource> {
        let url = format!("{}/v1beta/fileSearchStores", self.config.base_url);
        debug!(%url, display_name, "creating file search store");

        let request = self.credential.apply(self.http.post(&url)).json(&CreateStoreRequest {
            display_name: display_name.to_string(),
        });

        let response = request.send().await?;
        Self::check(response).await?.json().await.map_err(GeminiError::from)
    }

    /// Upload one document into a store, returning its resource name.
    pub async fn upload_document(
        &self,
        store_id: &str,
        display_name: &str,
        text: &str,
    ) -> Result<String> {
        let url = format!(
            "{}/upload/v1beta/{}:uploadToFileSearchStore",
            self.config.base_url, store_id
        );
        debug!(%url, display_name, bytes = text.len(), "uploading document");

        let request = self
            .credential
            .apply(self.http.post(&url))
            .query(&[("displayName", display_name)])
            .header("content-type", "text/plain")
            .body(text.to_string());

        let response = request.send().await.map_err(|e| GeminiError::Upload {
            name: display_name.to_string(),
            message: e.to_string(),
        })?;

        let upload: UploadResponse = Self::check(response)
            .await
            .map_err(|e| GeminiError::Upload {
                name: display_name.to_string(),
                message: e.to_string(),
            })?
            .json()
            .await
            .map_err(|e| GeminiError::Upload {
                name: display_name.to_string(),
                message: e.to_string(),
            })?;

        Ok(upload.name)
    }

    /// Run one grounded query against a store.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        store_id: &str,
    ) -> Result<QueryOutcome> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, model
        );
        debug!(%url, "dispatching grounded query");

        let body = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            tools: vec![Tool {
                file_search: FileSearchTool {
                    file_search_store_names: vec![store_id.to_string()],
                },
            }],
        };

        let request = self.credential.apply(self.http.post(&url)).json(&body);
        let response = request.send().await?;
        let generated: GenerateResponse = Self::check(response).await?.json().await?;

        let (input_tokens, output_tokens) = generated.token_counts();
        Ok(QueryOutcome {
            text: generated.text(),
            input_tokens,
            output_tokens,
        })
    }

    /// Map non-success statuses to typed errors.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(GeminiError::from_http_status(status.as_u16(), &body))
    }
}
