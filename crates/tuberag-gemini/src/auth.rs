//! Credential resolution for the Gemini API.
//!
//! Priority:
//! 1. `GEMINI_API_KEY` environment variable
//! 2. gcloud CLI application-default credentials
//!
//! Both absent means authentication is impossible and the process exits
//! with guidance; there is no anonymous mode.

use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{GeminiError, Result};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// How long to wait for a gcloud invocation before giving up.
const GCLOUD_TIMEOUT: Duration = Duration::from_secs(10);

/// A resolved credential, attached to every request.
#[derive(Debug, Clone)]
pub enum Credential {
    /// API key from the environment (sent as `x-goog-api-key`)
    ApiKey(String),
    /// OAuth access token from gcloud application-default credentials
    BearerToken(String),
}

impl Credential {
    /// Attach this credential to a request.
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Credential::ApiKey(key) => request.header("x-goog-api-key", key),
            Credential::BearerToken(token) => request.bearer_auth(token),
        }
    }

    /// Short name of the auth method, for logging.
    pub fn method(&self) -> &'static str {
        match self {
            Credential::ApiKey(_) => "api-key",
            Credential::BearerToken(_) => "gcloud-adc",
        }
    }
}

/// Resolves a credential from the environment or the gcloud CLI.
#[derive(Debug, Clone)]
pub struct CredentialProvider {
    api_key_env: String,
}

impl CredentialProvider {
    /// Provider reading the default `GEMINI_API_KEY` variable.
    pub fn new() -> Self {
        Self {
            api_key_env: API_KEY_ENV.to_string(),
        }
    }

    /// Provider reading a custom variable (for tests).
    pub fn with_env_var(api_key_env: impl Into<String>) -> Self {
        Self {
            api_key_env: api_key_env.into(),
        }
    }

    /// Resolve a credential, trying the API key first and falling back to
    /// gcloud application-default credentials.
    pub async fn authenticate(&self) -> Result<Credential> {
        if let Ok(key) = std::env::var(&self.api_key_env) {
            let key = key.trim().to_string();
            if !key.is_empty() {
                info!(method = "api-key", "authenticated");
                return Ok(Credential::ApiKey(key));
            }
            warn!(var = %self.api_key_env, "API key variable is set but empty");
        }

        debug!("no API key, attempting gcloud CLI authentication");
        match self.gcloud_access_token().await {
            Ok(token) => {
                info!(method = "gcloud-adc", "authenticated");
                Ok(Credential::BearerToken(token))
            }
            Err(e) => Err(GeminiError::Authentication(format!(
                "{} not set and gcloud fallback failed: {e}",
                self.api_key_env
            ))),
        }
    }

    /// Fetch an access token from gcloud application-default credentials.
    async fn gcloud_access_token(&self) -> Result<String> {
        let output = tokio::time::timeout(
            GCLOUD_TIMEOUT,
            Command::new("gcloud")
                .args(["auth", "application-default", "print-access-token"])
                .output(),
        )
        .await
        .map_err(|_| {
            GeminiError::Authentication(format!(
                "gcloud timed out after {}s",
                GCLOUD_TIMEOUT.as_secs()
            ))
        })?
        .map_err(|e| GeminiError::Authentication(format!("gcloud CLI not available: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GeminiError::Authentication(format!(
                "gcloud application-default credentials not configured: {}",
                stderr.trim()
            )));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(GeminiError::Authentication(
                "gcloud returned an empty access token".to_string(),
            ));
        }

        Ok(token)
    }
}

impl Default for CredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}
