//! Gemini API request and response types.
//!
//! Serde types for the three File Search calls TUBERAG makes: store
//! creation, document upload, and grounded generation. Anything the
//! vendor returns beyond what we read is ignored.

use serde::{Deserialize, Serialize};

/// Request to create a File Search store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreRequest {
    pub display_name: String,
}

/// A File Search store resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreResource {
    /// Fully-qualified resource name, e.g. `fileSearchStores/abc123`
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Response from uploading a document into a store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Fully-qualified document resource name
    pub name: String,
}

/// Request for grounded generation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub tools: Vec<Tool>,
}

/// One conversation turn in the request.
#[derive(Debug, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// A content part.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Part {
    pub text: String,
}

/// Tool attachment; only file search is used.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub file_search: FileSearchTool,
}

/// The file-search tool configuration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSearchTool {
    pub file_search_store_names: Vec<String>,
}

/// Response from grounded generation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

/// One generation candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: CandidateContent,
}

/// Candidate content parts.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Token usage reported by the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u64,
    #[serde(default)]
    pub candidates_token_count: u64,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate's parts.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }

    /// Token counts, zero when the API omits usage metadata.
    pub fn token_counts(&self) -> (u64, u64) {
        match &self.usage_metadata {
            Some(usage) => (usage.prompt_token_count, usage.candidates_token_count),
            None => (0, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_response_text_and_usage() {
        let raw = serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "Hello "}, {"text": "world"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5}
        });
        let response: GenerateResponse = serde_json::from_value(raw).unwrap();

        assert_eq!(response.text(), "Hello world");
        assert_eq!(response.token_counts(), (12, 5));
    }

    #[test]
    fn test_generate_response_tolerates_missing_usage() {
        let raw = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
        });
        let response: GenerateResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.token_counts(), (0, 0));
    }

    #[test]
    fn test_empty_candidates_is_empty_text() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(response.text(), "");
    }
}
