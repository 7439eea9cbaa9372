//! Gemini provider implementation using the `generateContent` API.

use serde::{Deserialize, Serialize};

use super::{check_http_response, GenerateRequest, LlmProvider, ProviderError};

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// `generateContent` request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    /// Conversation contents; always a single entry here.
    pub contents: Vec<GeminiContent>,
}

/// One content entry in request or response.
#[doc(hidden)]
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// Content parts.
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// A content part.
#[doc(hidden)]
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    /// Text payload; absent for non-text parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// `generateContent` response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    /// Candidate completions.
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

/// A candidate completion.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    /// Candidate content; missing when the candidate was blocked.
    pub content: Option<GeminiContent>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Gemini `generateContent` provider.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    api_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a provider posting to `api_url`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build the request body for a prompt.
#[doc(hidden)]
pub fn build_request(prompt: &str) -> GeminiRequest {
    GeminiRequest {
        contents: vec![GeminiContent {
            parts: vec![GeminiPart {
                text: Some(prompt.to_owned()),
            }],
        }],
    }
}

/// Extract `candidates[0].content.parts[0].text` from a response body.
///
/// # Errors
///
/// Returns `ProviderError::Parse` if the body is not JSON or the text field
/// is missing or empty.
#[doc(hidden)]
pub fn parse_response(body: &str) -> Result<String, ProviderError> {
    let resp: GeminiResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    resp.candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ProviderError::Parse("missing candidates[0].content.parts[0].text".to_owned()))
}

// ---------------------------------------------------------------------------
// Trait impl
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, request: GenerateRequest) -> Result<String, ProviderError> {
        let body = build_request(&request.prompt);

        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", request.api_key.as_str())])
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let payload = check_http_response(response).await?;
        parse_response(&payload)
    }

    fn endpoint(&self) -> &str {
        &self.api_url
    }
}
