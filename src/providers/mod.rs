//! Generative-AI provider abstraction layer.
//!
//! Defines the [`LlmProvider`] trait, the shared request type and the HTTP
//! helpers used by provider implementations. One provider is implemented:
//! [`gemini::GeminiProvider`] for the `generateContent` API.

use async_trait::async_trait;
use regex::Regex;

pub mod gemini;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A single-turn text generation request.
#[derive(Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Credential sent with the request.
    pub api_key: String,
    /// Full prompt text (instructions plus user question).
    pub prompt: String,
}

impl std::fmt::Debug for GenerateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateRequest")
            .field("api_key", &"[REDACTED]")
            .field("prompt_chars", &self.prompt.chars().count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by model providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP transport failure.
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response did not match the expected shape.
    #[error("invalid response format from AI: {0}")]
    Parse(String),
    /// Upstream provider responded with an error status.
    #[error("AI request failed with status {status}: {message}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Provider error message, or the sanitized body.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Check HTTP response status and return body text or a structured error.
///
/// On non-2xx, the provider's `error.message` is used when the body is a JSON
/// error envelope; otherwise the sanitized body.
///
/// # Errors
///
/// Returns `ProviderError::Request` on transport failure, `ProviderError::HttpStatus` on non-2xx.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, ProviderError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        let message = match error_envelope_message(&body) {
            Some(message) => sanitize_http_error_body(&message),
            None if body.trim().is_empty() => "Failed to get response from AI".to_owned(),
            None => format!(
                "Failed to get response from AI: {}",
                sanitize_http_error_body(&body)
            ),
        };
        return Err(ProviderError::HttpStatus {
            status: status.as_u16(),
            message,
        });
    }
    Ok(body)
}

fn error_envelope_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_owned)
}

/// Collapse whitespace, redact key-like tokens and truncate an error body.
pub fn sanitize_http_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sanitized = collapsed;
    for pattern in [
        r"AIza[A-Za-z0-9_\-]{20,}",
        r"sk-[A-Za-z0-9]{32,}",
        r"eyJ[A-Za-z0-9_\-]{10,}\.[A-Za-z0-9_\-]{10,}\.[A-Za-z0-9_\-]+",
    ] {
        if let Ok(regex) = Regex::new(pattern) {
            sanitized = regex.replace_all(&sanitized, "[REDACTED]").into_owned();
        }
    }

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Core text-generation interface.
///
/// Implementations must be `Send + Sync` so one provider can be shared by
/// every chat turn.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a reply for a single prompt.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on network, status, or response-shape failure.
    async fn generate(&self, request: GenerateRequest) -> Result<String, ProviderError>;

    /// Endpoint identifier for logging.
    fn endpoint(&self) -> &str;
}
