//! Gemini wire format and HTTP error handling.

use serde_json::json;

use bizprofile::providers::gemini::{build_request, parse_response, GeminiProvider};
use bizprofile::providers::{GenerateRequest, LlmProvider, ProviderError};

use crate::support::serve_once;

#[test]
fn request_body_has_single_text_part() {
    let body = serde_json::to_value(build_request("hello")).expect("serialize");
    assert_eq!(body, json!({"contents": [{"parts": [{"text": "hello"}]}]}));
}

#[test]
fn response_text_is_extracted() {
    let body = r#"{"candidates":[{"content":{"parts":[{"text":"Focus on lunch."}],"role":"model"}}]}"#;
    assert!(matches!(parse_response(body).as_deref(), Ok("Focus on lunch.")));
}

#[test]
fn missing_text_is_a_parse_error() {
    for body in [
        r#"{"candidates":[]}"#,
        r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
        r#"{"candidates":[{"content":{"parts":[]}}]}"#,
        r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#,
        "not json",
    ] {
        assert!(
            matches!(parse_response(body), Err(ProviderError::Parse(_))),
            "{body}"
        );
    }
}

#[tokio::test]
async fn key_is_sent_as_query_parameter() {
    let (url, request) = serve_once(
        "200 OK",
        r#"{"candidates":[{"content":{"parts":[{"text":"ok"}]}}]}"#,
    )
    .await;
    let provider = GeminiProvider::new(format!("{url}v1/models/test:generateContent"));

    let reply = provider
        .generate(GenerateRequest {
            api_key: "test-key".to_owned(),
            prompt: "ping".to_owned(),
        })
        .await;
    assert!(matches!(reply.as_deref(), Ok("ok")));

    let request = request.await.expect("request captured");
    assert!(request.starts_with("POST /v1/models/test:generateContent?key=test-key "));
    assert!(request.contains(r#"{"contents":[{"parts":[{"text":"ping"}]}]}"#));
}

#[tokio::test]
async fn error_envelope_message_is_surfaced() {
    let (url, _request) = serve_once(
        "400 Bad Request",
        r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#,
    )
    .await;
    let provider = GeminiProvider::new(url);

    let result = provider
        .generate(GenerateRequest {
            api_key: "bad".to_owned(),
            prompt: "ping".to_owned(),
        })
        .await;
    match result {
        Err(ProviderError::HttpStatus { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid. Please pass a valid API key.");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn plain_error_body_gets_generic_message() {
    let (url, _request) = serve_once("503 Service Unavailable", "").await;
    let provider = GeminiProvider::new(url);

    let result = provider
        .generate(GenerateRequest {
            api_key: "k".to_owned(),
            prompt: "ping".to_owned(),
        })
        .await;
    match result {
        Err(ProviderError::HttpStatus { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "Failed to get response from AI");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}
