//! Chat dispatcher against a local one-shot model endpoint.

use std::collections::BTreeMap;
use std::sync::Arc;

use bizprofile::chat::{ChatDispatcher, ChatError};
use bizprofile::credentials::PersonaKeys;
use bizprofile::providers::gemini::GeminiProvider;
use bizprofile::providers::ProviderError;
use bizprofile::store::{ChatRole, Store};

use crate::support::{serve_once, store_with, MemoryBackend};

const REPLY: &str = r#"{"candidates":[{"content":{"parts":[{"text":"Add a lunch combo."}]}}]}"#;

fn keys(pairs: &[(&str, &str)]) -> PersonaKeys {
    let keys: BTreeMap<String, String> = pairs
        .iter()
        .map(|(persona, key)| ((*persona).to_owned(), (*key).to_owned()))
        .collect();
    PersonaKeys::new(keys, "business")
}

async fn dispatcher(url: &str, keys: PersonaKeys) -> (ChatDispatcher, Arc<Store>) {
    let store = Arc::new(store_with(Arc::new(MemoryBackend::default())).await);
    let provider = Arc::new(GeminiProvider::new(url));
    (
        ChatDispatcher::new(Arc::clone(&store), provider, keys),
        store,
    )
}

#[tokio::test]
async fn reply_text_is_returned_as_assistant() {
    let (url, request) = serve_once("200 OK", REPLY).await;
    let (dispatcher, _store) = dispatcher(&url, keys(&[("sales", "sales-key")])).await;

    let reply = match dispatcher.send_message("sales", "How do I sell more?").await {
        Ok(reply) => reply,
        Err(err) => panic!("send should succeed: {err}"),
    };
    assert_eq!(reply.role, ChatRole::Assistant);
    assert_eq!(reply.content, "Add a lunch combo.");

    let request = request.await.expect("request captured");
    assert!(request.contains("?key=sales-key"));
    assert!(request.contains("You are an experienced sales professional"));
    assert!(request.contains("User Question: How do I sell more?"));
}

#[tokio::test]
async fn persona_without_key_uses_business_key() {
    let (url, request) = serve_once("200 OK", REPLY).await;
    let (dispatcher, _store) = dispatcher(&url, keys(&[("business", "biz-key")])).await;

    let reply = dispatcher.send_message("hr", "Staffing?").await;
    assert!(reply.is_ok());

    let request = request.await.expect("request captured");
    assert!(request.contains("?key=biz-key"));
}

#[tokio::test]
async fn missing_fallback_key_is_an_error() {
    let (dispatcher, _store) = dispatcher("http://127.0.0.1:9/", keys(&[("sales", "k")])).await;

    let result = dispatcher.send_message("finance", "Cash flow?").await;
    assert!(matches!(
        result,
        Err(ChatError::MissingCredential { ref persona }) if persona == "finance"
    ));
}

#[tokio::test]
async fn missing_text_field_is_descriptive_error() {
    let (url, _request) = serve_once("200 OK", r#"{"candidates":[]}"#).await;
    let (dispatcher, _store) = dispatcher(&url, keys(&[("business", "k")])).await;

    match dispatcher.send_message("business", "Hi").await {
        Err(err @ ChatError::Provider(ProviderError::Parse(_))) => {
            assert!(err.to_string().contains("invalid response format"));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[tokio::test]
async fn converse_persists_both_sides() {
    let (url, _request) = serve_once("200 OK", REPLY).await;
    let (dispatcher, store) = dispatcher(&url, keys(&[("business", "k")])).await;

    let reply = dispatcher.converse("strategy", "Where next?").await;
    assert!(reply.is_ok());

    let session_id = store.session_id().await;
    let history = store.chat_history(&session_id).await;
    let turns: Vec<(ChatRole, &str)> = history
        .iter()
        .map(|m| (m.role, m.content.as_str()))
        .collect();
    assert_eq!(
        turns,
        vec![
            (ChatRole::User, "Where next?"),
            (ChatRole::Assistant, "Add a lunch combo."),
        ]
    );
}

#[tokio::test]
async fn failed_turn_keeps_user_message() {
    let (url, _request) = serve_once("500 Internal Server Error", "boom").await;
    let (dispatcher, store) = dispatcher(&url, keys(&[("business", "k")])).await;

    assert!(dispatcher.converse("sales", "Hello?").await.is_err());

    let session_id = store.session_id().await;
    let history = store.chat_history(&session_id).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].role, ChatRole::User);
}

#[tokio::test]
async fn history_starts_with_welcome_and_filters_persona() {
    let (dispatcher, store) = dispatcher("http://127.0.0.1:9/", keys(&[])).await;
    let session_id = store.session_id().await;
    store
        .append_message(&session_id, "finance", ChatRole::User, "Margins?")
        .await;
    store
        .append_message(&session_id, "sales", ChatRole::User, "Leads?")
        .await;

    let history = dispatcher.history("finance").await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, ChatRole::Assistant);
    assert!(history[0].content.starts_with("Hi! I'm your financial advisor."));
    assert_eq!(history[1].content, "Margins?");

    let unknown = dispatcher.history("legal").await;
    assert!(unknown.is_empty());
}
