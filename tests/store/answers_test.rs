//! Answer persistence and offline fallback.

use std::sync::Arc;

use serde_json::json;

use bizprofile::answers::AnswerValue;
use bizprofile::store::answers::response_key;

use crate::support::{store_with, MemoryBackend};

fn value(json: serde_json::Value) -> AnswerValue {
    AnswerValue::from_json("q", json).expect("valid answer")
}

#[tokio::test]
async fn save_replaces_previous_answer() {
    let backend = Arc::new(MemoryBackend::default());
    let store = store_with(Arc::clone(&backend)).await;

    store
        .save_answer("s1", "finance", "has_debt", &value(json!("No")))
        .await;
    store
        .save_answer("s1", "finance", "has_debt", &value(json!("Yes")))
        .await;

    assert_eq!(backend.answer_count(), 1);
    let answers = store.load_answers("s1").await;
    assert!(answers.is_yes("has_debt"));
}

#[tokio::test]
async fn load_falls_back_to_cached_answers() {
    let backend = Arc::new(MemoryBackend::default());
    let store = store_with(Arc::clone(&backend)).await;

    store
        .save_answer("s1", "overview", "restaurant_type", &value(json!("Cafe")))
        .await;
    store
        .save_answer(
            "s1",
            "marketing",
            "marketing_strategies",
            &value(json!(["Instagram", "Flyers"])),
        )
        .await;

    backend.set_offline(true);
    let answers = store.load_answers("s1").await;
    assert_eq!(answers.len(), 2);
    assert_eq!(answers.scalar("restaurant_type"), Some("Cafe"));
    assert_eq!(
        answers.list("marketing_strategies").map(<[String]>::len),
        Some(2)
    );
}

#[tokio::test]
async fn answers_saved_offline_are_kept_locally() {
    let backend = Arc::new(MemoryBackend::default());
    backend.set_offline(true);
    let store = store_with(Arc::clone(&backend)).await;

    store
        .save_answer("s1", "finance", "has_debt", &value(json!(true)))
        .await;

    assert_eq!(backend.answer_count(), 0);
    assert!(store.load_answers("s1").await.is_yes("has_debt"));
}

#[tokio::test]
async fn unreadable_cached_rows_are_skipped() {
    let backend = Arc::new(MemoryBackend::default());
    backend.set_offline(true);
    let store = store_with(Arc::clone(&backend)).await;

    store
        .save_answer("s1", "finance", "has_debt", &value(json!("Yes")))
        .await;
    store
        .cache()
        .put(&response_key("s1", "finance", "broken"), "{not json")
        .await
        .expect("put");

    let answers = store.load_answers("s1").await;
    assert_eq!(answers.len(), 1);
}

#[tokio::test]
async fn sessions_do_not_share_cached_answers() {
    let backend = Arc::new(MemoryBackend::default());
    backend.set_offline(true);
    let store = store_with(Arc::clone(&backend)).await;

    store
        .save_answer("s1", "finance", "has_debt", &value(json!("Yes")))
        .await;

    assert!(store.load_answers("s2").await.is_empty());
}
