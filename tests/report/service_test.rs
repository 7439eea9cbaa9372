//! Report generation wired to the store.

use std::sync::Arc;

use serde_json::json;

use bizprofile::answers::AnswerValue;
use bizprofile::report::summary::SUMMARY_PERSONAS;
use bizprofile::report::{generate_business_report, get_report, BusinessReport};
use bizprofile::store::{ChatRole, Store};

use crate::support::{store_with, MemoryBackend};

async fn answer(store: &Store, question: &str, value: serde_json::Value) {
    let value = AnswerValue::from_json(question, value).expect("valid answer");
    store.save_answer("s1", "section", question, &value).await;
}

#[tokio::test]
async fn generation_saves_report_and_posts_summaries() {
    let backend = Arc::new(MemoryBackend::default());
    let store = store_with(Arc::clone(&backend)).await;
    answer(&store, "restaurant_type", json!("Cafe")).await;
    answer(&store, "has_debt", json!("Yes")).await;

    let report = generate_business_report(&store, "s1").await;
    assert_eq!(report.overview.business_type, "Cafe");
    assert!(backend.has_report("s1"));

    let history = store.chat_history("s1").await;
    assert_eq!(history.len(), SUMMARY_PERSONAS.len());
    for (message, persona) in history.iter().zip(SUMMARY_PERSONAS) {
        assert_eq!(message.profile, persona);
        assert_eq!(message.role, ChatRole::Assistant);
        assert!(message
            .content
            .starts_with("📊 Business Analysis Report Summary"));
    }
}

#[tokio::test]
async fn every_generation_posts_summaries_again() {
    let backend = Arc::new(MemoryBackend::default());
    let store = store_with(Arc::clone(&backend)).await;
    answer(&store, "restaurant_type", json!("Cafe")).await;

    generate_business_report(&store, "s1").await;
    generate_business_report(&store, "s1").await;

    assert_eq!(backend.message_count(), SUMMARY_PERSONAS.len().saturating_mul(2));
}

#[tokio::test]
async fn no_answers_yield_default_report_without_side_effects() {
    let backend = Arc::new(MemoryBackend::default());
    let store = store_with(Arc::clone(&backend)).await;

    let report = generate_business_report(&store, "s1").await;
    assert_eq!(report, BusinessReport::default());
    assert!(!backend.has_report("s1"));
    assert_eq!(backend.message_count(), 0);
}

#[tokio::test]
async fn get_report_prefers_stored_report() {
    let backend = Arc::new(MemoryBackend::default());
    let store = store_with(Arc::clone(&backend)).await;
    answer(&store, "restaurant_type", json!("Cafe")).await;

    let generated = get_report(&store, "s1").await;
    // A later answer does not change the stored report.
    answer(&store, "restaurant_type", json!("Bakery")).await;
    let fetched = get_report(&store, "s1").await;

    assert_eq!(generated, fetched);
    assert_eq!(fetched.overview.business_type, "Cafe");
    assert_eq!(backend.message_count(), SUMMARY_PERSONAS.len());
}

#[tokio::test]
async fn stored_report_is_served_during_outage() {
    let backend = Arc::new(MemoryBackend::default());
    let store = store_with(Arc::clone(&backend)).await;
    answer(&store, "restaurant_type", json!("Cafe")).await;
    let generated = generate_business_report(&store, "s1").await;

    backend.set_offline(true);
    assert_eq!(get_report(&store, "s1").await, generated);
}

#[tokio::test]
async fn offline_without_anything_cached_is_default() {
    let backend = Arc::new(MemoryBackend::default());
    backend.set_offline(true);
    let store = store_with(Arc::clone(&backend)).await;

    assert_eq!(get_report(&store, "s1").await, BusinessReport::default());
}
