//! Backend used when no remote URL is configured.

use async_trait::async_trait;

use super::{Backend, ChatMessage, Goal, StoreError};
use crate::answers::AnswerRow;

/// Every operation fails with [`StoreError::Unavailable`], so the store
/// serves and updates the local cache only.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineBackend;

fn unavailable<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable("no backend url configured".to_owned()))
}

#[async_trait]
impl Backend for OfflineBackend {
    async fn create_session(&self) -> Result<String, StoreError> {
        unavailable()
    }

    async fn replace_answer(&self, _row: &AnswerRow) -> Result<(), StoreError> {
        unavailable()
    }

    async fn answers(&self, _session_id: &str) -> Result<Vec<AnswerRow>, StoreError> {
        unavailable()
    }

    async fn replace_report(&self, _session_id: &str, _report: &str) -> Result<(), StoreError> {
        unavailable()
    }

    async fn report(&self, _session_id: &str) -> Result<Option<serde_json::Value>, StoreError> {
        unavailable()
    }

    async fn insert_message(&self, _message: &ChatMessage) -> Result<(), StoreError> {
        unavailable()
    }

    async fn messages(&self, _session_id: &str) -> Result<Vec<ChatMessage>, StoreError> {
        unavailable()
    }

    async fn insert_goal(&self, _goal: &Goal) -> Result<(), StoreError> {
        unavailable()
    }

    async fn set_goal_completed(&self, _goal_id: &str, _completed: bool) -> Result<(), StoreError> {
        unavailable()
    }

    async fn delete_goal(&self, _goal_id: &str) -> Result<(), StoreError> {
        unavailable()
    }

    async fn goals(&self, _session_id: &str) -> Result<Vec<Goal>, StoreError> {
        unavailable()
    }
}
