//! Per-persona chat message persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Store;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The business owner.
    User,
    /// A persona consultant (or a delivered report summary).
    Assistant,
}

impl ChatRole {
    /// Wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One persisted chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Owning session.
    pub session_id: String,
    /// Persona the conversation is with (`sales`, `finance`, ...).
    pub profile: String,
    /// Author.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Per-session sequence number; primary ordering key.
    #[serde(default)]
    pub seq: u64,
}

/// Cache key of a session's chat log.
pub fn chat_key(session_id: &str) -> String {
    format!("chat_{session_id}")
}

/// Sort messages into display order: `seq`, then `created_at`.
pub fn sort_messages(messages: &mut [ChatMessage]) {
    messages.sort_by(|a, b| (a.seq, a.created_at).cmp(&(b.seq, b.created_at)));
}

impl Store {
    /// Append a message to a session's chat log and return it.
    ///
    /// Sequence numbers are assigned under a lock, one past the highest
    /// known locally, so concurrent appends never share a number.
    pub async fn append_message(
        &self,
        session_id: &str,
        profile: &str,
        role: ChatRole,
        content: &str,
    ) -> ChatMessage {
        let _guard = self.list_lock.lock().await;
        let key = chat_key(session_id);

        let mut log: Vec<ChatMessage> = self.recall(&key).await.unwrap_or_default();
        let seq = log
            .iter()
            .map(|m| m.seq)
            .max()
            .map_or(1, |last| last.saturating_add(1));

        let message = ChatMessage {
            session_id: session_id.to_owned(),
            profile: profile.to_owned(),
            role,
            content: content.to_owned(),
            created_at: Utc::now(),
            seq,
        };

        self.attempt("save chat message", self.backend.insert_message(&message))
            .await;
        log.push(message.clone());
        self.mirror(&key, &log).await;

        debug!(session_id, profile, role = role.as_str(), seq, "chat message appended");
        message
    }

    /// Every chat message of a session (all personas), in display order.
    pub async fn chat_history(&self, session_id: &str) -> Vec<ChatMessage> {
        let _guard = self.list_lock.lock().await;
        let mut messages = self
            .resilient_fetch(
                "fetch chat history",
                &chat_key(session_id),
                Vec::new(),
                self.backend.messages(session_id),
            )
            .await;
        sort_messages(&mut messages);
        messages
    }
}
