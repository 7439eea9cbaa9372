//! Persistence with a local fallback cache.
//!
//! [`Store`] is the single context object for every persisted entity. Each
//! operation tries the remote [`Backend`] exactly once; successful results are
//! mirrored into the [`LocalCache`], failures are logged and served from the
//! last mirrored value or a safe default. Only the chat dispatcher ever
//! surfaces an error to its caller; nothing in here does.
//!
//! Local cache keys:
//! - `sessionId`
//! - `response_{session}_{section}_{question}`
//! - `report_{session}`
//! - `chat_{session}`
//! - `goals_{session}`

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{trace, warn};

use crate::answers::AnswerRow;

pub mod answers;
pub mod cache;
pub mod goals;
pub mod messages;
pub mod offline;
pub mod reports;
pub mod rest;
pub mod session;

pub use cache::LocalCache;
pub use goals::Goal;
pub use messages::{ChatMessage, ChatRole};
pub use offline::OfflineBackend;
pub use rest::RestBackend;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from remote or local persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Local cache database failure.
    #[error("cache database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP transport failure talking to the backend.
    #[error("backend request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend responded with an error status.
    #[error("backend returned status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        body: String,
    },

    /// A stored or returned document could not be decoded.
    #[error("malformed data: {0}")]
    Malformed(String),

    /// Backend URL could not be parsed or joined.
    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),

    /// No backend is reachable (offline mode).
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// Remote persistence interface (one method per table operation).
///
/// Implementations perform a single attempt per call; retry and fallback
/// policy lives in [`Store`].
#[async_trait]
pub trait Backend: Send + Sync {
    /// Create a session row and return its id.
    async fn create_session(&self) -> Result<String, StoreError>;

    /// Delete any answer for the same session/section/question, then insert.
    async fn replace_answer(&self, row: &AnswerRow) -> Result<(), StoreError>;

    /// Every answer row of a session.
    async fn answers(&self, session_id: &str) -> Result<Vec<AnswerRow>, StoreError>;

    /// Replace the stored report of a session with `report` (JSON text).
    async fn replace_report(&self, session_id: &str, report: &str) -> Result<(), StoreError>;

    /// Stored report of a session, as raw JSON (text or document).
    async fn report(&self, session_id: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Append a chat message.
    async fn insert_message(&self, message: &ChatMessage) -> Result<(), StoreError>;

    /// Chat messages of a session in `(seq, created_at)` order.
    async fn messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, StoreError>;

    /// Insert a goal.
    async fn insert_goal(&self, goal: &Goal) -> Result<(), StoreError>;

    /// Set the `completed` flag of a goal.
    async fn set_goal_completed(&self, goal_id: &str, completed: bool) -> Result<(), StoreError>;

    /// Delete a goal.
    async fn delete_goal(&self, goal_id: &str) -> Result<(), StoreError>;

    /// Goals of a session in creation order.
    async fn goals(&self, session_id: &str) -> Result<Vec<Goal>, StoreError>;
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Remote backend plus local mirror, shared by every component.
pub struct Store {
    backend: Arc<dyn Backend>,
    cache: LocalCache,
    /// Serializes read-modify-write of list mirrors (chat, goals) and
    /// chat sequence assignment.
    list_lock: Mutex<()>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Build a store over `backend` with `cache` as the local mirror.
    pub fn new(backend: Arc<dyn Backend>, cache: LocalCache) -> Self {
        Self {
            backend,
            cache,
            list_lock: Mutex::new(()),
        }
    }

    /// The local mirror.
    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Resilient fetch: remote once, then local cache, then `default`.
    ///
    /// A successful result is mirrored under `key` unless it serializes to
    /// JSON `null`. A failure is logged and answered from the mirror if the
    /// mirrored value parses as `T`, otherwise with `default`.
    pub async fn resilient_fetch<T, Fut>(
        &self,
        operation: &'static str,
        key: &str,
        default: T,
        remote: Fut,
    ) -> T
    where
        T: Serialize + DeserializeOwned,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        match remote.await {
            Ok(value) => {
                self.mirror(key, &value).await;
                value
            }
            Err(err) => {
                warn!(operation, key, error = %err, "remote operation failed, serving local cache");
                self.recall(key).await.unwrap_or(default)
            }
        }
    }

    /// Attempt a remote write once; log and report whether it landed.
    async fn attempt<Fut>(&self, operation: &'static str, remote: Fut) -> bool
    where
        Fut: Future<Output = Result<(), StoreError>>,
    {
        match remote.await {
            Ok(()) => {
                trace!(operation, "remote write succeeded");
                true
            }
            Err(err) => {
                warn!(operation, error = %err, "remote write failed, keeping local copy only");
                false
            }
        }
    }

    /// Write `value` to the mirror. Failures are logged, never raised.
    async fn mirror<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_value(value) {
            Ok(serde_json::Value::Null) => return,
            Ok(json) => json,
            Err(err) => {
                warn!(key, error = %err, "value not serializable, skipping local mirror");
                return;
            }
        };
        if let Err(err) = self.cache.put(key, &json.to_string()).await {
            warn!(key, error = %err, "failed to update local cache");
        }
    }

    /// Read and decode a mirrored value. Missing or unreadable → `None`.
    async fn recall<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get_json(key).await {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "failed to read local cache");
                None
            }
        }
    }
}
