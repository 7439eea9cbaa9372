//! Session identity.

use chrono::Utc;
use tracing::{info, warn};

use super::Store;

/// Cache key holding the current session id.
pub const SESSION_KEY: &str = "sessionId";

impl Store {
    /// The current session id, creating one on first use.
    ///
    /// A cached id is reused. Otherwise the backend is asked to create a
    /// session; if that fails the id is `local_{unix_millis}`. Either way the
    /// id is cached for later runs.
    pub async fn session_id(&self) -> String {
        match self.cache.get(SESSION_KEY).await {
            Ok(Some(id)) if !id.trim().is_empty() => return id,
            Ok(_) => {}
            Err(err) => warn!(error = %err, "failed to read cached session id"),
        }

        let id = match self.backend.create_session().await {
            Ok(id) => {
                info!(session_id = %id, "session created");
                id
            }
            Err(err) => {
                let id = format!("local_{}", Utc::now().timestamp_millis());
                warn!(session_id = %id, error = %err, "remote session unavailable, using local id");
                id
            }
        };

        if let Err(err) = self.cache.put(SESSION_KEY, &id).await {
            warn!(error = %err, "failed to cache session id");
        }
        id
    }
}
