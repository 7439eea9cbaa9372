//! PostgREST-style HTTP backend (`{base}/rest/v1/{table}`).
//!
//! Tables: `sessions`, `responses`, `business_reports`, `chat_messages`,
//! `goals`. Filters use the `column=eq.value` query convention; every
//! request carries the `apikey` and bearer `Authorization` headers.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::{Backend, ChatMessage, Goal, StoreError};
use crate::answers::AnswerRow;
use crate::providers::sanitize_http_error_body;

/// REST client for the remote tables.
#[derive(Clone)]
pub struct RestBackend {
    base: Url,
    api_key: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for RestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestBackend")
            .field("base", &self.base.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct NewSession {
    created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct SessionRow {
    id: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ReportInsert<'a> {
    session_id: &'a str,
    report: &'a str,
    created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ReportRow {
    report: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct GoalPatch {
    completed: bool,
}

impl RestBackend {
    /// Create a backend rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Url`] if `base_url` does not parse.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, StoreError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        })
    }

    /// Endpoint URL of `table`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Url`] if the table path cannot be joined.
    pub fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        Ok(self.base.join(&format!("rest/v1/{table}"))?)
    }

    fn request(&self, method: Method, table: &str) -> Result<RequestBuilder, StoreError> {
        let url = self.table_url(table)?;
        Ok(self
            .client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key)))
    }

    async fn send(request: RequestBuilder) -> Result<String, StoreError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::HttpStatus {
                status: status.as_u16(),
                body: sanitize_http_error_body(&body),
            });
        }
        Ok(body)
    }

    async fn fetch<T: for<'de> Deserialize<'de>>(
        request: RequestBuilder,
    ) -> Result<Vec<T>, StoreError> {
        let body = Self::send(request).await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&body)?)
    }
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

#[async_trait]
impl Backend for RestBackend {
    async fn create_session(&self) -> Result<String, StoreError> {
        let request = self
            .request(Method::POST, "sessions")?
            .header("Prefer", "return=representation")
            .json(&[NewSession {
                created_at: Utc::now(),
            }]);
        let rows: Vec<SessionRow> = Self::fetch(request).await?;
        let id = rows
            .into_iter()
            .next()
            .map(|row| match row.id {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .ok_or_else(|| StoreError::Malformed("session insert returned no rows".to_owned()))?;
        debug!(session_id = %id, "remote session created");
        Ok(id)
    }

    async fn replace_answer(&self, row: &AnswerRow) -> Result<(), StoreError> {
        let delete = self.request(Method::DELETE, "responses")?.query(&[
            ("session_id", eq(&row.session_id)),
            ("section_id", eq(&row.section_id)),
            ("question_id", eq(&row.question_id)),
        ]);
        Self::send(delete).await?;

        let insert = self.request(Method::POST, "responses")?.json(&[row]);
        Self::send(insert).await?;
        Ok(())
    }

    async fn answers(&self, session_id: &str) -> Result<Vec<AnswerRow>, StoreError> {
        let request = self
            .request(Method::GET, "responses")?
            .query(&[("select", "*".to_owned()), ("session_id", eq(session_id))]);
        Self::fetch(request).await
    }

    async fn replace_report(&self, session_id: &str, report: &str) -> Result<(), StoreError> {
        let delete = self
            .request(Method::DELETE, "business_reports")?
            .query(&[("session_id", eq(session_id))]);
        Self::send(delete).await?;

        let insert = self
            .request(Method::POST, "business_reports")?
            .json(&[ReportInsert {
                session_id,
                report,
                created_at: Utc::now(),
            }]);
        Self::send(insert).await?;
        Ok(())
    }

    async fn report(&self, session_id: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let request = self.request(Method::GET, "business_reports")?.query(&[
            ("select", "report".to_owned()),
            ("session_id", eq(session_id)),
            ("order", "created_at.desc".to_owned()),
            ("limit", "1".to_owned()),
        ]);
        let rows: Vec<ReportRow> = Self::fetch(request).await?;
        Ok(rows
            .into_iter()
            .next()
            .map(|row| row.report)
            .filter(|report| !report.is_null()))
    }

    async fn insert_message(&self, message: &ChatMessage) -> Result<(), StoreError> {
        let request = self.request(Method::POST, "chat_messages")?.json(&[message]);
        Self::send(request).await?;
        Ok(())
    }

    async fn messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, StoreError> {
        let request = self.request(Method::GET, "chat_messages")?.query(&[
            ("select", "*".to_owned()),
            ("session_id", eq(session_id)),
            ("order", "seq.asc,created_at.asc".to_owned()),
        ]);
        Self::fetch(request).await
    }

    async fn insert_goal(&self, goal: &Goal) -> Result<(), StoreError> {
        let request = self.request(Method::POST, "goals")?.json(&[goal]);
        Self::send(request).await?;
        Ok(())
    }

    async fn set_goal_completed(&self, goal_id: &str, completed: bool) -> Result<(), StoreError> {
        let request = self
            .request(Method::PATCH, "goals")?
            .query(&[("id", eq(goal_id))])
            .json(&GoalPatch { completed });
        Self::send(request).await?;
        Ok(())
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<(), StoreError> {
        let request = self
            .request(Method::DELETE, "goals")?
            .query(&[("id", eq(goal_id))]);
        Self::send(request).await?;
        Ok(())
    }

    async fn goals(&self, session_id: &str) -> Result<Vec<Goal>, StoreError> {
        let request = self.request(Method::GET, "goals")?.query(&[
            ("select", "*".to_owned()),
            ("session_id", eq(session_id)),
            ("order", "created_at.asc".to_owned()),
        ]);
        Self::fetch(request).await
    }
}
