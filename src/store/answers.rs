//! Questionnaire answer persistence.

use tracing::{debug, warn};

use super::Store;
use crate::answers::{AnswerRow, AnswerValue, Answers};

/// Cache key of one answer.
pub fn response_key(session_id: &str, section_id: &str, question_id: &str) -> String {
    format!("response_{session_id}_{section_id}_{question_id}")
}

fn session_prefix(session_id: &str) -> String {
    format!("response_{session_id}_")
}

impl Store {
    /// Record an answer, replacing any earlier answer to the same question.
    ///
    /// The remote replace is attempted once; the local copy is always
    /// updated.
    pub async fn save_answer(
        &self,
        session_id: &str,
        section_id: &str,
        question_id: &str,
        value: &AnswerValue,
    ) {
        let row = AnswerRow {
            session_id: session_id.to_owned(),
            section_id: section_id.to_owned(),
            question_id: question_id.to_owned(),
            answer: value.to_stored(),
        };
        self.attempt("save answer", self.backend.replace_answer(&row))
            .await;
        self.mirror(&response_key(session_id, section_id, question_id), &row)
            .await;
        debug!(session_id, section_id, question_id, "answer saved");
    }

    /// Every answer of a session.
    ///
    /// Remote rows are mirrored one key per question. When the remote read
    /// fails the answers are rebuilt from mirrored keys; unreadable entries
    /// are skipped.
    pub async fn load_answers(&self, session_id: &str) -> Answers {
        match self.backend.answers(session_id).await {
            Ok(rows) => {
                for row in &rows {
                    self.mirror(
                        &response_key(&row.session_id, &row.section_id, &row.question_id),
                        row,
                    )
                    .await;
                }
                Answers::from_rows(&rows)
            }
            Err(err) => {
                warn!(session_id, error = %err, "remote answers unavailable, using local cache");
                let rows = self.cached_answer_rows(session_id).await;
                Answers::from_rows(&rows)
            }
        }
    }

    async fn cached_answer_rows(&self, session_id: &str) -> Vec<AnswerRow> {
        let entries = match self.cache.scan_prefix(&session_prefix(session_id)).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(session_id, error = %err, "failed to scan local answers");
                return Vec::new();
            }
        };
        entries
            .into_iter()
            .filter_map(|(key, value)| match serde_json::from_str::<AnswerRow>(&value) {
                Ok(row) => Some(row),
                Err(err) => {
                    warn!(key, error = %err, "skipping unreadable cached answer");
                    None
                }
            })
            .collect()
    }
}
