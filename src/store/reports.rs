//! Business report persistence.

use tracing::{debug, warn};

use super::{Store, StoreError};
use crate::report::BusinessReport;

/// Cache key of a session's report.
pub fn report_key(session_id: &str) -> String {
    format!("report_{session_id}")
}

/// Decode a stored report, which may be JSON text or an inline document.
fn decode_report(stored: serde_json::Value) -> Result<BusinessReport, StoreError> {
    match stored {
        serde_json::Value::String(text) => Ok(serde_json::from_str(&text)?),
        document => Ok(serde_json::from_value(document)?),
    }
}

impl Store {
    /// Replace the stored report of a session.
    pub async fn save_report(&self, session_id: &str, report: &BusinessReport) {
        match serde_json::to_string(report) {
            Ok(text) => {
                self.attempt(
                    "save report",
                    self.backend.replace_report(session_id, &text),
                )
                .await;
            }
            Err(err) => warn!(session_id, error = %err, "report not serializable"),
        }
        self.mirror(&report_key(session_id), report).await;
        debug!(session_id, "report saved");
    }

    /// Stored report of a session, if any.
    ///
    /// A remote "no report" is authoritative; the mirror is only consulted
    /// when the remote read fails or returns an undecodable document.
    pub async fn fetch_report(&self, session_id: &str) -> Option<BusinessReport> {
        let remote = async {
            match self.backend.report(session_id).await? {
                Some(stored) => decode_report(stored).map(Some),
                None => Ok(None),
            }
        };
        self.resilient_fetch("fetch report", &report_key(session_id), None, remote)
            .await
    }
}
