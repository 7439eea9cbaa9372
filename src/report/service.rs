//! Report generation wired to persistence.
//!
//! Neither entry point fails: any problem below degrades to the default
//! report.

use tracing::{info, warn};

use super::summary::{report_summary, SUMMARY_PERSONAS};
use super::{build_report, BusinessReport};
use crate::store::{ChatRole, Store};

/// Build a fresh report from the session's answers.
///
/// With answers present the report summary is appended to every summary
/// persona's chat (on every generation) and the report is saved. With no
/// answers the default report is returned and nothing is persisted.
pub async fn generate_business_report(store: &Store, session_id: &str) -> BusinessReport {
    let answers = store.load_answers(session_id).await;
    if answers.is_empty() {
        warn!(session_id, "no answers recorded, returning default report");
        return BusinessReport::default();
    }

    let report = build_report(&answers);
    let summary = report_summary(&report);
    for persona in SUMMARY_PERSONAS {
        store
            .append_message(session_id, persona, ChatRole::Assistant, &summary)
            .await;
    }
    store.save_report(session_id, &report).await;

    info!(
        session_id,
        answers = answers.len(),
        recommendations = report.recommendations.len(),
        "business report generated"
    );
    report
}

/// The stored report of a session, generating one if none exists.
pub async fn get_report(store: &Store, session_id: &str) -> BusinessReport {
    match store.fetch_report(session_id).await {
        Some(report) => report,
        None => generate_business_report(store, session_id).await,
    }
}
