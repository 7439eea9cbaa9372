//! bizprofile: questionnaire-driven business profile with persona chat.
//!
//! A business owner answers a questionnaire; the answers become a normalized
//! [`report::BusinessReport`] with rule-based recommendations, and persona
//! consultants (sales, finance, HR, strategy, business) discuss that report
//! through a hosted generative-AI endpoint.
//!
//! Every remote read and write goes through [`store::Store`], which falls
//! back to a local SQLite mirror when the backend is unreachable. Only the
//! chat dispatcher reports failures to its caller.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod answers;
pub mod app;
pub mod chat;
pub mod config;
pub mod credentials;
pub mod logging;
pub mod prompt;
pub mod providers;
pub mod report;
pub mod store;
