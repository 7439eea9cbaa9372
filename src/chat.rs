//! Persona chat dispatcher.
//!
//! [`ChatDispatcher::send_message`] is the one place in the crate whose
//! failures reach the caller: every turn re-reads the report, frames it for
//! the persona and asks the model once. [`ChatDispatcher::converse`] adds
//! persistence of both sides of the turn.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::credentials::PersonaKeys;
use crate::prompt::{profile_instructions, question_prompt};
use crate::providers::{GenerateRequest, LlmProvider, ProviderError};
use crate::report::get_report;
use crate::store::messages::sort_messages;
use crate::store::{ChatMessage, ChatRole, Store};

/// Errors from a chat turn.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Neither the persona nor the fallback persona has a credential.
    #[error("no AI credential configured for persona '{persona}' or its fallback")]
    MissingCredential {
        /// Requested persona.
        persona: String,
    },

    /// The model endpoint failed or answered in an unexpected shape.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// A model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// Always [`ChatRole::Assistant`].
    pub role: ChatRole,
    /// Reply text.
    pub content: String,
}

/// Opening line shown at the top of a persona's conversation.
pub fn welcome_message(profile: &str) -> Option<&'static str> {
    let text = match profile {
        "finance" => "Hi! I'm your financial advisor. How can I help you analyze your business finances today?",
        "sales" => "Hello! I'm your sales consultant. Ready to boost your revenue and optimize your sales strategy?",
        "hr" => "Hi there! I'm your HR specialist. Need help with staffing, management, or workplace optimization?",
        "business" => "Hey! I'm your business consultant. Let's work on improving your overall business performance.",
        "strategy" => "Hello! I'm your strategy expert. Ready to develop effective plans for your business growth?",
        "report" => "Welcome to your business report! How can I help you understand your analysis better?",
        _ => return None,
    };
    Some(text)
}

/// Routes user questions to the model with persona framing.
pub struct ChatDispatcher {
    store: Arc<Store>,
    provider: Arc<dyn LlmProvider>,
    keys: PersonaKeys,
}

impl std::fmt::Debug for ChatDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatDispatcher")
            .field("endpoint", &self.provider.endpoint())
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl ChatDispatcher {
    /// Create a dispatcher.
    pub fn new(store: Arc<Store>, provider: Arc<dyn LlmProvider>, keys: PersonaKeys) -> Self {
        Self {
            store,
            provider,
            keys,
        }
    }

    /// The store this dispatcher reads reports from.
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Ask `profile` one question about the current report.
    ///
    /// Nothing is persisted here beyond what report generation does.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::MissingCredential`] when no key resolves for the
    /// persona, or [`ChatError::Provider`] on transport, status or
    /// response-shape failure. No retries.
    pub async fn send_message(&self, profile: &str, user_text: &str) -> Result<ChatReply, ChatError> {
        let session_id = self.store.session_id().await;
        let report = get_report(&self.store, &session_id).await;

        let api_key = self
            .keys
            .resolve(profile)
            .ok_or_else(|| ChatError::MissingCredential {
                persona: profile.to_owned(),
            })?
            .to_owned();

        let instructions = profile_instructions(profile, &report);
        let prompt = question_prompt(&instructions, user_text);

        info!(
            profile,
            endpoint = self.provider.endpoint(),
            prompt_chars = prompt.chars().count(),
            "sending chat request"
        );
        let content = self
            .provider
            .generate(GenerateRequest { api_key, prompt })
            .await
            .inspect_err(|err| warn!(profile, error = %err, "chat request failed"))?;

        Ok(ChatReply {
            role: ChatRole::Assistant,
            content,
        })
    }

    /// One persisted turn: store the question, ask, store the reply.
    ///
    /// # Errors
    ///
    /// Propagates [`send_message`](Self::send_message) errors; the user
    /// message is already stored when that happens.
    pub async fn converse(&self, profile: &str, user_text: &str) -> Result<ChatReply, ChatError> {
        let session_id = self.store.session_id().await;
        self.store
            .append_message(&session_id, profile, ChatRole::User, user_text)
            .await;

        let reply = self.send_message(profile, user_text).await?;

        self.store
            .append_message(&session_id, profile, ChatRole::Assistant, &reply.content)
            .await;
        Ok(reply)
    }

    /// Conversation with `profile`: its welcome line, then stored messages.
    ///
    /// The welcome line is not persisted; it carries `seq` 0 and the epoch as
    /// its timestamp so it always sorts first.
    pub async fn history(&self, profile: &str) -> Vec<ChatMessage> {
        let session_id = self.store.session_id().await;

        let mut messages: Vec<ChatMessage> = self
            .store
            .chat_history(&session_id)
            .await
            .into_iter()
            .filter(|m| m.profile == profile)
            .collect();
        sort_messages(&mut messages);

        if let Some(text) = welcome_message(profile) {
            messages.insert(
                0,
                ChatMessage {
                    session_id,
                    profile: profile.to_owned(),
                    role: ChatRole::Assistant,
                    content: text.to_owned(),
                    created_at: DateTime::<Utc>::default(),
                    seq: 0,
                },
            );
        }
        messages
    }
}
