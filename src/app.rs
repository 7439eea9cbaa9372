//! Process-wide context: store and chat dispatcher built once from config.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::chat::ChatDispatcher;
use crate::config::Config;
use crate::credentials::{Credentials, PersonaKeys};
use crate::providers::gemini::GeminiProvider;
use crate::store::{Backend, LocalCache, OfflineBackend, RestBackend, Store};

/// Everything a command needs.
#[derive(Debug)]
pub struct App {
    /// Shared persistence context.
    pub store: Arc<Store>,
    /// Persona chat dispatcher over the same store.
    pub dispatcher: ChatDispatcher,
}

/// Pick the remote backend for `config`.
///
/// No URL means offline. A URL without its API key credential is an error.
///
/// # Errors
///
/// Returns an error if the credential is missing or the URL is invalid.
pub fn build_backend(config: &Config, credentials: &Credentials) -> anyhow::Result<Arc<dyn Backend>> {
    match config.backend.url.as_deref() {
        None => {
            info!("no backend url configured, running offline");
            Ok(Arc::new(OfflineBackend))
        }
        Some(url) => {
            let api_key = credentials
                .require(&config.backend.api_key_env)
                .context("backend url is set but its API key is missing")?;
            let backend = RestBackend::new(url, api_key)
                .with_context(|| format!("invalid backend url {url}"))?;
            info!(url, "using remote backend");
            Ok(Arc::new(backend))
        }
    }
}

impl App {
    /// Open the cache and wire the store, provider and dispatcher.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be configured or the cache
    /// database cannot be opened.
    pub async fn open(config: &Config, credentials: &Credentials) -> anyhow::Result<Self> {
        let backend = build_backend(config, credentials)?;
        let cache = LocalCache::open(&config.paths.cache_db)
            .await
            .with_context(|| {
                format!("failed to open cache at {}", config.paths.cache_db.display())
            })?;
        Ok(Self::with_parts(config, credentials, backend, cache))
    }

    /// Wire an app from already-built parts.
    pub fn with_parts(
        config: &Config,
        credentials: &Credentials,
        backend: Arc<dyn Backend>,
        cache: LocalCache,
    ) -> Self {
        let store = Arc::new(Store::new(backend, cache));
        let provider = Arc::new(GeminiProvider::new(config.ai.api_url.clone()));
        let keys = PersonaKeys::from_config(&config.ai, credentials);
        let dispatcher = ChatDispatcher::new(Arc::clone(&store), provider, keys);
        Self { store, dispatcher }
    }
}
