//! Configuration loading and validation.
//!
//! bizprofile reads a single human-owned `config.toml`. Secrets never live in
//! it: the file names the environment variables (resolved through the `.env`
//! credentials file) that hold the backend key and the per-persona AI keys.
//!
//! Precedence: env vars > config file > defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Env var that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "BIZPROFILE_CONFIG_PATH";

/// Default generative-AI endpoint.
pub const DEFAULT_AI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hosted backend settings.
    pub backend: BackendConfig,
    /// Generative-AI endpoint and persona credentials.
    pub ai: AiConfig,
    /// Filesystem locations; relative entries resolve against the runtime root.
    pub paths: PathsConfig,
}

/// Hosted REST backend configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend (e.g. `https://project.supabase.co`).
    /// `None` runs fully offline on the local cache.
    pub url: Option<String>,
    /// Name of the credential holding the backend API key.
    pub api_key_env: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key_env: "BIZPROFILE_BACKEND_KEY".to_owned(),
        }
    }
}

/// Generative-AI endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Full `generateContent` URL; the credential is appended as `?key=`.
    pub api_url: String,
    /// Persona whose credential is used when a persona has none of its own.
    pub default_persona: String,
    /// Persona id → name of the credential holding its API key.
    pub credentials: BTreeMap<String, String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        let credentials = ["sales", "finance", "hr", "strategy", "business"]
            .into_iter()
            .map(|persona| {
                (
                    persona.to_owned(),
                    format!("BIZPROFILE_{}_API_KEY", persona.to_ascii_uppercase()),
                )
            })
            .collect();
        Self {
            api_url: DEFAULT_AI_URL.to_owned(),
            default_persona: "business".to_owned(),
            credentials,
        }
    }
}

/// Filesystem paths for persistent state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// SQLite file backing the local fallback cache.
    pub cache_db: PathBuf,
    /// Directory for rotated JSON logs.
    pub logs_dir: PathBuf,
    /// Credentials file (`KEY=value` lines, mode 0600).
    pub env_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            cache_db: PathBuf::from("cache.db"),
            logs_dir: PathBuf::from("logs"),
            env_file: PathBuf::from(".env"),
        }
    }
}

impl Config {
    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str(toml_str).context("failed to parse config TOML")
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function so tests never touch the process environment.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("BIZPROFILE_BACKEND_URL") {
            self.backend.url = if v.trim().is_empty() { None } else { Some(v) };
        }
        if let Some(v) = env("BIZPROFILE_AI_URL") {
            self.ai.api_url = v;
        }
        if let Some(v) = env("BIZPROFILE_CACHE_DB") {
            self.paths.cache_db = PathBuf::from(v);
        }
    }

    /// Resolve relative paths against `root`.
    pub fn resolve_paths(&mut self, root: &Path) {
        for path in [
            &mut self.paths.cache_db,
            &mut self.paths.logs_dir,
            &mut self.paths.env_file,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
    }
}

/// Load config from a TOML file. A missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            tracing::info!(path = %path.display(), "loading config from file");
            Config::from_toml(&contents)
                .with_context(|| format!("failed to parse config at {}", path.display()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(anyhow::anyhow!(
            "failed to read config at {}: {e}",
            path.display()
        )),
    }
}

/// Load the effective config: explicit path, `$BIZPROFILE_CONFIG_PATH`, or
/// `~/.bizprofile/config.toml`, then env overrides and path resolution.
///
/// # Errors
///
/// Returns an error if the home directory is unknown or the file is invalid.
pub fn load_effective_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    load_effective_config_with(explicit, |key| std::env::var(key).ok())
}

/// [`load_effective_config`] with a custom env resolver.
///
/// # Errors
///
/// Returns an error if the home directory is unknown or the file is invalid.
pub fn load_effective_config_with(
    explicit: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Config> {
    let root = config_dir()?;
    let path = match (explicit, env(CONFIG_PATH_ENV)) {
        (Some(p), _) => p.to_path_buf(),
        (None, Some(p)) => PathBuf::from(p),
        (None, None) => root.join("config.toml"),
    };
    let mut config = load_config(&path)?;
    config.apply_overrides(&env);
    config.resolve_paths(&root);
    Ok(config)
}

/// Resolve the runtime root directory (`~/.bizprofile/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".bizprofile"))
}
