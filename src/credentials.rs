//! Credential loading from the runtime `.env` file.
//!
//! The config only names credentials; the values (backend key, one AI key per
//! persona) are read here and never logged.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::config::AiConfig;

/// Runtime credentials loaded from the `.env` file.
#[derive(Clone, Default)]
pub struct Credentials {
    vars: BTreeMap<String, String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("keys", &self.vars.keys().collect::<Vec<_>>())
            .field("values", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Build credentials from a key-value map.
    pub fn from_map(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }

    /// Returns a non-blank credential value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Returns a required credential or an error when missing.
    ///
    /// # Errors
    ///
    /// Returns an error when the key does not exist in loaded credentials.
    pub fn require(&self, key: &str) -> anyhow::Result<String> {
        self.get(key)
            .map(str::to_owned)
            .ok_or_else(|| anyhow::anyhow!("missing required credential: {key}"))
    }
}

/// Load credentials from a specific `.env` path.
///
/// # Errors
///
/// Returns an error if the file does not exist, permissions are too broad,
/// or parsing fails.
pub fn load_credentials(path: &Path) -> anyhow::Result<Credentials> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "credentials file does not exist: {}",
            path.display()
        ));
    }

    validate_private_permissions(path)?;

    let mut vars = BTreeMap::new();
    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("failed to read credentials at {}", path.display()))?;

    for item in iter {
        let (key, value) = item.with_context(|| {
            format!(
                "failed to parse key-value entry in credentials file {}",
                path.display()
            )
        })?;
        vars.insert(key, value);
    }

    Ok(Credentials { vars })
}

/// Load credentials if the file exists; a missing file yields empty
/// credentials so the tool still runs offline.
///
/// # Errors
///
/// Returns an error if the file exists but is unreadable or too permissive.
pub fn load_optional_credentials(path: &Path) -> anyhow::Result<Credentials> {
    if !path.exists() {
        debug!(path = %path.display(), "no credentials file, continuing without secrets");
        return Ok(Credentials::default());
    }
    load_credentials(path)
}

/// Set private (0600) permissions on a file when supported.
///
/// # Errors
///
/// Returns an error if permissions cannot be updated.
pub fn enforce_private_file_permissions(path: &Path) -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

#[cfg(unix)]
fn validate_private_permissions(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path)
        .with_context(|| format!("failed to inspect credentials file {}", path.display()))?;
    let mode = metadata.permissions().mode() & 0o777;

    if mode & 0o077 != 0 {
        return Err(anyhow::anyhow!(
            "credentials file {} must be 0600, found {:o}",
            path.display(),
            mode
        ));
    }

    Ok(())
}

#[cfg(not(unix))]
fn validate_private_permissions(_path: &Path) -> anyhow::Result<()> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Persona keys
// ---------------------------------------------------------------------------

/// Per-persona AI credentials with a fallback persona.
#[derive(Clone)]
pub struct PersonaKeys {
    keys: BTreeMap<String, String>,
    fallback: String,
}

impl std::fmt::Debug for PersonaKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonaKeys")
            .field("personas", &self.keys.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl PersonaKeys {
    /// Resolve every persona credential named in `ai` from `credentials`.
    ///
    /// Personas whose credential is absent are simply left out; they fall
    /// back to the default persona at lookup time.
    pub fn from_config(ai: &AiConfig, credentials: &Credentials) -> Self {
        let keys = ai
            .credentials
            .iter()
            .filter_map(|(persona, env_name)| {
                let value = credentials.get(env_name);
                if value.is_none() {
                    debug!(persona = %persona, credential = %env_name, "persona credential not set");
                }
                value.map(|v| (persona.clone(), v.to_owned()))
            })
            .collect();
        Self {
            keys,
            fallback: ai.default_persona.clone(),
        }
    }

    /// Build directly from persona → key pairs.
    pub fn new(keys: BTreeMap<String, String>, fallback: impl Into<String>) -> Self {
        Self {
            keys,
            fallback: fallback.into(),
        }
    }

    /// Key for `persona`, falling back to the default persona's key.
    pub fn resolve(&self, persona: &str) -> Option<&str> {
        self.keys
            .get(persona)
            .or_else(|| self.keys.get(&self.fallback))
            .map(String::as_str)
    }
}
