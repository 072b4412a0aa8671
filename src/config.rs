use std::path::Path;

use serde::Deserialize;

use crate::custodian::KeyCustodian;
use crate::error::{Result, SealError};
use crate::key::ServerSecret;

/// Environment variable that supplies the server secret
pub const SERVER_SECRET_ENV: &str = "A3S_SEAL_SERVER_SECRET";

/// Process-wide settings, loaded once at startup and immutable afterwards.
///
/// Only deserialized, never written back out: it holds the server secret.
#[derive(Debug, Clone, Deserialize)]
pub struct SealConfig {
    /// Secret used to wrap per-file keys for storage
    pub server_secret: ServerSecret,
}

impl SealConfig {
    pub fn new(server_secret: ServerSecret) -> Self {
        Self { server_secret }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SealError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Build configuration from `$A3S_SEAL_SERVER_SECRET`.
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var(SERVER_SECRET_ENV)
            .map_err(|_| SealError::Config(format!("{} is not set", SERVER_SECRET_ENV)))?;
        Ok(Self::new(ServerSecret::try_from(secret)?))
    }

    /// Use `$A3S_SEAL_SERVER_SECRET` if set, otherwise the file at `path`.
    pub fn load_or_env(path: impl AsRef<Path>) -> Result<Self> {
        if std::env::var_os(SERVER_SECRET_ENV).is_some() {
            tracing::debug!("Server secret taken from environment");
            return Self::from_env();
        }
        Self::load(path)
    }

    /// Key custodian bound to the configured secret.
    pub fn custodian(&self) -> Result<KeyCustodian> {
        KeyCustodian::new(&self.server_secret)
    }
}
