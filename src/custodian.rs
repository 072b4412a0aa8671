//! At-rest protection of per-file keys
//!
//! A per-file key is stored only in wrapped form: its base64 text encrypted
//! under the server-wide secret. Wrapping is keyed by that process-wide
//! secret, not by any per-user passphrase, so any holder of the server
//! configuration can unwrap any stored key.

use crate::cipher::SymmetricCipher;
use crate::error::{Result, SealError};
use crate::key::{PerFileKey, ServerSecret};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A per-file key encrypted under the server secret, safe to persist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WrappedKey(String);

impl WrappedKey {
    /// Rehydrate a value read back from storage
    pub fn new(stored: impl Into<String>) -> Self {
        Self(stored.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WrappedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wraps and unwraps per-file keys with the injected server secret
pub struct KeyCustodian {
    cipher: SymmetricCipher,
}

impl KeyCustodian {
    pub fn new(secret: &ServerSecret) -> Result<Self> {
        let cipher = SymmetricCipher::new(secret.key_bytes())
            .map_err(|e| SealError::KeyRecovery(e.to_string()))?;
        Ok(Self { cipher })
    }

    /// Encrypt the key's base64 text for storage
    pub fn wrap(&self, key: &PerFileKey) -> Result<WrappedKey> {
        let mut text = key.to_base64();
        let wrapped = self.cipher.encrypt(text.as_bytes());
        text.zeroize();
        wrapped
            .map(WrappedKey)
            .map_err(|e| SealError::KeyRecovery(format!("Failed to wrap key: {}", e)))
    }

    /// Recover a per-file key from its stored form
    ///
    /// A wrong server secret and a corrupted stored value are
    /// indistinguishable; both surface as [`SealError::KeyRecovery`].
    pub fn unwrap(&self, wrapped: &WrappedKey) -> Result<PerFileKey> {
        let mut text = self.cipher.decrypt(wrapped.as_str()).map_err(|e| {
            tracing::warn!(error = %e, "Stored key could not be unwrapped");
            SealError::KeyRecovery(
                "Failed to decrypt stored key: wrong server secret or corrupted value".to_string(),
            )
        })?;

        let key = std::str::from_utf8(&text)
            .map_err(|_| SealError::KeyRecovery("Stored key is not valid text".to_string()))
            .and_then(|encoded| {
                PerFileKey::from_base64(encoded)
                    .map_err(|e| SealError::KeyRecovery(format!("Stored key is malformed: {}", e)))
            });
        text.zeroize();
        key
    }
}

impl std::fmt::Debug for KeyCustodian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyCustodian").finish_non_exhaustive()
    }
}
