//! AES-256-GCM authenticated encryption
//!
//! Every call draws a fresh random 96-bit nonce, so nonce reuse under one key
//! cannot happen by construction. Blob layout:
//!
//! ```text
//! [nonce: 12B][ciphertext: N B][tag: 16B]
//! ```
//!
//! The text forms ([`SymmetricCipher::encrypt`] / [`SymmetricCipher::decrypt`])
//! carry the same bytes as standard base64.

use crate::error::{Result, SealError};
use crate::key::{fill_random, KEY_LENGTH, NONCE_LENGTH, TAG_LENGTH};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Smallest valid blob: an empty plaintext still carries nonce and tag
pub const MIN_BLOB_LENGTH: usize = NONCE_LENGTH + TAG_LENGTH;

/// AES-256-GCM cipher bound to a single 256-bit key
pub struct SymmetricCipher {
    cipher: Aes256Gcm,
}

impl SymmetricCipher {
    /// Create a cipher for `key`, which must be exactly 32 bytes
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.len() != KEY_LENGTH {
            return Err(SealError::InvalidKey {
                expected: KEY_LENGTH,
                got: key.len(),
            });
        }
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| SealError::InvalidKey {
            expected: KEY_LENGTH,
            got: key.len(),
        })?;
        Ok(Self { cipher })
    }

    /// Encrypt to the raw `nonce || ciphertext || tag` layout
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        fill_random(&mut nonce_bytes)?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        // Only fails for plaintexts beyond the GCM length limit
        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| SealError::Encryption("Plaintext too large for AES-GCM".to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    /// Authenticate and decrypt a raw `nonce || ciphertext || tag` blob
    pub fn open(&self, blob: &[u8]) -> Result<Vec<u8>> {
        if blob.len() < MIN_BLOB_LENGTH {
            return Err(SealError::Decode(format!(
                "Encrypted data too short: expected at least {} bytes, got {}",
                MIN_BLOB_LENGTH,
                blob.len()
            )));
        }

        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LENGTH);
        let nonce = Nonce::from_slice(nonce_bytes);

        self.cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| SealError::AuthenticationFailure)
    }

    /// Encrypt and return `base64(nonce || ciphertext || tag)`
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        self.seal(plaintext).map(|blob| BASE64.encode(blob))
    }

    /// Decode base64 text produced by [`SymmetricCipher::encrypt`] and decrypt it
    pub fn decrypt(&self, encoded: &str) -> Result<Vec<u8>> {
        let blob = BASE64
            .decode(encoded)
            .map_err(|e| SealError::Decode(format!("Invalid ciphertext encoding: {}", e)))?;
        self.open(&blob)
    }
}

/// One-shot encryption with a raw key slice
pub fn encrypt_with_raw_key(plaintext: &[u8], key: &[u8]) -> Result<String> {
    SymmetricCipher::new(key)?.encrypt(plaintext)
}

/// One-shot decryption with a raw key slice
pub fn decrypt_with_raw_key(encoded: &str, key: &[u8]) -> Result<Vec<u8>> {
    SymmetricCipher::new(key)?.decrypt(encoded)
}
