//! Whole-file encryption
//!
//! Encrypts an entire byte buffer under its own key. The output is the raw
//! cipher layout with no further framing:
//!
//! ```text
//! [nonce: 12B][ciphertext: N B][tag: 16B]
//! ```

use crate::cipher::SymmetricCipher;
use crate::error::Result;
use crate::key::PerFileKey;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// An encrypted upload together with the key needed to read it back
#[derive(Debug, Clone)]
pub struct EncryptedFile {
    /// Name the file was uploaded under
    pub filename: String,

    /// `nonce || ciphertext || tag`
    pub data: Vec<u8>,

    /// Key the data was encrypted with
    pub key: PerFileKey,
}

impl EncryptedFile {
    /// Blob as base64 text, for carriers that cannot hold raw bytes
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }
}

/// Stateless whole-buffer encryptor
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeFileCipher;

impl WholeFileCipher {
    pub fn new() -> Self {
        Self
    }

    /// Encrypt `data`, generating a fresh key unless one is supplied
    ///
    /// The generated key is independent of any table-redaction key.
    pub fn encrypt_bytes(&self, data: &[u8], key: Option<&PerFileKey>) -> Result<(Vec<u8>, PerFileKey)> {
        let key = match key {
            Some(key) => key.clone(),
            None => PerFileKey::generate()?,
        };
        let blob = SymmetricCipher::new(key.as_bytes())?.seal(data)?;
        tracing::debug!(plaintext_len = data.len(), blob_len = blob.len(), "File encrypted");
        Ok((blob, key))
    }

    /// Authenticate and decrypt a blob produced by [`WholeFileCipher::encrypt_bytes`]
    pub fn decrypt_bytes(&self, blob: &[u8], key: &PerFileKey) -> Result<Vec<u8>> {
        let data = SymmetricCipher::new(key.as_bytes())?.open(blob)?;
        tracing::debug!(blob_len = blob.len(), plaintext_len = data.len(), "File decrypted");
        Ok(data)
    }

    /// Encrypt a named upload under a fresh key
    pub fn encrypt_file(&self, filename: impl Into<String>, data: &[u8]) -> Result<EncryptedFile> {
        let (data, key) = self.encrypt_bytes(data, None)?;
        Ok(EncryptedFile {
            filename: filename.into(),
            data,
            key,
        })
    }

    pub fn decrypt_file(&self, file: &EncryptedFile) -> Result<Vec<u8>> {
        self.decrypt_bytes(&file.data, &file.key)
    }
}
