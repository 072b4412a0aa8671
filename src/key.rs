//! Key material: per-file keys and the server-wide wrapping secret
//!
//! A [`PerFileKey`] is generated once per table or file operation and is
//! carried externally as base64 text. A [`ServerSecret`] is loaded once at
//! startup and only ever used to wrap per-file keys for storage.

use crate::error::{Result, SealError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES key length in bytes (256 bits)
pub const KEY_LENGTH: usize = 32;

/// AES-GCM nonce length in bytes (96 bits)
pub const NONCE_LENGTH: usize = 12;

/// AES-GCM tag length in bytes (128 bits)
pub const TAG_LENGTH: usize = 16;

const SECRET_SALT: &[u8] = b"a3s-seal/server-secret/v1";
const SECRET_INFO: &[u8] = b"a3s-seal key custodian";

/// Fill `buf` from the OS CSPRNG.
pub(crate) fn fill_random(buf: &mut [u8]) -> Result<()> {
    getrandom::getrandom(buf).map_err(|e| SealError::KeyGeneration(e.to_string()))
}

/// A 256-bit symmetric key used for every encryption within one operation
///
/// Immutable once created. The bytes are zeroized on drop and never shown
/// by `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PerFileKey {
    bytes: [u8; KEY_LENGTH],
}

impl PerFileKey {
    /// Generate a fresh random key
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; KEY_LENGTH];
        fill_random(&mut bytes)?;
        Ok(Self { bytes })
    }

    /// Build a key from raw bytes, which must be exactly 32 bytes long
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; KEY_LENGTH] = bytes.try_into().map_err(|_| SealError::InvalidKey {
            expected: KEY_LENGTH,
            got: bytes.len(),
        })?;
        Ok(Self { bytes })
    }

    /// Parse the external base64 representation
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let mut raw = BASE64
            .decode(encoded.trim())
            .map_err(|e| SealError::Decode(format!("Invalid key encoding: {}", e)))?;
        let key = Self::from_bytes(&raw);
        raw.zeroize();
        key
    }

    /// External representation: base64 of the 32 raw bytes
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.bytes
    }
}

impl std::fmt::Debug for PerFileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PerFileKey([REDACTED])")
    }
}

/// Process-wide secret used by the key custodian
///
/// Text that is base64 of exactly 32 bytes is used as the AES key as-is.
/// Any other non-empty text is stretched to 32 bytes with HKDF-SHA256.
#[derive(Clone, Zeroize, ZeroizeOnDrop, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct ServerSecret {
    key: [u8; KEY_LENGTH],
}

impl ServerSecret {
    /// Derive the wrapping key from configured secret text
    pub fn new(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(SealError::Config("Server secret must not be empty".to_string()));
        }

        if let Ok(mut raw) = BASE64.decode(secret) {
            if raw.len() == KEY_LENGTH {
                let mut key = [0u8; KEY_LENGTH];
                key.copy_from_slice(&raw);
                raw.zeroize();
                return Ok(Self { key });
            }
            raw.zeroize();
        }

        let hk = Hkdf::<Sha256>::new(Some(SECRET_SALT), secret.as_bytes());
        let mut key = [0u8; KEY_LENGTH];
        hk.expand(SECRET_INFO, &mut key)
            .map_err(|e| SealError::Config(format!("Server secret derivation failed: {}", e)))?;
        Ok(Self { key })
    }

    pub(crate) fn key_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl TryFrom<String> for ServerSecret {
    type Error = SealError;

    fn try_from(mut value: String) -> Result<Self> {
        let secret = Self::new(&value);
        value.zeroize();
        secret
    }
}

impl std::fmt::Debug for ServerSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ServerSecret([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_32_bytes_and_unique() {
        let a = PerFileKey::generate().unwrap();
        let b = PerFileKey::generate().unwrap();
        assert_eq!(a.as_bytes().len(), KEY_LENGTH);
        assert_ne!(a, b);
    }

    #[test]
    fn test_base64_roundtrip() {
        let key = PerFileKey::generate().unwrap();
        let encoded = key.to_base64();
        assert_eq!(BASE64.decode(&encoded).unwrap().len(), 32);
        assert_eq!(PerFileKey::from_base64(&encoded).unwrap(), key);
    }

    #[test]
    fn test_from_base64_rejects_short_key() {
        let encoded = BASE64.encode([7u8; 16]);
        let err = PerFileKey::from_base64(&encoded).unwrap_err();
        assert!(matches!(
            err,
            SealError::InvalidKey {
                expected: 32,
                got: 16
            }
        ));
    }

    #[test]
    fn test_from_base64_rejects_garbage() {
        let err = PerFileKey::from_base64("not base64!!").unwrap_err();
        assert!(matches!(err, SealError::Decode(_)));
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = PerFileKey::from_bytes(&[0xAB; 32]).unwrap();
        let shown = format!("{:?}", key);
        assert_eq!(shown, "PerFileKey([REDACTED])");
        assert!(!shown.contains(&key.to_base64()));

        let secret = ServerSecret::new("hunter2").unwrap();
        assert_eq!(format!("{:?}", secret), "ServerSecret([REDACTED])");
    }

    #[test]
    fn test_server_secret_raw_base64_key_used_directly() {
        let raw = [0x42u8; 32];
        let secret = ServerSecret::new(&BASE64.encode(raw)).unwrap();
        assert_eq!(secret.key_bytes(), &raw);
    }

    #[test]
    fn test_server_secret_passphrase_is_derived() {
        let a = ServerSecret::new("pharma-research-secret").unwrap();
        let b = ServerSecret::new("pharma-research-secret").unwrap();
        let c = ServerSecret::new("another-secret").unwrap();
        assert_eq!(a.key_bytes(), b.key_bytes());
        assert_ne!(a.key_bytes(), c.key_bytes());
    }

    #[test]
    fn test_server_secret_empty_rejected() {
        assert!(matches!(
            ServerSecret::new("").unwrap_err(),
            SealError::Config(_)
        ));
    }
}
