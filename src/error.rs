//! Error types for a3s-seal
//!
//! Messages carry lengths, indices and reasons only. Key bytes, secret text
//! and plaintext never appear in an error.

use thiserror::Error;

/// Errors that can occur while sealing, classifying, or recovering data
#[derive(Debug, Error)]
pub enum SealError {
    /// Encoded buffer is malformed or shorter than nonce + tag
    #[error("Decode error: {0}")]
    Decode(String),

    /// AEAD tag verification failed (wrong key or tampered ciphertext)
    #[error("Authentication failed: wrong key or tampered data")]
    AuthenticationFailure,

    /// Key material is not 256 bits
    #[error("Invalid key length: expected {expected} bytes, got {got}")]
    InvalidKey { expected: usize, got: usize },

    /// AEAD encryption could not be performed
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// The OS randomness source is unavailable
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// A sealed cell could not be decoded back into text
    #[error("Corrupt data at row {row}, column {column}: {reason}")]
    CorruptData {
        row: usize,
        column: usize,
        reason: String,
    },

    /// Wrapping or unwrapping a per-file key failed
    #[error("Key recovery failed: {0}")]
    KeyRecovery(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML deserialization failure
    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// IO failure while loading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for seal operations
pub type Result<T> = std::result::Result<T, SealError>;
