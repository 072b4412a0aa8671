//! # a3s-seal
//!
//! Selective row encryption, sensitivity classification, and key custody
//! for tabular data.
//!
//! ## Overview
//!
//! `a3s-seal` takes a table of text cells, finds the rows that mention a
//! sensitive term from a fixed vocabulary, and seals only those rows with
//! AES-256-GCM. The rest of the table stays readable. Whole files can be
//! sealed as a single blob, and per-file keys are wrapped under a
//! server-wide secret before they are stored.
//!
//! ## Quick Start
//!
//! ```rust
//! use a3s_seal::{KeyCustodian, ServerSecret, TabularRedactor, Table};
//!
//! # fn example() -> a3s_seal::Result<()> {
//! let table = Table::from_strings([
//!     vec!["name", "drug"],
//!     vec!["Alice", "aspirin"],
//!     vec!["Bob", "fentanyl"],
//! ]);
//!
//! let redactor = TabularRedactor::new();
//! let processed = redactor.process_table(&table)?;
//! assert_eq!(processed.classification.get("fentanyl"), Some(true));
//!
//! // Only the wrapped key goes to storage
//! let custodian = KeyCustodian::new(&ServerSecret::new("server-secret")?)?;
//! let wrapped = custodian.wrap(&processed.key)?;
//!
//! let key = custodian.unwrap(&wrapped)?;
//! let restored = redactor.reconstruct_table(&processed.table, &key)?;
//! assert_eq!(restored, table);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Architecture
//!
//! - **SymmetricCipher** — AES-256-GCM with a fresh random nonce per call
//! - **classify** — pure fixed-vocabulary substring classifier
//! - **TabularRedactor** — per-row classification and selective sealing
//! - **WholeFileCipher** — whole-buffer encryption under its own key
//! - **KeyCustodian** — at-rest wrapping of per-file keys

pub mod blob;
pub mod cipher;
pub mod classify;
pub mod config;
pub mod custodian;
pub mod error;
pub mod key;
pub mod record;
pub mod redact;
pub mod table;

// Re-export core types
pub use blob::{EncryptedFile, WholeFileCipher};
pub use cipher::SymmetricCipher;
pub use classify::{classify, Classification, NON_SENSITIVE_TERMS, SENSITIVE_TERMS};
pub use config::SealConfig;
pub use custodian::{KeyCustodian, WrappedKey};
pub use error::{Result, SealError};
pub use key::{PerFileKey, ServerSecret};
pub use record::{FileMetadata, FileRecord, UploadReceipt};
pub use redact::{
    seal_cell, sealed_payload, ProcessedTable, SensitivityClassifier, TabularRedactor,
    VocabularyClassifier,
};
pub use table::{Cell, Row, Table};
