//! Metadata records handed to the persistence layer
//!
//! A [`FileRecord`] is what gets stored next to an encrypted upload. It can
//! only ever hold the wrapped form of the per-file key. The raw key travels
//! back to the uploader once, inside an [`UploadReceipt`].
//!
//! All types use camelCase JSON serialization for wire compatibility.

use crate::classify::Classification;
use crate::custodian::{KeyCustodian, WrappedKey};
use crate::error::Result;
use crate::key::PerFileKey;
use crate::redact::ProcessedTable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix under which encrypted uploads are stored
pub const STORAGE_PREFIX: &str = "encrypted-files/";

/// Caller-supplied details about an upload
#[derive(Debug, Clone, Default)]
pub struct FileMetadata {
    pub filename: String,
    pub title: String,
    pub description: String,
    /// Size of the original upload in bytes
    pub file_size: u64,
}

/// Stored metadata for one encrypted upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub file_id: Uuid,

    /// Object-storage key of the encrypted content
    pub storage_key: String,

    pub filename: String,

    pub title: String,

    pub description: String,

    pub file_size: u64,

    /// Per-file key, wrapped under the server secret
    pub wrapped_key: WrappedKey,

    /// Term verdicts found while processing the table
    #[serde(default)]
    pub classification: Classification,

    pub uploaded_at: DateTime<Utc>,
}

impl FileRecord {
    /// Build the record for a processed table, wrapping its key
    pub fn new(
        processed: &ProcessedTable,
        custodian: &KeyCustodian,
        metadata: FileMetadata,
    ) -> Result<Self> {
        let file_id = Uuid::new_v4();
        let wrapped_key = custodian.wrap(&processed.key)?;

        Ok(Self {
            file_id,
            storage_key: storage_key(file_id, &metadata.filename),
            filename: metadata.filename,
            title: metadata.title,
            description: metadata.description,
            file_size: metadata.file_size,
            wrapped_key,
            classification: processed.classification.clone(),
            uploaded_at: Utc::now(),
        })
    }

    /// Unwrap the stored per-file key
    pub fn recover_key(&self, custodian: &KeyCustodian) -> Result<PerFileKey> {
        custodian.unwrap(&self.wrapped_key)
    }

    /// Original filename, recovered from the storage key
    pub fn original_filename(&self) -> &str {
        original_filename(&self.storage_key)
    }
}

/// Response returned to the uploader; the only place the raw key leaves the core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub file_id: Uuid,

    /// Base64 per-file key
    pub encryption_key: String,

    pub filename: String,
}

impl UploadReceipt {
    pub fn new(record: &FileRecord, key: &PerFileKey) -> Self {
        Self {
            file_id: record.file_id,
            encryption_key: key.to_base64(),
            filename: record.filename.clone(),
        }
    }
}

/// `encrypted-files/<uuid>_<filename>`
pub fn storage_key(file_id: Uuid, filename: &str) -> String {
    format!("{}{}_{}", STORAGE_PREFIX, file_id, filename)
}

/// Filename part of a storage key, without the `<uuid>_` prefix when present
pub fn original_filename(storage_key: &str) -> &str {
    let name = storage_key.rsplit('/').next().unwrap_or(storage_key);
    match name.split_once('_') {
        Some((id, rest)) if Uuid::parse_str(id).is_ok() => rest,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::ServerSecret;
    use crate::redact::TabularRedactor;
    use crate::table::Table;

    fn processed() -> ProcessedTable {
        let table = Table::from_strings([
            vec!["name", "drug"],
            vec!["Alice", "aspirin"],
            vec!["Bob", "fentanyl"],
        ]);
        TabularRedactor::new().process_table(&table).unwrap()
    }

    fn custodian() -> KeyCustodian {
        KeyCustodian::new(&ServerSecret::new("record-secret").unwrap()).unwrap()
    }

    fn metadata() -> FileMetadata {
        FileMetadata {
            filename: "trial_results.csv".to_string(),
            title: "Trial".to_string(),
            description: "Phase II".to_string(),
            file_size: 64,
        }
    }

    #[test]
    fn test_record_holds_wrapped_key_only() {
        let processed = processed();
        let record = FileRecord::new(&processed, &custodian(), metadata()).unwrap();

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains(&processed.key.to_base64()));
        assert_eq!(record.recover_key(&custodian()).unwrap(), processed.key);
    }

    #[test]
    fn test_record_camel_case_fields() {
        let record = FileRecord::new(&processed(), &custodian(), metadata()).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["fileId"].is_string());
        assert!(json["wrappedKey"].is_string());
        assert!(json["uploadedAt"].is_string());
        assert_eq!(json["fileSize"], 64);
        assert_eq!(json["classification"]["fentanyl"], true);
        assert_eq!(json["classification"]["aspirin"], false);
    }

    #[test]
    fn test_record_roundtrip_through_storage() {
        let record = FileRecord::new(&processed(), &custodian(), metadata()).unwrap();
        let stored = serde_json::to_string(&record).unwrap();
        let loaded: FileRecord = serde_json::from_str(&stored).unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_storage_key_and_original_filename() {
        let record = FileRecord::new(&processed(), &custodian(), metadata()).unwrap();
        assert!(record.storage_key.starts_with(STORAGE_PREFIX));
        assert!(record.storage_key.contains(&record.file_id.to_string()));
        assert_eq!(record.original_filename(), "trial_results.csv");
        assert_eq!(original_filename("plain.csv"), "plain.csv");
        assert_eq!(original_filename("not_a_uuid.csv"), "not_a_uuid.csv");
    }

    #[test]
    fn test_upload_receipt_carries_raw_key() {
        let processed = processed();
        let record = FileRecord::new(&processed, &custodian(), metadata()).unwrap();
        let receipt = UploadReceipt::new(&record, &processed.key);
        assert_eq!(receipt.file_id, record.file_id);
        assert_eq!(
            PerFileKey::from_base64(&receipt.encryption_key).unwrap(),
            processed.key
        );
        let json = serde_json::to_value(&receipt).unwrap();
        assert!(json["encryptionKey"].is_string());
    }
}
