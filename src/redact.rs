//! Selective row encryption for tables
//!
//! Every data row is classified cell by cell. A row with at least one
//! sensitive term has *all* of its present cells sealed under the per-file
//! key; other rows pass through untouched. The header row is never
//! classified and never sealed.
//! Rows holding plain text that already has the sealed form are sealed too,
//! so that every processed table can be reconstructed.
//!
//! Sealed cell format:
//!
//! ```text
//! ENC_ROW[<base64(nonce || ciphertext || tag)>]
//! ```

use crate::cipher::SymmetricCipher;
use crate::classify::{self, Classification};
use crate::error::{Result, SealError};
use crate::key::PerFileKey;
use crate::table::{Row, Table};

/// Marker opening a sealed cell
pub const SEALED_PREFIX: &str = "ENC_ROW[";

/// Marker closing a sealed cell
pub const SEALED_SUFFIX: &str = "]";

/// Wrap already-encrypted text in the sealed-cell markers
fn wrap_sealed(encoded: &str) -> String {
    let mut cell = String::with_capacity(SEALED_PREFIX.len() + encoded.len() + SEALED_SUFFIX.len());
    cell.push_str(SEALED_PREFIX);
    cell.push_str(encoded);
    cell.push_str(SEALED_SUFFIX);
    cell
}

/// Encrypt a cell value and wrap it as `ENC_ROW[...]`
pub fn seal_cell(text: &str, cipher: &SymmetricCipher) -> Result<String> {
    cipher.encrypt(text.as_bytes()).map(|encoded| wrap_sealed(&encoded))
}

/// The encoded payload of a sealed cell, or `None` for plain text
///
/// A cell only counts as sealed when it has both the prefix and the suffix.
pub fn sealed_payload(cell: &str) -> Option<&str> {
    cell.strip_prefix(SEALED_PREFIX)?.strip_suffix(SEALED_SUFFIX)
}

/// Source of per-cell sensitivity verdicts
///
/// The default implementation is the fixed drug vocabulary; a richer model
/// can be plugged in without changing the redactor.
pub trait SensitivityClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Classification;
}

/// Fixed-vocabulary substring classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct VocabularyClassifier;

impl SensitivityClassifier for VocabularyClassifier {
    fn classify(&self, text: &str) -> Classification {
        classify::classify(text)
    }
}

/// Output of [`TabularRedactor::process_table`]
#[derive(Debug, Clone)]
pub struct ProcessedTable {
    /// Input table with sensitive rows sealed
    pub table: Table,

    /// The key every sealed cell was encrypted under
    pub key: PerFileKey,

    /// First verdict seen for every vocabulary term found in the data rows
    pub classification: Classification,

    /// Indices (into the full table, header = 0) of the rows that were sealed
    pub sensitive_rows: Vec<usize>,
}

/// Classifies table rows and seals the sensitive ones
#[derive(Debug, Clone, Default)]
pub struct TabularRedactor<C = VocabularyClassifier> {
    classifier: C,
}

impl TabularRedactor<VocabularyClassifier> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: SensitivityClassifier> TabularRedactor<C> {
    /// Use a custom classifier
    pub fn with_classifier(classifier: C) -> Self {
        Self { classifier }
    }

    /// Seal every sensitive row under a freshly generated per-file key
    pub fn process_table(&self, table: &Table) -> Result<ProcessedTable> {
        let key = PerFileKey::generate()?;
        self.process_table_with_key(table, key)
    }

    /// Seal every sensitive row under a caller-supplied key
    pub fn process_table_with_key(&self, table: &Table, key: PerFileKey) -> Result<ProcessedTable> {
        let cipher = SymmetricCipher::new(key.as_bytes())?;
        let mut classification = Classification::new();
        let mut sensitive_rows = Vec::new();
        let mut output = Table::default();

        if let Some(header) = table.header() {
            output.push(header.clone());
        }

        for (offset, row) in table.data_rows().iter().enumerate() {
            let row_index = offset + 1;
            let sensitive = self.classify_row(row, &mut classification);
            // Plain text that already looks sealed must be sealed too, or
            // reconstruction would try to open it
            if sensitive || row_has_sealed_marker(row) {
                output.push(seal_row(row, &cipher)?);
                sensitive_rows.push(row_index);
            } else {
                output.push(row.clone());
            }
        }

        tracing::debug!(
            rows = table.data_rows().len(),
            sensitive_rows = sensitive_rows.len(),
            terms = classification.len(),
            "Table processed"
        );

        Ok(ProcessedTable {
            table: output,
            key,
            classification,
            sensitive_rows,
        })
    }

    /// Decrypt every sealed cell in the data rows
    ///
    /// All or nothing: the first cell that fails to decrypt aborts the whole
    /// reconstruction and no partial table is returned.
    pub fn reconstruct_table(&self, table: &Table, key: &PerFileKey) -> Result<Table> {
        let cipher = SymmetricCipher::new(key.as_bytes())?;
        let mut output = Table::default();

        if let Some(header) = table.header() {
            output.push(header.clone());
        }

        let mut opened = 0usize;
        for (offset, row) in table.data_rows().iter().enumerate() {
            let row_index = offset + 1;
            let mut restored = Vec::with_capacity(row.len());
            for (column, cell) in row.iter().enumerate() {
                let payload = cell.as_deref().and_then(sealed_payload);
                match payload {
                    Some(encoded) => {
                        restored.push(Some(open_cell(encoded, &cipher, row_index, column)?));
                        opened += 1;
                    }
                    None => restored.push(cell.clone()),
                }
            }
            output.push(restored);
        }

        tracing::debug!(
            rows = table.data_rows().len(),
            cells_opened = opened,
            "Table reconstructed"
        );

        Ok(output)
    }

    /// Classify every non-blank cell, merging verdicts; true if any is sensitive
    fn classify_row(&self, row: &Row, classification: &mut Classification) -> bool {
        let mut sensitive = false;
        for text in row.iter().flatten() {
            if text.trim().is_empty() {
                continue;
            }
            let verdicts = self.classifier.classify(text);
            sensitive |= verdicts.is_sensitive();
            classification.merge(verdicts);
        }
        sensitive
    }
}

fn row_has_sealed_marker(row: &Row) -> bool {
    row.iter()
        .flatten()
        .any(|text| sealed_payload(text).is_some())
}

fn seal_row(row: &Row, cipher: &SymmetricCipher) -> Result<Row> {
    row.iter()
        .map(|cell| match cell {
            Some(text) => seal_cell(text, cipher).map(Some),
            None => Ok(None),
        })
        .collect()
}

fn open_cell(encoded: &str, cipher: &SymmetricCipher, row: usize, column: usize) -> Result<String> {
    let plaintext = cipher.decrypt(encoded).map_err(|err| match err {
        SealError::Decode(reason) => SealError::CorruptData {
            row,
            column,
            reason,
        },
        other => {
            tracing::warn!(row, column, "Sealed cell failed authentication");
            other
        }
    })?;

    String::from_utf8(plaintext).map_err(|_| SealError::CorruptData {
        row,
        column,
        reason: "Decrypted cell is not valid UTF-8".to_string(),
    })
}
