//! In-memory tabular data
//!
//! Row 0 is the header; rows 1.. are data rows. Cells are nullable text.
//! Rows may differ in length; nothing here enforces a rectangular shape.

use serde::{Deserialize, Serialize};

/// A single nullable text cell
pub type Cell = Option<String>;

/// An ordered sequence of cells
pub type Row = Vec<Cell>;

/// Row-major table, header first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build a table where every cell is present
    pub fn from_strings<R, C, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|cell| Some(cell.into())).collect())
                .collect(),
        }
    }

    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Data rows, excluding the header
    pub fn data_rows(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
