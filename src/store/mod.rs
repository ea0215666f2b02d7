//! Persistence of the row table.
//!
//! A store only moves finished rows; it never derives them. A missing or empty
//! table loads as an empty history.

pub mod csv_store;

pub use csv_store::CsvStore;

use crate::pipeline::row::Row;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store: i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store: csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub trait SeriesStore {
    fn load(&self) -> Result<Vec<Row>, StoreError>;
    /// Appends rows after the stored history and returns the new length.
    fn append(&mut self, rows: &[Row]) -> Result<usize, StoreError>;
    /// Replaces the whole stored history.
    fn save(&mut self, rows: &[Row]) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Vec<Row>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

impl SeriesStore for MemoryStore {
    fn load(&self) -> Result<Vec<Row>, StoreError> {
        Ok(self.rows.clone())
    }

    fn append(&mut self, rows: &[Row]) -> Result<usize, StoreError> {
        self.rows.extend_from_slice(rows);
        Ok(self.rows.len())
    }

    fn save(&mut self, rows: &[Row]) -> Result<(), StoreError> {
        self.rows = rows.to_vec();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.rows.clear();
        Ok(())
    }
}
