//! Storage side of a conversion: the row-insertion service the projector
//! writes to, and the two stores that implement it.

mod memory;
mod sqlite;

pub use memory::{MemoryStore, StatRow, UrlRow, WordRow};
pub use sqlite::{SqliteSink, SCHEMA};

use crate::error::StorageError;

/// Auto-increment identifier assigned by the store.
pub type RowId = i64;

/// Row-insertion service for the three output tables.
///
/// Inserts that create a keyed row return the ID the store assigned to it;
/// the projector uses it immediately as a foreign key.
pub trait RowSink {
    /// Drop and recreate `indexword`, `urlinfo` and `statsinfo`.
    fn reset_schema(&mut self) -> Result<(), StorageError>;

    fn insert_word(&mut self, word: &str) -> Result<RowId, StorageError>;

    fn insert_url(&mut self, url: &str, name: &str) -> Result<RowId, StorageError>;

    fn insert_stat(
        &mut self,
        word_id: RowId,
        url_id: RowId,
        frequency: u32,
    ) -> Result<(), StorageError>;
}
