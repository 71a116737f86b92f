use super::{RowId, RowSink};
use crate::error::StorageError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRow {
    pub id: RowId,
    pub word: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRow {
    pub id: RowId,
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRow {
    pub indexword_id: RowId,
    pub urlinfo_id: RowId,
    pub frequency: u32,
}

/// In-memory tables with SQLite-style ids (1-based, insertion order).
///
/// Used for dry runs and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    pub words: Vec<WordRow>,
    pub urls: Vec<UrlRow>,
    pub stats: Vec<StatRow>,
    next_word: RowId,
    next_url: RowId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(&self, id: RowId) -> Option<&UrlRow> {
        self.urls.iter().find(|u| u.id == id)
    }

    pub fn word(&self, id: RowId) -> Option<&WordRow> {
        self.words.iter().find(|w| w.id == id)
    }
}

impl RowSink for MemoryStore {
    fn reset_schema(&mut self) -> Result<(), StorageError> {
        self.words.clear();
        self.urls.clear();
        self.stats.clear();
        self.next_word = 0;
        self.next_url = 0;
        Ok(())
    }

    fn insert_word(&mut self, word: &str) -> Result<RowId, StorageError> {
        self.next_word += 1;
        self.words.push(WordRow {
            id: self.next_word,
            word: word.to_string(),
        });
        Ok(self.next_word)
    }

    fn insert_url(&mut self, url: &str, name: &str) -> Result<RowId, StorageError> {
        self.next_url += 1;
        self.urls.push(UrlRow {
            id: self.next_url,
            url: url.to_string(),
            name: name.to_string(),
        });
        Ok(self.next_url)
    }

    fn insert_stat(
        &mut self,
        word_id: RowId,
        url_id: RowId,
        frequency: u32,
    ) -> Result<(), StorageError> {
        self.stats.push(StatRow {
            indexword_id: word_id,
            urlinfo_id: url_id,
            frequency,
        });
        Ok(())
    }
}
