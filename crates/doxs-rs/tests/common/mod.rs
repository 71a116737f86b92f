//! Fixture builder for synthetic index files.
//!
//! Lays out records after the bucket table in the order they are added and
//! returns each record's absolute offset, so tests can wire pointers by hand.
#![allow(dead_code)]

use std::path::Path;

use doxs_rs::{RowId, RowSink, StorageError};

pub use tempfile;

pub const HEADER_LEN: usize = 4;
pub const BUCKET_COUNT: usize = 65536;

pub struct IndexFixture {
    buf: Vec<u8>,
}

impl IndexFixture {
    pub fn new() -> Self {
        Self::with_header(b"DOXS")
    }

    pub fn with_header(header: &[u8; 4]) -> Self {
        let mut buf = Vec::with_capacity(HEADER_LEN + 4 * BUCKET_COUNT + 1024);
        buf.extend_from_slice(header);
        buf.resize(HEADER_LEN + 4 * BUCKET_COUNT, 0);
        Self { buf }
    }

    /// Append a url record (`name` then `url`) and return its offset.
    pub fn url(&mut self, name: &str, url: &str) -> u32 {
        let off = self.buf.len() as u32;
        self.push_str(name);
        self.push_str(url);
        off
    }

    /// Append a stats block and return its offset.
    pub fn stats(&mut self, pairs: &[(u32, u32)]) -> u32 {
        let off = self.buf.len() as u32;
        self.push_u32(pairs.len() as u32);
        for &(doc, freq) in pairs {
            self.push_u32(doc);
            self.push_u32(freq);
        }
        off
    }

    /// Append a word list and point `bucket` at it.
    pub fn bucket(&mut self, bucket: usize, words: &[(&str, u32)]) -> u32 {
        let off = self.buf.len() as u32;
        for &(text, stats) in words {
            self.push_str(text);
            self.push_u32(stats);
        }
        self.buf.push(0);
        self.set_bucket(bucket, off);
        off
    }

    /// Overwrite a bucket table slot with an arbitrary value.
    pub fn set_bucket(&mut self, bucket: usize, off: u32) {
        let at = HEADER_LEN + 4 * bucket;
        self.buf[at..at + 4].copy_from_slice(&off.to_be_bytes());
    }

    pub fn raw(&mut self, bytes: &[u8]) -> u32 {
        let off = self.buf.len() as u32;
        self.buf.extend_from_slice(bytes);
        off
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.buf.clone()
    }

    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, &self.buf).expect("write index fixture");
    }

    fn push_str(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
    }

    fn push_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }
}

/// Scenario A from the format notes: one word, one url.
pub fn single_word_fixture() -> IndexFixture {
    let mut f = IndexFixture::with_header(b"IDX1");
    let y = f.url("Cats", "http://cats.example");
    let x = f.stats(&[(y, 3)]);
    f.bucket(42, &[("cat", x)]);
    f
}

/// Two words in different buckets sharing one document.
pub fn shared_doc_fixture() -> IndexFixture {
    let mut f = IndexFixture::new();
    let y = f.url("Cats", "http://cats.example");
    let x1 = f.stats(&[(y, 3)]);
    let x2 = f.stats(&[(y, 5)]);
    f.bucket(7, &[("cat", x1)]);
    f.bucket(900, &[("kitten", x2)]);
    f
}

/// Forwards to `inner` but rejects the `fail_at`-th `insert_stat` (1-based).
pub struct FailingSink<S> {
    pub inner: S,
    fail_at: usize,
    stats_seen: usize,
}

impl<S: RowSink> FailingSink<S> {
    pub fn new(inner: S, fail_at: usize) -> Self {
        Self {
            inner,
            fail_at,
            stats_seen: 0,
        }
    }
}

impl<S: RowSink> RowSink for FailingSink<S> {
    fn reset_schema(&mut self) -> Result<(), StorageError> {
        self.inner.reset_schema()
    }

    fn insert_word(&mut self, word: &str) -> Result<RowId, StorageError> {
        self.inner.insert_word(word)
    }

    fn insert_url(&mut self, url: &str, name: &str) -> Result<RowId, StorageError> {
        self.inner.insert_url(url, name)
    }

    fn insert_stat(
        &mut self,
        word_id: RowId,
        url_id: RowId,
        frequency: u32,
    ) -> Result<(), StorageError> {
        self.stats_seen += 1;
        if self.stats_seen == self.fail_at {
            return Err(StorageError::new("insert statsinfo", "disk full"));
        }
        self.inner.insert_stat(word_id, url_id, frequency)
    }
}

/// `shared_doc_fixture` plus a third word in a later bucket.
pub fn three_bucket_fixture() -> IndexFixture {
    let mut f = shared_doc_fixture();
    let u = f.url("Dogs", "http://dogs.example");
    let x = f.stats(&[(u, 2)]);
    f.bucket(950, &[("puppy", x)]);
    f
}
