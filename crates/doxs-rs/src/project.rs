// Copyright 2025 HyperZoekt Project
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Projection of a decoded index into `indexword` / `urlinfo` / `statsinfo`
//! rows.

use log::{debug, info, warn};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::ConvertConfig;
use crate::error::{ConvertError, Stage};
use crate::format::{
    read_bucket_table, read_stats_block, read_url_record, read_word_list, FilePointer, IndexFile,
    IndexReader, DEFAULT_MAX_STRING_LEN, EXPECTED_HEADER, HEADER_LEN,
};
use crate::store::{RowId, RowSink};

/// Counters reported at the end of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    pub header: [u8; HEADER_LEN],
    pub buckets_visited: usize,
    pub words: u64,
    pub urls: u64,
    pub stats: u64,
    /// Reader position after the last record decoded.
    pub end_position: u64,
}

impl ConvertSummary {
    fn new(header: [u8; HEADER_LEN]) -> Self {
        Self {
            header,
            buckets_visited: 0,
            words: 0,
            urls: 0,
            stats: 0,
            end_position: 0,
        }
    }

    pub fn header_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.header)
    }
}

/// Single-pass projector. Owns the doc pointer -> url row id map, so one
/// `Projector` is exactly one run; `run` consumes it.
pub struct Projector {
    max_string_len: usize,
    progress_every: usize,
    cancel: Option<Arc<AtomicBool>>,
    urls_by_doc: HashMap<FilePointer, RowId>,
}

impl Default for Projector {
    fn default() -> Self {
        Self::new()
    }
}

impl Projector {
    pub fn new() -> Self {
        Self {
            max_string_len: DEFAULT_MAX_STRING_LEN,
            progress_every: 0,
            cancel: None,
            urls_by_doc: HashMap::new(),
        }
    }

    pub fn from_config(cfg: &ConvertConfig) -> Self {
        Self::new()
            .max_string_len(cfg.max_string_len)
            .progress_every(cfg.progress_every)
    }

    pub fn max_string_len(mut self, n: usize) -> Self {
        self.max_string_len = n.max(1);
        self
    }

    /// Log progress every `n` non-empty buckets (0 disables).
    pub fn progress_every(mut self, n: usize) -> Self {
        self.progress_every = n;
        self
    }

    /// Abort with `ConvertError::Cancelled` once `flag` is set. Checked
    /// before each non-empty bucket.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|f| f.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    /// Decode the whole file and emit rows to `sink`.
    ///
    /// Buckets are visited in ascending index order, words in list order
    /// and doc stats in block order, so ids assigned by an insertion-ordered
    /// store are reproducible. The first error aborts the run.
    pub fn run<S: RowSink + ?Sized>(
        mut self,
        file: &IndexFile,
        sink: &mut S,
    ) -> Result<ConvertSummary, ConvertError> {
        let mut r = file.reader();
        let header = r
            .read_header()
            .map_err(ConvertError::decode(Stage::Header))?;
        let mut summary = ConvertSummary::new(header);
        info!("file header: [{}]", summary.header_str());
        if header != EXPECTED_HEADER {
            warn!(
                "unexpected header {:?}; decoding anyway",
                summary.header_str()
            );
        }

        let table =
            read_bucket_table(&mut r).map_err(ConvertError::decode(Stage::BucketTable))?;
        let total = table.non_empty_count();
        info!("bucket table: {} non-empty buckets", total);

        for (bucket, at) in table.non_empty() {
            if self.cancelled() {
                warn!("cancelled before bucket {}", bucket);
                return Err(ConvertError::Cancelled { bucket });
            }
            self.project_bucket(&mut r, bucket, at, sink, &mut summary)?;
            summary.buckets_visited += 1;
            if self.progress_every > 0 && summary.buckets_visited % self.progress_every == 0 {
                info!(
                    "progress: {}/{} buckets, {} words, {} urls, {} stats",
                    summary.buckets_visited, total, summary.words, summary.urls, summary.stats
                );
            }
        }

        summary.end_position = r.position();
        debug!("final reader position {}", summary.end_position);
        info!(
            "done: {} buckets, {} words, {} urls, {} stats",
            summary.buckets_visited, summary.words, summary.urls, summary.stats
        );
        Ok(summary)
    }

    fn project_bucket<S: RowSink + ?Sized>(
        &mut self,
        r: &mut IndexReader<'_>,
        bucket: usize,
        at: FilePointer,
        sink: &mut S,
        summary: &mut ConvertSummary,
    ) -> Result<(), ConvertError> {
        // collect the list first: stats and url reads move the cursor
        let words = read_word_list(r, at, self.max_string_len)
            .map_err(ConvertError::decode(Stage::WordList { bucket, at }))?;
        debug!("bucket {} @ {}: {} entries", bucket, at, words.len());

        for word in words {
            let word_id = sink.insert_word(&word.text)?;
            summary.words += 1;
            let stats = read_stats_block(r, word.stats_offset).map_err(ConvertError::decode(
                Stage::StatsBlock {
                    word_id,
                    at: word.stats_offset,
                },
            ))?;
            debug!(
                "  word {:?} (row {}) stats @ {}: {} docs",
                word.text,
                word_id,
                word.stats_offset,
                stats.len()
            );

            for stat in stats {
                let url_id = self.resolve_url(r, stat.doc_pointer, sink, summary)?;
                sink.insert_stat(word_id, url_id, stat.frequency)?;
                summary.stats += 1;
            }
        }
        Ok(())
    }

    /// Row id for the url record at `doc`, decoding and inserting it on
    /// first sight only.
    fn resolve_url<S: RowSink + ?Sized>(
        &mut self,
        r: &mut IndexReader<'_>,
        doc: FilePointer,
        sink: &mut S,
        summary: &mut ConvertSummary,
    ) -> Result<RowId, ConvertError> {
        if let Some(&id) = self.urls_by_doc.get(&doc) {
            return Ok(id);
        }
        let rec = read_url_record(r, doc, self.max_string_len)
            .map_err(ConvertError::decode(Stage::UrlRecord { at: doc }))?;
        let id = sink.insert_url(&rec.url, &rec.name)?;
        self.urls_by_doc.insert(doc, id);
        summary.urls += 1;
        debug!("    url @ {} -> row {}: {} ({})", doc, id, rec.url, rec.name);
        Ok(id)
    }
}
