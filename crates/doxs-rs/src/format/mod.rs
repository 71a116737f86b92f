//! On-disk index format: constants, record types and decoders.
//!
//! Layout (all integers big-endian, strings NUL-terminated):
//!
//! ```text
//! 0..4                 header (echoed, not validated)
//! 4..4+4*65536         bucket table: one u32 offset per bucket, 0 = empty
//! <bucket offset>      word list: {string, u32 stats offset}*, "" terminator
//! <stats offset>       stats block: u32 count, count * {u32 doc ptr, u32 freq}
//! <doc ptr>            url record: string name, string url
//! ```

use serde::Serialize;
use std::fmt;

/// Length of the leading header in bytes.
pub const HEADER_LEN: usize = 4;
/// Number of slots in the bucket table (256 * 256).
pub const BUCKET_COUNT: usize = 256 * 256;
/// Header carried by files written by the paired indexer.
pub const EXPECTED_HEADER: [u8; HEADER_LEN] = *b"DOXS";
/// Default bound on string length; matches the indexer's fixed 1 KiB buffer.
pub const DEFAULT_MAX_STRING_LEN: usize = 1024;

mod reader;
pub use reader::{IndexFile, IndexReader};

mod decode;
pub use decode::{read_bucket_table, read_stats_block, read_url_record, read_word_list};

/// Absolute byte offset into the index file, used as a pointer.
///
/// Never used for arithmetic: it is only seeked to and, for url records,
/// used as the dedup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FilePointer(u32);

impl FilePointer {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FilePointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// The bucket directory that follows the header.
pub struct BucketTable {
    slots: Box<[u32]>,
}

impl BucketTable {
    pub(crate) fn from_slots(slots: Vec<u32>) -> Self {
        debug_assert_eq!(slots.len(), BUCKET_COUNT);
        Self {
            slots: slots.into_boxed_slice(),
        }
    }

    /// Offset stored in `bucket`, or `None` for an empty slot.
    pub fn get(&self, bucket: usize) -> Option<FilePointer> {
        match self.slots.get(bucket) {
            Some(0) | None => None,
            Some(&off) => Some(FilePointer(off)),
        }
    }

    /// Non-empty buckets in ascending index order.
    pub fn non_empty(&self) -> impl Iterator<Item = (usize, FilePointer)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|&(_, &off)| off != 0)
            .map(|(i, &off)| (i, FilePointer(off)))
    }

    pub fn non_empty_count(&self) -> usize {
        self.slots.iter().filter(|&&off| off != 0).count()
    }
}

/// One entry of a bucket's word list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordRecord {
    pub text: String,
    pub stats_offset: FilePointer,
}

/// One (document, frequency) pair from a stats block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocStat {
    pub doc_pointer: FilePointer,
    pub frequency: u32,
}

impl DocStat {
    /// Flag bit packed into the low bit of `frequency`.
    pub fn flag(&self) -> bool {
        self.frequency & 1 == 1
    }
}

/// A url record as laid out in the file: `name` first, then `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlRecord {
    pub name: String,
    pub url: String,
}
