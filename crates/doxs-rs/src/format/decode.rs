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

use super::{
    BucketTable, DocStat, FilePointer, IndexReader, UrlRecord, WordRecord, BUCKET_COUNT,
    HEADER_LEN,
};
use crate::error::DecodeError;

/// Read the bucket directory that follows the header.
pub fn read_bucket_table(r: &mut IndexReader<'_>) -> Result<BucketTable, DecodeError> {
    r.seek_absolute(HEADER_LEN as u64)?;
    let mut slots = Vec::with_capacity(BUCKET_COUNT);
    for _ in 0..BUCKET_COUNT {
        slots.push(r.read_u32_be()?);
    }
    Ok(BucketTable::from_slots(slots))
}

/// Decode the word list stored at a bucket offset, in file order.
///
/// The list has no length prefix; it ends at the first empty string.
pub fn read_word_list(
    r: &mut IndexReader<'_>,
    at: FilePointer,
    max_string_len: usize,
) -> Result<Vec<WordRecord>, DecodeError> {
    r.seek_to(at)?;
    let mut out = Vec::new();
    loop {
        let text = r.read_cstring(max_string_len)?;
        if text.is_empty() {
            break;
        }
        let stats_offset = r.read_pointer()?;
        out.push(WordRecord { text, stats_offset });
    }
    Ok(out)
}

/// Decode a count-prefixed stats block.
pub fn read_stats_block(
    r: &mut IndexReader<'_>,
    at: FilePointer,
) -> Result<Vec<DocStat>, DecodeError> {
    r.seek_to(at)?;
    let count = r.read_u32_be()? as usize;
    // a corrupt count must not drive the allocation; pairs are 8 bytes each
    let mut out = Vec::with_capacity(count.min(r.remaining() / 8));
    for _ in 0..count {
        let doc_pointer = r.read_pointer()?;
        let frequency = r.read_u32_be()?;
        out.push(DocStat {
            doc_pointer,
            frequency,
        });
    }
    Ok(out)
}

/// Decode the url record at `at`. The file stores `name` before `url`.
pub fn read_url_record(
    r: &mut IndexReader<'_>,
    at: FilePointer,
    max_string_len: usize,
) -> Result<UrlRecord, DecodeError> {
    r.seek_to(at)?;
    let name = r.read_cstring(max_string_len)?;
    let url = r.read_cstring(max_string_len)?;
    Ok(UrlRecord { name, url })
}
