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

use std::error::Error;
use std::fmt::{self, Display};

use crate::format::FilePointer;
use crate::store::RowId;

/// Errors raised by the primitive reader and the record decoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The stream ended before `wanted` bytes could be read at `offset`.
    TruncatedInput { offset: u64, wanted: usize },
    /// A seek target lies past the end of the stream.
    InvalidOffset { offset: u64, len: u64 },
    /// No NUL terminator within `max_len` bytes of `offset`.
    MalformedString { offset: u64, max_len: usize },
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::TruncatedInput { offset, wanted } => write!(
                f,
                "truncated input: wanted {} bytes at offset {}",
                wanted, offset
            ),
            DecodeError::InvalidOffset { offset, len } => write!(
                f,
                "invalid offset {} (stream length {})",
                offset, len
            ),
            DecodeError::MalformedString { offset, max_len } => write!(
                f,
                "malformed string at offset {}: no terminator within {} bytes",
                offset, max_len
            ),
        }
    }
}

impl Error for DecodeError {}

/// Which part of the file was being decoded when a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Header,
    BucketTable,
    WordList { bucket: usize, at: FilePointer },
    StatsBlock { word_id: RowId, at: FilePointer },
    UrlRecord { at: FilePointer },
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Header => write!(f, "header"),
            Stage::BucketTable => write!(f, "bucket table"),
            Stage::WordList { bucket, at } => {
                write!(f, "word list (bucket {} @ {})", bucket, at)
            }
            Stage::StatsBlock { word_id, at } => {
                write!(f, "stats block (word row {} @ {})", word_id, at)
            }
            Stage::UrlRecord { at } => write!(f, "url record @ {}", at),
        }
    }
}

/// Errors returned by the storage collaborator.
#[derive(Debug)]
pub struct StorageError {
    pub op: &'static str,
    pub msg: String,
}

impl StorageError {
    pub fn new(op: &'static str, msg: impl Into<String>) -> Self {
        Self {
            op,
            msg: msg.into(),
        }
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.op, self.msg)
    }
}

impl Error for StorageError {}

/// Typed errors returned by a conversion run. Every variant aborts the run.
#[derive(Debug)]
pub enum ConvertError {
    /// Decoding failed; `stage` identifies the record being read.
    Decode { stage: Stage, source: DecodeError },
    /// An insert or schema statement was rejected by the store.
    StorageWriteFailure(StorageError),
    /// Opening or mapping the index file failed.
    Io(String),
    /// The caller's cancellation flag was raised between buckets.
    Cancelled { bucket: usize },
}

impl ConvertError {
    pub(crate) fn decode(stage: Stage) -> impl FnOnce(DecodeError) -> ConvertError {
        move |source| ConvertError::Decode { stage, source }
    }
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Decode { stage, source } => {
                write!(f, "decode failed in {}: {}", stage, source)
            }
            ConvertError::StorageWriteFailure(e) => write!(f, "storage write failure: {}", e),
            ConvertError::Io(s) => write!(f, "io error: {}", s),
            ConvertError::Cancelled { bucket } => {
                write!(f, "cancelled before bucket {}", bucket)
            }
        }
    }
}

impl Error for ConvertError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConvertError::Decode { source, .. } => Some(source),
            ConvertError::StorageWriteFailure(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for ConvertError {
    fn from(e: StorageError) -> Self {
        ConvertError::StorageWriteFailure(e)
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(e: std::io::Error) -> Self {
        ConvertError::Io(e.to_string())
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::new("sqlite", e.to_string())
    }
}

impl From<rusqlite::Error> for ConvertError {
    fn from(e: rusqlite::Error) -> Self {
        ConvertError::StorageWriteFailure(e.into())
    }
}
