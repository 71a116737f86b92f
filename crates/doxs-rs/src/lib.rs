//! Reader for DOXS hash-bucketed inverted index files and a converter that
//! projects them into a relational schema (`indexword`, `urlinfo`,
//! `statsinfo`).
//!
//! The pipeline is strictly forward: bucket table -> word lists -> stats
//! blocks -> url records, driven by [`Projector`], which also deduplicates
//! url records by their file offset.

pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod project;
pub mod store;

pub use crate::config::ConvertConfig;
pub use crate::convert::{convert, convert_paths, dry_run};
pub use crate::error::{ConvertError, DecodeError, Stage, StorageError};
pub use crate::format::{DocStat, FilePointer, IndexFile, IndexReader, UrlRecord, WordRecord};
pub use crate::project::{ConvertSummary, Projector};
pub use crate::store::{MemoryStore, RowId, RowSink, SqliteSink};
