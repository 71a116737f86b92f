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

use log::info;
use rusqlite::Connection;
use std::path::Path;

use crate::error::ConvertError;
use crate::format::IndexFile;
use crate::project::{ConvertSummary, Projector};
use crate::store::{MemoryStore, RowSink, SqliteSink};

/// Convert `index` into `conn` inside one transaction.
///
/// The schema reset and every insert share the transaction, so on any error
/// the database is left exactly as it was before the call.
pub fn convert(
    index: &IndexFile,
    conn: &mut Connection,
    projector: Projector,
) -> Result<ConvertSummary, ConvertError> {
    let tx = conn.transaction()?;
    let summary = {
        let mut sink = SqliteSink::new(&tx);
        sink.reset_schema()?;
        projector.run(index, &mut sink)?
    };
    tx.commit()?;
    Ok(summary)
}

/// Open both ends by path and run [`convert`].
pub fn convert_paths(
    index_path: &Path,
    db_path: &Path,
    projector: Projector,
) -> Result<ConvertSummary, ConvertError> {
    info!("index file: {}", index_path.display());
    let index = IndexFile::open(index_path)
        .map_err(|e| ConvertError::Io(format!("open {}: {}", index_path.display(), e)))?;
    info!("output database: {}", db_path.display());
    let mut conn = Connection::open(db_path)?;
    convert(&index, &mut conn, projector)
}

/// Run the projection into memory only.
pub fn dry_run(
    index: &IndexFile,
    projector: Projector,
) -> Result<(ConvertSummary, MemoryStore), ConvertError> {
    let mut store = MemoryStore::new();
    let summary = projector.run(index, &mut store)?;
    Ok((summary, store))
}
