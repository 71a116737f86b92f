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

use rusqlite::{params, Connection};

use super::{RowId, RowSink};
use crate::error::StorageError;

/// Output schema, recreated from scratch at the start of every run.
pub const SCHEMA: &str = "
DROP TABLE IF EXISTS urlinfo;
DROP TABLE IF EXISTS statsinfo;
DROP TABLE IF EXISTS indexword;
CREATE TABLE urlinfo(id INTEGER PRIMARY KEY AUTOINCREMENT, url TEXT, name TEXT);
CREATE TABLE statsinfo(indexword_id INTEGER, urlinfo_id INTEGER, frequency INTEGER);
CREATE TABLE indexword(id INTEGER PRIMARY KEY AUTOINCREMENT, word TEXT);
";

const INSERT_WORD: &str = "INSERT INTO indexword(word) VALUES (?1)";
const INSERT_URL: &str = "INSERT INTO urlinfo(url, name) VALUES (?1, ?2)";
const INSERT_STAT: &str =
    "INSERT INTO statsinfo(indexword_id, urlinfo_id, frequency) VALUES (?1, ?2, ?3)";

fn fail(op: &'static str) -> impl FnOnce(rusqlite::Error) -> StorageError {
    move |e| StorageError::new(op, e.to_string())
}

/// `RowSink` over a SQLite connection.
///
/// The caller owns transaction scope: hand this a `rusqlite::Transaction`
/// (which derefs to `Connection`) to make the run all-or-nothing.
pub struct SqliteSink<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteSink<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn insert(
        &self,
        op: &'static str,
        sql: &str,
        p: &[&dyn rusqlite::ToSql],
    ) -> Result<(), StorageError> {
        let mut stmt = self.conn.prepare_cached(sql).map_err(fail(op))?;
        stmt.execute(p).map_err(fail(op))?;
        Ok(())
    }
}

impl RowSink for SqliteSink<'_> {
    fn reset_schema(&mut self) -> Result<(), StorageError> {
        self.conn.execute_batch(SCHEMA).map_err(fail("create schema"))
    }

    fn insert_word(&mut self, word: &str) -> Result<RowId, StorageError> {
        self.insert("insert indexword", INSERT_WORD, params![word])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_url(&mut self, url: &str, name: &str) -> Result<RowId, StorageError> {
        self.insert("insert urlinfo", INSERT_URL, params![url, name])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_stat(
        &mut self,
        word_id: RowId,
        url_id: RowId,
        frequency: u32,
    ) -> Result<(), StorageError> {
        self.insert(
            "insert statsinfo",
            INSERT_STAT,
            params![word_id, url_id, frequency],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_return_autoincrement_ids() {
        let conn = Connection::open_in_memory().unwrap();
        let mut sink = SqliteSink::new(&conn);
        sink.reset_schema().unwrap();
        assert_eq!(sink.insert_word("cat").unwrap(), 1);
        assert_eq!(sink.insert_word("dog").unwrap(), 2);
        assert_eq!(sink.insert_url("http://cats.example", "Cats").unwrap(), 1);
        sink.insert_stat(2, 1, 5).unwrap();

        let (url, name): (String, String) = conn
            .query_row("SELECT url, name FROM urlinfo WHERE id = 1", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(url, "http://cats.example");
        assert_eq!(name, "Cats");
        let freq: i64 = conn
            .query_row(
                "SELECT frequency FROM statsinfo WHERE indexword_id = 2 AND urlinfo_id = 1",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(freq, 5);
    }

    #[test]
    fn reset_schema_drops_previous_rows() {
        let conn = Connection::open_in_memory().unwrap();
        let mut sink = SqliteSink::new(&conn);
        sink.reset_schema().unwrap();
        sink.insert_word("old").unwrap();
        sink.reset_schema().unwrap();
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM indexword", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 0);
        assert_eq!(sink.insert_word("new").unwrap(), 1);
    }

    #[test]
    fn insert_without_schema_is_a_storage_error() {
        let conn = Connection::open_in_memory().unwrap();
        let mut sink = SqliteSink::new(&conn);
        let err = sink.insert_word("cat").unwrap_err();
        assert_eq!(err.op, "insert indexword");
    }
}
