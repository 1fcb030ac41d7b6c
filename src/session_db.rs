use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};

use crate::utils::db;

/* Durable key-value store for the measurement session. Values are opaque
strings (the session layer writes JSON); every write replaces the previous
value of the key.
*/

pub struct StoredValue {
    pub value: String,
    pub saved_at: Option<DateTime<Utc>>,
}

pub struct SessionDb {
    conn: Connection,
}

impl SessionDb {
    pub fn open(support_dir: &str) -> Result<SessionDb> {
        let conn = db::open_db_and_run_migration(
            support_dir,
            "session.db",
            &[&|tx| {
                let sql = "
                CREATE TABLE session (
                    key               TEXT    PRIMARY KEY
                                              NOT NULL
                                              UNIQUE,
                    value             TEXT    NOT NULL,
                    saved_at          INTEGER NOT NULL -- unix timestamp in seconds
                );
                ";
                db::run_sql_script(tx, sql)
            }],
        )?;
        Ok(SessionDb { conn })
    }

    pub fn put(&mut self, key: &str, value: &str) -> Result<()> {
        let sql = "INSERT OR REPLACE INTO session (key, value, saved_at) VALUES (?1, ?2, ?3);";
        self.conn
            .prepare_cached(sql)?
            .execute((key, value, Utc::now().timestamp()))?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<StoredValue>> {
        let mut query = self
            .conn
            .prepare("SELECT value, saved_at FROM session WHERE key = ?1;")?;
        let result = query
            .query_row((key,), |row| {
                let value: String = row.get(0)?;
                let saved_at: i64 = row.get(1)?;
                Ok(StoredValue {
                    value,
                    saved_at: DateTime::from_timestamp(saved_at, 0),
                })
            })
            .optional()?;
        Ok(result)
    }

    pub fn contains(&self, key: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM session WHERE key = ?1;",
            (key,),
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn delete(&mut self, key: &str) -> Result<bool> {
        let changes = self
            .conn
            .execute("DELETE FROM session WHERE key = ?1;", (key,))?;
        Ok(changes > 0)
    }

    pub fn flush(&self) -> Result<()> {
        self.conn.cache_flush()?;
        Ok(())
    }
}
