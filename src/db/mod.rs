//! SQLite-backed local storage
//!
//! A single `local_storage` table of string keys to string values. Each key holds
//! one complete serialized document; writes replace the previous value wholesale.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::config::RosterPaths;

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the roster database, creating the schema on first use
    pub fn open(paths: &RosterPaths) -> Result<Self> {
        Self::open_at(&paths.db_file)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).context("Failed to open roster database")?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Throwaway database, mostly for tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Read the value stored under `key`
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read local storage key {}", key))
    }

    /// Store `value` under `key`, replacing any prior value
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        self.conn
            .execute(
                r#"
                INSERT INTO local_storage (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                "#,
                params![key, value, now],
            )
            .with_context(|| format!("Failed to write local storage key {}", key))?;
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM local_storage WHERE key = ?1", params![key])
            .with_context(|| format!("Failed to remove local storage key {}", key))?;
        Ok(())
    }

    /// All keys currently present
    #[cfg(test)]
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM local_storage ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS local_storage (
            key         TEXT PRIMARY KEY,
            value       TEXT NOT NULL,
            updated_at  INTEGER NOT NULL
        )
        "#,
        [],
    )
    .context("Failed to create local_storage table")?;
    Ok(())
}
