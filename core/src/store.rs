//! SQLite-backed local storage.
//!
//! RULE: Only store.rs talks to the database.
//! The store is a flat key → string map, the same contract browser local
//! storage offers. The whole love-map state lives under one key and is
//! overwritten as a unit; there are no partial writes and no versioning.

use crate::{error::LoveResult, types::StoredData};
use rusqlite::{params, Connection, OptionalExtension};

pub struct LoveStore {
    conn: Connection,
}

impl LoveStore {
    /// Open (or create) the store at `path`. `:memory:` opens an in-memory store.
    pub fn open(path: &str) -> LoveResult<Self> {
        if path == ":memory:" {
            return Self::in_memory();
        }
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (used in tests).
    pub fn in_memory() -> LoveResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Apply the schema. Idempotent.
    pub fn migrate(&self) -> LoveResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_local_storage.sql"))?;
        Ok(())
    }

    // ── Raw key/value ──────────────────────────────────────────

    pub fn get_item(&self, key: &str) -> LoveResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_item(&self, key: &str, value: &str) -> LoveResult<()> {
        self.conn.execute(
            "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> LoveResult<()> {
        self.conn
            .execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        Ok(())
    }

    // ── Love-map blob ──────────────────────────────────────────

    /// Saved state under `key`, or `None` on first run.
    pub fn load_data(&self, key: &str) -> LoveResult<Option<StoredData>> {
        match self.get_item(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn save_data(&self, key: &str, data: &StoredData) -> LoveResult<()> {
        let json = serde_json::to_string(data)?;
        self.set_item(key, &json)?;
        log::debug!(
            "saved '{key}': {} memories, {} bytes",
            data.memories.len(),
            json.len()
        );
        Ok(())
    }
}
