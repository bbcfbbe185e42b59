//! SQLite-based cycle storage.
//!
//! Provides persistent storage for:
//! - Completed cycles (the usage ledger)
//! - Key-value store for application state (the persisted timer machine)

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::ledger::{CompletedCycle, UsageLedger};

/// SQLite database for cycle storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/dabtimer/dabtimer.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("dabtimer.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS cycles (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                completed_at TEXT NOT NULL,
                material     TEXT NOT NULL,
                concentrate  TEXT NOT NULL,
                heater       TEXT NOT NULL,
                heat_secs    INTEGER NOT NULL,
                cool_secs    INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_cycles_completed_at ON cycles(completed_at);",
        )?;
        Ok(())
    }

    /// Append a completed cycle. Returns the new row id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_cycle(&self, cycle: &CompletedCycle) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO cycles (completed_at, material, concentrate, heater, heat_secs, cool_secs)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                cycle.timestamp.to_rfc3339(),
                cycle.material,
                cycle.concentrate,
                cycle.heater,
                cycle.heat_secs,
                cycle.cool_secs,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, "stored completed cycle");
        Ok(id)
    }

    /// Load every stored cycle into a time-ordered ledger.
    pub fn load_ledger(&self) -> Result<UsageLedger> {
        let mut stmt = self.conn.prepare(
            "SELECT completed_at, material, concentrate, heater, heat_secs, cool_secs
             FROM cycles
             ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, u32>(4)?,
                row.get::<_, u32>(5)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (completed_at, material, concentrate, heater, heat_secs, cool_secs) = row?;
            let timestamp = DateTime::parse_from_rfc3339(&completed_at)
                .map_err(|e| DatabaseError::CorruptRow {
                    table: "cycles",
                    message: format!("bad completed_at '{completed_at}': {e}"),
                })?
                .with_timezone(&Utc);
            entries.push(CompletedCycle {
                timestamp,
                material,
                concentrate,
                heater,
                heat_secs,
                cool_secs,
            });
        }
        Ok(UsageLedger::from_entries(entries))
    }

    pub fn cycle_count(&self) -> Result<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM cycles", [], |row| row.get::<_, u64>(0))?;
        Ok(count)
    }

    /// Delete every stored cycle. Returns how many were removed.
    ///
    /// Only for an explicit user request; nothing else removes cycles.
    pub fn clear_cycles(&self) -> Result<usize> {
        let removed = self.conn.execute("DELETE FROM cycles", [])?;
        tracing::warn!(removed, "cleared cycle history");
        Ok(removed)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}
