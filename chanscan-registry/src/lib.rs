//! SQLite-backed multiplex registry for transport scanning.
//!
//! This crate persists which multiplexes have already been discovered per
//! video source and answers the exact-frequency lookups the scan planner
//! issues through [`MultiplexRegistry`]. Combined with the carrier-offset
//! probing in `chanscan_tables`, a transport rescanned a few kHz off its
//! nominal center frequency resolves to its existing row instead of
//! producing a duplicate.

use std::path::Path;

use log::warn;
use rusqlite::{params, Connection};
use thiserror::Error;

use chanscan_tables::{
    resolve_multiplex, MultiplexId, MultiplexRegistry, SourceId, TransportScanItem,
};

/// Registry error types.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS multiplexes (
    mplexid   INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id INTEGER NOT NULL,
    frequency INTEGER NOT NULL,
    UNIQUE (source_id, frequency)
);
";

/// Persistent store of discovered multiplexes, keyed by source and exact
/// frequency.
pub struct MultiplexStore {
    conn: Connection,
}

impl MultiplexStore {
    /// Open or create a store at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    /// Exact-frequency lookup of a persisted multiplex row.
    pub fn get_multiplex_id(
        &self,
        source_id: SourceId,
        frequency: u64,
    ) -> Result<Option<MultiplexId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT mplexid FROM multiplexes WHERE source_id = ?1 AND frequency = ?2")?;
        let result = stmt.query_row(params![source_id, frequency as i64], |row| row.get(0));
        match result {
            Ok(id) => Ok(Some(id)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a newly discovered multiplex and return its id.
    pub fn insert_multiplex(&self, source_id: SourceId, frequency: u64) -> Result<MultiplexId> {
        self.conn.execute(
            "INSERT INTO multiplexes (source_id, frequency) VALUES (?1, ?2)",
            params![source_id, frequency as i64],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Record a scanned transport without duplicating entries.
    ///
    /// Resolves the item across its candidate frequencies first; only when
    /// no variant is known does a new row get inserted, at the item's
    /// nominal frequency.
    pub fn record_transport(&self, item: &TransportScanItem) -> Result<MultiplexId> {
        if let Some(id) = resolve_multiplex(self, item.source_id, item.candidate_frequencies()) {
            return Ok(id);
        }
        self.insert_multiplex(item.source_id, item.frequency_at(0))
    }

    /// Number of persisted multiplexes.
    pub fn multiplex_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM multiplexes", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl MultiplexRegistry for MultiplexStore {
    fn multiplex_id(&self, source_id: SourceId, frequency: u64) -> Option<MultiplexId> {
        match self.get_multiplex_id(source_id, frequency) {
            Ok(id) => id,
            Err(e) => {
                warn!("multiplex lookup failed for source {source_id} at {frequency} Hz: {e}");
                None
            }
        }
    }
}
