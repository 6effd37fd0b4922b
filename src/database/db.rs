//! SQLite chunk record store
//!
//! One `chunks` row per (learner, chunk) with the SM-2 scheduling fields, a
//! precomputed `next_due` for the overdue scan, and a `version` column for
//! optimistic concurrency. `app_state` holds a simulated current date that can
//! be advanced day by day to walk through review schedules.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use super::store::ChunkStore;
use crate::error::StoreError;
use crate::models::ChunkRecord;

const CHUNK_COLUMNS: &str = "learner_id, chunk_id, topic_id, status, ease_factor, interval_days, \
                             repetitions, last_reviewed, version";

#[derive(Clone)]
pub struct SqliteChunkStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteChunkStore {
    /// Opens (or creates) the database file and its tables.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS chunks (
                learner_id TEXT NOT NULL,
                chunk_id TEXT NOT NULL,
                topic_id TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'new',
                ease_factor REAL NOT NULL DEFAULT 2.5,
                interval_days INTEGER NOT NULL DEFAULT 1,
                repetitions INTEGER NOT NULL DEFAULT 0,
                last_reviewed INTEGER,
                next_due INTEGER,
                version INTEGER NOT NULL DEFAULT 1,
                PRIMARY KEY (learner_id, chunk_id)
            );
            CREATE INDEX IF NOT EXISTS idx_chunks_topic ON chunks (learner_id, topic_id);
            CREATE INDEX IF NOT EXISTS idx_chunks_due ON chunks (learner_id, status, next_due);
            CREATE TABLE IF NOT EXISTS app_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;

        conn.execute(
            "INSERT OR IGNORE INTO app_state (key, value) VALUES ('current_date', ?1)",
            params![Utc::now().timestamp().to_string()],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))
    }

    /// Simulated "today" used by the command line tools.
    pub fn current_date(&self) -> Result<DateTime<Utc>, StoreError> {
        let conn = self.conn()?;
        read_current_date(&conn)
    }

    /// Moves the simulated date forward by 24 hours and returns it.
    pub fn advance_day(&self) -> Result<DateTime<Utc>, StoreError> {
        let conn = self.conn()?;
        let next_day = read_current_date(&conn)? + Duration::days(1);
        conn.execute(
            "UPDATE app_state SET value = ?1 WHERE key = 'current_date'",
            params![next_day.timestamp().to_string()],
        )?;
        Ok(next_day)
    }

    fn query_chunks<P: rusqlite::Params>(
        &self,
        filter: &str,
        params: P,
    ) -> Result<Vec<ChunkRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CHUNK_COLUMNS} FROM chunks WHERE {filter} ORDER BY chunk_id"
        ))?;
        let rows = stmt
            .query_map(params, |row| Ok(read_row(row)))?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().collect()
    }
}

fn read_current_date(conn: &Connection) -> Result<DateTime<Utc>, StoreError> {
    let value: String = conn.query_row(
        "SELECT value FROM app_state WHERE key = 'current_date'",
        [],
        |row| row.get(0),
    )?;
    let secs = value
        .parse::<i64>()
        .map_err(|_| StoreError::Corrupt(format!("current_date '{value}' is not a timestamp")))?;
    from_timestamp(secs)
}

fn from_timestamp(secs: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StoreError::Corrupt(format!("timestamp {secs} out of range")))
}

/// Column decoding that can fail on our side (status text, timestamps) is
/// reported as `Corrupt` rather than a SQLite error.
fn read_row(row: &Row<'_>) -> Result<ChunkRecord, StoreError> {
    let status: String = row.get(3)?;
    let last_reviewed: Option<i64> = row.get(7)?;
    let interval_days: i64 = row.get(5)?;
    let repetitions: i64 = row.get(6)?;
    let version: i64 = row.get(8)?;

    Ok(ChunkRecord {
        learner_id: row.get(0)?,
        chunk_id: row.get(1)?,
        topic_id: row.get(2)?,
        status: status.parse()?,
        ease_factor: row.get(4)?,
        interval_days: interval_days.clamp(0, i64::from(u32::MAX)) as u32,
        repetitions: repetitions.clamp(0, i64::from(u32::MAX)) as u32,
        last_reviewed: last_reviewed.map(from_timestamp).transpose()?,
        version: version.max(0) as u64,
    })
}

impl ChunkStore for SqliteChunkStore {
    fn get_chunk(
        &self,
        learner_id: &str,
        chunk_id: &str,
    ) -> Result<Option<ChunkRecord>, StoreError> {
        let conn = self.conn()?;
        let sql =
            format!("SELECT {CHUNK_COLUMNS} FROM chunks WHERE learner_id = ?1 AND chunk_id = ?2");
        let row = conn
            .query_row(&sql, params![learner_id, chunk_id], |row| Ok(read_row(row)))
            .optional()?;
        row.transpose()
    }

    fn put_chunk(
        &self,
        learner_id: &str,
        chunk_id: &str,
        record: &ChunkRecord,
    ) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let last_reviewed = record.last_reviewed.map(|at| at.timestamp());
        let next_due = record.next_due().map(|at| at.timestamp());
        let version = i64::try_from(record.version)
            .map_err(|_| StoreError::Corrupt(format!("version {} out of range", record.version)))?;

        // Single statement either way, so the version check and the write are atomic.
        let changed = if record.version == 0 {
            conn.execute(
                "INSERT INTO chunks (learner_id, chunk_id, topic_id, status, ease_factor,
                                     interval_days, repetitions, last_reviewed, next_due, version)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1)
                 ON CONFLICT (learner_id, chunk_id) DO NOTHING",
                params![
                    learner_id,
                    chunk_id,
                    record.topic_id,
                    record.status.as_str(),
                    record.ease_factor,
                    record.interval_days,
                    record.repetitions,
                    last_reviewed,
                    next_due,
                ],
            )?
        } else {
            conn.execute(
                "UPDATE chunks
                 SET topic_id = ?3, status = ?4, ease_factor = ?5, interval_days = ?6,
                     repetitions = ?7, last_reviewed = ?8, next_due = ?9, version = version + 1
                 WHERE learner_id = ?1 AND chunk_id = ?2 AND version = ?10",
                params![
                    learner_id,
                    chunk_id,
                    record.topic_id,
                    record.status.as_str(),
                    record.ease_factor,
                    record.interval_days,
                    record.repetitions,
                    last_reviewed,
                    next_due,
                    version,
                ],
            )?
        };

        if changed == 0 {
            return Err(StoreError::Conflict {
                chunk_id: chunk_id.to_string(),
            });
        }
        Ok(())
    }

    fn list_chunks_by_topic(
        &self,
        learner_id: &str,
        topic_id: &str,
    ) -> Result<Vec<ChunkRecord>, StoreError> {
        self.query_chunks("learner_id = ?1 AND topic_id = ?2", params![learner_id, topic_id])
    }

    fn list_overdue_chunks(
        &self,
        learner_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ChunkRecord>, StoreError> {
        self.query_chunks(
            "learner_id = ?1 AND status = 'acquired' AND next_due IS NOT NULL AND next_due < ?2",
            params![learner_id, now.timestamp()],
        )
    }

    fn list_chunks(&self, learner_id: &str) -> Result<Vec<ChunkRecord>, StoreError> {
        self.query_chunks("learner_id = ?1", params![learner_id])
    }
}
