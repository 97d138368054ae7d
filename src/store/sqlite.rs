//! SQLite record store backed by `tokio-rusqlite`.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, types::Type, OptionalExtension};
use tokio_rusqlite::Connection;
use tracing::info;

use super::RecordStore;
use crate::error::Result;
use crate::models::Record;
use crate::transform::TransformKind;

const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA temp_store = MEMORY;
"#;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    id TEXT PRIMARY KEY,
    transform_type TEXT NOT NULL,
    caesar_shift INTEGER NOT NULL DEFAULT 0,
    result TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT
);
CREATE INDEX IF NOT EXISTS idx_records_created_at ON records(created_at);
"#;

const COLUMNS: &str = "id, transform_type, caesar_shift, result, created_at, updated_at";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a database file. `":memory:"` opens a private
    /// in-memory database.
    pub async fn open(path: &str) -> Result<Self> {
        if path == ":memory:" {
            return Self::in_memory().await;
        }

        let conn = Connection::open(path).await?;
        conn.call(|conn| conn.execute_batch(PRAGMAS).map_err(|e| e.into()))
            .await?;
        Ok(Self { conn })
    }

    pub async fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn init_schema(&self) -> Result<()> {
        self.conn
            .call(|conn| conn.execute_batch(SCHEMA).map_err(|e| e.into()))
            .await?;
        info!("SQLite schema initialized");
        Ok(())
    }

    async fn create(&self, record: &Record) -> Result<()> {
        let record = record.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    &format!("INSERT INTO records ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)", COLUMNS),
                    params![
                        record.id,
                        record.kind.as_str(),
                        record.shift,
                        record.result,
                        timestamp(&record.created_at),
                        record.updated_at.as_ref().map(timestamp),
                    ],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Record>> {
        let id = id.to_string();
        let record = self
            .conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare_cached(&format!("SELECT {} FROM records WHERE id = ?1", COLUMNS))?;
                let record = stmt.query_row(params![id], row_to_record).optional()?;
                Ok(record)
            })
            .await?;
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<Record>> {
        let records = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare_cached(&format!(
                    "SELECT {} FROM records ORDER BY created_at DESC, id",
                    COLUMNS
                ))?;
                let rows = stmt.query_map([], row_to_record)?;
                let records = rows.collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(records)
            })
            .await?;
        Ok(records)
    }

    async fn update(&self, record: &Record) -> Result<bool> {
        let record = record.clone();
        let changed = self
            .conn
            .call(move |conn| {
                let changed = conn.execute(
                    "UPDATE records SET transform_type = ?1, caesar_shift = ?2, result = ?3, \
                     created_at = ?4, updated_at = ?5 WHERE id = ?6",
                    params![
                        record.kind.as_str(),
                        record.shift,
                        record.result,
                        timestamp(&record.created_at),
                        record.updated_at.as_ref().map(timestamp),
                        record.id,
                    ],
                )?;
                Ok(changed)
            })
            .await?;
        Ok(changed > 0)
    }

    async fn upsert(&self, record: &Record) -> Result<Record> {
        let record = record.clone();
        let stored = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare_cached(&format!(
                    "INSERT INTO records ({cols}) VALUES (?1, ?2, ?3, ?4, ?5, NULL) \
                     ON CONFLICT(id) DO UPDATE SET transform_type = excluded.transform_type, \
                     caesar_shift = excluded.caesar_shift, result = excluded.result, \
                     updated_at = excluded.created_at \
                     RETURNING {cols}",
                    cols = COLUMNS
                ))?;
                let stored = stmt.query_row(
                    params![
                        record.id,
                        record.kind.as_str(),
                        record.shift,
                        record.result,
                        timestamp(&record.created_at),
                    ],
                    row_to_record,
                )?;
                Ok(stored)
            })
            .await?;
        Ok(stored)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        let changed = self
            .conn
            .call(move |conn| {
                let changed = conn.execute("DELETE FROM records WHERE id = ?1", params![id])?;
                Ok(changed)
            })
            .await?;
        Ok(changed > 0)
    }
}

/// Fixed-width UTC timestamp, so text order matches time order.
fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<Record> {
    let kind: String = row.get(1)?;
    let kind = kind
        .parse::<TransformKind>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    let created_at: String = row.get(4)?;
    let updated_at: Option<String> = row.get(5)?;

    Ok(Record {
        id: row.get(0)?,
        kind,
        shift: row.get(2)?,
        result: row.get(3)?,
        created_at: parse_timestamp(4, &created_at)?,
        updated_at: updated_at
            .as_deref()
            .map(|raw| parse_timestamp(5, raw))
            .transpose()?,
    })
}
