//! Store Module
//!
//! Durable record storage behind an async trait, with a SQLite backend.

mod sqlite;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Record;

pub use sqlite::SqliteStore;

// == Record Store ==
/// Durable storage for records.
///
/// The record service is the only caller. It updates the cache only after
/// one of these calls has returned `Ok`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Creates the records table if it does not exist.
    async fn init_schema(&self) -> Result<()>;

    async fn create(&self, record: &Record) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<Record>>;

    /// All records, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Record>>;

    /// Replaces every field but `id`. Returns `false` if no such record exists.
    async fn update(&self, record: &Record) -> Result<bool>;

    /// Inserts `record`, or, if its id exists, replaces kind, shift and
    /// result in one statement, keeping `created_at` and stamping
    /// `updated_at` with `record.created_at`. Returns the stored row.
    async fn upsert(&self, record: &Record) -> Result<Record>;

    /// Returns `false` if no such record existed.
    async fn delete(&self, id: &str) -> Result<bool>;
}
