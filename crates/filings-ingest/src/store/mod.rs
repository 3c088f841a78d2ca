//! Destination stores for decoded records
//!
//! Provides the trait the batch writer persists through, a SQLite
//! implementation for real runs and an in-process one for dry runs and tests.

mod memory;
mod sqlite;
mod tables;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, SQLITE_MAX_PARAMS};
pub use tables::{columns, create_table_sql, TableColumn};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{EntityKind, Record};

/// Relational destination for decoded records
#[async_trait]
pub trait FilingStore: Send + Sync {
    /// Create the tables for `kinds` if they do not exist yet
    async fn create_schema(&self, kinds: &[EntityKind]) -> Result<()>;

    /// Persist one batch of records, all of `kind`.
    ///
    /// The batch is applied atomically. A record of another kind fails the
    /// whole batch with [`crate::error::IngestError::RecordKindMismatch`].
    async fn insert_batch(&self, kind: EntityKind, records: &[Record]) -> Result<()>;

    /// Number of stored records of `kind`
    async fn count(&self, kind: EntityKind) -> Result<u64>;
}

/// Fail with a kind mismatch unless every record is of `kind`
pub(crate) fn check_batch_kind(kind: EntityKind, records: &[Record]) -> Result<()> {
    match records.iter().find(|record| record.kind() != kind) {
        Some(record) => Err(crate::error::IngestError::RecordKindMismatch {
            expected: kind,
            actual: record.kind(),
        }),
        None => Ok(()),
    }
}
