//! In-process store for dry runs and tests
//!
//! A recording store keeps every batch it receives. A counting store keeps
//! only per-kind totals, so its memory does not grow with the input.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{check_batch_kind, FilingStore};
use crate::error::Result;
use crate::models::{EntityKind, Record};

#[derive(Debug, Default)]
struct Inner {
    schema: BTreeSet<EntityKind>,
    batches: Vec<(EntityKind, Vec<Record>)>,
    counts: BTreeMap<EntityKind, u64>,
    batch_count: usize,
}

/// [`FilingStore`] held in process memory.
///
/// Clones share the same contents, so a test can keep a handle while the
/// pipeline owns another.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    retain_records: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Store that keeps a copy of every batch
    pub fn new() -> Self {
        Self {
            inner: Arc::default(),
            retain_records: true,
        }
    }

    /// Store that only counts records per kind and discards them
    pub fn counting() -> Self {
        Self {
            inner: Arc::default(),
            retain_records: false,
        }
    }

    pub fn retains_records(&self) -> bool {
        self.retain_records
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Kinds whose schema has been created
    pub fn schema(&self) -> Vec<EntityKind> {
        self.lock().schema.iter().copied().collect()
    }

    /// Size of every batch of `kind`, in insert order; empty when counting
    pub fn batch_sizes(&self, kind: EntityKind) -> Vec<usize> {
        self.lock()
            .batches
            .iter()
            .filter(|(batch_kind, _)| *batch_kind == kind)
            .map(|(_, records)| records.len())
            .collect()
    }

    /// All stored records of `kind`, in insert order; empty when counting
    pub fn records(&self, kind: EntityKind) -> Vec<Record> {
        self.lock()
            .batches
            .iter()
            .filter(|(batch_kind, _)| *batch_kind == kind)
            .flat_map(|(_, records)| records.iter().cloned())
            .collect()
    }

    /// Total number of batches across all kinds
    pub fn batch_count(&self) -> usize {
        self.lock().batch_count
    }
}

#[async_trait]
impl FilingStore for MemoryStore {
    async fn create_schema(&self, kinds: &[EntityKind]) -> Result<()> {
        self.lock().schema.extend(kinds.iter().copied());
        Ok(())
    }

    async fn insert_batch(&self, kind: EntityKind, records: &[Record]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        check_batch_kind(kind, records)?;

        let mut inner = self.lock();
        *inner.counts.entry(kind).or_insert(0) += records.len() as u64;
        inner.batch_count += 1;
        if self.retain_records {
            inner.batches.push((kind, records.to_vec()));
        }
        Ok(())
    }

    async fn count(&self, kind: EntityKind) -> Result<u64> {
        Ok(self.lock().counts.get(&kind).copied().unwrap_or(0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use crate::models::Ticker;

    fn ticker(symbol: &str) -> Record {
        Record::Ticker(Ticker {
            cik: "320193".to_string(),
            ticker: symbol.to_string(),
            name: "Apple Inc.".to_string(),
        })
    }

    #[tokio::test]
    async fn test_records_batches_in_order() {
        let store = MemoryStore::new();
        let handle = store.clone();

        store.create_schema(&[EntityKind::Ticker]).await.unwrap();
        store
            .insert_batch(EntityKind::Ticker, &[ticker("AAPL"), ticker("AAPL.B")])
            .await
            .unwrap();
        store.insert_batch(EntityKind::Ticker, &[ticker("X")]).await.unwrap();
        store.insert_batch(EntityKind::Ticker, &[]).await.unwrap();

        assert_eq!(handle.schema(), vec![EntityKind::Ticker]);
        assert_eq!(handle.batch_sizes(EntityKind::Ticker), vec![2, 1]);
        assert_eq!(handle.count(EntityKind::Ticker).await.unwrap(), 3);
        assert_eq!(handle.records(EntityKind::Ticker)[2], ticker("X"));
        assert_eq!(handle.count(EntityKind::Tag).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_counting_store_discards_records() {
        let store = MemoryStore::counting();
        assert!(!store.retains_records());

        for _ in 0..1000 {
            store
                .insert_batch(EntityKind::Ticker, &[ticker("AAPL"), ticker("MSFT")])
                .await
                .unwrap();
        }

        assert_eq!(store.count(EntityKind::Ticker).await.unwrap(), 2000);
        assert_eq!(store.batch_count(), 1000);
        assert!(store.records(EntityKind::Ticker).is_empty());
        assert!(store.batch_sizes(EntityKind::Ticker).is_empty());
        assert_eq!(store.lock().batches.capacity(), 0);
    }

    #[tokio::test]
    async fn test_counting_store_still_rejects_foreign_records() {
        let store = MemoryStore::counting();
        let err = store
            .insert_batch(EntityKind::Tag, &[ticker("AAPL")])
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::RecordKindMismatch { .. }));
        assert_eq!(store.count(EntityKind::Tag).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rejects_foreign_records() {
        let store = MemoryStore::new();
        let err = store
            .insert_batch(EntityKind::Submission, &[ticker("AAPL")])
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::RecordKindMismatch { .. }));
        assert_eq!(store.batch_count(), 0);
    }
}
