//! Per-kind batching in front of a [`FilingStore`]

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::models::{EntityKind, Record};
use crate::store::FilingStore;

/// Accumulates decoded records per kind and inserts them in batches.
///
/// A kind's buffer is written as soon as it holds `batch_size` records.
/// [`BatchWriter::flush`] writes whatever remains; the pipeline calls it at
/// the end of every archive entry. Memory use is bounded by the batch size
/// times the number of kinds, never by the size of an entry.
pub struct BatchWriter {
    store: Arc<dyn FilingStore>,
    batch_size: usize,
    buffers: BTreeMap<EntityKind, Vec<Record>>,
    written: BTreeMap<EntityKind, u64>,
    batches: u64,
}

impl BatchWriter {
    /// A `batch_size` of zero is treated as one
    pub fn new(store: Arc<dyn FilingStore>, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
            buffers: BTreeMap::new(),
            written: BTreeMap::new(),
            batches: 0,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Buffer `record`, inserting its kind's batch once it is full
    pub async fn add(&mut self, record: Record) -> Result<()> {
        let kind = record.kind();
        let batch_size = self.batch_size;
        let buffer = self
            .buffers
            .entry(kind)
            .or_insert_with(|| Vec::with_capacity(batch_size));
        buffer.push(record);

        if buffer.len() >= batch_size {
            self.flush_kind(kind).await?;
        }
        Ok(())
    }

    /// Insert the pending records of `kind`, if any
    pub async fn flush_kind(&mut self, kind: EntityKind) -> Result<()> {
        let Some(buffer) = self.buffers.get_mut(&kind) else {
            return Ok(());
        };
        if buffer.is_empty() {
            return Ok(());
        }

        let batch = std::mem::take(buffer);
        self.store.insert_batch(kind, &batch).await?;

        *self.written.entry(kind).or_insert(0) += batch.len() as u64;
        self.batches += 1;
        debug!(kind = %kind, records = batch.len(), "Flushed batch");
        Ok(())
    }

    /// Insert the pending records of every kind
    pub async fn flush(&mut self) -> Result<()> {
        let kinds: Vec<EntityKind> = self
            .buffers
            .iter()
            .filter(|(_, buffer)| !buffer.is_empty())
            .map(|(kind, _)| *kind)
            .collect();
        for kind in kinds {
            self.flush_kind(kind).await?;
        }
        Ok(())
    }

    /// Records buffered but not yet inserted
    pub fn pending(&self, kind: EntityKind) -> usize {
        self.buffers.get(&kind).map_or(0, Vec::len)
    }

    /// Records of `kind` inserted so far
    pub fn written(&self, kind: EntityKind) -> u64 {
        self.written.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_written(&self) -> u64 {
        self.written.values().sum()
    }

    /// Number of insert batches issued
    pub fn batches(&self) -> u64 {
        self.batches
    }
}
