//! Sequential ingestion pipeline
//!
//! Archive URLs are processed strictly one after another: download (or cache
//! hit), then every entry decoded and batch-inserted in read order, then the
//! next archive. Any fatal error aborts the run; batches committed before the
//! failure stay in the destination.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::archive::FilingArchive;
use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::fetcher::Fetcher;
use crate::models::{EntityKind, Record};
use crate::store::FilingStore;
use crate::tickers::parse_tickers;
use crate::tokenizer::TsvReader;
use crate::writer::BatchWriter;

/// Years for which quarterly data sets are published
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 2009..=2100;

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Archives fully processed
    pub archives: usize,
    /// Entries decoded
    pub entries: usize,
    /// Entries with an unrecognised name
    pub skipped_entries: usize,
    /// Records inserted per kind
    pub records: BTreeMap<EntityKind, u64>,
}

impl IngestStats {
    pub fn total_records(&self) -> u64 {
        self.records.values().sum()
    }

    pub fn records_of(&self, kind: EntityKind) -> u64 {
        self.records.get(&kind).copied().unwrap_or(0)
    }
}

pub struct IngestPipeline {
    config: IngestConfig,
    store: Arc<dyn FilingStore>,
    fetcher: Fetcher,
    writer: BatchWriter,
    archives: usize,
    entries: usize,
    skipped_entries: usize,
}

impl IngestPipeline {
    pub fn new(config: IngestConfig, store: Arc<dyn FilingStore>, fetcher: Fetcher) -> Self {
        let writer = BatchWriter::new(Arc::clone(&store), config.batch_size);
        Self {
            config,
            store,
            fetcher,
            writer,
            archives: 0,
            entries: 0,
            skipped_entries: 0,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Counters so far
    pub fn stats(&self) -> IngestStats {
        let records = EntityKind::ALL
            .into_iter()
            .map(|kind| (kind, self.writer.written(kind)))
            .filter(|(_, count)| *count > 0)
            .collect();

        IngestStats {
            archives: self.archives,
            entries: self.entries,
            skipped_entries: self.skipped_entries,
            records,
        }
    }

    /// Create the destination tables for every kind
    pub async fn prepare(&self) -> Result<()> {
        self.store.create_schema(&EntityKind::ALL).await
    }

    /// Download the ticker feed and insert it. Returns the number of tickers.
    pub async fn load_tickers(&mut self) -> Result<u64> {
        let url = self.config.tickers_url.clone();
        info!(url = %url, "Loading tickers");

        let bytes = self.fetcher.fetch_bytes(&url).await?;
        let tickers = parse_tickers(&bytes)?;
        let count = tickers.len() as u64;

        for ticker in tickers {
            self.writer.add(Record::Ticker(ticker)).await?;
        }
        self.writer.flush().await?;

        info!(records = count, "Loaded tickers");
        Ok(count)
    }

    /// Fetch one archive and ingest it
    pub async fn ingest_url(&mut self, url: &str) -> Result<()> {
        let path = self.fetcher.fetch(url).await?;
        self.ingest_archive(&path).await
    }

    /// Ingest every recognised entry of a local archive, in archive order
    pub async fn ingest_archive(&mut self, path: &Path) -> Result<()> {
        let mut archive = FilingArchive::open(path)?;
        info!(path = %path.display(), entries = archive.len(), "Processing archive");

        for index in 0..archive.len() {
            let Some(entry) = archive.entry(index)? else {
                continue;
            };
            self.ingest_entry(&entry.name, entry.reader).await?;
        }

        self.archives += 1;
        Ok(())
    }

    /// Decode and insert one entry. Returns the number of records written.
    ///
    /// Entries whose name is not one of the data set tables are skipped
    /// without being read.
    pub async fn ingest_entry<R: BufRead>(&mut self, name: &str, reader: R) -> Result<u64> {
        let Some(kind) = EntityKind::from_entry_name(name) else {
            info!(entry = name, "Skipping unrecognised entry");
            self.skipped_entries += 1;
            return Ok(0);
        };

        let mut rows = TsvReader::new(reader)?;
        let mut count = 0u64;

        loop {
            let decoded = match rows.read_row()? {
                Some(tokens) => kind.decode(&tokens),
                None => break,
            };
            let record =
                decoded.map_err(|source| IngestError::format(name, rows.line_number(), source))?;
            self.writer.add(record).await?;
            count += 1;
        }
        self.writer.flush().await?;

        self.entries += 1;
        info!(entry = name, kind = %kind, records = count, "Processed entry");
        Ok(count)
    }

    /// Prepare the schema, load tickers when enabled, then ingest every URL
    /// in order
    pub async fn run(&mut self, urls: &[String]) -> Result<IngestStats> {
        self.prepare().await?;

        if self.config.load_tickers {
            self.load_tickers().await?;
        }

        for (position, url) in urls.iter().enumerate() {
            info!(url = %url, archive = position + 1, total = urls.len(), "Ingesting archive");
            self.ingest_url(url).await?;
        }

        let stats = self.stats();
        info!(
            archives = stats.archives,
            entries = stats.entries,
            skipped = stats.skipped_entries,
            records = stats.total_records(),
            "Ingestion complete"
        );
        Ok(stats)
    }
}

/// Keep the archive URLs for `year`.
///
/// The year must be one the data sets are published for; a configuration
/// error otherwise. No matching URL is [`IngestError::NoArchives`].
pub fn select_period_archives(urls: &[String], year: i32) -> Result<Vec<String>> {
    if !SUPPORTED_YEARS.contains(&year) {
        return Err(IngestError::config(format!(
            "Year {} is outside the published range {}..={}",
            year,
            SUPPORTED_YEARS.start(),
            SUPPORTED_YEARS.end()
        )));
    }

    let needle = year.to_string();
    let selected: Vec<String> = urls.iter().filter(|url| url.contains(&needle)).cloned().collect();

    if selected.is_empty() {
        return Err(IngestError::NoArchives(needle));
    }
    Ok(selected)
}

/// Refuse to build into an existing database file
pub fn ensure_destination_absent(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(IngestError::DestinationExists(path.to_path_buf()));
    }
    Ok(())
}

/// Archive URLs from a list file: one per line, blank lines and `#`
/// comments ignored
pub fn parse_archive_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Default database file name for a run
pub fn default_database_path(year: Option<i32>) -> PathBuf {
    match year {
        Some(year) => PathBuf::from(format!("filings_{}.db", year)),
        None => PathBuf::from("filings.db"),
    }
}
