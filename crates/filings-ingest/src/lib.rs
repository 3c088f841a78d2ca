//! Filings Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Loads the quarterly financial statement data sets into a relational store.
//!
//! # Overview
//!
//! Each quarterly data set is a zip archive of eight tab separated tables
//! (`sub`, `tag`, `dim`, `num`, `txt`, `pre`, `ren`, `cal`). A run:
//!
//! - **Fetches** every archive through a URL-keyed download cache ([`fetcher`])
//! - **Reads** entries one at a time out of the archive ([`archive`])
//! - **Tokenizes** each entry line by line ([`tokenizer`])
//! - **Decodes** rows into typed records ([`decoder`], [`models`])
//! - **Writes** records in per-kind batches ([`writer`], [`store`])
//!
//! A ticker lookup table ([`tickers`]) is loaded once before the archives.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use filings_ingest::{Fetcher, IngestConfig, IngestPipeline, SqliteStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::from_env();
//!     let store = SqliteStore::create("filings_2021.db").await?;
//!     let fetcher = Fetcher::new(&config)?;
//!
//!     let mut pipeline = IngestPipeline::new(config, Arc::new(store), fetcher);
//!     let stats = pipeline
//!         .run(&["https://www.sec.gov/files/dera/data/financial-statement-data-sets/2021q1.zip".to_string()])
//!         .await?;
//!     println!("{} records", stats.total_records());
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod config;
pub mod decoder;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod pipeline;
pub mod store;
pub mod tickers;
pub mod tokenizer;
pub mod writer;

pub use archive::{ArchiveEntry, FilingArchive};
pub use config::IngestConfig;
pub use decoder::DecodeError;
pub use error::{IngestError, Result};
pub use fetcher::Fetcher;
pub use models::{EntityKind, Record};
pub use pipeline::{
    default_database_path, ensure_destination_absent, parse_archive_list, select_period_archives,
    IngestPipeline, IngestStats,
};
pub use store::{FilingStore, MemoryStore, SqliteStore};
pub use tokenizer::TsvReader;
pub use writer::BatchWriter;
