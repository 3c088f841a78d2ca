//! Filings Ingest - loads quarterly financial statement data sets

use anyhow::{Context, Result};
use clap::Parser;
use filings_common::logging::{init_logging, LogConfig, LogLevel};
use filings_ingest::{
    default_database_path, parse_archive_list, select_period_archives, EntityKind, FilingStore,
    Fetcher, IngestConfig, IngestError, IngestPipeline, MemoryStore, SqliteStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "filings-ingest")]
#[command(author, version, about = "Load financial statement data sets into SQLite")]
struct Cli {
    /// Archive URLs to ingest, in order
    urls: Vec<String>,

    /// Destination database (default: filings_<year>.db, or filings.db)
    #[arg(short, long, env = "FILINGS_DATABASE")]
    database: Option<PathBuf>,

    /// Keep only the archives published for this year
    #[arg(short, long)]
    year: Option<i32>,

    /// File listing archive URLs, one per line
    #[arg(short, long)]
    archives_file: Option<PathBuf>,

    /// Records per insert batch
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Download cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Do not load the ticker table
    #[arg(long)]
    skip_tickers: bool,

    /// Decode everything but keep records in memory instead of a database
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn ingest_config(&self) -> IngestConfig {
        let mut config = IngestConfig::from_env();
        if let Some(batch_size) = self.batch_size {
            config = config.with_batch_size(batch_size);
        }
        if let Some(cache_dir) = &self.cache_dir {
            config = config.with_cache_dir(cache_dir.clone());
        }
        if self.skip_tickers {
            config = config.with_load_tickers(false);
        }
        config
    }

    async fn archive_urls(&self) -> Result<Vec<String>> {
        let mut urls = self.urls.clone();
        if let Some(path) = &self.archives_file {
            let contents = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read archive list {}", path.display()))?;
            urls.extend(parse_archive_list(&contents));
        }

        let urls = match self.year {
            Some(year) => select_period_archives(&urls, year)?,
            None if urls.is_empty() => {
                return Err(IngestError::NoArchives("the command line".to_string()).into());
            },
            None => urls,
        };
        Ok(urls)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("filings-ingest")
        .build();

    // Environment variables take precedence
    let log_config = log_config.merge_env()?;
    let _guard = init_logging(&log_config)?;

    let config = cli.ingest_config();
    config.validate()?;
    let urls = cli.archive_urls().await?;

    let fetcher = Fetcher::new(&config)?;
    let database = cli
        .database
        .clone()
        .unwrap_or_else(|| default_database_path(cli.year));

    let (store, sqlite): (Arc<dyn FilingStore>, Option<SqliteStore>) = if cli.dry_run {
        info!("Dry run, records are decoded and counted but not stored");
        (Arc::new(MemoryStore::counting()), None)
    } else {
        let sqlite = SqliteStore::create(&database).await?;
        (Arc::new(sqlite.clone()), Some(sqlite))
    };

    info!(archives = urls.len(), batch_size = config.batch_size, "Starting ingestion");
    let mut pipeline = IngestPipeline::new(config, store, fetcher);
    let stats = pipeline.run(&urls).await?;

    for kind in EntityKind::ALL {
        info!(kind = %kind, table = kind.table_name(), records = stats.records_of(kind), "Loaded");
    }

    if let Some(sqlite) = sqlite {
        sqlite.close().await;
        info!(
            path = %database.display(),
            "Processing complete. Open the database with `sqlite3 {}`",
            database.display()
        );
    }

    Ok(())
}
