//! Ingestion configuration
//!
//! Environment-based configuration for archive download and loading

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{IngestError, Result};

pub const DEFAULT_CACHE_DIR: &str = ".cache";
pub const DEFAULT_BATCH_SIZE: usize = 500;
pub const MAX_BATCH_SIZE: usize = 10_000;
pub const DEFAULT_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 1800;

fn default_user_agent() -> String {
    format!("filings-ingest/{} (admin@example.com)", env!("CARGO_PKG_VERSION"))
}

/// Configuration for one ingestion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Directory holding downloaded archives (default: .cache)
    pub cache_dir: PathBuf,

    /// Records buffered per kind before a batch insert
    pub batch_size: usize,

    /// Ticker feed location
    pub tickers_url: String,

    /// User-Agent sent with every request. The publisher rejects requests
    /// without a contact address.
    pub user_agent: String,

    /// Whole-request timeout in seconds; quarterly archives run to hundreds of MB
    pub request_timeout_secs: u64,

    /// Load the ticker table before the archives
    pub load_tickers: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            batch_size: DEFAULT_BATCH_SIZE,
            tickers_url: DEFAULT_TICKERS_URL.to_string(),
            user_agent: default_user_agent(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            load_tickers: true,
        }
    }
}

impl IngestConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - FILINGS_CACHE_DIR
    /// - FILINGS_BATCH_SIZE
    /// - FILINGS_TICKERS_URL
    /// - FILINGS_USER_AGENT
    /// - FILINGS_REQUEST_TIMEOUT_SECS
    /// - FILINGS_LOAD_TICKERS
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_dir: env::var("FILINGS_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),

            batch_size: env::var("FILINGS_BATCH_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.batch_size),

            tickers_url: env::var("FILINGS_TICKERS_URL").unwrap_or(defaults.tickers_url),

            user_agent: env::var("FILINGS_USER_AGENT").unwrap_or(defaults.user_agent),

            request_timeout_secs: env::var("FILINGS_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),

            load_tickers: env::var("FILINGS_LOAD_TICKERS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.load_tickers),
        }
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_tickers_url(mut self, url: impl Into<String>) -> Self {
        self.tickers_url = url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn with_load_tickers(mut self, load_tickers: bool) -> Self {
        self.load_tickers = load_tickers;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(IngestError::config("Batch size must be greater than 0"));
        }

        if self.batch_size > MAX_BATCH_SIZE {
            return Err(IngestError::config(format!(
                "Batch size too large (max {})",
                MAX_BATCH_SIZE
            )));
        }

        if self.user_agent.trim().is_empty() {
            return Err(IngestError::config("User agent cannot be empty"));
        }

        if self.request_timeout_secs == 0 {
            return Err(IngestError::config("Request timeout must be greater than 0"));
        }

        if self.load_tickers && self.tickers_url.is_empty() {
            return Err(IngestError::config(
                "Tickers URL cannot be empty when ticker loading is enabled",
            ));
        }

        Ok(())
    }
}
