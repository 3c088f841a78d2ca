//! Cached archive downloads
//!
//! Archives are cached under `<cache_dir>/<md5(url)>`. A cached file is only
//! ever produced by renaming a completed `<md5(url)>.tmp`, so an interrupted
//! download never leaves a file that looks like a cache hit.

use futures::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};

/// Bytes between download progress events
const PROGRESS_INTERVAL: u64 = 8 * 1024 * 1024;

/// HTTP client bound to a local archive cache
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    cache_dir: PathBuf,
}

impl Fetcher {
    pub fn new(config: &IngestConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            cache_dir: config.cache_dir.clone(),
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Lowercase hex MD5 of the URL string
    pub fn cache_key(url: &str) -> String {
        format!("{:x}", md5::compute(url.as_bytes()))
    }

    pub fn cache_path(&self, url: &str) -> PathBuf {
        self.cache_dir.join(Self::cache_key(url))
    }

    /// Return a local path holding the body of `url`, downloading it on a
    /// cache miss.
    pub async fn fetch(&self, url: &str) -> Result<PathBuf> {
        let path = self.cache_path(url);
        if fs::try_exists(&path).await? {
            debug!(url, path = %path.display(), "Cache hit");
            return Ok(path);
        }

        fs::create_dir_all(&self.cache_dir).await?;
        let tmp_path = path.with_extension("tmp");

        info!(url, path = %path.display(), "Downloading archive");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // A leftover from an interrupted run is truncated here
        let mut file = fs::File::create(&tmp_path).await?;
        let mut downloaded = 0u64;
        let mut next_report = PROGRESS_INTERVAL;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            if downloaded >= next_report {
                debug!(url, bytes = downloaded, "Download progress");
                next_report += PROGRESS_INTERVAL;
            }
        }

        file.flush().await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp_path, &path).await?;

        info!(url, bytes = downloaded, path = %path.display(), "Download complete");
        Ok(path)
    }

    /// Uncached GET returning the whole body
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "Fetching");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_md5_hex_of_url() {
        // md5("") is the well-known empty digest
        assert_eq!(Fetcher::cache_key(""), "d41d8cd98f00b204e9800998ecf8427e");

        let key = Fetcher::cache_key("https://example.com/2021q1.zip");
        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(key, Fetcher::cache_key("https://example.com/2021q1.zip"));
        assert_ne!(key, Fetcher::cache_key("https://example.com/2021q2.zip"));
    }

    #[test]
    fn test_cache_path_under_cache_dir() {
        let config = IngestConfig::default().with_cache_dir("/var/cache/filings");
        let fetcher = Fetcher::new(&config).unwrap();
        let url = "https://example.com/2021q1.zip";
        assert_eq!(
            fetcher.cache_path(url),
            PathBuf::from("/var/cache/filings").join(Fetcher::cache_key(url))
        );
    }
}
