//! Error types for the ingestion pipeline
//!
//! Every variant here is fatal for a run. Field-level decode problems (a bad
//! integer or decimal token) never surface as errors; they are logged and
//! replaced by a substitute value inside the decoders.

use std::path::PathBuf;
use thiserror::Error;

use crate::decoder::DecodeError;
use crate::models::EntityKind;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    /// File system operation failed (cache directory, temp file, rename)
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport failed before a response was complete
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Download of {url} failed with HTTP status {status}")]
    Http { url: String, status: u16 },

    /// Archive is not a readable zip file or an entry could not be opened
    #[error("Malformed archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Batch insert or schema statement failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Ticker feed was not the expected JSON shape
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A data row violated the positional layout of its table
    #[error("{entry} line {line}: {source}")]
    Format {
        entry: String,
        line: usize,
        #[source]
        source: DecodeError,
    },

    /// A batch handed to the store contained a record of another kind
    #[error("Batch for {expected} contained a {actual} record")]
    RecordKindMismatch {
        expected: EntityKind,
        actual: EntityKind,
    },

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Destination database already exists; runs never update in place
    #[error("Destination {0} already exists. Differential updates are not supported; move or rename it to rebuild.")]
    DestinationExists(PathBuf),

    /// Nothing to ingest for the requested period
    #[error("No archives found for {0}")]
    NoArchives(String),
}

impl IngestError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Attach entry and line context to a structural decode failure
    pub fn format(entry: impl Into<String>, line: usize, source: DecodeError) -> Self {
        Self::Format {
            entry: entry.into(),
            line,
            source,
        }
    }
}
