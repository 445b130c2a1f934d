// Error types shared across the ledger, store and config layers.
// Read-side problems never surface here: load() degrades to an empty ledger.

use crate::validation::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a `KvStore` backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded for key {key}")]
    QuotaExceeded { key: String },
    #[error("storage io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid event name: {0:?}")]
    InvalidEvent(ValidationError),
    #[error("claim failed, please retry: {0}")]
    Storage(#[from] StoreError),
    #[error("failed to encode ledger: {0}")]
    Encode(#[from] serde_json::Error),
}

impl LedgerError {
    /// True when retrying the same claim may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Storage(_))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}
