//! Typed errors for the library layers. The UI wraps these in `anyhow` and shows
//! the message of the first one found in the chain, so the `#[error]` strings
//! double as the text users read in the footer. Underlying causes go to the log.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by [`crate::db::AgendaStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open agenda database at {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to create data directory {path}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare agenda table")]
    Schema(#[source] rusqlite::Error),
    #[error("failed to {action}")]
    Query {
        action: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to close agenda database")]
    Close(#[source] rusqlite::Error),
}

impl StoreError {
    pub(crate) fn query(action: &'static str) -> impl FnOnce(rusqlite::Error) -> StoreError {
        move |source| StoreError::Query { action, source }
    }
}

/// Failures raised while exporting or importing JSON files.
#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode agenda as JSON")]
    Encode(#[source] serde_json::Error),
    #[error("file is neither an agenda export nor a list of agenda entries")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },
}
