//! Error types shared across the workspace.
//!
//! The `WatchError` enum unifies the failure cases of a watch run:
//! startup configuration, the roster fetch, the table extraction, and
//! snapshot persistence. None of them are recovered from; the first
//! occurrence aborts the run. A user-initiated interrupt is deliberately
//! NOT represented here, since the poll loop reports it as a successful
//! result carrying a run summary.
use std::io;

use thiserror::Error;

/// Unified error type for the roster watcher.
#[derive(Error, Debug)]
pub enum WatchError {
    /// Missing or invalid startup configuration, detected before the loop starts.
    #[error("Config error: {0}")]
    Config(String),

    /// Network failure, non-200 response, or unreadable body from the roster page.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// An expected roster row or cell was missing from the fetched page.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// I/O error originating from the standard library (snapshot files, directories).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding a snapshot via serde_json.
    #[error("JSON serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}
