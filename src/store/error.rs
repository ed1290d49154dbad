//! Log store error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing the submission log.
#[derive(Debug, Error)]
pub enum LogStoreError {
    /// The file or its directory could not be read, created or replaced.
    #[error("submission log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but does not hold a JSON array of log entries.
    ///
    /// Appends refuse to run in this state so existing history is never
    /// replaced by a fresh array.
    #[error("submission log {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode submission log: {0}")]
    Encode(#[from] serde_json::Error),
}

impl LogStoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for log store operations.
pub type LogStoreResult<T> = Result<T, LogStoreError>;
