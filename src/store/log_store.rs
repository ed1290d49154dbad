//! File-backed submission log.
//!
//! The whole log is one pretty-printed JSON array. Every append rewrites the
//! document: the new array goes to a uniquely named temp file next to the
//! target and is renamed over it, so readers only ever see complete arrays.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::forwarder::ForwardResult;
use crate::observability::metrics;
use crate::store::entry::LogEntry;
use crate::store::error::{LogStoreError, LogStoreResult};
use crate::submission::NormalizedSubmission;

/// Append-only log of submissions and their forwarding outcome.
///
/// Appends are serialized through an internal mutex, so one store instance
/// may be shared freely between request tasks. Separate processes writing
/// the same file are not coordinated.
#[derive(Debug)]
pub struct SubmissionLogStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SubmissionLogStore {
    /// Open the log at `path`, creating it (and its directory) as `[]` if needed.
    pub async fn open(path: impl Into<PathBuf>) -> LogStoreResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LogStoreError::io(parent, e))?;
        }

        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                file.write_all(b"[]")
                    .await
                    .map_err(|e| LogStoreError::io(&path, e))?;
                file.flush().await.map_err(|e| LogStoreError::io(&path, e))?;
                tracing::info!(path = %path.display(), "Created submission log");
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(LogStoreError::io(&path, e)),
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record one submission and its outcome, returning the stored entry.
    pub async fn append(
        &self,
        form_data: NormalizedSubmission,
        api_response: ForwardResult,
    ) -> LogStoreResult<LogEntry> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load().await?;
        let entry = LogEntry::now(form_data, api_response);
        entries.push(entry.clone());
        self.persist(&entries).await?;

        metrics::record_log_append();
        tracing::debug!(
            path = %self.path.display(),
            entries = entries.len(),
            "Submission log updated"
        );
        Ok(entry)
    }

    /// Every entry, oldest first.
    pub async fn read_all(&self) -> LogStoreResult<Vec<LogEntry>> {
        self.load().await
    }

    /// The last `n` entries, newest first.
    pub async fn read_recent(&self, n: usize) -> LogStoreResult<Vec<LogEntry>> {
        let entries = self.load().await?;
        Ok(entries.into_iter().rev().take(n).collect())
    }

    async fn load(&self) -> LogStoreResult<Vec<LogEntry>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LogStoreError::io(&self.path, e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| {
            tracing::error!(
                path = %self.path.display(),
                error = %source,
                "Submission log is unreadable"
            );
            LogStoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })
    }

    async fn persist(&self, entries: &[LogEntry]) -> LogStoreResult<()> {
        let payload = serde_json::to_vec_pretty(entries)?;

        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        tokio::fs::write(&temp_path, payload)
            .await
            .map_err(|e| LogStoreError::io(&temp_path, e))?;

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(LogStoreError::io(&self.path, e));
        }
        Ok(())
    }
}
