//! One submission, start to finish: normalize → forward → log.

use std::sync::Arc;

use thiserror::Error;

use crate::forwarder::ApiForwarder;
use crate::observability::metrics;
use crate::store::{LogEntry, LogStoreError, SubmissionLogStore};
use crate::submission::{normalize, EntryRecord, FormDefinition, NormalizeError};

/// Why a submission could not be recorded.
///
/// A failed delivery is not an error; it is logged like any other outcome.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The host sent an entry without required metadata. Nothing was sent or logged.
    #[error("invalid submission: {0}")]
    Invalid(#[from] NormalizeError),

    /// The forwarding attempt happened but could not be written to the log.
    #[error("failed to log submission: {0}")]
    Log(#[from] LogStoreError),
}

/// Runs the relay pipeline for each submission event.
#[derive(Debug, Clone)]
pub struct SubmissionPipeline {
    forwarder: ApiForwarder,
    store: Arc<SubmissionLogStore>,
}

impl SubmissionPipeline {
    pub fn new(forwarder: ApiForwarder, store: Arc<SubmissionLogStore>) -> Self {
        Self { forwarder, store }
    }

    /// The log this pipeline appends to.
    pub fn store(&self) -> &Arc<SubmissionLogStore> {
        &self.store
    }

    /// Handle one submitted entry. Returns the log entry that was written.
    #[tracing::instrument(skip_all, fields(form_id = %form.id))]
    pub async fn on_submission(
        &self,
        entry: &EntryRecord,
        form: &FormDefinition,
    ) -> Result<LogEntry, PipelineError> {
        let form_data = normalize(entry, form).inspect_err(|e| {
            metrics::record_submission("invalid");
            tracing::warn!(error = %e, "Rejected submission");
        })?;

        let api_response = self.forwarder.forward(&form_data).await;
        let success = api_response.success;

        let logged = self
            .store
            .append(form_data, api_response)
            .await
            .inspect_err(|e| {
                metrics::record_submission("log_failed");
                tracing::error!(error = %e, "Submission forwarded but not logged");
            })?;

        metrics::record_submission(if success { "delivered" } else { "rejected" });
        tracing::info!(
            success,
            fields = logged.form_data.fields.len(),
            message = %logged.api_response.message,
            "Submission processed"
        );
        Ok(logged)
    }
}
