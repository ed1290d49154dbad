//! Persisted log record.

use serde::{Deserialize, Serialize};

use crate::forwarder::ForwardResult;
use crate::submission::NormalizedSubmission;

/// Format of `LogEntry::timestamp`, local time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One pipeline run: what was sent and what came back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub form_data: NormalizedSubmission,
    pub api_response: ForwardResult,
}

impl LogEntry {
    /// Stamp a new entry with the current local time.
    pub fn now(form_data: NormalizedSubmission, api_response: ForwardResult) -> Self {
        Self {
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            form_data,
            api_response,
        }
    }
}
