use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::store::LogEntry;

/// Rows returned when no `limit` is given.
pub const DEFAULT_RECENT_LIMIT: usize = 10;
const MAX_RECENT_LIMIT: usize = 500;

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
    pub endpoint: String,
    pub log_path: String,
    pub uptime_secs: u64,
}

/// One line of the recent-submissions listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRow {
    pub timestamp: String,
    /// `"<title> (ID: <id>)"`.
    pub form: String,
    /// `"Success"` or `"Error"`.
    pub status: String,
    pub details: LogEntry,
}

impl From<LogEntry> for SubmissionRow {
    fn from(entry: LogEntry) -> Self {
        Self {
            timestamp: entry.timestamp.clone(),
            form: format!(
                "{} (ID: {})",
                entry.form_data.form_title, entry.form_data.form_id
            ),
            status: if entry.api_response.success {
                "Success"
            } else {
                "Error"
            }
            .to_string(),
            details: entry,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let config = state.config.load_full();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        endpoint: config.forwarder.endpoint.clone(),
        log_path: state.pipeline.store().path().display().to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// Most recent submissions, newest first.
pub async fn get_submissions(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<SubmissionRow>>, (StatusCode, String)> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .min(MAX_RECENT_LIMIT);

    match state.pipeline.store().read_recent(limit).await {
        Ok(entries) => Ok(Json(entries.into_iter().map(SubmissionRow::from).collect())),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read submission log");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
