use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::pipeline::PipelineError;
use crate::submission::{EntryRecord, FormDefinition};

/// Body of `POST /submissions`: one completed form submission.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmissionEvent {
    pub entry: EntryRecord,
    pub form: FormDefinition,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionAccepted {
    pub request_id: String,
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionFailed {
    pub request_id: String,
    pub error: String,
}

/// Run the pipeline for one submission event.
///
/// Answers 202 once the attempt is logged, whether or not the API accepted it.
/// The pipeline runs on its own task so a timed out or disconnected caller
/// cannot stop a forwarded submission from reaching the log.
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(event): Json<SubmissionEvent>,
) -> impl IntoResponse {
    let request_id = request_id(&headers);
    let span = tracing::info_span!("submission", request_id = %request_id);

    let pipeline = state.pipeline.clone();
    let task = tokio::spawn(
        async move { pipeline.on_submission(&event.entry, &event.form).await }.instrument(span),
    );

    let (status, error) = match task.await {
        Ok(Ok(logged)) => {
            return (
                StatusCode::ACCEPTED,
                Json(SubmissionAccepted {
                    request_id,
                    success: logged.api_response.success,
                    message: logged.api_response.message,
                    timestamp: logged.timestamp,
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Submission task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "submission task failed".to_string())
        }
        Ok(Err(e @ PipelineError::Invalid(_))) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        Ok(Err(e @ PipelineError::Log(_))) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    (status, Json(SubmissionFailed { request_id, error })).into_response()
}

pub async fn health() -> &'static str {
    "ok"
}
