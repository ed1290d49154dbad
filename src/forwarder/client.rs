//! HTTP client that delivers normalized submissions to the configured API.
//!
//! # Responsibilities
//! - POST the submission as JSON with a client-side timeout
//! - Turn every outcome, including transport errors, into a `ForwardResult`
//! - Pick up endpoint and timeout changes from the live config

use std::error::Error as StdError;
use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;

use crate::config::LiveConfig;
use crate::forwarder::types::ForwardResult;
use crate::observability::metrics;
use crate::submission::NormalizedSubmission;

/// Forwards submissions to `forwarder.endpoint`. No retries.
#[derive(Clone)]
pub struct ApiForwarder {
    client: reqwest::Client,
    config: LiveConfig,
}

impl ApiForwarder {
    /// Create a forwarder reading its target from the live config.
    pub fn new(config: LiveConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("form-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    /// Send one submission and classify the outcome. Never fails.
    pub async fn forward(&self, data: &NormalizedSubmission) -> ForwardResult {
        let config = self.config.load_full();
        let endpoint = config.forwarder.endpoint.as_str();
        let timeout = Duration::from_secs(config.forwarder.timeout_secs);
        let start = Instant::now();

        let body = match serde_json::to_vec(data) {
            Ok(body) => body,
            Err(e) => return ForwardResult::transport_failure(e.to_string()),
        };

        let sent = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .timeout(timeout)
            .body(body)
            .send()
            .await;

        let result = match sent {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(text) => ForwardResult::from_response(status, text),
                    Err(e) => ForwardResult::transport_failure(describe(&e)),
                }
            }
            Err(e) => ForwardResult::transport_failure(describe(&e)),
        };

        metrics::record_forward(result.success, start);
        if result.success {
            tracing::debug!(endpoint = %endpoint, "Submission delivered");
        } else {
            tracing::warn!(endpoint = %endpoint, message = %result.message, "Submission not accepted");
        }
        result
    }
}

impl std::fmt::Debug for ApiForwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let config = self.config.load();
        f.debug_struct("ApiForwarder")
            .field("endpoint", &config.forwarder.endpoint)
            .field("timeout_secs", &config.forwarder.timeout_secs)
            .finish()
    }
}

/// The error and its causes on one line.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
