//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Every problem is
//! reported, not just the first, and nothing here touches the network or
//! the filesystem.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RelayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("forwarder.endpoint '{endpoint}' is not a valid URL: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("forwarder.endpoint '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),

    #[error("{field} '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs ({request_secs}) must exceed forwarder.timeout_secs ({forward_secs})")]
    RequestTimeoutTooShort { request_secs: u64, forward_secs: u64 },

    #[error("log_store.path must not be empty")]
    EmptyLogPath,

    #[error("admin.api_key must not be empty when admin is enabled")]
    EmptyAdminKey,
}

/// Validate a loaded configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.forwarder.endpoint) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(_) => errors.push(ValidationError::UnsupportedScheme(
            config.forwarder.endpoint.clone(),
        )),
        Err(e) => errors.push(ValidationError::InvalidEndpoint {
            endpoint: config.forwarder.endpoint.clone(),
            reason: e.to_string(),
        }),
    }

    if config.forwarder.timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("forwarder.timeout_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.request_secs"));
    }
    if config.forwarder.timeout_secs > 0
        && config.timeouts.request_secs > 0
        && config.timeouts.request_secs <= config.forwarder.timeout_secs
    {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request_secs: config.timeouts.request_secs,
            forward_secs: config.forwarder.timeout_secs,
        });
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroValue("security.max_body_size"));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.log_store.path.trim().is_empty() {
        errors.push(ValidationError::EmptyLogPath);
    }
    if config.admin.enabled && config.admin.api_key.is_empty() {
        errors.push(ValidationError::EmptyAdminKey);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
