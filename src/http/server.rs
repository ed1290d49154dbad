//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, timeout)
//! - Build the submission pipeline from configuration
//! - Apply config reloads to the live configuration
//! - Stop gracefully when the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    routing::{get, post},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::setup_admin_router;
use crate::config::{LiveConfig, RelayConfig};
use crate::forwarder::ApiForwarder;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::submit::{health, submit};
use crate::pipeline::SubmissionPipeline;
use crate::store::{LogStoreError, SubmissionLogStore};

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to open submission log: {0}")]
    Store(#[from] LogStoreError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: SubmissionPipeline,
    pub config: LiveConfig,
    pub started_at: Instant,
}

/// HTTP server for the form relay.
pub struct HttpServer {
    router: Router,
    config: LiveConfig,
}

impl HttpServer {
    /// Open the log store, build the forwarder and assemble the router.
    pub async fn from_config(config: RelayConfig) -> Result<Self, ServerError> {
        let log_path = config.log_store.path.clone();
        let live = crate::config::live(config);
        let store = SubmissionLogStore::open(log_path).await?;
        let forwarder = ApiForwarder::new(live.clone())?;
        let pipeline = SubmissionPipeline::new(forwarder, Arc::new(store));
        Ok(Self::new(live, pipeline))
    }

    /// Create a server around an existing pipeline.
    pub fn new(config: LiveConfig, pipeline: SubmissionPipeline) -> Self {
        let state = AppState {
            pipeline,
            config: config.clone(),
            started_at: Instant::now(),
        };
        let router = Self::build_router(&config.load(), state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/submissions", post(submit))
            .route("/health", get(health))
            .with_state(state.clone());

        if config.admin.enabled {
            router = router.merge(setup_admin_router(state));
        }

        router
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configurations arriving on `config_updates` replace the live config.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RelayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let live = self.config.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                tracing::info!(
                    endpoint = %new_config.forwarder.endpoint,
                    timeout_secs = new_config.forwarder.timeout_secs,
                    "Applying reloaded configuration"
                );
                live.store(Arc::new(new_config));
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a handle to the live config.
    pub fn config(&self) -> &LiveConfig {
        &self.config
    }
}
