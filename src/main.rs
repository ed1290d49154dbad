//! form-relay
//!
//! Receives completed form submissions, forwards each one to an HTTP API and
//! keeps a JSON audit log of every attempt.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌────────────────────────────────────────────────────────┐
//!                       │                      FORM RELAY                        │
//!                       │                                                        │
//!   POST /submissions   │  ┌─────────┐   ┌────────────┐   ┌───────────┐          │
//!   ────────────────────┼─▶│  http   │──▶│ submission │──▶│ forwarder │──────────┼──▶ API endpoint
//!                       │  │ server  │   │ normalize  │   │  (POST)   │          │
//!                       │  └─────────┘   └────────────┘   └─────┬─────┘          │
//!                       │                                       │ ForwardResult  │
//!                       │                                       ▼                │
//!   GET /admin/...      │  ┌─────────┐                    ┌───────────┐          │
//!   ────────────────────┼─▶│  admin  │───── read_recent ─▶│   store   │──────────┼──▶ form_submissions.json
//!                       │  └─────────┘                    └───────────┘          │
//!                       │                                                        │
//!                       │  config (TOML + env + flags, hot reload)               │
//!                       │  observability (tracing, prometheus) · lifecycle       │
//!                       └────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use form_relay::config::{ConfigOverrides, ConfigSource};
use form_relay::lifecycle::startup;
use form_relay::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "form-relay", version)]
#[command(about = "Forward form submissions to an HTTP API and keep an audit log", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "FORM_RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// API endpoint receiving normalized submissions.
    #[arg(long, env = "FORM_RELAY_ENDPOINT")]
    endpoint: Option<String>,

    /// Address to accept submissions on.
    #[arg(long, env = "FORM_RELAY_BIND")]
    bind: Option<String>,

    /// Submission log file.
    #[arg(long, env = "FORM_RELAY_LOG_PATH")]
    log_path: Option<String>,

    /// Bearer token for the admin routes.
    #[arg(long, env = "FORM_RELAY_ADMIN_KEY", hide_env_values = true)]
    admin_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let source = ConfigSource {
        path: cli.config,
        overrides: ConfigOverrides {
            endpoint: cli.endpoint,
            bind_address: cli.bind,
            log_path: cli.log_path,
            admin_key: cli.admin_key,
        },
    };

    let config = source.load()?;
    init_logging(&config.observability);
    tracing::info!("form-relay v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(source, config).await
}
