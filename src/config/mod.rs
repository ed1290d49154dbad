//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → config file (TOML, optional)
//!     → overrides (CLI flags / FORM_RELAY_* env vars)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared via ArcSwap with the forwarder and admin handlers
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs resolves the same source again
//!     → atomic swap of Arc<RelayConfig>
//!     → next submission uses the new endpoint
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Listener and log path changes need a restart; only per-request values
//!   (endpoint, timeout, admin key) take effect on reload

use std::sync::Arc;

use arc_swap::ArcSwap;

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{ConfigError, ConfigOverrides, ConfigSource};
pub use schema::{
    AdminConfig, ForwarderConfig, ListenerConfig, LogFormat, LogStoreConfig, ObservabilityConfig,
    RelayConfig, SecurityConfig, TimeoutConfig,
};

/// The configuration currently in effect, swapped atomically on reload.
pub type LiveConfig = Arc<ArcSwap<RelayConfig>>;

/// Wrap a validated configuration for sharing.
pub fn live(config: RelayConfig) -> LiveConfig {
    Arc::new(ArcSwap::from_pointee(config))
}
