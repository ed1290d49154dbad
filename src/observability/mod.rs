//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! pipeline, forwarder, store
//!     → logging.rs (structured log events, request_id span field)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
