//! Submission log persistence.
//!
//! # Data Flow
//! ```text
//! NormalizedSubmission + ForwardResult
//!     → entry.rs (timestamped LogEntry)
//!     → log_store.rs (lock → read → push → temp write → rename)
//!     → one JSON array on disk
//!
//! Admin reads:
//!     log_store.rs read_recent(n) → newest first
//! ```
//!
//! # Design Decisions
//! - The file is the only durable state the relay owns
//! - A corrupt file fails the append instead of being replaced
//! - No schema versioning; entries are read back with the current types

pub mod entry;
pub mod error;
pub mod log_store;

pub use entry::{LogEntry, TIMESTAMP_FORMAT};
pub use error::{LogStoreError, LogStoreResult};
pub use log_store::SubmissionLogStore;
