//! Form submission relay library.

pub mod admin;
pub mod config;
pub mod forwarder;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod store;
pub mod submission;

pub use config::schema::RelayConfig;
pub use forwarder::{ApiForwarder, ForwardResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::{PipelineError, SubmissionPipeline};
pub use store::{LogEntry, SubmissionLogStore};
pub use submission::{normalize, EntryRecord, FormDefinition, NormalizedSubmission};
