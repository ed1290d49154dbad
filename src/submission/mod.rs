//! Submission normalization subsystem.
//!
//! # Data Flow
//! ```text
//! EntryRecord + FormDefinition (host-supplied, read-only)
//!     → normalize.rs (skip metadata and blank answers, resolve labels)
//!     → NormalizedSubmission (immutable, JSON-serializable)
//! ```
//!
//! # Design Decisions
//! - Field ids are compared as canonical integers, never as strings
//! - Output order is entry key order, not form definition order
//! - Multi-value answers collapse to one string

pub mod ids;
pub mod model;
pub mod normalize;

pub use ids::{FieldId, FieldKey, FormId};
pub use model::{EntryRecord, FieldDefinition, FormDefinition, NormalizedSubmission, SubmissionField};
pub use normalize::{normalize, NormalizeError};
