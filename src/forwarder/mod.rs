//! API forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! NormalizedSubmission
//!     → client.rs (JSON POST, 45s default timeout)
//!     → types.rs (2xx / non-2xx / transport failure)
//!     → ForwardResult (always populated)
//! ```
//!
//! # Design Decisions
//! - A failed delivery is a value, not an error; the pipeline logs it and moves on
//! - No retries, no queueing, no auth headers

pub mod client;
pub mod types;

pub use client::ApiForwarder;
pub use types::{ForwardResult, SUCCESS_MESSAGE};
