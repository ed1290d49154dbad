//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (assign / propagate x-request-id)
//!     → submit.rs (decode SubmissionEvent, run pipeline)
//!     → 202 / 422 / 500 JSON response
//! ```

pub mod request;
pub mod server;
pub mod submit;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, ServerError};
pub use submit::{SubmissionAccepted, SubmissionEvent, SubmissionFailed};
