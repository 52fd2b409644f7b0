//! Client-side session orchestration for the subtitle rendering service.
//!
//! [`SessionOrchestrator`] sequences upload, style configuration, submission
//! and display of the rendered result. [`TransferCodec`] turns the base64
//! payloads returned by the service into addressable blobs, and
//! [`SessionLifecycle`] makes sure the server-side session is cleaned up once.

pub mod codec;
pub mod lifecycle;
pub mod orchestrator;

#[cfg(test)]
mod testing;

pub use codec::{Blob, TransferCodec};
pub use lifecycle::SessionLifecycle;
pub use orchestrator::{
    FailureReport, IgnoreReason, Outcome, SessionOrchestrator, SessionState,
    DEFAULT_MAX_UPLOAD_BYTES,
};
