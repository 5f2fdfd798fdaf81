//! Error taxonomy for the sync handlers.
//!
//! ERROR HANDLING
//! ==============
//! None of these conditions are fatal. Handlers return them so the session
//! can log the cause, and the cycle degrades to "do nothing". The next
//! trigger starts from scratch.

use crate::shared::SharedStateError;

/// Stable machine-readable code for an error, used in structured logs.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A collaborator the handler depends on has not signalled readiness yet.
    #[error("not ready: {0}")]
    NotReady(&'static str),
    /// The shared `view_matrix` value does not have the expected shape.
    #[error("malformed remote state: {0}")]
    MalformedRemoteState(String),
    /// Writing the local view into the shared state failed.
    #[error("publish failed: {0}")]
    PublishFailed(#[from] SharedStateError),
}

impl ErrorCode for SyncError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotReady(_) => "E_NOT_READY",
            Self::MalformedRemoteState(_) => "E_MALFORMED_REMOTE_STATE",
            Self::PublishFailed(_) => "E_PUBLISH_FAILED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::NotReady(_) | Self::PublishFailed(_))
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
