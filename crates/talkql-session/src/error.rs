//! Error types for the query session.

use crate::state::SessionPhase;

/// Errors surfaced by session operations.
///
/// Failed query turns are not errors: they are recorded in the transcript
/// and reported through `TurnOutcome::Failed`.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no data source connected: {0}")]
    ConnectionUnavailable(String),
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("invalid session transition: {from} -> {to}")]
    InvalidTransition {
        from: SessionPhase,
        to: SessionPhase,
    },
    #[error("disconnect failed: {0}")]
    DisconnectFailed(String),
}
