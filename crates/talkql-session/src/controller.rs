//! Query session controller: the single owner of a session's state.
//!
//! Every change to the session goes through one of its commands:
//! `start`, `send_message`, `set_visualization`, `set_tabular_mode` and
//! `disconnect`.

use std::sync::Arc;

use talkql_client::{QueryService, ServiceError};
use talkql_core::{ConnectionInfo, ResponseModes, SessionParams, TranscriptEntry, TurnRequest};

use crate::disconnect::DisconnectCoordinator;
use crate::error::SessionError;
use crate::formatter::ResponseFormatter;
use crate::navigation::NavigationPort;
use crate::resolver::ConnectionResolver;
use crate::state::{InFlight, SessionPhase, SessionState};

/// Reply text when the service rejected a query without explaining why.
pub const REJECTED_FALLBACK: &str = "Failed to get response";
/// Reply text when a query failed with no message at all.
pub const GENERIC_FALLBACK: &str = "Sorry, I encountered an error processing your query.";

/// How a settled query turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The service answered; a formatted reply was appended.
    Answered,
    /// The call failed; `message` was appended as the assistant reply.
    Failed {
        message: String,
        error: ServiceError,
    },
}

/// Drives one conversational session against a query service.
pub struct QuerySessionController<S, N> {
    service: Arc<S>,
    navigator: Arc<N>,
    formatter: ResponseFormatter,
    state: SessionState,
}

impl<S: QueryService, N: NavigationPort> QuerySessionController<S, N> {
    /// Create an idle, unconnected session with both toggles off.
    pub fn new(service: Arc<S>, navigator: Arc<N>) -> Self {
        Self::with_modes(service, navigator, ResponseModes::default())
    }

    /// Create an idle, unconnected session with the given initial toggles.
    pub fn with_modes(service: Arc<S>, navigator: Arc<N>, modes: ResponseModes) -> Self {
        Self {
            service,
            navigator,
            formatter: ResponseFormatter::new(),
            state: SessionState::new(modes),
        }
    }

    // -- Commands --

    /// Resolve the connected data source for this session.
    ///
    /// Runs the resolver once; later calls return the stored connection.
    /// On `ConnectionUnavailable` the host has already been asked to leave.
    pub async fn start(&mut self, params: &SessionParams) -> Result<ConnectionInfo, SessionError> {
        if let Some(info) = self.state.connection() {
            return Ok(info.clone());
        }
        let info = ConnectionResolver::new(&*self.service, &*self.navigator)
            .resolve(params)
            .await?;
        tracing::info!(session_id = %self.state.id(), connection = %info, "Session started");
        self.state.set_connection(info.clone());
        Ok(info)
    }

    pub fn set_visualization(&mut self, enabled: bool) {
        let modes = ResponseModes {
            visualization: enabled,
            ..self.state.modes()
        };
        self.state.set_modes(modes);
    }

    pub fn set_tabular_mode(&mut self, enabled: bool) {
        let modes = ResponseModes {
            tabular: enabled,
            ..self.state.modes()
        };
        self.state.set_modes(modes);
    }

    /// Send one user turn and wait for the reply.
    ///
    /// The user entry is appended before the request goes out, and exactly one
    /// assistant entry is appended when it settles: the formatted reply on
    /// success, an error message on failure. The session is back in `Idle`
    /// when this returns, and also if the returned future is dropped early.
    ///
    /// Turns never overlap: the pending future holds `&mut self` until the
    /// turn settles or is dropped.
    pub async fn send_message(&mut self, text: &str) -> Result<TurnOutcome, SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        debug_assert_eq!(self.state.phase(), SessionPhase::Idle);

        let session_id = self.state.id();
        self.state.push(TranscriptEntry::user(text));
        let mut turn = InFlight::begin(&mut self.state)?;
        turn.retire_welcome();

        let modes = turn.modes();
        let request = TurnRequest::new(text, modes);
        let result = self.service.query(&request).await;

        match result {
            Ok(response) => {
                tracing::debug!(%session_id, "Query answered");
                turn.settle(self.formatter.format(response, modes));
                Ok(TurnOutcome::Answered)
            }
            Err(error) => {
                tracing::warn!(%session_id, error = %error, "Query failed");
                let message = failure_message(&error);
                turn.settle(TranscriptEntry::assistant(message.clone()));
                Ok(TurnOutcome::Failed { message, error })
            }
        }
    }

    /// Disconnect the data source and end the session.
    ///
    /// On failure nothing changes and the error is returned for logging.
    pub async fn disconnect(&mut self) -> Result<(), SessionError> {
        DisconnectCoordinator::new(&*self.service, &*self.navigator)
            .disconnect(&mut self.state)
            .await
    }

    // -- Queries --

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        self.state.transcript()
    }

    pub fn connection(&self) -> Option<&ConnectionInfo> {
        self.state.connection()
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.state.is_awaiting_response()
    }

    /// Whether the empty-session prompt should still be displayed.
    pub fn shows_welcome(&self) -> bool {
        !self.state.welcome_retired()
    }

    pub fn modes(&self) -> ResponseModes {
        self.state.modes()
    }
}

/// Assistant-facing text for a failed query.
fn failure_message(error: &ServiceError) -> String {
    match (error.detail(), error) {
        (Some(detail), _) => detail.to_string(),
        (None, ServiceError::Rejected { .. }) => REJECTED_FALLBACK.to_string(),
        (None, _) => GENERIC_FALLBACK.to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
