//! Session state and its two-phase turn state machine.
//!
//! Valid phase transitions:
//! - Idle -> AwaitingResponse (query dispatched)
//! - AwaitingResponse -> Idle (query settled, success or failure)

use std::fmt;

use talkql_core::{ConnectionInfo, ResponseModes, TranscriptEntry};
use uuid::Uuid;

use crate::controller::GENERIC_FALLBACK;
use crate::error::SessionError;

/// Phase of the query turn lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// No request in flight. Ready to send.
    Idle,
    /// A query has been dispatched and has not settled yet.
    AwaitingResponse,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "Idle"),
            SessionPhase::AwaitingResponse => write!(f, "AwaitingResponse"),
        }
    }
}

impl SessionPhase {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &SessionPhase) -> bool {
        matches!(
            (self, target),
            (SessionPhase::Idle, SessionPhase::AwaitingResponse)
                | (SessionPhase::AwaitingResponse, SessionPhase::Idle)
        )
    }
}

/// Everything a session owns.
///
/// Read freely through the accessors; mutated only by the controller and the
/// disconnect coordinator.
#[derive(Debug, Clone)]
pub struct SessionState {
    id: Uuid,
    connection: Option<ConnectionInfo>,
    transcript: Vec<TranscriptEntry>,
    phase: SessionPhase,
    welcome_retired: bool,
    modes: ResponseModes,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(ResponseModes::default())
    }
}

impl SessionState {
    /// A fresh, unconnected session with the given display toggles.
    pub fn new(modes: ResponseModes) -> Self {
        Self {
            id: Uuid::new_v4(),
            connection: None,
            transcript: Vec::new(),
            phase: SessionPhase::Idle,
            welcome_retired: false,
            modes,
        }
    }

    /// Identifier used to correlate log lines of one session.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn connection(&self) -> Option<&ConnectionInfo> {
        self.connection.as_ref()
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.phase == SessionPhase::AwaitingResponse
    }

    /// Whether the first message has been sent, which retires the welcome prompt.
    pub fn welcome_retired(&self) -> bool {
        self.welcome_retired
    }

    pub fn modes(&self) -> ResponseModes {
        self.modes
    }

    pub(crate) fn set_connection(&mut self, info: ConnectionInfo) {
        self.connection = Some(info);
    }

    pub(crate) fn set_modes(&mut self, modes: ResponseModes) {
        self.modes = modes;
    }

    pub(crate) fn push(&mut self, entry: TranscriptEntry) {
        self.transcript.push(entry);
    }

    pub(crate) fn retire_welcome(&mut self) {
        self.welcome_retired = true;
    }

    /// Attempt to move to `target`.
    pub(crate) fn transition(&mut self, target: SessionPhase) -> Result<(), SessionError> {
        if self.phase.can_transition_to(&target) {
            tracing::debug!(session_id = %self.id, "Session phase: {} -> {}", self.phase, target);
            self.phase = target;
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                from: self.phase,
                to: target,
            })
        }
    }

    /// End the session: forget the connection and the transcript.
    ///
    /// Display toggles survive; a new session id is issued.
    pub(crate) fn reset(&mut self) {
        tracing::debug!(session_id = %self.id, "Session state reset");
        *self = Self::new(self.modes);
    }
}

/// A query turn in flight.
///
/// Holds the session in `AwaitingResponse` and returns it to `Idle` when
/// dropped. A turn dropped before it settled still gets its assistant entry
/// (`GENERIC_FALLBACK`), so every user entry is followed by a reply.
pub(crate) struct InFlight<'a> {
    state: &'a mut SessionState,
    settled: bool,
}

impl<'a> InFlight<'a> {
    pub(crate) fn begin(state: &'a mut SessionState) -> Result<Self, SessionError> {
        state.transition(SessionPhase::AwaitingResponse)?;
        Ok(Self {
            state,
            settled: false,
        })
    }

    pub(crate) fn modes(&self) -> ResponseModes {
        self.state.modes
    }

    pub(crate) fn retire_welcome(&mut self) {
        self.state.retire_welcome();
    }

    /// Append the reply for this turn and release the session.
    pub(crate) fn settle(mut self, reply: TranscriptEntry) {
        self.state.push(reply);
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!(session_id = %self.state.id, "Query turn abandoned before settling");
            self.state.push(TranscriptEntry::assistant(GENERIC_FALLBACK));
        }
        if let Err(e) = self.state.transition(SessionPhase::Idle) {
            tracing::error!(session_id = %self.state.id, error = %e, "Failed to release turn");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
