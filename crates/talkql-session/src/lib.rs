//! Conversational query session for TalkQL.
//!
//! Resolves the connected data source at session start, runs query turns
//! against the remote service, formats replies into an append-only
//! transcript and coordinates disconnects. The session moves through a
//! strict two-phase state machine: Idle -> AwaitingResponse -> Idle.

pub mod controller;
pub mod disconnect;
pub mod error;
pub mod formatter;
pub mod navigation;
pub mod resolver;
pub mod state;

pub use controller::{QuerySessionController, TurnOutcome};
pub use disconnect::DisconnectCoordinator;
pub use error::SessionError;
pub use formatter::{highlight_table_names, ResponseFormatter};
pub use navigation::{NavigationPort, RecordingNavigator};
pub use resolver::ConnectionResolver;
pub use state::{SessionPhase, SessionState};
