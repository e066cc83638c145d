//! Domain types shared by the client, session and terminal crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder shown when the service reports a connection without a name.
pub const DEFAULT_SOURCE_NAME: &str = "Database";

/// Source type used when the service omits `db_type`.
pub const UNKNOWN_SOURCE_TYPE: &str = "unknown";

// =============================================================================
// Connection
// =============================================================================

/// Identity of the data source a session is talking to.
///
/// Created once per session and immutable until the session is torn down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Engine kind, e.g. `postgres` or `mysql`.
    pub source_type: String,
    /// Display name of the database.
    pub source_name: String,
}

impl ConnectionInfo {
    pub fn new(source_type: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            source_name: source_name.into(),
        }
    }

    /// Two-letter upper-case badge for the source type (`postgres` -> `PO`).
    pub fn badge(&self) -> String {
        self.source_type
            .chars()
            .take(2)
            .collect::<String>()
            .to_uppercase()
    }
}

impl fmt::Display for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.source_name, self.source_type)
    }
}

/// Parameters handed over by the step that established the connection.
///
/// Mirrors the `dbType` / `dbName` query-string pair of a deep link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionParams {
    pub db_type: Option<String>,
    pub db_name: Option<String>,
}

impl SessionParams {
    pub fn new(db_type: Option<String>, db_name: Option<String>) -> Self {
        Self { db_type, db_name }
    }

    /// Parse a URL query string such as `?dbType=postgres&dbName=shop`.
    ///
    /// Unknown keys are ignored; for repeated keys the first value wins.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "dbType" if params.db_type.is_none() => params.db_type = Some(value.into_owned()),
                "dbName" if params.db_name.is_none() => params.db_name = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }

    /// The connection named explicitly by these parameters.
    ///
    /// Only returns a value when both the type and the name are present and
    /// non-empty.
    pub fn explicit_connection(&self) -> Option<ConnectionInfo> {
        let db_type = self.db_type.as_deref().filter(|s| !s.is_empty())?;
        let db_name = self.db_name.as_deref().filter(|s| !s.is_empty())?;
        Some(ConnectionInfo::new(db_type, db_name))
    }
}

// =============================================================================
// Turns
// =============================================================================

/// Opaque chart/graph data attached to a reply.
pub type VisualizationPayload = serde_json::Value;

/// Display toggles active for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseModes {
    /// Ask the service for a visualization payload.
    pub visualization: bool,
    /// Render results as tables.
    pub tabular: bool,
}

/// A single query request. Serializes to the `/query` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnRequest {
    #[serde(rename = "query")]
    pub text: String,
    #[serde(rename = "vizEnabled")]
    pub visualization_enabled: bool,
    #[serde(rename = "tabularMode")]
    pub tabular_mode_enabled: bool,
}

impl TurnRequest {
    pub fn new(text: impl Into<String>, modes: ResponseModes) -> Self {
        Self {
            text: text.into(),
            visualization_enabled: modes.visualization,
            tabular_mode_enabled: modes.tabular,
        }
    }
}

/// A successful `/query` reply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TurnResponse {
    #[serde(default)]
    pub query_used: Option<String>,
    pub query_result: String,
    #[serde(rename = "viz_result", default)]
    pub visualization_payload: Option<VisualizationPayload>,
}

// =============================================================================
// Transcript
// =============================================================================

/// Author of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One line of the conversation. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization_payload: Option<VisualizationPayload>,
    /// Whether visualization was requested for this turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization_was_enabled: Option<bool>,
    /// Whether tabular mode was active for this turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tabular_mode_was_enabled: Option<bool>,
}

impl TranscriptEntry {
    /// A user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    /// An assistant reply without display metadata (used for error replies).
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            visualization_payload: None,
            visualization_was_enabled: None,
            tabular_mode_was_enabled: None,
        }
    }

    /// Whether the renderer should draw the visualization for this entry.
    pub fn shows_visualization(&self) -> bool {
        self.visualization_was_enabled == Some(true) && self.visualization_payload.is_some()
    }
}
