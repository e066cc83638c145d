//! Turns raw query replies into transcript entries.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use talkql_core::{ResponseModes, Role, TranscriptEntry, TurnResponse};

/// Label in front of the generated query.
pub const QUERY_LABEL: &str = "SQL Query Used:";
/// Shown in the code block when the service did not report its query.
pub const QUERY_PLACEHOLDER: &str = "Query not available";
/// Label in front of the query result.
pub const RESULT_LABEL: &str = "Result:";

static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("Invalid emphasis regex"));

/// Rewrite `**name**` emphasis to `__name__`.
///
/// The service marks table names with asterisks; the transcript renders them
/// with underscores. Text without asterisk pairs is returned as-is.
pub fn highlight_table_names(text: &str) -> Cow<'_, str> {
    EMPHASIS.replace_all(text, "__${1}__")
}

/// Builds assistant transcript entries from successful query replies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseFormatter;

impl ResponseFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Format `response` for display, recording the toggles active for the turn.
    pub fn format(&self, response: TurnResponse, modes: ResponseModes) -> TranscriptEntry {
        TranscriptEntry {
            role: Role::Assistant,
            content: self.render(&response),
            visualization_payload: response.visualization_payload,
            visualization_was_enabled: Some(modes.visualization),
            tabular_mode_was_enabled: Some(modes.tabular),
        }
    }

    fn render(&self, response: &TurnResponse) -> String {
        let query = response
            .query_used
            .as_deref()
            .filter(|q| !q.is_empty())
            .unwrap_or(QUERY_PLACEHOLDER);
        format!(
            "{}\n```sql\n{}\n```\n\n{}\n{}",
            QUERY_LABEL,
            query,
            RESULT_LABEL,
            highlight_table_names(&response.query_result)
        )
    }
}
