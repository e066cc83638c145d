//! Works out which data source a new session is connected to.

use talkql_client::{ConnectionStatus, QueryService};
use talkql_core::types::{DEFAULT_SOURCE_NAME, UNKNOWN_SOURCE_TYPE};
use talkql_core::{ConnectionInfo, SessionParams};

use crate::error::SessionError;
use crate::navigation::NavigationPort;

/// Resolves the session's `ConnectionInfo` once at session start.
///
/// Explicit `dbType`/`dbName` parameters win without touching the network.
/// Otherwise the service is asked once; when it reports no connection, or the
/// check fails, the host is told to leave the session.
pub struct ConnectionResolver<'a, S, N> {
    service: &'a S,
    navigator: &'a N,
}

impl<'a, S: QueryService, N: NavigationPort> ConnectionResolver<'a, S, N> {
    pub fn new(service: &'a S, navigator: &'a N) -> Self {
        Self { service, navigator }
    }

    pub async fn resolve(&self, params: &SessionParams) -> Result<ConnectionInfo, SessionError> {
        if let Some(info) = params.explicit_connection() {
            tracing::info!(
                source_type = %info.source_type,
                source_name = %info.source_name,
                "Using connection from session parameters"
            );
            return Ok(info);
        }

        let reason = match self.service.check_connection().await {
            Ok(status) if status.is_connected => {
                let info = connection_from_status(status);
                tracing::info!(
                    source_type = %info.source_type,
                    source_name = %info.source_name,
                    "Query service reports an active connection"
                );
                return Ok(info);
            }
            Ok(_) => {
                tracing::info!("Query service reports no connected data source");
                "query service reports no connected data source".to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Connection check failed");
                e.to_string()
            }
        };

        self.navigator.leave_session();
        Err(SessionError::ConnectionUnavailable(reason))
    }
}

fn connection_from_status(status: ConnectionStatus) -> ConnectionInfo {
    let source_type = status
        .db_type
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNKNOWN_SOURCE_TYPE.to_string());
    let source_name = status
        .database_name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_SOURCE_NAME.to_string());
    ConnectionInfo::new(source_type, source_name)
}
