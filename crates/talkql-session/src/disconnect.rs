//! Ends a session by dropping the service's data-source connection.

use talkql_client::QueryService;

use crate::error::SessionError;
use crate::navigation::NavigationPort;
use crate::state::SessionState;

/// Issues the disconnect call and tears the session down on success.
///
/// A failed disconnect leaves the session untouched; the failure is logged
/// and returned, and nothing is retried.
pub struct DisconnectCoordinator<'a, S, N> {
    service: &'a S,
    navigator: &'a N,
}

impl<'a, S: QueryService, N: NavigationPort> DisconnectCoordinator<'a, S, N> {
    pub fn new(service: &'a S, navigator: &'a N) -> Self {
        Self { service, navigator }
    }

    pub async fn disconnect(&self, state: &mut SessionState) -> Result<(), SessionError> {
        let session_id = state.id();
        match self.service.disconnect().await {
            Ok(()) => {
                tracing::info!(%session_id, "Disconnected from data source");
                state.reset();
                self.navigator.leave_session();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(%session_id, error = %e, "Disconnect failed; session unchanged");
                Err(SessionError::DisconnectFailed(e.to_string()))
            }
        }
    }
}
