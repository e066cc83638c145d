//! TalkQL client crate - the query service port and its implementations.
//!
//! Provides the `QueryService` trait for talking to the remote data-query
//! service, an `HttpQueryService` that speaks its JSON-over-HTTP contract
//! via reqwest, and a `MockQueryService` with scripted replies for testing
//! the session layer.

pub mod error;
pub mod http;
pub mod mock;

use serde::Deserialize;
use talkql_core::{TurnRequest, TurnResponse};

pub use error::ServiceError;
pub use http::HttpQueryService;
pub use mock::MockQueryService;

/// Reply of `GET /check-connection`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConnectionStatus {
    pub is_connected: bool,
    #[serde(default)]
    pub db_type: Option<String>,
    #[serde(default)]
    pub database_name: Option<String>,
}

impl ConnectionStatus {
    /// A status reporting an active connection.
    pub fn connected(db_type: &str, database_name: Option<&str>) -> Self {
        Self {
            is_connected: true,
            db_type: Some(db_type.to_string()),
            database_name: database_name.map(str::to_string),
        }
    }

    /// A status reporting no connection.
    pub fn disconnected() -> Self {
        Self::default()
    }
}

/// Remote data-query service.
///
/// Every call is a single attempt: implementations neither retry nor time
/// out on their own.
pub trait QueryService: Send + Sync {
    /// Ask whether a data source is currently connected.
    fn check_connection(
        &self,
    ) -> impl std::future::Future<Output = Result<ConnectionStatus, ServiceError>> + Send;

    /// Run one natural-language query turn.
    fn query(
        &self,
        request: &TurnRequest,
    ) -> impl std::future::Future<Output = Result<TurnResponse, ServiceError>> + Send;

    /// Drop the service's current data-source connection.
    fn disconnect(&self) -> impl std::future::Future<Output = Result<(), ServiceError>> + Send;
}
