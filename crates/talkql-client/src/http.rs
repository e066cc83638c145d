//! HTTP implementation of the query service port.
//!
//! Speaks the service's JSON contract:
//! - `GET  /check-connection`
//! - `POST /query`
//! - `POST /disconnect-database`

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use talkql_core::config::ServiceConfig;
use talkql_core::{TurnRequest, TurnResponse};

use crate::{ConnectionStatus, QueryService, ServiceError};

/// Body of a non-success reply.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Query service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpQueryService {
    client: Client,
    base_url: String,
}

impl HttpQueryService {
    /// Create a client for the service rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Create a client from the `[service]` configuration section.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

impl QueryService for HttpQueryService {
    async fn check_connection(&self) -> Result<ConnectionStatus, ServiceError> {
        let url = self.endpoint("check-connection");
        tracing::debug!(%url, "Checking connection");
        let response = self.client.get(&url).send().await?;
        parse_reply(response).await
    }

    async fn query(&self, request: &TurnRequest) -> Result<TurnResponse, ServiceError> {
        let url = self.endpoint("query");
        tracing::debug!(
            %url,
            viz = request.visualization_enabled,
            tabular = request.tabular_mode_enabled,
            "Sending query"
        );
        let response = self.client.post(&url).json(request).send().await?;
        parse_reply(response).await
    }

    async fn disconnect(&self) -> Result<(), ServiceError> {
        let url = self.endpoint("disconnect-database");
        tracing::debug!(%url, "Requesting disconnect");
        let response = self.client.post(&url).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(rejection(status, &body))
    }
}

/// Decode a JSON reply, turning non-success statuses into `Rejected`.
async fn parse_reply<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(rejection(status, &body));
    }
    Ok(serde_json::from_slice(&body)?)
}

fn rejection(status: StatusCode, body: &[u8]) -> ServiceError {
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .and_then(detail_text);
    tracing::warn!(status = status.as_u16(), detail = ?detail, "Query service rejected request");
    ServiceError::Rejected {
        status: status.as_u16(),
        detail,
    }
}

/// Render a `detail` value as text. Validation errors arrive as JSON arrays.
fn detail_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
