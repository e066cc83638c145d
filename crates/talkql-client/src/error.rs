//! Error types for calls to the query service.

/// Failure of a single call to the query service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("service rejected request with status {status}")]
    Rejected { status: u16, detail: Option<String> },
    /// The service answered with a body that does not match the contract.
    #[error("malformed reply: {0}")]
    Malformed(String),
}

impl ServiceError {
    /// Human-readable failure text, if the failure carries one.
    ///
    /// For rejections this is the service's own `detail`; for transport and
    /// parse failures it is the underlying message.
    pub fn detail(&self) -> Option<&str> {
        let text = match self {
            ServiceError::Rejected { detail, .. } => detail.as_deref()?,
            ServiceError::Transport(msg) | ServiceError::Malformed(msg) => msg.as_str(),
        };
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::Malformed(err.to_string())
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Malformed(err.to_string())
    }
}
