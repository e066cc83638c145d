use thiserror::Error;

/// Top-level error type for TalkQL.
///
/// Covers the concerns shared by every crate (configuration, I/O and
/// serialization). The client and session crates define their own error
/// enums for service and session failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TalkqlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for TalkqlError {
    fn from(err: toml::de::Error) -> Self {
        TalkqlError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for TalkqlError {
    fn from(err: toml::ser::Error) -> Self {
        TalkqlError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for TalkqlError {
    fn from(err: serde_json::Error) -> Self {
        TalkqlError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for TalkQL operations.
pub type Result<T> = std::result::Result<T, TalkqlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TalkqlError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");

        let err = TalkqlError::Serialization("unexpected token".to_string());
        assert_eq!(err.to_string(), "Serialization error: unexpected token");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TalkqlError = io_err.into();
        assert!(matches!(err, TalkqlError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("not {{ valid").unwrap_err();
        let err: TalkqlError = toml_err.into();
        assert!(matches!(err, TalkqlError::Config(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: TalkqlError = json_err.into();
        assert!(matches!(err, TalkqlError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error:"));
    }
}
