use std::time::Duration;

use thiserror::Error;

/// Errors returned by access adapter operations.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("url build error: {0}")]
    UrlBuild(String),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("authorization timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("authorization is not enabled for this adapter")]
    AuthorizationDisabled,
}

/// Construction-time validation failures. Fatal: no adapter is produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("\"{0}\" URL must be specified")]
    MissingUrl(&'static str),

    #[error("\"{field}\" URL must be HTTPS: {url}")]
    NotHttps { field: &'static str, url: String },

    #[error("\"{field}\" URL is invalid: {url}")]
    InvalidUrl { field: &'static str, url: String },

    #[error("config must be a JSON object")]
    NotAnObject,
}

/// Failures raised by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("response source origin mismatch: expected {expected}, got {actual:?}")]
    SourceOriginMismatch {
        expected: String,
        actual: Option<String>,
    },

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

impl AccessError {
    /// True when the error came from the authorization deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AccessError::Timeout(_))
    }
}
