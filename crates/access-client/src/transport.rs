//! Transport contract used by adapters for their network calls.
//!
//! See [`crate::http_transport::ReqwestTransport`] for the reqwest implementation.

use serde_json::Value;

use crate::constants::PINGBACK_CONTENT_TYPE;
use crate::error::AccessError;

/// Whether cookies and other ambient credentials accompany a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials {
    Include,
    Omit,
}

/// Per-request options passed to a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchInit {
    pub method: reqwest::Method,
    pub credentials: Credentials,
    /// Require the response to echo the page origin, and tag the request with it.
    ///
    /// When false, a response without the origin header is accepted, but a
    /// response that declares a different origin is still rejected.
    pub require_source_origin: bool,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl FetchInit {
    /// Credentialed, origin-checked GET used for authorization.
    pub fn authorization() -> Self {
        Self {
            method: reqwest::Method::GET,
            credentials: Credentials::Include,
            require_source_origin: true,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Credentialed, origin-checked form POST with an empty body used for pingback.
    pub fn pingback() -> Self {
        Self {
            method: reqwest::Method::POST,
            credentials: Credentials::Include,
            require_source_origin: true,
            headers: vec![(
                "Content-Type".to_string(),
                PINGBACK_CONTENT_TYPE.to_string(),
            )],
            body: Some(String::new()),
        }
    }

    /// Value of the first header matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP transport: credentialed JSON fetches and signal-only sends.
pub trait Transport: Send + Sync {
    /// Perform the request and parse the response body as JSON.
    fn fetch_json(
        &self,
        url: &str,
        init: &FetchInit,
    ) -> impl std::future::Future<Output = Result<Value, AccessError>> + Send;

    /// Perform the request and resolve on any success status without reading the body.
    fn send_signal(
        &self,
        url: &str,
        init: &FetchInit,
    ) -> impl std::future::Future<Output = Result<(), AccessError>> + Send;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn fetch_json(
        &self,
        url: &str,
        init: &FetchInit,
    ) -> impl std::future::Future<Output = Result<Value, AccessError>> + Send {
        (**self).fetch_json(url, init)
    }

    fn send_signal(
        &self,
        url: &str,
        init: &FetchInit,
    ) -> impl std::future::Future<Output = Result<(), AccessError>> + Send {
        (**self).send_signal(url, init)
    }
}
