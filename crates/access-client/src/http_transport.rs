//! reqwest-backed [`Transport`].
//!
//! Requests that require a source origin are tagged with the page origin in the
//! `__amp_source_origin` query parameter, and their responses must echo that
//! origin in `AMP-Access-Control-Allow-Source-Origin` before the body is read.

use std::sync::Arc;

use reqwest::cookie::Jar;
use serde_json::Value;
use url::Url;

use crate::constants::{ALLOW_SOURCE_ORIGIN_HEADER, SOURCE_ORIGIN_PARAM};
use crate::error::{AccessError, TransportError};
use crate::page::Page;
use crate::transport::{Credentials, FetchInit, Transport};

/// HTTP transport acting on behalf of a single [`Page`].
///
/// Credentialed requests share one cookie jar; anonymous requests use a
/// separate client that never sends or stores cookies. Redirects are never followed.
pub struct ReqwestTransport {
    page: Page,
    credentialed: reqwest::Client,
    anonymous: reqwest::Client,
    jar: Arc<Jar>,
}

impl ReqwestTransport {
    pub fn new(page: Page) -> Result<Self, AccessError> {
        let jar = Arc::new(Jar::default());
        let credentialed = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .cookie_provider(jar.clone())
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {e}")))?;
        let anonymous = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            page,
            credentialed,
            anonymous,
            jar,
        })
    }

    /// Cookie jar used for [`Credentials::Include`] requests.
    pub fn cookie_jar(&self) -> &Arc<Jar> {
        &self.jar
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Resolve `url` against the page and attach the source origin when required.
    fn request_url(&self, url: &str, init: &FetchInit) -> Result<Url, TransportError> {
        let mut target = self
            .page
            .resolve(url)
            .map_err(|e| TransportError::InvalidUrl(format!("{url}: {e}")))?;

        if init.require_source_origin {
            if target.query_pairs().any(|(k, _)| k == SOURCE_ORIGIN_PARAM) {
                return Err(TransportError::InvalidUrl(format!(
                    "{SOURCE_ORIGIN_PARAM} must not be set on the request URL"
                )));
            }
            target
                .query_pairs_mut()
                .append_pair(SOURCE_ORIGIN_PARAM, &self.page.origin());
        }
        Ok(target)
    }

    async fn send(&self, url: &str, init: &FetchInit) -> Result<reqwest::Response, AccessError> {
        let target = self.request_url(url, init)?;
        let client = match init.credentials {
            Credentials::Include => &self.credentialed,
            Credentials::Omit => &self.anonymous,
        };

        let mut req = client.request(init.method.clone(), target);
        for (name, value) in &init.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &init.body {
            req = req.body(body.clone());
        }

        let resp = req
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        self.verify_source_origin(&resp, init)?;

        if !resp.status().is_success() {
            return Err(TransportError::Status(resp.status().as_u16()).into());
        }
        Ok(resp)
    }

    /// A declared source origin must match the page; a missing one is an error
    /// only when the request requires it.
    fn verify_source_origin(
        &self,
        resp: &reqwest::Response,
        init: &FetchInit,
    ) -> Result<(), TransportError> {
        let expected = self.page.origin();
        let declared = resp
            .headers()
            .get(ALLOW_SOURCE_ORIGIN_HEADER)
            .map(|v| v.to_str().unwrap_or_default().to_string());

        let ok = match &declared {
            Some(origin) => *origin == expected,
            None => !init.require_source_origin,
        };
        if !ok {
            tracing::warn!(
                expected = %expected,
                declared = ?declared,
                "Response source origin check failed"
            );
            return Err(TransportError::SourceOriginMismatch {
                expected,
                actual: declared,
            });
        }
        Ok(())
    }
}

impl Transport for ReqwestTransport {
    async fn fetch_json(&self, url: &str, init: &FetchInit) -> Result<Value, AccessError> {
        let mut init = init.clone();
        if init.header("Accept").is_none() {
            init.headers
                .push(("Accept".to_string(), "application/json".to_string()));
        }

        let resp = self.send(url, &init).await?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| TransportError::Network(format!("failed to read body: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| AccessError::from(TransportError::InvalidJson(e.to_string())))
    }

    async fn send_signal(&self, url: &str, init: &FetchInit) -> Result<(), AccessError> {
        self.send(url, init).await.map(drop)
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("page", &self.page)
            .finish_non_exhaustive()
    }
}
