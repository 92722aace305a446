use serde_json::Value;

use crate::adapter::AccessTypeAdapter;
use crate::config::AdapterConfig;
use crate::constants::AUTHORIZATION_TIMEOUT;
use crate::context::AccessContext;
use crate::error::AccessError;
use crate::page::Page;
use crate::timer::timeout_promise;
use crate::transport::{FetchInit, Transport};

/// Access adapter that authorizes and pings back against remote HTTPS endpoints.
///
/// Stateless between calls: every request re-expands its URL template through
/// the [`AccessContext`], so concurrent `authorize`/`pingback` calls never
/// interfere and are never coalesced.
pub struct ClientAdapter<C: AccessContext, T: Transport> {
    config: AdapterConfig,
    context: C,
    transport: T,
}

impl<C: AccessContext, T: Transport> ClientAdapter<C, T> {
    /// Validate `config_json` against `page` and build the adapter. No network I/O.
    pub fn new(
        page: &Page,
        config_json: &Value,
        context: C,
        transport: T,
    ) -> Result<Self, AccessError> {
        let config = AdapterConfig::parse(page, config_json)?;
        Ok(Self {
            config,
            context,
            transport,
        })
    }

    /// Copy of the validated endpoint configuration.
    pub fn get_config(&self) -> AdapterConfig {
        self.config.clone()
    }

    pub fn is_authorization_enabled(&self) -> bool {
        true
    }

    /// The context this adapter builds URLs with.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Expand the authorization template without auth data and fetch the
    /// entitlement JSON, bounded by the authorization timeout.
    ///
    /// The timeout covers the fetch only, not URL building. The payload is
    /// returned unmodified.
    pub async fn authorize(&self) -> Result<Value, AccessError> {
        tracing::debug!(
            template = %self.config.authorization_url,
            "Start authorization"
        );
        let url = self
            .context
            .build_url(&self.config.authorization_url, false)
            .await?;
        tracing::debug!(url = %url, "Authorization URL");

        let init = FetchInit::authorization();
        let result =
            timeout_promise(AUTHORIZATION_TIMEOUT, self.transport.fetch_json(&url, &init)).await;

        if let Err(AccessError::Timeout(limit)) = &result {
            tracing::warn!(
                url = %url,
                timeout_ms = limit.as_millis() as u64,
                "Authorization timed out"
            );
        }
        result
    }

    /// Expand the pingback template with auth data and send an empty form POST.
    /// No timeout applies.
    pub async fn pingback(&self) -> Result<(), AccessError> {
        let url = self.context.build_url(&self.config.pingback_url, true).await?;
        tracing::debug!(url = %url, "Pingback URL");
        self.transport
            .send_signal(&url, &FetchInit::pingback())
            .await
    }
}

impl<C: AccessContext, T: Transport> AccessTypeAdapter for ClientAdapter<C, T> {
    fn config_json(&self) -> Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }

    fn is_authorization_enabled(&self) -> bool {
        ClientAdapter::is_authorization_enabled(self)
    }

    fn authorize(&self) -> impl std::future::Future<Output = Result<Value, AccessError>> + Send {
        ClientAdapter::authorize(self)
    }

    fn pingback(&self) -> impl std::future::Future<Output = Result<(), AccessError>> + Send {
        ClientAdapter::pingback(self)
    }
}

impl<C: AccessContext, T: Transport> std::fmt::Debug for ClientAdapter<C, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientAdapter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
