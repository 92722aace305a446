//! Capability set shared by all access adapter variants.
//!
//! - [`ClientAdapter`](crate::ClientAdapter) — authorization mandatory, talks to remote endpoints
//! - [`OtherAdapter`](crate::OtherAdapter) — authorization disabled, no network I/O
//!
//! Hosts branch on [`AccessTypeAdapter::is_authorization_enabled`] rather than on
//! the concrete adapter type.

use serde_json::Value;

use crate::error::AccessError;

/// Operations a host runtime may invoke on an access adapter.
pub trait AccessTypeAdapter: Send + Sync {
    /// Snapshot of the adapter's resolved configuration, for diagnostics.
    fn config_json(&self) -> Value;

    /// Whether [`authorize`](Self::authorize) should be called at all.
    fn is_authorization_enabled(&self) -> bool;

    /// Ask the entitlement service whether the current reader may see gated content.
    fn authorize(&self) -> impl std::future::Future<Output = Result<Value, AccessError>> + Send;

    /// Report that gated content was consumed.
    fn pingback(&self) -> impl std::future::Future<Output = Result<(), AccessError>> + Send;
}

/// Run authorization only when the adapter supports it.
///
/// Returns `Ok(None)` without touching the adapter's `authorize` when the
/// capability flag is off.
pub async fn authorize_if_enabled<A: AccessTypeAdapter>(
    adapter: &A,
) -> Result<Option<Value>, AccessError> {
    if !adapter.is_authorization_enabled() {
        tracing::debug!("Authorization disabled for adapter, skipping");
        return Ok(None);
    }
    adapter.authorize().await.map(Some)
}
