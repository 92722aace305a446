//! Client-side access adapter for gated content.
//!
//! Asks a remote authorization endpoint whether the current reader is entitled
//! to view gated content, and reports consumption to a pingback endpoint once
//! access is granted.
//!
//! # Collaborators
//!
//! - [`AccessContext`] — expands endpoint URL templates ([`TemplateContext`] by default)
//! - [`Transport`] — credentialed, origin-checked HTTP ([`ReqwestTransport`] by default)
//! - [`timer::timeout_promise`] — the 3000 ms authorization deadline
//!
//! # Quick example
//!
//! ```no_run
//! use access_client::{ClientAdapter, Page, ReqwestTransport, TemplateContext};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), access_client::AccessError> {
//! let page = Page::parse("https://news.example/story").unwrap();
//! let config = serde_json::json!({
//!     "authorization": "https://pub.example/access?rid=READER_ID",
//!     "pingback": "https://pub.example/ping?rid=READER_ID&grant=AUTHDATA(grant)",
//! });
//!
//! let adapter = ClientAdapter::new(
//!     &page,
//!     &config,
//!     TemplateContext::new(page.clone()),
//!     ReqwestTransport::new(page.clone())?,
//! )?;
//!
//! let entitlement = adapter.authorize().await?;
//! adapter.context().set_auth_response(entitlement).await;
//! adapter.pingback().await?;
//! # Ok(())
//! # }
//! ```

// Core types and traits
pub mod adapter;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod page;
pub mod transport;

// Adapter variants
pub mod client_adapter;
pub mod other_adapter;

// Default collaborators
pub mod http_transport;
pub mod https;
pub mod timer;
pub mod url_builder;

// Re-exports
pub use adapter::{authorize_if_enabled, AccessTypeAdapter};
pub use config::AdapterConfig;
pub use constants::*;
pub use context::AccessContext;
pub use error::{AccessError, ConfigError, TransportError};
pub use page::Page;
pub use transport::{Credentials, FetchInit, Transport};

pub use client_adapter::ClientAdapter;
pub use other_adapter::OtherAdapter;

pub use http_transport::ReqwestTransport;
pub use url_builder::TemplateContext;
