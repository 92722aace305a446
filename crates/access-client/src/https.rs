//! HTTPS enforcement for configured endpoints.

use url::Url;

use crate::error::ConfigError;
use crate::page::Page;

/// Resolve `raw` against the page and require the result to be an `https` URL with a host.
///
/// Scheme-relative and relative references are accepted only when they resolve
/// to https, which depends on the page they are served from.
pub fn assert_https_url(page: &Page, raw: &str, field: &'static str) -> Result<Url, ConfigError> {
    let resolved = page.resolve(raw).map_err(|_| ConfigError::InvalidUrl {
        field,
        url: raw.to_string(),
    })?;

    if resolved.scheme() != "https" {
        return Err(ConfigError::NotHttps {
            field,
            url: raw.to_string(),
        });
    }

    if resolved.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::InvalidUrl {
            field,
            url: raw.to_string(),
        });
    }

    Ok(resolved)
}
