use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{AUTHORIZATION_FIELD, PINGBACK_FIELD};
use crate::error::ConfigError;
use crate::https::assert_https_url;
use crate::page::Page;

/// Validated endpoint configuration for a [`ClientAdapter`](crate::ClientAdapter).
///
/// Built once from untrusted JSON by [`AdapterConfig::parse`]; the raw input is
/// not kept. Both URLs are stored verbatim, placeholders included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterConfig {
    pub authorization_url: String,
    pub pingback_url: String,
}

impl AdapterConfig {
    /// Extract and validate the `authorization` and `pingback` fields.
    pub fn parse(page: &Page, config_json: &Value) -> Result<Self, ConfigError> {
        let object = config_json.as_object().ok_or(ConfigError::NotAnObject)?;

        let authorization_url = required_url(object, AUTHORIZATION_FIELD)?;
        assert_https_url(page, &authorization_url, AUTHORIZATION_FIELD)?;

        let pingback_url = required_url(object, PINGBACK_FIELD)?;
        assert_https_url(page, &pingback_url, PINGBACK_FIELD)?;

        Ok(Self {
            authorization_url,
            pingback_url,
        })
    }
}

fn required_url(
    object: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<String, ConfigError> {
    object
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::MissingUrl(field))
}
