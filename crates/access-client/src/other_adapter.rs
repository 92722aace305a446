use serde_json::Value;

use crate::adapter::AccessTypeAdapter;
use crate::error::AccessError;

/// Adapter variant for pages whose access is decided elsewhere.
///
/// Authorization is disabled and pingback is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct OtherAdapter;

impl OtherAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl AccessTypeAdapter for OtherAdapter {
    fn config_json(&self) -> Value {
        Value::Object(serde_json::Map::new())
    }

    fn is_authorization_enabled(&self) -> bool {
        false
    }

    async fn authorize(&self) -> Result<Value, AccessError> {
        Err(AccessError::AuthorizationDisabled)
    }

    async fn pingback(&self) -> Result<(), AccessError> {
        Ok(())
    }
}
