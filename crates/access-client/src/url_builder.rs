//! Default [`AccessContext`]: placeholder expansion for endpoint templates.
//!
//! Supported variables:
//!
//! | Variable         | Value                                                        |
//! |------------------|--------------------------------------------------------------|
//! | `READER_ID`      | stable reader identifier                                     |
//! | `AUTHDATA(path)` | dotted path into the last authorization response (pingback only) |
//! | `SOURCE_URL`     | full page URL                                                |
//! | `SOURCE_HOST`    | page host                                                    |
//! | `RANDOM`         | fresh random number per expansion                            |
//!
//! Only whole identifiers are replaced; a variable may directly follow a
//! percent escape such as `%2F`. Unknown identifiers are left as-is. Every
//! substituted value is percent-encoded.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::context::AccessContext;
use crate::error::AccessError;
use crate::page::Page;

static VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(?P<esc>%[0-9A-Fa-f]{2})|\b)(?P<name>[A-Z][A-Z0-9_]*)(?:\((?P<arg>[^()]*)\)|\b)")
        .expect("variable pattern is valid")
});

/// Template expansion backed by a reader id and the last authorization response.
#[derive(Debug)]
pub struct TemplateContext {
    page: Page,
    reader_id: String,
    auth_response: RwLock<Option<Value>>,
}

impl TemplateContext {
    /// Context with a freshly generated reader id.
    pub fn new(page: Page) -> Self {
        Self::with_reader_id(page, format!("{:032x}", rand::random::<u128>()))
    }

    pub fn with_reader_id(page: Page, reader_id: impl Into<String>) -> Self {
        Self {
            page,
            reader_id: reader_id.into(),
            auth_response: RwLock::new(None),
        }
    }

    pub fn reader_id(&self) -> &str {
        &self.reader_id
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Store the entitlement payload that later `AUTHDATA(...)` expansions read from.
    pub async fn set_auth_response(&self, response: Value) {
        *self.auth_response.write().await = Some(response);
    }

    pub async fn auth_response(&self) -> Option<Value> {
        self.auth_response.read().await.clone()
    }

    /// Expand all known variables in `template`.
    pub async fn expand(&self, template: &str, use_auth_data: bool) -> Result<String, AccessError> {
        let auth = if use_auth_data {
            self.auth_response.read().await.clone()
        } else {
            None
        };

        let mut out = String::with_capacity(template.len());
        let mut last = 0;
        for caps in VARIABLE_RE.captures_iter(template) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let escape = caps.name("esc").map_or("", |m| m.as_str());
            let name = &caps["name"];
            let arg = caps.name("arg").map(|m| m.as_str());

            let Some(value) = self.resolve(name, arg, auth.as_ref(), use_auth_data)? else {
                continue;
            };
            out.push_str(&template[last..whole.start()]);
            out.push_str(escape);
            out.push_str(&urlencoding::encode(&value));
            last = whole.end();
        }
        out.push_str(&template[last..]);
        Ok(out)
    }

    fn resolve(
        &self,
        name: &str,
        arg: Option<&str>,
        auth: Option<&Value>,
        use_auth_data: bool,
    ) -> Result<Option<String>, AccessError> {
        let value = match name {
            "READER_ID" => self.reader_id.clone(),
            "SOURCE_URL" => self.page.url().to_string(),
            "SOURCE_HOST" => self.page.url().host_str().unwrap_or_default().to_string(),
            "RANDOM" => rand::random::<f64>().to_string(),
            "AUTHDATA" => {
                let path = arg.map(str::trim).filter(|p| !p.is_empty()).ok_or_else(|| {
                    AccessError::UrlBuild("AUTHDATA requires a field path".to_string())
                })?;
                if !use_auth_data {
                    tracing::debug!(path, "AUTHDATA not available for this request");
                    String::new()
                } else {
                    auth.and_then(|a| lookup_path(a, path))
                        .unwrap_or_default()
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(value))
    }
}

impl AccessContext for TemplateContext {
    fn build_url(
        &self,
        template: &str,
        use_auth_data: bool,
    ) -> impl std::future::Future<Output = Result<String, AccessError>> + Send {
        self.expand(template, use_auth_data)
    }
}

/// Scalar at a dotted `path` (e.g. `grant.level`) rendered as a string.
fn lookup_path(value: &Value, path: &str) -> Option<String> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    match current {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
