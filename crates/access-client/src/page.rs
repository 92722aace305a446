//! The page an adapter serves: its URL and the origin derived from it.

use url::Url;

/// The document on whose behalf access requests are made.
///
/// Relative endpoint URLs resolve against [`Page::url`], and the page origin
/// is what remote endpoints must echo back in their responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    url: Url,
}

impl Page {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// Parse a page from a URL string.
    pub fn parse(url: &str) -> Result<Self, url::ParseError> {
        Url::parse(url).map(Self::new)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Serialized origin, e.g. `https://news.example`.
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// Resolve `reference` (absolute, scheme-relative or relative) against the page URL.
    pub fn resolve(&self, reference: &str) -> Result<Url, url::ParseError> {
        self.url.join(reference)
    }
}
