use crate::errors::DomainError;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Key under which a response is stored.
///
/// Only the absolute URL takes part in the identity; the method is implied
/// GET and request headers are ignored, so two requests for the same URL
/// always address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestIdentity(Arc<str>);

impl RequestIdentity {
    pub fn from_url(url: &Url) -> Self {
        let mut url = url.clone();
        url.set_fragment(None);
        Self(Arc::from(url.as_str()))
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let url = Url::parse(raw).map_err(|e| DomainError::InvalidUrl(format!("{raw}: {e}")))?;
        Ok(Self::from_url(&url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestIdentity {
    /// Wraps an already-normalized identity string (e.g. one read back from a store).
    fn from(value: &str) -> Self {
        Self(Arc::from(value))
    }
}

/// An outbound request as seen by the interception point.
#[derive(Debug, Clone)]
pub struct CacheRequest {
    pub method: Arc<str>,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: bytes::Bytes,
}

impl CacheRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: Arc::from("GET"),
            url,
            headers: Vec::new(),
            body: bytes::Bytes::new(),
        }
    }

    pub fn parse_get(raw: &str) -> Result<Self, DomainError> {
        let url = Url::parse(raw).map_err(|e| DomainError::InvalidUrl(format!("{raw}: {e}")))?;
        Ok(Self::get(url))
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = Arc::from(method.to_ascii_uppercase().as_str());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<bytes::Bytes>) -> Self {
        self.body = body.into();
        self
    }

    #[inline]
    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    pub fn identity(&self) -> RequestIdentity {
        RequestIdentity::from_url(&self.url)
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// True when scheme, host and port all match `origin`.
    pub fn is_same_origin(&self, origin: &Url) -> bool {
        self.url.origin() == origin.origin()
    }
}
