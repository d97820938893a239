use bytes::Bytes;
use std::sync::Arc;

/// A response as stored in (or served from) a cache store.
///
/// Stored verbatim as returned by the network; replaced wholesale, never
/// patched in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    pub headers: Arc<[(String, String)]>,
    pub body: Bytes,
}

impl CachedResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Arc::from(headers),
            body: body.into(),
        }
    }

    /// Placeholder response with a plain-text body, used when neither the
    /// network nor a store could answer.
    pub fn synthesized(status: u16, message: &'static str) -> Self {
        Self::new(
            status,
            vec![(
                "content-type".to_string(),
                "text/plain; charset=utf-8".to_string(),
            )],
            Bytes::from_static(message.as_bytes()),
        )
    }

    /// 408: cache-first miss with an unreachable or failing network.
    pub fn network_error() -> Self {
        Self::synthesized(408, "Network error occurred")
    }

    /// 400: stale-while-revalidate with no cached copy and a failed fetch.
    pub fn api_failure() -> Self {
        Self::synthesized(400, "API request failed")
    }

    /// 500: network-first where both the network and the cache failed.
    pub fn network_and_cache_failure() -> Self {
        Self::synthesized(500, "Both network and cache failed")
    }

    /// 502: pass-through request whose transport failed.
    pub fn upstream_unreachable() -> Self {
        Self::synthesized(502, "Upstream request failed")
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
