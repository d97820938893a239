use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use std::time::Duration;
use tracing::debug;
use url::Url;
use waystation_application::ports::NetworkFetcher;
use waystation_domain::config::NetworkConfig;
use waystation_domain::{CacheRequest, CachedResponse, DomainError};

/// Headers that describe a single hop and must not be forwarded.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

pub fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| h.eq_ignore_ascii_case(name))
}

/// Fetches over HTTP(S) with a shared, pooled client.
///
/// Same-origin requests are sent to `upstream` when one is configured, so
/// the front can sit on the application's public origin without fetching
/// from itself.
pub struct ReqwestFetcher {
    client: reqwest::Client,
    app_origin: Url,
    upstream: Option<Url>,
}

impl ReqwestFetcher {
    pub fn new(
        config: &NetworkConfig,
        app_origin: Url,
        upstream: Option<Url>,
    ) -> Result<Self, DomainError> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(config.user_agent.as_str())
            .pool_max_idle_per_host(8);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| DomainError::NetworkUnavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            app_origin,
            upstream,
        })
    }

    /// Where a request is actually sent.
    pub fn target_url(&self, request: &CacheRequest) -> Url {
        match &self.upstream {
            Some(upstream) if request.is_same_origin(&self.app_origin) => {
                let mut target = upstream.clone();
                let prefix = upstream.path().trim_end_matches('/');
                target.set_path(&format!("{prefix}{}", request.url.path()));
                target.set_query(request.url.query());
                target
            }
            _ => request.url.clone(),
        }
    }
}

#[async_trait]
impl NetworkFetcher for ReqwestFetcher {
    async fn fetch(&self, request: &CacheRequest) -> Result<CachedResponse, DomainError> {
        let target = self.target_url(request);
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| DomainError::NetworkUnavailable(format!("invalid method {}", request.method)))?;

        let mut builder = self.client.request(method, target.clone());
        for (name, value) in &request.headers {
            if is_hop_by_hop(name) || name.eq_ignore_ascii_case("host") {
                continue;
            }
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                builder = builder.header(name, value);
            }
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            DomainError::NetworkUnavailable(format!("request to {target} failed: {e}"))
        })?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response.bytes().await.map_err(|e| {
            DomainError::NetworkUnavailable(format!("failed to read body from {target}: {e}"))
        })?;

        debug!(url = %target, status, body_len = body.len(), "Fetched");

        Ok(CachedResponse::new(status, headers, body))
    }
}
