use async_trait::async_trait;
use waystation_domain::{CacheRequest, CachedResponse, DomainError};

/// The real network.
///
/// Non-success statuses come back as `Ok` responses; only transport
/// failures are errors (`DomainError::NetworkUnavailable`).
#[async_trait]
pub trait NetworkFetcher: Send + Sync {
    async fn fetch(&self, request: &CacheRequest) -> Result<CachedResponse, DomainError>;
}
