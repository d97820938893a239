use async_trait::async_trait;
use std::sync::Arc;
use waystation_domain::{CachedResponse, DomainError, RequestIdentity};

/// Handle to one named store.
///
/// Each operation is atomic from the caller's point of view. Concurrent
/// writers to the same identity race; the last `put` wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    fn name(&self) -> &str;

    async fn get(&self, identity: &RequestIdentity) -> Result<Option<CachedResponse>, DomainError>;

    /// Stores `response`, replacing any previous entry. A replaced entry
    /// becomes the newest one in insertion order.
    async fn put(
        &self,
        identity: &RequestIdentity,
        response: CachedResponse,
    ) -> Result<(), DomainError>;

    /// Returns `true` when an entry was removed.
    async fn delete(&self, identity: &RequestIdentity) -> Result<bool, DomainError>;

    /// All identities, oldest first.
    async fn keys(&self) -> Result<Vec<RequestIdentity>, DomainError>;

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.keys().await?.len())
    }
}

/// Container of named stores.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Opens the named store, creating it on first use.
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheStore>, DomainError>;

    /// Drops a store and all its entries. Returns `true` if it existed.
    async fn delete_store(&self, name: &str) -> Result<bool, DomainError>;

    async fn store_names(&self) -> Result<Vec<String>, DomainError>;
}
