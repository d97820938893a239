use async_trait::async_trait;
use dashmap::DashMap;
use lru::LruCache;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;
use waystation_application::ports::{CacheStorage, CacheStore};
use waystation_domain::{CachedResponse, DomainError, RequestIdentity};

/// One in-process store.
///
/// The unbounded `LruCache` is used purely as an insertion-ordered map:
/// `put` moves a replaced key to the newest position and reads use `peek`,
/// so iteration order is write order and never access order.
pub struct MemoryCacheStore {
    name: Arc<str>,
    entries: Mutex<LruCache<RequestIdentity, CachedResponse>>,
}

impl MemoryCacheStore {
    fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            entries: Mutex::new(LruCache::unbounded()),
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, LruCache<RequestIdentity, CachedResponse>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, identity: &RequestIdentity) -> Result<Option<CachedResponse>, DomainError> {
        Ok(self.entries().peek(identity).cloned())
    }

    async fn put(
        &self,
        identity: &RequestIdentity,
        response: CachedResponse,
    ) -> Result<(), DomainError> {
        self.entries().put(identity.clone(), response);
        Ok(())
    }

    async fn delete(&self, identity: &RequestIdentity) -> Result<bool, DomainError> {
        Ok(self.entries().pop(identity).is_some())
    }

    async fn keys(&self) -> Result<Vec<RequestIdentity>, DomainError> {
        // LruCache iterates newest first.
        Ok(self.entries().iter().rev().map(|(k, _)| k.clone()).collect())
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.entries().len())
    }
}

/// Process-local storage; contents do not survive a restart.
#[derive(Default)]
pub struct InMemoryCacheStorage {
    stores: DashMap<String, Arc<MemoryCacheStore>>,
}

impl InMemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for InMemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheStore>, DomainError> {
        let store = self
            .stores
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!(store = name, "Created in-memory store");
                Arc::new(MemoryCacheStore::new(name))
            })
            .clone();
        Ok(store as Arc<dyn CacheStore>)
    }

    async fn delete_store(&self, name: &str) -> Result<bool, DomainError> {
        Ok(self.stores.remove(name).is_some())
    }

    async fn store_names(&self) -> Result<Vec<String>, DomainError> {
        let mut names: Vec<String> = self.stores.iter().map(|e| e.key().clone()).collect();
        names.sort();
        Ok(names)
    }
}
