#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{RwLock, Semaphore};
use waystation_application::ports::{CacheStorage, CacheStore, NetworkFetcher};
use waystation_domain::{CacheRequest, CachedResponse, DomainError, RequestIdentity};

pub const ORIGIN: &str = "https://app.test";

pub fn url(path: &str) -> String {
    format!("{ORIGIN}{path}")
}

pub fn get(path: &str) -> CacheRequest {
    CacheRequest::parse_get(&url(path)).unwrap()
}

pub fn identity(path: &str) -> RequestIdentity {
    RequestIdentity::parse(&url(path)).unwrap()
}

pub fn ok(body: &str) -> CachedResponse {
    CachedResponse::new(200, vec![], body.to_string())
}

// ============================================================================
// Mock NetworkFetcher
// ============================================================================

#[derive(Clone)]
enum Outcome {
    Respond(CachedResponse),
    Fail,
}

#[derive(Clone, Default)]
pub struct MockNetworkFetcher {
    outcomes: Arc<RwLock<HashMap<String, Outcome>>>,
    calls: Arc<RwLock<HashMap<String, usize>>>,
    total_calls: Arc<AtomicUsize>,
    gate: Arc<RwLock<Option<Arc<Semaphore>>>>,
}

impl MockNetworkFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the response for an absolute URL.
    pub async fn respond(&self, url: &str, response: CachedResponse) {
        self.outcomes
            .write()
            .await
            .insert(url.to_string(), Outcome::Respond(response));
    }

    /// Scripts a transport failure for an absolute URL.
    pub async fn fail(&self, url: &str) {
        self.outcomes
            .write()
            .await
            .insert(url.to_string(), Outcome::Fail);
    }

    /// Parks every subsequent fetch until `release` is called.
    pub async fn hold(&self) {
        *self.gate.write().await = Some(Arc::new(Semaphore::new(0)));
    }

    pub async fn release(&self) {
        if let Some(gate) = self.gate.write().await.take() {
            gate.add_permits(1024);
        }
    }

    pub async fn calls_for(&self, url: &str) -> usize {
        self.calls.read().await.get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NetworkFetcher for MockNetworkFetcher {
    async fn fetch(&self, request: &CacheRequest) -> Result<CachedResponse, DomainError> {
        let key = request.url.to_string();
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        *self.calls.write().await.entry(key.clone()).or_insert(0) += 1;

        let gate = self.gate.read().await.clone();
        if let Some(gate) = gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|_| DomainError::NetworkUnavailable("gate closed".to_string()))?;
        }

        match self.outcomes.read().await.get(&key).cloned() {
            Some(Outcome::Respond(response)) => Ok(response),
            Some(Outcome::Fail) => Err(DomainError::NetworkUnavailable(format!(
                "mock offline for {key}"
            ))),
            None => Err(DomainError::NetworkUnavailable(format!(
                "no mock response for {key}"
            ))),
        }
    }
}

// ============================================================================
// Mock CacheStorage
// ============================================================================

#[derive(Default)]
pub struct MockStore {
    name: String,
    entries: RwLock<Vec<(RequestIdentity, CachedResponse)>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MockStore {
    pub async fn snapshot(&self) -> Vec<(RequestIdentity, CachedResponse)> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl CacheStore for MockStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, identity: &RequestIdentity) -> Result<Option<CachedResponse>, DomainError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::CacheUnavailable("mock read failure".to_string()));
        }
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .find(|(k, _)| k == identity)
            .map(|(_, v)| v.clone()))
    }

    async fn put(
        &self,
        identity: &RequestIdentity,
        response: CachedResponse,
    ) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::CacheUnavailable("mock write failure".to_string()));
        }
        let mut entries = self.entries.write().await;
        entries.retain(|(k, _)| k != identity);
        entries.push((identity.clone(), response));
        Ok(())
    }

    async fn delete(&self, identity: &RequestIdentity) -> Result<bool, DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::CacheUnavailable("mock write failure".to_string()));
        }
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|(k, _)| k != identity);
        Ok(entries.len() != before)
    }

    async fn keys(&self) -> Result<Vec<RequestIdentity>, DomainError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::CacheUnavailable("mock read failure".to_string()));
        }
        Ok(self.entries.read().await.iter().map(|(k, _)| k.clone()).collect())
    }
}

#[derive(Clone, Default)]
pub struct MockCacheStorage {
    stores: Arc<RwLock<HashMap<String, Arc<MockStore>>>>,
    fail_open: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    undeletable: Arc<RwLock<Vec<String>>>,
}

impl MockCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_stores(names: &[&str]) -> Self {
        let storage = Self::new();
        for name in names {
            storage.open(name).await.unwrap();
        }
        storage
    }

    pub fn set_fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn make_undeletable(&self, name: &str) {
        self.undeletable.write().await.push(name.to_string());
    }

    pub async fn store(&self, name: &str) -> Arc<MockStore> {
        self.stores
            .read()
            .await
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("store {name} was never opened"))
    }

    pub async fn keys_of(&self, name: &str) -> Vec<String> {
        match self.stores.read().await.get(name) {
            Some(store) => store
                .keys()
                .await
                .unwrap_or_default()
                .iter()
                .map(|k| k.to_string())
                .collect(),
            None => Vec::new(),
        }
    }

    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.stores.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl CacheStorage for MockCacheStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheStore>, DomainError> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(DomainError::CacheUnavailable("mock open failure".to_string()));
        }
        let mut stores = self.stores.write().await;
        let store = stores
            .entry(name.to_string())
            .or_insert_with(|| {
                Arc::new(MockStore {
                    name: name.to_string(),
                    entries: RwLock::new(Vec::new()),
                    fail_reads: Arc::clone(&self.fail_reads),
                    fail_writes: Arc::clone(&self.fail_writes),
                })
            })
            .clone();
        Ok(store as Arc<dyn CacheStore>)
    }

    async fn delete_store(&self, name: &str) -> Result<bool, DomainError> {
        if self.undeletable.read().await.iter().any(|n| n == name) {
            return Err(DomainError::CacheUnavailable(format!("{name} is locked")));
        }
        Ok(self.stores.write().await.remove(name).is_some())
    }

    async fn store_names(&self) -> Result<Vec<String>, DomainError> {
        Ok(self.names().await)
    }
}
